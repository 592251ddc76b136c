//! Diagnostic rendering shared by every subcommand (spec §6: "a non-empty
//! diagnostic list at any stage prints all diagnostics and sets the exit
//! code").

use sermo_base::diagnostic::sort_deterministic;
use sermo_base::Diagnostic;

/// Sorts and prints every diagnostic to stderr against `display_path`,
/// returning whether any of them was an error.
///
/// `CompiledProgram::diagnostics` is a single flat list spanning every
/// module reached from the entry file rather than one list per file, so a
/// multi-module compile renders every diagnostic against the entry file's
/// display name; the span inside the message still pins it to a line and
/// column.
pub fn report(diagnostics: &mut [Diagnostic], display_path: &str) -> bool {
    sort_deterministic(diagnostics);
    let mut saw_error = false;
    for diagnostic in diagnostics.iter() {
        eprintln!("{}", diagnostic.render(display_path));
        saw_error |= diagnostic.is_error();
    }
    saw_error
}
