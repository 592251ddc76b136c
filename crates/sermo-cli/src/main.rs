//! `sermo` — standalone binary entry point.
//!
//! A thin wrapper around [`sermo_cli::run_cli`]; all command logic lives in
//! the library crate for testability.

fn main() {
    std::process::exit(sermo_cli::run_cli());
}
