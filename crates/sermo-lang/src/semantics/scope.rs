//! Symbol table and module graph (spec §3.4). A `Scope` binds identifiers
//! to `SymbolEntry`s; scopes stack inside a file, the outermost being the
//! file's `Module` scope. A `ModuleGraph` maps canonical paths to analyzed
//! modules plus their resolved import edges.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use sermo_base::{Span, Symbol};

use super::types::SemanticType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Type,
    Namespace,
    Import,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub kind: SymbolKind,
    pub ty: SemanticType,
    pub mutable: bool,
    pub exported: bool,
    pub span: Span,
}

/// A single lexical level: a file's top-level scope, a function body, a
/// block, a loop body, and so on.
#[derive(Debug, Default, Clone)]
pub struct Scope {
    bindings: HashMap<Symbol, SymbolEntry>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: Symbol, entry: SymbolEntry) -> Option<SymbolEntry> {
        self.bindings.insert(name, entry)
    }

    pub fn get(&self, name: Symbol) -> Option<&SymbolEntry> {
        self.bindings.get(&name)
    }

    pub fn get_mut(&mut self, name: Symbol) -> Option<&mut SymbolEntry> {
        self.bindings.get_mut(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &SymbolEntry)> {
        self.bindings.iter()
    }
}

/// A stack of `Scope`s. Index 0 is always the file's module scope; it is
/// never popped.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack { scopes: vec![Scope::new()] }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pops the innermost scope. A no-op at the file scope — callers push
    /// and pop in matched pairs, but the module scope itself must survive
    /// for the whole analysis of a file.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn bind(&mut self, name: Symbol, entry: SymbolEntry) -> Option<SymbolEntry> {
        self.scopes.last_mut().expect("scope stack always has a module scope").bind(name, entry)
    }

    pub fn lookup(&self, name: Symbol) -> Option<&SymbolEntry> {
        self.scopes.iter().rev().find_map(|s| s.get(name))
    }

    pub fn lookup_mut(&mut self, name: Symbol) -> Option<&mut SymbolEntry> {
        self.scopes.iter_mut().rev().find_map(|s| s.get_mut(name))
    }

    pub fn is_bound_in_current_scope(&self, name: Symbol) -> bool {
        self.scopes.last().expect("scope stack always has a module scope").get(name).is_some()
    }

    /// The file's outermost scope — the set of top-level declarations.
    pub fn module_scope(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn module_scope_mut(&mut self) -> &mut Scope {
        &mut self.scopes[0]
    }
}

/// A single analyzed source file.
#[derive(Debug)]
pub struct Module {
    pub path: PathBuf,
    pub scope: Scope,
    /// The subset of `scope` bound with `exported: true` — the surface
    /// other modules see when they `importa` from this one.
    pub exports: HashMap<Symbol, SymbolEntry>,
}

impl Module {
    pub fn new(path: PathBuf, scope: Scope) -> Self {
        let exports = scope.iter().filter(|(_, e)| e.exported).map(|(s, e)| (*s, e.clone())).collect();
        Module { path, scope, exports }
    }
}

/// Maps canonical file paths to their analyzed `Module`s plus resolved
/// import edges. A `BTreeMap` rather than a `HashMap`: spec §5 requires
/// deterministic analysis order, and iterating modules in path order keeps
/// that determinism without a separate sort step.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    modules: BTreeMap<PathBuf, Module>,
    edges: BTreeMap<PathBuf, Vec<PathBuf>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: Module, imports: Vec<PathBuf>) {
        self.edges.insert(module.path.clone(), imports);
        self.modules.insert(module.path.clone(), module);
    }

    pub fn get(&self, path: &Path) -> Option<&Module> {
        self.modules.get(path)
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn imports_of(&self, path: &Path) -> &[PathBuf] {
        self.edges.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Topological order of the import graph (spec §5: "modules are
    /// analyzed in topological order of the import graph"). On a cycle,
    /// returns the edge that closes it rather than an order, so the caller
    /// can report it at that specific edge (spec §4.3 "cyclic module
    /// import").
    pub fn topological_order(&self) -> Result<Vec<PathBuf>, (PathBuf, PathBuf)> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum State {
            Visiting,
            Done,
        }

        fn visit(
            graph: &ModuleGraph,
            path: &PathBuf,
            state: &mut HashMap<PathBuf, State>,
            order: &mut Vec<PathBuf>,
        ) -> Result<(), (PathBuf, PathBuf)> {
            match state.get(path) {
                Some(State::Done) => return Ok(()),
                Some(State::Visiting) => return Err((path.clone(), path.clone())),
                None => {}
            }
            state.insert(path.clone(), State::Visiting);
            for dep in graph.imports_of(path) {
                if state.get(dep) == Some(&State::Visiting) {
                    return Err((path.clone(), dep.clone()));
                }
                visit(graph, dep, state, order)?;
            }
            state.insert(path.clone(), State::Done);
            order.push(path.clone());
            Ok(())
        }

        let mut state = HashMap::new();
        let mut order = Vec::new();
        for path in self.modules.keys() {
            visit(self, path, &mut state, &mut order)?;
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sermo_base::Position;

    fn span() -> Span {
        Span::point(Position::START)
    }

    fn entry(ty: SemanticType, exported: bool) -> SymbolEntry {
        SymbolEntry { kind: SymbolKind::Variable, ty, mutable: false, exported, span: span() }
    }

    #[test]
    fn lookup_walks_outward_through_nested_scopes() {
        let mut stack = ScopeStack::new();
        let mut interner = sermo_base::Interner::new();
        let outer = interner.intern("x");
        stack.bind(outer, entry(SemanticType::Unknown, false));
        stack.push_scope();
        assert!(stack.lookup(outer).is_some());
        stack.pop_scope();
        assert!(stack.lookup(outer).is_some());
    }

    #[test]
    fn inner_binding_shadows_outer_in_current_scope_check() {
        let mut stack = ScopeStack::new();
        let mut interner = sermo_base::Interner::new();
        let name = interner.intern("x");
        stack.bind(name, entry(SemanticType::Unknown, false));
        stack.push_scope();
        assert!(!stack.is_bound_in_current_scope(name));
        stack.bind(name, entry(SemanticType::Unknown, false));
        assert!(stack.is_bound_in_current_scope(name));
    }

    #[test]
    fn module_exports_only_include_exported_bindings() {
        let mut interner = sermo_base::Interner::new();
        let pub_name = interner.intern("publicFn");
        let priv_name = interner.intern("privateFn");
        let mut scope = Scope::new();
        scope.bind(pub_name, entry(SemanticType::Unknown, true));
        scope.bind(priv_name, entry(SemanticType::Unknown, false));
        let module = Module::new(PathBuf::from("a.srm"), scope);
        assert!(module.exports.contains_key(&pub_name));
        assert!(!module.exports.contains_key(&priv_name));
    }

    #[test]
    fn topological_order_respects_import_edges() {
        let mut graph = ModuleGraph::new();
        let a = PathBuf::from("a.srm");
        let b = PathBuf::from("b.srm");
        graph.insert(Module::new(b.clone(), Scope::new()), Vec::new());
        graph.insert(Module::new(a.clone(), Scope::new()), vec![b.clone()]);
        let order = graph.topological_order().expect("no cycle");
        let pos_a = order.iter().position(|p| p == &a).unwrap();
        let pos_b = order.iter().position(|p| p == &b).unwrap();
        assert!(pos_b < pos_a, "b must be analyzed before a since a imports b");
    }

    #[test]
    fn topological_order_reports_a_cycle() {
        let mut graph = ModuleGraph::new();
        let a = PathBuf::from("a.srm");
        let b = PathBuf::from("b.srm");
        graph.insert(Module::new(a.clone(), Scope::new()), vec![b.clone()]);
        graph.insert(Module::new(b.clone(), Scope::new()), vec![a.clone()]);
        assert!(graph.topological_order().is_err());
    }
}
