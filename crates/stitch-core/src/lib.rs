//! Module placement solver for multi-module JavaScript builds.
//!
//! Given a project's module DAG and per-module input-file lists, decides
//! which module each unique file belongs to so that every file is emitted
//! exactly once, every module (together with its transitive deps) contains
//! everything it needs, and emission order within a module respects the
//! inferred load-order constraints among files.
//!
//! A solve runs a linear pipeline (ingest, validate the DAG, infer file
//! ordering, place files, emit) and either produces a [`SolvedProject`] or
//! fails with a [`SolveError`]. The solver is pure and synchronous: inputs
//! and outputs are in-memory, no I/O, no logging, no global state, and the
//! result is byte-for-byte deterministic for a fixed declaration order, so
//! independent build invocations can call it concurrently.

use serde::{Deserialize, Serialize};

mod emit;
mod error;
mod graph;
mod module_graph;
mod order;
mod placer;
mod registry;

pub use emit::{FileMove, ModuleOutput};
pub use error::SolveError;
pub use module_graph::VIRTUAL_BASE_MODULE;
pub use registry::CompileClass;

/// Input to one solve: the declared modules in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub modules: Vec<ModuleDecl>,
}

/// One declared module and its input files.
///
/// `namespaced_ordered` comes pre-ordered by the upstream namespace
/// resolver; the solver preserves that order as declared dependency order.
/// All paths use `/` separators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDecl {
    pub name: String,
    /// Modules that must always be loaded before this one.
    #[serde(default)]
    pub direct_deps: Vec<String>,
    /// Files served as-is, never fed to a compiler.
    #[serde(default)]
    pub uncompiled: Vec<String>,
    /// Compiled files that do not participate in namespace management.
    #[serde(default)]
    pub non_namespaced: Vec<String>,
    /// Namespace-managed files, already in dependency order.
    #[serde(default)]
    pub namespaced_ordered: Vec<String>,
}

impl ModuleDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A fully solved project: one output record per module, roots first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedProject {
    /// Module records in topological order.
    pub modules: Vec<ModuleOutput>,
    /// Sentinel name of the synthesized root, when one was needed.
    pub virtual_root: Option<String>,
    /// Files emitted outside every module that declared them.
    pub moves: Vec<FileMove>,
}

impl SolvedProject {
    /// Look up a module's output record by name.
    pub fn module(&self, name: &str) -> Option<&ModuleOutput> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Total unique files across the whole output.
    pub fn file_count(&self) -> usize {
        self.modules.iter().map(ModuleOutput::file_count).sum()
    }
}

/// Solve a project: assign every input file to exactly one module and order
/// each module's emission.
///
/// Zero declared modules is valid and yields an empty plan.
///
/// # Errors
///
/// Any of the [`SolveError`] variants; all are fatal to the call and nothing
/// is partially emitted.
pub fn solve(project: &ProjectSpec) -> Result<SolvedProject, SolveError> {
    let graph = module_graph::ModuleGraph::build(&project.modules)?;
    let mut inference = order::infer(&graph, &project.modules)?;
    let placement = placer::place(&graph, &mut inference);
    let modules = emit::emit(&graph, &inference.registry, &placement);
    let moves = emit::collect_moves(&graph, &inference.registry, &placement);
    Ok(SolvedProject {
        virtual_root: graph.virtual_root().map(|m| graph.name(m).to_string()),
        modules,
        moves,
    })
}

#[cfg(test)]
#[path = "solve_tests.rs"]
mod tests;
