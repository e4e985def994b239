//! Final per-module output records, in module topological order.

use serde::{Deserialize, Serialize};

use crate::module_graph::{ModuleGraph, ModuleId};
use crate::placer::Placement;
use crate::registry::{FileId, FileRegistry};

/// One module's share of the solved project.
///
/// `compiled_files` and `dont_compile_files` are unique across the whole
/// output; the surrounding concatenation layer writes the dont-compile
/// bucket ahead of the compiled payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOutput {
    pub name: String,
    /// Direct dependency modules after virtual-root injection.
    pub direct_deps_used: Vec<String>,
    pub compiled_files: Vec<String>,
    pub dont_compile_files: Vec<String>,
}

impl ModuleOutput {
    /// Total files this module emits, both buckets.
    pub fn file_count(&self) -> usize {
        self.compiled_files.len() + self.dont_compile_files.len()
    }
}

/// A file emitted outside every module that declared it.
///
/// Shared files migrate to an ancestor so they load once; callers usually
/// surface these so a surprising placement can be traced back to the inputs
/// demanding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMove {
    pub path: String,
    /// Destination module.
    pub module: String,
}

/// The placement's move list in forward placement order, as path-level
/// records.
pub(crate) fn collect_moves(
    graph: &ModuleGraph,
    registry: &FileRegistry,
    placement: &Placement,
) -> Vec<FileMove> {
    placement
        .moves
        .iter()
        .rev()
        .map(|&(file, module)| FileMove {
            path: registry.path(file).to_string(),
            module: graph.name(module).to_string(),
        })
        .collect()
}

/// Materialize the placement into path-level records. The virtual root, when
/// present, is emitted like any other module under its sentinel name.
pub(crate) fn emit(
    graph: &ModuleGraph,
    registry: &FileRegistry,
    placement: &Placement,
) -> Vec<ModuleOutput> {
    let paths = |bucket: &[FileId]| {
        // Buckets were filled by prepending (reverse placement order); read
        // them back to front to restore forward predecessor order.
        bucket
            .iter()
            .rev()
            .map(|&f| registry.path(f).to_string())
            .collect::<Vec<_>>()
    };
    graph
        .topo_order()
        .iter()
        .map(|&m| ModuleOutput {
            name: graph.name(m).to_string(),
            direct_deps_used: graph
                .direct_deps(m)
                .iter()
                .map(|d| graph.name(ModuleId(d)).to_string())
                .collect(),
            compiled_files: paths(&placement.compiled[m.0 as usize]),
            dont_compile_files: paths(&placement.dont_compile[m.0 as usize]),
        })
        .collect()
}
