//! Load-order inference across all file occurrences.
//!
//! Conceptually every module loads its ancestors' files first, then its own
//! in class order (uncompiled, then non-namespaced, then namespaced). A file
//! g is an inferred predecessor of f iff g was seen before f in *every*
//! observed occurrence of f; intersecting the "seen before" sets across
//! occurrences yields exactly that relation.

use crate::ModuleDecl;
use crate::error::SolveError;
use crate::graph::{IdSet, topological_sort};
use crate::module_graph::{ModuleGraph, ModuleId};
use crate::registry::{CompileClass, FileId, FileRegistry};

/// Everything the placer needs: the interned files, the inferred
/// predecessor relation, the needed-in map, and a file order in which
/// predecessors come first.
#[derive(Debug)]
pub(crate) struct Inference {
    pub registry: FileRegistry,
    /// Per file, the ids of its inferred predecessors.
    pub preds: Vec<IdSet>,
    /// Per file, the ids of the modules that must have it loaded.
    pub needed_in: Vec<IdSet>,
    /// All files, predecessors before dependents.
    pub file_order: Vec<FileId>,
}

/// Run the single inference pass over modules in topological order.
pub(crate) fn infer(graph: &ModuleGraph, decls: &[ModuleDecl]) -> Result<Inference, SolveError> {
    let mut registry = FileRegistry::new();
    let mut preds: Vec<IdSet> = Vec::new();
    let mut needed_in: Vec<IdSet> = Vec::new();

    // Per-module "seen" sets, grown while walking that module's own files
    // and seeded from its direct deps. Namespaced files are deliberately
    // not carried across modules: each module brings its own already
    // dependency-ordered namespaced list.
    let mut uncompiled_seen: Vec<IdSet> = vec![IdSet::new(); graph.len()];
    let mut through_non_namespaced_seen: Vec<IdSet> = vec![IdSet::new(); graph.len()];

    for &m in graph.topo_order() {
        let mut uncompiled = IdSet::new();
        let mut through_non_namespaced = IdSet::new();
        for dep in graph.direct_deps(m).iter() {
            uncompiled.union_into(&uncompiled_seen[dep as usize]);
            through_non_namespaced.union_into(&through_non_namespaced_seen[dep as usize]);
        }
        let mut namespaced_local = IdSet::new();

        // The virtual root owns no declared files.
        if let Some(decl) = decls.get(m.0 as usize) {
            for path in &decl.uncompiled {
                let before = uncompiled.clone();
                let id = observe(
                    &mut registry,
                    &mut preds,
                    &mut needed_in,
                    path,
                    CompileClass::Uncompiled,
                    before,
                    m,
                )?;
                uncompiled.insert(id.0);
                through_non_namespaced.insert(id.0);
            }
            for path in &decl.non_namespaced {
                let before = through_non_namespaced.clone();
                let id = observe(
                    &mut registry,
                    &mut preds,
                    &mut needed_in,
                    path,
                    CompileClass::NonNamespaced,
                    before,
                    m,
                )?;
                through_non_namespaced.insert(id.0);
            }
            for path in &decl.namespaced_ordered {
                let mut before = through_non_namespaced.clone();
                before.union_into(&namespaced_local);
                let id = observe(
                    &mut registry,
                    &mut preds,
                    &mut needed_in,
                    path,
                    CompileClass::Namespaced,
                    before,
                    m,
                )?;
                namespaced_local.insert(id.0);
            }
        }

        uncompiled_seen[m.0 as usize] = uncompiled;
        through_non_namespaced_seen[m.0 as usize] = through_non_namespaced;
    }

    // The predecessor relation itself must be acyclic; a cycle means the
    // declared orderings contradict each other.
    let file_order = match topological_sort(&preds) {
        Ok(order) => order.into_iter().map(FileId).collect(),
        Err(remaining) => {
            return Err(SolveError::InferredFileCycle {
                paths: remaining
                    .into_iter()
                    .map(|id| registry.path(FileId(id)).to_string())
                    .collect(),
            });
        }
    };

    Ok(Inference {
        registry,
        preds,
        needed_in,
        file_order,
    })
}

/// Record one occurrence of a file: intern it, fold `before` into its
/// inferred predecessors, and mark it needed in `module`.
fn observe(
    registry: &mut FileRegistry,
    preds: &mut Vec<IdSet>,
    needed_in: &mut Vec<IdSet>,
    path: &str,
    class: CompileClass,
    before: IdSet,
    module: ModuleId,
) -> Result<FileId, SolveError> {
    let (id, first_seen) = registry.record(path, class)?;
    if first_seen {
        preds.push(before);
        needed_in.push(IdSet::new());
    } else {
        preds[id.0 as usize].intersect_with(&before);
    }
    needed_in[id.0 as usize].insert(module.0);
    Ok(id)
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
