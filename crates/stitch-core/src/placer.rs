//! File placement: lowest-common-ancestor selection and needed-in
//! propagation.
//!
//! Files are visited deepest dependents first (reverse of the inferred
//! predecessor order), so by the time a predecessor is placed every one of
//! its dependents has already pushed its placement module into the
//! predecessor's needed-in set.

use std::collections::HashMap;

use crate::graph::IdSet;
use crate::module_graph::{ModuleGraph, ModuleId};
use crate::order::Inference;
use crate::registry::{CompileClass, FileId};

/// Per-module file buckets, in reverse placement order. The emitter reverses
/// each bucket, which restores the forward predecessor order restricted to
/// that module.
#[derive(Debug)]
pub(crate) struct Placement {
    pub compiled: Vec<Vec<FileId>>,
    pub dont_compile: Vec<Vec<FileId>>,
    /// Files that ended up outside every module that declared them, with
    /// their destination. Reverse placement order, like the buckets.
    pub moves: Vec<(FileId, ModuleId)>,
}

/// Assign every file to exactly one module.
pub(crate) fn place(graph: &ModuleGraph, inference: &mut Inference) -> Placement {
    let mut placement = Placement {
        compiled: vec![Vec::new(); graph.len()],
        dont_compile: vec![Vec::new(); graph.len()],
        moves: Vec::new(),
    };
    // The needed-in sets as inference left them; placement grows the live
    // sets, and a file counts as moved only against where it was declared.
    let declared: Vec<IdSet> = inference.needed_in.clone();
    // Candidate sets depend only on the exact needed-in set, which repeats a
    // lot across files of the same module, so memoize on the sorted ids.
    let mut lowest_memo: HashMap<Vec<u32>, IdSet> = HashMap::new();

    for idx in (0..inference.file_order.len()).rev() {
        let file = inference.file_order[idx];
        let needed = &inference.needed_in[file.0 as usize];
        let candidates = lowest_memo
            .entry(needed.as_slice().to_vec())
            .or_insert_with(|| lowest_common_ancestors(graph, needed))
            .clone();
        let target = select(inference, file, &candidates);

        match inference.registry.class(file) {
            CompileClass::Uncompiled => placement.dont_compile[target.0 as usize].push(file),
            CompileClass::NonNamespaced | CompileClass::Namespaced => {
                placement.compiled[target.0 as usize].push(file)
            }
        }
        if !declared[file.0 as usize].contains(target.0) {
            placement.moves.push((file, target));
        }

        // Placing a file above every module that declared it drags its
        // predecessors along: they must be loadable from the same module.
        if inference.needed_in[file.0 as usize].insert(target.0) {
            let preds = inference.preds[file.0 as usize].clone();
            for p in preds.iter() {
                inference.needed_in[p as usize].insert(target.0);
            }
        }
    }

    placement
}

/// The deepest modules ancestral to every module in `needed`: intersect the
/// transitive-ancestor sets, then keep the members with the largest ancestor
/// set of their own (a larger set means deeper in the DAG).
fn lowest_common_ancestors(graph: &ModuleGraph, needed: &IdSet) -> IdSet {
    let mut common: Option<IdSet> = None;
    for m in needed.iter() {
        let ancestors = graph.ancestors(ModuleId(m));
        common = Some(match common {
            None => ancestors.clone(),
            Some(acc) => acc.intersect(ancestors),
        });
    }
    let common = common.unwrap_or_default();

    let max_depth = common
        .iter()
        .map(|m| graph.ancestors(ModuleId(m)).len())
        .max()
        .unwrap_or(0);
    common
        .iter()
        .filter(|&m| graph.ancestors(ModuleId(m)).len() == max_depth)
        .collect()
}

/// Pick one module out of the lowest candidates: fewest predecessor moves
/// first, lowest module id (declaration order) as the final tie-break.
fn select(inference: &Inference, file: FileId, candidates: &IdSet) -> ModuleId {
    debug_assert!(!candidates.is_empty(), "every needed-in set shares a base module");
    if candidates.len() == 1 {
        return ModuleId(candidates.iter().next().expect("len checked"));
    }
    let moves_required = |m: u32| {
        inference.preds[file.0 as usize]
            .iter()
            .filter(|&p| !inference.needed_in[p as usize].contains(m))
            .count()
    };
    candidates
        .iter()
        .map(|m| (moves_required(m), m))
        .min()
        .map(|(_, m)| ModuleId(m))
        .expect("candidates checked non-empty")
}

#[cfg(test)]
#[path = "placer_tests.rs"]
mod tests;
