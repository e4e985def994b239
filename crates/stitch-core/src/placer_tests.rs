use super::*;

use crate::ModuleDecl;
use crate::module_graph::ModuleGraph;
use crate::order::infer;

fn module(name: &str, deps: &[&str], namespaced: &[&str]) -> ModuleDecl {
    ModuleDecl {
        name: name.into(),
        direct_deps: deps.iter().map(|d| d.to_string()).collect(),
        namespaced_ordered: namespaced.iter().map(|f| f.to_string()).collect(),
        ..Default::default()
    }
}

fn solve_internals(decls: &[ModuleDecl]) -> (ModuleGraph, Inference, Placement) {
    let graph = ModuleGraph::build(decls).unwrap();
    let mut inference = infer(&graph, decls).unwrap();
    let placement = place(&graph, &mut inference);
    (graph, inference, placement)
}

fn bucket_paths(inference: &Inference, bucket: &[FileId]) -> Vec<String> {
    bucket
        .iter()
        .rev()
        .map(|&f| inference.registry.path(f).to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Lowest common ancestors
// ---------------------------------------------------------------------------

#[test]
fn test_lca_of_single_module_is_itself() {
    let decls = [
        module("base", &[], &[]),
        module("client", &["base"], &[]),
    ];
    let graph = ModuleGraph::build(&decls).unwrap();
    let needed: IdSet = [1].into_iter().collect();
    assert_eq!(lowest_common_ancestors(&graph, &needed).as_slice(), &[1]);
}

#[test]
fn test_lca_of_siblings_is_their_parent() {
    let decls = [
        module("base", &[], &[]),
        module("client", &["base"], &[]),
        module("server", &["base"], &[]),
    ];
    let graph = ModuleGraph::build(&decls).unwrap();
    let needed: IdSet = [1, 2].into_iter().collect();
    assert_eq!(lowest_common_ancestors(&graph, &needed).as_slice(), &[0]);
}

#[test]
fn test_lca_can_be_a_set_of_equally_deep_modules() {
    // base -> {a, b} -> {c, d}: both a and b are lowest common ancestors
    // of {c, d}.
    let decls = [
        module("base", &[], &[]),
        module("a", &["base"], &[]),
        module("b", &["base"], &[]),
        module("c", &["a", "b"], &[]),
        module("d", &["a", "b"], &[]),
    ];
    let graph = ModuleGraph::build(&decls).unwrap();
    let needed: IdSet = [3, 4].into_iter().collect();
    assert_eq!(lowest_common_ancestors(&graph, &needed).as_slice(), &[1, 2]);
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

#[test]
fn test_unique_files_stay_in_their_module() {
    let decls = [
        module("base", &[], &["base.js"]),
        module("client", &["base"], &["client.js"]),
    ];
    let (_, inference, placement) = solve_internals(&decls);
    assert_eq!(bucket_paths(&inference, &placement.compiled[0]), vec!["base.js"]);
    assert_eq!(bucket_paths(&inference, &placement.compiled[1]), vec!["client.js"]);
}

#[test]
fn test_shared_file_hoists_to_lca() {
    let decls = [
        module("base", &[], &["base.js"]),
        module("middle", &["base"], &["middle.js"]),
        module("client", &["middle"], &["common.js", "client.js"]),
        module("server", &["middle"], &["common.js", "server.js"]),
    ];
    let (_, inference, placement) = solve_internals(&decls);
    assert_eq!(
        bucket_paths(&inference, &placement.compiled[1]),
        vec!["middle.js", "common.js"]
    );
    assert_eq!(bucket_paths(&inference, &placement.compiled[2]), vec!["client.js"]);
    assert_eq!(bucket_paths(&inference, &placement.compiled[3]), vec!["server.js"]);
}

#[test]
fn test_uncompiled_files_go_to_the_dont_compile_bucket() {
    let mut base = module("base", &[], &["base.js"]);
    base.uncompiled = vec!["raw.js".into()];
    let (_, inference, placement) = solve_internals(&[base]);
    assert_eq!(bucket_paths(&inference, &placement.dont_compile[0]), vec!["raw.js"]);
    assert_eq!(bucket_paths(&inference, &placement.compiled[0]), vec!["base.js"]);
}

#[test]
fn test_tie_break_minimizes_predecessor_movement() {
    // common.js requires b.js, which lives only in B. Both A and B are
    // lowest common ancestors of {C, D}; B needs no extra movement.
    let decls = [
        module("base", &[], &["base.js"]),
        module("a", &["base"], &["a.js"]),
        module("b", &["base"], &["b.js"]),
        module("c", &["a", "b"], &["b.js", "common.js", "c.js"]),
        module("d", &["a", "b"], &["b.js", "common.js", "d.js"]),
    ];
    let (_, inference, placement) = solve_internals(&decls);
    let in_b = bucket_paths(&inference, &placement.compiled[2]);
    assert!(in_b.contains(&"common.js".to_string()), "common.js not in b: {in_b:?}");
    assert_eq!(in_b, vec!["b.js", "common.js"]);
}

#[test]
fn test_tie_break_follows_the_required_predecessor() {
    // Mirror image: common.js requires a.js instead, so A wins.
    let decls = [
        module("base", &[], &["base.js"]),
        module("a", &["base"], &["a.js"]),
        module("b", &["base"], &["b.js"]),
        module("c", &["a", "b"], &["a.js", "common.js", "c.js"]),
        module("d", &["a", "b"], &["a.js", "common.js", "d.js"]),
    ];
    let (_, inference, placement) = solve_internals(&decls);
    assert_eq!(
        bucket_paths(&inference, &placement.compiled[1]),
        vec!["a.js", "common.js"]
    );
}

#[test]
fn test_placement_propagates_needed_in_to_predecessors() {
    // dep.js is declared only in client and server (before common.js);
    // hoisting common.js to base must drag dep.js along.
    let decls = [
        module("base", &[], &["base.js"]),
        module("client", &["base"], &["dep.js", "common.js", "client.js"]),
        module("server", &["base"], &["dep.js", "common.js", "server.js"]),
    ];
    let (_, inference, placement) = solve_internals(&decls);
    let in_base = bucket_paths(&inference, &placement.compiled[0]);
    assert_eq!(in_base, vec!["base.js", "dep.js", "common.js"]);

    let dep = inference.registry.lookup("dep.js").unwrap();
    assert!(inference.needed_in[dep.0 as usize].contains(0));

    // Both the hoisted file and the predecessor it dragged along count as
    // moves into base.
    let common = inference.registry.lookup("common.js").unwrap();
    assert!(placement.moves.contains(&(common, ModuleId(0))));
    assert!(placement.moves.contains(&(dep, ModuleId(0))));
}

#[test]
fn test_equal_moves_tie_breaks_on_declaration_order() {
    // common.js has no predecessors at all, so both a and b require zero
    // moves; the earlier-declared module wins deterministically.
    let decls = [
        module("base", &[], &[]),
        module("a", &["base"], &[]),
        module("b", &["base"], &[]),
        module("c", &["a", "b"], &["common.js"]),
        module("d", &["a", "b"], &["common.js"]),
    ];
    let (_, inference, placement) = solve_internals(&decls);
    assert_eq!(bucket_paths(&inference, &placement.compiled[1]), vec!["common.js"]);
    assert!(placement.compiled[2].is_empty());
}
