use super::*;

// ---------------------------------------------------------------------------
// IdSet
// ---------------------------------------------------------------------------

#[test]
fn test_insert_keeps_sorted_order() {
    let mut set = IdSet::new();
    assert!(set.insert(5));
    assert!(set.insert(1));
    assert!(set.insert(3));
    assert!(!set.insert(3));
    assert_eq!(set.as_slice(), &[1, 3, 5]);
    assert_eq!(set.len(), 3);
}

#[test]
fn test_contains() {
    let set: IdSet = [2, 4, 6].into_iter().collect();
    assert!(set.contains(4));
    assert!(!set.contains(5));
    assert!(!IdSet::new().contains(0));
}

#[test]
fn test_intersect() {
    let a: IdSet = [1, 2, 3, 5, 8].into_iter().collect();
    let b: IdSet = [2, 3, 7, 8].into_iter().collect();
    assert_eq!(a.intersect(&b).as_slice(), &[2, 3, 8]);
    assert_eq!(b.intersect(&a).as_slice(), &[2, 3, 8]);
    assert!(a.intersect(&IdSet::new()).is_empty());
}

#[test]
fn test_intersect_with_in_place() {
    let mut a: IdSet = [1, 2, 3, 4].into_iter().collect();
    let b: IdSet = [2, 4, 9].into_iter().collect();
    a.intersect_with(&b);
    assert_eq!(a.as_slice(), &[2, 4]);
}

#[test]
fn test_union_into() {
    let mut a: IdSet = [1, 4, 6].into_iter().collect();
    let b: IdSet = [2, 4, 7].into_iter().collect();
    a.union_into(&b);
    assert_eq!(a.as_slice(), &[1, 2, 4, 6, 7]);

    let mut empty = IdSet::new();
    empty.union_into(&a);
    assert_eq!(empty.as_slice(), a.as_slice());
}

#[test]
fn test_from_iter_dedupes() {
    let set: IdSet = [3, 1, 3, 2, 1].into_iter().collect();
    assert_eq!(set.as_slice(), &[1, 2, 3]);
}

// ---------------------------------------------------------------------------
// Topological sort
// ---------------------------------------------------------------------------

fn adjacency(edges: &[&[u32]]) -> Vec<IdSet> {
    edges
        .iter()
        .map(|out| out.iter().copied().collect())
        .collect()
}

#[test]
fn test_toposort_empty() {
    assert_eq!(topological_sort(&[]), Ok(vec![]));
}

#[test]
fn test_toposort_chain() {
    // 0 -> 1 -> 2 (edges point at what must come first)
    let adj = adjacency(&[&[1], &[2], &[]]);
    assert_eq!(topological_sort(&adj), Ok(vec![2, 1, 0]));
}

#[test]
fn test_toposort_diamond_is_deterministic() {
    // 3 depends on 1 and 2, which both depend on 0.
    let adj = adjacency(&[&[], &[0], &[0], &[1, 2]]);
    assert_eq!(topological_sort(&adj), Ok(vec![0, 1, 2, 3]));
}

#[test]
fn test_toposort_every_node_after_its_edges() {
    let adj = adjacency(&[&[2, 4], &[0], &[], &[1], &[2]]);
    let order = topological_sort(&adj).unwrap();
    let position = |id: u32| order.iter().position(|&n| n == id).unwrap();
    for (node, out) in adj.iter().enumerate() {
        for dep in out.iter() {
            assert!(
                position(dep) < position(node as u32),
                "{dep} must precede {node}"
            );
        }
    }
}

#[test]
fn test_toposort_cycle_reports_remaining() {
    // 0 <-> 1 cycle; 2 depends on the cycle, 3 is free.
    let adj = adjacency(&[&[1], &[0], &[0], &[]]);
    assert_eq!(topological_sort(&adj), Err(vec![0, 1, 2]));
}

#[test]
fn test_toposort_self_edge_is_a_cycle() {
    let adj = adjacency(&[&[0]]);
    assert_eq!(topological_sort(&adj), Err(vec![0]));
}
