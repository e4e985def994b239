//! Identifier sets and topological sorting.
//!
//! Modules and files both live in flat arenas addressed by dense `u32`
//! identifiers, so every relationship in the solver is a set of ids. Sets are
//! kept as sorted vectors: iteration order is the identifier order, which
//! makes every downstream traversal deterministic without extra sorting.

/// A set of dense identifiers, stored sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet {
    items: Vec<u32>,
}

impl IdSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Insert an id, returning `true` if it was not already present.
    pub fn insert(&mut self, id: u32) -> bool {
        match self.items.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.items.insert(pos, id);
                true
            }
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.items.binary_search(&id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.items.iter().copied()
    }

    /// Intersection, walking the smaller set and probing the larger.
    pub fn intersect(&self, other: &IdSet) -> IdSet {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        let items = small
            .items
            .iter()
            .copied()
            .filter(|id| large.contains(*id))
            .collect();
        IdSet { items }
    }

    /// Replace `self` with its intersection with `other`.
    pub fn intersect_with(&mut self, other: &IdSet) {
        self.items.retain(|id| other.contains(*id));
    }

    /// Merge all ids from `src` into `self`.
    pub fn union_into(&mut self, src: &IdSet) {
        if src.is_empty() {
            return;
        }
        let mut merged = Vec::with_capacity(self.items.len() + src.items.len());
        let (mut a, mut b) = (self.items.iter().peekable(), src.items.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (Some(&&x), Some(&&y)) => {
                    if x < y {
                        merged.push(x);
                        a.next();
                    } else if y < x {
                        merged.push(y);
                        b.next();
                    } else {
                        merged.push(x);
                        a.next();
                        b.next();
                    }
                }
                (Some(&&x), None) => {
                    merged.push(x);
                    a.next();
                }
                (None, Some(&&y)) => {
                    merged.push(y);
                    b.next();
                }
                (None, None) => break,
            }
        }
        self.items = merged;
    }

    /// The sorted id sequence itself; doubles as a memoization key.
    pub fn as_slice(&self) -> &[u32] {
        &self.items
    }
}

impl FromIterator<u32> for IdSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut items: Vec<u32> = iter.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        IdSet { items }
    }
}

/// Topological sort over adjacency sets, leaves-first.
///
/// `adjacency[n]` is the set of outgoing edges of node `n`; every node appears
/// in the result after all nodes in its outgoing set. Among the nodes ready at
/// any step the lowest id is taken first, so the order is deterministic.
///
/// Fails with the sorted remaining nodes if the graph has a cycle.
pub fn topological_sort(adjacency: &[IdSet]) -> Result<Vec<u32>, Vec<u32>> {
    let n = adjacency.len();
    let mut pending: Vec<usize> = adjacency.iter().map(IdSet::len).collect();
    let mut dependents: Vec<Vec<u32>> = vec![Vec::new(); n];
    for (node, out) in adjacency.iter().enumerate() {
        for dep in out.iter() {
            dependents[dep as usize].push(node as u32);
        }
    }

    let mut ready = std::collections::BinaryHeap::new();
    for (node, count) in pending.iter().enumerate() {
        if *count == 0 {
            ready.push(std::cmp::Reverse(node as u32));
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(std::cmp::Reverse(node)) = ready.pop() {
        order.push(node);
        for &dependent in &dependents[node as usize] {
            let count = &mut pending[dependent as usize];
            *count -= 1;
            if *count == 0 {
                ready.push(std::cmp::Reverse(dependent));
            }
        }
    }

    if order.len() == n {
        Ok(order)
    } else {
        let emitted: IdSet = order.iter().copied().collect();
        let remaining = (0..n as u32).filter(|id| !emitted.contains(*id)).collect();
        Err(remaining)
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
