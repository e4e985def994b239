//! The module DAG: ingestion, validation, virtual root, ancestor sets.

use std::collections::HashMap;

use crate::ModuleDecl;
use crate::error::SolveError;
use crate::graph::{IdSet, topological_sort};

/// Name of the module synthesized when the declared graph has several roots.
pub const VIRTUAL_BASE_MODULE: &str = "virtual_base_module";

/// Dense identifier for a module, assigned in declaration order. The virtual
/// root, when synthesized, takes the next id after all declared modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(pub u32);

#[derive(Debug)]
struct ModuleNode {
    name: String,
    /// Outgoing edges: modules that must be loaded before this one.
    direct_deps: IdSet,
    /// Transitive ancestors, including self.
    ancestors: IdSet,
    /// Declared with zero direct deps (flag survives virtual-root injection).
    declared_root: bool,
}

/// A validated, topologically sorted module DAG.
///
/// Built once from the declared module list and never mutated afterwards.
/// Module names must be unique; the configuration layer feeds them from a
/// TOML table, which already guarantees that.
#[derive(Debug)]
pub struct ModuleGraph {
    nodes: Vec<ModuleNode>,
    topo: Vec<ModuleId>,
    virtual_root: Option<ModuleId>,
}

impl ModuleGraph {
    /// Build and validate the DAG for the declared modules.
    ///
    /// Performs, in order: name interning and dep resolution, virtual-root
    /// injection when two or more roots exist, topological sorting,
    /// transitive-ancestor computation, and the root-uniqueness check.
    pub fn build(decls: &[ModuleDecl]) -> Result<Self, SolveError> {
        let mut by_name: HashMap<&str, ModuleId> = HashMap::with_capacity(decls.len());
        for (idx, decl) in decls.iter().enumerate() {
            by_name.insert(decl.name.as_str(), ModuleId(idx as u32));
        }

        let mut nodes = Vec::with_capacity(decls.len() + 1);
        for decl in decls {
            let mut direct_deps = IdSet::new();
            for dep in &decl.direct_deps {
                let Some(&id) = by_name.get(dep.as_str()) else {
                    return Err(SolveError::UnknownDepModule {
                        module: decl.name.clone(),
                        dep: dep.clone(),
                    });
                };
                direct_deps.insert(id.0);
            }
            nodes.push(ModuleNode {
                name: decl.name.clone(),
                declared_root: direct_deps.is_empty(),
                direct_deps,
                ancestors: IdSet::new(),
            });
        }

        let declared_roots: Vec<u32> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.declared_root)
            .map(|(i, _)| i as u32)
            .collect();

        // With a single root the DAG already has a unique base. With several,
        // synthesize one and hang every declared root off it.
        let mut virtual_root = None;
        if declared_roots.len() > 1 {
            let vid = nodes.len() as u32;
            for &root in &declared_roots {
                nodes[root as usize].direct_deps.insert(vid);
            }
            nodes.push(ModuleNode {
                name: VIRTUAL_BASE_MODULE.into(),
                direct_deps: IdSet::new(),
                ancestors: IdSet::new(),
                declared_root: false,
            });
            virtual_root = Some(ModuleId(vid));
        }

        let adjacency: Vec<IdSet> = nodes.iter().map(|n| n.direct_deps.clone()).collect();
        let topo = match topological_sort(&adjacency) {
            Ok(order) => order.into_iter().map(ModuleId).collect::<Vec<_>>(),
            Err(remaining) => {
                return Err(SolveError::ModuleCycle {
                    names: remaining
                        .into_iter()
                        .map(|id| nodes[id as usize].name.clone())
                        .collect(),
                });
            }
        };

        // Deps precede their dependents in topo order, so one pass suffices.
        for &m in &topo {
            let mut ancestors = IdSet::new();
            ancestors.insert(m.0);
            for dep in nodes[m.0 as usize].direct_deps.clone().iter() {
                ancestors.union_into(&nodes[dep as usize].ancestors);
            }
            nodes[m.0 as usize].ancestors = ancestors;
        }

        let roots: IdSet = declared_roots.iter().copied().collect();
        for node in &nodes {
            let reachable = node.ancestors.intersect(&roots);
            if reachable.len() > 1 {
                return Err(SolveError::MultipleRoots {
                    module: node.name.clone(),
                    roots: reachable
                        .iter()
                        .map(|id| nodes[id as usize].name.clone())
                        .collect(),
                });
            }
        }

        Ok(Self {
            nodes,
            topo,
            virtual_root,
        })
    }

    /// Number of modules, including the virtual root when present.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn name(&self, m: ModuleId) -> &str {
        &self.nodes[m.0 as usize].name
    }

    /// Modules in dependency order: every module appears after the modules
    /// it must be loaded after, roots first.
    pub fn topo_order(&self) -> &[ModuleId] {
        &self.topo
    }

    pub fn direct_deps(&self, m: ModuleId) -> &IdSet {
        &self.nodes[m.0 as usize].direct_deps
    }

    /// Transitive ancestors of `m`, including `m` itself.
    pub fn ancestors(&self, m: ModuleId) -> &IdSet {
        &self.nodes[m.0 as usize].ancestors
    }

    pub fn virtual_root(&self) -> Option<ModuleId> {
        self.virtual_root
    }
}

#[cfg(test)]
#[path = "module_graph_tests.rs"]
mod tests;
