//! Closure-namespace dependency resolution.
//!
//! Scans sources for `goog.provide` / `goog.require` lines (and their
//! `goog.module` / `goog.module.get` equivalents) and expands each module's
//! root namespaces into the transitive, dependency-ordered file list the
//! solver consumes. No JavaScript parsing happens here; the two line
//! patterns are the entire contract, as with the classic deps writers.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static PROVIDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*goog\.(?:provide|module)\(\s*['"]([^'"]+)['"]\s*\)"#)
        .expect("static regex")
});

static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*(?:(?:const|let|var)\s+[\w$]+\s*=\s*)?goog\.(?:require|module\.get)\(\s*['"]([^'"]+)['"]\s*\)"#)
        .expect("static regex")
});

/// Failures while scanning sources or expanding root namespaces.
#[derive(thiserror::Error, Debug)]
pub enum NamespaceError {
    #[error("namespace '{namespace}' is provided by both {first} and {second}")]
    DuplicateProvide {
        namespace: String,
        first: String,
        second: String,
    },

    #[error("namespace '{namespace}' required by {required_by} is not provided by any source")]
    UnknownNamespace {
        namespace: String,
        required_by: String,
    },

    #[error("namespace require cycle: {}", chain.join(" -> "))]
    RequireCycle { chain: Vec<String> },

    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Which namespaces every scanned file provides and requires.
#[derive(Debug, Default)]
pub struct NamespaceIndex {
    /// Namespace to the single file providing it.
    provides: HashMap<String, String>,
    /// File to the namespaces it requires, in source order.
    requires: HashMap<String, Vec<String>>,
}

impl NamespaceIndex {
    /// Scan the given files (paths as handed to the compiler).
    pub fn scan(files: &[String]) -> Result<Self, NamespaceError> {
        let mut index = NamespaceIndex::default();
        for path in files {
            let content = std::fs::read_to_string(path).map_err(|source| {
                NamespaceError::Read {
                    path: path.clone(),
                    source,
                }
            })?;
            index.scan_source(path, &content)?;
        }
        Ok(index)
    }

    /// Index one file's provide/require lines.
    pub fn scan_source(&mut self, path: &str, content: &str) -> Result<(), NamespaceError> {
        for capture in PROVIDE_RE.captures_iter(content) {
            let namespace = capture[1].to_string();
            if let Some(first) = self.provides.get(&namespace) {
                if first != path {
                    return Err(NamespaceError::DuplicateProvide {
                        namespace,
                        first: first.clone(),
                        second: path.to_string(),
                    });
                }
                continue;
            }
            self.provides.insert(namespace, path.to_string());
        }

        let requires = self.requires.entry(path.to_string()).or_default();
        for capture in REQUIRE_RE.captures_iter(content) {
            let namespace = capture[1].to_string();
            if !requires.contains(&namespace) {
                requires.push(namespace);
            }
        }
        Ok(())
    }

    /// Number of provided namespaces.
    pub fn len(&self) -> usize {
        self.provides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provides.is_empty()
    }

    /// Expand root namespaces into the transitive file list, dependencies
    /// first. `origin` names the requester in error messages (a module
    /// name, typically). Files providing several of the visited namespaces
    /// are emitted once.
    pub fn resolve(
        &self,
        root_namespaces: &[String],
        origin: &str,
    ) -> Result<Vec<String>, NamespaceError> {
        let mut walk = Walk {
            index: self,
            output: Vec::new(),
            state: HashMap::new(),
            stack: Vec::new(),
        };
        for namespace in root_namespaces {
            walk.visit(namespace, origin)?;
        }
        Ok(walk.output)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum VisitState {
    InProgress,
    Done,
}

struct Walk<'a> {
    index: &'a NamespaceIndex,
    output: Vec<String>,
    /// Per provider file, whether it is on the current path or finished.
    state: HashMap<&'a str, VisitState>,
    /// Namespace chain of the current path, for cycle reporting.
    stack: Vec<&'a str>,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, namespace: &str, required_by: &str) -> Result<(), NamespaceError> {
        let Some((provided, file)) = self.index.provides.get_key_value(namespace) else {
            return Err(NamespaceError::UnknownNamespace {
                namespace: namespace.to_string(),
                required_by: required_by.to_string(),
            });
        };
        match self.state.get(file.as_str()) {
            Some(VisitState::Done) => return Ok(()),
            Some(VisitState::InProgress) => {
                let from = self
                    .stack
                    .iter()
                    .position(|ns| self.index.provides[*ns] == *file)
                    .unwrap_or(0);
                let mut chain: Vec<String> =
                    self.stack[from..].iter().map(|ns| ns.to_string()).collect();
                chain.push(namespace.to_string());
                return Err(NamespaceError::RequireCycle { chain });
            }
            None => {}
        }

        self.state.insert(file, VisitState::InProgress);
        self.stack.push(provided);
        if let Some(requires) = self.index.requires.get(file) {
            for required in requires {
                self.visit(required, file)?;
            }
        }
        self.stack.pop();
        self.state.insert(file, VisitState::Done);
        self.output.push(file.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "namespaces_tests.rs"]
mod tests;
