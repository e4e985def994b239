//! File interning and compile-class tracking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// How a file is fed to the external compilers.
///
/// The class also fixes the staged load order inside a module: all
/// `Uncompiled` files load before any `NonNamespaced` files, which load
/// before any `Namespaced` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileClass {
    Uncompiled,
    NonNamespaced,
    Namespaced,
}

/// Dense identifier for an interned file, assigned in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub u32);

#[derive(Debug)]
struct FileRecord {
    path: String,
    class: CompileClass,
}

/// Interns file paths to dense identifiers on first occurrence.
///
/// Paths arrive already normalized to `/` separators; the registry stores
/// them verbatim. A path offered again with a different compile class is a
/// configuration error.
#[derive(Debug, Default)]
pub struct FileRegistry {
    records: Vec<FileRecord>,
    by_path: HashMap<String, FileId>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `path` under `class`, returning the id and whether this was
    /// the first occurrence.
    pub fn record(&mut self, path: &str, class: CompileClass) -> Result<(FileId, bool), SolveError> {
        if let Some(&id) = self.by_path.get(path) {
            if self.records[id.0 as usize].class != class {
                return Err(SolveError::MixedCompileClass { path: path.into() });
            }
            return Ok((id, false));
        }
        let id = FileId(self.records.len() as u32);
        self.records.push(FileRecord {
            path: path.into(),
            class,
        });
        self.by_path.insert(path.into(), id);
        Ok((id, true))
    }

    pub fn lookup(&self, path: &str) -> Option<FileId> {
        self.by_path.get(path).copied()
    }

    pub fn path(&self, id: FileId) -> &str {
        &self.records[id.0 as usize].path
    }

    pub fn class(&self, id: FileId) -> CompileClass {
        self.records[id.0 as usize].class
    }

    /// Number of unique files interned so far.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
