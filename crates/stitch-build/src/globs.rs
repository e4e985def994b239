//! Input-pattern expansion.
//!
//! Module input lists mix literal file paths and glob patterns. Literals
//! must exist; a pattern matching nothing is only suspicious. Output paths
//! are root-joined, `/`-separated, and deduplicated preserving the first
//! occurrence, which is the declaration order the solver relies on.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::warn;

/// Expand file-or-pattern strings against `root`.
pub fn expand_patterns(root: &Path, patterns: &[String]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();

    for pattern in patterns {
        if is_glob(pattern) {
            let full = normalize(&root.join(pattern));
            let mut matches = Vec::new();
            for entry in
                glob::glob(&full).with_context(|| format!("invalid glob pattern '{pattern}'"))?
            {
                let path = entry.with_context(|| format!("failed to expand '{pattern}'"))?;
                if path.is_file() {
                    matches.push(normalize(&path));
                }
            }
            if matches.is_empty() {
                warn!(pattern = %pattern, "glob matched no files");
            }
            matches.sort();
            for path in matches {
                if seen.insert(path.clone()) {
                    out.push(path);
                }
            }
        } else {
            let full = root.join(pattern);
            if !full.is_file() {
                bail!("input file {} does not exist", full.display());
            }
            let path = normalize(&full);
            if seen.insert(path.clone()) {
                out.push(path);
            }
        }
    }

    Ok(out)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// `/`-separated rendering of a path.
pub fn normalize(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Recursively collect every `.js` file under `root`, sorted, skipping the
/// given directories (the build tree must not feed itself).
pub fn collect_js_sources(root: &Path, skip: &[&Path]) -> Result<Vec<String>> {
    let mut files = Vec::new();
    walk(root, skip, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, skip: &[&Path], out: &mut Vec<String>) -> Result<()> {
    if skip.iter().any(|s| dir.starts_with(s)) {
        return Ok(());
    }
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, skip, out)?;
        } else if path.extension().is_some_and(|ext| ext == "js") {
            out.push(normalize(&path));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "globs_tests.rs"]
mod tests;
