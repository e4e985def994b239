//! The stitch.toml schema.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A parsed stitch.toml.
///
/// Modules live in a sorted map, so module declaration order (and with it
/// every downstream identifier) is the lexicographic name order, stable
/// across runs and machines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub project: ProjectMeta,
    #[serde(default)]
    pub compilation: CompilationConfig,
    #[serde(default)]
    pub compilers: CompilerPaths,
    #[serde(default)]
    pub css: Option<CssConfig>,
    #[serde(default)]
    pub soy: Option<SoyConfig>,
    /// Globs for externs files handed to the JS compiler.
    #[serde(default)]
    pub externs: Vec<String>,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub name: String,
    #[serde(default = "default_root_src_dir")]
    pub root_src_dir: PathBuf,
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_root_src_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("build/tmp")
}

/// How hard the JS compiler squeezes the sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileMode {
    /// Concatenate without compiling.
    Raw,
    /// Whitespace and simple optimizations.
    Simple,
    /// Full renaming and dead-code removal.
    Advanced,
}

/// Which artifact flavors a build produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputVariant {
    Debug,
    Release,
    Both,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationConfig {
    #[serde(default = "default_mode")]
    pub mode: CompileMode,
    #[serde(default = "default_output")]
    pub output: OutputVariant,
}

fn default_mode() -> CompileMode {
    CompileMode::Simple
}

fn default_output() -> OutputVariant {
    OutputVariant::Release
}

impl Default for CompilationConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            output: default_output(),
        }
    }
}

/// Locations of the external compiler jars and the JVM.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilerPaths {
    /// Explicit JVM path; otherwise `java` is located on PATH.
    #[serde(default)]
    pub java: Option<PathBuf>,
    #[serde(default)]
    pub closure_jar: Option<PathBuf>,
    #[serde(default)]
    pub stylesheets_jar: Option<PathBuf>,
    #[serde(default)]
    pub soy_jar: Option<PathBuf>,
    /// Extra flags appended to every JS compiler invocation.
    #[serde(default)]
    pub extra_js_flags: Vec<String>,
    /// Extra flags appended to every stylesheet compiler invocation.
    #[serde(default)]
    pub extra_css_flags: Vec<String>,
}

/// The project's single CSS module, compiled ahead of the JS modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CssConfig {
    pub name: String,
    /// Files or globs, in declared order.
    pub inputs: Vec<String>,
    /// Produce a class-renaming map and feed it to the JS compilation.
    #[serde(default)]
    pub rename_classes: bool,
}

/// Soy templates precompiled to JS before namespace resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoyConfig {
    /// Files or globs, in declared order.
    pub inputs: Vec<String>,
}

/// One JS output module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Modules always loaded before this one.
    #[serde(default)]
    pub deps: Vec<String>,
    /// Files or globs served as-is, never compiled.
    #[serde(default)]
    pub uncompiled: Vec<String>,
    /// Files or globs compiled without namespace management.
    #[serde(default)]
    pub non_namespaced: Vec<String>,
    /// Entry namespaces; the resolver expands them to dependency-ordered
    /// file lists.
    #[serde(default)]
    pub root_namespaces: Vec<String>,
}

impl BuildConfig {
    /// Load and parse a stitch.toml.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: BuildConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Whether any input needs the JS compiler (everything except raw mode).
    pub fn compiles_js(&self) -> bool {
        self.compilation.mode != CompileMode::Raw
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
