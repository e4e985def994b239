//! Project configuration loading and validation (stitch.toml).

mod config;
mod validate;

pub use config::{
    BuildConfig, CompilationConfig, CompileMode, CompilerPaths, CssConfig, ModuleConfig,
    OutputVariant, ProjectMeta, SoyConfig,
};
pub use validate::{Severity, ValidationIssue, has_errors, validate_config};
