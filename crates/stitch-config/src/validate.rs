//! Configuration validation.
//!
//! Structural problems the TOML parser cannot catch: missing jars for the
//! selected mode, name collisions, empty module tables. Dep-name resolution
//! is left to the solver, which reports it with full context.

use std::path::Path;

use crate::config::{BuildConfig, CompileMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One finding from [`validate_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.severity {
            Severity::Error => write!(f, "error: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Validate a loaded configuration, accumulating every finding rather than
/// stopping at the first.
pub fn validate_config(config: &BuildConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if config.project.name.is_empty() {
        issues.push(ValidationIssue::error("project.name cannot be empty"));
    }

    if config.modules.is_empty() {
        issues.push(ValidationIssue::warning(
            "no [modules.*] tables declared; the build will produce no JS artifacts",
        ));
    }

    for (name, module) in &config.modules {
        if module.deps.iter().any(|d| d == name) {
            issues.push(ValidationIssue::error(format!(
                "module '{name}' lists itself as a dep"
            )));
        }
        if module.uncompiled.is_empty()
            && module.non_namespaced.is_empty()
            && module.root_namespaces.is_empty()
        {
            issues.push(ValidationIssue::warning(format!(
                "module '{name}' declares no inputs"
            )));
        }
    }

    if let Some(css) = &config.css {
        if config.modules.contains_key(&css.name) {
            issues.push(ValidationIssue::error(format!(
                "css module '{}' collides with a JS module of the same name",
                css.name
            )));
        }
        if css.inputs.is_empty() {
            issues.push(ValidationIssue::error(
                "[css] is declared but css.inputs is empty",
            ));
        }
        require_jar(
            &mut issues,
            config.compilers.stylesheets_jar.as_deref(),
            "compilers.stylesheets_jar",
            "a [css] module",
        );
    }

    if let Some(soy) = &config.soy {
        if soy.inputs.is_empty() {
            issues.push(ValidationIssue::error(
                "[soy] is declared but soy.inputs is empty",
            ));
        }
        require_jar(
            &mut issues,
            config.compilers.soy_jar.as_deref(),
            "compilers.soy_jar",
            "[soy] inputs",
        );
    }

    if config.compilation.mode != CompileMode::Raw {
        require_jar(
            &mut issues,
            config.compilers.closure_jar.as_deref(),
            "compilers.closure_jar",
            "a compiling mode",
        );
    }

    issues
}

fn require_jar(
    issues: &mut Vec<ValidationIssue>,
    jar: Option<&Path>,
    key: &str,
    needed_for: &str,
) {
    match jar {
        None => issues.push(ValidationIssue::error(format!(
            "{key} must be set when the project has {needed_for}"
        ))),
        Some(path) if !path.exists() => issues.push(ValidationIssue::error(format!(
            "{key} points at {}, which does not exist",
            path.display()
        ))),
        Some(_) => {}
    }
}

/// True when any issue is a hard error.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
