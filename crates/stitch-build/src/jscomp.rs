//! Closure Compiler driver and raw concatenation.
//!
//! One compiler invocation covers the whole project: `--js` flags list each
//! module's compiled inputs in solved order and a `--module` flag closes
//! each chunk, so the compiler reproduces the solver's placement exactly.
//! Uncompiled files never reach the compiler; they are concatenated ahead
//! of their module's compiled payload afterwards.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use stitch_config::CompileMode;
use stitch_core::SolvedProject;
use tracing::info;

use crate::concat::concat_files;
use crate::globs::normalize;
use crate::process::{JarInvocation, run_jar};

/// One finished per-module JS artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsArtifact {
    pub module: String,
    pub path: PathBuf,
}

/// Final artifact path for a module in one flavor.
pub fn artifact_path(build_dir: &Path, module: &str, debug: bool) -> PathBuf {
    if debug {
        build_dir.join(format!("{module}_debug.js"))
    } else {
        build_dir.join(format!("{module}.js"))
    }
}

/// Where the compiler writes per-module chunks before stitching.
pub fn chunk_output_dir(temp_dir: &Path, debug: bool) -> PathBuf {
    temp_dir.join(if debug { "js_debug" } else { "js" })
}

fn optimization_level(mode: CompileMode) -> Option<&'static str> {
    match mode {
        CompileMode::Raw => None,
        CompileMode::Simple => Some("SIMPLE_OPTIMIZATIONS"),
        CompileMode::Advanced => Some("ADVANCED_OPTIMIZATIONS"),
    }
}

/// Build the single whole-project compiler invocation.
pub fn closure_invocation(
    jar: &Path,
    solved: &SolvedProject,
    mode: CompileMode,
    debug: bool,
    externs: &[String],
    extra_flags: &[String],
    output_prefix: &str,
) -> Result<JarInvocation> {
    let Some(level) = optimization_level(mode) else {
        bail!("raw mode does not use the JS compiler");
    };

    let mut invocation = JarInvocation::new(jar).args(["--compilation_level", level]);
    if debug {
        invocation = invocation.args(["--formatting", "PRETTY_PRINT"]).arg("--debug");
    }
    for externs_file in externs {
        invocation = invocation.arg("--externs").arg(externs_file.clone());
    }

    // Modules arrive in topological order; the compiler requires exactly
    // that. Each --module consumes the --js flags since the previous one.
    for module in &solved.modules {
        for file in &module.compiled_files {
            invocation = invocation.arg("--js").arg(file.clone());
        }
        let mut chunk = format!("{}:{}", module.name, module.compiled_files.len());
        if !module.direct_deps_used.is_empty() {
            chunk.push(':');
            chunk.push_str(&module.direct_deps_used.join(","));
        }
        invocation = invocation.arg("--module").arg(chunk);
    }

    invocation = invocation
        .arg("--module_output_path_prefix")
        .arg(format!("{output_prefix}/"));
    Ok(invocation.args(extra_flags.iter().cloned()))
}

/// Compile every module in one flavor, then stitch each module's
/// dont-compile files ahead of its compiled chunk.
#[allow(clippy::too_many_arguments)]
pub async fn compile_modules(
    java: &Path,
    jar: &Path,
    solved: &SolvedProject,
    mode: CompileMode,
    debug: bool,
    externs: &[String],
    extra_flags: &[String],
    build_dir: &Path,
    temp_dir: &Path,
) -> Result<Vec<JsArtifact>> {
    let chunk_dir = chunk_output_dir(temp_dir, debug);
    tokio::fs::create_dir_all(&chunk_dir).await?;

    let invocation = closure_invocation(
        jar,
        solved,
        mode,
        debug,
        externs,
        extra_flags,
        &normalize(&chunk_dir),
    )?;
    let debug_flag = debug;
    info!(modules = solved.modules.len(), debug = debug_flag, "compiling js modules");
    run_jar(java, &invocation).await?;

    let mut artifacts = Vec::with_capacity(solved.modules.len());
    for module in &solved.modules {
        let mut inputs: Vec<PathBuf> = module.dont_compile_files.iter().map(PathBuf::from).collect();
        inputs.push(chunk_dir.join(format!("{}.js", module.name)));
        let path = artifact_path(build_dir, &module.name, debug);
        concat_files(&inputs, &path).await?;
        artifacts.push(JsArtifact {
            module: module.name.clone(),
            path,
        });
    }
    Ok(artifacts)
}

/// Raw mode: concatenate each module's inputs verbatim, no compiler.
pub async fn emit_raw(solved: &SolvedProject, build_dir: &Path) -> Result<Vec<JsArtifact>> {
    let mut artifacts = Vec::with_capacity(solved.modules.len());
    for module in &solved.modules {
        let inputs: Vec<&String> = module
            .dont_compile_files
            .iter()
            .chain(module.compiled_files.iter())
            .collect();
        let path = artifact_path(build_dir, &module.name, false);
        concat_files(&inputs, &path).await?;
        artifacts.push(JsArtifact {
            module: module.name.clone(),
            path,
        });
    }
    Ok(artifacts)
}

#[cfg(test)]
#[path = "jscomp_tests.rs"]
mod tests;
