//! Soy template precompilation.
//!
//! Templates are compiled to JS into the temp dir before namespace
//! resolution runs, so the generated files participate as ordinary
//! namespace-managed inputs (`--shouldProvideRequireSoyNamespaces` makes
//! them carry their own provide/require lines).

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::globs::normalize;
use crate::process::{JarInvocation, run_jar};

/// Directory under the temp dir that receives generated template JS.
const SOY_OUT_DIR: &str = "soy";

/// The `--outputPathFormat` handed to the Soy compiler.
pub fn output_path_format(temp_dir: &Path) -> String {
    format!(
        "{}/{SOY_OUT_DIR}/{{INPUT_FILE_NAME_NO_EXT}}.js",
        normalize(temp_dir)
    )
}

/// Where each input template will land, in input order.
pub fn output_paths(temp_dir: &Path, inputs: &[String]) -> Vec<String> {
    inputs
        .iter()
        .map(|input| {
            let stem = Path::new(input)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.clone());
            format!("{}/{SOY_OUT_DIR}/{stem}.js", normalize(temp_dir))
        })
        .collect()
}

/// The full compiler invocation for a set of templates.
pub fn soy_invocation(jar: &Path, inputs: &[String], temp_dir: &Path) -> JarInvocation {
    JarInvocation::new(jar)
        .arg("--outputPathFormat")
        .arg(output_path_format(temp_dir))
        .arg("--shouldProvideRequireSoyNamespaces")
        .arg("--srcs")
        .arg(inputs.join(","))
}

/// Compile templates to JS, returning the generated file paths.
pub async fn compile_soy(
    java: &Path,
    jar: &Path,
    inputs: &[String],
    temp_dir: &Path,
) -> Result<Vec<String>> {
    tokio::fs::create_dir_all(temp_dir.join(SOY_OUT_DIR)).await?;
    info!(templates = inputs.len(), "compiling soy templates");
    run_jar(java, &soy_invocation(jar, inputs, temp_dir)).await?;
    Ok(output_paths(temp_dir, inputs))
}

#[cfg(test)]
#[path = "soy_tests.rs"]
mod tests;
