//! Closure Stylesheets driver.
//!
//! The CSS module compiles independently of the JS modules and may overlap
//! with JS compilation. In release flavor with class renaming on, the
//! compiler also writes a renaming map as a JS file; the pipeline feeds
//! that file into the JS build so compiled code agrees with the stylesheet
//! about renamed classes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use stitch_config::CssConfig;
use tracing::info;

use crate::process::{JarInvocation, run_jar};

/// Artifacts of one stylesheet compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssArtifacts {
    pub stylesheet: PathBuf,
    /// Present when `rename_classes` is on.
    pub renaming_map: Option<PathBuf>,
}

/// Where the class-renaming map lands. Known before the compiler runs, so
/// the JS side can reference it while planning.
pub fn renaming_map_path(temp_dir: &Path) -> PathBuf {
    temp_dir.join("css_renaming_map.js")
}

/// Output stylesheet path for one flavor.
pub fn stylesheet_path(build_dir: &Path, css: &CssConfig, debug: bool) -> PathBuf {
    if debug {
        build_dir.join(format!("{}_debug.css", css.name))
    } else {
        build_dir.join(format!("{}.css", css.name))
    }
}

/// The full stylesheet-compiler invocation for one flavor.
pub fn css_invocation(
    jar: &Path,
    css: &CssConfig,
    inputs: &[String],
    debug: bool,
    build_dir: &Path,
    temp_dir: &Path,
    extra_flags: &[String],
) -> JarInvocation {
    let mut invocation = JarInvocation::new(jar)
        .arg("--output-file")
        .arg(stylesheet_path(build_dir, css, debug).to_string_lossy().into_owned());

    if debug {
        invocation = invocation.arg("--pretty-print");
    }
    if css.rename_classes {
        // Both flavors write the map: the matching JS compile reads it, so
        // debug code agrees with the debug stylesheet and release with
        // release.
        invocation = invocation
            .args(["--rename", if debug { "DEBUG" } else { "CLOSURE" }])
            .arg("--output-renaming-map")
            .arg(renaming_map_path(temp_dir).to_string_lossy().into_owned())
            .args(["--output-renaming-map-format", "CLOSURE_COMPILED_SPLIT_HYPHENS"]);
    } else {
        invocation = invocation.args(["--rename", "NONE"]);
    }

    invocation.args(extra_flags.iter().cloned()).args(inputs.iter().cloned())
}

/// Compile the CSS module for one flavor.
pub async fn compile_css(
    java: &Path,
    jar: &Path,
    css: &CssConfig,
    inputs: &[String],
    debug: bool,
    build_dir: &Path,
    temp_dir: &Path,
    extra_flags: &[String],
) -> Result<CssArtifacts> {
    tokio::fs::create_dir_all(build_dir).await?;
    tokio::fs::create_dir_all(temp_dir).await?;
    let debug_flag = debug;
    info!(module = %css.name, debug = debug_flag, inputs = inputs.len(), "compiling stylesheets");

    let invocation = css_invocation(jar, css, inputs, debug, build_dir, temp_dir, extra_flags);
    run_jar(java, &invocation).await?;

    let renaming_map = css.rename_classes.then(|| renaming_map_path(temp_dir));
    Ok(CssArtifacts {
        stylesheet: stylesheet_path(build_dir, css, debug),
        renaming_map,
    })
}

#[cfg(test)]
#[path = "css_tests.rs"]
mod tests;
