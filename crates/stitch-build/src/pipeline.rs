//! The build pipeline: configuration in, artifacts out.
//!
//! Stages: soy precompile (generated templates join the sources), glob
//! expansion and namespace resolution (producing the solver's project
//! declaration), the placement solve, then the compiler drivers. The
//! stylesheet and JS compilers run concurrently except when a renaming map
//! is in play, where the JS compile must read what the stylesheet pass
//! wrote.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use stitch_config::{BuildConfig, CompileMode, OutputVariant};
use stitch_core::{ModuleDecl, ProjectSpec, SolvedProject};
use tracing::{info, warn};

use crate::css::{self, CssArtifacts};
use crate::globs::{collect_js_sources, expand_patterns, normalize};
use crate::jscomp::{self, JsArtifact};
use crate::namespaces::NamespaceIndex;
use crate::process::locate_java;
use crate::soy;

/// A loaded configuration anchored to the directory its paths are relative
/// to (the directory containing stitch.toml).
#[derive(Debug)]
pub struct BuildContext {
    pub config: BuildConfig,
    pub base_dir: PathBuf,
}

impl BuildContext {
    pub fn new(config: BuildConfig, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            base_dir: base_dir.into(),
        }
    }

    pub fn root_src_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.project.root_src_dir)
    }

    pub fn build_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.project.build_dir)
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.project.temp_dir)
    }

    fn jar_path(&self, jar: Option<&PathBuf>, key: &str) -> Result<PathBuf> {
        match jar {
            Some(path) => Ok(self.base_dir.join(path)),
            None => bail!("{key} is not configured"),
        }
    }

    fn java(&self) -> Result<PathBuf> {
        locate_java(self.config.compilers.java.as_deref())
    }
}

/// Everything decided before any JS or CSS compiler runs.
#[derive(Debug)]
pub struct Plan {
    /// The declaration handed to the solver.
    pub project: ProjectSpec,
    pub solved: SolvedProject,
}

/// Resolve all inputs and solve module placement, without running the JS or
/// CSS compilers. Soy templates are precompiled when configured, since the
/// generated files participate in namespace resolution.
pub async fn plan(ctx: &BuildContext) -> Result<Plan> {
    let soy_outputs = precompile_soy(ctx).await?;
    let project = assemble_project(ctx, &soy_outputs)?;
    let solved = stitch_core::solve(&project)?;
    info!(
        modules = solved.modules.len(),
        files = solved.file_count(),
        moved = solved.moves.len(),
        virtual_root = solved.virtual_root.is_some(),
        "module placement solved"
    );
    Ok(Plan { project, solved })
}

/// Artifacts of a full build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub js: Vec<JsArtifact>,
    pub css: Vec<CssArtifacts>,
}

impl BuildReport {
    /// Every produced file, JS artifacts first.
    pub fn artifact_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.js.iter().map(|a| a.path.clone()).collect();
        paths.extend(self.css.iter().map(|a| a.stylesheet.clone()));
        paths
    }
}

/// Run the full pipeline.
pub async fn build(ctx: &BuildContext) -> Result<BuildReport> {
    let plan = plan(ctx).await?;
    let build_dir = ctx.build_dir();
    let temp_dir = ctx.temp_dir();
    let root = ctx.root_src_dir();

    let flavors: &[bool] = match ctx.config.compilation.output {
        OutputVariant::Debug => &[true],
        OutputVariant::Release => &[false],
        OutputVariant::Both => &[false, true],
    };

    let css_inputs = match &ctx.config.css {
        Some(css_config) => expand_patterns(&root, &css_config.inputs)?,
        None => Vec::new(),
    };

    let mut report = BuildReport::default();

    if ctx.config.compilation.mode == CompileMode::Raw {
        report.js = jscomp::emit_raw(&plan.solved, &build_dir).await?;
        if let Some(css_config) = &ctx.config.css {
            let java = ctx.java()?;
            let jar = ctx.jar_path(
                ctx.config.compilers.stylesheets_jar.as_ref(),
                "compilers.stylesheets_jar",
            )?;
            for &debug in flavors {
                report.css.push(
                    css::compile_css(
                        &java,
                        &jar,
                        css_config,
                        &css_inputs,
                        debug,
                        &build_dir,
                        &temp_dir,
                        &ctx.config.compilers.extra_css_flags,
                    )
                    .await?,
                );
            }
        }
        return Ok(report);
    }

    let java = ctx.java()?;
    let closure_jar = ctx.jar_path(
        ctx.config.compilers.closure_jar.as_ref(),
        "compilers.closure_jar",
    )?;
    let externs = expand_patterns(&root, &ctx.config.externs)?;

    for &debug in flavors {
        let css_task = async {
            let Some(css_config) = &ctx.config.css else {
                return Ok::<_, anyhow::Error>(None);
            };
            let jar = ctx.jar_path(
                ctx.config.compilers.stylesheets_jar.as_ref(),
                "compilers.stylesheets_jar",
            )?;
            let artifacts = css::compile_css(
                &java,
                &jar,
                css_config,
                &css_inputs,
                debug,
                &build_dir,
                &temp_dir,
                &ctx.config.compilers.extra_css_flags,
            )
            .await?;
            Ok(Some(artifacts))
        };
        let js_task = jscomp::compile_modules(
            &java,
            &closure_jar,
            &plan.solved,
            ctx.config.compilation.mode,
            debug,
            &externs,
            &ctx.config.compilers.extra_js_flags,
            &build_dir,
            &temp_dir,
        );

        let renaming_gate = ctx.config.css.as_ref().is_some_and(|c| c.rename_classes);
        let (css_artifacts, js_artifacts) = if renaming_gate {
            // The JS compile reads the renaming map the stylesheet pass
            // writes, so no overlap in this configuration.
            let css_artifacts = css_task.await?;
            (css_artifacts, js_task.await?)
        } else {
            tokio::try_join!(css_task, js_task)?
        };

        report.css.extend(css_artifacts);
        report.js.extend(js_artifacts);
    }

    Ok(report)
}

/// Soy precompile, when configured. Returns the generated JS paths.
async fn precompile_soy(ctx: &BuildContext) -> Result<Vec<String>> {
    let Some(soy_config) = &ctx.config.soy else {
        return Ok(Vec::new());
    };
    let inputs = expand_patterns(&ctx.root_src_dir(), &soy_config.inputs)?;
    if inputs.is_empty() {
        warn!("soy is configured but its globs matched no templates");
        return Ok(Vec::new());
    }
    let jar = ctx.jar_path(ctx.config.compilers.soy_jar.as_ref(), "compilers.soy_jar")?;
    let java = ctx.java()?;
    soy::compile_soy(&java, &jar, &inputs, &ctx.temp_dir()).await
}

/// Expand every module's inputs into the solver's project declaration.
///
/// Module declaration order is the config's name order. The namespace index
/// covers every `.js` under the source root (minus the build tree) plus the
/// soy output; each module's root namespaces expand to its
/// dependency-ordered file list. When class renaming is on, the renaming
/// map is added to each root module as a compiled input, so the solver
/// hoists it wherever the roots demand.
fn assemble_project(ctx: &BuildContext, soy_outputs: &[String]) -> Result<ProjectSpec> {
    let root = ctx.root_src_dir();
    let build_dir = ctx.build_dir();
    let temp_dir = ctx.temp_dir();

    let needs_namespaces = ctx
        .config
        .modules
        .values()
        .any(|m| !m.root_namespaces.is_empty());
    let index = if needs_namespaces {
        let mut sources = collect_js_sources(&root, &[&build_dir, &temp_dir])
            .context("failed to scan source root")?;
        sources.extend(soy_outputs.iter().cloned());
        NamespaceIndex::scan(&sources)?
    } else {
        NamespaceIndex::default()
    };

    let renaming_map = ctx
        .config
        .css
        .as_ref()
        .filter(|c| c.rename_classes && ctx.config.compiles_js())
        .map(|_| normalize(&css::renaming_map_path(&temp_dir)));

    let mut modules = Vec::with_capacity(ctx.config.modules.len());
    for (name, module_config) in &ctx.config.modules {
        let mut decl = ModuleDecl::new(name.clone());
        decl.direct_deps = module_config.deps.clone();
        decl.uncompiled = expand_patterns(&root, &module_config.uncompiled)?;
        decl.non_namespaced = expand_patterns(&root, &module_config.non_namespaced)?;
        if module_config.deps.is_empty() {
            if let Some(map) = &renaming_map {
                decl.non_namespaced.insert(0, map.clone());
            }
        }
        decl.namespaced_ordered = index
            .resolve(&module_config.root_namespaces, &format!("module '{name}'"))?;
        modules.push(decl);
    }

    Ok(ProjectSpec { modules })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
