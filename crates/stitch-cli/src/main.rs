use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use stitch_build::{BuildContext, build, plan};
use stitch_config::{BuildConfig, OutputVariant, Severity, has_errors, validate_config};

/// Stitch, a multi-module JS build coordinator.
#[derive(Parser)]
#[command(name = "stitch", version, about)]
struct Cli {
    /// Project configuration file.
    #[arg(long, default_value = "stitch.toml", global = true)]
    config: PathBuf,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: Format,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Which artifact flavors to produce.
#[derive(Clone, Copy, ValueEnum)]
enum OutputArg {
    Debug,
    Release,
    Both,
}

impl From<OutputArg> for OutputVariant {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Debug => OutputVariant::Debug,
            OutputArg::Release => OutputVariant::Release,
            OutputArg::Both => OutputVariant::Both,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the project: solve module placement, run the compilers, and
    /// write the artifacts.
    Build {
        /// Override the configured output flavor.
        #[arg(long)]
        output: Option<OutputArg>,
    },

    /// Solve module placement and print the plan without running compilers.
    Plan,

    /// Load and validate the configuration.
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("stitch=debug,stitch_build=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init()
            .ok();
    }

    match cli.command {
        Commands::Build { output } => {
            let mut ctx = load_context(&cli.config)?;
            if let Some(output) = output {
                ctx.config.compilation.output = output.into();
            }
            let report = build(&ctx).await?;
            eprintln!("built {} artifact(s)", report.artifact_paths().len());
            for path in report.artifact_paths() {
                eprintln!("  {}", path.display());
            }
        }
        Commands::Plan => {
            let ctx = load_context(&cli.config)?;
            let plan = plan(&ctx).await?;
            match cli.format {
                Format::Json => {
                    println!("{}", serde_json::to_string_pretty(&plan.solved)?);
                }
                Format::Text => print_plan_text(&plan.solved),
            }
        }
        Commands::Check => {
            let config = BuildConfig::load(&cli.config)?;
            let issues = validate_config(&config);
            if issues.is_empty() {
                eprintln!("{} is valid", cli.config.display());
                return Ok(());
            }
            for issue in &issues {
                eprintln!("{issue}");
            }
            let errors = issues.iter().filter(|i| i.severity == Severity::Error).count();
            if has_errors(&issues) {
                bail!("{errors} configuration error(s)");
            }
        }
    }

    Ok(())
}

/// Load the configuration and anchor it to the config file's directory,
/// refusing to continue past validation errors.
fn load_context(config_path: &Path) -> Result<BuildContext> {
    let config = BuildConfig::load(config_path)?;
    let issues = validate_config(&config);
    for issue in &issues {
        eprintln!("{issue}");
    }
    if has_errors(&issues) {
        bail!("invalid configuration: {}", config_path.display());
    }
    let base_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    if !base_dir.is_dir() {
        bail!("cannot resolve project directory {}", base_dir.display());
    }
    Ok(BuildContext::new(config, base_dir))
}

/// Render the solved plan as an indented module listing, topological order.
fn print_plan_text(solved: &stitch_core::SolvedProject) {
    if solved.modules.is_empty() {
        println!("no modules declared");
        return;
    }
    if let Some(sentinel) = &solved.virtual_root {
        println!("virtual root: {sentinel}");
    }
    for module in &solved.modules {
        if module.direct_deps_used.is_empty() {
            println!("{}", module.name);
        } else {
            println!("{} (after {})", module.name, module.direct_deps_used.join(", "));
        }
        for file in &module.dont_compile_files {
            println!("  raw      {file}");
        }
        for file in &module.compiled_files {
            println!("  compile  {file}");
        }
    }
    if !solved.moves.is_empty() {
        println!("moved files:");
        for moved in &solved.moves {
            println!("  {} -> {}", moved.path, moved.module);
        }
    }
}
