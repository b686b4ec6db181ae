//! Graft - vendor a pinned upstream snapshot and prune it
//!
//! Usage:
//!   graft init            # Write a starter graft.toml
//!   graft fetch           # Clone, check out, patch
//!   graft prune           # Delete files under the configured subdirectories
//!   graft run             # fetch + prune

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use graft_core::config::{CONFIG_FILE_NAME, load_config, write_template};
use graft_core::prelude::*;

#[derive(Parser)]
#[command(name = "graft")]
#[command(about = "Vendor a pinned, patched upstream snapshot", long_about = None)]
struct Cli {
    /// Path to graft.toml
    #[arg(long, short, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short = 'o', long, global = true, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter graft.toml
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },

    /// Clone the upstream, check out the pinned commit and apply the patch
    Fetch,

    /// Delete every file below the configured subdirectories
    ///
    /// Directories are kept. Without a config file, both --root and --dir
    /// must be given.
    Prune {
        /// Base directory (overrides prune.root)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Subdirectory to empty; repeatable (overrides prune.dirs)
        #[arg(long = "dir", value_name = "NAME")]
        dirs: Vec<String>,
    },

    /// Fetch, then prune
    Run,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// No output; rely on the exit status
    Quiet,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "graft=debug,graft_core=debug,info"
    } else {
        "graft=info,graft_core=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = std::path::absolute(&cli.config)
        .with_context(|| format!("Failed to resolve {}", cli.config.display()))?;

    match cli.command {
        Commands::Init { force } => run_init(&config_path, force, cli.format),
        Commands::Fetch => run_fetch(&config_path, cli.format),
        Commands::Prune { root, dirs } => run_prune(&config_path, root, dirs, cli.format),
        Commands::Run => run_pipeline(&config_path, cli.format),
    }
}

fn load_pipeline_config(config_path: &Path) -> Result<PipelineConfig> {
    tracing::debug!(config = %config_path.display(), "loading configuration");
    let config = load_config(config_path)?;
    let base_dir = config_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Config path has no parent: {}", config_path.display()))?;
    Ok(config.resolve(base_dir)?)
}

fn run_init(config_path: &Path, force: bool, format: OutputFormat) -> Result<()> {
    write_template(config_path, force)?;

    match format {
        OutputFormat::Table => println!("✓ Wrote {}", config_path.display()),
        OutputFormat::Json => {
            let output = serde_json::json!({ "config": config_path });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn run_fetch(config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = load_pipeline_config(config_path)?;
    let tree = Pipeline::from_config(&config).fetch(&config)?;

    match format {
        OutputFormat::Table => {
            println!(
                "✓ Vendored {} @ {} into {}",
                config.spec.source_url,
                tree.commit(),
                tree.root().display()
            );
            println!("  Applied patch {}", config.spec.patch_file.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "url": config.spec.source_url,
                "commit": tree.commit(),
                "root": tree.root(),
                "patch": config.spec.patch_file,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn run_prune(
    config_path: &Path,
    root: Option<PathBuf>,
    dirs: Vec<String>,
    format: OutputFormat,
) -> Result<()> {
    let target = prune_target(config_path, root, dirs)?;

    match prune(&target) {
        Ok(report) => print_prune_report(&report, format),
        Err(err) => {
            print_prune_report(&err.report, format)?;
            Err(err.into())
        }
    }
}

/// Flags win over the config file; the config is only read when needed.
fn prune_target(
    config_path: &Path,
    root: Option<PathBuf>,
    dirs: Vec<String>,
) -> Result<PruneTarget> {
    let root = root
        .map(|r| {
            std::path::absolute(&r).with_context(|| format!("Failed to resolve {}", r.display()))
        })
        .transpose()?;

    if let Some(root) = &root
        && !dirs.is_empty()
    {
        return Ok(PruneTarget::new(root.clone(), dirs)?);
    }

    let config = load_pipeline_config(config_path)?;
    let configured = config.prune.ok_or_else(|| {
        anyhow::anyhow!(
            "No [prune] section in {} and no --dir given",
            config_path.display()
        )
    })?;

    let root = root.unwrap_or_else(|| configured.root().to_path_buf());
    if dirs.is_empty() {
        let names: Vec<String> = configured.names().map(str::to_string).collect();
        Ok(PruneTarget::new(root, names)?)
    } else {
        Ok(PruneTarget::new(root, dirs)?)
    }
}

fn run_pipeline(config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = load_pipeline_config(config_path)?;

    let report = match Pipeline::from_config(&config).run(&config) {
        Ok(report) => report,
        Err(PipelineError::Prune(err)) => {
            print_prune_report(&err.report, format)?;
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    match format {
        OutputFormat::Table => {
            println!(
                "✓ Vendored {} @ {} into {}",
                config.spec.source_url,
                report.commit,
                report.root.display()
            );
            if let Some(hash) = &report.content_hash {
                println!("  Content hash: {}", hash);
            }
            if report.stripped_vcs_metadata {
                println!("  Removed VCS metadata");
            }
            match &report.prune {
                Some(prune_report) => print_prune_table(prune_report),
                None => println!("  Nothing to prune"),
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn print_prune_report(report: &PruneReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_prune_table(report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn print_prune_table(report: &PruneReport) {
    println!("  {:<20} {:>8}  Path", "Directory", "Removed");
    println!("  {}", "-".repeat(60));

    for root in &report.roots {
        let removed = if root.existed {
            root.files_removed.to_string()
        } else {
            "missing".to_string()
        };
        println!(
            "  {:<20} {:>8}  {}",
            root.name,
            removed,
            root.path.display()
        );
    }

    println!("Summary: {} files removed", report.total_files_removed());
}
