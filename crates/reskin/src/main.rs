//! reskin CLI - apply asset and markup overrides to a web app checkout.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "reskin")]
#[command(about = "Rebrand a third-party web app checkout before and after its build")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the manifest (reskin.toml or reskin.yaml)
    #[arg(short, long, global = true, default_value = "reskin.toml")]
    config: PathBuf,

    /// Override a manifest variable (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", global = true, value_parser = commands::parse_var)]
    vars: Vec<(String, String)>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter manifest and custom/ directory
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Apply overrides (prebuild then inject, or inject only)
    Apply {
        /// Only run the post-build injection
        #[arg(long)]
        inject: bool,

        /// Project checkout (defaults to the manifest's project.root)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Print the run reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the manifest against the file system
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let vars = cli.vars.into_iter().collect();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Apply {
            inject,
            root,
            dry_run,
            json,
        } => {
            let options = commands::apply::ApplyOptions {
                inject_only: inject,
                root,
                dry_run,
                json,
            };
            commands::apply::run(&cli.config, &vars, options)?;
        }
        Commands::Check => {
            commands::check::run(&cli.config, &vars)?;
        }
    }

    Ok(())
}
