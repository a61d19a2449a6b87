//! # crammers CLI
//!
//! Command-line interface for inspecting BERT configurations loaded from a
//! pretrained model registry.
//!
//! ## Usage
//!
//! - `crammers variants` - List the supported variants
//! - `crammers show base-uncased` - Load one configuration and print it
//! - `crammers show ./my-model --check` - Load from a local directory and validate
//! - `crammers catalog` - Load every variant

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{catalog_command, show_command, variants_command};
use config::CliSettingsLoader;

/// crammers - BERT configurations from pretrained model registries
#[derive(Parser)]
#[command(name = "crammers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Load BERT configurations from pretrained model registries")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Hub endpoint override
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Cache directory override
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Only use local directories and the cache
    #[arg(long, global = true)]
    offline: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported variants
    Variants,

    /// Load and print one configuration
    Show {
        /// Variant name (e.g. base-uncased) or model id
        target: String,

        /// Also validate the configuration
        #[arg(long)]
        check: bool,
    },

    /// Load every catalog variant
    Catalog,
}

/// Build a settings loader from CLI arguments
fn build_settings_loader(cli: &Cli) -> CliSettingsLoader {
    let mut loader = CliSettingsLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(endpoint) = &cli.endpoint {
        loader = loader.with_endpoint_override(endpoint.clone());
    }

    if let Some(cache_dir) = &cli.cache_dir {
        loader = loader.with_cache_dir_override(cache_dir.clone());
    }

    loader.with_offline_override(cli.offline)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    crammers_core::init_tracing_with_debug(cli.verbose);

    let settings_loader = build_settings_loader(&cli);

    match cli.command {
        Commands::Variants => variants_command().await,
        Commands::Show { target, check } => show_command(target, check, settings_loader).await,
        Commands::Catalog => catalog_command(settings_loader).await,
    }
}
