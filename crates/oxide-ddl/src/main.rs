//! oxide-ddl CLI
//!
//! Command-line tool for mapping schema models onto database platforms
//! and computing the changes between two models.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::prelude::*;

/// Vendor-neutral schema mapping and diff.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in platforms.
    Platforms,

    /// Map a model onto a platform and print the mapped model.
    Map {
        /// Platform name or alias.
        #[arg(short, long, env = "OXIDE_DDL_PLATFORM")]
        platform: String,

        /// Model file (JSON).
        model: PathBuf,
    },

    /// Print the changes that turn SOURCE into TARGET.
    Diff {
        /// Platform name or alias.
        #[arg(short, long, env = "OXIDE_DDL_PLATFORM")]
        platform: String,

        /// Compare names case-sensitively.
        #[arg(long)]
        case_sensitive: bool,

        /// Map both models onto the platform before comparing.
        #[arg(long)]
        map: bool,

        /// Current model file (JSON).
        source: PathBuf,

        /// Wanted model file (JSON).
        target: PathBuf,
    },
}

fn read_model(path: &Path) -> anyhow::Result<Database> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let model: Database = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse model {}", path.display()))?;
    debug!(path = %path.display(), tables = model.tables.len(), "Loaded model");
    Ok(model)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let platforms = PlatformRegistry::with_builtin_platforms()?;

    match cli.command {
        Commands::Platforms => {
            for name in platforms.names() {
                println!("{name}");
            }
        }

        Commands::Map { platform, model } => {
            let platform = platforms.get(&platform)?;
            let model = read_model(&model)?;
            let mapped = platform.type_mapper().map_database(&model)?;
            info!(platform = %platform.name(), model = %mapped.name, "Mapped model");
            println!("{}", serde_json::to_string_pretty(&mapped)?);
        }

        Commands::Diff {
            platform,
            case_sensitive,
            map,
            source,
            target,
        } => {
            let platform = platforms.get(&platform)?;
            let mut source = read_model(&source)?;
            let mut target = read_model(&target)?;
            if map {
                let mapper = platform.type_mapper().case_sensitive(case_sensitive);
                source = mapper.map_database(&source)?;
                target = mapper.map_database(&target)?;
            }
            let changes = platform
                .model_comparator(case_sensitive)
                .compare(&source, &target)?;
            for change in &changes {
                debug!("{change}");
            }
            println!("{}", serde_json::to_string_pretty(&changes)?);
        }
    }

    Ok(())
}
