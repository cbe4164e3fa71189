//! Heatlens CLI: record, replay, render, and inspect interaction heatmaps.
//!
//! Usage:
//!   heatlens replay <EVENTS>     Replay a recorded JSONL stream
//!   heatlens record              Record live from JSONL on stdin
//!   heatlens render <SNAPSHOT>   Render a snapshot to PNG
//!   heatlens info <SNAPSHOT>     Show the hottest cells of a snapshot
//!   heatlens config              Print the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use heatlens_common::config::HeatmapConfig;

mod commands;

use commands::RenderArgs;

#[derive(Parser)]
#[command(
    name = "heatlens",
    about = "Interaction heatmaps from pointer streams",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/heatlens/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded JSONL stream through a session
    Replay {
        /// Path to the events file
        events: PathBuf,

        /// Write the final snapshot as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Write the final heatmap as PNG
        #[arg(long)]
        png: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Record live from JSONL records on stdin until EOF or Ctrl+C
    Record {
        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        viewport_width: f64,

        /// Document height in pixels
        #[arg(long, default_value = "2000")]
        document_height: f64,

        /// Write the final snapshot as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Write the final heatmap as PNG
        #[arg(long)]
        png: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Render a snapshot to PNG
    Render {
        /// Path to the snapshot JSON
        snapshot: PathBuf,

        /// Output PNG path
        #[arg(long)]
        png: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Show snapshot totals and the hottest cells
    Info {
        /// Path to the snapshot JSON
        snapshot: PathBuf,

        /// Number of cells to list
        #[arg(long, default_value = "10")]
        top: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = HeatmapConfig::load(cli.config.as_deref());

    // Initialize logging
    let mut logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    heatlens_common::logging::init_logging(&logging);

    let config = loaded.map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;

    match cli.command {
        Commands::Replay {
            events,
            snapshot,
            png,
            render,
        } => commands::replay::run(events, render.apply(&config)?, snapshot, png),
        Commands::Record {
            viewport_width,
            document_height,
            snapshot,
            png,
            render,
        } => {
            commands::record::run(
                render.apply(&config)?,
                viewport_width,
                document_height,
                snapshot,
                png,
            )
            .await
        }
        Commands::Render {
            snapshot,
            png,
            render,
        } => commands::render::run(snapshot, png, render.apply(&config)?),
        Commands::Info {
            snapshot,
            top,
            json,
        } => commands::info::run(snapshot, top, json),
        Commands::Config => commands::config::run(&config, cli.config),
    }
}
