//! Slideshow CLI: build slideshow videos from still images and audio.
//!
//! Usage:
//!   slideshow create --audio <PATH>   Build a slideshow video
//!   slideshow plan --audio <PATH>     Show the slot plan without rendering
//!   slideshow denoise <VIDEO>         Remove low-frequency wind noise
//!   slideshow check                   Check external tools and directories

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use slideshow_common::config::AppConfig;

mod commands;

use commands::SlideshowArgs;

#[derive(Parser)]
#[command(
    name = "slideshow",
    about = "Assemble slideshow videos from images and an audio track",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/slideshow/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a slideshow video
    Create {
        #[command(flatten)]
        args: SlideshowArgs,
    },

    /// Show how the images would be laid out, without rendering
    Plan {
        #[command(flatten)]
        args: SlideshowArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove low-frequency wind noise from a video's audio
    Denoise {
        /// Source video
        input: PathBuf,

        /// High-pass cutoff in Hz (defaults to the configured 300 Hz)
        #[arg(long)]
        cutoff: Option<f64>,

        /// Output file path
        #[arg(short, long, default_value = "slideshow_filtered.mp4")]
        output: PathBuf,
    },

    /// Check external tools and directories
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    slideshow_common::logging::init_logging(&config.logging);
    tracing::debug!(config = ?cli.config, "Configuration loaded");

    match cli.command {
        Commands::Create { args } => commands::create::run(args, &config),
        Commands::Plan { args, json } => commands::plan::run(args, json, &config),
        Commands::Denoise {
            input,
            cutoff,
            output,
        } => commands::denoise::run(input, cutoff, output, &config),
        Commands::Check => commands::check::run(&config),
    }
}
