//! Quickmark CLI - batch watermarking for photos.
//!
//! Quickmark overlays a watermark image onto photos, downsizes oversized
//! originals, stamps copyright/author EXIF fields and exports to jpg, png
//! or gif.
//!
//! # Usage
//!
//! ```bash
//! # Watermark a few photos next to the originals
//! quickmark watermark beach.jpg party.gif
//!
//! # Watermark a folder into an export directory, four at a time
//! quickmark watermark ./photos/ --output-dir ./export --parallel 4
//!
//! # View configuration
//! quickmark config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Quickmark - batch watermarking for photos.
#[derive(Parser, Debug)]
#[command(name = "quickmark")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Watermark photos and write the results
    Watermark(cli::watermark::WatermarkArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match quickmark_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `quickmark config path`."
            );
            quickmark_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Quickmark v{}", quickmark_core::VERSION);

    match cli.command {
        Commands::Watermark(args) => cli::watermark::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
