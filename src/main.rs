// SPDX-License-Identifier: GPL-3.0-only

use camera_scanner::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camera-scanner")]
#[command(about = "Webcam barcode and QR code scanning HTTP API")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/camera-scanner/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Seconds to withhold results after a successful scan
    #[arg(long, global = true)]
    cooldown: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Serve this image as camera 0 instead of V4L2 devices
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// List available cameras
    List,

    /// Capture, decode and annotate a single frame
    Scan {
        /// Camera index to use (from 'camera-scanner list')
        #[arg(short, long, default_value = "0")]
        camera: u32,

        /// Output file path (default: ~/Pictures/camera-scanner/scan_TIMESTAMP.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config =
        Config::load(cli.config.as_deref())?.with_overrides(cli.host, cli.port, cli.cooldown)?;

    // RUST_LOG wins over the configured filter
    // Examples: RUST_LOG=debug, RUST_LOG=camera_scanner=trace,warp=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_target(true)
        .with_level(true)
        .init();

    match cli.command {
        None => cli::serve(config, None).await,
        Some(Commands::Serve { image }) => cli::serve(config, image).await,
        Some(Commands::List) => cli::list_cameras(&config).await,
        Some(Commands::Scan { camera, output }) => cli::scan_once(&config, camera, output).await,
    }
}
