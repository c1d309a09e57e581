use anyhow::Result;
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod actions;
mod api;
mod app;
mod config;
mod events;
mod form;
mod models;
mod npm;
mod state;
mod store;
mod ui;

use app::App;
use models::CertificateRef;

/// Terminal editor for a certificate's deployment actions.
#[derive(Parser, Debug)]
#[command(name = "certdeck")]
#[command(about = "Edit, test and run the deployment actions of a certificate")]
struct Args {
    /// Certificate fingerprint (a `sha256 Fingerprint=` prefix is accepted)
    fingerprint: String,

    /// Display name shown in the header instead of the fingerprint
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Backend base URL, overriding the configured one
    #[arg(short, long)]
    server: Option<String>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre for better error messages
    color_eyre::install().ok(); // Ignore error if already installed

    // Logs go to stderr so the frame buffer stays clean; enable with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Determine config path
    let config_path = match args.config {
        Some(path) => path,
        None => {
            if let Some(proj_dirs) = ProjectDirs::from("com", "certdeck", "certdeck") {
                proj_dirs.config_dir().join("config.toml")
            } else {
                std::env::current_dir()?.join("certdeck.toml")
            }
        }
    };

    let mut config = config::load_config(&config_path)?;
    if let Some(server) = args.server {
        config.server.base_url = server;
    }
    tracing::info!(server = %config.server.base_url, "starting certdeck");

    let mut certificate = CertificateRef::new(args.fingerprint);
    if let Some(name) = args.name {
        certificate = certificate.with_name(name);
    }

    // Create application
    let mut app = App::new(config, certificate)?;

    // Initialize terminal
    let terminal = ratatui::init();

    // Run application
    let result = app.run(terminal).await;

    // Restore terminal
    ratatui::restore();

    result
}
