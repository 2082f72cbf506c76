#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident-risk API server binary.

use std::path::PathBuf;

use accident_risk_server::{ServerConfig, run_server};
use clap::Parser;

/// Serve accident heatmap data and route risk scores.
#[derive(Parser, Debug)]
#[command(name = "accident_risk_server", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides `BIND_ADDR`).
    #[arg(long)]
    bind_addr: Option<String>,

    /// Port to listen on (overrides `PORT`).
    #[arg(long)]
    port: Option<u16>,

    /// Trained classifier JSON.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Encoded feature table CSV.
    #[arg(long)]
    features: Option<PathBuf>,

    /// Accident sample CSV.
    #[arg(long)]
    accidents: Option<PathBuf>,

    /// Frontend build directory served at `/`.
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(bind_addr) = self.bind_addr {
            config.bind_addr = bind_addr;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model) = self.model {
            config.model_path = model;
        }
        if let Some(features) = self.features {
            config.features_path = features;
        }
        if let Some(accidents) = self.accidents {
            config.accidents_path = accidents;
        }
        if let Some(static_dir) = self.static_dir {
            config.static_dir = Some(static_dir);
        }
    }
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let mut cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.take().as_deref())?;
    config.apply_env();
    cli.apply(&mut config);

    run_server(config).await?;

    Ok(())
}
