use std::path::PathBuf;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use rover_zenoh_runtime::config::{Config, ConfigError};

/// Rover drive runtime: remote/local arbitration with obstacle-aware speed scaling
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// JSON config file (every field optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Serial port of the I2C bridge
    #[arg(short, long)]
    port: Option<String>,

    /// Run against simulated devices
    #[arg(long)]
    simulate: bool,

    /// Forward range reported by the simulated sensor (mm)
    #[arg(long)]
    sim_distance: Option<u32>,
}

impl Args {
    fn into_config(self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(port) = self.port {
            config.hardware.port = port;
        }
        if self.simulate {
            config.hardware.simulated = true;
        }
        if let Some(mm) = self.sim_distance {
            config.hardware.sim_distance_mm = mm;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init(); // installs the subscriber globally

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Config error: {}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = rover_zenoh_runtime::runtime::run(config).await {
        error!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
