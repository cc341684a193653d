//! Command-line flags. Precedence: flag/env > config file > defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use oscillo_core::error::Result;

use crate::config::{self, parse_duration, DaemonConfig};

/// oscillo - synthetic gauge exporter
#[derive(Debug, Parser)]
#[command(name = "oscillo-daemon", version, about, long_about = None)]
pub struct Cli {
    /// Optional YAML configuration file
    #[arg(short, long, env = "OSCILLO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen address, `:port` or `host:port` [default: :5000]
    #[arg(long, env = "OSCILLO_LISTEN")]
    pub listen: Option<String>,

    /// Oscillation period, e.g. `10m`, `90s`, `1h30m` [default: 10m]
    #[arg(long, env = "OSCILLO_PERIOD", value_parser = parse_duration)]
    pub period: Option<Duration>,
}

impl Cli {
    /// Build the effective config and validate it.
    pub fn load_config(&self) -> Result<DaemonConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_file(path)?,
            None => DaemonConfig::default(),
        };
        if let Some(listen) = &self.listen {
            cfg.server.listen = listen.clone();
        }
        if let Some(period) = self.period {
            cfg.sampler.period = period;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
