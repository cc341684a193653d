//! oscillo daemon
//!
//! - `GET /metrics`: registry snapshot, Prometheus text or OpenMetrics
//! - sampler: counter + nested-sine gauge, once per second
//! - access log line per request, heartbeat line per tick

use std::process::ExitCode;

use clap::Parser;

use oscillo_daemon::{cli::Cli, obs, server};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match cli.load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            obs::init_tracing("info");
            tracing::error!(error = %e, code = e.kind().as_str(), "config load failed");
            return ExitCode::FAILURE;
        }
    };
    obs::init_tracing(&cfg.log.filter);

    tracing::info!(
        listen = %cfg.server.listen,
        period = ?cfg.sampler.period,
        interval = ?cfg.sampler.interval,
        "oscillo-daemon starting"
    );

    match server::run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, code = e.kind().as_str(), "oscillo-daemon stopped");
            ExitCode::FAILURE
        }
    }
}
