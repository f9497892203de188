//! `calc_server` entry point.

use calc_server::{serve, ServerConfig};
use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();

    if let Err(err) = calc_core::init_logging(config.log_level(), config.log_dir.as_deref()) {
        eprintln!("calc_server: logging init failed: {err}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=app_start module=server status=ok core_version={} bind={}",
        calc_core::core_version(),
        config.bind_addr()
    );

    match serve(&config, shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_stop module=server status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("event=shutdown_requested module=server status=ok signal=ctrl_c"),
        Err(err) => {
            error!("event=shutdown_signal module=server status=error error={err}");
            // Without a signal handler the server runs until killed.
            std::future::pending::<()>().await;
        }
    }
}
