// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Durable Task Execution contributors

//! `dted` — the durable-task execution daemon. Loads configuration, wires up
//! the in-memory store, dispatchers, and worker socket, and runs until
//! interrupted.

use clap::Parser;
use dte_daemon::DaemonConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dted", about = "Durable-task execution daemon")]
struct Args {
    /// Path to a TOML config file. Missing is not an error; defaults and
    /// environment overrides still apply.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = match DaemonConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(socket = %config.socket_path.display(), "starting dted");

    let shutdown = CancellationToken::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            signal_shutdown.cancel();
        }
    });

    let app = dte_daemon::App::new(config);
    match app.run(shutdown).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "dted exited with error");
            ExitCode::FAILURE
        }
    }
}
