use std::process::ExitCode;

use tokio::net::TcpListener;

use duplex_dispatch::adapters::http::{app, serve, shutdown_signal, StartupError};
use duplex_dispatch::config::{AppConfig, ConfigError};
use duplex_dispatch::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            // logging is configured from this config, so it is not up yet
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(&config.server) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load()?;
    config.validate()?;
    Ok(config)
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let addr = config.server.socket_addr().map_err(ConfigError::from)?;
    let router = app(&config)?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "server launched");
    serve(listener, router, shutdown_signal()).await?;
    Ok(())
}
