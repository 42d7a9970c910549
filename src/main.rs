mod config;
mod routes;
mod services;
mod state;

use std::process::ExitCode;

use tracing::{error, info, warn};

use crate::config::RelayConfig;
use crate::services::tables::Tables;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!(error = %e, "ignoring unreadable .env");
        }
    }

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let tables = Tables::load(&config);

    let port = config.port;
    let push_ms = config.push_interval.as_millis();
    let token = config.publish_token.is_some();
    let state = state::AppState::new(config, tables);
    let app = routes::app(state);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %port, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(%port, push_ms, token, "radar relay listening");
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
