//! Todo API server entry point.

use log::{error, info};
use std::process::ExitCode;
use todo_api::{AppState, ServerConfig};
use todo_core::init_logging;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=server_exit module=api status=error error={message}");
            eprintln!("todo_api: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> Result<(), String> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, &config.log_dir.to_string_lossy())?;

    let conn = config
        .database
        .open()
        .map_err(|err| format!("failed to open database: {err}"))?;
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|err| format!("failed to bind {}: {err}", config.bind_addr))?;

    info!(
        "event=server_start module=api status=ok addr={} database={:?}",
        config.bind_addr, config.database
    );
    todo_api::run(listener, AppState::new(conn))
        .await
        .map_err(|err| format!("server error: {err}"))
}
