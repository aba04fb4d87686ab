//! HTTP surface for the todo record service.
//!
//! # Overview
//! Routes five JSON endpoints under `/todo/api/` to `todo_core`'s
//! `TodoService`, plus a `/health` liveness probe.
//!
//! # Design
//! - One SQLite connection behind `AppState`; each request builds a fresh
//!   service around it on the blocking pool.
//! - Errors are mapped to status codes in one place, `ApiError`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use log::{error, info};
use tokio::net::TcpListener;

pub use config::{Database, ServerConfig};
pub use error::ApiError;
pub use state::AppState;

/// Builds the router with all todo routes bound to `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/todo/api/create/", post(handlers::create_todo))
        .route("/todo/api/list/", get(handlers::list_todos))
        .route("/todo/api/update/", put(handlers::update_todo))
        .route("/todo/api/retrieve/", get(handlers::retrieve_todo))
        .route("/todo/api/delete/", delete(handlers::delete_todo))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serves the router on `listener` until Ctrl-C or SIGTERM.
///
/// In-flight requests are drained before this returns.
pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("event=signal_install module=api status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("event=signal_install module=api status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
    info!("event=shutdown_signal module=api status=ok");
}
