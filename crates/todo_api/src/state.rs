//! Shared application state.
//!
//! # Invariants
//! - One SQLite connection per process, guarded by a mutex.
//! - A poisoned lock is recovered, not reported.
//! - Store access runs on the blocking pool, never on a runtime worker.

use crate::error::ApiError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};
use todo_core::{ServiceResult, SqliteTodoRepository, TodoService};

/// Router state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps an already-migrated connection (see `todo_core::db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one service operation against the shared connection.
    ///
    /// The service is built per call around a repository borrowing the
    /// locked connection, so no store state outlives the request.
    pub async fn with_service<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: for<'conn> FnOnce(&TodoService<SqliteTodoRepository<'conn>>) -> ServiceResult<T>
            + Send
            + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let joined = tokio::task::spawn_blocking(move || {
            // A panicked request leaves the connection itself usable.
            let guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            let service = TodoService::new(SqliteTodoRepository::new(&guard));
            op(&service).map_err(ApiError::from)
        })
        .await;

        joined.map_err(|err| ApiError::unexpected(format!("store task failed: {err}")))?
    }
}
