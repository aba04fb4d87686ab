//! Core domain logic for the todo record service.
//! This crate is the single source of truth for todo invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{
    NewTodo, Todo, TodoId, TodoPatch, TodoValidationError, DESCRIPTION_MAX_CHARS,
    TITLE_MAX_CHARS,
};
pub use repo::todo_repo::{
    RepoError, RepoResult, SqliteTodoRepository, TodoFilter, TodoListQuery, TodoRepository,
};
pub use service::todo_service::{
    CreateTodoRequest, ServiceResult, TodoService, TodoServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
