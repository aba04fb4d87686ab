//! Todo use-case service.
//!
//! # Responsibility
//! - Provide the create/list/update/retrieve/delete use-cases.
//! - Merge partial updates with the stored record before validation.
//!
//! # Invariants
//! - Validation failures never reach storage.
//! - Update uses merge semantics: omitted fields keep the stored value.
//! - Service layer remains storage-agnostic; the repository is injected.

use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch, TodoValidationError};
use crate::repo::todo_repo::{RepoError, TodoFilter, TodoListQuery, TodoRepository};
use log::debug;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, TodoServiceError>;

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Caller input violates a field rule.
    Validation(TodoValidationError),
    /// Target todo does not exist.
    NotFound(TodoId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent todo state: {details}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Create request as received from callers.
///
/// Fields are optional so that "missing" and "empty" report the same
/// validation error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl CreateTodoRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            completed: None,
        }
    }

    fn into_new_todo(self) -> NewTodo {
        NewTodo {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
        }
    }
}

/// Todo service facade over repository implementations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new todo.
    ///
    /// # Contract
    /// - Missing `completed` defaults to `false`.
    /// - Returns the stored record including its generated id.
    pub fn create(&self, request: CreateTodoRequest) -> ServiceResult<Todo> {
        let new_todo = request.into_new_todo();
        new_todo.validate()?;

        let todo = self.repo.create_todo(&new_todo)?;
        debug!("event=todo_create module=service status=ok todo_id={}", todo.id);
        Ok(todo)
    }

    /// Lists todos matching the completion filter, ordered by id.
    pub fn list(&self, filter: TodoFilter) -> ServiceResult<Vec<Todo>> {
        let todos = self.repo.list_todos(&TodoListQuery { filter })?;
        Ok(todos)
    }

    /// Applies a partial update and returns the stored result.
    ///
    /// # Contract
    /// - Unknown id yields `NotFound`.
    /// - Length rules are checked on the merged record; on failure the
    ///   stored record is left untouched.
    pub fn update(&self, id: TodoId, patch: &TodoPatch) -> ServiceResult<Todo> {
        let current = self
            .repo
            .get_todo(id)?
            .ok_or(TodoServiceError::NotFound(id))?;

        let merged = current.merged_with(patch);
        merged.validate()?;

        self.repo.update_todo(&merged)?;
        debug!("event=todo_update module=service status=ok todo_id={id}");

        self.repo
            .get_todo(id)?
            .ok_or(TodoServiceError::InconsistentState(
                "updated todo not found in read-back",
            ))
    }

    /// Gets one todo by id.
    pub fn retrieve(&self, id: TodoId) -> ServiceResult<Todo> {
        self.repo
            .get_todo(id)?
            .ok_or(TodoServiceError::NotFound(id))
    }

    /// Permanently deletes one todo by id.
    pub fn delete(&self, id: TodoId) -> ServiceResult<()> {
        self.repo.delete_todo(id)?;
        debug!("event=todo_delete module=service status=ok todo_id={id}");
        Ok(())
    }
}
