//! Todo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `todos` table.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths validate before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - List results are ordered by `id ASC`.

use crate::db::DbError;
use crate::model::todo::{NewTodo, Todo, TodoId, TodoValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed
FROM todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Completion-state filter for listing todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl TodoFilter {
    /// Parses the external `filter` parameter.
    ///
    /// Only the exact values `completed` and `incomplete` narrow the result;
    /// anything else, including an absent value, selects all records.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("completed") => Self::Completed,
            Some("incomplete") => Self::Incomplete,
            _ => Self::All,
        }
    }

    fn completed_value(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Completed => Some(true),
            Self::Incomplete => Some(false),
        }
    }
}

/// Query options for listing todos.
#[derive(Debug, Clone, Default)]
pub struct TodoListQuery {
    pub filter: TodoFilter,
}

/// Repository interface for todo CRUD operations.
pub trait TodoRepository {
    /// Inserts a new row and returns it with its storage-assigned id.
    fn create_todo(&self, todo: &NewTodo) -> RepoResult<Todo>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>>;
    /// Replaces every mutable field of the row identified by `todo.id`.
    fn update_todo(&self, todo: &Todo) -> RepoResult<()>;
    /// Permanently removes a row.
    fn delete_todo(&self, id: TodoId) -> RepoResult<()>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create_todo(&self, todo: &NewTodo) -> RepoResult<Todo> {
        todo.validate()?;

        self.conn.execute(
            "INSERT INTO todos (title, description, completed) VALUES (?1, ?2, ?3);",
            params![
                todo.title.as_str(),
                todo.description.as_str(),
                bool_to_int(todo.completed),
            ],
        )?;

        Ok(Todo {
            id: self.conn.last_insert_rowid(),
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: todo.completed,
        })
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let row = stmt
            .query_row([id], |row| Ok(parse_todo_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>> {
        let completed = query.filter.completed_value();
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE (?1 IS NULL OR completed = ?1)
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([completed.map(bool_to_int)])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn update_todo(&self, todo: &Todo) -> RepoResult<()> {
        todo.validate()?;

        let changed = self.conn.execute(
            "UPDATE todos
             SET
                title = ?1,
                description = ?2,
                completed = ?3
             WHERE id = ?4;",
            params![
                todo.title.as_str(),
                todo.description.as_str(),
                bool_to_int(todo.completed),
                todo.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(todo.id));
        }

        Ok(())
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed"
            )));
        }
    };

    let todo = Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed,
    };
    todo.validate().map_err(|err| {
        RepoError::InvalidData(format!("todo {} violates field limits: {err}", todo.id))
    })?;
    Ok(todo)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
