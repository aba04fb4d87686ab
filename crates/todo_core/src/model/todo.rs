//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record and its creation/patch inputs.
//! - Own the field-level validation rules shared by create and update.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes for a record.
//! - `title` is at most 150 characters, `description` at most 500.
//! - `title` and `description` are non-empty when a record is created.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate primary key assigned by storage.
pub type TodoId = i64;

/// Maximum `title` length in characters.
pub const TITLE_MAX_CHARS: usize = 150;
/// Maximum `description` length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Field-level validation failure for todo writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// `title` or `description` is missing or empty on create.
    MissingRequiredFields,
    /// `title` exceeds [`TITLE_MAX_CHARS`].
    TitleTooLong,
    /// `description` exceeds [`DESCRIPTION_MAX_CHARS`].
    DescriptionTooLong,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredFields => {
                write!(f, "Title and description are required fields.")
            }
            Self::TitleTooLong => write!(
                f,
                "Title is too long (maximum {TITLE_MAX_CHARS} characters)."
            ),
            Self::DescriptionTooLong => write!(
                f,
                "Description is too long (maximum {DESCRIPTION_MAX_CHARS} characters)."
            ),
        }
    }
}

impl Error for TodoValidationError {}

/// Persisted todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl Todo {
    /// Checks length limits on the current field values.
    ///
    /// Emptiness is only enforced at creation time, see [`NewTodo::validate`].
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_lengths(&self.title, &self.description)
    }

    /// Returns a copy of this record with the patch's supplied fields applied.
    ///
    /// `id` is never touched; omitted patch fields keep the current value.
    pub fn merged_with(&self, patch: &TodoPatch) -> Todo {
        Todo {
            id: self.id,
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            completed: patch.completed.unwrap_or(self.completed),
        }
    }
}

/// Field values for a record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }

    /// Validates creation rules in order: required fields, title length,
    /// description length.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.title.is_empty() || self.description.is_empty() {
            return Err(TodoValidationError::MissingRequiredFields);
        }
        validate_lengths(&self.title, &self.description)
    }
}

/// Partial update input. `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

fn validate_lengths(title: &str, description: &str) -> Result<(), TodoValidationError> {
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(TodoValidationError::TitleTooLong);
    }
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(TodoValidationError::DescriptionTooLong);
    }
    Ok(())
}
