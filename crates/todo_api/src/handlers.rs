//! HTTP handlers for the five todo operations.
//!
//! # Responsibility
//! - Decode request fields from the JSON body (and, for lookups, the query
//!   string), call the service, and encode the result.
//!
//! # Invariants
//! - An empty body is treated as `{}`.
//! - Body fields win over query-string fields of the same name.
//! - A missing `id` addresses no record and reports 404.

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use todo_core::{core_version, CreateTodoRequest, Todo, TodoFilter, TodoId, TodoPatch};

const DELETED_MESSAGE: &str = "Todo item deleted successfully.";

#[derive(Debug, Default, Deserialize)]
struct ListBody {
    /// Any JSON value is accepted; only the strings `completed` and
    /// `incomplete` narrow the result.
    #[serde(default)]
    filter: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    #[serde(default)]
    filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LookupParams {
    #[serde(default)]
    id: Option<TodoId>,
}

#[derive(Debug, Default, Deserialize)]
struct UpdateBody {
    #[serde(default)]
    id: Option<TodoId>,
    #[serde(flatten)]
    patch: TodoPatch,
}

/// Confirmation body returned by delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Liveness probe body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub version: String,
}

/// `POST /todo/api/create/`
pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let request: CreateTodoRequest = parse_body(&body)?;
    let todo = state
        .with_service(move |service| service.create(request))
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `GET /todo/api/list/`
pub async fn list_todos(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let from_body: ListBody = parse_body(&body)?;
    let filter = match from_body.filter {
        Some(value) => TodoFilter::from_param(value.as_str()),
        None => {
            let from_query: ListQuery = parse_query(&uri)?;
            TodoFilter::from_param(from_query.filter.as_deref())
        }
    };

    let todos = state
        .with_service(move |service| service.list(filter))
        .await?;
    Ok(Json(todos))
}

/// `PUT /todo/api/update/`
pub async fn update_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let UpdateBody { id, patch } = parse_body(&body)?;
    let id = id.ok_or(ApiError::NotFound)?;

    let todo = state
        .with_service(move |service| service.update(id, &patch))
        .await?;
    Ok(Json(todo))
}

/// `GET /todo/api/retrieve/`
pub async fn retrieve_todo(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let id = lookup_id(&uri, &body)?;
    let todo = state
        .with_service(move |service| service.retrieve(id))
        .await?;
    Ok(Json(todo))
}

/// `DELETE /todo/api/delete/`
///
/// The confirmation message is encoded in the response, but HTTP framing
/// drops bodies of 204 responses on the wire.
pub async fn delete_todo(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let id = lookup_id(&uri, &body)?;
    state
        .with_service(move |service| service.delete(id))
        .await?;
    Ok((
        StatusCode::NO_CONTENT,
        Json(MessageBody {
            message: DELETED_MESSAGE.to_string(),
        }),
    ))
}

/// `GET /health`
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok".to_string(),
        version: core_version().to_string(),
    })
}

fn lookup_id(uri: &Uri, body: &Bytes) -> Result<TodoId, ApiError> {
    let from_body: LookupParams = parse_body(body)?;
    if let Some(id) = from_body.id {
        return Ok(id);
    }
    let from_query: LookupParams = parse_query(uri)?;
    from_query.id.ok_or(ApiError::NotFound)
}

fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    let malformed = |err: serde_json::Error| ApiError::MalformedPayload(err.to_string());
    // Derived struct decoding also accepts arrays by position; only objects
    // carry named fields.
    match serde_json::from_slice::<Value>(body).map_err(malformed)? {
        object @ Value::Object(_) => T::deserialize(object).map_err(malformed),
        other => Err(ApiError::MalformedPayload(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_query<T: DeserializeOwned + Default>(uri: &Uri) -> Result<T, ApiError> {
    if uri.query().is_none() {
        return Ok(T::default());
    }
    Query::<T>::try_from_uri(uri)
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::MalformedPayload(rejection.body_text()))
}
