use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A single todo record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Todo {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub is_complete: bool,
}

impl Todo {
    /// Build a fresh record with a server-generated id, not yet complete
    pub fn new(input: CreateTodo) -> Self {
        Todo {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            is_complete: false,
        }
    }
}

/// Request body for POST /api/todos
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct CreateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Stored verbatim, never parsed
    pub due_date: Option<String>,
}

/// Request body for PATCH /api/todos/{id}
///
/// Only fields carrying a usable value count as present: text fields must be
/// non-empty strings and `is_complete` must be a JSON boolean. Anything else
/// (null, empty string, wrong type) is treated as if the field were missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct TodoPatch {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "strict_bool")]
    pub is_complete: Option<bool>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub due_date: Option<String>,
}

impl TodoPatch {
    pub fn mark_complete() -> Self {
        TodoPatch {
            is_complete: Some(true),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.is_complete.is_none()
            && self.due_date.is_none()
    }

    /// Overwrite the fields of `todo` that this patch carries
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = Some(title.clone());
        }
        if let Some(description) = &self.description {
            todo.description = Some(description.clone());
        }
        if let Some(is_complete) = self.is_complete {
            todo.is_complete = is_complete;
        }
        if let Some(due_date) = &self.due_date {
            todo.due_date = Some(due_date.clone());
        }
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

fn strict_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(JsonValue::deserialize(deserializer)?.as_bool())
}

/// Query parameters for the list endpoint
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Also return todos already marked complete
    pub include_complete: bool,
}

/// Response type for the mark-complete endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
