use crate::error::{ApiError, ErrorResponse};
use crate::routes;
use crate::state::AppState;
use crate::store::TodoStore;
use axum::{extract::State, extract::Path, http::StatusCode};

/// DELETE /api/todos/{id} handler - Remove a todo
///
/// Succeeds whether or not the todo existed.
#[utoipa::path(
    delete,
    path = routes::TODO_ITEM,
    params(
        ("id" = String, Path, description = "Todo id")
    ),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete(&id)
        .await
        .map_err(ApiError::storage("Could not delete todo"))?;

    tracing::info!("Deleted todo with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
