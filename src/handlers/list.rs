use crate::error::{ApiError, ErrorResponse};
use crate::models::{ListQuery, Todo};
use crate::routes;
use crate::state::AppState;
use crate::store::TodoStore;
use axum::{extract::Query, extract::State, http::StatusCode, Json};

/// GET /api/todos handler - List todos
///
/// Scans the whole table. Completed todos are left out unless
/// `include_complete=true` is passed.
#[utoipa::path(
    get,
    path = routes::TODOS,
    params(ListQuery),
    responses(
        (status = 200, description = "List of todos", body = Vec<Todo>),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<(StatusCode, Json<Vec<Todo>>), ApiError> {
    let mut todos = state
        .store
        .list()
        .await
        .map_err(ApiError::storage("Could not fetch todos"))?;

    let scanned = todos.len();
    if !query.include_complete {
        todos.retain(|todo| !todo.is_complete);
    }

    tracing::info!(
        "Listed {} todos ({} scanned, include_complete: {})",
        todos.len(),
        scanned,
        query.include_complete
    );

    Ok((StatusCode::OK, Json(todos)))
}
