use crate::error::{ApiError, ErrorResponse};
use crate::models::Todo;
use crate::routes;
use crate::state::AppState;
use crate::store::TodoStore;
use axum::{extract::State, extract::Path, http::StatusCode, Json};

/// GET /api/todos/{id} handler - Retrieve a single todo
#[utoipa::path(
    get,
    path = routes::TODO_ITEM,
    params(
        ("id" = String, Path, description = "Todo id")
    ),
    responses(
        (status = 200, description = "Todo found", body = Todo),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    match state
        .store
        .get(&id)
        .await
        .map_err(ApiError::storage("Could not fetch todo"))?
    {
        Some(todo) => {
            tracing::info!("Successfully retrieved todo with id: {}", id);
            Ok((StatusCode::OK, Json(todo)))
        }
        None => Err(ApiError::TodoNotFound(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_util::{body_json, create, send};
    use crate::state::test_state;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_endpoint_success() {
        let app = routes::router(test_state());

        let created = create(
            &app,
            json!({
                "title": "test todo",
                "description": "with details",
                "due_date": "2024-12-31T23:59:59Z"
            }),
        )
        .await;

        let response = send(&app, "GET", &format!("/api/todos/{}", created.id), None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let fetched: Todo = body_json(response).await;
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_endpoint_not_found() {
        let app = routes::router(test_state());

        let response = send(&app, "GET", "/api/todos/does-not-exist", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error_response: ErrorResponse = body_json(response).await;
        assert_eq!(error_response.error, "Todo not found");
    }

    #[tokio::test]
    async fn test_get_endpoint_accepts_any_id_format() {
        let app = routes::router(test_state());

        // Ids are opaque, so a non-UUID id is a plain miss rather than a 400
        let response = send(&app, "GET", "/api/todos/not-a-uuid", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_endpoint_store_failure() {
        let app = routes::router(crate::state::failing_state());

        let response = send(&app, "GET", "/api/todos/any", None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error_response: ErrorResponse = body_json(response).await;
        assert_eq!(error_response.error, "Could not fetch todo");
    }
}
