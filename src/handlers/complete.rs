use crate::error::{ApiError, ErrorResponse};
use crate::models::{MessageResponse, TodoPatch};
use crate::routes;
use crate::state::AppState;
use crate::store::TodoStore;
use axum::{extract::State, extract::Path, http::StatusCode, Json};

/// PATCH /api/todos/{id}/complete handler - Mark a todo complete
///
/// Kept for clients of the older single-purpose PATCH. Any request body is
/// ignored and only a confirmation message is returned.
#[utoipa::path(
    patch,
    path = routes::TODO_COMPLETE,
    params(
        ("id" = String, Path, description = "Todo id")
    ),
    responses(
        (status = 200, description = "Todo marked as complete", body = MessageResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn complete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state
        .store
        .update_partial(&id, &TodoPatch::mark_complete())
        .await
        .map_err(ApiError::storage("Could not update todo"))?
        .ok_or_else(|| ApiError::TodoNotFound(id.clone()))?;

    tracing::info!("Marked todo complete with id: {}", id);
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Todo marked as complete".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_util::{body_json, create, send};
    use crate::models::Todo;
    use crate::state::test_state;
    use serde_json::json;

    #[tokio::test]
    async fn test_complete_endpoint_success() {
        let app = routes::router(test_state());
        let created = create(&app, json!({"title": "finish me"})).await;

        // The body is ignored, even one that asks for the opposite
        let response = send(
            &app,
            "PATCH",
            &format!("/api/todos/{}/complete", created.id),
            Some(json!({"is_complete": false, "title": "ignored"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let message: MessageResponse = body_json(response).await;
        assert_eq!(message.message, "Todo marked as complete");

        let response = send(&app, "GET", &format!("/api/todos/{}", created.id), None).await;
        let fetched: Todo = body_json(response).await;
        assert!(fetched.is_complete);
        assert_eq!(fetched.title.as_deref(), Some("finish me"));
    }

    #[tokio::test]
    async fn test_complete_endpoint_without_body() {
        let app = routes::router(test_state());
        let created = create(&app, json!({"title": "no body"})).await;

        let response = send(&app, "PATCH", &format!("/api/todos/{}/complete", created.id), None).await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_complete_endpoint_not_found() {
        let app = routes::router(test_state());

        let response = send(&app, "PATCH", "/api/todos/missing/complete", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error_response: ErrorResponse = body_json(response).await;
        assert_eq!(error_response.error, "Todo not found");
    }

    #[tokio::test]
    async fn test_complete_endpoint_store_failure() {
        let app = routes::router(crate::state::failing_state());

        let response = send(&app, "PATCH", "/api/todos/any/complete", None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error_response: ErrorResponse = body_json(response).await;
        assert_eq!(error_response.error, "Could not update todo");
    }
}
