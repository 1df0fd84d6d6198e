use crate::error::{ApiError, ErrorResponse};
use crate::models::{Todo, TodoPatch};
use crate::routes;
use crate::state::AppState;
use crate::store::TodoStore;
use axum::{extract::rejection::JsonRejection, extract::State, extract::Path, http::StatusCode, Json};

/// PATCH /api/todos/{id} handler - Partially update a todo
///
/// Only fields carrying a usable value are written; see [`TodoPatch`].
/// A body with no such field is rejected before the store is touched, and so
/// is a missing body or one that is not a JSON object.
#[utoipa::path(
    patch,
    path = routes::TODO_ITEM,
    params(
        ("id" = String, Path, description = "Todo id")
    ),
    request_body = TodoPatch,
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, description = "No valid fields provided", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let patch = match body {
        Ok(Json(patch)) if !patch.is_empty() => patch,
        Ok(_) => return Err(ApiError::NoUpdateFields),
        Err(rejection) => {
            tracing::debug!("Unusable update body for todo {}: {}", id, rejection.body_text());
            return Err(ApiError::NoUpdateFields);
        }
    };

    let todo = state
        .store
        .update_partial(&id, &patch)
        .await
        .map_err(ApiError::storage("Could not update todo"))?
        .ok_or_else(|| ApiError::TodoNotFound(id.clone()))?;

    tracing::info!("Successfully updated todo with id: {}", id);
    Ok((StatusCode::OK, Json(todo)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_util::{body_json, create, send};
    use crate::state::test_state;
    use serde_json::json;

    #[tokio::test]
    async fn test_update_endpoint_marks_complete() {
        let app = routes::router(test_state());
        let created = create(
            &app,
            json!({"title": "Buy milk", "description": "2 litres", "due_date": "tomorrow"}),
        )
        .await;
        let uri = format!("/api/todos/{}", created.id);

        let response = send(&app, "PATCH", &uri, Some(json!({"is_complete": true}))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let updated: Todo = body_json(response).await;
        assert!(updated.is_complete);

        let response = send(&app, "GET", &uri, None).await;
        let fetched: Todo = body_json(response).await;
        assert_eq!(
            fetched,
            Todo {
                is_complete: true,
                ..created
            }
        );
    }

    #[tokio::test]
    async fn test_update_endpoint_several_fields() {
        let app = routes::router(test_state());
        let created = create(&app, json!({"title": "old"})).await;

        let response = send(
            &app,
            "PATCH",
            &format!("/api/todos/{}", created.id),
            Some(json!({"title": "new", "due_date": "2031-02-03", "unknown": 1})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let updated: Todo = body_json(response).await;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title.as_deref(), Some("new"));
        assert_eq!(updated.due_date.as_deref(), Some("2031-02-03"));
        assert_eq!(updated.description, None);
        assert!(!updated.is_complete);
    }

    #[tokio::test]
    async fn test_update_endpoint_no_fields() {
        let app = routes::router(test_state());
        let created = create(&app, json!({"title": "unchanged"})).await;
        let uri = format!("/api/todos/{}", created.id);

        let response = send(&app, "PATCH", &uri, Some(json!({}))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error_response: ErrorResponse = body_json(response).await;
        assert_eq!(error_response.error, "No valid fields provided to update");

        let response = send(&app, "GET", &uri, None).await;
        let fetched: Todo = body_json(response).await;
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_update_endpoint_empty_string_is_absent() {
        let app = routes::router(test_state());
        let created = create(&app, json!({"title": "keep"})).await;
        let uri = format!("/api/todos/{}", created.id);

        let response = send(&app, "PATCH", &uri, Some(json!({"title": "", "is_complete": "yes"}))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, "GET", &uri, None).await;
        let fetched: Todo = body_json(response).await;
        assert_eq!(fetched.title.as_deref(), Some("keep"));
    }

    #[tokio::test]
    async fn test_update_endpoint_unusable_bodies() {
        let app = routes::router(test_state());
        let created = create(&app, json!({"title": "unchanged"})).await;
        let uri = format!("/api/todos/{}", created.id);

        // No body and no content-type, then JSON values that are not objects
        let response = send(&app, "PATCH", &uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error_response: ErrorResponse = body_json(response).await;
        assert_eq!(error_response.error, "No valid fields provided to update");

        for body in [json!(null), json!([1, 2]), json!("title"), json!(true)] {
            let response = send(&app, "PATCH", &uri, Some(body.clone())).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
            let error_response: ErrorResponse = body_json(response).await;
            assert_eq!(error_response.error, "No valid fields provided to update");
        }

        let response = send(&app, "GET", &uri, None).await;
        let fetched: Todo = body_json(response).await;
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_update_endpoint_store_failure() {
        let app = routes::router(crate::state::failing_state());

        let response = send(
            &app,
            "PATCH",
            "/api/todos/any",
            Some(json!({"title": "new"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error_response: ErrorResponse = body_json(response).await;
        assert_eq!(error_response.error, "Could not update todo");
    }

    #[tokio::test]
    async fn test_update_endpoint_not_found() {
        let app = routes::router(test_state());

        let response = send(
            &app,
            "PATCH",
            "/api/todos/missing",
            Some(json!({"title": "ghost"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // The update must not have created the record
        let response = send(&app, "GET", "/api/todos/missing", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
