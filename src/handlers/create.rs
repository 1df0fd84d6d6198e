use crate::error::{ApiError, ErrorResponse};
use crate::models::{CreateTodo, Todo};
use crate::routes;
use crate::state::AppState;
use crate::store::TodoStore;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

/// POST /api/todos handler - Create a todo
///
/// The id is generated here and the todo always starts out incomplete.
/// A request without a JSON content type carries no fields, so it creates a
/// todo with every optional field null.
#[utoipa::path(
    post,
    path = routes::TODOS,
    request_body = CreateTodo,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Body is not a todo object", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    ),
    tag = "todos"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input = match body {
        Ok(Json(input)) => input,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateTodo::default(),
        Err(rejection) => return Err(ApiError::InvalidBody(rejection.body_text())),
    };
    let todo = Todo::new(input);

    state
        .store
        .put(&todo)
        .await
        .map_err(ApiError::storage("Could not save todo"))?;

    tracing::info!("Successfully created todo with id: {}", todo.id);
    Ok((StatusCode::CREATED, Json(todo)))
}
