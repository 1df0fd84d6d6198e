use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{CreateTodo, MessageResponse, Todo, TodoPatch};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "rust-spanner-todo API",
        version = "1.0.0",
        description = "A todo CRUD service backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::get::get_handler,
        handlers::create::create_handler,
        handlers::update::update_handler,
        handlers::complete::complete_handler,
        handlers::delete::delete_handler
    ),
    components(
        schemas(
            Todo,
            CreateTodo,
            TodoPatch,
            MessageResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "todos", description = "Todo CRUD operations")
    )
)]
pub struct ApiDoc;
