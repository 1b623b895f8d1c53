//! OpenAPI documentation for the HTTP surface, served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::api::{
    handlers,
    models::{
        errors::{DbCheckFailure, ErrorResponse},
        health::{DbCheckResponse, HealthResponse},
        users::UserResponse,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "roster", description = "Read-only user roster backed by PostgreSQL"),
    paths(handlers::health::health, handlers::health::test_db, handlers::users::list_users),
    components(schemas(HealthResponse, DbCheckResponse, DbCheckFailure, ErrorResponse, UserResponse)),
    tags(
        (name = "health", description = "Liveness and database connectivity"),
        (name = "users", description = "User records"),
    )
)]
pub struct ApiDoc;
