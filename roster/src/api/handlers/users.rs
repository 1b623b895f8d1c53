//! HTTP handlers for user listing.

use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::{errors::ErrorResponse, users::UserResponse},
    db::handlers::{Repository, Users},
    errors::Error,
};

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    summary = "List users",
    description = "All user records ordered by ID. An empty table gives an empty array.",
    responses(
        (status = 200, description = "Users in ID order", body = [UserResponse]),
        (status = 500, description = "Database error", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, Error> {
    let mut conn = state.db.acquire().await?;
    let mut repo = Users::new(&mut conn);

    let users = repo.list().await?;
    tracing::debug!(count = users.len(), "Listed users");

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
