use std::sync::Arc;

use axum::{Json, extract::State};

use super::DirectoryUser;
use crate::gateway::error::{ApiError, ApiResult, ErrorBody};
use crate::gateway::state::AppState;

/// List users from the identity provider
///
/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = Vec<DirectoryUser>),
        (status = 500, description = "Identity provider error", body = ErrorBody)
    ),
    tag = "Users"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<DirectoryUser>>> {
    let users = state
        .directory
        .list_users()
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch users", e))?;
    Ok(Json(users))
}
