use super::{blocking, parse_id, ApiJson, ApiResponse, AppState};
use crate::auth::models::Identity;
use crate::errors::AppResult;
use crate::models::{UpdateUserRequest, User};
use axum::extract::{Path, State};

/// GET /api/users (admin)
pub async fn list_users(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<User>>> {
    let users = state.users.list()?;
    Ok(ApiResponse::ok("Users retrieved successfully", users))
}

/// GET /api/users/:id (admin, or the user themself)
pub async fn get_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<User>> {
    let id = parse_id(&id, "user")?;
    let user = state.users.get(identity, id)?;
    Ok(ApiResponse::ok("User retrieved successfully", user))
}

/// PUT /api/users/:id (admin)
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<User>> {
    let id = parse_id(&id, "user")?;
    let users = state.users.clone();
    let user = blocking(move || users.update(id, payload)).await?;
    Ok(ApiResponse::ok("User updated successfully", user))
}

/// DELETE /api/users/:id (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = parse_id(&id, "user")?;
    state.users.delete(identity, id)?;
    Ok(ApiResponse::ok("User deleted successfully", ()))
}
