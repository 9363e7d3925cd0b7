//! Authentication API Endpoints
//! Mission: Registration, login and the caller's own identity

use crate::api::{blocking, ApiJson, ApiResponse, AppState};
use crate::auth::models::{Identity, LoginRequest, LoginResponse, RegisterRequest};
use crate::errors::AppResult;
use crate::models::User;
use axum::{extract::State, Json};

/// Register endpoint - POST /api/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> AppResult<ApiResponse<User>> {
    let auth = state.auth.clone();
    let user = blocking(move || auth.register(payload)).await?;
    Ok(ApiResponse::created("User registered successfully", user))
}

/// Login endpoint - POST /api/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let auth = state.auth.clone();
    let (issued, user) = blocking(move || auth.login(payload)).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        expires_in: issued.expires_in(),
        token: issued.token,
        role: user.role,
        user,
    }))
}

/// Current identity - GET /api/me
///
/// Answered from the token claims alone.
pub async fn me(identity: Identity) -> ApiResponse<Identity> {
    ApiResponse::ok("Authenticated", identity)
}
