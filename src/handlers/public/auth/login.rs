// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{extract::State, Json};

use crate::api::{LoginRequest, LoginResponse};
use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /auth/login - Authenticate user and receive JWT token
///
/// Input: `{"email": "...", "password": "..."}`.
/// Output: `{"token": "...", "user": {...}, "expires_in": <seconds>}`.
/// Unknown emails and wrong passwords get the same 401.
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let user = match state.store.find_user_by_email(&email).await? {
        Some(user) if auth::verify_password(&req.password, &user.password_hash) => user,
        _ => {
            tracing::warn!("Failed login attempt for {}", email);
            return Err(ApiError::unauthorized("Invalid email or password"));
        }
    };

    let claims = Claims::new(user.id, user.name.clone(), user.role, user.company_id, user.technician_id);
    let token = auth::generate_jwt(&claims)?;

    tracing::info!("{} logged in as {}", user.email, user.role);

    Ok(ApiResponse::success(LoginResponse {
        token,
        expires_in: claims.expires_in(),
        user: user.summary(),
    }))
}
