/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and profile
 *
 * # Security
 *
 * - Unknown email and wrong password both return the same 401
 * - User passwords are never returned in responses
 */
use axum::{extract::State, Json};

use crate::backend::error::{ApiResult, BackendError};
use crate::backend::server::state::AppState;
use crate::shared::{AuthResponse, LoginRequest};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - user not found or password incorrect
/// * `500 Internal Server Error` - storage or token generation failed
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = request.email.trim().to_lowercase();
    tracing::info!("Login request for: {}", email);

    let user = state.store.user_by_email(&email).await?.ok_or_else(|| {
        tracing::warn!("User not found: {}", email);
        BackendError::unauthorized(INVALID_CREDENTIALS)
    })?;

    if !bcrypt::verify(&request.password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(&user)?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.profile(),
    }))
}
