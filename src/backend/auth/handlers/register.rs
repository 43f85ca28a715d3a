/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate username, email and password
 * 2. Check that neither username nor email is taken
 * 3. Hash the password using bcrypt
 * 4. Store the user
 * 5. Issue a JWT token
 * 6. Return token and profile
 */

use axum::{extract::State, http::StatusCode, Json};

use crate::backend::auth::handlers::validation::{check_email, check_password, check_username};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::server::state::AppState;
use crate::backend::store::User;
use crate::shared::{AuthResponse, RegisterRequest};

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid username, email or password, or the
///   username or email is already registered
/// * `500 Internal Server Error` - hashing, storage or token generation failed
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "securepassword123"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let username = request.username.trim().to_string();
    let email = request.email.trim().to_lowercase();
    tracing::info!("Register request for username: {}, email: {}", username, email);

    check_username(&username)?;
    check_email(&email)?;
    check_password(&request.password)?;

    if state.store.user_by_username(&username).await?.is_some() {
        tracing::warn!("Username already exists: {}", username);
        return Err(BackendError::bad_request("Username already taken"));
    }

    if state.store.user_by_email(&email).await?.is_some() {
        tracing::warn!("Email already exists: {}", email);
        return Err(BackendError::bad_request("Email already registered"));
    }

    let password_hash = bcrypt::hash(&request.password, state.password_cost)?;

    let user = User::new(username, email, password_hash);
    state.store.insert_user(&user).await?;

    let token = state.tokens.issue(&user)?;

    tracing::info!("User created successfully: {} ({})", user.username, user.email);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.profile(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> Json<RegisterRequest> {
        Json(RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn test_register_success() {
        let state = AppState::in_memory("test-secret");
        let (status, Json(response)) = register(
            State(state.clone()),
            request("alice", "Alice@Example.com", "password123"),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(response.user.email, "alice@example.com");
        let claims = state.tokens.verify(&response.token).unwrap();
        assert_eq!(claims.user_id(), Some(response.user.id));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let state = AppState::in_memory("test-secret");
        register(State(state.clone()), request("alice", "a@example.com", "password123"))
            .await
            .unwrap();

        let err = register(State(state), request("alice2", "a@example.com", "password123"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Email already registered");
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let state = AppState::in_memory("test-secret");
        let err = register(State(state), request("alice", "a@example.com", "short"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
