/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require
 * user authentication. It extracts and verifies JWT tokens from the
 * Authorization header and provides the user to handlers.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::bearer_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
}

/// Resolve a raw token into the user it belongs to
///
/// The token must verify and its subject must still exist in the store.
/// Shared by the HTTP middleware and the socket upgrade.
pub async fn authenticate(state: &AppState, token: &str) -> Result<AuthenticatedUser, BackendError> {
    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!("Invalid token: {}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| BackendError::unauthorized("Invalid token subject"))?;

    let user = state.store.user_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!("Token for unknown user: {}", user_id);
        BackendError::unauthorized("User no longer exists")
    })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        username: user.username,
    })
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the JWT token from the Authorization header
/// 2. Verifies the token and loads the user
/// 3. Attaches the user to request extensions for use in handlers
///
/// Returns 401 Unauthorized if the token is missing or invalid
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::unauthorized("Missing Authorization header")
        })?;

    let token = bearer_token(header).ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        BackendError::unauthorized("Invalid Authorization header format")
    })?;

    let user = authenticate(&app_state, token).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::unauthorized("Not authenticated")
            })?;

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::User;

    #[tokio::test]
    async fn test_authenticate_known_user() {
        let state = AppState::in_memory("test-secret");
        let user = User::new("alice".into(), "alice@example.com".into(), "hash".into());
        state.store.insert_user(&user).await.unwrap();
        let token = state.tokens.issue(&user).unwrap();

        let authenticated = authenticate(&state, &token).await.unwrap();
        assert_eq!(authenticated.user_id, user.id);
        assert_eq!(authenticated.username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let state = AppState::in_memory("test-secret");
        let ghost = User::new("ghost".into(), "ghost@example.com".into(), "hash".into());
        let token = state.tokens.issue(&ghost).unwrap();

        let err = authenticate(&state, &token).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_authenticate_garbage_token() {
        let state = AppState::in_memory("test-secret");
        assert!(authenticate(&state, "not-a-token").await.is_err());
    }
}
