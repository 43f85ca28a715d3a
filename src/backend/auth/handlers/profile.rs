/**
 * Profile Handlers
 *
 * `GET /api/auth/profile` returns the caller's own profile and
 * `PUT /api/auth/profile` updates it. Both sit behind the auth middleware,
 * so the subject is always the authenticated caller.
 */

use axum::{extract::State, Json};
use chrono::Utc;

use crate::backend::auth::handlers::validation::{check_email, check_password, check_username};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::store::User;
use crate::shared::patch;
use crate::shared::{UpdateProfileRequest, UserProfile};

async fn load_user(state: &AppState, auth: &AuthUser) -> ApiResult<User> {
    state
        .store
        .user_by_id(auth.0.user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}

pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserProfile>> {
    let user = load_user(&state, &auth).await?;
    Ok(Json(user.profile()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfile>> {
    let mut user = load_user(&state, &auth).await?;

    if let Some(username) = request.username {
        let username = username.trim().to_string();
        check_username(&username)?;
        user.username = username;
    }

    if let Some(email) = request.email {
        let email = email.trim().to_lowercase();
        check_email(&email)?;
        user.email = email;
    }

    if let Some(password) = request.password {
        check_password(&password)?;
        user.password_hash = bcrypt::hash(&password, state.password_cost)?;
    }

    patch::apply_nullable(&mut user.avatar, request.avatar);
    user.updated_at = Utc::now();

    state.store.update_user(&user).await?;
    tracing::info!("Profile updated for {}", user.username);

    Ok(Json(user.profile()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::middleware::AuthenticatedUser;

    async fn setup() -> (AppState, AuthUser) {
        let state = AppState::in_memory("test-secret");
        let mut user = User::new("alice".into(), "alice@example.com".into(), "hash".into());
        user.avatar = Some("http://localhost/a.png".into());
        state.store.insert_user(&user).await.unwrap();
        let auth = AuthUser(AuthenticatedUser {
            user_id: user.id,
            email: user.email,
            username: user.username,
        });
        (state, auth)
    }

    #[tokio::test]
    async fn test_update_clears_avatar_and_keeps_email() {
        let (state, auth) = setup().await;
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"username": "alice_w", "avatar": null}"#).unwrap();

        let Json(profile) = update_profile(State(state), auth, Json(request)).await.unwrap();
        assert_eq!(profile.username, "alice_w");
        assert_eq!(profile.email, "alice@example.com");
        assert_eq!(profile.avatar, None);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_username() {
        let (state, auth) = setup().await;
        let bob = User::new("bob".into(), "bob@example.com".into(), "hash".into());
        state.store.insert_user(&bob).await.unwrap();

        let request = UpdateProfileRequest {
            username: Some("bob".into()),
            ..Default::default()
        };
        let err = update_profile(State(state), auth, Json(request)).await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
