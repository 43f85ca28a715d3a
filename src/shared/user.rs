/**
 * User Profile and Authentication Payloads
 *
 * This module defines the public view of a user account and the request and
 * response bodies exchanged with the `/api/auth` endpoints. The password hash
 * never leaves the backend; clients only ever see `UserProfile`.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::patch::double_option;

/// Public user information, safe to return to any authenticated client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User's unique ID
    pub id: Uuid,
    /// Display name (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Chosen username (3-30 chars, starts with a letter, alphanumeric + underscore)
    pub username: String,
    /// Email address
    pub email: String,
    /// Plain-text password, hashed before storage
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address the account was registered with
    pub email: String,
    /// Plain-text password, verified against the stored hash
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token (30-day expiration)
    pub token: String,
    /// The authenticated user
    pub user: UserProfile,
}

/// Profile update request
///
/// Absent fields are left untouched. `avatar: null` removes the avatar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<Option<String>>,
}
