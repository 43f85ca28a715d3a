/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * Keys are derived once from the configured secret and stored in `AppState`
 * as a `TokenKeys` value, so handlers and the socket upgrade share them.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::store::User;

/// Token lifetime: 30 days
pub const TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Username at the time the token was issued
    #[serde(default)]
    pub username: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Parse the subject back into a user ID
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Signing and verification keys (HS256)
#[derive(Clone)]
pub struct TokenKeys {
    inner: Arc<KeyPair>,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenKeys { .. }")
    }
}

impl TokenKeys {
    /// Derive keys from a shared secret
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            inner: Arc::new(KeyPair {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
        }
    }

    /// Create a token for a user
    ///
    /// # Returns
    /// JWT token string valid for [`TOKEN_TTL_SECS`]
    pub fn issue(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            username: Some(user.username.clone()),
            exp: now + TOKEN_TTL_SECS,
            iat: now,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.inner.encoding)
    }

    /// Verify and decode a JWT token
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &self.inner.decoding, &validation)?;
        Ok(token_data.claims)
    }
}

/// Extract the bearer token from an `Authorization` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
