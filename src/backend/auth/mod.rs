//! Authentication Module
//!
//! This module handles user registration, login and session tokens.
//!
//! # Architecture
//!
//! - **`sessions`** - JWT token generation and validation (`TokenKeys`)
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! User records themselves live in `backend::store`.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email and password → user stored → token returned
//! 2. **Login**: email and password → credentials verified → token returned
//! 3. **Authenticated requests**: `Authorization: Bearer <token>` → middleware
//!    verifies the token and loads the user
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs that expire after 30 days
//! - Invalid credentials return 401 without saying which part was wrong

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{get_profile, login, register, update_profile};
pub use sessions::{Claims, TokenKeys};
