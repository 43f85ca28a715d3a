//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs        - Module exports and documentation
//! ├── validation.rs - Username, email and password rules
//! ├── register.rs   - User registration handler
//! ├── login.rs      - User authentication handler
//! └── profile.rs    - Own profile read and update
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register - User registration
//! - **`login`** - POST /api/auth/login - User authentication
//! - **`get_profile`** - GET /api/auth/profile - Current user's profile
//! - **`update_profile`** - PUT /api/auth/profile - Update current user's profile

/// Field validation rules
pub mod validation;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Profile handlers
pub mod profile;

pub use login::login;
pub use profile::{get_profile, update_profile};
pub use register::register;
