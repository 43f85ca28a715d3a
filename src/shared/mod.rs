//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client library and the backend. These types are used for
//! serialization over the REST API and the real-time project channel.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All wire types serialize to camelCase
//! JSON so browser clients can consume them directly.

/// Project data structure and request bodies
pub mod project;

/// Task data structure, status flow and request bodies
pub mod task;

/// Public user profile and auth payloads
pub mod user;

/// Real-time event vocabulary
pub mod event;

/// Explicit-presence helpers for update requests
pub mod patch;

/// Shared error types
pub mod error;

/// Client connection configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use project::{AddMemberRequest, CreateProjectRequest, Project, ProjectStatus, UpdateProjectRequest};
pub use task::{Attachment, CreateTaskRequest, Task, TaskPriority, TaskStatus, UpdateTaskRequest};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, UserProfile};
pub use event::{ClientEvent, ServerEvent, TypingIndicator};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
