//! Common test utilities and helpers
//!
//! - `app` - in-memory application driven through `tower::ServiceExt::oneshot`
//! - `assertions` - assertion macros

pub mod app;
#[macro_use]
pub mod assertions;

#[allow(unused_imports)]
pub use app::*;
