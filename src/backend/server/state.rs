/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The persistence backend (`dyn Store`)
 * - The real-time room table (`EventChannel`)
 * - The attachment storage backend
 * - The token signing keys
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and safe to share between tasks:
 * - `Arc<dyn Store>` / `Arc<dyn AttachmentStorage>` are `Send + Sync` trait objects
 * - `EventChannel` wraps its table in `Arc<Mutex<_>>`
 * - `TokenKeys` wraps its keys in an `Arc`
 *
 * # Example
 *
 * ```rust,ignore
 * use taskcollab::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let projects = state.store.projects_for_member(user_id).await?;
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::attachments::{AttachmentStorage, LocalAttachmentStorage};
use crate::backend::auth::sessions::TokenKeys;
use crate::backend::realtime::EventChannel;
use crate::backend::store::{MemoryStore, Store};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Users, projects and tasks
    pub store: Arc<dyn Store>,

    /// Project rooms for the real-time channel
    pub channel: EventChannel,

    /// Where task attachments are written
    pub attachments: Arc<dyn AttachmentStorage>,

    /// JWT signing and verification keys
    pub tokens: TokenKeys,

    /// bcrypt work factor for new password hashes
    pub password_cost: u32,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        attachments: Arc<dyn AttachmentStorage>,
        tokens: TokenKeys,
    ) -> Self {
        Self {
            store,
            channel: EventChannel::new(),
            attachments,
            tokens,
            password_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    /// Throwaway state for tests: in-memory store, attachments under the
    /// system temp directory and the cheapest bcrypt cost
    pub fn in_memory(jwt_secret: &str) -> Self {
        let uploads = std::env::temp_dir().join("taskcollab-uploads");
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(LocalAttachmentStorage::new(uploads, "http://localhost")),
            TokenKeys::from_secret(jwt_secret.as_bytes()),
        )
        .with_password_cost(4)
    }
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for EventChannel {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.channel.clone()
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}
