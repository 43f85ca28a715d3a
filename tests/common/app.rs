//! In-memory application harness
//!
//! Builds the full router over `MemoryStore`, with attachments written to a
//! temporary directory that lives as long as the `TestApp`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use taskcollab::backend::attachments::LocalAttachmentStorage;
use taskcollab::backend::auth::TokenKeys;
use taskcollab::backend::routes::create_router;
use taskcollab::backend::server::{AppState, ServerConfig};
use taskcollab::backend::store::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "password123";

/// Response status plus parsed JSON body (`Value::Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// A registered account
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let uploads = TempDir::new().expect("temp upload dir");
        let config = ServerConfig {
            upload_dir: uploads.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(LocalAttachmentStorage::new(
                uploads.path().to_path_buf(),
                config.public_url.clone(),
            )),
            TokenKeys::from_secret(TEST_SECRET.as_bytes()),
        )
        .with_password_cost(4);
        let router = create_router(state.clone(), &config);
        Self {
            state,
            router,
            uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, body }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, username: &str) -> TestUser {
        let response = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": TEST_PASSWORD,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "register: {}", response.body);
        TestUser {
            id: parse_id(&response.body["user"]["id"]),
            username: username.to_string(),
            token: response.body["token"].as_str().expect("token").to_string(),
        }
    }

    pub async fn create_project(&self, owner: &TestUser, title: &str) -> Value {
        let response = self
            .post("/api/projects", &owner.token, json!({ "title": title }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "create project: {}", response.body);
        response.body
    }

    pub async fn add_member(&self, owner: &TestUser, project_id: Uuid, member: &TestUser) -> TestResponse {
        self.post(
            &format!("/api/projects/{}/members", project_id),
            &owner.token,
            json!({ "userId": member.id }),
        )
        .await
    }

    pub async fn create_task(&self, user: &TestUser, project_id: Uuid, title: &str) -> Value {
        let response = self
            .post(
                "/api/tasks",
                &user.token,
                json!({ "title": title, "project": project_id }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "create task: {}", response.body);
        response.body
    }
}

pub fn parse_id(value: &Value) -> Uuid {
    value
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .unwrap_or_else(|| panic!("not a uuid: {}", value))
}
