//! REST API Client
//!
//! Thin async wrapper over `reqwest` for every `/api` endpoint. Register and
//! login store the returned token so later calls are authenticated.

use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::client::error::ClientError;
use crate::shared::{
    AddMemberRequest, AppConfig, AuthResponse, CreateProjectRequest, CreateTaskRequest, LoginRequest,
    Project, RegisterRequest, Task, UpdateProfileRequest, UpdateProjectRequest, UpdateTaskRequest,
    UserProfile,
};

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: AppConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn token(&self) -> Option<&str> {
        self.config.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.config.token = None;
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(builder.bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = check(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_authorized<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let builder = self.authorized(builder)?;
        self.send(builder).await
    }

    // Auth

    /// Create an account and keep its token
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let url = self.config.api_url("/api/auth/register");
        let auth: AuthResponse = self.send(self.client.post(&url).json(request)).await?;
        self.set_token(auth.token.clone());
        Ok(auth)
    }

    /// Log in by email and keep the token
    pub async fn login(&mut self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let url = self.config.api_url("/api/auth/login");
        let auth: AuthResponse = self.send(self.client.post(&url).json(request)).await?;
        self.set_token(auth.token.clone());
        Ok(auth)
    }

    pub async fn get_profile(&self) -> Result<UserProfile, ClientError> {
        let url = self.config.api_url("/api/auth/profile");
        self.send_authorized(self.client.get(&url)).await
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<UserProfile, ClientError> {
        let url = self.config.api_url("/api/auth/profile");
        self.send_authorized(self.client.put(&url).json(request)).await
    }

    // Projects

    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, ClientError> {
        let url = self.config.api_url("/api/projects");
        self.send_authorized(self.client.post(&url).json(request)).await
    }

    /// Projects the caller belongs to, newest first
    pub async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        let url = self.config.api_url("/api/projects");
        self.send_authorized(self.client.get(&url)).await
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project, ClientError> {
        let url = self.config.api_url(&format!("/api/projects/{}", id));
        self.send_authorized(self.client.get(&url)).await
    }

    pub async fn update_project(&self, id: Uuid, request: &UpdateProjectRequest) -> Result<Project, ClientError> {
        let url = self.config.api_url(&format!("/api/projects/{}", id));
        self.send_authorized(self.client.put(&url).json(request)).await
    }

    pub async fn delete_project(&self, id: Uuid) -> Result<String, ClientError> {
        let url = self.config.api_url(&format!("/api/projects/{}", id));
        let body: MessageBody = self.send_authorized(self.client.delete(&url)).await?;
        Ok(body.message)
    }

    pub async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> Result<Project, ClientError> {
        let url = self.config.api_url(&format!("/api/projects/{}/members", project_id));
        let request = AddMemberRequest { user_id };
        self.send_authorized(self.client.post(&url).json(&request)).await
    }

    // Tasks

    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
        let url = self.config.api_url("/api/tasks");
        self.send_authorized(self.client.post(&url).json(request)).await
    }

    /// Tasks of a project, newest first
    pub async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ClientError> {
        let url = self.config.api_url(&format!("/api/tasks/project/{}", project_id));
        self.send_authorized(self.client.get(&url)).await
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, ClientError> {
        let url = self.config.api_url(&format!("/api/tasks/{}", id));
        self.send_authorized(self.client.get(&url)).await
    }

    pub async fn update_task(&self, id: Uuid, request: &UpdateTaskRequest) -> Result<Task, ClientError> {
        let url = self.config.api_url(&format!("/api/tasks/{}", id));
        self.send_authorized(self.client.put(&url).json(request)).await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<String, ClientError> {
        let url = self.config.api_url(&format!("/api/tasks/{}", id));
        let body: MessageBody = self.send_authorized(self.client.delete(&url)).await?;
        Ok(body.message)
    }

    /// Upload one file as a task attachment (multipart field `attachment`)
    pub async fn upload_attachment(
        &self,
        task_id: Uuid,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Task, ClientError> {
        let url = self.config.api_url(&format!("/api/tasks/{}/attachments", task_id));
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("attachment", part);
        self.send_authorized(self.client.post(&url).multipart(form)).await
    }
}

/// Turn a non-success response into `ClientError::Api`, preferring the
/// server's `{"error": ...}` message over the raw body
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_else(|_| status.to_string());
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    tracing::debug!("[Client] {} - {}", status, message);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
