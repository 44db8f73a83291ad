//! Typed HTTP client for the backend API.
//!
//! One `ApiClient` is shared (cheaply cloned) by every component that
//! talks to the server. It owns the session token cell: installing or
//! clearing the token here immediately affects every in-flight clone,
//! which is what lets a background task observe a logout.

use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use super::error::ApiError;
use super::payloads::{
    Credentials, EdgeCreate, EdgeRecord, ErrorBody, ExecutionCreate, ExecutionRecord, NodeCreate,
    NodeRecord, NodeUpdate, TokenGrant, UserProfile, Workflow, WorkflowCreate, WorkflowUpdate,
};
use crate::types::{EdgeId, NodeId, WorkflowId};

/// HTTP client for the authoritative workflow store.
///
/// All calls return [`ApiError`] on failure, already classified for the
/// error channel: 401 responses become [`ApiError::Unauthorized`], other
/// error statuses surface the backend's `detail` message, and connection
/// or decode problems become the transport class.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Creates a client for the given backend base URL (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Installs or clears the bearer token used on subsequent calls.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    /// The currently installed token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Returns `true` when a token is installed.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let builder = self.http.request(method, url);
        match self.token.read().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        Err(Self::rejection(status, response).await)
    }

    async fn expect_success(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::rejection(status, response).await)
    }

    async fn rejection(status: StatusCode, response: reqwest::Response) -> ApiError {
        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => format!("request failed with status {status}"),
        };
        debug!(status = status.as_u16(), %message, "server rejected request");
        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::decode(response).await
    }

    async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        Self::decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::expect_success(response).await
    }

    // ---- auth ----

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenGrant, ApiError> {
        self.post("/auth/login", credentials).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, credentials: &Credentials) -> Result<UserProfile, ApiError> {
        self.post("/auth/register", credentials).await
    }

    /// `GET /users/me`
    pub async fn get_me(&self) -> Result<UserProfile, ApiError> {
        self.get("/users/me").await
    }

    // ---- workflows ----

    /// `GET /workflows`
    pub async fn list_workflows(&self) -> Result<Vec<Workflow>, ApiError> {
        self.get("/workflows").await
    }

    /// `POST /workflows`
    pub async fn create_workflow(&self, name: &str) -> Result<Workflow, ApiError> {
        self.post(
            "/workflows",
            &WorkflowCreate {
                name: name.to_string(),
            },
        )
        .await
    }

    /// `PATCH /workflows/{id}`
    pub async fn update_workflow(&self, id: WorkflowId, name: &str) -> Result<Workflow, ApiError> {
        self.patch(
            &format!("/workflows/{id}"),
            &WorkflowUpdate {
                name: Some(name.to_string()),
            },
        )
        .await
    }

    /// `DELETE /workflows/{id}`
    pub async fn delete_workflow(&self, id: WorkflowId) -> Result<(), ApiError> {
        self.delete(&format!("/workflows/{id}")).await
    }

    // ---- nodes ----

    /// `GET /nodes?workflow_id=`
    pub async fn list_nodes(&self, workflow_id: WorkflowId) -> Result<Vec<NodeRecord>, ApiError> {
        self.get(&format!("/nodes?workflow_id={workflow_id}")).await
    }

    /// `POST /nodes`
    pub async fn create_node(&self, payload: &NodeCreate) -> Result<NodeRecord, ApiError> {
        self.post("/nodes", payload).await
    }

    /// `PATCH /nodes/{id}`
    pub async fn update_node(
        &self,
        id: NodeId,
        update: &NodeUpdate,
    ) -> Result<NodeRecord, ApiError> {
        self.patch(&format!("/nodes/{id}"), update).await
    }

    /// `DELETE /nodes/{id}`
    pub async fn delete_node(&self, id: NodeId) -> Result<(), ApiError> {
        self.delete(&format!("/nodes/{id}")).await
    }

    // ---- edges ----

    /// `GET /edges?workflow_id=`
    pub async fn list_edges(&self, workflow_id: WorkflowId) -> Result<Vec<EdgeRecord>, ApiError> {
        self.get(&format!("/edges?workflow_id={workflow_id}")).await
    }

    /// `POST /edges`
    pub async fn create_edge(&self, payload: &EdgeCreate) -> Result<EdgeRecord, ApiError> {
        self.post("/edges", payload).await
    }

    /// `DELETE /edges/{id}`
    pub async fn delete_edge(&self, id: EdgeId) -> Result<(), ApiError> {
        self.delete(&format!("/edges/{id}")).await
    }

    // ---- executions ----

    /// `POST /executions`
    pub async fn create_execution(
        &self,
        payload: &ExecutionCreate,
    ) -> Result<ExecutionRecord, ApiError> {
        self.post("/executions", payload).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.has_token())
            .finish()
    }
}
