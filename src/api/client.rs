//! Bubble REST API Client
//!
//! HTTP client for the Bubble backend. Authorization is applied per request:
//! the client asks its [`CredentialSource`] for the current bearer token at
//! the moment a request is issued, so no request can carry stale credentials.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use uuid::Uuid;

use super::dto::{
    ErrorDetail, FeedResponse, HealthResponse, Post, RegisterRequest, TokenResponse, UploadRequest,
    UserProfile,
};
use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;

/// Supplies the bearer token for outgoing requests
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn bearer_token(&self) -> Option<String>;
}

/// Anonymous access
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialSource for NoCredentials {
    async fn bearer_token(&self) -> Option<String> {
        None
    }
}

/// Bubble REST API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialSource>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: &ApiConfig, credentials: Arc<dyn CredentialSource>) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.normalized_base_url(),
            credentials,
        })
    }

    /// Client that never sends credentials
    pub fn anonymous(config: &ApiConfig) -> ApiResult<Self> {
        Self::new(config, Arc::new(NoCredentials))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the current bearer token, if any
    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.bearer_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Authorize, send, and turn non-success statuses into errors
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "api response");

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorDetail>(&text)
            .map(|detail| detail.message())
            .unwrap_or(text);

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// `GET /health`
    pub async fn health(&self) -> ApiResult<HealthResponse> {
        let response = self.send(self.client.get(self.url("/health"))).await?;
        Self::decode(response).await
    }

    /// `POST /auth/jwt/login` with form-encoded credentials
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenResponse> {
        let form = [("username", email), ("password", password)];
        let request = self.client.post(self.url("/auth/jwt/login")).form(&form);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, body: &RegisterRequest) -> ApiResult<UserProfile> {
        let request = self.client.post(self.url("/auth/register")).json(body);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    /// `GET /users/me`
    pub async fn current_user(&self) -> ApiResult<UserProfile> {
        let response = self.send(self.client.get(self.url("/users/me"))).await?;
        Self::decode(response).await
    }

    /// `GET /feed`, newest first as ordered by the backend
    pub async fn feed(&self) -> ApiResult<Vec<Post>> {
        let response = self.send(self.client.get(self.url("/feed"))).await?;
        let feed: FeedResponse = Self::decode(response).await?;
        Ok(feed.posts)
    }

    /// `DELETE /post/{id}`
    pub async fn delete_post(&self, id: &Uuid) -> ApiResult<()> {
        let request = self.client.delete(self.url(&format!("/post/{}", id)));
        self.send(request).await?;
        Ok(())
    }

    /// `POST /upload` as multipart `file` + `caption`
    pub async fn upload(&self, upload: UploadRequest) -> ApiResult<Post> {
        let part = Part::bytes(upload.contents)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let form = Form::new().part("file", part).text("caption", upload.caption);

        let request = self.client.post(self.url("/upload")).multipart(form);
        let response = self.send(request).await?;
        Self::decode(response).await
    }
}
