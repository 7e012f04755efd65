//! REST client for the training administration API.

use crate::config::ClientConfig;
use crate::traits::{ActivityApi, AuthApi, EntityApi};
use async_trait::async_trait;
use formation_core::{ActivityRecord, Credentials, Entity, EntityId, EntityKind, Identity};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response carrying a human-readable `message` payload.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// Non-2xx response without a usable error payload.
    #[error("HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl ApiClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiClientError::Status { status, .. } | ApiClientError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            ApiClientError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Message supplied by the server in its error payload, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiClientError::Status { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Error payload shape returned by the API. Only `message` is meant for
/// users; the generic `error` reason phrase is ignored.
#[derive(Debug, Deserialize)]
struct ServerError {
    message: Option<String>,
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiClientError> {
        Self::with_base_url(
            &config.api_base_url,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ApiClientError::Config(format!("invalid api_base_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::Config(format!(
                "api_base_url cannot be a base: {}",
                base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/{entity}`
    pub async fn list_entities<E: Entity>(&self) -> Result<Vec<E>, ApiClientError> {
        let url = self.endpoint(&[E::kind().path_segment()])?;
        tracing::debug!(%url, "listing entities");
        let response = self.client.get(url).send().await?;
        self.parse_response(response).await
    }

    /// `POST /api/{entity}`; the returned record carries the assigned id.
    pub async fn create_entity<E: Entity>(&self, draft: &E::Draft) -> Result<E, ApiClientError> {
        let url = self.endpoint(&[E::kind().path_segment()])?;
        let response = self.client.post(url).json(draft).send().await?;
        self.parse_response(response).await
    }

    /// `PUT /api/{entity}/{id}`
    pub async fn update_entity<E: Entity>(
        &self,
        id: &EntityId,
        draft: &E::Draft,
    ) -> Result<E, ApiClientError> {
        let id = id.to_string();
        let url = self.endpoint(&[E::kind().path_segment(), &id])?;
        let response = self.client.put(url).json(draft).send().await?;
        self.parse_response(response).await
    }

    /// `DELETE /api/{entity}/{id}`; the acknowledgement body is ignored.
    pub async fn delete_entity<E: Entity>(&self, id: &EntityId) -> Result<(), ApiClientError> {
        let id = id.to_string();
        let url = self.endpoint(&[E::kind().path_segment(), &id])?;
        let response = self.client.delete(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(self.error_from_response(response).await)
    }

    /// `POST /api/users/auth`
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, ApiClientError> {
        let url = self.endpoint(&[EntityKind::Users.path_segment(), "auth"])?;
        let response = self.client.post(url).json(credentials).send().await?;
        let value: serde_json::Value = self.parse_response(response).await?;
        Identity::from_value(value).map_err(|e| ApiClientError::InvalidResponse(e.to_string()))
    }

    /// `GET /api/{entity}/recentActivities`
    pub async fn recent_activities(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<ActivityRecord>, ApiClientError> {
        let url = self.endpoint(&[kind.path_segment(), "recentActivities"])?;
        let response = self.client.get(url).send().await?;
        self.parse_response(response).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiClientError::Config(format!("cannot extend {}", self.base_url)))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice::<T>(&bytes)?);
        }
        Err(self.error_from_response(response).await)
    }

    async fn error_from_response(&self, response: reqwest::Response) -> ApiClientError {
        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => return ApiClientError::Http(err),
        };
        if let Ok(server_error) = serde_json::from_str::<ServerError>(&text) {
            if let Some(message) = server_error.message.filter(|m| !m.trim().is_empty()) {
                return ApiClientError::Status { status, message };
            }
        }
        ApiClientError::UnexpectedStatus { status, body: text }
    }
}

#[async_trait]
impl<E: Entity> EntityApi<E> for RestClient {
    async fn list(&self) -> Result<Vec<E>, ApiClientError> {
        self.list_entities::<E>().await
    }

    async fn create(&self, draft: &E::Draft) -> Result<E, ApiClientError> {
        self.create_entity::<E>(draft).await
    }

    async fn update(&self, id: &EntityId, draft: &E::Draft) -> Result<E, ApiClientError> {
        self.update_entity::<E>(id, draft).await
    }

    async fn delete(&self, id: &EntityId) -> Result<(), ApiClientError> {
        self.delete_entity::<E>(id).await
    }
}

#[async_trait]
impl AuthApi for RestClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, ApiClientError> {
        RestClient::authenticate(self, credentials).await
    }
}

#[async_trait]
impl ActivityApi for RestClient {
    async fn recent_activities(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<ActivityRecord>, ApiClientError> {
        RestClient::recent_activities(self, kind).await
    }
}
