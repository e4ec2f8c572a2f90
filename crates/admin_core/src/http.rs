//! reqwest-backed implementation of the API seams.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{SettingsDocument, SettingsPatch},
    error::{ErrorBody, ErrorKind},
    protocol::{
        AdminLoginRequest, AdminLoginResponse, AdminSignupRequest, ResourceKind,
        ADMIN_LOGIN_PATH, ADMIN_SIGNUP_PATH, SETTINGS_PATH,
    },
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::{
    api::{AdminApi, ApiClient, SettingsApi},
    resource::Resource,
};

/// Text surfaced when a request never reached the server.
pub const NETWORK_ERROR: &str = "Network Error";

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("invalid api base url `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api base url must use http:// or https://, got `{0}`")]
    UnsupportedScheme(String),
}

#[derive(Clone)]
pub struct HttpApiClient {
    http: Client,
    base: Url,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpApiClient {
    pub fn new(base_url: &str) -> Result<Self, HttpClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|source| HttpClientError::InvalidBaseUrl {
            url: trimmed.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HttpClientError::UnsupportedScheme(trimmed.to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base: parsed,
            base_url: trimmed.to_string(),
            bearer_token: None,
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.bearer_token = (!token.trim().is_empty()).then_some(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `<collection>/<id>` with the id percent-encoded as a single segment.
    fn item_endpoint(
        &self,
        kind: ResourceKind,
        id: &impl fmt::Display,
    ) -> Result<String, ErrorKind> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ErrorKind::transport(NETWORK_ERROR))?
            .pop_if_empty()
            .extend(kind.collection_path().split('/').filter(|segment| !segment.is_empty()))
            .push(&id.to_string());
        Ok(url.into())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ErrorKind> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "http: request failed before a response arrived");
            ErrorKind::transport(NETWORK_ERROR)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message);
        debug!(status = status.as_u16(), ?message, "http: error status");
        Err(ErrorKind::server(status.as_u16(), message))
    }

    async fn read_json(response: Response) -> Result<Value, ErrorKind> {
        let body = response.text().await.map_err(|err| {
            warn!(error = %err, "http: failed to read response body");
            ErrorKind::transport(NETWORK_ERROR)
        })?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body)
            .map_err(|err| ErrorKind::decode(format!("invalid response body: {err}")))
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ErrorKind> {
        serde_json::from_value(value)
            .map_err(|err| ErrorKind::decode(format!("unexpected response shape: {err}")))
    }
}

#[async_trait]
impl<R: Resource> ApiClient<R> for HttpApiClient {
    async fn list(&self) -> Result<Vec<R>, ErrorKind> {
        let response = self
            .send(self.http.get(self.endpoint(R::KIND.collection_path())))
            .await?;
        match Self::read_json(response).await? {
            body @ Value::Array(_) => Self::decode(body),
            other => {
                debug!(kind = %R::KIND, body = %other, "http: non-array list body treated as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn create(&self, payload: &R::Payload) -> Result<R, ErrorKind> {
        let response = self
            .send(
                self.http
                    .post(self.endpoint(R::KIND.collection_path()))
                    .json(payload),
            )
            .await?;
        Self::decode(Self::read_json(response).await?)
    }

    async fn update(&self, id: &R::Id, payload: &R::Payload) -> Result<R, ErrorKind> {
        let url = self.item_endpoint(R::KIND, id)?;
        let response = self.send(self.http.put(url).json(payload)).await?;
        Self::decode(Self::read_json(response).await?)
    }

    async fn delete(&self, id: &R::Id) -> Result<(), ErrorKind> {
        let url = self.item_endpoint(R::KIND, id)?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsApi for HttpApiClient {
    async fn fetch(&self) -> Result<Option<SettingsPatch>, ErrorKind> {
        let response = self.send(self.http.get(self.endpoint(SETTINGS_PATH))).await?;
        Ok(SettingsPatch::from_json(&Self::read_json(response).await?))
    }

    async fn update(&self, settings: &SettingsDocument) -> Result<(), ErrorKind> {
        self.send(self.http.put(self.endpoint(SETTINGS_PATH)).json(settings))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AdminApi for HttpApiClient {
    async fn login(&self, request: &AdminLoginRequest) -> Result<AdminLoginResponse, ErrorKind> {
        let response = self
            .send(self.http.post(self.endpoint(ADMIN_LOGIN_PATH)).json(request))
            .await?;
        match Self::read_json(response).await? {
            Value::Null => Ok(AdminLoginResponse::default()),
            body => Self::decode(body),
        }
    }

    async fn register(&self, request: &AdminSignupRequest) -> Result<(), ErrorKind> {
        self.send(self.http.post(self.endpoint(ADMIN_SIGNUP_PATH)).json(request))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
