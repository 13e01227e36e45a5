//! HTTP client for the backend REST API.
//!
//! [`ApiClient`] sends single attempts. [`Authenticated`] wraps it with the
//! bearer token of one login and recovers from an expired access token by
//! refreshing it and replaying the request once.

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::auth as auth_api;
use super::error::ApiError;
use crate::auth::Credentials;

/// Replayable description of a backend request
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
        }
    }

    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::with_body(Method::POST, path, body)
    }

    pub fn put<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::with_body(Method::PUT, path, body)
    }

    pub fn patch<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::with_body(Method::PATCH, path, body)
    }

    fn with_body<B: Serialize + ?Sized>(
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            method,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }
}

/// Shared connection pool and base URL. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a single attempt. The response status is not interpreted.
    pub async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("{} {}", request.method, request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path));
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(|e| {
            tracing::warn!("{} {} failed: {}", request.method, request.path, e);
            ApiError::from(e)
        })
    }

    /// Unauthenticated request with a JSON response
    pub async fn json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(request, None).await?;
        decode(ensure_success(response).await?).await
    }

    /// Requests made on behalf of a logged-in user
    pub fn authenticated<'a>(&'a self, credentials: &'a Credentials) -> Authenticated<'a> {
        Authenticated {
            client: self,
            credentials,
        }
    }
}

/// Whether the current request has already been replayed after a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryState {
    Fresh,
    Retried,
}

/// Bearer-token decorator around [`ApiClient`].
///
/// On a 401 the refresh token is exchanged for new tokens, which are stored
/// back into the shared credentials, and the request is sent one more time.
/// A 401 on the replay, a missing refresh token or a failed refresh all end
/// in [`ApiError::Unauthorized`].
pub struct Authenticated<'a> {
    client: &'a ApiClient,
    credentials: &'a Credentials,
}

impl Authenticated<'_> {
    pub fn client(&self) -> &ApiClient {
        self.client
    }

    pub async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        let mut retry = RetryState::Fresh;

        loop {
            let token = self.credentials.access_token();
            let response = self.client.execute(request, Some(&token)).await?;

            if response.status() != StatusCode::UNAUTHORIZED || retry == RetryState::Retried {
                return ensure_success(response).await;
            }

            let Some(refresh_token) = self.credentials.refresh_token() else {
                return Err(ApiError::Unauthorized);
            };

            tracing::info!(
                "Access token rejected for {} {}, refreshing",
                request.method,
                request.path
            );
            match auth_api::refresh(self.client, &refresh_token).await {
                Ok(tokens) => {
                    self.credentials.update(tokens);
                    retry = RetryState::Retried;
                }
                Err(e) => {
                    tracing::warn!("Token refresh failed: {}", e);
                    return Err(ApiError::Unauthorized);
                }
            }
        }
    }

    pub async fn json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        decode(self.send(request).await?).await
    }

    /// Send a request whose response body is not needed
    pub async fn send_empty(&self, request: &ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }
}

pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("HTTP error {} from {}", status, url);
    Err(ApiError::status(status, body))
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
