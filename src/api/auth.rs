//! Login, registration and token refresh. All go out without a bearer token.

use serde::Serialize;

use super::client::{ApiClient, ApiRequest};
use super::error::ApiError;
use crate::domain::TokenResponse;

#[derive(Serialize)]
struct LoginPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterPayload<'a> {
    email: &'a str,
    password: &'a str,
    full_name: &'a str,
}

#[derive(Serialize)]
struct RefreshPayload<'a> {
    refresh_token: &'a str,
}

pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
    let request = ApiRequest::post("/auth/login", &LoginPayload { email, password })?;
    client.json(&request).await
}

/// Create an account. The backend answers with tokens for the new user.
pub async fn register(
    client: &ApiClient,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<TokenResponse, ApiError> {
    let payload = RegisterPayload {
        email,
        password,
        full_name,
    };
    client.json(&ApiRequest::post("/auth/register", &payload)?).await
}

/// Exchange a refresh token for a new token pair
pub async fn refresh(client: &ApiClient, refresh_token: &str) -> Result<TokenResponse, ApiError> {
    let request = ApiRequest::post("/auth/refresh", &RefreshPayload { refresh_token })?;
    client.json(&request).await
}
