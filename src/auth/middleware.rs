//! Request extractors resolving the login cookie to backend credentials.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use super::store::Credentials;
use crate::api::Authenticated;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "ielts_session";

/// Authenticated request context.
/// Add this as a handler parameter to require a login.
/// Redirects to /login if not authenticated.
#[derive(Clone)]
pub struct AuthContext {
    pub session_id: String,
    pub credentials: Credentials,
}

impl AuthContext {
    /// Backend client acting as this user
    pub fn api<'a>(&'a self, state: &'a AppState) -> Authenticated<'a> {
        state.api.authenticated(&self.credentials)
    }

    pub fn display_name(&self) -> Option<String> {
        self.credentials.user().map(|u| u.display_name().to_string())
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| Redirect::to("/login").into_response())?;

        let session_id = jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .ok_or_else(|| Redirect::to("/login").into_response())?;

        let credentials = state
            .tokens
            .get(&session_id)
            .ok_or_else(|| Redirect::to("/login").into_response())?;

        Ok(AuthContext {
            session_id,
            credentials,
        })
    }
}

/// Optional authentication extractor.
/// Returns Some(AuthContext) if logged in, None otherwise.
/// Use for pages that work both with and without a login.
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthContext::from_request_parts(parts, state).await {
            Ok(auth) => Ok(OptionalAuth(Some(auth))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}
