//! Application state shared by all handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::auth::TokenStore;
use crate::config::{self, Config};
use crate::session::SessionStore;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Backend client (one connection pool for the whole process)
    pub api: ApiClient,

    /// Login cookie -> backend tokens
    pub tokens: Arc<TokenStore>,

    /// Running study sessions
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api_base_url, config.api_timeout)?;
        Ok(Self::with_client(api, config.session_expiry_hours))
    }

    pub fn with_client(api: ApiClient, session_expiry_hours: i64) -> Self {
        Self {
            api,
            tokens: Arc::new(TokenStore::new(config::AUTH_COOKIE_HOURS)),
            sessions: Arc::new(SessionStore::new(session_expiry_hours)),
        }
    }
}
