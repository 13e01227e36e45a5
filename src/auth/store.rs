//! Per-browser backend credentials.
//!
//! The browser only holds an opaque session cookie. The access and refresh
//! tokens it maps to stay on the server in a [`TokenStore`].

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};

use crate::config;
use crate::domain::{TokenResponse, User};

#[derive(Debug)]
struct Tokens {
    access_token: String,
    refresh_token: Option<String>,
    user: Option<User>,
}

/// Tokens of one login, shared between concurrent requests of that browser.
/// A refresh performed by one request is seen by all others.
#[derive(Debug, Clone)]
pub struct Credentials {
    tokens: Arc<RwLock<Tokens>>,
}

impl Credentials {
    pub fn new(response: TokenResponse) -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Tokens {
                access_token: response.access_token,
                refresh_token: response.refresh_token,
                user: response.user,
            })),
        }
    }

    pub fn access_token(&self) -> String {
        self.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Store refreshed tokens. The refresh token and user are kept when the
    /// response omits them.
    pub fn update(&self, response: TokenResponse) {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        tokens.access_token = response.access_token;
        if response.refresh_token.is_some() {
            tokens.refresh_token = response.refresh_token;
        }
        if response.user.is_some() {
            tokens.user = response.user;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tokens> {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Credentials of one login and when its cookie was last seen
#[derive(Debug)]
struct TokenEntry {
    credentials: Credentials,
    last_access: DateTime<Utc>,
}

/// Maps login cookie values to credentials.
///
/// Entries unused for longer than the expiry window are dropped, either when
/// looked up or by the occasional sweep that runs on insert and lookup.
#[derive(Debug)]
pub struct TokenStore {
    entries: Mutex<HashMap<String, TokenEntry>>,
    expiry: Duration,
}

impl TokenStore {
    pub fn new(expiry_hours: i64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            expiry: Duration::hours(expiry_hours),
        }
    }

    pub fn insert(&self, session_id: &str, credentials: Credentials) {
        let mut entries = self.lock();
        self.maybe_cleanup(&mut entries);
        entries.insert(
            session_id.to_string(),
            TokenEntry {
                credentials,
                last_access: Utc::now(),
            },
        );
    }

    /// Credentials for a login cookie. Refreshes the entry's last access time.
    pub fn get(&self, session_id: &str) -> Option<Credentials> {
        let mut entries = self.lock();
        self.maybe_cleanup(&mut entries);

        let cutoff = Utc::now() - self.expiry;
        if entries.get(session_id).is_some_and(|e| e.last_access <= cutoff) {
            tracing::debug!("Login {} expired", session_id);
            entries.remove(session_id);
            return None;
        }

        let entry = entries.get_mut(session_id)?;
        entry.last_access = Utc::now();
        Some(entry.credentials.clone())
    }

    pub fn remove(&self, session_id: &str) -> Option<Credentials> {
        self.lock().remove(session_id).map(|e| e.credentials)
    }

    /// Drop every expired login. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.lock();
        self.cleanup_expired(&mut entries)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, TokenEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn maybe_cleanup(&self, entries: &mut HashMap<String, TokenEntry>) {
        // Same ~10% sweep rate as the study session store
        if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
            self.cleanup_expired(entries);
        }
    }

    fn cleanup_expired(&self, entries: &mut HashMap<String, TokenEntry>) -> usize {
        let cutoff = Utc::now() - self.expiry;
        let before = entries.len();
        entries.retain(|_, entry| entry.last_access > cutoff);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!("Dropped {} expired logins", removed);
        }
        removed
    }

    #[cfg(test)]
    fn backdate(&self, session_id: &str, hours: i64) {
        if let Some(entry) = self.lock().get_mut(session_id) {
            entry.last_access -= Duration::hours(hours);
        }
    }
}
