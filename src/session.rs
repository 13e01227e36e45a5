//! In-memory storage for study sessions.
//!
//! Each entry belongs to the login that started it and expires after a
//! configurable period of inactivity. The store lives in `AppState`.

use crate::config;
use crate::study::StudySession;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Session entry with owner, pending notices and last access time
struct SessionEntry {
  /// Login cookie of the browser that started the session
  owner: String,
  session: StudySession,
  /// One-shot messages shown on the next render
  notices: Vec<String>,
  last_access: DateTime<Utc>,
}

pub struct SessionStore {
  entries: Mutex<HashMap<String, SessionEntry>>,
  expiry: Duration,
}

impl SessionStore {
  pub fn new(expiry_hours: i64) -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
      expiry: Duration::hours(expiry_hours),
    }
  }

  /// Store a new session and return its id
  pub fn insert(&self, owner: &str, session: StudySession) -> String {
    let mut entries = self.lock();
    self.maybe_cleanup(&mut entries);

    let id = generate_session_id();
    entries.insert(
      id.clone(),
      SessionEntry {
        owner: owner.to_string(),
        session,
        notices: Vec::new(),
        last_access: Utc::now(),
      },
    );
    id
  }

  /// Run `f` against a session. Missing, expired and foreign sessions all
  /// yield `None`. The lock is held for the duration of `f`.
  pub fn with_session<T>(
    &self,
    id: &str,
    owner: &str,
    f: impl FnOnce(&mut StudySession) -> T,
  ) -> Option<T> {
    let mut entries = self.lock();
    self.maybe_cleanup(&mut entries);

    let entry = self.live_entry(&mut entries, id, owner)?;
    entry.last_access = Utc::now();
    Some(f(&mut entry.session))
  }

  /// Remove and return the pending notices of a session
  pub fn take_notices(&self, id: &str, owner: &str) -> Vec<String> {
    let mut entries = self.lock();
    self
      .live_entry(&mut entries, id, owner)
      .map(|entry| std::mem::take(&mut entry.notices))
      .unwrap_or_default()
  }

  /// Queue a notice. Returns false when the session no longer exists.
  pub fn push_notice(&self, id: &str, notice: impl Into<String>) -> bool {
    match self.lock().get_mut(id) {
      Some(entry) => {
        entry.notices.push(notice.into());
        true
      }
      None => false,
    }
  }

  pub fn remove(&self, id: &str) {
    self.lock().remove(id);
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn live_entry<'a>(
    &self,
    entries: &'a mut HashMap<String, SessionEntry>,
    id: &str,
    owner: &str,
  ) -> Option<&'a mut SessionEntry> {
    if entries
      .get(id)
      .is_some_and(|e| e.last_access <= Utc::now() - self.expiry)
    {
      entries.remove(id);
      return None;
    }
    entries.get_mut(id).filter(|e| e.owner == owner)
  }

  fn maybe_cleanup(&self, entries: &mut HashMap<String, SessionEntry>) {
    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      self.cleanup_expired(entries);
    }
  }

  fn cleanup_expired(&self, entries: &mut HashMap<String, SessionEntry>) {
    let cutoff = Utc::now() - self.expiry;
    entries.retain(|_, entry| entry.last_access > cutoff);
  }

  #[cfg(test)]
  fn backdate(&self, id: &str, hours: i64) {
    if let Some(entry) = self.lock().get_mut(id) {
      entry.last_access -= Duration::hours(hours);
    }
  }
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}
