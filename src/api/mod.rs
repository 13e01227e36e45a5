//! Backend REST API: client, error type and one module per backend area.

pub mod auth;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod listening;
pub mod mock;
pub mod notes;
pub mod reading;
pub mod speaking;
pub mod vocabulary;
pub mod writing;

pub use client::{ApiClient, ApiRequest, Authenticated};
pub use error::ApiError;

/// Turns failures of secondary backend calls into logged fallbacks
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
    /// Log the error at warn level and return the default
    fn log_warn_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: std::fmt::Display> LogOnError<T> for Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        self.map_err(|e| tracing::warn!("{}: {}", context, e)).ok()
    }

    fn log_warn_default(self, context: &str) -> T
    where
        T: Default,
    {
        self.log_warn(context).unwrap_or_default()
    }
}
