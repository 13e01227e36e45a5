//! Login against the backend and per-browser token storage.

pub mod handlers;
pub mod middleware;
pub mod store;

pub use handlers::*;
pub use middleware::{AuthContext, OptionalAuth, SESSION_COOKIE_NAME};
pub use store::{Credentials, TokenStore};
