//! Application configuration.
//!
//! Values are resolved with priority config.toml > environment (.env) > defaults.
//! Fixed constants for the study session live at the bottom of this module.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ==================== Defaults ====================

/// Backend REST root used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Global timeout applied to every backend request
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Server address to bind to
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Study session expiration time in hours of inactivity
pub const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 2;

/// Login cookie lifetime in hours (1 week)
pub const AUTH_COOKIE_HOURS: i64 = 24 * 7;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Study Configuration ====================

/// Number of distractor choices in multiple choice mode
pub const DISTRACTOR_COUNT: usize = 3;

/// Options shown in multiple choice mode (target + distractors)
pub const CHOICE_COUNT: usize = DISTRACTOR_COUNT + 1;

/// Lowest accepted grade
pub const GRADE_MIN: u8 = 1;

/// Highest accepted grade
pub const GRADE_MAX: u8 = 5;

/// Replacement for the headword in fill-blank examples
pub const BLANK_MARKER: &str = "______";

// ==================== Practice Configuration ====================

/// Shortest passage selection saved as a highlight
pub const MIN_HIGHLIGHT_CHARS: usize = 6;

/// Longest reading attempt credited, in seconds (3 hours)
pub const MAX_READING_SECONDS: u64 = 3 * 60 * 60;

/// Longest text sent for speech synthesis
pub const MAX_TTS_CHARS: usize = 500;

// ==================== File Configuration ====================

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server: Option<ServerSection>,
    api: Option<ApiSection>,
    session: Option<SessionSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SessionSection {
    expiry_hours: Option<i64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub server_addr: String,
    pub server_port: u16,
    pub api_base_url: String,
    pub api_timeout: Duration,
    pub session_expiry_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            session_expiry_hours: DEFAULT_SESSION_EXPIRY_HOURS,
        }
    }
}

impl Config {
    /// Load configuration from `CONFIG_PATH` (default `config.toml`) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let path = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));
        Self::load_from(&path, |key| std::env::var(key).ok())
    }

    /// Load configuration from an explicit file and environment lookup.
    /// A missing file is not an error.
    pub fn load_from(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!("Using config file {}", path.display());
                toml::from_str::<FileConfig>(&contents)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let server = file.server.unwrap_or_default();
        let api = file.api.unwrap_or_default();
        let session = file.session.unwrap_or_default();
        let mut config = Config::default();

        if let Some(addr) = server.addr {
            config.server_addr = addr;
        }

        // Priority 1: config.toml, Priority 2: env
        if let Some(port) = server.port {
            config.server_port = port;
        } else if let Some(port) = env("PORT") {
            config.server_port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: port,
            })?;
        }

        if let Some(url) = api.base_url.or_else(|| env("IELTS_API_BASE_URL")) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(secs) = api.timeout_secs {
            config.api_timeout = Duration::from_secs(secs);
        } else if let Some(secs) = env("IELTS_API_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "IELTS_API_TIMEOUT_SECS",
                value: secs,
            })?;
            config.api_timeout = Duration::from_secs(secs);
        }

        if let Some(hours) = session.expiry_hours {
            config.session_expiry_hours = hours;
        }

        Ok(config)
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}
