use std::net::SocketAddr;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Xplovo";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the language-model credential.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const PREDICTION_URL_VAR: &str = "XPLOVO_PREDICTION_URL";
pub const MODEL_VAR: &str = "XPLOVO_MODEL";
pub const GEMINI_BASE_URL_VAR: &str = "XPLOVO_GEMINI_BASE_URL";
pub const BIND_ADDR_VAR: &str = "XPLOVO_BIND_ADDR";

pub const DEFAULT_PREDICTION_URL: &str = "http://localhost:5000/predict";
pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// Sessions idle longer than this are dropped (30 minutes).
pub const SESSION_IDLE_TTL_SECS: u64 = 30 * 60;
/// Upper bound on live sessions; the least recently used one is evicted.
pub const MAX_SESSIONS: usize = 1000;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "xplovo_lib=info,xplovo=info,tower_http=info"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set; the chat backend cannot start without a credential")]
    MissingCredential(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Process-wide configuration, read once at startup and never mutated.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub prediction_url: String,
    pub model: String,
    pub gemini_base_url: String,
    pub bind_addr: SocketAddr,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("prediction_url", &self.prediction_url)
            .field("model", &self.model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = value(API_KEY_VAR).ok_or(ConfigError::MissingCredential(API_KEY_VAR))?;

        let prediction_url =
            value(PREDICTION_URL_VAR).unwrap_or_else(|| DEFAULT_PREDICTION_URL.to_string());
        if !prediction_url.starts_with("http://") && !prediction_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: PREDICTION_URL_VAR,
                reason: format!("expected an http(s) URL, got {prediction_url:?}"),
            });
        }

        let bind_raw = value(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e| ConfigError::InvalidValue {
            var: BIND_ADDR_VAR,
            reason: format!("{bind_raw:?}: {e}"),
        })?;

        Ok(Self {
            api_key,
            prediction_url,
            model: value(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: value(GEMINI_BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            bind_addr,
        })
    }
}
