//! Process configuration
//!
//! Everything is read from the environment once at startup:
//!
//! - `MONGODB_URL` - store URL (`memory://`, `mongodb://`, `mongodb+srv://`)
//! - `AGENDA_DATABASE` - database name when the URL names none (default `agenda`)
//! - `AGENDA_LOG_FORMAT` - `json` for JSON log lines
//! - `RUST_LOG` - tracing filter
//!
//! A `.env` file in the working directory is loaded first; variables
//! already present in the environment take precedence over it. The HTTP
//! listener always binds `0.0.0.0:3000`.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use thiserror::Error;

use crate::telemetry::{LogConfig, LogFormat};

/// Port the HTTP listener binds
pub const HTTP_PORT: u16 = 3000;
/// Environment file loaded at startup
pub const ENV_FILE: &str = ".env";

/// Environment variable holding the store URL
pub const STORE_URL_VAR: &str = "MONGODB_URL";
/// Environment variable holding the fallback database name
pub const DATABASE_VAR: &str = "AGENDA_DATABASE";
/// Environment variable selecting the log format
pub const LOG_FORMAT_VAR: &str = "AGENDA_LOG_FORMAT";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("MONGODB_URL is not set")]
    MissingStoreUrl,

    #[error("Unsupported store URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Unreadable environment file: {0}")]
    EnvFile(String),
}

/// Loads `path` into the process environment without overriding
/// variables that are already set.
///
/// Returns `Ok(false)` when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ConfigError::EnvFile(e.to_string())),
    }
}

/// Store backend selected by URL scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUrl {
    /// `memory://`
    Memory,
    /// `mongodb://...` or `mongodb+srv://...`, kept verbatim
    Mongo(String),
}

impl StoreUrl {
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        let scheme = url.split("://").next().unwrap_or_default();
        match scheme {
            "memory" if url.contains("://") => Ok(StoreUrl::Memory),
            "mongodb" | "mongodb+srv" if url.contains("://") => Ok(StoreUrl::Mongo(url.to_string())),
            _ => Err(ConfigError::UnsupportedScheme(scheme.to_string())),
        }
    }
}

/// Database used when neither the URL nor `AGENDA_DATABASE` names one
pub const DEFAULT_DATABASE: &str = "agenda";

/// Store connection settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Raw store URL, if set
    pub url: Option<String>,
    /// Database used when the URL does not name one
    pub database: String,
}

impl StoreConfig {
    pub fn new(url: Option<String>) -> Self {
        Self {
            url,
            database: DEFAULT_DATABASE.to_string(),
        }
    }

    /// Parse the configured URL
    pub fn url(&self) -> Result<StoreUrl, ConfigError> {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::MissingStoreUrl)?;
        StoreUrl::parse(url)
    }
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP listener binds
    pub listen: SocketAddr,
    pub store: StoreConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut store = StoreConfig::new(lookup(STORE_URL_VAR));
        if let Some(database) = lookup(DATABASE_VAR).filter(|d| !d.is_empty()) {
            store.database = database;
        }

        let format = match lookup(LOG_FORMAT_VAR).as_deref() {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, HTTP_PORT)),
            store,
            log: LogConfig {
                format,
                ..LogConfig::default()
            },
        }
    }
}
