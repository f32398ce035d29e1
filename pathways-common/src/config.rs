//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument or environment variable (handled by the binary's CLI)
//! 2. TOML config file
//! 3. Compiled default
//!
//! A missing config file is not an error: the service starts on defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::{Error, Result};

/// Application folder name under the platform config/data dirs
pub const APP_DIR_NAME: &str = "pathways-canvas";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Google OAuth client settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GoogleToml {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_url: Option<String>,
}

/// Contents of the optional TOML config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub data_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub admins_file: Option<PathBuf>,
    pub session_ttl_hours: Option<i64>,
    pub secure_cookies: Option<bool>,
    pub seed_defaults: Option<bool>,
    pub log_level: Option<String>,
    #[serde(default)]
    pub google: GoogleToml,
}

impl TomlConfig {
    /// Parse a config file; a read or parse failure is a `Config` error
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&text)
            .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load `explicit` if given, else the per-user default path
    ///
    /// An explicitly named file must exist and parse. The default file is
    /// optional; problems with it are logged and defaults are used.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => match Self::load(&path) {
                Ok(config) => Ok(config),
                Err(e) => {
                    warn!("{}; using defaults", e);
                    Ok(Self::default())
                }
            },
            _ => Ok(Self::default()),
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub data_folder: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub admins_file: Option<PathBuf>,
    pub session_ttl_hours: Option<i64>,
    pub secure_cookies: Option<bool>,
    pub seed_defaults: Option<bool>,
    pub log_level: Option<String>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_callback_url: Option<String>,
}

/// Complete Google OAuth client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub port: u16,
    pub data_folder: PathBuf,
    pub database_path: PathBuf,
    pub admins_file: PathBuf,
    pub session_ttl_hours: i64,
    pub secure_cookies: bool,
    pub seed_defaults: bool,
    pub log_level: String,
    /// `None` unless id, secret and callback URL are all set
    pub google: Option<GoogleOAuthConfig>,
}

impl ServiceConfig {
    pub fn resolve(overrides: &ConfigOverrides, file: &TomlConfig) -> Result<Self> {
        let data_folder = overrides
            .data_folder
            .clone()
            .or_else(|| file.data_folder.clone())
            .unwrap_or_else(default_data_folder);

        let database_path = overrides
            .database_path
            .clone()
            .or_else(|| file.database_path.clone())
            .unwrap_or_else(|| data_folder.join("pathways.db"));

        let admins_file = overrides
            .admins_file
            .clone()
            .or_else(|| file.admins_file.clone())
            .unwrap_or_else(|| data_folder.join("admins.txt"));

        let session_ttl_hours = overrides
            .session_ttl_hours
            .or(file.session_ttl_hours)
            .unwrap_or(DEFAULT_SESSION_TTL_HOURS);
        if session_ttl_hours <= 0 {
            return Err(Error::Config(format!(
                "session_ttl_hours must be positive (got {})",
                session_ttl_hours
            )));
        }

        let google_client_id = overrides
            .google_client_id
            .clone()
            .or_else(|| file.google.client_id.clone());
        let google_client_secret = overrides
            .google_client_secret
            .clone()
            .or_else(|| file.google.client_secret.clone());
        let google_callback_url = overrides
            .google_callback_url
            .clone()
            .or_else(|| file.google.callback_url.clone());

        let google = match (google_client_id, google_client_secret, google_callback_url) {
            (Some(client_id), Some(client_secret), Some(callback_url))
                if !client_id.is_empty() && !client_secret.is_empty() =>
            {
                Some(GoogleOAuthConfig {
                    client_id,
                    client_secret,
                    callback_url,
                })
            }
            (None, None, None) => None,
            _ => {
                warn!("Google OAuth settings incomplete (need client id, secret and callback URL); login disabled");
                None
            }
        };

        Ok(Self {
            bind_address: overrides
                .bind_address
                .clone()
                .or_else(|| file.bind_address.clone())
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            data_folder,
            database_path,
            admins_file,
            session_ttl_hours,
            secure_cookies: overrides
                .secure_cookies
                .or(file.secure_cookies)
                .unwrap_or(false),
            seed_defaults: overrides.seed_defaults.or(file.seed_defaults).unwrap_or(true),
            log_level: overrides
                .log_level
                .clone()
                .or_else(|| file.log_level.clone())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            google,
        })
    }

    /// `host:port` to bind the listener on
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Per-user config file location (`~/.config/pathways-canvas/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./pathways_data"))
}
