//! Application configuration loaded from a TOML file with environment overrides.
//!
//! Configuration is assembled once at startup in three layers:
//! file values, then environment overrides, then defaults. The result is
//! passed explicitly to everything that needs it.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "app.toml";

/// SSL mode used when neither the file nor the environment sets one.
pub const DEFAULT_SSL_MODE: &str = "disable";

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("Invalid database sslmode: {0:?}")]
    InvalidSslMode(String),
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service_name: String,
    pub service_env: String,
    pub http_port: u16,
    pub database: DatabaseConfig,
    pub tls: TlsConfig,
}

/// PostgreSQL connection parameters.
///
/// The password is only ever taken from `DB_PASSWORD`.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub name: String,
    pub sslmode: String,
    #[serde(skip)]
    pub password: Option<String>,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// TLS settings for the HTTP listener and the database CA.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub enabled: bool,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub ca_file: Option<String>,
}

impl Config {
    /// Loads configuration from `path`, overlaid with the process environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)?
            .apply_env(|key| std::env::var(key).ok())
            .map(Self::with_defaults)
    }

    /// Parses the file layer only.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlays environment values fetched through `lookup`.
    ///
    /// Unset and empty variables leave the file value untouched.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = get("DB_HOST") {
            self.database.host = host;
        }
        if let Some(port) = get("DB_PORT") {
            self.database.port = parse_env("DB_PORT", port)?;
        }
        if let Some(user) = get("DB_USER") {
            self.database.user = user;
        }
        if let Some(name) = get("DB_NAME") {
            self.database.name = name;
        }
        if let Some(sslmode) = get("DB_SSLMODE") {
            self.database.sslmode = sslmode;
        }
        if let Some(password) = get("DB_PASSWORD") {
            self.database.password = Some(password);
        }
        if let Some(port) = get("SERVICE_PORT") {
            self.http_port = parse_env("SERVICE_PORT", port)?;
        }
        if let Some(enabled) = get("TLS_ENABLED") {
            self.tls.enabled = enabled.to_lowercase() == "true";
        }
        if let Some(cert) = get("TLS_CERT_FILE") {
            self.tls.cert_file = Some(cert);
        }
        if let Some(key) = get("TLS_KEY_FILE") {
            self.tls.key_file = Some(key);
        }
        if let Some(ca) = get("TLS_CA_FILE") {
            self.tls.ca_file = Some(ca);
        }

        Ok(self)
    }

    /// Fills in values that are still unset after the file and env layers.
    pub fn with_defaults(mut self) -> Self {
        if self.database.sslmode.is_empty() {
            self.database.sslmode = DEFAULT_SSL_MODE.to_string();
        }
        self
    }

    /// Address the HTTP server binds to.
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.http_port))
    }

    /// Builds typed connection options for the configured database.
    ///
    /// Unset fields fall through to libpq's usual defaults. When TLS is
    /// enabled and a CA file is configured it is used as the root certificate.
    pub fn pg_connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let db = &self.database;
        let mut options = PgConnectOptions::new();

        if !db.host.is_empty() {
            options = options.host(&db.host);
        }
        if db.port != 0 {
            options = options.port(db.port);
        }
        if !db.user.is_empty() {
            options = options.username(&db.user);
        }
        if let Some(password) = &db.password {
            options = options.password(password);
        }
        if !db.name.is_empty() {
            options = options.database(&db.name);
        }

        let sslmode = if db.sslmode.is_empty() {
            DEFAULT_SSL_MODE
        } else {
            db.sslmode.as_str()
        };
        let ssl_mode = PgSslMode::from_str(sslmode)
            .map_err(|_| ConfigError::InvalidSslMode(sslmode.to_string()))?;
        options = options.ssl_mode(ssl_mode);

        if self.tls.enabled
            && let Some(ca) = &self.tls.ca_file
        {
            options = options.ssl_root_cert(ca);
        }

        Ok(options)
    }
}

fn parse_env<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}
