//! Configuration management
//!
//! Configuration is loaded from:
//! - config.yml file (optional)
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/qaboard.db".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Session cookie and lifetime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in days
    #[serde(default = "default_ttl_days")]
    pub ttl_days: i64,
    /// Interval between expired-session sweeps, in seconds
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_days: default_ttl_days(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

/// Longest accepted session lifetime in days
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

impl SessionConfig {
    /// Cookie `Max-Age` matching the session lifetime
    pub fn max_age_secs(&self) -> i64 {
        self.ttl_days.clamp(0, MAX_SESSION_TTL_DAYS) * 24 * 60 * 60
    }

    /// Whether a lifetime lies in `1..=MAX_SESSION_TTL_DAYS`
    pub fn is_valid_ttl(days: i64) -> bool {
        (1..=MAX_SESSION_TTL_DAYS).contains(&days)
    }

    /// Replace an out-of-range lifetime with the default
    fn sanitize(&mut self) {
        if !Self::is_valid_ttl(self.ttl_days) {
            tracing::warn!(
                "Session ttl_days {} is outside 1..={}, using {}",
                self.ttl_days,
                MAX_SESSION_TTL_DAYS,
                default_ttl_days()
            );
            self.ttl_days = default_ttl_days();
        }
    }
}

fn default_cookie_name() -> String {
    "sessions".to_string()
}

fn default_ttl_days() -> i64 {
    14
}

fn default_cleanup_interval_secs() -> u64 {
    3600
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;
        config.session.sanitize();

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - QABOARD_SERVER_HOST
    /// - QABOARD_SERVER_PORT
    /// - QABOARD_DATABASE_DRIVER
    /// - QABOARD_DATABASE_URL
    /// - QABOARD_SESSION_COOKIE_NAME
    /// - QABOARD_SESSION_TTL_DAYS
    ///
    /// The deployment variables `DB_HOSTNAME`, `DB_PORT`, `DB_USERNAME`,
    /// `DB_PASSWORD` and `DB_DATABASE` select a MySQL store when
    /// `DB_HOSTNAME` is present, and take precedence over the above.
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("QABOARD_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("QABOARD_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }

        if let Ok(driver) = std::env::var("QABOARD_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("QABOARD_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(name) = std::env::var("QABOARD_SESSION_COOKIE_NAME") {
            if !name.trim().is_empty() {
                self.session.cookie_name = name;
            }
        }
        if let Ok(days) = std::env::var("QABOARD_SESSION_TTL_DAYS") {
            match days.parse::<i64>() {
                Ok(days) if SessionConfig::is_valid_ttl(days) => self.session.ttl_days = days,
                _ => tracing::warn!("Ignoring invalid QABOARD_SESSION_TTL_DAYS: {}", days),
            }
        }

        if let Some(url) = mysql_url_from_env() {
            self.database.driver = DatabaseDriver::Mysql;
            self.database.url = url;
        }
    }
}

/// Build a MySQL URL from the `DB_*` deployment variables.
fn mysql_url_from_env() -> Option<String> {
    let host = std::env::var("DB_HOSTNAME").ok()?;
    let port = std::env::var("DB_PORT").unwrap_or_else(|_| "3306".to_string());
    let user = std::env::var("DB_USERNAME").unwrap_or_else(|_| "root".to_string());
    let password = std::env::var("DB_PASSWORD").unwrap_or_default();
    let database = std::env::var("DB_DATABASE").unwrap_or_else(|_| "qaboard".to_string());

    // Credentials may contain URL delimiters such as '/', '#', '?' or ':'.
    let user = urlencoding::encode(&user);
    let credentials = if password.is_empty() {
        user.into_owned()
    } else {
        format!("{}:{}", user, urlencoding::encode(&password))
    };

    Some(format!(
        "mysql://{}@{}:{}/{}",
        credentials, host, port, database
    ))
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}
