//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//! - `RAZORLOG_HOST` - Bind address (default: 127.0.0.1)
//! - `RAZORLOG_PORT` - Listen port (default: 8080)
//! - `RAZORLOG_DATABASE_PATH` - SQLite file (default: data/razorlog.db);
//!   empty or `:memory:` selects an in-memory database
//! - `RAZORLOG_LOG_LEVEL` - trace|debug|info|warn|error (default: debug in
//!   debug builds, info in release)
//! - `RAZORLOG_LOG_DIR` - Absolute log directory (default: `<cwd>/logs`)

use razorlog_core::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "8080";
const DEFAULT_DATABASE_PATH: &str = "data/razorlog.db";
const IN_MEMORY_DATABASE: &str = ":memory:";
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Configuration errors that can occur during loading.
#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvVar { key: &'static str, reason: String },
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEnvVar { key, reason } => {
                write!(f, "invalid environment variable {key}: {reason}")
            }
            Self::CurrentDir(err) => write!(f, "cannot resolve working directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
            Self::InvalidEnvVar { .. } => None,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// SQLite file path; `None` means in-memory SQLite.
    pub database_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Missing .env is fine.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value_or = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .unwrap_or_else(|| default.to_string())
        };

        let host = value_or("RAZORLOG_HOST", DEFAULT_HOST)
            .parse::<IpAddr>()
            .map_err(|err| invalid("RAZORLOG_HOST", err.to_string()))?;
        let port = value_or("RAZORLOG_PORT", DEFAULT_PORT)
            .parse::<u16>()
            .map_err(|err| invalid("RAZORLOG_PORT", err.to_string()))?;

        let database_path = match value_or("RAZORLOG_DATABASE_PATH", DEFAULT_DATABASE_PATH) {
            path if path.is_empty() || path == IN_MEMORY_DATABASE => None,
            path => Some(PathBuf::from(path)),
        };

        let log_level = value_or("RAZORLOG_LOG_LEVEL", default_log_level()).to_ascii_lowercase();
        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(invalid(
                "RAZORLOG_LOG_LEVEL",
                format!("expected one of {}, got `{log_level}`", LOG_LEVELS.join("|")),
            ));
        }

        let log_dir = match lookup("RAZORLOG_LOG_DIR").filter(|value| !value.trim().is_empty()) {
            Some(value) => {
                let path = PathBuf::from(value.trim());
                if !path.is_absolute() {
                    return Err(invalid(
                        "RAZORLOG_LOG_DIR",
                        format!("must be an absolute path, got `{}`", path.display()),
                    ));
                }
                path
            }
            None => std::env::current_dir()
                .map_err(ConfigError::CurrentDir)?
                .join("logs"),
        };

        Ok(Self {
            host,
            port,
            database_path,
            log_level,
            log_dir,
        })
    }

    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidEnvVar { key, reason }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn load(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(
            config.database_path,
            Some(PathBuf::from("data/razorlog.db"))
        );
        assert!(config.log_dir.is_absolute());
        assert!(config.log_dir.ends_with("logs"));
    }

    #[test]
    fn memory_marker_and_empty_path_select_in_memory_database() {
        assert_eq!(
            load(&[("RAZORLOG_DATABASE_PATH", ":memory:")])
                .unwrap()
                .database_path,
            None
        );
        assert_eq!(
            load(&[("RAZORLOG_DATABASE_PATH", "")]).unwrap().database_path,
            None
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("RAZORLOG_HOST", "0.0.0.0"),
            ("RAZORLOG_PORT", "9000"),
            ("RAZORLOG_LOG_LEVEL", "WARN"),
            ("RAZORLOG_LOG_DIR", "/var/log/razorlog"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, PathBuf::from("/var/log/razorlog"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("RAZORLOG_PORT", "eighty")]),
            Err(ConfigError::InvalidEnvVar {
                key: "RAZORLOG_PORT",
                ..
            })
        ));
        assert!(matches!(
            load(&[("RAZORLOG_HOST", "localhost")]),
            Err(ConfigError::InvalidEnvVar {
                key: "RAZORLOG_HOST",
                ..
            })
        ));
        assert!(matches!(
            load(&[("RAZORLOG_LOG_LEVEL", "verbose")]),
            Err(ConfigError::InvalidEnvVar {
                key: "RAZORLOG_LOG_LEVEL",
                ..
            })
        ));
        assert!(matches!(
            load(&[("RAZORLOG_LOG_DIR", "logs")]),
            Err(ConfigError::InvalidEnvVar {
                key: "RAZORLOG_LOG_DIR",
                ..
            })
        ));
    }
}
