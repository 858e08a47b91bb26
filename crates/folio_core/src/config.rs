//! Runtime configuration for catalog hosts.
//!
//! # Responsibility
//! - Describe where the catalog is persisted and how logging is set up.
//! - Load configuration from JSON with defaults for every missing key.
//!
//! # Invariants
//! - A config that passed `validate()` can be handed to `init_logging` and
//!   `AdminSession::sign_in` without further checks.

use crate::logging::{default_log_level, normalize_level};
use crate::session::{AdminCredentials, DEFAULT_SESSION_TTL_MS};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Catalog host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// SQLite file. `None` keeps the catalog in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logs.
    pub log_dir: Option<PathBuf>,
    pub session_ttl_ms: i64,
    pub admin: AdminCredentials,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            session_ttl_ms: DEFAULT_SESSION_TTL_MS,
            admin: AdminCredentials::default(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl FolioConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        if let Some(dir) = self.log_dir.as_deref() {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        if self.session_ttl_ms <= 0 {
            return Err(ConfigError::Invalid(format!(
                "session_ttl_ms must be positive, got {}",
                self.session_ttl_ms
            )));
        }
        if self.admin.email.trim().is_empty() {
            return Err(ConfigError::Invalid("admin.email cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, FolioConfig};
    use crate::session::DEFAULT_SESSION_TTL_MS;
    use std::path::PathBuf;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = FolioConfig::from_json_str(r#"{ "db_path": "/tmp/folio.db" }"#)
            .expect("partial config should parse");
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/folio.db")));
        assert_eq!(config.session_ttl_ms, DEFAULT_SESSION_TTL_MS);
        assert_eq!(config.admin.email, "admin@example.com");
    }

    #[test]
    fn rejects_non_positive_ttl() {
        let err = FolioConfig::from_json_str(r#"{ "session_ttl_ms": 0 }"#)
            .expect_err("zero ttl must be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_relative_log_dir_and_unknown_level() {
        let relative = FolioConfig::from_json_str(r#"{ "log_dir": "logs" }"#)
            .expect_err("relative log_dir must be rejected");
        assert!(relative.to_string().contains("absolute"));

        let level = FolioConfig::from_json_str(r#"{ "log_level": "loud" }"#)
            .expect_err("unknown level must be rejected");
        assert!(matches!(level, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = FolioConfig::from_json_str("{ not json").expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.json");
        let err = FolioConfig::load(&missing).expect_err("missing file");
        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }
}
