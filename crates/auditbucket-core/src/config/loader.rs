//! Configuration file discovery and parsing

use super::file::AuditBucketConfig;
use crate::error::{Error, Result};
use crate::schema::SchemaValidator;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

/// Configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["auditbucket.yaml", "auditbucket.yml"];

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "AUDITBUCKET_CONFIG";

/// Schema name the config file is validated against
const SCHEMA_NAME: &str = "auditbucket";

/// A parsed configuration together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: AuditBucketConfig,

    /// Path to the configuration file
    pub config_path: Utf8PathBuf,
}

impl LoadedConfig {
    /// Load configuration from the given path, `AUDITBUCKET_CONFIG`, or by search
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (config_path, content) = Self::locate(path)?;
        let config: AuditBucketConfig = serde_yaml_ng::from_str(&content)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Load, validating the raw document against the embedded schema first
    pub fn load_and_validate(path: Option<&Utf8Path>, validator: &SchemaValidator) -> Result<Self> {
        let (config_path, content) = Self::locate(path)?;

        validator.validate_yaml(&content, SCHEMA_NAME)?;

        let config: AuditBucketConfig = serde_yaml_ng::from_str(&content)?;

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Parse configuration from a string (no file involved)
    pub fn from_yaml(content: &str) -> Result<AuditBucketConfig> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Serialize the configuration back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(&self.config)?)
    }

    fn locate(path: Option<&Utf8Path>) -> Result<(Utf8PathBuf, String)> {
        if let Some(p) = path {
            return Self::read(p);
        }

        if let Ok(from_env) = std::env::var(CONFIG_ENV_VAR) {
            if !from_env.is_empty() {
                debug!("Using config from {}: {}", CONFIG_ENV_VAR, from_env);
                return Self::read(Utf8Path::new(&from_env));
            }
        }

        let cwd = std::env::current_dir()?;
        let cwd = Utf8PathBuf::try_from(cwd).map_err(|_| {
            Error::config_not_found("current directory path is not valid UTF-8")
        })?;
        Self::find_from(&cwd)
    }

    fn read(path: &Utf8Path) -> Result<(Utf8PathBuf, String)> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;
        Ok((path.to_owned(), content))
    }

    /// Find a configuration file in `start` or any of its parents
    pub fn find_from(start: &Utf8Path) -> Result<(Utf8PathBuf, String)> {
        let mut current = start;

        loop {
            for name in CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    debug!("Found config at {}", path);
                    let content = fs::read_to_string(&path)?;
                    return Ok((path, content));
                }
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::config_not_found(
            "auditbucket.yaml (searched current and parent directories)",
        ))
    }
}
