//! TOML-based configuration for Sightline.
//!
//! Supports a config file (sightline.toml) with environment variable
//! expansion, so connection strings and credentials never live in source.
//!
//! Example configuration:
//! ```toml
//! [source]
//! kind = "sqlite"
//! path = "${CRM_DB_PATH}"
//!
//! [auth]
//! users = { "admin" = "${ADMIN_PASSWORD}" }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::source::{CsvSource, RowSource, SqliteSource};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Unsupported source kind: {0}")]
    UnsupportedSource(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Row-source configuration.
    pub source: SourceSettings,

    /// Credential table consumed by the serving shell. The pipeline itself
    /// never authenticates.
    pub auth: AuthSettings,
}

/// Row-source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Source kind: "sqlite" or "csv".
    pub kind: String,

    /// Database path or CSV data directory (supports `${ENV_VAR}` expansion).
    pub path: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: "csv".to_string(),
            path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sqlite,
    Csv,
}

impl SourceSettings {
    pub fn kind_type(&self) -> Result<SourceKind, SettingsError> {
        match self.kind.as_str() {
            "sqlite" => Ok(SourceKind::Sqlite),
            "csv" => Ok(SourceKind::Csv),
            other => Err(SettingsError::UnsupportedSource(other.to_string())),
        }
    }

    /// Path with environment variables expanded.
    pub fn resolved_path(&self) -> Result<String, SettingsError> {
        expand_env_vars(&self.path)
    }

    /// Construct the configured row source.
    pub fn build(&self) -> Result<Box<dyn RowSource>, SettingsError> {
        let path = self.resolved_path()?;
        Ok(match self.kind_type()? {
            SourceKind::Sqlite => Box::new(SqliteSource::new(path)),
            SourceKind::Csv => Box::new(CsvSource::new(path)),
        })
    }
}

/// Credential table for the serving shell.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Username to password (passwords support `${ENV_VAR}` expansion).
    pub users: HashMap<String, String>,
}

impl AuthSettings {
    /// Whether `username` exists in the credential table. An empty table
    /// imposes no restriction.
    pub fn knows(&self, username: &str) -> bool {
        self.users.is_empty() || self.users.contains_key(username)
    }

    /// Check a credential pair against the table.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool, SettingsError> {
        match self.users.get(username) {
            Some(stored) => Ok(expand_env_vars(stored)? == password),
            None => Ok(false),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SIGHTLINE_CONFIG`
    /// 2. `./sightline.toml`
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SIGHTLINE_CONFIG") {
            return Self::from_file(&path);
        }
        let local = PathBuf::from("sightline.toml");
        if local.exists() {
            return Self::from_file(&local);
        }
        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }
        let mut var_name = String::new();
        while let Some(&ch) = chars.peek() {
            let done = if braced {
                ch == '}'
            } else {
                !(ch.is_alphanumeric() || ch == '_')
            };
            if done {
                break;
            }
            var_name.push(ch);
            chars.next();
        }
        if braced {
            chars.next(); // consume '}'
        }
        if var_name.is_empty() {
            result.push('$');
            continue;
        }
        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }
    Ok(result)
}
