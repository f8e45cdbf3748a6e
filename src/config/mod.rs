//! Configuration module for Sightline.
//!
//! Handles row-source configuration, environment variables, and the
//! credential table for the serving shell.

mod settings;

pub use settings::{
    expand_env_vars, AuthSettings, Settings, SettingsError, SourceKind, SourceSettings,
};
