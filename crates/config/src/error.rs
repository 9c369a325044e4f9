//! Error types for loading and saving configuration

use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but holds nothing; never silently replaced with defaults
    #[error("Config file {} is empty", .path.display())]
    Empty { path: PathBuf },

    #[error("Could not parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {}", join(.0))]
    Invalid(Vec<ValidationError>),

    #[error("No user config directory is available on this platform")]
    NoConfigDir,
}

/// One rejected field, named by its dotted path such as `player.rewind_secs`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
