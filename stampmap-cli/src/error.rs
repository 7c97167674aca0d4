//! Error handling for the Stampmap CLI

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Stampmap CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid mapping: {message}")]
    InvalidMapping { message: String },

    #[error("Invalid artifact name: {message}")]
    InvalidArtifact { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_mapping<S: Into<String>>(message: S) -> Self {
        Self::InvalidMapping {
            message: message.into(),
        }
    }

    pub fn invalid_artifact<S: Into<String>>(message: S) -> Self {
        Self::InvalidArtifact {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

impl From<stampmap_core::MappingError> for CliError {
    fn from(err: stampmap_core::MappingError) -> Self {
        match err {
            stampmap_core::MappingError::Io(e) => Self::io(e.to_string()),
            other => Self::invalid_mapping(other.to_string()),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
