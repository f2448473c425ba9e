//! Error types shared across Quadwarp crates.

use std::path::PathBuf;

/// Top-level error type for Quadwarp operations.
#[derive(Debug, thiserror::Error)]
pub enum QuadwarpError {
    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Mesh not found: {name}")]
    NotFound { name: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using QuadwarpError.
pub type QuadwarpResult<T> = Result<T, QuadwarpError>;

impl QuadwarpError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}
