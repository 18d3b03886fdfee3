// crates/core/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading a session log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Session log not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied reading session log: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in session log {path}: {message}")]
    MalformedJson { path: PathBuf, message: String },
}

impl LogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors that can occur when loading a schema universe.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Schema file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied reading schema: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("IO error reading schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in schema {path}: {message}")]
    MalformedJson { path: PathBuf, message: String },

    #[error("Unparsable DDL in schema {path}: {message}")]
    MalformedDdl { path: PathBuf, message: String },

    #[error("Unsupported schema file extension: {path} (expected .json or .sql)")]
    UnsupportedFormat { path: PathBuf },
}

impl SchemaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }
}
