//! Error types for chanstat-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the chanstat-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Export file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export file is not valid JSON for the expected shape
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A decoded record carries a value we cannot interpret
    #[error("parse error in {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Invalid glob pattern while discovering day files
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for chanstat-core
pub type Result<T> = std::result::Result<T, Error>;
