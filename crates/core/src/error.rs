use std::io;
use std::path::PathBuf;

/// Errors that can occur while introspecting libvips or generating bindings
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Introspection error: {0}")]
    IntrospectionError(String),

    #[error("Enum introspection error: {0}")]
    EnumIntrospectionError(String),

    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Native library error: {0}")]
    LibraryError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type alias for vipsgen operations
pub type Result<T> = std::result::Result<T, Error>;
