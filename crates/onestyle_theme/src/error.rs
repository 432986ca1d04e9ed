use onestyle_core::DocumentError;
use serde_json::error::Category;
use thiserror::Error;

/// Failures reported by a [`Storage`](crate::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing `{key}` ({size} bytes, {limit} allowed)")]
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },

    #[error("storage i/o error on `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage backend failed on `{key}`: {message}")]
    Backend { key: String, message: String },
}

/// Why an imported configuration was rejected.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("configuration does not match the expected shape: {0}")]
    Schema(String),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => ImportError::Schema(err.to_string()),
            Category::Io | Category::Syntax | Category::Eof => ImportError::Syntax {
                line: err.line(),
                column: err.column(),
                message: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
