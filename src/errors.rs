use axum::http::StatusCode;
use std::fmt;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Failures of the key-value store backing the persisted document.
#[derive(Debug)]
pub enum StorageError {
    /// The stored value could not be read.
    Read { key: String, message: String },
    /// The value could not be written (quota, permissions, full disk).
    Write { key: String, message: String },
}

impl StorageError {
    pub fn read(key: &str, err: impl fmt::Display) -> Self {
        StorageError::Read {
            key: key.to_string(),
            message: err.to_string(),
        }
    }

    pub fn write(key: &str, err: impl fmt::Display) -> Self {
        StorageError::Write {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Read { key, message } => {
                write!(f, "failed to read '{}': {}", key, message)
            }
            StorageError::Write { key, message } => {
                write!(f, "failed to write '{}': {}", key, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}
