//! Centralized error types for FamHub.
//!
//! Errors carry full context for logging, and `user_message()` gives the
//! short text shown in the blocking alert when a write fails.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Rejected before any request was issued.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Service-level errors mapped from the repository layer.
    #[error("Service error: {0}")]
    Service(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Database(e) => e.user_message(),
            AppError::Validation(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Service(_) => "Saving failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }

    /// True if the error was raised by input validation, not by the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Database/storage errors (SQLite store).
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Data corruption detected: {0}")]
    Corruption(String),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::QueryFailed(_) => "A data operation failed. Please try again.",
            DatabaseError::Corruption(_) => {
                "Local data may be corrupted. Consider resetting app data."
            }
        }
    }
}

/// Required-field failures caught before any request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("author is required")]
    MissingAuthor,

    #[error("title is required")]
    MissingTitle,

    #[error("content is required")]
    MissingContent,

    #[error("card name and owner are required")]
    MissingCardFields,

    #[error("company is required")]
    MissingCompany,

    #[error("time is not on the schedule grid")]
    InvalidTime,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::MissingAuthor => "Please choose an author.",
            ValidationError::MissingTitle => "Please enter a title.",
            ValidationError::MissingContent => "Please enter some content.",
            ValidationError::MissingCardFields => "Card name and owner are required.",
            ValidationError::MissingCompany => "Please choose a company.",
            ValidationError::InvalidTime => "Please pick a time from the list.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

/// Extension trait for converting rusqlite errors to our error types.
pub trait RusqliteErrorExt {
    fn into_database_error(self) -> DatabaseError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_database_error(self) -> DatabaseError {
        match &self {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("corrupt") => {
                DatabaseError::Corruption(self.to_string())
            }
            _ => DatabaseError::QueryFailed(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_conversion() {
        let app_err: AppError = ValidationError::MissingTitle.into();
        assert!(app_err.is_validation());
        assert_eq!(app_err.user_message(), "Please enter a title.");
    }

    #[test]
    fn test_server_error_messages_depend_on_status() {
        let outage = NetworkError::ServerError {
            status: 503,
            message: "unavailable".into(),
        };
        let rejected = NetworkError::ServerError {
            status: 400,
            message: "bad".into(),
        };
        assert_ne!(outage.user_message(), rejected.user_message());
        assert!(outage.user_message().contains("later"));
    }

    #[test]
    fn test_service_error_is_not_validation() {
        let app_err = AppError::Service("insert failed".into());
        assert!(!app_err.is_validation());
        assert_eq!(app_err.to_string(), "Service error: insert failed");
    }

    #[test]
    fn test_database_error_conversion() {
        let err = rusqlite::Error::QueryReturnedNoRows.into_database_error();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
        let app_err: AppError = err.into();
        assert!(matches!(app_err, AppError::Database(_)));
    }

    #[test]
    fn test_every_validation_error_has_a_message() {
        let all = [
            ValidationError::MissingAuthor,
            ValidationError::MissingTitle,
            ValidationError::MissingContent,
            ValidationError::MissingCardFields,
            ValidationError::MissingCompany,
            ValidationError::InvalidTime,
        ];
        for err in all {
            assert!(!err.user_message().is_empty());
            assert!(AppError::from(err).is_validation());
        }
    }
}
