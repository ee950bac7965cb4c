//! Error types for the playground.
//!
//! Defines the main error enum used throughout the application. HTTP status
//! mapping lives in `server::response`.

use thiserror::Error;

/// SQLSTATE reported by PostgreSQL for a reference to an unknown column.
pub const UNDEFINED_COLUMN: &str = "42703";

/// Main error type for playground operations.
#[derive(Error, Debug)]
pub enum PlaygroundError {
    /// A request is missing required fields or carries invalid values.
    #[error("{error}")]
    Validation {
        error: String,
        message: String,
        required: Vec<&'static str>,
        /// The subset of `required` absent from the request.
        missing: Vec<&'static str>,
    },

    /// The requested record does not exist.
    #[error("{error}")]
    NotFound { error: String, message: String },

    /// The request was understood but refused by policy (dangerous SQL, unknown shape).
    #[error("{error}")]
    Rejected { error: String, message: String },

    /// The request body could not be read.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A store operation failed; `error` and `message` are shown to the user.
    #[error("{error}: {source}")]
    Store {
        error: String,
        message: String,
        #[source]
        source: Box<PlaygroundError>,
    },

    /// Errors reported by the database while running a statement.
    #[error("Database error: {message}")]
    Database {
        message: String,
        /// SQLSTATE code, when the database supplied one.
        code: Option<String>,
    },

    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaygroundError {
    /// Creates a validation error listing the fields a request must carry
    /// and the ones it left out.
    pub fn validation(
        error: impl Into<String>,
        message: impl Into<String>,
        required: &[&'static str],
        missing: Vec<&'static str>,
    ) -> Self {
        Self::Validation {
            error: error.into(),
            message: message.into(),
            required: required.to_vec(),
            missing,
        }
    }

    /// Creates a validation error for a single bad value.
    pub fn invalid(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation(error, message, &[], Vec::new())
    }

    /// Creates a not-found error.
    pub fn not_found(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Creates a policy rejection.
    pub fn rejected(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Wraps a storage failure with user-facing text.
    ///
    /// Errors that already describe the request (validation, not found,
    /// rejection) are returned unchanged.
    pub fn into_store_failure(self, error: impl Into<String>, message: impl Into<String>) -> Self {
        match self {
            Self::Validation { .. } | Self::NotFound { .. } | Self::Rejected { .. } => self,
            Self::BadRequest(_) | Self::Store { .. } => self,
            other => Self::Store {
                error: error.into(),
                message: message.into(),
                source: Box::new(other),
            },
        }
    }

    /// Creates a bad request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Creates a database error without a SQLSTATE code.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database {
            message: msg.into(),
            code: None,
        }
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the SQLSTATE code of a database error.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::Database { code, .. } => code.as_deref(),
            Self::Store { source, .. } => source.sql_state(),
            _ => None,
        }
    }

    /// Returns true if the database rejected a reference to an unknown column.
    pub fn is_undefined_column(&self) -> bool {
        self.sql_state() == Some(UNDEFINED_COLUMN)
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Validation Error",
            Self::NotFound { .. } => "Not Found",
            Self::Rejected { .. } => "Rejected",
            Self::BadRequest(_) => "Bad Request",
            Self::Store { .. } => "Store Error",
            Self::Database { .. } => "Database Error",
            Self::Connection(_) => "Connection Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<sqlx::Error> for PlaygroundError {
    fn from(error: sqlx::Error) -> Self {
        match error.as_database_error() {
            Some(db_error) => Self::Database {
                message: db_error.message().to_string(),
                code: db_error.code().map(|c| c.into_owned()),
            },
            None => Self::Database {
                message: error.to_string(),
                code: None,
            },
        }
    }
}

/// Result type alias using PlaygroundError.
pub type Result<T> = std::result::Result<T, PlaygroundError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let err = PlaygroundError::validation(
            "Missing required information",
            "Every Lego brick needs: name, color, size, and shape",
            &["name", "color", "size", "shape"],
            vec!["size", "shape"],
        );
        assert_eq!(err.to_string(), "Missing required information");
        assert_eq!(err.category(), "Validation Error");
    }

    #[test]
    fn test_error_display_database() {
        let err = PlaygroundError::database("relation \"nope\" does not exist");
        assert_eq!(
            err.to_string(),
            "Database error: relation \"nope\" does not exist"
        );
        assert_eq!(err.category(), "Database Error");
        assert_eq!(err.sql_state(), None);
    }

    #[test]
    fn test_undefined_column_detection() {
        let err = PlaygroundError::Database {
            message: "column \"tablenumber\" does not exist".to_string(),
            code: Some(UNDEFINED_COLUMN.to_string()),
        };
        assert!(err.is_undefined_column());
        assert!(!PlaygroundError::database("boom").is_undefined_column());
    }

    #[test]
    fn test_store_failure_wraps_database_errors_only() {
        let err = PlaygroundError::database("connection reset")
            .into_store_failure("Couldn't add menu item", "The chef couldn't add this to the menu");
        assert!(matches!(err, PlaygroundError::Store { .. }));
        assert_eq!(
            err.to_string(),
            "Couldn't add menu item: Database error: connection reset"
        );

        let err = PlaygroundError::not_found("Order not found", "This order doesn't exist")
            .into_store_failure("Couldn't get order", "Try again");
        assert!(matches!(err, PlaygroundError::NotFound { .. }));
    }

    #[test]
    fn test_error_display_config() {
        let err = PlaygroundError::config("missing field 'database'");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing field 'database'"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_sqlx_non_database_error_has_no_code() {
        let err: PlaygroundError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, PlaygroundError::Database { code: None, .. }));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlaygroundError>();
    }
}
