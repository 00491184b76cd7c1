//! Error types for Lead Edge handlers

use thiserror::Error;

/// Message returned to clients for every internal failure.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// Errors that can occur in a handler
#[derive(Error, Debug)]
pub enum HandlerError {
    /// A required input was missing or malformed. The message is shown to the client.
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Convert the error to an HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Validation(_) => 400,
            HandlerError::Unauthorized => 401,
            HandlerError::NotFound => 404,
            _ => 500,
        }
    }

    /// Whether this error hides its details from the client.
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }

    /// The message a client is allowed to see.
    pub fn public_message(&self) -> String {
        if self.is_internal() {
            GENERIC_SERVER_ERROR.to_string()
        } else {
            self.to_string()
        }
    }

    /// Convert to a Response
    pub fn to_response(&self) -> crate::Response {
        crate::Response::json(
            self.status_code(),
            serde_json::json!({
                "error": self.public_message()
            }),
        )
    }
}

impl From<HandlerError> for crate::Response {
    fn from(err: HandlerError) -> Self {
        err.to_response()
    }
}
