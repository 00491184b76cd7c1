//! Backing services reachable from handlers
//!
//! The only service is the SQL database binding. It runs as a long-lived
//! actor that owns the connection; handlers send it parameter-bound statements.

pub mod database;

pub use database::{Database, Row, Statement};

/// Errors related to service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("No such table: {0}")]
    NoSuchTable(String),
}

impl From<ServiceError> for lead_edge_sdk::HandlerError {
    fn from(err: ServiceError) -> Self {
        lead_edge_sdk::HandlerError::Database(err.to_string())
    }
}
