//! Lead Edge SDK - Types shared between the gateway pipeline and its handlers
//!
//! Handlers receive a [`Request`], return a [`Response`] or a [`HandlerError`],
//! and every outbound response is shaped by a [`CorsPolicy`].

pub mod cors;
pub mod error;
pub mod request;
pub mod response;

pub mod prelude {
    //! Common imports for Lead Edge handlers
    pub use crate::cors::CorsPolicy;
    pub use crate::error::HandlerError;
    pub use crate::request::Request;
    pub use crate::response::Response;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value as JsonValue};
}

// Re-export key types at crate root
pub use cors::CorsPolicy;
pub use error::HandlerError;
pub use request::Request;
pub use response::Response;
