//! Route handlers
//!
//! Each handler parses its input, validates it, issues its statements one at a
//! time and shapes a JSON response. Errors are returned as [`HandlerError`]
//! and converted to responses by the pipeline.
//!
//! [`HandlerError`]: lead_edge_sdk::HandlerError

pub mod admin;
pub mod beverages;
pub mod health;
pub mod lead;

pub use admin::{admin_stats, list_suppliers, AdminStats};
pub use beverages::list_beverages;
pub use health::health_check;
pub use lead::{create_lead, LeadSubmission, NewLead};
