//! Lead capture form submission

use lead_edge_sdk::{HandlerError, Request, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::Context;

pub const MISSING_FIELDS: &str = "Email and service are required";

/// Raw form body, one loosely typed JSON value per field.
#[derive(Debug, Default, Deserialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
    #[serde(default)]
    pub service: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

/// Render one form field as text.
///
/// Strings are kept and numbers are rendered. Absent, `null`, `false`, zero
/// and `""` all mean "not provided" and become the empty string. Anything
/// else is rejected.
fn form_text(field: &str, value: Option<Value>) -> Result<String, HandlerError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(String::new()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(HandlerError::Validation(format!("Invalid value for {}", field))),
    }
}

/// A submission that passed validation and is ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

impl LeadSubmission {
    pub fn validate(self) -> Result<NewLead, HandlerError> {
        let lead = NewLead {
            name: form_text("name", self.name)?,
            email: form_text("email", self.email)?,
            phone: form_text("phone", self.phone)?,
            service: form_text("service", self.service)?,
            message: form_text("message", self.message)?,
        };

        if lead.email.is_empty() || lead.service.is_empty() {
            return Err(HandlerError::Validation(MISSING_FIELDS.to_string()));
        }

        Ok(lead)
    }
}

/// `POST /api/lead` - validate the form and insert one row.
pub async fn create_lead(ctx: &Context, req: &Request) -> Result<Response, HandlerError> {
    let lead = req.json::<LeadSubmission>()?.validate()?;

    ctx.db
        .prepare(
            "INSERT INTO leads (name, email, phone, service, message, created_at)
             VALUES (?, ?, ?, ?, ?, datetime('now'))",
        )
        .bind(lead.name)
        .bind(lead.email.as_str())
        .bind(lead.phone)
        .bind(lead.service.as_str())
        .bind(lead.message)
        .run()
        .await?;

    tracing::info!(request_id = %req.request_id, service = %lead.service, "Lead captured");

    Ok(Response::ok(json!({ "ok": true })))
}
