//! Contact form endpoint.
//!
//! Validates and acknowledges; nothing is stored or forwarded. Accepted
//! submissions are written to the log.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Value, json};
use tracing::{debug, error, info};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Missing required fields")]
    MissingFields,
    /// Body was not JSON, or was JSON `null`.
    #[error("Failed to process request")]
    Malformed,
}

impl ContactError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::Malformed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Fields are kept as raw JSON: any truthy value counts as filled in.
#[derive(Debug, Default, PartialEq)]
pub struct ContactPayload {
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub message: Option<Value>,
    /// Hidden `website` (or `honeypot`) form field; only bots fill it in.
    pub honeypot: Option<Value>,
}

impl ContactPayload {
    /// Pick the form fields out of a parsed body.
    ///
    /// Non-object bodies carry no fields; `null` cannot be read at all.
    ///
    /// # Errors
    ///
    /// Returns `Malformed` for a `null` body.
    pub fn from_value(body: Value) -> Result<Self, ContactError> {
        match body {
            Value::Null => Err(ContactError::Malformed),
            Value::Object(mut fields) => Ok(Self {
                name: fields.remove("name"),
                email: fields.remove("email"),
                message: fields.remove("message"),
                honeypot: fields.remove("website").or_else(|| fields.remove("honeypot")),
            }),
            _ => Ok(Self::default()),
        }
    }
}

/// A submission that passed validation.
#[derive(Debug, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Submission {
    Accepted(ContactForm),
    /// Honeypot was filled: acknowledge, drop silently.
    Spam,
}

/// JSON truthiness: `null`, `false`, `0` and `""` are blank.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Check that all required fields are filled in.
///
/// Email shape is left to the form; the endpoint accepts any non-blank value.
///
/// # Errors
///
/// `MissingFields` if any of name, email, message is absent or blank.
pub fn validate(payload: ContactPayload) -> Result<Submission, ContactError> {
    if payload.honeypot.as_ref().is_some_and(truthy) {
        return Ok(Submission::Spam);
    }

    let required = |field: Option<Value>| field.filter(truthy).map(field_text);
    let (Some(name), Some(email), Some(message)) =
        (required(payload.name), required(payload.email), required(payload.message))
    else {
        return Err(ContactError::MissingFields);
    };

    Ok(Submission::Accepted(ContactForm { name, email, message }))
}

/// `POST /api/contact`: validate and acknowledge a contact form.
pub async fn submit_contact(body: Bytes) -> Result<Json<Value>, ContactError> {
    let parsed: Value = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "contact form body rejected");
        ContactError::Malformed
    })?;

    match validate(ContactPayload::from_value(parsed)?)? {
        Submission::Accepted(form) => {
            info!(
                name = %form.name,
                email = %form.email,
                message_chars = form.message.chars().count(),
                "contact form submission"
            );
        }
        Submission::Spam => debug!("contact form honeypot filled; dropping"),
    }

    Ok(Json(json!({ "success": true, "message": "Message received successfully" })))
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
