//! Contact form intake.
//!
//! Turns one inbound request into a [`ContactResponse`] and, when the request
//! is a well-formed submission, the extracted [`ContactSubmission`]. Nothing
//! here performs I/O; forwarding the submission is left to the host.

use crate::error::{Error, Result};
use crate::types::{ContactRequest, ContactResponse, ContactSubmission, ResponseMode};
use serde_json::{Value, json};

pub const SUBMISSION_METHOD: &str = "POST";
pub const ACKNOWLEDGEMENT: &str = "Form data received";

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Result of handling one contact request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Wrong method or unreadable body; nothing should be forwarded
    Rejected(ContactResponse),
    Accepted {
        response: ContactResponse,
        submission: ContactSubmission,
    },
}

impl IntakeOutcome {
    pub fn response(&self) -> &ContactResponse {
        match self {
            IntakeOutcome::Rejected(response) => response,
            IntakeOutcome::Accepted { response, .. } => response,
        }
    }

    pub fn into_parts(self) -> (ContactResponse, Option<ContactSubmission>) {
        match self {
            IntakeOutcome::Rejected(response) => (response, None),
            IntakeOutcome::Accepted {
                response,
                submission,
            } => (response, Some(submission)),
        }
    }
}

/// Body encodings the endpoint understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    Json,
    Form,
}

impl BodyEncoding {
    /// Pick the decoder from a Content-Type header value.
    ///
    /// A missing header means JSON, which is what the site's form script sends.
    pub fn negotiate(content_type: Option<&str>) -> Result<Self> {
        let Some(content_type) = content_type else {
            return Ok(BodyEncoding::Json);
        };

        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match media_type.as_str() {
            "" | JSON_CONTENT_TYPE => Ok(BodyEncoding::Json),
            FORM_CONTENT_TYPE => Ok(BodyEncoding::Form),
            _ => Err(Error::UnsupportedMediaType(media_type)),
        }
    }
}

/// Handle a single contact request.
///
/// Anything other than POST gets a 405 without the body being looked at.
/// Malformed bodies get a 400 and unknown encodings a 415, both with a JSON
/// `error` field. Otherwise the configured success shape is returned.
pub fn handle(request: &ContactRequest, mode: &ResponseMode) -> IntakeOutcome {
    if request.method != SUBMISSION_METHOD {
        tracing::debug!(method = %request.method, "rejecting contact request");
        return IntakeOutcome::Rejected(method_not_allowed());
    }

    let submission = match parse_submission(request.header("content-type"), &request.body) {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting malformed contact submission");
            return IntakeOutcome::Rejected(error_response(&e));
        }
    };

    tracing::info!(
        has_name = submission.name.is_some(),
        has_email = submission.email.is_some(),
        has_message = submission.message.is_some(),
        has_disclaimer = submission.disclaimer.is_some(),
        "contact form submission received"
    );

    IntakeOutcome::Accepted {
        response: success_response(mode),
        submission,
    }
}

/// Decode a request body into a submission.
///
/// An empty (or whitespace-only) body yields an empty submission.
pub fn parse_submission(content_type: Option<&str>, body: &[u8]) -> Result<ContactSubmission> {
    let encoding = BodyEncoding::negotiate(content_type)?;

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ContactSubmission::default());
    }

    match encoding {
        BodyEncoding::Json => parse_json(body),
        BodyEncoding::Form => Ok(parse_form(body)),
    }
}

fn parse_json(body: &[u8]) -> Result<ContactSubmission> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| Error::InvalidData(format!("Invalid JSON body: {}", e)))?;

    if !value.is_object() {
        return Err(Error::InvalidData(
            "JSON body must be an object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::InvalidData(format!("Invalid contact fields: {}", e)))
}

fn parse_form(body: &[u8]) -> ContactSubmission {
    let mut submission = ContactSubmission::default();

    for (key, value) in url::form_urlencoded::parse(body) {
        let slot = match &*key {
            "name" => &mut submission.name,
            "email" => &mut submission.email,
            "message" => &mut submission.message,
            "disclaimer" => &mut submission.disclaimer,
            _ => continue,
        };
        // First occurrence wins
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    submission
}

fn method_not_allowed() -> ContactResponse {
    ContactResponse::new(405, "Method Not Allowed")
        .with_header("Content-Type", TEXT_CONTENT_TYPE)
        .with_header("Allow", SUBMISSION_METHOD)
}

fn success_response(mode: &ResponseMode) -> ContactResponse {
    match mode {
        ResponseMode::Acknowledge => {
            ContactResponse::new(200, json!({ "message": ACKNOWLEDGEMENT }).to_string())
                .with_header("Content-Type", JSON_CONTENT_TYPE)
        }
        ResponseMode::Redirect { location } => {
            ContactResponse::new(302, "").with_header("Location", location.clone())
        }
    }
}

fn error_response(error: &Error) -> ContactResponse {
    let status = match error {
        Error::UnsupportedMediaType(_) => 415,
        _ => 400,
    };

    ContactResponse::new(status, json!({ "error": error.to_string() }).to_string())
        .with_header("Content-Type", JSON_CONTENT_TYPE)
}
