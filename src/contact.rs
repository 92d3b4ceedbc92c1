//! Contact form submission: validation, delivery and HTTP mapping.
//!
//! Each submission is handled in a single pass:
//! `received -> validating -> { rejected | unconfigured-accepted | sending -> { sent | failed } }`.
//! There are no retries and nothing is stored.

use crate::config::{Config, DEFAULT_EMAIL_FROM, DEFAULT_EMAIL_TO};
use crate::email::{DeliveryError, EmailSender, MessageId, OutboundEmail, ResendClient};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::SecretString;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{error, info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

// ==================== Submission ====================

/// A contact form payload as posted by the site.
#[derive(Debug, Clone, Validate)]
pub struct ContactSubmission {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[validate(custom(function = "validate_subject"))]
    pub subject: String,

    #[validate(custom(function = "validate_message"))]
    pub message: String,

    /// Hidden anti-automation field. Accepted but not enforced here.
    pub honeypot: Option<String>,
}

fn bounded(
    value: &str,
    min: usize,
    max: usize,
    too_short: &'static str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new("too_small").with_message(Cow::Borrowed(too_short)));
    }
    if len > max {
        return Err(ValidationError::new("too_big").with_message(Cow::Owned(format!(
            "String must contain at most {} character(s)",
            max
        ))));
    }
    Ok(())
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    bounded(value, 1, 100, "Name is required")
}

fn validate_subject(value: &str) -> Result<(), ValidationError> {
    bounded(value, 1, 200, "Subject is required")
}

fn validate_message(value: &str) -> Result<(), ValidationError> {
    bounded(value, 10, 5000, "Message must be at least 10 characters")
}

// Dotted domain with an alphabetic TLD; the `regex` crate has no lookahead,
// so leading and doubled dots are checked separately
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn validate_email(value: &str) -> Result<(), ValidationError> {
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
            .expect("email pattern is valid")
    });

    if value.starts_with('.') || value.contains("..") || !regex.is_match(value) {
        return Err(ValidationError::new("email")
            .with_message(Cow::Borrowed("Invalid email address")));
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl ContactSubmission {
    /// Read a submission out of a parsed JSON body.
    ///
    /// Absent and non-string fields are reported under their own name,
    /// alongside whatever the remaining fields fail. Unknown keys are ignored,
    /// and so is a `honeypot` that is not a string.
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let Some(object) = body.as_object() else {
            return Err(FieldErrors {
                form_errors: vec![format!("Expected object, received {}", json_type(body))],
                field_errors: BTreeMap::new(),
            });
        };

        let mut shape_errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut text = |key: &str| match object.get(key) {
            Some(Value::String(value)) => value.clone(),
            Some(other) => {
                shape_errors.insert(
                    key.to_string(),
                    vec![format!("Expected string, received {}", json_type(other))],
                );
                String::new()
            }
            None => {
                shape_errors.insert(key.to_string(), vec!["Required".to_string()]);
                String::new()
            }
        };

        let submission = Self {
            name: text("name"),
            email: text("email"),
            subject: text("subject"),
            message: text("message"),
            honeypot: object
                .get("honeypot")
                .and_then(Value::as_str)
                .map(str::to_string),
        };

        if shape_errors.is_empty() {
            return Ok(submission);
        }

        let mut report = match submission.validate() {
            Ok(()) => FieldErrors::default(),
            Err(errors) => FieldErrors::from(&errors),
        };
        report.field_errors.extend(shape_errors);
        Err(report)
    }
}

/// Field-level validation report returned to the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    pub form_errors: Vec<String>,
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string)
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Self {
            form_errors: Vec::new(),
            field_errors,
        }
    }
}

// ==================== Outcomes & Errors ====================

/// Successful terminal states of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Delivered to the provider, which assigned this id.
    Sent(MessageId),
    /// No credential configured; accepted without sending.
    AcceptedUnconfigured,
}

/// Failed terminal states of a submission.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuccessBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message_id: Option<MessageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl IntoResponse for SubmissionOutcome {
    fn into_response(self) -> Response {
        let body = match self {
            Self::Sent(id) => SuccessBody {
                success: true,
                message_id: Some(id),
                message: None,
            },
            Self::AcceptedUnconfigured => SuccessBody {
                success: true,
                message_id: None,
                message: Some("Message received (email not configured)"),
            },
        };

        (StatusCode::OK, Json(body)).into_response()
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        // Provider and internal details stay in the logs
        match self {
            Self::Validation(details) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Validation failed", "details": details })),
            )
                .into_response(),
            Self::Delivery(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to send email" })),
            )
                .into_response(),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

// ==================== Service ====================

/// Injected contact settings.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Email provider credential; `None` means submissions are accepted unsent
    pub credential: Option<SecretString>,
    /// Inbox overriding the default recipient
    pub recipient_override: Option<String>,
    /// Fixed sender identity
    pub sender: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            credential: None,
            recipient_override: None,
            sender: DEFAULT_EMAIL_FROM.to_string(),
        }
    }
}

impl ContactConfig {
    pub fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    pub fn recipient(&self) -> &str {
        self.recipient_override.as_deref().unwrap_or(DEFAULT_EMAIL_TO)
    }
}

/// Validates submissions and forwards them to the email capability.
pub struct ContactService {
    config: ContactConfig,
    sender: Option<Arc<dyn EmailSender>>,
}

impl std::fmt::Debug for ContactService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactService")
            .field("config", &self.config)
            .field("has_sender", &self.sender.is_some())
            .finish()
    }
}

impl ContactService {
    pub fn new(config: ContactConfig, sender: Option<Arc<dyn EmailSender>>) -> Self {
        Self { config, sender }
    }

    /// Build the service from process configuration. The Resend client is
    /// only constructed when a credential is present.
    pub fn from_config(config: &Config) -> Result<Self> {
        let contact = config.contact();

        let sender = match &contact.credential {
            Some(key) => {
                let client =
                    ResendClient::new(&config.resend_api_url, key.clone(), config.email_timeout)
                        .context("Failed to build Resend client")?;
                Some(Arc::new(client) as Arc<dyn EmailSender>)
            }
            None => None,
        };

        Ok(Self::new(contact, sender))
    }

    /// Handle one submission. At most one email is sent.
    pub async fn submit(
        &self,
        submission: ContactSubmission,
    ) -> Result<SubmissionOutcome, ContactError> {
        if let Err(errors) = submission.validate() {
            return Err(ContactError::Validation(FieldErrors::from(&errors)));
        }

        if submission.honeypot.as_deref().is_some_and(|v| !v.is_empty()) {
            warn!(
                "Contact submission from {} has a filled honeypot field",
                submission.email
            );
        }

        if !self.config.is_configured() {
            info!(
                name = %submission.name,
                email = %submission.email,
                subject = %submission.subject,
                message = %submission.message,
                "Contact form submission (email not configured)"
            );
            return Ok(SubmissionOutcome::AcceptedUnconfigured);
        }

        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| ContactError::Internal("email sender not initialized".to_string()))?;

        let email = compose_email(&self.config, &submission);
        match sender.send(&email).await {
            Ok(id) => {
                info!("Contact email sent ({})", id.as_str());
                Ok(SubmissionOutcome::Sent(id))
            }
            Err(e) => {
                error!("Resend error: {}", e);
                Err(ContactError::Delivery(e))
            }
        }
    }
}

/// Build the notification email for a validated submission.
///
/// The HTML body turns message newlines into `<br />`; nothing else is
/// transformed.
pub fn compose_email(config: &ContactConfig, submission: &ContactSubmission) -> OutboundEmail {
    let ContactSubmission {
        name,
        email,
        subject,
        message,
        ..
    } = submission;

    let html = format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <p><strong>Subject:</strong> {subject}</p>\n\
         <hr />\n\
         <h3>Message:</h3>\n\
         <p>{}</p>\n",
        message.replace('\n', "<br />")
    );

    let text = format!(
        "New Contact Form Submission\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Subject: {subject}\n\n\
         Message:\n\
         {message}\n"
    );

    OutboundEmail {
        from: config.sender.clone(),
        to: config.recipient().to_string(),
        reply_to: email.clone(),
        subject: format!("[Portfolio] {}", subject),
        html,
        text,
    }
}

// ==================== HTTP Handler ====================

/// `POST /api/contact`
///
/// The body is read as JSON whatever its `Content-Type`. Only a body that is
/// not JSON at all is an internal error; anything else goes through
/// validation.
pub async fn submit_contact(
    State(service): State<Arc<ContactService>>,
    body: Bytes,
) -> Result<SubmissionOutcome, ContactError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        error!("Contact API error: {}", e);
        ContactError::Internal(e.to_string())
    })?;

    let submission = ContactSubmission::from_json(&payload).map_err(ContactError::Validation)?;
    service.submit(submission).await
}
