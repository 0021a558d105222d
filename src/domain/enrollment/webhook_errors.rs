//! Webhook error types.
//!
//! Status codes drive the provider's redelivery: it retries on any non-2xx
//! response, so only failures that a later attempt could fix map to 5xx.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::ErrorCode;

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No signature header on the request.
    #[error("Missing signature header")]
    MissingSignature,

    /// Signature did not match the raw body.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Body is not a valid event document.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Order notes lack an id this service put there.
    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    /// Payload fields are present but unusable.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Event was intentionally ignored (not an error condition).
    #[error("Event ignored: {0}")]
    Ignored(String),

    /// Storage failed while applying the event.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the provider should redeliver this event.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    /// Maps the error to an HTTP status code.
    ///
    /// - 2xx: acknowledged, no redelivery
    /// - 4xx: rejected, provider may still redeliver per its policy
    /// - 5xx: transient, provider redelivers
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,

            // Redelivery cannot add notes or fix amounts, so acknowledge.
            WebhookError::MissingMetadata(_)
            | WebhookError::InvalidPayload(_)
            | WebhookError::Ignored(_) => StatusCode::OK,

            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code reported in the response body.
    pub fn code(&self) -> ErrorCode {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                ErrorCode::InvalidSignature
            }
            WebhookError::ParseError(_)
            | WebhookError::MissingMetadata(_)
            | WebhookError::InvalidPayload(_)
            | WebhookError::Ignored(_) => ErrorCode::ValidationFailed,
            WebhookError::Database(_) => ErrorCode::InternalError,
        }
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        match self {
            WebhookError::Database(_) => "Webhook processing failed".to_string(),
            other => other.to_string(),
        }
    }
}
