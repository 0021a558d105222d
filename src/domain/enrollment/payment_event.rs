//! Payment provider webhook event types.
//!
//! Only fields relevant to enrollment are captured; the rest of the provider
//! schema is ignored. Order notes arrive as an object, or as an empty array
//! when the order had none, so they are kept as raw JSON.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CourseId, Money, UserId};

use super::webhook_errors::WebhookError;
use super::{PaymentConfirmation, PaymentSource};

/// Note key carrying the course id.
pub const NOTE_COURSE_ID: &str = "courseId";

/// Note key carrying the user id.
pub const NOTE_USER_ID: &str = "userId";

/// Webhook envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentWebhookEvent {
    /// Event name, e.g. `payment.captured`.
    pub event: String,

    #[serde(default)]
    pub account_id: Option<String>,

    /// Unix seconds.
    #[serde(default)]
    pub created_at: Option<i64>,

    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub payment: Option<PaymentEnvelope>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentEnvelope {
    pub entity: PaymentEntity,
}

/// Payment entity as sent by the provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentEntity {
    /// Provider payment id (`pay_...`).
    pub id: String,

    #[serde(default)]
    pub order_id: Option<String>,

    /// Amount in minor units.
    pub amount: i64,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub notes: serde_json::Value,
}

impl PaymentEntity {
    /// Reads a string note, treating blanks as absent.
    pub fn note(&self, key: &str) -> Option<&str> {
        self.notes
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Builds the confirmation this captured payment represents.
    ///
    /// # Errors
    ///
    /// - `MissingMetadata` when the order notes lack the course or user id
    /// - `InvalidPayload` when the amount is negative
    pub fn to_confirmation(&self) -> Result<PaymentConfirmation, WebhookError> {
        let course_id = self
            .note(NOTE_COURSE_ID)
            .ok_or(WebhookError::MissingMetadata(NOTE_COURSE_ID))?;
        let user_id = self
            .note(NOTE_USER_ID)
            .ok_or(WebhookError::MissingMetadata(NOTE_USER_ID))?;
        let amount = Money::from_minor(self.amount)
            .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

        Ok(PaymentConfirmation {
            user_id: UserId::new(user_id).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?,
            course_id: CourseId::new(course_id)
                .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?,
            order_id: self.order_id.clone(),
            payment_id: self.id.clone(),
            amount,
            source: PaymentSource::Webhook,
        })
    }
}

impl PaymentWebhookEvent {
    /// Classifies the event name.
    pub fn event_type(&self) -> PaymentEventType {
        PaymentEventType::parse(&self.event)
    }

    /// The payment entity, if the payload carries one.
    pub fn payment(&self) -> Option<&PaymentEntity> {
        self.payload.payment.as_ref().map(|p| &p.entity)
    }
}

/// Event names this service recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentEventType {
    /// Funds captured; the only event that creates enrollments.
    PaymentCaptured,
    PaymentAuthorized,
    PaymentFailed,
    OrderPaid,
    Unknown,
}

impl PaymentEventType {
    pub fn parse(s: &str) -> Self {
        match s {
            "payment.captured" => Self::PaymentCaptured,
            "payment.authorized" => Self::PaymentAuthorized,
            "payment.failed" => Self::PaymentFailed,
            "order.paid" => Self::OrderPaid,
            _ => Self::Unknown,
        }
    }

    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::PaymentCaptured)
    }
}
