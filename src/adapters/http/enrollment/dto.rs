//! Request and response DTOs for enrollment endpoints.
//!
//! Field names are camelCase on the wire. The verify-payment request also
//! accepts the provider checkout's own `razorpay_*` field names so the
//! browser can forward the checkout callback unchanged.

use serde::{Deserialize, Serialize};

use crate::application::handlers::enrollment::{
    CreateOrderResult, EnrollmentSummary, LectureAccess, ManageAccessResult,
};
use crate::domain::catalog::{Course, LectureProgress};
use crate::domain::enrollment::Enrollment;
use crate::ports::PaymentOrder;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /enrollments/create-order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub course_id: String,
}

/// Body of `POST /enrollments/verify-payment`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    #[serde(default, alias = "razorpay_order_id")]
    pub order_id: String,

    #[serde(default, alias = "razorpay_payment_id")]
    pub payment_id: String,

    #[serde(default, alias = "razorpay_signature")]
    pub signature: String,

    #[serde(default)]
    pub course_id: String,
}

/// Body of the admin grant and revoke endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageAccessRequest {
    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub course_id: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Views
// ════════════════════════════════════════════════════════════════════════════

/// Provider order as handed to the checkout widget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    /// Minor units, as the checkout widget expects.
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
}

impl From<PaymentOrder> for OrderView {
    fn from(order: PaymentOrder) -> Self {
        Self {
            id: order.id,
            amount: order.amount,
            currency: order.currency,
            receipt: order.receipt,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    pub id: String,
    pub title: String,
    /// Major units (rupees).
    pub price: f64,
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            title: course.title.clone(),
            price: course.price.major_units(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub status: String,
    /// Major units (rupees).
    pub amount_paid: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_payment_id: Option<String>,
    pub enrolled_at: String,
    pub updated_at: String,
}

impl From<&Enrollment> for EnrollmentView {
    fn from(e: &Enrollment) -> Self {
        Self {
            id: e.id.to_string(),
            user_id: e.user_id.to_string(),
            course_id: e.course_id.to_string(),
            status: e.status.to_string(),
            amount_paid: e.amount_paid.major_units(),
            razorpay_order_id: e.provider_order_id.clone(),
            razorpay_payment_id: e.provider_payment_id.clone(),
            enrolled_at: e.enrolled_at.as_datetime().to_rfc3339(),
            updated_at: e.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub total_lectures: u32,
    pub completed_lectures: u32,
    pub percentage: u32,
}

impl From<LectureProgress> for ProgressView {
    fn from(p: LectureProgress) -> Self {
        Self {
            total_lectures: p.total_lectures,
            completed_lectures: p.completed_lectures,
            percentage: p.percentage(),
        }
    }
}

/// One entry of the "my enrollments" list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyEnrollmentView {
    #[serde(flatten)]
    pub enrollment: EnrollmentView,
    pub course: Option<CourseView>,
    pub progress: ProgressView,
}

impl From<EnrollmentSummary> for MyEnrollmentView {
    fn from(summary: EnrollmentSummary) -> Self {
        Self {
            enrollment: EnrollmentView::from(&summary.enrollment),
            course: summary.course.as_ref().map(CourseView::from),
            progress: summary.progress.into(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order: OrderView,
    /// Public checkout key id.
    pub key: String,
    pub course: CourseView,
}

impl From<CreateOrderResult> for CreateOrderResponse {
    fn from(result: CreateOrderResult) -> Self {
        Self {
            success: true,
            course: CourseView::from(&result.course),
            order: result.order.into(),
            key: result.key_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub message: String,
    pub enrollment: EnrollmentView,
}

#[derive(Debug, Clone, Serialize)]
pub struct MyEnrollmentsResponse {
    pub success: bool,
    pub enrollments: Vec<MyEnrollmentView>,
}

impl From<Vec<EnrollmentSummary>> for MyEnrollmentsResponse {
    fn from(summaries: Vec<EnrollmentSummary>) -> Self {
        Self {
            success: true,
            enrollments: summaries.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureAccessResponse {
    pub success: bool,
    pub allowed: bool,
    pub lecture_id: String,
    pub course_id: String,
}

impl From<LectureAccess> for LectureAccessResponse {
    fn from(access: LectureAccess) -> Self {
        Self {
            success: true,
            allowed: access.decision.is_allowed(),
            lecture_id: access.lecture_id.to_string(),
            course_id: access.course_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ManageAccessResponse {
    pub success: bool,
    pub changed: bool,
    pub enrollment: EnrollmentView,
}

impl From<ManageAccessResult> for ManageAccessResponse {
    fn from(result: ManageAccessResult) -> Self {
        Self {
            success: true,
            changed: result.changed,
            enrollment: EnrollmentView::from(&result.enrollment),
        }
    }
}

/// Plain acknowledgement, used by the webhook.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Error body shared by every enrollment endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
        }
    }
}
