//! HTTP handlers for enrollment endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::{RequireAdmin, RequireAuth};
use crate::application::handlers::enrollment::{
    CheckLectureAccessHandler, CheckLectureAccessQuery, CreateOrderCommand, CreateOrderHandler,
    GrantAccessHandler, HandlePaymentWebhookCommand, HandlePaymentWebhookHandler,
    ListMyEnrollmentsHandler, ListMyEnrollmentsQuery, ManageAccessCommand, RevokeAccessHandler,
    VerifyPaymentCommand, VerifyPaymentHandler,
};
use crate::domain::enrollment::EnrollmentError;
use crate::domain::foundation::{CourseId, ErrorCode, LectureId, UserId};

use super::dto::{
    CreateOrderRequest, CreateOrderResponse, EnrollmentView, ErrorResponse, LectureAccessResponse,
    ManageAccessRequest, ManageAccessResponse, MyEnrollmentsResponse, SuccessResponse,
    VerifyPaymentRequest, VerifyPaymentResponse,
};

/// Header carrying the webhook HMAC.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Header name the provider uses by default.
pub const PROVIDER_SIGNATURE_HEADER: &str = "x-razorpay-signature";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct EnrollmentHandlers {
    create_order: Arc<CreateOrderHandler>,
    verify_payment: Arc<VerifyPaymentHandler>,
    webhook: Arc<HandlePaymentWebhookHandler>,
    list_mine: Arc<ListMyEnrollmentsHandler>,
    lecture_access: Arc<CheckLectureAccessHandler>,
    grant: Arc<GrantAccessHandler>,
    revoke: Arc<RevokeAccessHandler>,
}

impl EnrollmentHandlers {
    pub fn new(
        create_order: Arc<CreateOrderHandler>,
        verify_payment: Arc<VerifyPaymentHandler>,
        webhook: Arc<HandlePaymentWebhookHandler>,
        list_mine: Arc<ListMyEnrollmentsHandler>,
        lecture_access: Arc<CheckLectureAccessHandler>,
        grant: Arc<GrantAccessHandler>,
        revoke: Arc<RevokeAccessHandler>,
    ) -> Self {
        Self {
            create_order,
            verify_payment,
            webhook,
            list_mine,
            lecture_access,
            grant,
            revoke,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Student endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/enrollments/create-order - Start checkout for a course
pub async fn create_order(
    State(handlers): State<EnrollmentHandlers>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return handle_json_rejection(rejection),
    };
    let course_id = match parse_course_id(req.course_id) {
        Ok(id) => id,
        Err(e) => return handle_enrollment_error(e),
    };

    let cmd = CreateOrderCommand {
        user_id: user.id,
        course_id,
    };

    match handlers.create_order.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(CreateOrderResponse::from(result))).into_response(),
        Err(e) => handle_enrollment_error(e),
    }
}

/// POST /api/enrollments/verify-payment - Confirm a checkout from the browser
pub async fn verify_payment(
    State(handlers): State<EnrollmentHandlers>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return handle_json_rejection(rejection),
    };
    let course_id = match parse_course_id(req.course_id) {
        Ok(id) => id,
        Err(e) => return handle_enrollment_error(e),
    };

    let cmd = VerifyPaymentCommand {
        user_id: user.id,
        course_id,
        order_id: req.order_id,
        payment_id: req.payment_id,
        signature: req.signature,
    };

    match handlers.verify_payment.handle(cmd).await {
        Ok(result) => {
            let message = if result.newly_enrolled {
                "Payment verified and enrollment created"
            } else {
                "Payment already verified"
            };
            let response = VerifyPaymentResponse {
                success: true,
                message: message.to_string(),
                enrollment: EnrollmentView::from(&result.enrollment),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_enrollment_error(e),
    }
}

/// POST /api/enrollments/webhook - Provider payment events
///
/// Unauthenticated; the HMAC over the raw body is the only gate, so the body
/// is taken as bytes and never re-serialized before verification.
pub async fn payment_webhook(
    State(handlers): State<EnrollmentHandlers>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .or_else(|| headers.get(PROVIDER_SIGNATURE_HEADER))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match handlers.webhook.handle(cmd).await {
        Ok(_) => (StatusCode::OK, Json(SuccessResponse::ok())).into_response(),
        Err(err) => {
            let status = err.status_code();
            if status.is_success() {
                tracing::warn!(error = %err, "Webhook acknowledged without changes");
                return (StatusCode::OK, Json(SuccessResponse::ok())).into_response();
            }
            if status.is_server_error() {
                tracing::error!(error = %err, "Webhook processing failed");
            }
            (
                status,
                Json(ErrorResponse::new(err.code().to_string(), err.public_message())),
            )
                .into_response()
        }
    }
}

/// GET /api/enrollments/my - Current user's enrollments with progress
pub async fn my_enrollments(
    State(handlers): State<EnrollmentHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let query = ListMyEnrollmentsQuery { user_id: user.id };

    match handlers.list_mine.handle(query).await {
        Ok(summaries) => {
            (StatusCode::OK, Json(MyEnrollmentsResponse::from(summaries))).into_response()
        }
        Err(e) => handle_enrollment_error(e),
    }
}

/// GET /api/lectures/:lecture_id/access - Whether the caller may view a lecture
pub async fn lecture_access(
    State(handlers): State<EnrollmentHandlers>,
    RequireAuth(user): RequireAuth,
    Path(lecture_id): Path<String>,
) -> Response {
    let lecture_id = match LectureId::new(lecture_id) {
        Ok(id) => id,
        Err(e) => {
            return handle_enrollment_error(EnrollmentError::validation("lectureId", e.to_string()))
        }
    };

    let query = CheckLectureAccessQuery { user, lecture_id };

    match handlers.lecture_access.handle(query).await {
        Ok(access) => (StatusCode::OK, Json(LectureAccessResponse::from(access))).into_response(),
        Err(e) => handle_enrollment_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Admin endpoints
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/admin/enrollments/grant - Give access without payment
pub async fn grant_access(
    State(handlers): State<EnrollmentHandlers>,
    RequireAdmin(admin): RequireAdmin,
    body: Result<Json<ManageAccessRequest>, JsonRejection>,
) -> Response {
    let cmd = match manage_command(admin, body) {
        Ok(cmd) => cmd,
        Err(response) => return response,
    };

    match handlers.grant.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(ManageAccessResponse::from(result))).into_response(),
        Err(e) => handle_enrollment_error(e),
    }
}

/// POST /api/admin/enrollments/revoke - Withdraw access
pub async fn revoke_access(
    State(handlers): State<EnrollmentHandlers>,
    RequireAdmin(admin): RequireAdmin,
    body: Result<Json<ManageAccessRequest>, JsonRejection>,
) -> Response {
    let cmd = match manage_command(admin, body) {
        Ok(cmd) => cmd,
        Err(response) => return response,
    };

    match handlers.revoke.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(ManageAccessResponse::from(result))).into_response(),
        Err(e) => handle_enrollment_error(e),
    }
}

fn manage_command(
    actor: crate::domain::foundation::AuthenticatedUser,
    body: Result<Json<ManageAccessRequest>, JsonRejection>,
) -> Result<ManageAccessCommand, Response> {
    let Json(req) = body.map_err(handle_json_rejection)?;
    let user_id = UserId::new(req.user_id)
        .map_err(|e| handle_enrollment_error(EnrollmentError::validation("userId", e.to_string())))?;
    let course_id = parse_course_id(req.course_id).map_err(handle_enrollment_error)?;

    Ok(ManageAccessCommand {
        actor,
        user_id,
        course_id,
    })
}

fn parse_course_id(raw: String) -> Result<CourseId, EnrollmentError> {
    CourseId::new(raw).map_err(|e| EnrollmentError::validation("courseId", e.to_string()))
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

/// Status for an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed
        | ErrorCode::InvalidStateTransition
        | ErrorCode::InvalidSignature
        | ErrorCode::CourseNotPurchasable => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden | ErrorCode::AccessDenied => StatusCode::FORBIDDEN,
        ErrorCode::CourseNotFound | ErrorCode::LectureNotFound | ErrorCode::EnrollmentNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::AlreadyEnrolled | ErrorCode::AccessRevoked => StatusCode::CONFLICT,
        ErrorCode::UpstreamError
        | ErrorCode::UpstreamTimeout
        | ErrorCode::DatabaseError
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn handle_enrollment_error(error: EnrollmentError) -> Response {
    let code = error.code();
    let status = status_for(code);

    match &error {
        EnrollmentError::Upstream(detail) | EnrollmentError::Infrastructure(detail) => {
            tracing::error!(code = %code, detail = %detail, "Enrollment request failed");
        }
        EnrollmentError::UpstreamTimeout => {
            tracing::error!(code = %code, "Payment provider timed out");
        }
        _ => {}
    }

    (status, Json(ErrorResponse::new(code.to_string(), error.message()))).into_response()
}

fn handle_json_rejection(rejection: JsonRejection) -> Response {
    handle_enrollment_error(EnrollmentError::validation("body", rejection.body_text()))
}
