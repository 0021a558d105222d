//! Enrollment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | InvalidSignature | 400 |
//! | CourseNotPurchasable | 400 |
//! | Forbidden / AccessDenied | 403 |
//! | CourseNotFound / LectureNotFound / EnrollmentNotFound | 404 |
//! | AlreadyEnrolled / AccessRevoked | 409 |
//! | Upstream / UpstreamTimeout | 500 |
//! | Infrastructure | 500 |
//!
//! `message()` is safe to show to callers. Upstream and infrastructure detail
//! stays in the variant for logs only.

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, LectureId, UserId};

/// Enrollment workflow errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentError {
    CourseNotFound(CourseId),

    LectureNotFound(LectureId),

    EnrollmentNotFound {
        user_id: UserId,
        course_id: CourseId,
    },

    /// Course exists but cannot be bought (unpublished or free).
    CourseNotPurchasable {
        course_id: CourseId,
        reason: String,
    },

    /// An enrollment row already exists for this pair.
    AlreadyEnrolled {
        user_id: UserId,
        course_id: CourseId,
    },

    /// Payment confirmed for a revoked enrollment that stays revoked.
    AccessRevoked(CourseId),

    /// Caller may not view this lecture.
    AccessDenied(LectureId),

    /// Caller lacks the required role.
    Forbidden,

    /// Checkout signature did not verify.
    InvalidSignature,

    ValidationFailed {
        field: String,
        message: String,
    },

    /// Payment provider failed or rejected the call.
    Upstream(String),

    /// Payment provider did not answer in time.
    UpstreamTimeout,

    /// Storage or internal failure.
    Infrastructure(String),
}

impl EnrollmentError {
    pub fn course_not_found(course_id: CourseId) -> Self {
        EnrollmentError::CourseNotFound(course_id)
    }

    pub fn already_enrolled(user_id: UserId, course_id: CourseId) -> Self {
        EnrollmentError::AlreadyEnrolled { user_id, course_id }
    }

    pub fn not_purchasable(course_id: CourseId, reason: impl Into<String>) -> Self {
        EnrollmentError::CourseNotPurchasable {
            course_id,
            reason: reason.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EnrollmentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        EnrollmentError::Upstream(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EnrollmentError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EnrollmentError::CourseNotFound(_) => ErrorCode::CourseNotFound,
            EnrollmentError::LectureNotFound(_) => ErrorCode::LectureNotFound,
            EnrollmentError::EnrollmentNotFound { .. } => ErrorCode::EnrollmentNotFound,
            EnrollmentError::CourseNotPurchasable { .. } => ErrorCode::CourseNotPurchasable,
            EnrollmentError::AlreadyEnrolled { .. } => ErrorCode::AlreadyEnrolled,
            EnrollmentError::AccessRevoked(_) => ErrorCode::AccessRevoked,
            EnrollmentError::AccessDenied(_) => ErrorCode::AccessDenied,
            EnrollmentError::Forbidden => ErrorCode::Forbidden,
            EnrollmentError::InvalidSignature => ErrorCode::InvalidSignature,
            EnrollmentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            EnrollmentError::Upstream(_) => ErrorCode::UpstreamError,
            EnrollmentError::UpstreamTimeout => ErrorCode::UpstreamTimeout,
            EnrollmentError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a caller-safe error message.
    pub fn message(&self) -> String {
        match self {
            EnrollmentError::CourseNotFound(_) => "Course not found".to_string(),
            EnrollmentError::LectureNotFound(_) => "Lecture not found".to_string(),
            EnrollmentError::EnrollmentNotFound { .. } => {
                "No enrollment exists for this student and course".to_string()
            }
            EnrollmentError::CourseNotPurchasable { reason, .. } => {
                format!("Course cannot be purchased: {}", reason)
            }
            EnrollmentError::AlreadyEnrolled { .. } => {
                "Already enrolled in this course".to_string()
            }
            EnrollmentError::AccessRevoked(_) => {
                "Access to this course has been revoked. Please contact support.".to_string()
            }
            EnrollmentError::AccessDenied(_) => {
                "Please enroll in this course to access this lecture".to_string()
            }
            EnrollmentError::Forbidden => "Admin access required".to_string(),
            EnrollmentError::InvalidSignature => "Payment verification failed".to_string(),
            EnrollmentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            EnrollmentError::Upstream(_) => {
                "Payment provider is unavailable. Please try again.".to_string()
            }
            EnrollmentError::UpstreamTimeout => {
                "Payment provider timed out. Please try again.".to_string()
            }
            EnrollmentError::Infrastructure(_) => "An internal error occurred".to_string(),
        }
    }

    /// Returns true if the caller may safely retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EnrollmentError::Upstream(_)
                | EnrollmentError::UpstreamTimeout
                | EnrollmentError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for EnrollmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EnrollmentError {}

impl From<DomainError> for EnrollmentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => EnrollmentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => EnrollmentError::Infrastructure(err.to_string()),
        }
    }
}
