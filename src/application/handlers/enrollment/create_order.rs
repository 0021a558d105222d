//! CreateOrderHandler - Command handler for starting a course purchase.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::catalog::Course;
use crate::domain::enrollment::{receipt_token, EnrollmentError, NOTE_COURSE_ID, NOTE_USER_ID};
use crate::domain::foundation::{CourseId, Timestamp, UserId};
use crate::ports::{
    CourseCatalog, CreateOrderRequest, EnrollmentRepository, PaymentOrder, PaymentProvider,
};

/// Command to create a provider order for a course.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Result of successful order creation.
#[derive(Debug, Clone)]
pub struct CreateOrderResult {
    pub order: PaymentOrder,
    /// Public key id the browser checkout needs.
    pub key_id: String,
    pub course: Course,
}

/// Provider-facing settings for order creation.
#[derive(Debug, Clone)]
pub struct OrderSettings {
    pub currency: String,
    pub key_id: String,
    pub timeout: Duration,
}

/// Handler for creating payment orders.
pub struct CreateOrderHandler {
    catalog: Arc<dyn CourseCatalog>,
    repository: Arc<dyn EnrollmentRepository>,
    provider: Arc<dyn PaymentProvider>,
    settings: OrderSettings,
}

impl CreateOrderHandler {
    pub fn new(
        catalog: Arc<dyn CourseCatalog>,
        repository: Arc<dyn EnrollmentRepository>,
        provider: Arc<dyn PaymentProvider>,
        settings: OrderSettings,
    ) -> Self {
        Self {
            catalog,
            repository,
            provider,
            settings,
        }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<CreateOrderResult, EnrollmentError> {
        // 1. Load the course; its price is what gets charged
        let course = self
            .catalog
            .get_course(&cmd.course_id)
            .await?
            .ok_or_else(|| EnrollmentError::course_not_found(cmd.course_id.clone()))?;

        if let Some(reason) = course.purchase_blocker() {
            return Err(EnrollmentError::not_purchasable(course.id.clone(), reason));
        }

        // 2. Any existing row, whatever its status, blocks a new purchase
        if self
            .repository
            .find(&cmd.user_id, &cmd.course_id)
            .await?
            .is_some()
        {
            return Err(EnrollmentError::already_enrolled(cmd.user_id, cmd.course_id));
        }

        // 3. Ask the provider for an order carrying (course, user) in its notes
        let mut notes = BTreeMap::new();
        notes.insert(NOTE_COURSE_ID.to_string(), cmd.course_id.to_string());
        notes.insert(NOTE_USER_ID.to_string(), cmd.user_id.to_string());

        let request = CreateOrderRequest {
            amount: course.price,
            currency: self.settings.currency.clone(),
            receipt: receipt_token(&cmd.course_id, &cmd.user_id, Timestamp::now()),
            notes,
        };

        let order = match tokio::time::timeout(
            self.settings.timeout,
            self.provider.create_order(request),
        )
        .await
        {
            Ok(Ok(order)) => order,
            Ok(Err(e)) if e.is_timeout() => {
                tracing::warn!(course_id = %cmd.course_id, error = %e, "Payment provider timed out");
                return Err(EnrollmentError::UpstreamTimeout);
            }
            Ok(Err(e)) => {
                tracing::error!(course_id = %cmd.course_id, error = %e, "Payment provider rejected order");
                return Err(EnrollmentError::upstream(e.to_string()));
            }
            Err(_) => {
                tracing::warn!(
                    course_id = %cmd.course_id,
                    timeout_secs = self.settings.timeout.as_secs(),
                    "Payment provider did not answer in time"
                );
                return Err(EnrollmentError::UpstreamTimeout);
            }
        };

        tracing::info!(
            order_id = %order.id,
            user_id = %cmd.user_id,
            course_id = %cmd.course_id,
            amount = order.amount,
            "Payment order created"
        );

        Ok(CreateOrderResult {
            order,
            key_id: self.settings.key_id.clone(),
            course,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCourseCatalog, InMemoryEnrollmentRepository};
    use crate::adapters::razorpay::MockPaymentProvider;
    use crate::domain::enrollment::{Enrollment, MAX_RECEIPT_LEN};
    use crate::domain::foundation::{EnrollmentId, ErrorCode, Money};
    use crate::ports::PaymentError;

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn user_id() -> UserId {
        UserId::new("user-123").unwrap()
    }

    fn course(id: &str, major: i64, published: bool) -> Course {
        Course {
            id: CourseId::new(id).unwrap(),
            title: "Polity Masterclass".to_string(),
            price: Money::from_major(major).unwrap(),
            is_published: published,
        }
    }

    fn settings(timeout: Duration) -> OrderSettings {
        OrderSettings {
            currency: "INR".to_string(),
            key_id: "rzp_test_key".to_string(),
            timeout,
        }
    }

    fn handler_with(
        repository: Arc<InMemoryEnrollmentRepository>,
        provider: MockPaymentProvider,
        timeout: Duration,
    ) -> CreateOrderHandler {
        let catalog = InMemoryCourseCatalog::new()
            .with_course(course("course-1", 2999, true))
            .with_course(course("draft", 2999, false))
            .with_course(course("free", 0, true));
        CreateOrderHandler::new(
            Arc::new(catalog),
            repository,
            Arc::new(provider),
            settings(timeout),
        )
    }

    fn cmd(course: &str) -> CreateOrderCommand {
        CreateOrderCommand {
            user_id: user_id(),
            course_id: CourseId::new(course).unwrap(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_order_for_course_price() {
        let provider = MockPaymentProvider::new();
        let handler = handler_with(
            Arc::new(InMemoryEnrollmentRepository::new()),
            provider.clone(),
            Duration::from_secs(10),
        );

        let result = handler.handle(cmd("course-1")).await.unwrap();

        assert_eq!(result.order.amount, 299_900);
        assert_eq!(result.key_id, "rzp_test_key");
        assert_eq!(result.course.id.as_str(), "course-1");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].currency, "INR");
        assert_eq!(requests[0].notes.get(NOTE_COURSE_ID).unwrap(), "course-1");
        assert_eq!(requests[0].notes.get(NOTE_USER_ID).unwrap(), "user-123");
        assert!(requests[0].receipt.starts_with("rcpt_course1_user123_"));
        assert!(requests[0].receipt.len() <= MAX_RECEIPT_LEN);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let handler = handler_with(
            Arc::new(InMemoryEnrollmentRepository::new()),
            MockPaymentProvider::new(),
            Duration::from_secs(10),
        );
        let err = handler.handle(cmd("missing")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::CourseNotFound);
    }

    #[tokio::test]
    async fn unpublished_and_free_courses_are_not_purchasable() {
        let provider = MockPaymentProvider::new();
        let handler = handler_with(
            Arc::new(InMemoryEnrollmentRepository::new()),
            provider.clone(),
            Duration::from_secs(10),
        );

        for id in ["draft", "free"] {
            let err = handler.handle(cmd(id)).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::CourseNotPurchasable);
        }
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn existing_enrollment_conflicts() {
        let existing = Enrollment::from_grant(
            EnrollmentId::new(),
            user_id(),
            CourseId::new("course-1").unwrap(),
            Timestamp::now(),
        );
        let provider = MockPaymentProvider::new();
        let handler = handler_with(
            Arc::new(InMemoryEnrollmentRepository::new().with_enrollment(existing)),
            provider.clone(),
            Duration::from_secs(10),
        );

        let err = handler.handle(cmd("course-1")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyEnrolled);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_upstream_error() {
        let handler = handler_with(
            Arc::new(InMemoryEnrollmentRepository::new()),
            MockPaymentProvider::failing(PaymentError::authentication("bad key")),
            Duration::from_secs(10),
        );
        let err = handler.handle(cmd("course-1")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::UpstreamError);
        assert!(!err.message().contains("bad key"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_times_out() {
        let handler = handler_with(
            Arc::new(InMemoryEnrollmentRepository::new()),
            MockPaymentProvider::slow(Duration::from_secs(30)),
            Duration::from_secs(10),
        );
        let err = handler.handle(cmd("course-1")).await.unwrap_err();
        assert_eq!(err, EnrollmentError::UpstreamTimeout);
    }
}
