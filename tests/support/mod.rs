//! Shared fixture for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use coaching_enrollments::adapters::{
    InMemoryCourseCatalog, InMemoryEnrollmentRepository, MockPaymentProvider,
    MockSessionValidator, RecordingNotificationQueue,
};
use coaching_enrollments::app::{build_router, EnrollmentPorts, EnrollmentSettings};
use coaching_enrollments::application::handlers::enrollment::OrderSettings;
use coaching_enrollments::domain::catalog::{Course, Lecture};
use coaching_enrollments::domain::enrollment::{AccessRule, SignatureVerifier};
use coaching_enrollments::domain::foundation::{CourseId, LectureId, Money};

pub const KEY_ID: &str = "rzp_test_key";
pub const KEY_SECRET: &str = "rzp_test_key_secret";
pub const WEBHOOK_SECRET: &str = "whsec_enrollments";

pub const STUDENT: &str = "student-token";
pub const STUDENT_ID: &str = "user-1";
pub const ADMIN: &str = "admin-token";

pub const COURSE_ID: &str = "course-1";
pub const PAID_LECTURE: &str = "lecture-paid";
pub const FREE_LECTURE: &str = "lecture-free";

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryEnrollmentRepository>,
    pub notifications: Arc<RecordingNotificationQueue>,
    pub provider: MockPaymentProvider,
}

#[derive(Default)]
pub struct Options {
    pub reactivate_revoked_on_payment: bool,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        let catalog = InMemoryCourseCatalog::new()
            .with_course(Course {
                id: CourseId::new(COURSE_ID).unwrap(),
                title: "BPSC Prelims Complete Course".to_string(),
                price: Money::from_major(2999).unwrap(),
                is_published: true,
            })
            .with_lecture(Lecture {
                id: LectureId::new(PAID_LECTURE).unwrap(),
                course_id: CourseId::new(COURSE_ID).unwrap(),
                title: "Indian Polity".to_string(),
                is_free: false,
            })
            .with_lecture(Lecture {
                id: LectureId::new(FREE_LECTURE).unwrap(),
                course_id: CourseId::new(COURSE_ID).unwrap(),
                title: "Introduction".to_string(),
                is_free: true,
            });

        let repository = Arc::new(InMemoryEnrollmentRepository::new());
        let notifications = Arc::new(RecordingNotificationQueue::new());
        let provider = MockPaymentProvider::new();

        let ports = EnrollmentPorts {
            catalog: Arc::new(catalog),
            repository: repository.clone(),
            provider: Arc::new(provider.clone()),
            notifications: notifications.clone(),
        };
        let settings = EnrollmentSettings {
            order: OrderSettings {
                currency: "INR".to_string(),
                key_id: KEY_ID.to_string(),
                timeout: Duration::from_secs(5),
            },
            checkout_secret: SecretString::new(KEY_SECRET.to_string()),
            webhook_secret: SecretString::new(WEBHOOK_SECRET.to_string()),
            reactivate_revoked_on_payment: options.reactivate_revoked_on_payment,
            access_rule: AccessRule::RequireGrantingStatus,
        };
        let auth = Arc::new(
            MockSessionValidator::new()
                .with_student(STUDENT, STUDENT_ID)
                .with_admin(ADMIN, "admin-1"),
        );

        Self {
            router: build_router(&ports, settings, auth),
            repository,
            notifications,
            provider,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Posts a webhook body with the given signature header value.
    pub async fn webhook(&self, body: &[u8], signature: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/enrollments/webhook")
            .header("Content-Type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header("X-Razorpay-Signature", signature);
        }
        self.send(builder.body(Body::from(body.to_vec())).unwrap())
            .await
    }

    pub async fn signed_webhook(&self, body: &[u8]) -> (StatusCode, Value) {
        let signature = webhook_signature(body);
        self.webhook(body, Some(&signature)).await
    }

    pub async fn verify_payment(&self, order_id: &str, payment_id: &str) -> (StatusCode, Value) {
        let signature = checkout_signature(order_id, payment_id);
        self.post_json(
            "/api/enrollments/verify-payment",
            Some(STUDENT),
            serde_json::json!({
                "razorpay_order_id": order_id,
                "razorpay_payment_id": payment_id,
                "razorpay_signature": signature,
                "courseId": COURSE_ID,
            }),
        )
        .await
    }
}

pub fn checkout_signature(order_id: &str, payment_id: &str) -> String {
    SignatureVerifier::new(SecretString::new(KEY_SECRET.to_string()))
        .sign(format!("{}|{}", order_id, payment_id).as_bytes())
}

pub fn webhook_signature(body: &[u8]) -> String {
    SignatureVerifier::new(SecretString::new(WEBHOOK_SECRET.to_string())).sign(body)
}

/// A `payment.captured` event for the test student and course.
pub fn captured_event(order_id: &str, payment_id: &str, amount_minor: i64) -> Vec<u8> {
    serde_json::json!({
        "entity": "event",
        "account_id": "acc_test",
        "event": "payment.captured",
        "contains": ["payment"],
        "payload": {
            "payment": {
                "entity": {
                    "id": payment_id,
                    "entity": "payment",
                    "amount": amount_minor,
                    "currency": "INR",
                    "status": "captured",
                    "order_id": order_id,
                    "notes": { "courseId": COURSE_ID, "userId": STUDENT_ID }
                }
            }
        },
        "created_at": 1_700_000_000
    })
    .to_string()
    .into_bytes()
}
