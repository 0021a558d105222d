//! Wiring of ports into handlers and the HTTP router.
//!
//! The binary builds the ports from configuration (Postgres, Razorpay,
//! Resend); tests build them from the in-memory adapters. Both go through
//! [`build_router`].

use std::sync::Arc;

use axum::Router;
use secrecy::SecretString;

use crate::adapters::http::{app_router, AuthState, EnrollmentHandlers};
use crate::application::handlers::enrollment::{
    AccessGuard, CheckLectureAccessHandler, CreateOrderHandler, GrantAccessHandler,
    HandlePaymentWebhookHandler, ListMyEnrollmentsHandler, OrderSettings, RevokeAccessHandler,
    VerifyPaymentHandler,
};
use crate::domain::enrollment::{AccessRule, PaymentSignatures};
use crate::ports::{CourseCatalog, EnrollmentRepository, NotificationQueue, PaymentProvider};

/// Outbound dependencies of the enrollment handlers.
#[derive(Clone)]
pub struct EnrollmentPorts {
    pub catalog: Arc<dyn CourseCatalog>,
    pub repository: Arc<dyn EnrollmentRepository>,
    pub provider: Arc<dyn PaymentProvider>,
    pub notifications: Arc<dyn NotificationQueue>,
}

/// Secrets and policy the handlers are built with.
#[derive(Debug, Clone)]
pub struct EnrollmentSettings {
    pub order: OrderSettings,
    /// Signs browser checkout callbacks (the provider API secret).
    pub checkout_secret: SecretString,
    pub webhook_secret: SecretString,
    pub reactivate_revoked_on_payment: bool,
    pub access_rule: AccessRule,
}

/// Builds every enrollment handler over the same ports.
pub fn build_handlers(ports: &EnrollmentPorts, settings: EnrollmentSettings) -> EnrollmentHandlers {
    let signatures = PaymentSignatures::new(settings.checkout_secret, settings.webhook_secret);
    let guard = Arc::new(AccessGuard::new(
        ports.repository.clone(),
        settings.access_rule,
    ));

    EnrollmentHandlers::new(
        Arc::new(CreateOrderHandler::new(
            ports.catalog.clone(),
            ports.repository.clone(),
            ports.provider.clone(),
            settings.order,
        )),
        Arc::new(VerifyPaymentHandler::new(
            signatures.clone(),
            ports.catalog.clone(),
            ports.repository.clone(),
            ports.notifications.clone(),
            settings.reactivate_revoked_on_payment,
        )),
        Arc::new(HandlePaymentWebhookHandler::new(
            signatures,
            ports.repository.clone(),
            ports.notifications.clone(),
            settings.reactivate_revoked_on_payment,
        )),
        Arc::new(ListMyEnrollmentsHandler::new(
            ports.repository.clone(),
            ports.catalog.clone(),
        )),
        Arc::new(CheckLectureAccessHandler::new(ports.catalog.clone(), guard)),
        Arc::new(GrantAccessHandler::new(
            ports.catalog.clone(),
            ports.repository.clone(),
        )),
        Arc::new(RevokeAccessHandler::new(ports.repository.clone())),
    )
}

/// Builds the full router: `/api/...` behind bearer auth plus `/health`.
pub fn build_router(
    ports: &EnrollmentPorts,
    settings: EnrollmentSettings,
    auth: AuthState,
) -> Router {
    app_router(build_handlers(ports, settings), auth)
}
