//! Mock payment provider for testing.
//!
//! Provides a configurable implementation of `PaymentProvider` for unit and
//! integration tests. Supports:
//! - Deterministic order ids (`order_test_1`, `order_test_2`, ...)
//! - Error injection
//! - Artificial latency, for exercising the order timeout
//! - Request tracking

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{CreateOrderRequest, PaymentError, PaymentOrder, PaymentProvider};

/// Mock payment provider for testing.
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Orders created so far, in call order.
    requests: Vec<CreateOrderRequest>,

    /// Error to return on the next call.
    next_error: Option<PaymentError>,

    /// Delay before answering.
    latency: Option<Duration>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose next call fails with `error`.
    pub fn failing(error: PaymentError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    /// Create a mock that waits `latency` before answering.
    pub fn slow(latency: Duration) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().latency = Some(latency);
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the error to return on the next call.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    /// All order requests received.
    pub fn requests(&self) -> Vec<CreateOrderRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<PaymentOrder, PaymentError> {
        let latency = self.inner.lock().unwrap().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.inner.lock().unwrap();
        state.requests.push(request.clone());
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(PaymentOrder {
            id: format!("order_test_{}", state.requests.len()),
            amount: request.amount.minor_units(),
            currency: request.currency,
            receipt: Some(request.receipt),
            status: Some("created".to_string()),
        })
    }
}
