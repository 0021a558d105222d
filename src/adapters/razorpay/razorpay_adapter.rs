//! Razorpay payment provider adapter.
//!
//! Implements `PaymentProvider` against the Razorpay Orders API. Only order
//! creation goes through this adapter; checkout and webhook signatures are
//! verified in the domain with the same key secret and webhook secret.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RazorpayConfig::new(key_id, key_secret).with_timeout(Duration::from_secs(10));
//! let adapter = RazorpayPaymentAdapter::new(config)?;
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::ports::{CreateOrderRequest, PaymentError, PaymentErrorCode, PaymentOrder, PaymentProvider};

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key id (`rzp_live_...` or `rzp_test_...`).
    key_id: String,

    /// API key secret. Also signs checkout confirmations.
    key_secret: SecretString,

    /// Base URL for the Razorpay API (default: https://api.razorpay.com).
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret,
            api_base_url: "https://api.razorpay.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Request body for `POST /v1/orders`.
#[derive(Debug, Serialize)]
struct OrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: &'a BTreeMap<String, String>,
}

/// Error envelope returned by the Razorpay API.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Razorpay payment provider adapter.
pub struct RazorpayPaymentAdapter {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayPaymentAdapter {
    pub fn new(config: RazorpayConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn map_send_error(&self, e: reqwest::Error) -> PaymentError {
        if e.is_timeout() {
            PaymentError::timeout(format!(
                "Razorpay did not respond within {}s",
                self.config.timeout.as_secs()
            ))
        } else {
            PaymentError::network(e.to_string())
        }
    }
}

/// Maps a non-success response to a payment error.
fn map_error_response(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let description = detail
        .as_ref()
        .and_then(|d| d.description.clone())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    let code = match status.as_u16() {
        401 => PaymentErrorCode::AuthenticationError,
        429 => PaymentErrorCode::RateLimitExceeded,
        400..=499 => PaymentErrorCode::InvalidRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    let error = PaymentError::new(code, format!("Razorpay API error: {}", description));
    match detail.and_then(|d| d.code) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

#[async_trait]
impl PaymentProvider for RazorpayPaymentAdapter {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<PaymentOrder, PaymentError> {
        let url = format!("{}/v1/orders", self.config.api_base_url);
        let body = OrderBody {
            amount: request.amount.minor_units(),
            currency: &request.currency,
            receipt: &request.receipt,
            notes: &request.notes,
        };

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), error = %error_text, "Razorpay create_order failed");
            return Err(map_error_response(status, &error_text));
        }

        let order: PaymentOrder = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Razorpay response: {}", e))
        })?;

        tracing::debug!(order_id = %order.id, amount = order.amount, "Razorpay order created");
        Ok(order)
    }
}
