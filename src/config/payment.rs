//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment configuration (Razorpay)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Public key id, also handed to the checkout widget
    pub razorpay_key_id: String,

    /// API secret; also signs checkout callbacks
    pub razorpay_key_secret: SecretString,

    /// Secret configured on the provider's webhook
    pub razorpay_webhook_secret: SecretString,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Upper bound on the order-creation call
    #[serde(default = "default_order_timeout")]
    pub order_timeout_secs: u64,

    /// Use the in-process mock provider instead of the REST API
    #[serde(default)]
    pub use_mock_provider: bool,
}

impl PaymentConfig {
    pub fn order_timeout(&self) -> Duration {
        Duration::from_secs(self.order_timeout_secs)
    }

    /// Check if using Razorpay test keys
    pub fn is_test_mode(&self) -> bool {
        self.razorpay_key_id.starts_with("rzp_test_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.razorpay_key_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__RAZORPAY_KEY_ID"));
        }
        if self.razorpay_key_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__RAZORPAY_KEY_SECRET"));
        }
        if self.razorpay_webhook_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired(
                "PAYMENT__RAZORPAY_WEBHOOK_SECRET",
            ));
        }
        if !self.razorpay_key_id.starts_with("rzp_") {
            return Err(ValidationError::InvalidRazorpayKeyId);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.order_timeout_secs == 0 || self.order_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            razorpay_key_id: String::new(),
            razorpay_key_secret: SecretString::new(String::new()),
            razorpay_webhook_secret: SecretString::new(String::new()),
            currency: default_currency(),
            api_base_url: default_api_base_url(),
            order_timeout_secs: default_order_timeout(),
            use_mock_provider: false,
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_api_base_url() -> String {
    "https://api.razorpay.com".to_string()
}

fn default_order_timeout() -> u64 {
    10
}
