//! Razorpay payment provider adapter.
//!
//! - `RazorpayPaymentAdapter` - Orders API client
//! - `MockPaymentProvider` - Configurable provider for tests and local runs

mod mock_payment_provider;
mod razorpay_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use razorpay_adapter::{RazorpayConfig, RazorpayPaymentAdapter};
