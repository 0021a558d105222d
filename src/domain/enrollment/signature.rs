//! Payment signature verification.
//!
//! The payment provider signs two kinds of messages with HMAC-SHA256 and
//! hex-encodes the result:
//!
//! - checkout confirmations posted by the browser, over `"{order_id}|{payment_id}"`
//!   with the API key secret
//! - webhook deliveries, over the raw request body with the webhook secret
//!
//! Verification always runs over the exact bytes received. A mismatch is an
//! expected outcome and is reported as `false`, not as an error.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 signer/verifier bound to one shared secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: SecretString,
}

impl SignatureVerifier {
    /// Creates a verifier for the given shared secret.
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Computes the lowercase hex signature of `message`.
    pub fn sign(&self, message: &[u8]) -> String {
        hex::encode(self.digest(message))
    }

    /// Checks `claimed` (hex) against the signature of `message`.
    ///
    /// Malformed hex, wrong length, or an empty claim all return `false`.
    pub fn verify(&self, message: &[u8], claimed: &str) -> bool {
        let Ok(claimed) = hex::decode(claimed.trim()) else {
            return false;
        };
        constant_time_compare(&self.digest(message), &claimed)
    }

    fn digest(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

/// Message signed for a checkout confirmation.
pub fn checkout_message(order_id: &str, payment_id: &str) -> String {
    format!("{}|{}", order_id, payment_id)
}

/// The two verifiers, one per trust boundary.
#[derive(Debug, Clone)]
pub struct PaymentSignatures {
    checkout: SignatureVerifier,
    webhook: SignatureVerifier,
}

impl PaymentSignatures {
    pub fn new(checkout_secret: SecretString, webhook_secret: SecretString) -> Self {
        Self {
            checkout: SignatureVerifier::new(checkout_secret),
            webhook: SignatureVerifier::new(webhook_secret),
        }
    }

    /// Verifies a browser checkout confirmation.
    pub fn verify_checkout(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        self.checkout
            .verify(checkout_message(order_id, payment_id).as_bytes(), signature)
    }

    /// Verifies a webhook delivery over its raw body.
    pub fn verify_webhook(&self, raw_body: &[u8], signature: &str) -> bool {
        self.webhook.verify(raw_body, signature)
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CHECKOUT_SECRET: &str = "rzp_test_key_secret";
    const WEBHOOK_SECRET: &str = "whsec_enrollments";

    fn verifier(secret: &str) -> SignatureVerifier {
        SignatureVerifier::new(SecretString::new(secret.to_string()))
    }

    fn signatures() -> PaymentSignatures {
        PaymentSignatures::new(
            SecretString::new(CHECKOUT_SECRET.to_string()),
            SecretString::new(WEBHOOK_SECRET.to_string()),
        )
    }

    // ══════════════════════════════════════════════════════════════
    // Known vectors
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn sign_matches_rfc4231_test_case_2() {
        let v = verifier("Jefe");
        assert_eq!(
            v.sign(b"what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn checkout_message_joins_with_pipe() {
        assert_eq!(checkout_message("order_1", "pay_1"), "order_1|pay_1");
    }

    // ══════════════════════════════════════════════════════════════
    // Checkout confirmations
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn accepts_checkout_signature_from_key_secret() {
        let signature = verifier(CHECKOUT_SECRET).sign(b"order_1|pay_1");
        assert!(signatures().verify_checkout("order_1", "pay_1", &signature));
    }

    #[test]
    fn rejects_checkout_signature_from_webhook_secret() {
        let signature = verifier(WEBHOOK_SECRET).sign(b"order_1|pay_1");
        assert!(!signatures().verify_checkout("order_1", "pay_1", &signature));
    }

    #[test]
    fn rejects_checkout_signature_for_other_payment() {
        let signature = verifier(CHECKOUT_SECRET).sign(b"order_1|pay_1");
        assert!(!signatures().verify_checkout("order_1", "pay_2", &signature));
    }

    #[test]
    fn accepts_uppercase_hex() {
        let signature = verifier(CHECKOUT_SECRET).sign(b"order_1|pay_1").to_uppercase();
        assert!(signatures().verify_checkout("order_1", "pay_1", &signature));
    }

    // ══════════════════════════════════════════════════════════════
    // Webhook bodies
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn webhook_signature_covers_exact_bytes() {
        let body = br#"{"event":"payment.captured","payload":{}}"#;
        let reformatted = br#"{ "event": "payment.captured", "payload": {} }"#;
        let signature = verifier(WEBHOOK_SECRET).sign(body);

        assert!(signatures().verify_webhook(body, &signature));
        assert!(!signatures().verify_webhook(reformatted, &signature));
    }

    #[test]
    fn malformed_claims_are_rejected_without_error() {
        let body = b"{}";
        assert!(!signatures().verify_webhook(body, ""));
        assert!(!signatures().verify_webhook(body, "not-hex"));
        assert!(!signatures().verify_webhook(body, "abcd"));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let body = b"{\"event\":\"payment.captured\"}";
        let mut signature = verifier(WEBHOOK_SECRET).sign(body);
        let last = signature.pop().unwrap();
        signature.push(if last == '0' { '1' } else { '0' });
        assert!(!signatures().verify_webhook(body, &signature));
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", signatures());
        assert!(!rendered.contains(CHECKOUT_SECRET));
        assert!(!rendered.contains(WEBHOOK_SECRET));
    }

    proptest! {
        #[test]
        fn correct_signature_always_verifies(body in proptest::collection::vec(any::<u8>(), 0..256)) {
            let v = verifier(WEBHOOK_SECRET);
            let signature = v.sign(&body);
            prop_assert!(v.verify(&body, &signature));
        }

        #[test]
        fn other_secret_never_verifies(
            body in proptest::collection::vec(any::<u8>(), 0..256),
            secret in "[a-z0-9]{8,32}",
        ) {
            prop_assume!(secret != WEBHOOK_SECRET);
            let forged = verifier(&secret).sign(&body);
            prop_assert!(!verifier(WEBHOOK_SECRET).verify(&body, &forged));
        }

        #[test]
        fn altered_body_never_verifies(
            body in proptest::collection::vec(any::<u8>(), 1..256),
            index in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let v = verifier(WEBHOOK_SECRET);
            let signature = v.sign(&body);
            let mut altered = body.clone();
            let i = index.index(altered.len());
            altered[i] ^= flip;
            prop_assert!(!v.verify(&altered, &signature));
        }
    }
}
