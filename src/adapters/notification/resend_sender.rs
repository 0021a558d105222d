//! Resend email adapter for purchase confirmations.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::ports::{NotificationError, NotificationSender, PurchaseConfirmation};

const RESEND_API_URL: &str = "https://api.resend.com";

/// Sends purchase confirmations through the Resend HTTP API.
pub struct ResendEmailSender {
    api_key: SecretString,
    from: String,
    dashboard_url: String,
    api_base_url: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct EmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

impl ResendEmailSender {
    /// `from` is a full header value, e.g. `Coaching <noreply@example.com>`.
    pub fn new(api_key: SecretString, from: impl Into<String>, dashboard_url: impl Into<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            dashboard_url: dashboard_url.into(),
            api_base_url: RESEND_API_URL.to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

pub(crate) fn purchase_subject(confirmation: &PurchaseConfirmation) -> String {
    format!("Course Enrolled: {}", confirmation.course_title)
}

pub(crate) fn purchase_html(confirmation: &PurchaseConfirmation, dashboard_url: &str) -> String {
    format!(
        r#"<div style="font-family: sans-serif; max-width: 560px; margin: 0 auto;">
  <h2>Enrollment confirmed</h2>
  <p>Hi {name},</p>
  <p>You are now enrolled in <strong>{course}</strong>.</p>
  <p>Amount paid: <strong>&#8377;{amount}</strong></p>
  <p><a href="{dashboard}" style="display: inline-block; padding: 10px 18px; background: #2563eb; color: #fff; text-decoration: none; border-radius: 6px;">Start learning</a></p>
  <p style="color: #6b7280; font-size: 12px;">If you did not make this purchase, reply to this email.</p>
</div>"#,
        name = escape_html(&confirmation.recipient_name),
        course = escape_html(&confirmation.course_title),
        amount = confirmation.amount,
        dashboard = escape_html(dashboard_url),
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[async_trait]
impl NotificationSender for ResendEmailSender {
    async fn send_purchase_confirmation(
        &self,
        confirmation: &PurchaseConfirmation,
    ) -> Result<(), NotificationError> {
        let body = EmailBody {
            from: &self.from,
            to: [confirmation.recipient_email.as_str()],
            subject: purchase_subject(confirmation),
            html: purchase_html(confirmation, &self.dashboard_url),
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.api_base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotificationError::Delivery(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_text = response.text().await.unwrap_or_default();
        if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
            Err(NotificationError::Rejected(format!("HTTP {}: {}", status.as_u16(), error_text)))
        } else {
            Err(NotificationError::Delivery(format!("HTTP {}: {}", status.as_u16(), error_text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;

    fn confirmation() -> PurchaseConfirmation {
        PurchaseConfirmation {
            recipient_name: "Asha <Admin>".to_string(),
            recipient_email: "asha@example.com".to_string(),
            course_title: "Modern History".to_string(),
            amount: Money::from_major(2999).unwrap(),
        }
    }

    #[test]
    fn subject_names_the_course() {
        assert_eq!(purchase_subject(&confirmation()), "Course Enrolled: Modern History");
    }

    #[test]
    fn html_includes_amount_and_dashboard_link() {
        let html = purchase_html(&confirmation(), "https://app.example.com/dashboard");
        assert!(html.contains("&#8377;2999"));
        assert!(html.contains("https://app.example.com/dashboard"));
        assert!(html.contains("Modern History"));
    }

    #[test]
    fn html_escapes_user_supplied_text() {
        let html = purchase_html(&confirmation(), "https://app.example.com");
        assert!(html.contains("Asha &lt;Admin&gt;"));
        assert!(!html.contains("<Admin>"));
    }
}
