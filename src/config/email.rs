//! Email configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key; empty disables purchase emails
    #[serde(default = "empty_secret")]
    pub resend_api_key: SecretString,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Linked from purchase confirmations
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Whether purchase emails are sent at all
    pub fn is_enabled(&self) -> bool {
        !self.resend_api_key.expose_secret().is_empty()
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.is_enabled() {
            return Ok(());
        }
        if !self.resend_api_key.expose_secret().starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: empty_secret(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            dashboard_url: default_dashboard_url(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_from_email() -> String {
    "noreply@coachinghub.in".to_string()
}

fn default_from_name() -> String {
    "Coaching Hub".to_string()
}

fn default_dashboard_url() -> String {
    "http://localhost:5173/dashboard".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> EmailConfig {
        EmailConfig {
            resend_api_key: SecretString::new(key.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_without_key() {
        let config = EmailConfig::default();
        assert!(!config.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_header() {
        let config = EmailConfig {
            from_email: "support@example.com".to_string(),
            from_name: "Support Team".to_string(),
            ..Default::default()
        };
        assert_eq!(config.from_header(), "Support Team <support@example.com>");
    }

    #[test]
    fn test_invalid_api_key_prefix() {
        assert_eq!(
            with_key("sk_xxx").validate(),
            Err(ValidationError::InvalidResendKey)
        );
    }

    #[test]
    fn test_invalid_from_email() {
        let config = EmailConfig {
            from_email: "invalid-email".to_string(),
            ..with_key("re_abcd1234")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidFromEmail));
    }

    #[test]
    fn test_valid_config() {
        let config = with_key("re_abcd1234");
        assert!(config.is_enabled());
        assert!(config.validate().is_ok());
    }
}
