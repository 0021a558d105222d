//! HS256 bearer token validation.
//!
//! Tokens are issued by the platform's auth service with a shared secret.
//! Claims: `{ id, email, name?, role, exp, iss? }`.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId, UserRole};
use crate::ports::SessionValidator;

/// JWT validator configuration.
#[derive(Clone)]
pub struct JwtConfig {
    secret: SecretString,
    issuer: Option<String>,
    leeway_secs: u64,
}

impl JwtConfig {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            issuer: None,
            leeway_secs: 30,
        }
    }

    /// Require the `iss` claim to match.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Clock skew tolerated on `exp`.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

/// Claims carried by platform access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Validates HS256 access tokens.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;
        let claims = data.claims;

        let user_id = UserId::new(&claims.id).map_err(|_| {
            tracing::warn!("Token carries an empty user id");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, claims.email, claims.name, claims.role))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-jwt-secret";

    fn claims(exp_offset: i64, role: UserRole) -> AccessClaims {
        AccessClaims {
            id: "user-123".to_string(),
            email: "student@example.com".to_string(),
            name: Some("Ravi".to_string()),
            role,
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iss: None,
        }
    }

    fn token(claims: &AccessClaims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(JwtConfig::new(SecretString::new(SECRET.to_string())).with_leeway(0))
    }

    #[tokio::test]
    async fn valid_token_yields_user() {
        let user = validator()
            .validate(&token(&claims(3600, UserRole::Admin), SECRET))
            .await
            .unwrap();

        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.email, "student@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Ravi"));
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let err = validator()
            .validate(&token(&claims(3600, UserRole::Student), "other-secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_reported() {
        let err = validator()
            .validate(&token(&claims(-3600, UserRole::Student), SECRET))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        let err = validator().validate("not.a.jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn issuer_is_enforced_when_configured() {
        let validator = JwtSessionValidator::new(
            JwtConfig::new(SecretString::new(SECRET.to_string())).with_issuer("coaching-auth"),
        );
        let mut c = claims(3600, UserRole::Student);
        c.iss = Some("someone-else".to_string());

        let err = validator.validate(&token(&c, SECRET)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));

        c.iss = Some("coaching-auth".to_string());
        assert!(validator.validate(&token(&c, SECRET)).await.is_ok());
    }

    #[tokio::test]
    async fn missing_role_defaults_to_student() {
        let json = serde_json::json!({
            "id": "user-9",
            "email": "x@example.com",
            "exp": chrono::Utc::now().timestamp() + 600,
        });
        let raw = encode(
            &Header::new(Algorithm::HS256),
            &json,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let user = validator().validate(&raw).await.unwrap();
        assert_eq!(user.role, UserRole::Student);
    }
}
