//! HS256 JWT verification for tokens minted by the identity provider.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::ports::{AuthError, TokenClaims, TokenService};

/// Shared-secret settings agreed with the identity provider.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Expected `iss` claim; unchecked when `None`.
    pub issuer: Option<String>,
}

/// Wire form of the claims.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iss: Option<String>,
}

/// JWT-based token verifier.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    /// Sign a token the way the identity provider does. Used by tests and
    /// local tooling; the server itself never issues tokens.
    pub fn sign(&self, user_id: Uuid, email: &str, ttl: TimeDelta) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            email: token_data.claims.email,
            exp: token_data.claims.exp,
        })
    }
}

/// Stand-in used when no secret is configured: every token is refused.
pub struct DisabledTokenService;

impl TokenService for DisabledTokenService {
    fn validate_token(&self, _token: &str) -> Result<TokenClaims, AuthError> {
        Err(AuthError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, issuer: Option<&str>) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: secret.to_string(),
            issuer: issuer.map(str::to_string),
        })
    }

    #[test]
    fn test_validate_token_success() {
        let service = service("test-secret-key", Some("identity"));
        let user_id = Uuid::new_v4();

        let token = service
            .sign(user_id, "author@example.com", TimeDelta::hours(1))
            .unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "author@example.com");
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = service("test-secret-key", None).validate_token("invalid-token");
        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_validate_expired_token() {
        let service = service("test-secret-key", None);
        let token = service
            .sign(Uuid::new_v4(), "author@example.com", TimeDelta::hours(-2))
            .unwrap();

        assert!(matches!(
            service.validate_token(&token).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn test_validate_wrong_secret_or_issuer() {
        let signer = service("same-secret", Some("issuer1"));
        let token = signer
            .sign(Uuid::new_v4(), "author@example.com", TimeDelta::hours(1))
            .unwrap();

        assert!(service("other-secret", Some("issuer1")).validate_token(&token).is_err());
        assert!(service("same-secret", Some("issuer2")).validate_token(&token).is_err());
    }

    #[test]
    fn test_disabled_service_refuses_everything() {
        assert!(matches!(
            DisabledTokenService.validate_token("anything"),
            Err(AuthError::NotConfigured)
        ));
    }
}
