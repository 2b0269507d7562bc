//! JWT access-token validation.
//!
//! Access tokens are HS256-signed JWTs whose `sub` claim is the user's UUID
//! at the identity provider.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims read from every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id at the identity provider.
    pub sub: Uuid,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Audience, when the provider sets one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Expected `aud` claim. When unset the audience is not checked.
    pub audience: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var        | Required | Default |
    /// |----------------|----------|---------|
    /// | `JWT_SECRET`   | **yes**  | --      |
    /// | `JWT_AUDIENCE` | no       | unset   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let audience = std::env::var("JWT_AUDIENCE")
            .ok()
            .filter(|a| !a.trim().is_empty());

        Self { secret, audience }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration; the audience only when configured.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    match &config.audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Issue an HS256 access token for `user_id`, valid for `expiry_mins`.
///
/// Production tokens come from the identity provider; this exists for local
/// tooling and tests.
pub fn generate_access_token(
    user_id: Uuid,
    expiry_mins: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + expiry_mins * 60,
        iat: now,
        aud: config.audience.clone(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            audience: None,
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = test_config();
        let user_id = Uuid::new_v4();
        let token =
            generate_access_token(user_id, 15, &config).expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Use a margin well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: now - 300,
            iat: now - 600,
            aud: None,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = test_config();
        let config_b = JwtConfig {
            secret: "another-secret".to_string(),
            audience: None,
        };

        let token = generate_access_token(Uuid::new_v4(), 15, &config_a).unwrap();

        assert!(validate_token(&token, &config_b).is_err());
    }

    #[test]
    fn test_audience_is_enforced_when_configured() {
        let issuer = JwtConfig {
            secret: "shared".to_string(),
            audience: Some("authenticated".to_string()),
        };
        let token = generate_access_token(Uuid::new_v4(), 15, &issuer).unwrap();
        assert!(validate_token(&token, &issuer).is_ok());

        let other = JwtConfig {
            secret: "shared".to_string(),
            audience: Some("service_role".to_string()),
        };
        assert!(validate_token(&token, &other).is_err());
    }
}
