use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

/// Verifies a raw bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;
}

/// HMAC-SHA256 shared-secret validator.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by `validate_claims` against the caller's clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }

    /// Require the `aud` claim to contain `audience`.
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }

    /// Require the `iss` claim to equal `issuer`.
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }
}

impl std::fmt::Debug for Hs256JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hs256JwtValidator")
            .field("aud", &self.validation.aud)
            .field("iss", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejecting bearer token");
            match e.kind() {
                ErrorKind::InvalidSignature => TokenValidationError::InvalidSignature,
                ErrorKind::InvalidAudience => TokenValidationError::InvalidAudience,
                ErrorKind::InvalidIssuer => TokenValidationError::InvalidIssuer,
                _ => TokenValidationError::Malformed(e.to_string()),
            }
        })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
