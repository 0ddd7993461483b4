use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use daybook_core::OwnerId;

/// Tolerated clock skew between the token issuer and this service.
pub const ISSUED_AT_LEEWAY_SECS: i64 = 60;

/// JWT claims model.
///
/// Timestamps are seconds since the Unix epoch, as in RFC 7519.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the owner of every document the request touches.
    pub sub: String,

    pub exp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl JwtClaims {
    pub fn owner_id(&self) -> Result<OwnerId, TokenValidationError> {
        OwnerId::new(self.sub.as_str()).map_err(|_| TokenValidationError::MissingSubject)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token has no subject")]
    MissingSubject,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token audience is not accepted")]
    InvalidAudience,

    #[error("token issuer is not accepted")]
    InvalidIssuer,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Deterministically validate decoded claims against `now`.
///
/// Signature, audience and issuer checks happen while decoding; this covers
/// the subject and the time window.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.sub.trim().is_empty() {
        return Err(TokenValidationError::MissingSubject);
    }

    let now = now.timestamp();
    if let Some(iat) = claims.iat {
        if claims.exp <= iat {
            return Err(TokenValidationError::InvalidTimeWindow);
        }
        if now + ISSUED_AT_LEEWAY_SECS < iat {
            return Err(TokenValidationError::NotYetValid);
        }
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
