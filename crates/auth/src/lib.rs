//! `daybook-auth`: bearer token authentication boundary.
//!
//! Decoupled from HTTP and storage: the API layer extracts the token, this
//! crate verifies it and yields the owner identity.

pub mod claims;
pub mod validator;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use validator::{Hs256JwtValidator, JwtValidator};
