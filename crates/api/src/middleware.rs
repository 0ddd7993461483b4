use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use daybook_auth::JwtValidator;

use crate::app::errors;
use crate::context::OwnerContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        return unauthorized("missing bearer token");
    };

    let owner_id = match state
        .jwt
        .validate(token, Utc::now())
        .and_then(|claims| claims.owner_id())
    {
        Ok(owner_id) => owner_id,
        Err(e) => {
            tracing::debug!(error = %e, "bearer token rejected");
            return unauthorized("invalid or expired token");
        }
    };

    req.extensions_mut().insert(OwnerContext::new(owner_id));

    next.run(req).await
}

fn unauthorized(message: &'static str) -> Response {
    errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
