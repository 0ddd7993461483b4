use core::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use daybook_core::DomainError;
use daybook_infra::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "storage backend failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", "storage backend failure")
        }
        StoreError::Serialization(msg) => {
            tracing::error!(error = %msg, "stored document could not be (de)serialized");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "serialization_error",
                "stored document could not be read",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(_) => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a path identifier, answering 400 on malformed input.
pub fn parse_id<T: FromStr>(raw: &str, what: &'static str) -> Result<T, axum::response::Response> {
    raw.parse::<T>()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id")))
}

/// `{ "message": "<Entity> deleted successfully" }`
pub fn deleted(entity: &'static str) -> axum::response::Response {
    (
        StatusCode::OK,
        axum::Json(json!({ "message": format!("{entity} deleted successfully") })),
    )
        .into_response()
}
