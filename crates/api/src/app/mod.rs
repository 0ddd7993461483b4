//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services/`: store handles and the per-area operations
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: body/query extractors with JSON rejections

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use daybook_auth::{Hs256JwtValidator, JwtValidator};
use daybook_core::SystemClock;
use daybook_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod services;

use services::AppServices;

/// In-memory app with the wall clock and default CORS settings.
pub async fn build_app(jwt_secret: String) -> Router {
    let jwt = Arc::new(Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let services = Arc::new(AppServices::in_memory(Arc::new(SystemClock)));
    build_router(
        services,
        jwt,
        &[daybook_infra::config::DEFAULT_CORS_ORIGIN.to_string()],
    )
}

/// Services and router as configured by the environment.
pub async fn build_from_config(cfg: &AppConfig) -> anyhow::Result<(Router, Arc<AppServices>)> {
    let mut validator = Hs256JwtValidator::new(cfg.jwt_secret.as_bytes());
    if let Some(aud) = &cfg.jwt_audience {
        validator = validator.with_audience(aud);
    }
    if let Some(iss) = &cfg.jwt_issuer {
        validator = validator.with_issuer(iss);
    }

    let services = Arc::new(build_services(cfg).await?);
    let router = build_router(services.clone(), Arc::new(validator), &cfg.cors_origins);
    Ok((router, services))
}

#[cfg(feature = "postgres")]
async fn build_services(cfg: &AppConfig) -> anyhow::Result<AppServices> {
    let clock = Arc::new(SystemClock);
    match &cfg.database_url {
        Some(url) => {
            tracing::info!("using postgres document store");
            AppServices::postgres(url, clock).await
        }
        None => Ok(AppServices::in_memory(clock)),
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_services(cfg: &AppConfig) -> anyhow::Result<AppServices> {
    if cfg.database_url.is_some() {
        anyhow::bail!("DATABASE_URL is set but this build has no postgres support (enable the `postgres` feature)");
    }
    Ok(AppServices::in_memory(Arc::new(SystemClock)))
}

/// Assemble the router: public `/health`, everything else under `/api` behind auth.
pub fn build_router(services: Arc<AppServices>, jwt: Arc<dyn JwtValidator>, cors_origins: &[String]) -> Router {
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a bearer token; the owner comes from its subject.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
