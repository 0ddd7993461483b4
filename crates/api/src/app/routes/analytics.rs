use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use daybook_analytics::DEFAULT_TIMELINE_DAYS;

use crate::app::extract::ApiQuery;
use crate::app::{dto, errors, services::AppServices};
use crate::context::OwnerContext;

pub fn router() -> Router {
    Router::new()
        .route("/timeline", get(timeline))
        .route("/achievements", get(achievements))
        .route("/stats", get(stats))
}

pub async fn timeline(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiQuery(query): ApiQuery<dto::TimelineQuery>,
) -> axum::response::Response {
    let days = query.days.unwrap_or(DEFAULT_TIMELINE_DAYS);
    match services.analytics_timeline(owner.owner_id(), days, query.workspace).await {
        Ok(timeline) => (StatusCode::OK, Json(timeline)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn achievements(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.analytics_achievements(owner.owner_id()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiQuery(query): ApiQuery<dto::WorkspaceQuery>,
) -> axum::response::Response {
    match services.analytics_dashboard(owner.owner_id(), query.workspace).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
