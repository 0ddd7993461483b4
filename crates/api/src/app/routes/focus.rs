use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use daybook_core::FocusSessionId;
use daybook_focus::DEFAULT_STATS_DAYS;

use crate::app::extract::{ApiJson, ApiQuery};
use crate::app::{dto, errors, services::AppServices};
use crate::context::OwnerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_sessions).post(start_session))
        .route("/stats", get(focus_stats))
        .route("/:id/end", patch(end_session))
}

pub async fn list_sessions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiQuery(query): ApiQuery<dto::FocusListQuery>,
) -> axum::response::Response {
    match services
        .focus_list(owner.owner_id(), &query.filter(), query.limit)
        .await
    {
        Ok(sessions) => (StatusCode::OK, Json(sessions)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn start_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiJson(body): ApiJson<dto::StartFocusRequest>,
) -> axum::response::Response {
    match services.focus_start(owner.owner_id(), body.into()).await {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn end_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: FocusSessionId = match errors::parse_id(&id, "focus session") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.focus_end(owner.owner_id(), id).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn focus_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiQuery(query): ApiQuery<dto::FocusStatsQuery>,
) -> axum::response::Response {
    let days = query.days.unwrap_or(DEFAULT_STATS_DAYS);
    match services.focus_stats(owner.owner_id(), days, query.workspace).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
