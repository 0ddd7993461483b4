use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use daybook_core::HabitId;
use daybook_habits::HabitFilter;

use crate::app::extract::{ApiJson, ApiQuery};
use crate::app::{dto, errors, services::AppServices};
use crate::context::OwnerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_habits).post(create_habit))
        .route("/streaks/refresh", post(refresh_all_streaks))
        .route("/:id", get(get_habit).put(update_habit).delete(delete_habit))
        .route("/:id/stats", get(habit_stats))
        .route("/:id/checkin", post(check_in))
        .route("/:id/streak/refresh", post(refresh_streak))
}

pub async fn list_habits(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiQuery(query): ApiQuery<dto::HabitListQuery>,
) -> axum::response::Response {
    let filter = HabitFilter::from(query);
    match services.habits_list(owner.owner_id(), &filter).await {
        Ok(habits) => (StatusCode::OK, Json(habits)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_habit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiJson(body): ApiJson<dto::CreateHabitRequest>,
) -> axum::response::Response {
    match services.habits_create(owner.owner_id(), body.into()).await {
        Ok(habit) => (StatusCode::CREATED, Json(habit)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_habit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: HabitId = match errors::parse_id(&id, "habit") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.habits_get(owner.owner_id(), id).await {
        Ok(habit) => (StatusCode::OK, Json(habit)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_habit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateHabitRequest>,
) -> axum::response::Response {
    let id: HabitId = match errors::parse_id(&id, "habit") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.habits_update(owner.owner_id(), id, body.into()).await {
        Ok(habit) => (StatusCode::OK, Json(habit)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_habit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: HabitId = match errors::parse_id(&id, "habit") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.habits_delete(owner.owner_id(), id).await {
        Ok(_) => errors::deleted("Habit"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn habit_stats(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: HabitId = match errors::parse_id(&id, "habit") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.habits_stats(owner.owner_id(), id).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn check_in(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: HabitId = match errors::parse_id(&id, "habit") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.habits_check_in(owner.owner_id(), id).await {
        Ok(habit) => (StatusCode::OK, Json(habit)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn refresh_streak(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: HabitId = match errors::parse_id(&id, "habit") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.habits_refresh_streak(owner.owner_id(), id).await {
        Ok(habit) => (StatusCode::OK, Json(habit)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn refresh_all_streaks(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.habits_refresh_all_streaks(owner.owner_id()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
