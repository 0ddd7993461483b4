use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use daybook_core::{SubtaskId, TaskId};
use daybook_tasks::{Task, TaskFilter};

use crate::app::extract::{ApiJson, ApiQuery};
use crate::app::{dto, errors, services::AppServices};
use crate::context::OwnerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/today", get(today))
        .route("/upcoming", get(upcoming))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/:id/toggle", patch(toggle_task))
        .route("/:id/subtasks", post(add_subtask))
        .route("/:id/subtasks/:subtask_id/toggle", patch(toggle_subtask))
}

fn views(services: &AppServices, tasks: Vec<Task>) -> Vec<dto::TaskView> {
    let now = services.clock().now();
    tasks.into_iter().map(|t| dto::TaskView::new(t, now)).collect()
}

fn view(services: &AppServices, task: Task) -> dto::TaskView {
    dto::TaskView::new(task, services.clock().now())
}

pub async fn list_tasks(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiQuery(query): ApiQuery<dto::TaskListQuery>,
) -> axum::response::Response {
    let filter = TaskFilter::from(query);
    match services.tasks_list(owner.owner_id(), &filter).await {
        Ok(tasks) => (StatusCode::OK, Json(views(&services, tasks))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiJson(body): ApiJson<dto::CreateTaskRequest>,
) -> axum::response::Response {
    match services.tasks_create(owner.owner_id(), body.into()).await {
        Ok(task) => (StatusCode::CREATED, Json(view(&services, task))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn today(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.tasks_today(owner.owner_id()).await {
        Ok(tasks) => (StatusCode::OK, Json(views(&services, tasks))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn upcoming(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.tasks_upcoming(owner.owner_id()).await {
        Ok(tasks) => (StatusCode::OK, Json(views(&services, tasks))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TaskId = match errors::parse_id(&id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.tasks_get(owner.owner_id(), id).await {
        Ok(task) => (StatusCode::OK, Json(view(&services, task))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateTaskRequest>,
) -> axum::response::Response {
    let id: TaskId = match errors::parse_id(&id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.tasks_update(owner.owner_id(), id, body.into()).await {
        Ok(task) => (StatusCode::OK, Json(view(&services, task))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TaskId = match errors::parse_id(&id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.tasks_delete(owner.owner_id(), id).await {
        Ok(_) => errors::deleted("Task"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn toggle_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: TaskId = match errors::parse_id(&id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.tasks_toggle(owner.owner_id(), id).await {
        Ok(task) => (StatusCode::OK, Json(view(&services, task))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn add_subtask(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::AddSubtaskRequest>,
) -> axum::response::Response {
    let id: TaskId = match errors::parse_id(&id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.tasks_add_subtask(owner.owner_id(), id, &body.title).await {
        Ok(task) => (StatusCode::OK, Json(view(&services, task))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn toggle_subtask(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path((id, subtask_id)): Path<(String, String)>,
) -> axum::response::Response {
    let id: TaskId = match errors::parse_id(&id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let subtask_id: SubtaskId = match errors::parse_id(&subtask_id, "subtask") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.tasks_toggle_subtask(owner.owner_id(), id, subtask_id).await {
        Ok(task) => (StatusCode::OK, Json(view(&services, task))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
