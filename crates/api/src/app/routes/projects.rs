use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use daybook_core::{ProjectId, TaskId};
use daybook_projects::ProjectFilter;

use crate::app::extract::{ApiJson, ApiQuery};
use crate::app::{dto, errors, services::AppServices};
use crate::context::OwnerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/:id", get(get_project).put(update_project).delete(delete_project))
        .route("/:id/tasks", post(add_task))
        .route("/:id/tasks/:task_id", delete(remove_task))
}

pub async fn list_projects(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiQuery(query): ApiQuery<dto::ProjectListQuery>,
) -> axum::response::Response {
    let filter = ProjectFilter::from(query);
    match services.projects_list(owner.owner_id(), &filter).await {
        Ok(items) => {
            let items = items
                .into_iter()
                .map(|(project, progress)| dto::ProjectSummary { project, progress })
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiJson(body): ApiJson<dto::CreateProjectRequest>,
) -> axum::response::Response {
    match services.projects_create(owner.owner_id(), body.into()).await {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProjectId = match errors::parse_id(&id, "project") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.projects_detail(owner.owner_id(), id).await {
        Ok((project, tasks, progress)) => (
            StatusCode::OK,
            Json(dto::ProjectDetail {
                project,
                tasks,
                progress,
            }),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateProjectRequest>,
) -> axum::response::Response {
    let id: ProjectId = match errors::parse_id(&id, "project") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.projects_update(owner.owner_id(), id, body.into()).await {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProjectId = match errors::parse_id(&id, "project") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.projects_delete(owner.owner_id(), id).await {
        Ok(_) => errors::deleted("Project"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn add_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::AttachTaskRequest>,
) -> axum::response::Response {
    let id: ProjectId = match errors::parse_id(&id, "project") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.projects_add_task(owner.owner_id(), id, body.task_id).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn remove_task(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path((id, task_id)): Path<(String, String)>,
) -> axum::response::Response {
    let id: ProjectId = match errors::parse_id(&id, "project") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let task_id: TaskId = match errors::parse_id(&task_id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.projects_remove_task(owner.owner_id(), id, task_id).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
