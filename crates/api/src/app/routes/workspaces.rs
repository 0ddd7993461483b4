use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use daybook_core::WorkspaceId;

use crate::app::extract::ApiJson;
use crate::app::{dto, errors, services::AppServices};
use crate::context::OwnerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_workspaces).post(create_workspace))
        .route("/:id", get(get_workspace).put(update_workspace).delete(delete_workspace))
        .route("/:id/default", patch(set_default))
}

pub async fn list_workspaces(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.workspaces_list(owner.owner_id()).await {
        Ok(workspaces) => (StatusCode::OK, Json(workspaces)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_workspace(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiJson(body): ApiJson<dto::CreateWorkspaceRequest>,
) -> axum::response::Response {
    match services.workspaces_create(owner.owner_id(), body.into()).await {
        Ok(workspace) => (StatusCode::CREATED, Json(workspace)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_workspace(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: WorkspaceId = match errors::parse_id(&id, "workspace") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.workspaces_get(owner.owner_id(), id).await {
        Ok(workspace) => (StatusCode::OK, Json(workspace)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_workspace(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateWorkspaceRequest>,
) -> axum::response::Response {
    let id: WorkspaceId = match errors::parse_id(&id, "workspace") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.workspaces_update(owner.owner_id(), id, body.into()).await {
        Ok(workspace) => (StatusCode::OK, Json(workspace)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_workspace(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: WorkspaceId = match errors::parse_id(&id, "workspace") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.workspaces_delete(owner.owner_id(), id).await {
        Ok(_) => errors::deleted("Workspace"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn set_default(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: WorkspaceId = match errors::parse_id(&id, "workspace") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.workspaces_set_default(owner.owner_id(), id).await {
        Ok(workspace) => (StatusCode::OK, Json(workspace)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
