use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use daybook_core::NoteId;
use daybook_notes::NoteFilter;

use crate::app::extract::{ApiJson, ApiQuery};
use crate::app::{dto, errors, services::AppServices};
use crate::context::OwnerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/:id", delete(delete_note))
        .route("/:id/convert", post(convert_note))
}

pub async fn list_notes(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiQuery(query): ApiQuery<dto::NoteListQuery>,
) -> axum::response::Response {
    let filter = NoteFilter::from(query);
    match services.notes_list(owner.owner_id(), &filter).await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_note(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    ApiJson(body): ApiJson<dto::CreateNoteRequest>,
) -> axum::response::Response {
    match services.notes_create(owner.owner_id(), body.into()).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_note(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: NoteId = match errors::parse_id(&id, "note") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.notes_delete(owner.owner_id(), id).await {
        Ok(_) => errors::deleted("Note"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn convert_note(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: NoteId = match errors::parse_id(&id, "note") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.notes_convert(owner.owner_id(), id).await {
        Ok((task, note)) => (StatusCode::OK, Json(dto::ConvertedNote { task, note })).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
