use axum::{routing::get, Router};

pub mod analytics;
pub mod focus;
pub mod habits;
pub mod notes;
pub mod projects;
pub mod system;
pub mod tasks;
pub mod workspaces;

/// Router for all authenticated (owner-scoped) endpoints, mounted under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/habits", habits::router())
        .nest("/tasks", tasks::router())
        .nest("/projects", projects::router())
        .nest("/notes", notes::router())
        .nest("/workspaces", workspaces::router())
        .nest("/focus", focus::router())
        .nest("/analytics", analytics::router())
}
