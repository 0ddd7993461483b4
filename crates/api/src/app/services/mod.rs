//! Application services: one store per collection plus the clock.
//!
//! Handlers call into the per-area `impl AppServices` blocks below; those
//! blocks own all read-modify-write sequencing so handlers stay thin.

use std::sync::Arc;

use daybook_core::{Clock, DomainError, Entity};
use daybook_focus::FocusSession;
use daybook_habits::Habit;
use daybook_infra::{DocumentStore, InMemoryDocumentStore, StoreResult};
use daybook_notes::Note;
use daybook_projects::Project;
use daybook_tasks::Task;
use daybook_workspaces::Workspace;

#[cfg(feature = "postgres")]
use daybook_infra::PostgresDocumentStore;

mod analytics;
mod focus;
mod habits;
mod notes;
mod projects;
mod tasks;
mod workspaces;

pub use habits::StreakRefresh;

#[derive(Clone)]
pub struct AppServices {
    habits: Arc<dyn DocumentStore<Habit>>,
    tasks: Arc<dyn DocumentStore<Task>>,
    projects: Arc<dyn DocumentStore<Project>>,
    notes: Arc<dyn DocumentStore<Note>>,
    workspaces: Arc<dyn DocumentStore<Workspace>>,
    focus: Arc<dyn DocumentStore<FocusSession>>,
    clock: Arc<dyn Clock>,
}

impl AppServices {
    /// Process-local storage; everything is lost on restart.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            habits: Arc::new(InMemoryDocumentStore::<Habit>::new()),
            tasks: Arc::new(InMemoryDocumentStore::<Task>::new()),
            projects: Arc::new(InMemoryDocumentStore::<Project>::new()),
            notes: Arc::new(InMemoryDocumentStore::<Note>::new()),
            workspaces: Arc::new(InMemoryDocumentStore::<Workspace>::new()),
            focus: Arc::new(InMemoryDocumentStore::<FocusSession>::new()),
            clock,
        }
    }

    /// Connect to Postgres and make sure the schema exists.
    #[cfg(feature = "postgres")]
    pub async fn postgres(database_url: &str, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        daybook_infra::store::postgres::migrate(&pool).await?;

        Ok(Self {
            habits: Arc::new(PostgresDocumentStore::<Habit>::new(pool.clone())),
            tasks: Arc::new(PostgresDocumentStore::<Task>::new(pool.clone())),
            projects: Arc::new(PostgresDocumentStore::<Project>::new(pool.clone())),
            notes: Arc::new(PostgresDocumentStore::<Note>::new(pool.clone())),
            workspaces: Arc::new(PostgresDocumentStore::<Workspace>::new(pool.clone())),
            focus: Arc::new(PostgresDocumentStore::<FocusSession>::new(pool)),
            clock,
        })
    }

    /// Habit store handle, shared with the background streak sweeper.
    pub fn habit_store(&self) -> Arc<dyn DocumentStore<Habit>> {
        self.habits.clone()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }
}

/// Turn a missing document into a not-found error.
fn found<V: Entity>(doc: Option<V>) -> StoreResult<V> {
    doc.ok_or_else(|| DomainError::not_found(V::KIND).into())
}
