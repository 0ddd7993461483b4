use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use daybook_core::{DomainResult, WorkspaceId, clock};
use daybook_tasks::Task;

pub const DEFAULT_TIMELINE_DAYS: i64 = 30;

/// Completed tasks over a trailing window, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub tasks: Vec<Task>,
    pub tasks_by_date: BTreeMap<NaiveDate, Vec<Task>>,
    pub total_completed: usize,
}

impl Timeline {
    pub fn build(
        tasks: impl IntoIterator<Item = Task>,
        now: DateTime<Utc>,
        days: i64,
        workspace: Option<WorkspaceId>,
    ) -> DomainResult<Self> {
        let since = clock::window_start(now, days)?;

        let mut done: Vec<Task> = tasks
            .into_iter()
            .filter(|t| workspace.is_none() || t.workspace() == workspace)
            .filter(|t| t.is_completed() && t.completed_at().is_some_and(|at| at >= since))
            .collect();
        done.sort_by(|a, b| b.completed_at().cmp(&a.completed_at()));

        let mut tasks_by_date: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
        for task in &done {
            if let Some(at) = task.completed_at() {
                tasks_by_date.entry(at.date_naive()).or_default().push(task.clone());
            }
        }

        Ok(Self {
            total_completed: done.len(),
            tasks: done,
            tasks_by_date,
        })
    }
}
