use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use daybook_core::{
    DomainError, DomainResult, Entity, Layer, OwnerId, ProjectId, SubtaskId, TaskId, WorkspaceId,
    text,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl core::str::FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(DomainError::validation(
                "priority must be one of: low, medium, high",
            )),
        }
    }
}

impl core::str::FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(DomainError::validation(
                "status must be one of: todo, in-progress, completed",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    owner_id: OwnerId,
    title: String,
    description: String,
    priority: Priority,
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
    workspace: Option<WorkspaceId>,
    project: Option<ProjectId>,
    subtasks: Vec<Subtask>,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    layer: Layer,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub workspace: Option<WorkspaceId>,
    pub project: Option<ProjectId>,
    pub subtasks: Vec<String>,
    pub layer: Option<Layer>,
}

/// Patch for editable fields. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
    pub workspace: Option<Option<WorkspaceId>>,
    pub project: Option<Option<ProjectId>>,
    pub layer: Option<Layer>,
}

/// List filter. Date bounds apply to `due_date` and are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub workspace: Option<WorkspaceId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// Matches when the task carries any of these tags.
    pub tags: Vec<String>,
    pub due_from: Option<DateTime<Utc>>,
    pub due_to: Option<DateTime<Utc>>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.workspace.is_some() && task.workspace != self.workspace {
            return false;
        }
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if !self.tags.is_empty() && !task.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        if self.due_from.is_some() || self.due_to.is_some() {
            let Some(due) = task.due_date else {
                return false;
            };
            if self.due_from.is_some_and(|from| due < from) {
                return false;
            }
            if self.due_to.is_some_and(|to| due > to) {
                return false;
            }
        }
        true
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

impl Task {
    pub fn create(
        id: TaskId,
        owner_id: OwnerId,
        input: NewTask,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let title = text::required("title", &input.title)?;
        let subtasks = input
            .subtasks
            .iter()
            .map(|t| {
                Ok(Subtask {
                    id: SubtaskId::new(),
                    title: text::required("subtask title", t)?,
                    completed: false,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let mut task = Self {
            id,
            owner_id,
            title,
            description: text::optional(input.description.as_deref()),
            priority: input.priority.unwrap_or_default(),
            status: TaskStatus::Todo,
            due_date: input.due_date,
            tags: clean_tags(input.tags),
            workspace: input.workspace,
            project: input.project,
            subtasks,
            completed: false,
            completed_at: None,
            layer: input.layer.unwrap_or(Layer::Life),
            created_at: now,
            updated_at: now,
        };
        task.set_status(input.status.unwrap_or_default(), now);
        Ok(task)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn workspace(&self) -> Option<WorkspaceId> {
        self.workspace
    }

    pub fn project(&self) -> Option<ProjectId> {
        self.project
    }

    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Past due and still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => !self.completed && now > due,
            None => false,
        }
    }

    // `completed` mirrors `status == Completed`; every status write goes through here.
    fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        let completed = status == TaskStatus::Completed;
        if completed && !self.completed {
            self.completed_at = Some(now);
        } else if !completed {
            self.completed_at = None;
        }
        self.status = status;
        self.completed = completed;
    }

    pub fn apply_changes(&mut self, changes: TaskChanges, now: DateTime<Utc>) -> DomainResult<()> {
        let title = changes
            .title
            .as_deref()
            .map(|t| text::required("title", t))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description.trim().to_string();
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(status) = changes.status {
            self.set_status(status, now);
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(tags) = changes.tags {
            self.tags = clean_tags(tags);
        }
        if let Some(workspace) = changes.workspace {
            self.workspace = workspace;
        }
        if let Some(project) = changes.project {
            self.project = project;
        }
        if let Some(layer) = changes.layer {
            self.layer = layer;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Flip completion; reopening a task puts it back to `todo`.
    pub fn toggle_complete(&mut self, now: DateTime<Utc>) {
        let next = if self.completed {
            TaskStatus::Todo
        } else {
            TaskStatus::Completed
        };
        self.set_status(next, now);
        self.updated_at = now;
    }

    pub fn add_subtask(&mut self, title: &str, now: DateTime<Utc>) -> DomainResult<SubtaskId> {
        let title = text::required("subtask title", title)?;
        let id = SubtaskId::new();
        self.subtasks.push(Subtask {
            id,
            title,
            completed: false,
        });
        self.updated_at = now;
        Ok(id)
    }

    pub fn toggle_subtask(&mut self, subtask_id: SubtaskId, now: DateTime<Utc>) -> DomainResult<bool> {
        let subtask = self
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or(DomainError::not_found("subtask"))?;
        subtask.completed = !subtask.completed;
        let state = subtask.completed;
        self.updated_at = now;
        Ok(state)
    }

    pub fn assign_project(&mut self, project: Option<ProjectId>, now: DateTime<Utc>) {
        self.project = project;
        self.updated_at = now;
    }
}

impl Entity for Task {
    type Id = TaskId;
    const COLLECTION: &'static str = "tasks";
    const KIND: &'static str = "task";

    fn id(&self) -> TaskId {
        self.id
    }

    fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn task(input: NewTask) -> Task {
        Task::create(TaskId::new(), OwnerId::new("u").unwrap(), input, now()).unwrap()
    }

    fn titled(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            ..NewTask::default()
        }
    }

    #[test]
    fn create_trims_and_defaults() {
        let t = task(NewTask {
            title: "  Write report ".to_string(),
            tags: vec![" work ".to_string(), "  ".to_string()],
            subtasks: vec!["outline".to_string()],
            ..NewTask::default()
        });
        assert_eq!(t.title(), "Write report");
        assert_eq!(t.priority(), Priority::Medium);
        assert_eq!(t.status(), TaskStatus::Todo);
        assert_eq!(t.tags(), &["work".to_string()]);
        assert_eq!(t.subtasks().len(), 1);
        assert!(!t.is_completed());
        assert_eq!(t.layer(), Layer::Life);
    }

    #[test]
    fn create_with_completed_status_sets_completion_fields() {
        let t = task(NewTask {
            status: Some(TaskStatus::Completed),
            ..titled("done already")
        });
        assert!(t.is_completed());
        assert_eq!(t.completed_at(), Some(now()));
    }

    #[test]
    fn toggle_complete_round_trip() {
        let mut t = task(titled("a"));
        let later = now() + Duration::hours(1);

        t.toggle_complete(later);
        assert!(t.is_completed());
        assert_eq!(t.status(), TaskStatus::Completed);
        assert_eq!(t.completed_at(), Some(later));

        t.toggle_complete(later);
        assert!(!t.is_completed());
        assert_eq!(t.status(), TaskStatus::Todo);
        assert_eq!(t.completed_at(), None);
    }

    #[test]
    fn status_patch_keeps_completion_in_sync() {
        let mut t = task(titled("a"));
        t.apply_changes(
            TaskChanges {
                status: Some(TaskStatus::Completed),
                ..TaskChanges::default()
            },
            now(),
        )
        .unwrap();
        assert!(t.is_completed());

        t.apply_changes(
            TaskChanges {
                status: Some(TaskStatus::InProgress),
                ..TaskChanges::default()
            },
            now(),
        )
        .unwrap();
        assert!(!t.is_completed());
        assert_eq!(t.completed_at(), None);
    }

    #[test]
    fn subtasks_toggle_and_missing_is_not_found() {
        let mut t = task(titled("a"));
        let id = t.add_subtask("step", now()).unwrap();
        assert!(t.toggle_subtask(id, now()).unwrap());
        assert!(!t.toggle_subtask(id, now()).unwrap());

        let err = t.toggle_subtask(SubtaskId::new(), now()).unwrap_err();
        assert_eq!(err, DomainError::NotFound("subtask"));
    }

    #[test]
    fn overdue_only_when_open_and_past_due() {
        let mut t = task(NewTask {
            due_date: Some(now() - Duration::hours(1)),
            ..titled("a")
        });
        assert!(t.is_overdue(now()));
        t.toggle_complete(now());
        assert!(!t.is_overdue(now()));
        assert!(!task(titled("b")).is_overdue(now()));
    }

    #[test]
    fn filter_matches_any_tag_and_due_bounds() {
        let t = task(NewTask {
            tags: vec!["home".to_string(), "errand".to_string()],
            due_date: Some(now()),
            priority: Some(Priority::High),
            ..titled("a")
        });

        let any_tag = TaskFilter {
            tags: vec!["work".to_string(), "errand".to_string()],
            ..TaskFilter::default()
        };
        assert!(any_tag.matches(&t));

        let wrong_priority = TaskFilter {
            priority: Some(Priority::Low),
            ..TaskFilter::default()
        };
        assert!(!wrong_priority.matches(&t));

        let inclusive = TaskFilter {
            due_from: Some(now()),
            due_to: Some(now()),
            ..TaskFilter::default()
        };
        assert!(inclusive.matches(&t));

        let before = TaskFilter {
            due_to: Some(now() - Duration::seconds(1)),
            ..TaskFilter::default()
        };
        assert!(!before.matches(&t));
        assert!(!inclusive.matches(&task(titled("no due date"))));
    }

    proptest! {
        /// Property: any sequence of toggles and status patches keeps
        /// `completed`, `status` and `completed_at` consistent.
        #[test]
        fn completion_fields_stay_consistent(ops in prop::collection::vec(0u8..4, 0..30)) {
            let mut t = task(titled("p"));
            for op in ops {
                match op {
                    0 => t.toggle_complete(now()),
                    1 => { t.apply_changes(TaskChanges { status: Some(TaskStatus::Todo), ..TaskChanges::default() }, now()).unwrap(); }
                    2 => { t.apply_changes(TaskChanges { status: Some(TaskStatus::InProgress), ..TaskChanges::default() }, now()).unwrap(); }
                    _ => { t.apply_changes(TaskChanges { status: Some(TaskStatus::Completed), ..TaskChanges::default() }, now()).unwrap(); }
                }
                prop_assert_eq!(t.is_completed(), t.status() == TaskStatus::Completed);
                prop_assert_eq!(t.is_completed(), t.completed_at().is_some());
            }
        }
    }
}
