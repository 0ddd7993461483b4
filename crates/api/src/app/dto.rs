use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use daybook_core::{Layer, TaskId, WorkspaceId};
use daybook_focus::{FocusFilter, NewFocusSession};
use daybook_habits::{Frequency, HabitChanges, HabitFilter, NewHabit};
use daybook_notes::{NewNote, Note, NoteFilter, NoteKind};
use daybook_projects::{MilestoneInput, NewProject, Project, ProjectChanges, ProjectFilter, ProjectProgress, ProjectStatus};
use daybook_tasks::{NewTask, Priority, Task, TaskChanges, TaskFilter, TaskStatus};
use daybook_workspaces::{NewWorkspace, WorkspaceChanges};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

// -------------------------
// Habits
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub color: Option<String>,
    pub active: Option<bool>,
    pub workspace: Option<WorkspaceId>,
    pub layer: Option<Layer>,
}

impl From<CreateHabitRequest> for NewHabit {
    fn from(r: CreateHabitRequest) -> Self {
        NewHabit {
            name: r.name,
            description: r.description,
            frequency: r.frequency,
            color: r.color,
            active: r.active,
            workspace: r.workspace,
            layer: r.layer,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub color: Option<String>,
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub workspace: Option<Option<WorkspaceId>>,
    pub layer: Option<Layer>,
}

impl From<UpdateHabitRequest> for HabitChanges {
    fn from(r: UpdateHabitRequest) -> Self {
        HabitChanges {
            name: r.name,
            description: r.description,
            frequency: r.frequency,
            color: r.color,
            active: r.active,
            workspace: r.workspace,
            layer: r.layer,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HabitListQuery {
    pub workspace: Option<WorkspaceId>,
    pub active: Option<bool>,
}

impl From<HabitListQuery> for HabitFilter {
    fn from(q: HabitListQuery) -> Self {
        HabitFilter {
            workspace: q.workspace,
            active: q.active,
        }
    }
}

// -------------------------
// Tasks
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SubtaskRequest {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub workspace: Option<WorkspaceId>,
    pub project: Option<daybook_core::ProjectId>,
    #[serde(default)]
    pub subtasks: Vec<SubtaskRequest>,
    pub layer: Option<Layer>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(r: CreateTaskRequest) -> Self {
        NewTask {
            title: r.title,
            description: r.description,
            priority: r.priority,
            status: r.status,
            due_date: r.due_date,
            tags: r.tags,
            workspace: r.workspace,
            project: r.project,
            subtasks: r.subtasks.into_iter().map(|s| s.title).collect(),
            layer: r.layer,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub workspace: Option<Option<WorkspaceId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub project: Option<Option<daybook_core::ProjectId>>,
    pub layer: Option<Layer>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(r: UpdateTaskRequest) -> Self {
        TaskChanges {
            title: r.title,
            description: r.description,
            priority: r.priority,
            status: r.status,
            due_date: r.due_date,
            tags: r.tags,
            workspace: r.workspace,
            project: r.project,
            layer: r.layer,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub workspace: Option<WorkspaceId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// Comma separated; a task matches when it carries any of them.
    pub tags: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<TaskListQuery> for TaskFilter {
    fn from(q: TaskListQuery) -> Self {
        TaskFilter {
            workspace: q.workspace,
            status: q.status,
            priority: q.priority,
            tags: q
                .tags
                .map(|raw| {
                    raw.split(',')
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            due_from: q.start_date,
            due_to: q.end_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddSubtaskRequest {
    #[serde(default)]
    pub title: String,
}

/// Task with its derived overdue flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub is_overdue: bool,
}

impl TaskView {
    pub fn new(task: Task, now: DateTime<Utc>) -> Self {
        let is_overdue = task.is_overdue(now);
        Self { task, is_overdue }
    }
}

// -------------------------
// Projects
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<MilestoneRequest> for MilestoneInput {
    fn from(r: MilestoneRequest) -> Self {
        MilestoneInput {
            title: r.title,
            completed: r.completed,
            due_date: r.due_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub color: Option<String>,
    #[serde(default)]
    pub milestones: Vec<MilestoneRequest>,
    pub workspace: Option<WorkspaceId>,
}

impl From<CreateProjectRequest> for NewProject {
    fn from(r: CreateProjectRequest) -> Self {
        NewProject {
            name: r.name,
            description: r.description,
            status: r.status,
            color: r.color,
            milestones: r.milestones.into_iter().map(Into::into).collect(),
            workspace: r.workspace,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub color: Option<String>,
    pub milestones: Option<Vec<MilestoneRequest>>,
    #[serde(default, deserialize_with = "double_option")]
    pub workspace: Option<Option<WorkspaceId>>,
}

impl From<UpdateProjectRequest> for ProjectChanges {
    fn from(r: UpdateProjectRequest) -> Self {
        ProjectChanges {
            name: r.name,
            description: r.description,
            status: r.status,
            color: r.color,
            milestones: r.milestones.map(|ms| ms.into_iter().map(Into::into).collect()),
            workspace: r.workspace,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectListQuery {
    pub workspace: Option<WorkspaceId>,
    pub status: Option<ProjectStatus>,
}

impl From<ProjectListQuery> for ProjectFilter {
    fn from(q: ProjectListQuery) -> Self {
        ProjectFilter {
            workspace: q.workspace,
            status: q.status,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachTaskRequest {
    pub task_id: TaskId,
}

#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    #[serde(flatten)]
    pub progress: ProjectProgress,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub progress: ProjectProgress,
}

// -------------------------
// Notes
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: Option<NoteKind>,
    pub workspace: Option<WorkspaceId>,
}

impl From<CreateNoteRequest> for NewNote {
    fn from(r: CreateNoteRequest) -> Self {
        NewNote {
            content: r.content,
            kind: r.kind,
            workspace: r.workspace,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListQuery {
    pub workspace: Option<WorkspaceId>,
    pub converted_to_task: Option<bool>,
}

impl From<NoteListQuery> for NoteFilter {
    fn from(q: NoteListQuery) -> Self {
        NoteFilter {
            workspace: q.workspace,
            converted_to_task: q.converted_to_task,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConvertedNote {
    pub task: Task,
    pub note: Note,
}

// -------------------------
// Workspaces
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl From<CreateWorkspaceRequest> for NewWorkspace {
    fn from(r: CreateWorkspaceRequest) -> Self {
        NewWorkspace {
            name: r.name,
            description: r.description,
            icon: r.icon,
            color: r.color,
            is_default: r.is_default,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkspaceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_default: Option<bool>,
}

impl From<UpdateWorkspaceRequest> for WorkspaceChanges {
    fn from(r: UpdateWorkspaceRequest) -> Self {
        WorkspaceChanges {
            name: r.name,
            description: r.description,
            icon: r.icon,
            color: r.color,
            is_default: r.is_default,
        }
    }
}

// -------------------------
// Focus sessions
// -------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartFocusRequest {
    pub task: Option<TaskId>,
    pub duration: Option<u32>,
    pub break_duration: Option<u32>,
    pub workspace: Option<WorkspaceId>,
    pub layer: Option<Layer>,
}

impl From<StartFocusRequest> for NewFocusSession {
    fn from(r: StartFocusRequest) -> Self {
        NewFocusSession {
            task: r.task,
            duration: r.duration,
            break_duration: r.break_duration,
            workspace: r.workspace,
            layer: r.layer,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusListQuery {
    pub workspace: Option<WorkspaceId>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl FocusListQuery {
    pub fn filter(&self) -> FocusFilter {
        FocusFilter {
            workspace: self.workspace,
            started_from: self.start_date,
            started_to: self.end_date,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FocusStatsQuery {
    pub days: Option<i64>,
    pub workspace: Option<WorkspaceId>,
}

// -------------------------
// Analytics
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    pub days: Option<i64>,
    pub workspace: Option<WorkspaceId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkspaceQuery {
    pub workspace: Option<WorkspaceId>,
}
