use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use daybook_core::{
    DomainError, DomainResult, Entity, MilestoneId, OwnerId, ProjectId, WorkspaceId, math, text,
};
use daybook_tasks::Task;

pub const DEFAULT_COLOR: &str = "#6366f1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Completed,
    Archived,
}

impl core::str::FromStr for ProjectStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planning" => Ok(ProjectStatus::Planning),
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "archived" => Ok(ProjectStatus::Archived),
            _ => Err(DomainError::validation(
                "status must be one of: planning, active, completed, archived",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: MilestoneId,
    pub title: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneInput {
    pub title: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    owner_id: OwnerId,
    name: String,
    description: String,
    status: ProjectStatus,
    color: String,
    milestones: Vec<Milestone>,
    workspace: Option<WorkspaceId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub color: Option<String>,
    pub milestones: Vec<MilestoneInput>,
    pub workspace: Option<WorkspaceId>,
}

/// Patch for editable fields. A milestone list, when present, replaces the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub color: Option<String>,
    pub milestones: Option<Vec<MilestoneInput>>,
    pub workspace: Option<Option<WorkspaceId>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub workspace: Option<WorkspaceId>,
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project) -> bool {
        if self.workspace.is_some() && project.workspace != self.workspace {
            return false;
        }
        !self.status.is_some_and(|s| s != project.status)
    }
}

/// Task-derived completion figures for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub task_count: usize,
    pub completed_count: usize,
    /// `round(100 * completed / total)`; 0 for a project without tasks.
    pub progress: u32,
}

impl ProjectProgress {
    /// Compute progress from the owner's tasks; tasks of other projects are ignored.
    pub fn of<'a>(project: ProjectId, tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (task_count, completed_count) = tasks
            .into_iter()
            .filter(|t| t.project() == Some(project))
            .fold((0, 0), |(total, done), t| {
                (total + 1, done + usize::from(t.is_completed()))
            });

        Self {
            task_count,
            completed_count,
            progress: math::percent(completed_count, task_count),
        }
    }
}

fn build_milestones(inputs: Vec<MilestoneInput>) -> DomainResult<Vec<Milestone>> {
    inputs
        .into_iter()
        .map(|m| {
            Ok(Milestone {
                id: MilestoneId::new(),
                title: text::required("milestone title", &m.title)?,
                completed: m.completed,
                due_date: m.due_date,
            })
        })
        .collect()
}

impl Project {
    pub fn create(
        id: ProjectId,
        owner_id: OwnerId,
        input: NewProject,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id,
            owner_id,
            name: text::required("name", &input.name)?,
            description: text::optional(input.description.as_deref()),
            status: input.status.unwrap_or_default(),
            color: input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            milestones: build_milestones(input.milestones)?,
            workspace: input.workspace,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn workspace(&self) -> Option<WorkspaceId> {
        self.workspace
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn apply_changes(&mut self, changes: ProjectChanges, now: DateTime<Utc>) -> DomainResult<()> {
        let name = changes
            .name
            .as_deref()
            .map(|n| text::required("name", n))
            .transpose()?;
        let milestones = changes.milestones.map(build_milestones).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description.trim().to_string();
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(color) = changes.color {
            self.color = color;
        }
        if let Some(milestones) = milestones {
            self.milestones = milestones;
        }
        if let Some(workspace) = changes.workspace {
            self.workspace = workspace;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Project {
    type Id = ProjectId;
    const COLLECTION: &'static str = "projects";
    const KIND: &'static str = "project";

    fn id(&self) -> ProjectId {
        self.id
    }

    fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use daybook_core::TaskId;
    use daybook_tasks::NewTask;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()
    }

    fn owner() -> OwnerId {
        OwnerId::new("u").unwrap()
    }

    fn task_in(project: Option<ProjectId>, done: bool) -> Task {
        let mut t = Task::create(
            TaskId::new(),
            owner(),
            NewTask {
                title: "t".to_string(),
                project,
                ..NewTask::default()
            },
            now(),
        )
        .unwrap();
        if done {
            t.toggle_complete(now());
        }
        t
    }

    #[test]
    fn create_defaults_and_validates_milestones() {
        let p = Project::create(
            ProjectId::new(),
            owner(),
            NewProject {
                name: " Launch ".to_string(),
                milestones: vec![MilestoneInput {
                    title: "beta".to_string(),
                    ..MilestoneInput::default()
                }],
                ..NewProject::default()
            },
            now(),
        )
        .unwrap();
        assert_eq!(p.name(), "Launch");
        assert_eq!(p.status(), ProjectStatus::Planning);
        assert_eq!(p.color(), DEFAULT_COLOR);
        assert_eq!(p.milestones().len(), 1);

        let err = Project::create(
            ProjectId::new(),
            owner(),
            NewProject {
                name: "x".to_string(),
                milestones: vec![MilestoneInput::default()],
                ..NewProject::default()
            },
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn progress_rounds_and_ignores_other_projects() {
        let id = ProjectId::new();
        let tasks = vec![
            task_in(Some(id), true),
            task_in(Some(id), false),
            task_in(Some(id), false),
            task_in(Some(ProjectId::new()), true),
            task_in(None, true),
        ];

        let progress = ProjectProgress::of(id, &tasks);
        assert_eq!(
            progress,
            ProjectProgress {
                task_count: 3,
                completed_count: 1,
                progress: 33,
            }
        );
    }

    #[test]
    fn progress_of_empty_project_is_zero() {
        let progress = ProjectProgress::of(ProjectId::new(), &Vec::<Task>::new());
        assert_eq!(progress.progress, 0);
        assert_eq!(progress.task_count, 0);
    }

    #[test]
    fn filter_on_status() {
        let p = Project::create(
            ProjectId::new(),
            owner(),
            NewProject {
                name: "p".to_string(),
                status: Some(ProjectStatus::Active),
                ..NewProject::default()
            },
            now(),
        )
        .unwrap();
        assert!(ProjectFilter { workspace: None, status: Some(ProjectStatus::Active) }.matches(&p));
        assert!(!ProjectFilter { workspace: None, status: Some(ProjectStatus::Archived) }.matches(&p));
    }
}
