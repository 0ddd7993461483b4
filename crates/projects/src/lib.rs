//! Project domain module: projects, milestones and task-based progress.

pub mod project;

pub use project::{
    Milestone, MilestoneInput, NewProject, Project, ProjectChanges, ProjectFilter, ProjectProgress,
    ProjectStatus,
};
