//! Workspace domain module.
//!
//! Workspaces group other documents. Each owner has at most one default
//! workspace; switching the default is a collection-level operation.

pub mod workspace;

pub use workspace::{NewWorkspace, Workspace, WorkspaceChanges, set_default, sort_for_listing};
