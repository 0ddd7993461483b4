//! `daybook-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error model, the clock seam and a few small helpers that
//! every domain crate leans on.

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod layer;
pub mod math;
pub mod text;

pub use clock::{Clock, FixedClock, MAX_WINDOW_DAYS, SystemClock, window_start};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    FocusSessionId, HabitId, MilestoneId, NoteId, OwnerId, ProjectId, SubtaskId, TaskId,
    WorkspaceId,
};
pub use layer::Layer;
