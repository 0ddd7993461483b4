//! Read-only aggregates over one owner's tasks, habits and focus sessions.
//!
//! Callers load the owner's documents and pass them in; nothing here touches
//! storage or the wall clock.

pub mod achievements;
pub mod dashboard;
pub mod timeline;

pub use achievements::{Achievement, AchievementReport};
pub use dashboard::{DashboardStats, FocusWeek, HabitCounts, TaskCounts};
pub use timeline::{DEFAULT_TIMELINE_DAYS, Timeline};
