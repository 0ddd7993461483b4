//! Task domain module: tasks, subtasks and due-date views.

pub mod task;
pub mod views;

pub use task::{NewTask, Priority, Subtask, Task, TaskChanges, TaskFilter, TaskStatus};
pub use views::{due_today, upcoming, UPCOMING_WINDOW_DAYS};
