//! Focus (Pomodoro) sessions and focus-time statistics.

pub mod session;
pub mod stats;

pub use session::{
    DEFAULT_BREAK_MINUTES, DEFAULT_DURATION_MINUTES, FocusFilter, FocusSession, NewFocusSession,
};
pub use stats::{DayTotals, FocusStats, DEFAULT_STATS_DAYS};
