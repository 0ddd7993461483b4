//! Habit tracking domain module.
//!
//! Completion history, streak counters and idempotent daily check-in,
//! implemented as deterministic domain logic (no IO, no clock reads).

pub mod habit;
pub mod stats;

pub use habit::{
    CheckIn, CompletionRecord, Frequency, Habit, HabitChanges, HabitFilter, NewHabit,
    StreakUpdate,
};
pub use stats::{HabitStats, COMPLETION_RATE_WINDOW_DAYS, RECENT_HISTORY_LEN};
