//! Derived, read-only habit statistics.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use daybook_core::math;

use crate::habit::{CompletionRecord, Habit};

/// Trailing window (days, today included) for `completion_rate`; also its
/// fixed denominator.
pub const COMPLETION_RATE_WINDOW_DAYS: i64 = 30;

/// Number of trailing history records returned with the statistics.
pub const RECENT_HISTORY_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: usize,
    pub completed_today: bool,
    /// Percentage of the last 30 days (today included) with a completion.
    ///
    /// The denominator is always 30, so a habit created a few days ago
    /// starts low by construction.
    pub completion_rate: u32,
    pub recent_history: Vec<CompletionRecord>,
}

impl Habit {
    pub fn total_completions(&self) -> usize {
        self.completion_history()
            .iter()
            .filter(|c| c.completed)
            .count()
    }

    pub fn completion_rate(&self, today: NaiveDate) -> u32 {
        let since = today - Duration::days(COMPLETION_RATE_WINDOW_DAYS);
        let recent = self
            .completion_history()
            .iter()
            .filter(|c| c.completed && c.date > since)
            .count();
        math::percent(recent, COMPLETION_RATE_WINDOW_DAYS as usize)
    }

    pub fn stats(&self, today: NaiveDate) -> HabitStats {
        let history = self.completion_history();
        let tail = history.len().saturating_sub(RECENT_HISTORY_LEN);

        HabitStats {
            current_streak: self.current_streak(),
            longest_streak: self.longest_streak(),
            total_completions: self.total_completions(),
            completed_today: self.is_completed_today(today),
            completion_rate: self.completion_rate(today),
            recent_history: history[tail..].to_vec(),
        }
    }
}
