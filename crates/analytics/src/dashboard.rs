use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use daybook_core::{WorkspaceId, clock::start_of_day, math};
use daybook_focus::FocusSession;
use daybook_habits::Habit;
use daybook_tasks::Task;

const FOCUS_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub completed_today: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitCounts {
    pub total: usize,
    pub active_streaks: usize,
    pub max_streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusWeek {
    pub sessions_this_week: usize,
    pub minutes_this_week: u64,
    pub hours_this_week: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardStats {
    pub tasks: TaskCounts,
    pub habits: HabitCounts,
    pub focus: FocusWeek,
}

impl DashboardStats {
    pub fn compute(
        tasks: &[Task],
        habits: &[Habit],
        sessions: &[FocusSession],
        now: DateTime<Utc>,
        workspace: Option<WorkspaceId>,
    ) -> Self {
        let in_scope = |ws: Option<WorkspaceId>| workspace.is_none() || ws == workspace;

        let day_start = start_of_day(now.date_naive());
        let day_end = day_start + Duration::days(1);

        let tasks: Vec<&Task> = tasks.iter().filter(|t| in_scope(t.workspace())).collect();
        let completed = tasks.iter().filter(|t| t.is_completed()).count();
        let completed_today = tasks
            .iter()
            .filter(|t| t.is_completed())
            .filter(|t| t.completed_at().is_some_and(|at| at >= day_start && at < day_end))
            .count();

        let habits: Vec<&Habit> = habits.iter().filter(|h| in_scope(h.workspace())).collect();

        let since = now - Duration::days(FOCUS_WINDOW_DAYS);
        let recent: Vec<&FocusSession> = sessions
            .iter()
            .filter(|s| in_scope(s.workspace()))
            .filter(|s| s.is_completed() && s.start_time() >= since)
            .collect();
        let minutes: u64 = recent.iter().map(|s| u64::from(s.actual_duration())).sum();

        Self {
            tasks: TaskCounts {
                total: tasks.len(),
                completed,
                active: tasks.len() - completed,
                completed_today,
            },
            habits: HabitCounts {
                total: habits.len(),
                active_streaks: habits.iter().filter(|h| h.current_streak() > 0).count(),
                max_streak: habits.iter().map(|h| h.longest_streak()).max().unwrap_or(0),
            },
            focus: FocusWeek {
                sessions_this_week: recent.len(),
                minutes_this_week: minutes,
                hours_this_week: math::hours_one_decimal(minutes),
            },
        }
    }
}
