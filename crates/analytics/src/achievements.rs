use std::collections::HashSet;

use serde::Serialize;

use daybook_focus::FocusSession;
use daybook_habits::Habit;
use daybook_tasks::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementReport {
    pub achievements: Vec<Achievement>,
    pub total_achievements: usize,
}

#[derive(Debug, Clone, Copy)]
enum Metric {
    CompletedTasks,
    LongestStreak,
    FocusHours,
    ProjectsWithCompletedWork,
}

const fn badge(id: &'static str, name: &'static str, description: &'static str, icon: &'static str) -> Achievement {
    Achievement {
        id,
        name,
        description,
        icon,
        unlocked: true,
    }
}

const CATALOG: &[(Metric, u64, Achievement)] = &[
    (Metric::CompletedTasks, 1, badge("first_task", "First Task", "Completed your first task", "CheckCircle")),
    (Metric::CompletedTasks, 10, badge("task_10", "Getting Started", "Completed 10 tasks", "Target")),
    (Metric::CompletedTasks, 50, badge("task_50", "Productive", "Completed 50 tasks", "Zap")),
    (Metric::CompletedTasks, 100, badge("task_100", "Centurion", "Completed 100 tasks", "Award")),
    (Metric::LongestStreak, 7, badge("streak_7", "Week Warrior", "7-day habit streak", "Flame")),
    (Metric::LongestStreak, 30, badge("streak_30", "Monthly Master", "30-day habit streak", "Trophy")),
    (Metric::LongestStreak, 100, badge("streak_100", "Unstoppable", "100-day habit streak", "Crown")),
    (Metric::FocusHours, 1, badge("focus_1h", "Focused", "1 hour of focus time", "Clock")),
    (Metric::FocusHours, 10, badge("focus_10h", "Deep Worker", "10 hours of focus time", "Brain")),
    (Metric::FocusHours, 50, badge("focus_50h", "Flow State", "50 hours of focus time", "Sparkles")),
    (
        Metric::ProjectsWithCompletedWork,
        1,
        badge("project_1", "Project Complete", "Completed your first project", "FolderCheck"),
    ),
];

impl AchievementReport {
    /// Unlocked achievements, in catalog order.
    pub fn compute(tasks: &[Task], habits: &[Habit], sessions: &[FocusSession]) -> Self {
        let completed_tasks = tasks.iter().filter(|t| t.is_completed()).count() as u64;
        let longest_streak = habits.iter().map(|h| u64::from(h.longest_streak())).max().unwrap_or(0);
        let focus_minutes: u64 = sessions
            .iter()
            .filter(|s| s.is_completed())
            .map(|s| u64::from(s.actual_duration()))
            .sum();
        let focus_hours = (focus_minutes as f64 / 60.0).round() as u64;
        let projects = tasks
            .iter()
            .filter(|t| t.is_completed())
            .filter_map(|t| t.project())
            .collect::<HashSet<_>>()
            .len() as u64;

        let achievements: Vec<Achievement> = CATALOG
            .iter()
            .filter(|(metric, threshold, _)| {
                let value = match metric {
                    Metric::CompletedTasks => completed_tasks,
                    Metric::LongestStreak => longest_streak,
                    Metric::FocusHours => focus_hours,
                    Metric::ProjectsWithCompletedWork => projects,
                };
                value >= *threshold
            })
            .map(|(_, _, a)| *a)
            .collect();

        Self {
            total_achievements: achievements.len(),
            achievements,
        }
    }
}
