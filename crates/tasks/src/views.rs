//! Due-date views over an owner's tasks.

use chrono::{Duration, NaiveDate};

use daybook_core::clock::start_of_day;

use crate::task::Task;

pub const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Open tasks due during `today`, highest priority first.
pub fn due_today(tasks: impl IntoIterator<Item = Task>, today: NaiveDate) -> Vec<Task> {
    let from = start_of_day(today);
    let until = from + Duration::days(1);

    let mut out: Vec<Task> = tasks
        .into_iter()
        .filter(|t| !t.is_completed())
        .filter(|t| t.due_date().is_some_and(|d| d >= from && d < until))
        .collect();
    out.sort_by(|a, b| b.priority().cmp(&a.priority()).then(a.due_date().cmp(&b.due_date())));
    out
}

/// Open tasks due from the start of `today` through the next seven days, soonest first.
pub fn upcoming(tasks: impl IntoIterator<Item = Task>, today: NaiveDate) -> Vec<Task> {
    let from = start_of_day(today);
    let until = from + Duration::days(UPCOMING_WINDOW_DAYS);

    let mut out: Vec<Task> = tasks
        .into_iter()
        .filter(|t| !t.is_completed())
        .filter(|t| t.due_date().is_some_and(|d| d >= from && d <= until))
        .collect();
    out.sort_by_key(|t| t.due_date());
    out
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use daybook_core::{OwnerId, TaskId};

    use crate::task::{NewTask, Priority};

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn due(title: &str, due: Option<DateTime<Utc>>, priority: Priority) -> Task {
        Task::create(
            TaskId::new(),
            OwnerId::new("u").unwrap(),
            NewTask {
                title: title.to_string(),
                due_date: due,
                priority: Some(priority),
                ..NewTask::default()
            },
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn on(d: u32, h: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 5, d, h, 0, 0).unwrap())
    }

    #[test]
    fn due_today_sorts_by_priority_and_skips_done_and_other_days() {
        let mut done = due("done", on(10, 9), Priority::High);
        done.toggle_complete(Utc::now());

        let tasks = vec![
            due("low", on(10, 8), Priority::Low),
            due("high", on(10, 20), Priority::High),
            due("medium", on(10, 0), Priority::Medium),
            due("tomorrow", on(11, 0), Priority::High),
            due("yesterday", on(9, 23), Priority::High),
            due("undated", None, Priority::High),
            done,
        ];

        let titles: Vec<_> = due_today(tasks, today())
            .into_iter()
            .map(|t| t.title().to_string())
            .collect();
        assert_eq!(titles, vec!["high", "medium", "low"]);
    }

    #[test]
    fn upcoming_covers_seven_days_inclusive_in_due_order() {
        let tasks = vec![
            due("edge", on(17, 0), Priority::Low),
            due("past edge", on(17, 1), Priority::Low),
            due("soon", on(11, 0), Priority::Low),
            due("now", on(10, 0), Priority::Low),
            due("earlier", on(9, 12), Priority::Low),
        ];

        let titles: Vec<_> = upcoming(tasks, today())
            .into_iter()
            .map(|t| t.title().to_string())
            .collect();
        assert_eq!(titles, vec!["now", "soon", "edge"]);
    }
}
