//! Focus-time statistics over completed sessions.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use daybook_core::{DomainResult, WorkspaceId, clock, math};

use crate::session::FocusSession;

pub const DEFAULT_STATS_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTotals {
    pub count: usize,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusStats {
    pub total_sessions: usize,
    pub total_minutes: u64,
    pub total_hours: f64,
    pub average_session: u64,
    /// Keyed by the UTC date the session started.
    pub sessions_by_date: BTreeMap<NaiveDate, DayTotals>,
}

impl FocusStats {
    /// Aggregate completed sessions that started within the last `days` days.
    pub fn compute<'a>(
        sessions: impl IntoIterator<Item = &'a FocusSession>,
        now: DateTime<Utc>,
        days: i64,
        workspace: Option<WorkspaceId>,
    ) -> DomainResult<Self> {
        let since = clock::window_start(now, days)?;

        let mut total_sessions = 0usize;
        let mut total_minutes = 0u64;
        let mut sessions_by_date: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

        for s in sessions {
            if !s.is_completed() || s.start_time() < since {
                continue;
            }
            if workspace.is_some() && s.workspace() != workspace {
                continue;
            }
            let minutes = u64::from(s.actual_duration());
            total_sessions += 1;
            total_minutes += minutes;

            let day = sessions_by_date.entry(s.start_time().date_naive()).or_default();
            day.count += 1;
            day.minutes += minutes;
        }

        Ok(Self {
            total_sessions,
            total_minutes,
            total_hours: math::hours_one_decimal(total_minutes),
            average_session: math::rounded_average(total_minutes, total_sessions),
            sessions_by_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use daybook_core::{DomainError, FocusSessionId, OwnerId};

    use crate::session::NewFocusSession;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 10, 18, 0, 0).unwrap()
    }

    fn finished(start: DateTime<Utc>, minutes: i64, workspace: Option<WorkspaceId>) -> FocusSession {
        let mut s = FocusSession::start(
            FocusSessionId::new(),
            OwnerId::new("u").unwrap(),
            NewFocusSession {
                workspace,
                ..NewFocusSession::default()
            },
            start,
        )
        .unwrap();
        s.end(start + Duration::minutes(minutes)).unwrap();
        s
    }

    #[test]
    fn aggregates_completed_sessions_in_window() {
        let day1 = Utc.with_ymd_and_hms(2024, 4, 9, 9, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2024, 4, 10, 9, 0, 0).unwrap();
        let open = FocusSession::start(
            FocusSessionId::new(),
            OwnerId::new("u").unwrap(),
            NewFocusSession::default(),
            day2,
        )
        .unwrap();

        let sessions = vec![
            finished(day1, 25, None),
            finished(day1 + Duration::hours(1), 50, None),
            finished(day2, 30, None),
            finished(now() - Duration::days(8), 100, None),
            open,
        ];

        let stats = FocusStats::compute(&sessions, now(), DEFAULT_STATS_DAYS, None).unwrap();
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_minutes, 105);
        assert_eq!(stats.total_hours, 1.8);
        assert_eq!(stats.average_session, 35);
        assert_eq!(
            stats.sessions_by_date[&NaiveDate::from_ymd_opt(2024, 4, 9).unwrap()],
            DayTotals { count: 2, minutes: 75 }
        );
        assert_eq!(
            stats.sessions_by_date[&NaiveDate::from_ymd_opt(2024, 4, 10).unwrap()],
            DayTotals { count: 1, minutes: 30 }
        );
    }

    #[test]
    fn empty_window_yields_zeroes() {
        let stats = FocusStats::compute(&Vec::new(), now(), 7, None).unwrap();
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.average_session, 0);
        assert_eq!(stats.total_hours, 0.0);
        assert!(stats.sessions_by_date.is_empty());
    }

    #[test]
    fn workspace_filter_applies() {
        let ws = WorkspaceId::new();
        let start = now() - Duration::hours(3);
        let sessions = vec![finished(start, 20, Some(ws)), finished(start, 40, None)];
        let stats = FocusStats::compute(&sessions, now(), 7, Some(ws)).unwrap();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_minutes, 20);
    }

    #[test]
    fn oversized_window_is_a_validation_error() {
        let sessions = vec![finished(now() - Duration::hours(2), 25, None)];
        for days in [0, 10_000_000_000, i64::MAX] {
            let res = FocusStats::compute(&sessions, now(), days, None);
            assert!(matches!(res, Err(DomainError::Validation(_))), "days = {days}");
        }
    }
}
