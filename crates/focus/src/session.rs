use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use daybook_core::{DomainError, DomainResult, Entity, FocusSessionId, Layer, OwnerId, TaskId, WorkspaceId};

pub const DEFAULT_DURATION_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    id: FocusSessionId,
    owner_id: OwnerId,
    task: Option<TaskId>,
    /// Planned length in minutes.
    duration: u32,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    completed: bool,
    break_duration: u32,
    /// Minutes actually spent, set when the session ends.
    actual_duration: u32,
    workspace: Option<WorkspaceId>,
    layer: Layer,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFocusSession {
    pub task: Option<TaskId>,
    pub duration: Option<u32>,
    pub break_duration: Option<u32>,
    pub workspace: Option<WorkspaceId>,
    pub layer: Option<Layer>,
}

/// List filter. Date bounds apply to `start_time` and are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusFilter {
    pub workspace: Option<WorkspaceId>,
    pub started_from: Option<DateTime<Utc>>,
    pub started_to: Option<DateTime<Utc>>,
}

impl FocusFilter {
    pub fn matches(&self, session: &FocusSession) -> bool {
        if self.workspace.is_some() && session.workspace != self.workspace {
            return false;
        }
        if self.started_from.is_some_and(|from| session.start_time < from) {
            return false;
        }
        !self.started_to.is_some_and(|to| session.start_time > to)
    }
}

impl FocusSession {
    /// Start a session at `now`.
    pub fn start(
        id: FocusSessionId,
        owner_id: OwnerId,
        input: NewFocusSession,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let duration = input.duration.unwrap_or(DEFAULT_DURATION_MINUTES);
        if duration == 0 {
            return Err(DomainError::validation("duration must be at least one minute"));
        }

        Ok(Self {
            id,
            owner_id,
            task: input.task,
            duration,
            start_time: now,
            end_time: None,
            completed: false,
            break_duration: input.break_duration.unwrap_or(DEFAULT_BREAK_MINUTES),
            actual_duration: 0,
            workspace: input.workspace,
            layer: input.layer.unwrap_or(Layer::Growth),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn task(&self) -> Option<TaskId> {
        self.task
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn break_duration(&self) -> u32 {
        self.break_duration
    }

    pub fn actual_duration(&self) -> u32 {
        self.actual_duration
    }

    pub fn workspace(&self) -> Option<WorkspaceId> {
        self.workspace
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Close the session at `now`, recording the elapsed minutes (rounded).
    pub fn end(&mut self, now: DateTime<Utc>) -> DomainResult<u32> {
        if self.completed {
            return Err(DomainError::conflict("session already completed"));
        }

        let elapsed_ms = (now - self.start_time).num_milliseconds().max(0);
        let minutes = (elapsed_ms as f64 / 60_000.0).round() as u32;

        self.end_time = Some(now);
        self.completed = true;
        self.actual_duration = minutes;
        self.updated_at = now;
        Ok(minutes)
    }
}

impl Entity for FocusSession {
    type Id = FocusSessionId;
    const COLLECTION: &'static str = "focus_sessions";
    const KIND: &'static str = "focus session";

    fn id(&self) -> FocusSessionId {
        self.id
    }

    fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap()
    }

    fn session() -> FocusSession {
        FocusSession::start(
            FocusSessionId::new(),
            OwnerId::new("u").unwrap(),
            NewFocusSession::default(),
            t0(),
        )
        .unwrap()
    }

    #[test]
    fn start_applies_defaults() {
        let s = session();
        assert_eq!(s.duration(), DEFAULT_DURATION_MINUTES);
        assert_eq!(s.break_duration(), DEFAULT_BREAK_MINUTES);
        assert_eq!(s.layer(), Layer::Growth);
        assert_eq!(s.start_time(), t0());
        assert!(!s.is_completed());
        assert_eq!(s.actual_duration(), 0);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = FocusSession::start(
            FocusSessionId::new(),
            OwnerId::new("u").unwrap(),
            NewFocusSession {
                duration: Some(0),
                ..NewFocusSession::default()
            },
            t0(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn end_rounds_elapsed_minutes() {
        let mut s = session();
        let minutes = s.end(t0() + Duration::seconds(24 * 60 + 30)).unwrap();
        assert_eq!(minutes, 25);
        assert_eq!(s.actual_duration(), 25);
        assert!(s.is_completed());

        let mut short = session();
        assert_eq!(short.end(t0() + Duration::seconds(89)).unwrap(), 1);
    }

    #[test]
    fn ending_twice_is_a_conflict() {
        let mut s = session();
        s.end(t0() + Duration::minutes(10)).unwrap();
        let before = s.clone();
        let err = s.end(t0() + Duration::minutes(20)).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(s, before);
    }

    #[test]
    fn filter_on_start_time_is_inclusive() {
        let s = session();
        let f = FocusFilter {
            started_from: Some(t0()),
            started_to: Some(t0()),
            ..FocusFilter::default()
        };
        assert!(f.matches(&s));
        let later = FocusFilter {
            started_from: Some(t0() + Duration::seconds(1)),
            ..FocusFilter::default()
        };
        assert!(!later.matches(&s));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(session()).unwrap();
        assert_eq!(json["breakDuration"], 5);
        assert_eq!(json["actualDuration"], 0);
        assert!(json["endTime"].is_null());
    }
}
