use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use daybook_core::{DomainError, DomainResult, Entity, HabitId, Layer, OwnerId, WorkspaceId, text};

pub const DEFAULT_COLOR: &str = "#10b981";

/// How often the user intends to perform the habit.
///
/// Informational only: streak rules are the same for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
}

/// One check-in event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub date: NaiveDate,
    pub completed: bool,
}

/// A recurring behaviour the user tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    id: HabitId,
    owner_id: OwnerId,
    name: String,
    description: String,
    frequency: Frequency,
    color: String,
    current_streak: u32,
    longest_streak: u32,
    completion_history: Vec<CompletionRecord>,
    active: bool,
    workspace: Option<WorkspaceId>,
    layer: Layer,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Input for [`Habit::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub color: Option<String>,
    pub active: Option<bool>,
    pub workspace: Option<WorkspaceId>,
    pub layer: Option<Layer>,
}

/// Patch for the user-editable fields.
///
/// Streak counters and completion history are deliberately absent: only
/// check-in and streak recalculation may change them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub color: Option<String>,
    pub active: Option<bool>,
    /// `Some(None)` detaches the habit from its workspace.
    pub workspace: Option<Option<WorkspaceId>>,
    pub layer: Option<Layer>,
}

/// Outcome of [`Habit::check_in`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckIn {
    /// A completion was appended and the streak advanced.
    Recorded { current_streak: u32 },
    /// The habit was already completed that day; nothing changed.
    AlreadyCompleted,
}

/// Outcome of [`Habit::update_streak`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakUpdate {
    /// Completed yesterday or today; the streak stands.
    Kept,
    /// Nothing completed yesterday or today; the streak dropped to zero.
    Reset { previous: u32 },
}

/// List filter (`None` = don't filter on that field).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitFilter {
    pub workspace: Option<WorkspaceId>,
    pub active: Option<bool>,
}

impl HabitFilter {
    pub fn matches(&self, habit: &Habit) -> bool {
        if let Some(ws) = self.workspace {
            if habit.workspace != Some(ws) {
                return false;
            }
        }
        if let Some(active) = self.active {
            if habit.active != active {
                return false;
            }
        }
        true
    }
}

impl Habit {
    pub fn create(
        id: HabitId,
        owner_id: OwnerId,
        input: NewHabit,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = text::required("name", &input.name)?;
        Ok(Self {
            id,
            owner_id,
            name,
            description: text::optional(input.description.as_deref()),
            frequency: input.frequency.unwrap_or_default(),
            color: input.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            current_streak: 0,
            longest_streak: 0,
            completion_history: Vec::new(),
            active: input.active.unwrap_or(true),
            workspace: input.workspace,
            layer: input.layer.unwrap_or(Layer::Life),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn completion_history(&self) -> &[CompletionRecord] {
        &self.completion_history
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn workspace(&self) -> Option<WorkspaceId> {
        self.workspace
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn apply_changes(&mut self, changes: HabitChanges, now: DateTime<Utc>) -> DomainResult<()> {
        // Validate before touching anything so a rejected patch is a no-op.
        let name = changes
            .name
            .as_deref()
            .map(|n| text::required("name", n))
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description.trim().to_string();
        }
        if let Some(frequency) = changes.frequency {
            self.frequency = frequency;
        }
        if let Some(color) = changes.color {
            self.color = color;
        }
        if let Some(active) = changes.active {
            self.active = active;
        }
        if let Some(workspace) = changes.workspace {
            self.workspace = workspace;
        }
        if let Some(layer) = changes.layer {
            self.layer = layer;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Whether a completed record exists for `day`.
    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completion_history
            .iter()
            .any(|c| c.completed && c.date == day)
    }

    pub fn is_completed_today(&self, today: NaiveDate) -> bool {
        self.is_completed_on(today)
    }

    /// Mark the habit done for `today`.
    ///
    /// Idempotent per day. The streak is incremented without checking that
    /// the previous day was completed; gaps are only detected later by
    /// [`Habit::update_streak`].
    pub fn check_in(&mut self, today: NaiveDate, now: DateTime<Utc>) -> CheckIn {
        if self.is_completed_today(today) {
            return CheckIn::AlreadyCompleted;
        }

        self.completion_history.push(CompletionRecord {
            date: today,
            completed: true,
        });
        self.current_streak += 1;
        if self.current_streak > self.longest_streak {
            self.longest_streak = self.current_streak;
        }
        self.updated_at = now;

        CheckIn::Recorded {
            current_streak: self.current_streak,
        }
    }

    /// Reset the current streak when neither yesterday nor today is completed.
    pub fn update_streak(&mut self, today: NaiveDate, now: DateTime<Utc>) -> StreakUpdate {
        let yesterday = today - Duration::days(1);
        if self.is_completed_on(today) || self.is_completed_on(yesterday) {
            return StreakUpdate::Kept;
        }
        if self.current_streak == 0 {
            return StreakUpdate::Kept;
        }

        let previous = self.current_streak;
        self.current_streak = 0;
        self.updated_at = now;
        StreakUpdate::Reset { previous }
    }

    /// Check-in that treats a repeat as a client error.
    pub fn check_in_once(&mut self, today: NaiveDate, now: DateTime<Utc>) -> DomainResult<u32> {
        match self.check_in(today, now) {
            CheckIn::Recorded { current_streak } => Ok(current_streak),
            CheckIn::AlreadyCompleted => {
                Err(DomainError::conflict("habit already completed today"))
            }
        }
    }
}

impl Entity for Habit {
    type Id = HabitId;
    const COLLECTION: &'static str = "habits";
    const KIND: &'static str = "habit";

    fn id(&self) -> HabitId {
        self.id
    }

    fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn owner() -> OwnerId {
        OwnerId::new("user-1").unwrap()
    }

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(n - 1)
    }

    fn at(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::days(n - 1)
    }

    fn new_habit() -> Habit {
        Habit::create(
            HabitId::new(),
            owner(),
            NewHabit {
                name: "  Read  ".to_string(),
                ..NewHabit::default()
            },
            at(1),
        )
        .unwrap()
    }

    #[test]
    fn create_applies_defaults_and_trims_name() {
        let habit = new_habit();
        assert_eq!(habit.name(), "Read");
        assert_eq!(habit.description(), "");
        assert_eq!(habit.frequency(), Frequency::Daily);
        assert_eq!(habit.color(), DEFAULT_COLOR);
        assert_eq!(habit.layer(), Layer::Life);
        assert!(habit.is_active());
        assert_eq!(habit.current_streak(), 0);
        assert_eq!(habit.longest_streak(), 0);
        assert!(habit.completion_history().is_empty());
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = Habit::create(
            HabitId::new(),
            owner(),
            NewHabit {
                name: "   ".to_string(),
                ..NewHabit::default()
            },
            at(1),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn fresh_habit_is_not_completed_today() {
        assert!(!new_habit().is_completed_today(day(1)));
    }

    #[test]
    fn check_in_records_completion_and_starts_streak() {
        let mut habit = new_habit();
        let outcome = habit.check_in(day(1), at(1));

        assert_eq!(outcome, CheckIn::Recorded { current_streak: 1 });
        assert!(habit.is_completed_today(day(1)));
        assert_eq!(
            habit.completion_history(),
            &[CompletionRecord {
                date: day(1),
                completed: true
            }]
        );
        assert_eq!(habit.current_streak(), 1);
        assert_eq!(habit.longest_streak(), 1);
    }

    #[test]
    fn second_check_in_same_day_is_a_no_op() {
        let mut habit = new_habit();
        habit.check_in(day(1), at(1));
        let before = habit.clone();

        let outcome = habit.check_in(day(1), at(1) + Duration::hours(5));

        assert_eq!(outcome, CheckIn::AlreadyCompleted);
        assert_eq!(habit, before);
    }

    #[test]
    fn check_in_once_reports_conflict_on_repeat() {
        let mut habit = new_habit();
        assert_eq!(habit.check_in_once(day(1), at(1)).unwrap(), 1);
        let err = habit.check_in_once(day(1), at(1)).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(habit.completion_history().len(), 1);
    }

    #[test]
    fn streak_increments_across_gaps_without_update_streak() {
        // Streak counts check-ins since the last reset, not calendar-consecutive days.
        let mut habit = new_habit();
        habit.check_in(day(1), at(1));
        habit.check_in(day(5), at(5));
        assert_eq!(habit.current_streak(), 2);
        assert_eq!(habit.longest_streak(), 2);
    }

    #[test]
    fn update_streak_resets_when_nothing_yesterday_or_today() {
        let mut habit = new_habit();
        habit.check_in(day(1), at(1));
        habit.check_in(day(2), at(2));

        let outcome = habit.update_streak(day(4), at(4));

        assert_eq!(outcome, StreakUpdate::Reset { previous: 2 });
        assert_eq!(habit.current_streak(), 0);
        assert_eq!(habit.longest_streak(), 2);
    }

    #[test]
    fn update_streak_keeps_streak_when_completed_today_or_yesterday() {
        let mut habit = new_habit();
        habit.check_in(day(1), at(1));
        habit.check_in(day(2), at(2));

        assert_eq!(habit.update_streak(day(2), at(2)), StreakUpdate::Kept);
        assert_eq!(habit.update_streak(day(3), at(3)), StreakUpdate::Kept);
        assert_eq!(habit.current_streak(), 2);
    }

    #[test]
    fn update_streak_ignores_records_not_marked_completed() {
        let mut habit = new_habit();
        habit.check_in(day(1), at(1));
        habit.completion_history.push(CompletionRecord {
            date: day(3),
            completed: false,
        });

        assert_eq!(
            habit.update_streak(day(3), at(3)),
            StreakUpdate::Reset { previous: 1 }
        );
    }

    #[test]
    fn streak_scenario_with_gap_then_reset() {
        let mut habit = new_habit();

        habit.check_in(day(1), at(1));
        assert_eq!((habit.current_streak(), habit.longest_streak()), (1, 1));
        assert_eq!(habit.completion_history().len(), 1);

        habit.check_in(day(2), at(2));
        assert_eq!((habit.current_streak(), habit.longest_streak()), (2, 2));

        // Day 3 skipped, no recalculation in between.
        habit.check_in(day(4), at(4));
        assert_eq!((habit.current_streak(), habit.longest_streak()), (3, 3));

        habit.update_streak(day(6), at(6));
        assert_eq!((habit.current_streak(), habit.longest_streak()), (0, 3));
    }

    #[test]
    fn apply_changes_rejects_blank_name_without_partial_update() {
        let mut habit = new_habit();
        let before = habit.clone();
        let err = habit
            .apply_changes(
                HabitChanges {
                    name: Some(" ".to_string()),
                    color: Some("#000000".to_string()),
                    ..HabitChanges::default()
                },
                at(2),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(habit, before);
    }

    #[test]
    fn apply_changes_can_detach_workspace() {
        let mut habit = new_habit();
        let ws = WorkspaceId::new();
        habit
            .apply_changes(
                HabitChanges {
                    workspace: Some(Some(ws)),
                    ..HabitChanges::default()
                },
                at(2),
            )
            .unwrap();
        assert_eq!(habit.workspace(), Some(ws));

        habit
            .apply_changes(
                HabitChanges {
                    workspace: Some(None),
                    ..HabitChanges::default()
                },
                at(3),
            )
            .unwrap();
        assert_eq!(habit.workspace(), None);
        assert_eq!(habit.updated_at(), at(3));
    }

    #[test]
    fn filter_matches_workspace_and_active() {
        let ws = WorkspaceId::new();
        let mut habit = new_habit();
        habit
            .apply_changes(
                HabitChanges {
                    workspace: Some(Some(ws)),
                    active: Some(false),
                    ..HabitChanges::default()
                },
                at(1),
            )
            .unwrap();

        assert!(HabitFilter::default().matches(&habit));
        assert!(HabitFilter { workspace: Some(ws), active: Some(false) }.matches(&habit));
        assert!(!HabitFilter { workspace: None, active: Some(true) }.matches(&habit));
        assert!(!HabitFilter { workspace: Some(WorkspaceId::new()), active: None }.matches(&habit));
    }

    #[test]
    fn serializes_with_camel_case_fields_and_plain_dates() {
        let mut habit = new_habit();
        habit.check_in(day(1), at(1));
        let json = serde_json::to_value(&habit).unwrap();

        assert_eq!(json["currentStreak"], 1);
        assert_eq!(json["longestStreak"], 1);
        assert_eq!(json["ownerId"], "user-1");
        assert_eq!(json["completionHistory"][0]["date"], "2024-01-01");
        assert_eq!(json["completionHistory"][0]["completed"], true);
        assert_eq!(json["frequency"], "daily");
        assert_eq!(json["layer"], "life");
    }

    #[derive(Debug, Clone)]
    enum Op {
        CheckIn(i64),
        UpdateStreak(i64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1i64..60).prop_map(Op::CheckIn),
            (1i64..60).prop_map(Op::UpdateStreak),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: whatever the order of check-ins and recalculations,
        /// the current streak never exceeds the longest streak and no day
        /// carries two completed records.
        #[test]
        fn streak_invariants_hold_for_any_operation_sequence(
            ops in prop::collection::vec(op(), 0..40)
        ) {
            let mut habit = new_habit();

            for op in ops {
                match op {
                    Op::CheckIn(d) => { habit.check_in(day(d), at(d)); }
                    Op::UpdateStreak(d) => { habit.update_streak(day(d), at(d)); }
                }
                prop_assert!(habit.current_streak() <= habit.longest_streak());
            }

            let mut days: Vec<NaiveDate> = habit
                .completion_history()
                .iter()
                .filter(|c| c.completed)
                .map(|c| c.date)
                .collect();
            let total = days.len();
            days.sort();
            days.dedup();
            prop_assert_eq!(days.len(), total);
        }

        /// Property: check-ins on distinct days each add exactly one to the streak.
        #[test]
        fn distinct_day_check_ins_increment_by_one(
            offsets in prop::collection::btree_set(1i64..365, 1..30)
        ) {
            let mut habit = new_habit();
            for (i, d) in offsets.iter().enumerate() {
                let outcome = habit.check_in(day(*d), at(*d));
                prop_assert_eq!(outcome, CheckIn::Recorded { current_streak: i as u32 + 1 });
            }
        }
    }
}
