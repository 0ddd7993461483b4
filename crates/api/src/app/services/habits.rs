use serde::Serialize;
use tracing::info;

use daybook_core::{HabitId, OwnerId};
use daybook_habits::{Habit, HabitChanges, HabitFilter, HabitStats, NewHabit, StreakUpdate};
use daybook_infra::{DocumentStore, StoreResult};

use super::{AppServices, found};

/// Outcome of a streak refresh over an owner's habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakRefresh {
    pub habits: usize,
    pub resets: usize,
}

impl AppServices {
    /// Newest first.
    pub async fn habits_list(&self, owner: &OwnerId, filter: &HabitFilter) -> StoreResult<Vec<Habit>> {
        let mut habits: Vec<Habit> = self
            .habits
            .list(owner)
            .await?
            .into_iter()
            .filter(|h| filter.matches(h))
            .collect();
        habits.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(habits)
    }

    pub async fn habits_get(&self, owner: &OwnerId, id: HabitId) -> StoreResult<Habit> {
        found(self.habits.get(owner, id).await?)
    }

    pub async fn habits_create(&self, owner: &OwnerId, input: NewHabit) -> StoreResult<Habit> {
        let habit = Habit::create(HabitId::new(), owner.clone(), input, self.clock.now())?;
        self.habits.insert(habit).await
    }

    pub async fn habits_update(&self, owner: &OwnerId, id: HabitId, changes: HabitChanges) -> StoreResult<Habit> {
        let now = self.clock.now();
        self.habits
            .update(owner, id, &mut |h: &mut Habit| h.apply_changes(changes.clone(), now))
            .await
    }

    pub async fn habits_delete(&self, owner: &OwnerId, id: HabitId) -> StoreResult<Habit> {
        found(self.habits.remove(owner, id).await?)
    }

    /// Record today's completion. A second check-in on the same day is a
    /// conflict and leaves the habit untouched.
    pub async fn habits_check_in(&self, owner: &OwnerId, id: HabitId) -> StoreResult<Habit> {
        let today = self.clock.today();
        let now = self.clock.now();

        let habit = self
            .habits
            .update(owner, id, &mut |h: &mut Habit| h.check_in_once(today, now).map(|_| ()))
            .await?;

        info!(
            owner = %owner,
            habit = %id,
            current_streak = habit.current_streak(),
            "habit check-in recorded"
        );
        Ok(habit)
    }

    pub async fn habits_stats(&self, owner: &OwnerId, id: HabitId) -> StoreResult<HabitStats> {
        let habit = self.habits_get(owner, id).await?;
        Ok(habit.stats(self.clock.today()))
    }

    pub async fn habits_refresh_streak(&self, owner: &OwnerId, id: HabitId) -> StoreResult<Habit> {
        let today = self.clock.today();
        let now = self.clock.now();
        let mut outcome = StreakUpdate::Kept;

        let habit = self
            .habits
            .update(owner, id, &mut |h: &mut Habit| {
                outcome = h.update_streak(today, now);
                Ok(())
            })
            .await?;

        if let StreakUpdate::Reset { previous } = outcome {
            info!(owner = %owner, habit = %id, previous, "streak reset");
        }
        Ok(habit)
    }

    pub async fn habits_refresh_all_streaks(&self, owner: &OwnerId) -> StoreResult<StreakRefresh> {
        let today = self.clock.today();
        let now = self.clock.now();
        let mut resets = 0usize;

        let habits = self
            .habits
            .update_all(owner, &mut |habits: &mut Vec<Habit>| {
                resets = habits
                    .iter_mut()
                    .map(|h| h.update_streak(today, now))
                    .filter(|u| matches!(u, StreakUpdate::Reset { .. }))
                    .count();
                Ok(())
            })
            .await?;

        if resets > 0 {
            info!(owner = %owner, resets, "streaks reset");
        }
        Ok(StreakRefresh {
            habits: habits.len(),
            resets,
        })
    }
}
