use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use daybook_core::Clock;
use daybook_habits::{Habit, StreakUpdate};

use crate::store::{DocumentStore, StoreResult};

/// Handle to stop a background worker and wait for it to finish.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.join.await;
    }
}

/// Totals from one sweep over every owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub owners: usize,
    pub habits: usize,
    pub resets: usize,
    pub failed_owners: usize,
}

/// Periodically applies the streak-reset rule to every stored habit, so
/// lapsed streaks drop to zero even when the client never asks.
pub struct StreakSweeper<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S> StreakSweeper<S>
where
    S: DocumentStore<Habit> + 'static,
{
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Run one pass. A failing owner is logged and skipped.
    pub async fn sweep_once(&self) -> StoreResult<SweepReport> {
        let today = self.clock.today();
        let now = self.clock.now();
        let mut report = SweepReport::default();

        for owner in self.store.owners().await? {
            report.owners += 1;
            let mut resets = 0usize;

            let result = self
                .store
                .update_all(&owner, &mut |habits: &mut Vec<Habit>| {
                    resets = habits
                        .iter_mut()
                        .map(|h| h.update_streak(today, now))
                        .filter(|u| matches!(u, StreakUpdate::Reset { .. }))
                        .count();
                    Ok(())
                })
                .await;

            match result {
                Ok(habits) => {
                    report.habits += habits.len();
                    report.resets += resets;
                }
                Err(err) => {
                    report.failed_owners += 1;
                    warn!(owner = %owner, error = %err, "streak sweep failed for owner");
                }
            }
        }

        Ok(report)
    }

    /// Run [`Self::sweep_once`] every `interval` until shut down.
    pub fn spawn(self, interval: Duration) -> WorkerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => match self.sweep_once().await {
                        Ok(report) if report.resets > 0 => {
                            info!(resets = report.resets, habits = report.habits, owners = report.owners, "streaks reset");
                        }
                        Ok(_) => {}
                        Err(err) => warn!(error = %err, "streak sweep failed"),
                    },
                }
            }
        });

        WorkerHandle {
            shutdown: shutdown_tx,
            join,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};

    use daybook_core::{Entity, FixedClock, HabitId, OwnerId};
    use daybook_habits::NewHabit;

    use crate::store::InMemoryDocumentStore;

    use super::*;

    fn habit(owner: &str, name: &str) -> Habit {
        Habit::create(
            HabitId::new(),
            OwnerId::new(owner).unwrap(),
            NewHabit {
                name: name.to_string(),
                ..NewHabit::default()
            },
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn sweep_resets_only_lapsed_streaks_across_owners() {
        let store = Arc::new(InMemoryDocumentStore::<Habit>::new());
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 6, 0, 0).unwrap();

        let mut lapsed = habit("alice", "lapsed");
        lapsed.check_in(day(2), now);
        let mut fresh = habit("alice", "fresh");
        fresh.check_in(day(4), now);
        let mut other = habit("bob", "other");
        other.check_in(day(1), now);

        for h in [lapsed.clone(), fresh.clone(), other.clone()] {
            store.insert(h).await.unwrap();
        }

        let clock = Arc::new(FixedClock::new(now));
        let sweeper = StreakSweeper::new(store.clone(), clock);
        let report = sweeper.sweep_once().await.unwrap();

        assert_eq!(
            report,
            SweepReport {
                owners: 2,
                habits: 3,
                resets: 2,
                failed_owners: 0,
            }
        );

        let alice = OwnerId::new("alice").unwrap();
        let lapsed_after = store.get(&alice, lapsed.id()).await.unwrap().unwrap();
        assert_eq!(lapsed_after.current_streak(), 0);
        assert_eq!(lapsed_after.longest_streak(), 1);
        let fresh_after = store.get(&alice, fresh.id()).await.unwrap().unwrap();
        assert_eq!(fresh_after.current_streak(), 1);

        // Nothing left to reset on a second pass.
        assert_eq!(sweeper.sweep_once().await.unwrap().resets, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_worker_sweeps_and_stops() {
        let store = Arc::new(InMemoryDocumentStore::<Habit>::new());
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let mut h = habit("alice", "read");
        h.check_in(day(2), start);
        store.insert(h.clone()).await.unwrap();

        let clock = Arc::new(FixedClock::new(start + ChronoDuration::days(3)));
        let handle = StreakSweeper::new(store.clone(), clock).spawn(Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(1)).await;
        handle.shutdown().await;

        let alice = OwnerId::new("alice").unwrap();
        let after = store.get(&alice, h.id()).await.unwrap().unwrap();
        assert_eq!(after.current_streak(), 0);
    }
}
