//! Background workers.

pub mod streak_sweeper;

pub use streak_sweeper::{StreakSweeper, SweepReport, WorkerHandle};
