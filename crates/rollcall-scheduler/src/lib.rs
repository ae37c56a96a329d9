//! # RollCall Scheduler
//!
//! Wall-clock scheduling of the daily roll-call cycle.
//!
//! ## Architecture
//! ```text
//! SchedulerEngine (one tokio task per job, zone-aware cron)
//!   ├── evening "0 20 * * *" → reset_for_new_day → reminder  → group
//!   ├── cutoff  "0 23 * * *" → snapshot_missed
//!   └── morning "0 5 * * *"  → last_missed       → digest    → manager
//! ```

pub mod cron;
pub mod dispatch;
pub mod engine;
pub mod jobs;

pub use cron::CronSchedule;
pub use engine::{ScheduledJob, SchedulerEngine};
pub use jobs::{DailyJobs, JobKind, JobOutcome};
