//! Scheduler engine — one tokio task per job, each sleeping until its next
//! wall-clock fire time in the configured zone.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rollcall_core::config::RollCallConfig;
use rollcall_core::error::{Result, RollCallError};
use tokio::task::JoinHandle;

use crate::cron::CronSchedule;
use crate::jobs::{DailyJobs, JobKind};

/// Longest single sleep. Re-checking the wall clock this often keeps fire
/// times right across suspend/resume and clock adjustments.
const MAX_SLEEP: Duration = Duration::from_secs(60);

/// A job bound to its cron schedule.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub kind: JobKind,
    pub schedule: CronSchedule,
}

/// The scheduler engine — holds the job plan and spawns the timer tasks.
pub struct SchedulerEngine {
    tz: Tz,
    jobs: Vec<ScheduledJob>,
}

impl SchedulerEngine {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            jobs: Vec::new(),
        }
    }

    /// Build the evening/cutoff/morning plan from configuration.
    /// Invalid cron expressions, and ones that never fire, are configuration
    /// errors.
    pub fn from_config(config: &RollCallConfig) -> Result<Self> {
        let mut engine = Self::new(config.tz()?);
        engine.add_job(JobKind::Evening, &config.schedule.evening)?;
        engine.add_job(JobKind::Cutoff, &config.schedule.cutoff)?;
        engine.add_job(JobKind::Morning, &config.schedule.morning)?;
        Ok(engine)
    }

    pub fn add_job(&mut self, kind: JobKind, expression: &str) -> Result<()> {
        let schedule = CronSchedule::parse(expression)
            .map_err(|e| RollCallError::Config(format!("{kind} job: {e}")))?;
        let now = Utc::now().with_timezone(&self.tz);
        if schedule.next_after(&now).is_none() {
            return Err(RollCallError::Config(format!(
                "{kind} job: cron '{expression}' never fires within a year"
            )));
        }
        tracing::info!("📅 Job scheduled: {kind} at '{expression}'");
        self.jobs.push(ScheduledJob { kind, schedule });
        Ok(())
    }

    pub fn jobs(&self) -> &[ScheduledJob] {
        &self.jobs
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Next fire time of every job after `now`, in job order.
    pub fn next_runs(&self, now: DateTime<Utc>) -> Vec<(JobKind, Option<DateTime<Tz>>)> {
        let local = now.with_timezone(&self.tz);
        self.jobs
            .iter()
            .map(|job| (job.kind, job.schedule.next_after(&local)))
            .collect()
    }

    /// Spawn one timer task per job.
    pub fn spawn(self, jobs: Arc<DailyJobs>) -> Vec<JoinHandle<()>> {
        tracing::info!(
            "⏰ Scheduler started ({} jobs, zone {})",
            self.jobs.len(),
            self.tz
        );
        let tz = self.tz;
        self.jobs
            .into_iter()
            .map(|job| tokio::spawn(run_job_loop(tz, job, Arc::clone(&jobs))))
            .collect()
    }
}

/// Sleep until `at` by wall clock.
async fn sleep_until_wall(at: DateTime<Utc>) {
    loop {
        let remaining = match (at - Utc::now()).to_std() {
            Ok(d) if !d.is_zero() => d,
            _ => return,
        };
        tokio::time::sleep(remaining.min(MAX_SLEEP)).await;
    }
}

async fn run_job_loop(tz: Tz, job: ScheduledJob, jobs: Arc<DailyJobs>) {
    loop {
        let now = Utc::now().with_timezone(&tz);
        let Some(next) = job.schedule.next_after(&now) else {
            tracing::warn!(
                "⚠️ {} job has no upcoming fire time for '{}', stopping",
                job.kind,
                job.schedule.expression()
            );
            return;
        };
        tracing::debug!("⏳ {} job next fires at {}", job.kind, next);
        sleep_until_wall(next.with_timezone(&Utc)).await;

        // Run in its own task so a panic ends only this run, not the timer.
        let runner = Arc::clone(&jobs);
        let kind = job.kind;
        match tokio::spawn(async move { runner.run(kind).await }).await {
            Ok(outcome) => tracing::debug!("{kind} job finished: {outcome:?}"),
            Err(e) => tracing::error!("❌ {kind} job aborted: {e}"),
        }
    }
}
