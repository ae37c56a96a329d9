//! The three daily jobs: evening reset + reminder, cutoff snapshot,
//! morning digest to the manager.

use std::fmt;
use std::sync::Arc;

use rollcall_core::format::Templates;
use rollcall_core::traits::NotificationSink;
use rollcall_core::tracker::ReportTracker;
use rollcall_core::types::{ChatId, OutgoingMessage};

use crate::dispatch::deliver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    Evening,
    Cutoff,
    Morning,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Evening => "evening",
            Self::Cutoff => "cutoff",
            Self::Morning => "morning",
        })
    }
}

/// What a job run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub kind: JobKind,
    /// The tracker transition was applied (always true for the morning job).
    pub transition_applied: bool,
    /// Delivery result of the job's message, if it sends one.
    pub delivered: Option<bool>,
}

/// Shared context of the daily jobs.
pub struct DailyJobs {
    tracker: Arc<ReportTracker>,
    sink: Arc<dyn NotificationSink>,
    templates: Arc<Templates>,
    group: ChatId,
    manager: ChatId,
}

impl DailyJobs {
    pub fn new(
        tracker: Arc<ReportTracker>,
        sink: Arc<dyn NotificationSink>,
        templates: Arc<Templates>,
        group: ChatId,
        manager: ChatId,
    ) -> Self {
        Self {
            tracker,
            sink,
            templates,
            group,
            manager,
        }
    }

    pub async fn run(&self, kind: JobKind) -> JobOutcome {
        tracing::info!("🔔 {kind} job triggered");
        match kind {
            JobKind::Evening => self.evening().await,
            JobKind::Cutoff => self.cutoff(),
            JobKind::Morning => self.morning().await,
        }
    }

    /// Open the new day-cycle, then remind the group. The reminder goes out
    /// even when the reset is refused.
    pub async fn evening(&self) -> JobOutcome {
        let transition_applied = match self.tracker.reset_for_new_day() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("⚠️ Evening reset skipped: {e}");
                false
            }
        };
        let message = OutgoingMessage::new(self.group, self.templates.reminder());
        let delivered = deliver(self.sink.as_ref(), message, "Evening reminder").await;
        JobOutcome {
            kind: JobKind::Evening,
            transition_applied,
            delivered: Some(delivered),
        }
    }

    /// Fix who is missing for this cycle. Sends nothing.
    pub fn cutoff(&self) -> JobOutcome {
        let transition_applied = match self.tracker.snapshot_missed() {
            Ok(missed) => {
                tracing::info!("📋 Missing at cutoff: {missed:?}");
                true
            }
            Err(e) => {
                tracing::warn!("⚠️ Cutoff snapshot skipped: {e}");
                false
            }
        };
        JobOutcome {
            kind: JobKind::Cutoff,
            transition_applied,
            delivered: None,
        }
    }

    /// Send the manager the names from the last cutoff snapshot.
    pub async fn morning(&self) -> JobOutcome {
        let missed = self.tracker.last_missed();
        let text = self
            .templates
            .morning_digest(self.tracker.roster(), &missed);
        let message = OutgoingMessage::new(self.manager, text);
        let delivered = deliver(self.sink.as_ref(), message, "Morning digest").await;
        JobOutcome {
            kind: JobKind::Morning,
            transition_applied: true,
            delivered: Some(delivered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::config::MessagesConfig;
    use rollcall_core::roster::{Roster, RosterEntry};
    use rollcall_core::testing::MemorySink;
    use rollcall_core::types::ParticipantId;
    use rollcall_core::CyclePhase;

    const GROUP: ChatId = ChatId(-100);
    const MANAGER: ChatId = ChatId(42);
    const A: ParticipantId = ParticipantId(1);
    const B: ParticipantId = ParticipantId(2);
    const C: ParticipantId = ParticipantId(3);

    fn setup(names: &[(ParticipantId, &str)]) -> (Arc<ReportTracker>, Arc<MemorySink>, DailyJobs) {
        let entries = names
            .iter()
            .map(|(id, name)| RosterEntry {
                id: *id,
                name: name.to_string(),
            })
            .collect();
        let tracker = Arc::new(ReportTracker::new(Arc::new(Roster::new(entries).unwrap())));
        let sink = Arc::new(MemorySink::new());
        let templates = Arc::new(Templates::new(MessagesConfig::default(), "#report", "23:00"));
        let jobs = DailyJobs::new(tracker.clone(), sink.clone(), templates, GROUP, MANAGER);
        (tracker, sink, jobs)
    }

    fn abc() -> (Arc<ReportTracker>, Arc<MemorySink>, DailyJobs) {
        setup(&[(A, "Ann"), (B, "Bob"), (C, "Cid")])
    }

    #[tokio::test]
    async fn test_evening_resets_then_reminds_group() {
        let (tracker, sink, jobs) = abc();
        tracker.mark_reported(A);

        let outcome = jobs.run(JobKind::Evening).await;
        assert!(outcome.transition_applied);
        assert_eq!(outcome.delivered, Some(true));
        assert_eq!(tracker.currently_missing(), vec![A, B, C]);

        let sent = sink.sent_to(GROUP);
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("#report"));
        assert!(sink.sent_to(MANAGER).is_empty());
    }

    #[tokio::test]
    async fn test_cutoff_sends_nothing() {
        let (tracker, sink, jobs) = abc();
        jobs.run(JobKind::Evening).await;
        let outcome = jobs.run(JobKind::Cutoff).await;
        assert!(outcome.transition_applied);
        assert_eq!(outcome.delivered, None);
        assert_eq!(tracker.phase(), CyclePhase::Closed);
        assert_eq!(sink.sent().len(), 1); // only the reminder
    }

    #[tokio::test]
    async fn test_one_missing_named_in_digest() {
        let (tracker, sink, jobs) = abc();
        jobs.evening().await;
        tracker.mark_reported(A);
        tracker.mark_reported(B);
        jobs.cutoff();
        assert_eq!(tracker.last_missed(), vec![C]);

        jobs.morning().await;
        let digest = &sink.sent_to(MANAGER)[0].text;
        assert!(digest.ends_with("\nCid"));
        assert!(!digest.contains("Ann"));
        assert!(!digest.contains("Bob"));
    }

    #[tokio::test]
    async fn test_all_missing_listed_in_roster_order() {
        let (tracker, sink, jobs) = abc();
        jobs.evening().await;
        jobs.cutoff();
        assert_eq!(tracker.last_missed(), vec![A, B, C]);

        jobs.morning().await;
        let digest = &sink.sent_to(MANAGER)[0].text;
        assert!(digest.ends_with("\nAnn, Bob, Cid"));
    }

    #[tokio::test]
    async fn test_all_clear_when_everyone_reported() {
        let (tracker, sink, jobs) = setup(&[(A, "Ann"), (B, "Bob")]);
        jobs.evening().await;
        tracker.mark_reported(A);
        tracker.mark_reported(B);
        jobs.cutoff();
        jobs.morning().await;

        let digest = &sink.sent_to(MANAGER)[0].text;
        assert!(digest.contains("Everyone"));
        assert!(!digest.contains("Ann") && !digest.contains("Bob"));
    }

    #[tokio::test]
    async fn test_morning_reads_snapshot_not_live_state() {
        let (tracker, sink, jobs) = abc();
        jobs.evening().await;
        jobs.cutoff();
        // Late reports after the cutoff do not change the digest.
        tracker.mark_reported(A);
        tracker.mark_reported(B);
        tracker.mark_reported(C);
        jobs.morning().await;
        assert!(sink.sent_to(MANAGER)[0].text.ends_with("Ann, Bob, Cid"));
    }

    #[tokio::test]
    async fn test_morning_before_any_cutoff_is_all_clear() {
        let (_tracker, sink, jobs) = abc();
        jobs.morning().await;
        assert!(sink.sent_to(MANAGER)[0].text.contains("Everyone"));
    }

    #[tokio::test]
    async fn test_send_failure_keeps_state_transition() {
        let (tracker, sink, jobs) = abc();
        sink.set_failing(true);
        tracker.mark_reported(A);

        let outcome = jobs.evening().await;
        assert!(outcome.transition_applied);
        assert_eq!(outcome.delivered, Some(false));
        assert_eq!(tracker.phase(), CyclePhase::Open);
        assert_eq!(tracker.currently_missing(), vec![A, B, C]);

        let outcome = jobs.morning().await;
        assert_eq!(outcome.delivered, Some(false));
    }

    #[tokio::test]
    async fn test_out_of_order_evening_still_reminds() {
        let (tracker, sink, jobs) = abc();
        jobs.evening().await;
        tracker.mark_reported(A);

        let outcome = jobs.evening().await;
        assert!(!outcome.transition_applied);
        assert_eq!(tracker.currently_missing(), vec![B, C]);
        assert_eq!(sink.sent_to(GROUP).len(), 2);
    }

    #[tokio::test]
    async fn test_out_of_order_cutoff_keeps_first_snapshot() {
        let (tracker, _sink, jobs) = abc();
        jobs.evening().await;
        jobs.cutoff();
        tracker.mark_reported(A);
        assert!(!jobs.cutoff().transition_applied);
        assert_eq!(tracker.last_missed(), vec![A, B, C]);
    }
}
