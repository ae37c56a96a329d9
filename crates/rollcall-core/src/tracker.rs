//! Daily report tracker — who reported in the current day-cycle, and who
//! was missing at the last cutoff.
//!
//! All state sits behind one mutex. Every method locks, does its read or
//! write, and returns; nothing here awaits, so the lock is never held
//! across a network call.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Result, RollCallError};
use crate::roster::Roster;
use crate::types::ParticipantId;

/// Position in the daily cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePhase {
    /// Started, no evening reset yet. Reports are accepted.
    Fresh,
    /// After the evening reset, before the cutoff.
    Open,
    /// After the cutoff snapshot, until the next evening reset.
    Closed,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Fresh => "fresh",
            Self::Open => "open",
            Self::Closed => "closed",
        })
    }
}

struct DayState {
    reported: HashSet<ParticipantId>,
    missed: Vec<ParticipantId>,
    phase: CyclePhase,
}

impl DayState {
    fn missing(&self, roster: &Roster) -> Vec<ParticipantId> {
        roster
            .ids()
            .filter(|id| !self.reported.contains(id))
            .collect()
    }
}

/// Owner of the reported set and the missed snapshot.
pub struct ReportTracker {
    roster: Arc<Roster>,
    state: Mutex<DayState>,
}

impl ReportTracker {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self {
            roster,
            state: Mutex::new(DayState {
                reported: HashSet::new(),
                missed: Vec::new(),
                phase: CyclePhase::Fresh,
            }),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    fn state(&self) -> MutexGuard<'_, DayState> {
        // No critical section can leave partial state behind; poisoning is ignored.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a report. Idempotent; unknown ids are stored too.
    /// Returns true if the id was not yet recorded this cycle.
    pub fn mark_reported(&self, id: ParticipantId) -> bool {
        let inserted = self.state().reported.insert(id);
        if inserted {
            tracing::debug!("📝 Report recorded for {id}");
        }
        inserted
    }

    /// Roster ids without a report this cycle, in roster order.
    pub fn currently_missing(&self) -> Vec<ParticipantId> {
        self.state().missing(&self.roster)
    }

    /// Clear the reported set and open a new day-cycle.
    ///
    /// Rejected while the cycle is already open: a second reset without a
    /// cutoff in between would throw away the day's reports.
    ///
    /// Trade-off: if a cutoff is missed, the refused reset leaves the open
    /// cycle running, so reports from the previous day still count at the
    /// next cutoff and those people are not listed as missing. The previous
    /// `last_missed()` snapshot is kept unchanged in that case.
    pub fn reset_for_new_day(&self) -> Result<()> {
        let mut state = self.state();
        if state.phase == CyclePhase::Open {
            return Err(RollCallError::OutOfOrder {
                operation: "reset",
                phase: state.phase,
            });
        }
        let cleared = state.reported.len();
        state.reported.clear();
        state.phase = CyclePhase::Open;
        drop(state);

        tracing::info!("🔄 Day-cycle opened ({cleared} reports cleared)");
        Ok(())
    }

    /// Fix the missing-list for the cycle and close it.
    ///
    /// Rejected while the cycle is already closed, so the first snapshot
    /// of a cycle is the one the morning digest sees.
    pub fn snapshot_missed(&self) -> Result<Vec<ParticipantId>> {
        let mut state = self.state();
        if state.phase == CyclePhase::Closed {
            return Err(RollCallError::OutOfOrder {
                operation: "snapshot",
                phase: state.phase,
            });
        }
        let missed = state.missing(&self.roster);
        state.missed = missed.clone();
        state.phase = CyclePhase::Closed;
        drop(state);

        tracing::info!(
            "🔒 Day-cycle closed: {} of {} missing",
            missed.len(),
            self.roster.len()
        );
        Ok(missed)
    }

    /// The snapshot from the last cutoff. Empty before the first cutoff.
    pub fn last_missed(&self) -> Vec<ParticipantId> {
        self.state().missed.clone()
    }

    pub fn phase(&self) -> CyclePhase {
        self.state().phase
    }

    /// Number of distinct ids recorded this cycle, roster or not.
    pub fn reported_count(&self) -> usize {
        self.state().reported.len()
    }
}
