//! # RollCall Core
//! Shared types, configuration, roster and the daily report tracker.
//!
//! ## Daily cycle
//! ```text
//! 20:00 evening  → reset_for_new_day()  → reminder to the group   (Open)
//! 23:00 cutoff   → snapshot_missed()                               (Closed)
//! 05:00 morning  → last_missed()        → digest to the manager
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod roster;
#[cfg(feature = "testing")]
pub mod testing;
pub mod tracker;
pub mod traits;
pub mod types;

pub use config::RollCallConfig;
pub use error::{Result, RollCallError};
pub use roster::Roster;
pub use tracker::{CyclePhase, ReportTracker};
pub use traits::NotificationSink;
pub use types::{ChatId, IncomingMessage, OutgoingMessage, ParticipantId};
