//! RollCall error types.

use crate::tracker::CyclePhase;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RollCallError>;

#[derive(Debug, thiserror::Error)]
pub enum RollCallError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sending or receiving through the chat transport failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A day-cycle transition was requested in the wrong phase.
    #[error("{operation} rejected: day-cycle is {phase}")]
    OutOfOrder {
        operation: &'static str,
        phase: CyclePhase,
    },
}

impl RollCallError {
    /// Whether the process can keep running after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
