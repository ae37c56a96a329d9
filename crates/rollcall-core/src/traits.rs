//! Seams to external collaborators.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::OutgoingMessage;

/// Outbound side of the chat transport.
///
/// Implementations own their timeout and retry policy; callers treat any
/// `Err` as a one-off delivery failure.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sink name for logs.
    fn name(&self) -> &str;

    /// Deliver one message.
    async fn send(&self, message: OutgoingMessage) -> Result<()>;
}
