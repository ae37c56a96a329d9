//! # RollCall Bot
//! Inbound side of the bot: report detection, commands, and the event loop
//! that feeds the tracker from the transport stream.

pub mod commands;
pub mod handler;

use std::sync::Arc;

use futures::{Stream, StreamExt};
use rollcall_core::traits::NotificationSink;
use rollcall_core::types::IncomingMessage;
use rollcall_scheduler::dispatch::deliver_detached;

pub use commands::Command;
pub use handler::{ReportHandler, ReportRule};

/// Drives the handler from an inbound message stream.
pub struct ReportBot {
    handler: Arc<ReportHandler>,
    sink: Arc<dyn NotificationSink>,
}

impl ReportBot {
    pub fn new(handler: Arc<ReportHandler>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { handler, sink }
    }

    /// Process messages until the stream ends. Replies are sent on their
    /// own tasks so a slow transport never holds up the next message.
    pub async fn run<S>(&self, mut stream: S)
    where
        S: Stream<Item = IncomingMessage> + Unpin,
    {
        tracing::info!("🤖 Listening for reports");
        while let Some(msg) = stream.next().await {
            if let Some(reply) = self.handler.handle(&msg) {
                let _ = deliver_detached(Arc::clone(&self.sink), reply, "Reply");
            }
        }
        tracing::info!("Inbound stream closed");
    }
}
