//! Outbound delivery. A failed send is logged and dropped: no retry, no
//! effect on tracker state.

use std::sync::Arc;

use rollcall_core::traits::NotificationSink;
use rollcall_core::types::OutgoingMessage;
use tokio::task::JoinHandle;

/// Send one message and log the outcome. Returns whether it was delivered.
pub async fn deliver(sink: &dyn NotificationSink, message: OutgoingMessage, label: &str) -> bool {
    let chat_id = message.chat_id;
    match sink.send(message).await {
        Ok(()) => {
            tracing::info!("✅ {label} sent to {chat_id} via {}", sink.name());
            true
        }
        Err(e) => {
            tracing::warn!("⚠️ {label} to {chat_id} not delivered: {e}");
            false
        }
    }
}

/// Deliver on a separate task so the caller never waits on the transport.
pub fn deliver_detached(
    sink: Arc<dyn NotificationSink>,
    message: OutgoingMessage,
    label: &'static str,
) -> JoinHandle<bool> {
    tokio::spawn(async move { deliver(sink.as_ref(), message, label).await })
}
