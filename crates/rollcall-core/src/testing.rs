//! In-memory notification sink for tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::{Result, RollCallError};
use crate::traits::NotificationSink;
use crate::types::{ChatId, OutgoingMessage};

/// Records every message it is asked to send. Can be switched to fail.
#[derive(Default)]
pub struct MemorySink {
    sent: Mutex<Vec<OutgoingMessage>>,
    failing: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every send fails with a transport error.
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.set_failing(true);
        sink
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn sent_to(&self, chat: ChatId) -> Vec<OutgoingMessage> {
        self.sent()
            .into_iter()
            .filter(|m| m.chat_id == chat)
            .collect()
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RollCallError::Transport("memory sink set to fail".into()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        Ok(())
    }
}
