//! Message and identity types shared by the transport, handler and jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a chat participant (Telegram user id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub i64);

/// Identity of a chat: the group, or the manager's private chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Inbound chat message, as delivered by the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub sender_id: ParticipantId,
    pub sender_name: Option<String>,
    pub chat_id: ChatId,
    /// Transport message id, used to thread replies.
    pub message_id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Outbound chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub chat_id: ChatId,
    pub text: String,
    /// Message id to reply to, if any.
    pub reply_to: Option<i64>,
}

impl OutgoingMessage {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_to: None,
        }
    }

    /// Reply threaded to the given inbound message.
    pub fn reply(to: &IncomingMessage, text: impl Into<String>) -> Self {
        Self {
            chat_id: to.chat_id,
            text: text.into(),
            reply_to: Some(to.message_id),
        }
    }
}
