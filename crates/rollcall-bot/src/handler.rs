//! Inbound message handling: commands first, then report detection.

use std::sync::Arc;

use rollcall_core::config::RollCallConfig;
use rollcall_core::format::Templates;
use rollcall_core::tracker::ReportTracker;
use rollcall_core::types::{ChatId, IncomingMessage, OutgoingMessage};

use crate::commands::Command;

/// How the report marker is matched against message text.
#[derive(Debug, Clone)]
pub struct ReportRule {
    group: ChatId,
    marker: String,
    case_sensitive: bool,
}

impl ReportRule {
    pub fn new(group: ChatId, marker: &str, case_sensitive: bool) -> Self {
        let marker = if case_sensitive {
            marker.to_string()
        } else {
            marker.to_lowercase()
        };
        Self {
            group,
            marker,
            case_sensitive,
        }
    }

    pub fn from_config(config: &RollCallConfig) -> Self {
        Self::new(
            config.group_chat(),
            &config.report_marker,
            config.marker_case_sensitive,
        )
    }

    /// A report is a message in the group chat containing the marker.
    pub fn matches(&self, msg: &IncomingMessage) -> bool {
        if msg.chat_id != self.group {
            return false;
        }
        if self.case_sensitive {
            msg.text.contains(&self.marker)
        } else {
            msg.text.to_lowercase().contains(&self.marker)
        }
    }
}

/// Turns inbound messages into tracker updates and replies.
pub struct ReportHandler {
    tracker: Arc<ReportTracker>,
    templates: Arc<Templates>,
    rule: ReportRule,
    bot_username: Option<String>,
}

impl ReportHandler {
    pub fn new(tracker: Arc<ReportTracker>, templates: Arc<Templates>, rule: ReportRule) -> Self {
        Self {
            tracker,
            templates,
            rule,
            bot_username: None,
        }
    }

    /// Set our own username so commands addressed to other bots are ignored.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Handle one message. Returns the reply to send, if any.
    pub fn handle(&self, msg: &IncomingMessage) -> Option<OutgoingMessage> {
        if let Some(command) = Command::parse(&msg.text, self.bot_username.as_deref()) {
            tracing::debug!("💬 {command:?} from {} in {}", msg.sender_id, msg.chat_id);
            return Some(OutgoingMessage::reply(msg, self.answer(command)));
        }

        if !self.rule.matches(msg) {
            return None;
        }

        let roster = self.tracker.roster();
        let newly = self.tracker.mark_reported(msg.sender_id);
        match roster.name_of(msg.sender_id) {
            Some(name) => tracing::info!(
                "📥 Report from {name} ({}){}",
                msg.sender_id,
                if newly { "" } else { " (repeat)" }
            ),
            None => tracing::info!(
                "📥 Report from {} ({}), not on the roster",
                msg.sender_name.as_deref().unwrap_or("unknown"),
                msg.sender_id
            ),
        }
        Some(OutgoingMessage::reply(msg, self.templates.ack()))
    }

    fn answer(&self, command: Command) -> String {
        match command {
            Command::Start | Command::Help => self.templates.greeting(),
            Command::Who => {
                let missing = self.tracker.currently_missing();
                self.templates.who(self.tracker.roster(), &missing)
            }
        }
    }
}
