//! Telegram Bot channel — long polling + message sending via Bot API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::Stream;
use rollcall_core::config::RollCallConfig;
use rollcall_core::error::{Result, RollCallError};
use rollcall_core::traits::NotificationSink;
use rollcall_core::types::{ChatId, IncomingMessage, OutgoingMessage, ParticipantId};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

/// Long-poll window asked from Telegram, in seconds.
const LONG_POLL_SECS: u64 = 30;
/// Pause after a failed poll round.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Telegram channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
    #[serde(default = "default_send_timeout")]
    pub send_timeout: u64,
}

fn default_api_base() -> String {
    "https://api.telegram.org".into()
}
fn default_poll_interval() -> u64 {
    1
}
fn default_send_timeout() -> u64 {
    10
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base_url: default_api_base(),
            poll_interval: default_poll_interval(),
            send_timeout: default_send_timeout(),
        }
    }

    pub fn from_config(config: &RollCallConfig) -> Self {
        Self {
            bot_token: config.api_token.clone(),
            api_base_url: config.transport.api_base_url.clone(),
            poll_interval: config.transport.poll_interval_secs,
            send_timeout: config.transport.send_timeout_secs,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Telegram Bot channel. Cheap to clone; clones share the HTTP client.
#[derive(Clone)]
pub struct TelegramChannel {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    /// Fetch updates after `offset` using long polling.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<TelegramUpdate>> {
        let response = self
            .client
            .get(self.api_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", LONG_POLL_SECS.to_string()),
                ("allowed_updates", "[\"message\"]".into()),
            ])
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .send()
            .await
            .map_err(|e| RollCallError::Transport(format!("Telegram getUpdates failed: {e}")))?;

        let body: TelegramApiResponse<Vec<TelegramUpdate>> = response
            .json()
            .await
            .map_err(|e| RollCallError::Transport(format!("Invalid Telegram response: {e}")))?;

        body.into_result("getUpdates").map(Option::unwrap_or_default)
    }

    /// Send a plain-text message, optionally as a reply.
    pub async fn send_message(&self, chat_id: ChatId, text: &str, reply_to: Option<i64>) -> Result<()> {
        let mut body = serde_json::json!({
            "chat_id": chat_id.0,
            "text": text,
        });
        if let Some(message_id) = reply_to {
            body["reply_parameters"] = serde_json::json!({
                "message_id": message_id,
                "allow_sending_without_reply": true,
            });
        }

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .timeout(Duration::from_secs(self.config.send_timeout))
            .send()
            .await
            .map_err(|e| RollCallError::Transport(format!("sendMessage failed: {e}")))?;

        let result: TelegramApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| RollCallError::Transport(format!("Invalid send response: {e}")))?;

        result.into_result("sendMessage").map(|_| ())
    }

    /// Get bot info. Used at startup to verify the token.
    pub async fn get_me(&self) -> Result<TelegramUser> {
        let response = self
            .client
            .get(self.api_url("getMe"))
            .timeout(Duration::from_secs(self.config.send_timeout))
            .send()
            .await
            .map_err(|e| RollCallError::Transport(format!("getMe failed: {e}")))?;
        let body: TelegramApiResponse<TelegramUser> = response
            .json()
            .await
            .map_err(|e| RollCallError::Transport(format!("Invalid getMe response: {e}")))?;
        body.into_result("getMe")?
            .ok_or_else(|| RollCallError::Transport("No bot info".into()))
    }

    /// Start the polling loop on a background task and return the stream of
    /// incoming messages. The loop ends when the stream is dropped.
    pub fn start_polling(&self) -> TelegramPollingStream {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let channel = self.clone();

        tokio::spawn(async move {
            let mut last_update_id = 0i64;
            tracing::info!("Telegram polling loop started");

            loop {
                match channel.get_updates(last_update_id + 1).await {
                    Ok(updates) => {
                        for update in updates {
                            last_update_id = last_update_id.max(update.update_id);
                            if let Some(msg) = update.to_incoming()
                                && tx.send(msg).is_err()
                            {
                                tracing::info!("Telegram polling stopped (receiver dropped)");
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!("Telegram polling error: {e}");
                        tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                    }
                }

                if tx.is_closed() {
                    tracing::info!("Telegram polling stopped (receiver dropped)");
                    return;
                }
                tokio::time::sleep(Duration::from_secs(channel.config.poll_interval)).await;
            }
        });

        TelegramPollingStream { rx }
    }
}

/// Stream of incoming Telegram messages from polling.
pub struct TelegramPollingStream {
    rx: tokio::sync::mpsc::UnboundedReceiver<IncomingMessage>,
}

impl Stream for TelegramPollingStream {
    type Item = IncomingMessage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[async_trait]
impl NotificationSink for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, message: OutgoingMessage) -> Result<()> {
        self.send_message(message.chat_id, &message.text, message.reply_to)
            .await
    }
}

// --- Telegram API Types ---

#[derive(Debug, Deserialize)]
pub struct TelegramApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

impl<T> TelegramApiResponse<T> {
    fn into_result(self, method: &str) -> Result<Option<T>> {
        if self.ok {
            Ok(self.result)
        } else {
            Err(RollCallError::Transport(format!(
                "Telegram {method} error: {}",
                self.description.unwrap_or_default()
            )))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub from: Option<TelegramUser>,
    pub chat: TelegramChat,
    pub text: Option<String>,
    /// Captions carry the text of photo/document posts.
    pub caption: Option<String>,
    pub date: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
    pub title: Option<String>,
}

impl TelegramUpdate {
    /// Convert to a RollCall IncomingMessage. Bot messages and updates
    /// without text are dropped.
    pub fn to_incoming(&self) -> Option<IncomingMessage> {
        let msg = self.message.as_ref()?;
        let text = msg.text.as_ref().or(msg.caption.as_ref())?;
        let from = msg.from.as_ref()?;

        if from.is_bot {
            return None;
        }

        Some(IncomingMessage {
            sender_id: ParticipantId(from.id),
            sender_name: Some(format!(
                "{}{}",
                from.first_name,
                from.last_name
                    .as_deref()
                    .map(|l| format!(" {l}"))
                    .unwrap_or_default()
            )),
            chat_id: ChatId(msg.chat.id),
            message_id: msg.message_id,
            text: text.clone(),
            timestamp: DateTime::<Utc>::from_timestamp(msg.date, 0).unwrap_or_else(Utc::now),
        })
    }
}
