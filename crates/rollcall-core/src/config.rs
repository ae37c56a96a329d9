//! RollCall configuration system.
//!
//! Three layers, later wins: built-in defaults, an optional TOML file,
//! then environment variables. `validate()` must pass before startup.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RollCallError};
use crate::roster::{Roster, RosterEntry};
use crate::types::ChatId;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollCallConfig {
    /// Bot API credential.
    #[serde(default)]
    pub api_token: String,
    /// Private chat of the manager who gets the morning digest.
    #[serde(default)]
    pub manager_id: i64,
    /// The group chat where reports are posted.
    #[serde(default)]
    pub group_id: i64,
    /// IANA time zone for all schedules.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Token a message must contain to count as a report.
    #[serde(default = "default_marker")]
    pub report_marker: String,
    #[serde(default = "bool_true")]
    pub marker_case_sensitive: bool,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub roster: Vec<RosterEntry>,
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub transport: TransportConfig,
}

fn default_timezone() -> String { "Europe/Stockholm".into() }
fn default_marker() -> String { "#report".into() }
fn bool_true() -> bool { true }

impl Default for RollCallConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            manager_id: 0,
            group_id: 0,
            timezone: default_timezone(),
            report_marker: default_marker(),
            marker_case_sensitive: true,
            schedule: ScheduleConfig::default(),
            roster: Vec::new(),
            messages: MessagesConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

/// Cron expressions (MIN HOUR DOM MON DOW) for the three daily jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_evening")]
    pub evening: String,
    #[serde(default = "default_cutoff")]
    pub cutoff: String,
    #[serde(default = "default_morning")]
    pub morning: String,
}

fn default_evening() -> String { "0 20 * * *".into() }
fn default_cutoff() -> String { "0 23 * * *".into() }
fn default_morning() -> String { "0 5 * * *".into() }

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            evening: default_evening(),
            cutoff: default_cutoff(),
            morning: default_morning(),
        }
    }
}

/// Chat-facing texts. `{marker}` and `{cutoff}` are substituted where noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Evening reminder; supports `{marker}` and `{cutoff}`.
    #[serde(default = "default_reminder")]
    pub reminder: String,
    #[serde(default = "default_ack")]
    pub ack: String,
    /// Morning message when nobody is missing; supports `{marker}`.
    #[serde(default = "default_all_clear")]
    pub all_clear: String,
    /// First line of the morning digest; supports `{marker}` and `{cutoff}`.
    #[serde(default = "default_digest_header")]
    pub digest_header: String,
    #[serde(default = "default_who_all_reported")]
    pub who_all_reported: String,
    #[serde(default = "default_who_missing_header")]
    pub who_missing_header: String,
}

fn default_greeting() -> String {
    "Hi! I keep track of daily {marker} posts.\n\
     I remind the group in the evening and send the morning list of who did not report.\n\
     Send /who to see who has not reported yet."
        .into()
}
fn default_reminder() -> String {
    "Reminder 🌙\n\nPost your daily {marker} before {cutoff}.\n\
     Just send a message with {marker} in this chat."
        .into()
}
fn default_ack() -> String { "Report received ✅".into() }
fn default_all_clear() -> String { "Good morning! Everyone posted their {marker} yesterday ✅".into() }
fn default_digest_header() -> String {
    "Good morning! These people did not post their {marker} by {cutoff}:".into()
}
fn default_who_all_reported() -> String { "Everyone on the list has posted their {marker} ✅".into() }
fn default_who_missing_header() -> String { "Not reported yet:".into() }

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            reminder: default_reminder(),
            ack: default_ack(),
            all_clear: default_all_clear(),
            digest_header: default_digest_header(),
            who_all_reported: default_who_all_reported(),
            who_missing_header: default_who_missing_header(),
        }
    }
}

/// Chat transport tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Bot API base URL (overridable for tests and self-hosted API servers).
    #[serde(default = "default_api_base")]
    pub api_base_url: String,
    /// Pause between long-poll rounds, in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Timeout for a single send, in seconds.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,
}

fn default_api_base() -> String { "https://api.telegram.org".into() }
fn default_poll_interval() -> u64 { 1 }
fn default_send_timeout() -> u64 { 10 }

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base(),
            poll_interval_secs: default_poll_interval(),
            send_timeout_secs: default_send_timeout(),
        }
    }
}

impl RollCallConfig {
    /// Load defaults, then `path` (or the default path if it exists), then
    /// environment overrides. Does not validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::load_from(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RollCallError::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| RollCallError::Config(format!("Failed to parse config: {e}")))
    }

    /// Default config path (~/.rollcall/config.toml).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rollcall")
            .join("config.toml")
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("API_TOKEN") {
            self.api_token = v;
        }
        if let Some(v) = lookup("MANAGER_ID") {
            self.manager_id = parse_chat_id("MANAGER_ID", &v)?;
        }
        if let Some(v) = lookup("GROUP_ID") {
            self.group_id = parse_chat_id("GROUP_ID", &v)?;
        }
        if let Some(v) = lookup("TIMEZONE") {
            self.timezone = v;
        }
        if let Some(v) = lookup("REPORT_MARKER") {
            self.report_marker = v;
        }
        if let Some(v) = lookup("MARKER_CASE_SENSITIVE") {
            self.marker_case_sensitive = parse_bool("MARKER_CASE_SENSITIVE", &v)?;
        }
        if let Some(v) = lookup("ROSTER") {
            self.roster = Roster::parse_entries(&v)?;
        }
        if let Some(v) = lookup("EVENING_CRON") {
            self.schedule.evening = v;
        }
        if let Some(v) = lookup("CUTOFF_CRON") {
            self.schedule.cutoff = v;
        }
        if let Some(v) = lookup("MORNING_CRON") {
            self.schedule.morning = v;
        }
        Ok(())
    }

    /// Check required fields. Cron expressions are checked by the scheduler
    /// when it builds the job plan.
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(RollCallError::Config("API_TOKEN is not set".into()));
        }
        if self.manager_id == 0 {
            return Err(RollCallError::Config("MANAGER_ID is not set".into()));
        }
        if self.group_id == 0 {
            return Err(RollCallError::Config("GROUP_ID is not set".into()));
        }
        if self.report_marker.is_empty() {
            return Err(RollCallError::Config("Report marker is empty".into()));
        }
        self.tz()?;
        self.build_roster()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| RollCallError::Config(format!("Unknown time zone '{}'", self.timezone)))
    }

    pub fn build_roster(&self) -> Result<Roster> {
        Roster::new(self.roster.clone())
    }

    pub fn manager_chat(&self) -> ChatId {
        ChatId(self.manager_id)
    }

    pub fn group_chat(&self) -> ChatId {
        ChatId(self.group_id)
    }
}

fn parse_chat_id(key: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| RollCallError::Config(format!("{key} must be an integer, got '{value}'")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RollCallError::Config(format!(
            "{key} must be true or false, got '{value}'"
        ))),
    }
}
