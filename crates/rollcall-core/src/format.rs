//! Chat text rendering. Pure functions over configuration and id lists.

use crate::config::{MessagesConfig, RollCallConfig};
use crate::roster::Roster;
use crate::types::ParticipantId;

/// Separator between display names in lists.
pub const NAME_DELIMITER: &str = ", ";

/// Join display names of `ids` in the given order. Ids missing from the
/// roster are rendered as their numeric id.
pub fn join_names(roster: &Roster, ids: &[ParticipantId]) -> String {
    ids.iter()
        .map(|id| match roster.name_of(*id) {
            Some(name) => name.to_string(),
            None => id.to_string(),
        })
        .collect::<Vec<_>>()
        .join(NAME_DELIMITER)
}

/// "HH:MM" for a cron expression with a fixed minute and hour, otherwise
/// the expression itself.
pub fn clock_label(expression: &str) -> String {
    let mut parts = expression.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(m), Some(h)) => match (m.parse::<u32>(), h.parse::<u32>()) {
            (Ok(m), Ok(h)) if m < 60 && h < 24 => format!("{h:02}:{m:02}"),
            _ => expression.to_string(),
        },
        _ => expression.to_string(),
    }
}

/// Message templates with marker and cutoff already bound.
#[derive(Debug, Clone)]
pub struct Templates {
    messages: MessagesConfig,
    marker: String,
    cutoff: String,
}

impl Templates {
    pub fn new(messages: MessagesConfig, marker: &str, cutoff: &str) -> Self {
        Self {
            messages,
            marker: marker.to_string(),
            cutoff: cutoff.to_string(),
        }
    }

    pub fn from_config(config: &RollCallConfig) -> Self {
        Self::new(
            config.messages.clone(),
            &config.report_marker,
            &clock_label(&config.schedule.cutoff),
        )
    }

    fn fill(&self, template: &str) -> String {
        template
            .replace("{marker}", &self.marker)
            .replace("{cutoff}", &self.cutoff)
    }

    pub fn greeting(&self) -> String {
        self.fill(&self.messages.greeting)
    }

    pub fn reminder(&self) -> String {
        self.fill(&self.messages.reminder)
    }

    pub fn ack(&self) -> String {
        self.fill(&self.messages.ack)
    }

    /// Morning message for the manager.
    pub fn morning_digest(&self, roster: &Roster, missed: &[ParticipantId]) -> String {
        if missed.is_empty() {
            self.fill(&self.messages.all_clear)
        } else {
            format!(
                "{}\n{}",
                self.fill(&self.messages.digest_header),
                join_names(roster, missed)
            )
        }
    }

    /// Reply to the `/who` command.
    pub fn who(&self, roster: &Roster, missing: &[ParticipantId]) -> String {
        if missing.is_empty() {
            self.fill(&self.messages.who_all_reported)
        } else {
            format!(
                "{}\n{}",
                self.fill(&self.messages.who_missing_header),
                join_names(roster, missing)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterEntry;

    fn roster() -> Roster {
        Roster::new(
            [(1, "Ivan"), (2, "Petya"), (3, "Masha")]
                .into_iter()
                .map(|(id, name)| RosterEntry {
                    id: ParticipantId(id),
                    name: name.into(),
                })
                .collect(),
        )
        .unwrap()
    }

    fn templates() -> Templates {
        Templates::new(MessagesConfig::default(), "#report", "23:00")
    }

    #[test]
    fn test_join_names() {
        let r = roster();
        let ids = [ParticipantId(1), ParticipantId(3)];
        assert_eq!(join_names(&r, &ids), "Ivan, Masha");
        assert_eq!(join_names(&r, &[]), "");
        assert_eq!(join_names(&r, &[ParticipantId(9)]), "9");
    }

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label("0 23 * * *"), "23:00");
        assert_eq!(clock_label("5 7 * * 1-5"), "07:05");
        assert_eq!(clock_label("*/15 * * * *"), "*/15 * * * *");
    }

    #[test]
    fn test_reminder_placeholders() {
        let text = templates().reminder();
        assert!(text.contains("#report"));
        assert!(text.contains("23:00"));
        assert!(!text.contains('{'));
    }

    #[test]
    fn test_digest_lists_names_in_order() {
        let r = roster();
        let text = templates().morning_digest(&r, &[ParticipantId(1), ParticipantId(2), ParticipantId(3)]);
        assert!(text.ends_with("\nIvan, Petya, Masha"));
        assert!(text.contains("by 23:00"));
    }

    #[test]
    fn test_digest_all_clear_has_no_names() {
        let r = roster();
        let text = templates().morning_digest(&r, &[]);
        assert!(text.contains("Everyone"));
        for (_, name) in r.names() {
            assert!(!text.contains(name));
        }
    }

    #[test]
    fn test_who_reply() {
        let r = roster();
        let t = templates();
        assert_eq!(t.who(&r, &[ParticipantId(2)]), "Not reported yet:\nPetya");
        assert!(t.who(&r, &[]).contains("#report"));
    }
}
