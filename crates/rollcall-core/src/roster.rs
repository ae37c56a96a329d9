//! Roster — the fixed list of people expected to report every day.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, RollCallError};
use crate::types::ParticipantId;

/// One tracked participant, as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: ParticipantId,
    pub name: String,
}

/// Immutable roster. Order is the configuration order and is preserved in
/// every missing-list.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<RosterEntry>,
    index: HashMap<ParticipantId, usize>,
}

impl Roster {
    /// Build a roster, rejecting empty lists, blank names and duplicate ids.
    pub fn new(entries: Vec<RosterEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(RollCallError::Config("Roster is empty".into()));
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (pos, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(RollCallError::Config(format!(
                    "Roster entry {} has an empty name",
                    entry.id
                )));
            }
            if index.insert(entry.id, pos).is_some() {
                return Err(RollCallError::Config(format!(
                    "Duplicate roster id {}",
                    entry.id
                )));
            }
        }

        Ok(Self { entries, index })
    }

    /// Parse the `ROSTER` environment format: `id:name,id:name`.
    pub fn parse_entries(spec: &str) -> Result<Vec<RosterEntry>> {
        spec.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|item| {
                let (id, name) = item.split_once(':').ok_or_else(|| {
                    RollCallError::Config(format!("Roster entry '{item}' is not 'id:name'"))
                })?;
                let id: i64 = id.trim().parse().map_err(|_| {
                    RollCallError::Config(format!("Roster entry '{item}' has a non-numeric id"))
                })?;
                Ok(RosterEntry {
                    id: ParticipantId(id),
                    name: name.trim().to_string(),
                })
            })
            .collect()
    }

    /// All `(id, name)` pairs in roster order.
    pub fn names(&self) -> impl Iterator<Item = (ParticipantId, &str)> {
        self.entries.iter().map(|e| (e.id, e.name.as_str()))
    }

    /// Roster ids in order.
    pub fn ids(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn name_of(&self, id: ParticipantId) -> Option<&str> {
        self.index.get(&id).map(|&i| self.entries[i].name.as_str())
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, name: &str) -> RosterEntry {
        RosterEntry {
            id: ParticipantId(id),
            name: name.into(),
        }
    }

    #[test]
    fn test_names_keep_config_order() {
        let roster = Roster::new(vec![entry(3, "Masha"), entry(1, "Ivan"), entry(2, "Petya")])
            .unwrap();
        let names: Vec<_> = roster.names().map(|(_, n)| n).collect();
        assert_eq!(names, vec!["Masha", "Ivan", "Petya"]);
        assert_eq!(roster.name_of(ParticipantId(1)), Some("Ivan"));
        assert!(roster.contains(ParticipantId(2)));
        assert!(!roster.contains(ParticipantId(4)));
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(matches!(
            Roster::new(vec![]),
            Err(RollCallError::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_and_blank_rejected() {
        assert!(Roster::new(vec![entry(1, "A"), entry(1, "B")]).is_err());
        assert!(Roster::new(vec![entry(1, "  ")]).is_err());
    }

    #[test]
    fn test_parse_entries() {
        let entries = Roster::parse_entries("111:Ivan, 222:Petya ,333:Masha").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1], entry(222, "Petya"));
    }

    #[test]
    fn test_parse_entries_malformed() {
        assert!(Roster::parse_entries("111-Ivan").is_err());
        assert!(Roster::parse_entries("abc:Ivan").is_err());
    }
}
