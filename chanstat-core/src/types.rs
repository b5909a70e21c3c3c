//! Core domain types for chanstat
//!
//! These types describe the exported workspace (users, channels, message events) and the
//! per-entity records the analytics pipeline fills in.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **User** | A workspace member, keyed by its export id |
//! | **Canonical name** | The user's `name` handle; filters and tie-breaks use it, never the id |
//! | **Channel** | A conversation space; its export directory holds one file per day |
//! | **Qualifying event** | A message event the filter accepts |
//! | **Affinity** | Per-user count of qualifying messages sent into one channel |
//! | **Grand totals** | Corpus-wide message/character counts, the denominators of every percentage |
//! | **Verbosity** | Average characters per message for a user |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

// ============================================
// Metadata
// ============================================

/// Display-name variants attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub real_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// A user directory entry as found in the export metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMeta {
    #[serde(default)]
    pub id: String,
    /// Canonical name (the handle, not the display name)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile: UserProfile,
}

/// A channel directory entry as found in the export metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_archived: bool,
    /// Member ids; informational only
    #[serde(default)]
    pub members: Vec<String>,
}

/// Users eligible to author qualifying events, keyed by id.
///
/// Entries with an empty id and entries whose canonical name is excluded never make it in,
/// so an excluded author looks exactly like an unknown one to the filter.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    entries: HashMap<String, UserMeta>,
}

impl UserDirectory {
    /// Build the directory, dropping empty ids and excluded names.
    ///
    /// A later entry with an id already present replaces the earlier one.
    pub fn from_entries<I>(entries: I, exclude: &HashSet<String>) -> Self
    where
        I: IntoIterator<Item = UserMeta>,
    {
        let mut directory = HashMap::new();
        for entry in entries {
            if entry.id.is_empty() {
                continue;
            }
            if exclude.contains(&entry.name) {
                tracing::debug!(user = %entry.name, "Excluding user from directory");
                continue;
            }
            directory.insert(entry.id.clone(), entry);
        }
        Self { entries: directory }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&UserMeta> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserMeta> {
        self.entries.values()
    }
}

// ============================================
// Events
// ============================================

/// The only event kind that can carry user content.
pub const MESSAGE_KIND: &str = "message";

/// A single message event from a day batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageEvent {
    /// Event kind (`message` for anything a person typed)
    pub kind: String,
    /// Optional subtype (`channel_join`, `bot_message`, ...)
    pub subtype: Option<String>,
    /// Author id; empty when the event has no human author
    pub user: String,
    /// Seconds since the Unix epoch, with fractional part
    pub ts: f64,
    pub text: String,
}

impl MessageEvent {
    /// Timestamp truncated to whole seconds.
    pub fn timestamp_secs(&self) -> i64 {
        self.ts.floor() as i64
    }

    /// Timestamp at whole-second resolution, `None` if out of range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp_secs(), 0)
    }

    /// Length of the text in Unicode scalar values.
    pub fn char_count(&self) -> u64 {
        self.text.chars().count() as u64
    }
}

// ============================================
// Records
// ============================================

/// Grand totals over every qualifying event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub messages: u64,
    pub characters: u64,
}

/// Per-user statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub profile: UserProfile,
    pub messages: u64,
    pub characters: u64,
    /// Share of all qualifying messages (0.0..=1.0)
    pub percent: f64,
    /// Share of all qualifying characters (0.0..=1.0)
    pub char_percent: f64,
    /// Channel name -> messages sent there
    pub channels: BTreeMap<String, u64>,
}

impl UserRecord {
    /// A record with zeroed counters.
    pub fn from_meta(meta: UserMeta) -> Self {
        Self {
            id: meta.id,
            name: meta.name,
            profile: meta.profile,
            messages: 0,
            characters: 0,
            percent: 0.0,
            char_percent: 0.0,
            channels: BTreeMap::new(),
        }
    }

    /// Average characters per message, 0 for a silent user.
    pub fn verbosity(&self) -> f64 {
        if self.messages == 0 {
            0.0
        } else {
            self.characters as f64 / self.messages as f64
        }
    }

    /// The user's top channels, most active first.
    pub fn favorite_channels(&self) -> Vec<String> {
        crate::analytics::favorite_channels(&self.channels)
    }
}

/// Per-channel statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRecord {
    pub name: String,
    pub is_archived: bool,
    pub members: Vec<String>,
    pub messages: u64,
    pub characters: u64,
    pub percent: f64,
    pub char_percent: f64,
    /// Most recent qualifying message, whole seconds
    pub last_message: Option<DateTime<Utc>>,
}

impl ChannelRecord {
    /// A record with zeroed counters.
    pub fn from_meta(meta: ChannelMeta) -> Self {
        Self {
            name: meta.name,
            is_archived: meta.is_archived,
            members: meta.members,
            messages: 0,
            characters: 0,
            percent: 0.0,
            char_percent: 0.0,
            last_message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, name: &str) -> UserMeta {
        UserMeta {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_directory_drops_empty_ids_and_excluded_names() {
        let exclude: HashSet<String> = ["slackbot".to_string()].into_iter().collect();
        let directory = UserDirectory::from_entries(
            vec![meta("U1", "alice"), meta("", "ghost"), meta("USB", "slackbot")],
            &exclude,
        );

        assert_eq!(directory.len(), 1);
        assert!(directory.contains("U1"));
        assert!(!directory.contains("USB"));
        assert!(!directory.contains(""));
    }

    #[test]
    fn test_directory_duplicate_id_keeps_last_entry() {
        let directory = UserDirectory::from_entries(
            vec![meta("U1", "alice"), meta("U1", "alice2")],
            &HashSet::new(),
        );
        assert_eq!(directory.get("U1").map(|m| m.name.as_str()), Some("alice2"));
    }

    #[test]
    fn test_char_count_uses_scalar_values() {
        let event = MessageEvent {
            text: "héllo 👋".to_string(),
            ..Default::default()
        };
        assert_eq!(event.char_count(), 7);
        assert!(event.text.len() > 7);
    }

    #[test]
    fn test_timestamp_truncates_fraction() {
        let event = MessageEvent {
            ts: 1_500_000_000.987_654,
            ..Default::default()
        };
        assert_eq!(event.timestamp_secs(), 1_500_000_000);
        assert_eq!(event.timestamp().map(|t| t.timestamp()), Some(1_500_000_000));
    }

    #[test]
    fn test_verbosity_of_silent_user_is_zero() {
        let mut record = UserRecord::from_meta(meta("U1", "alice"));
        assert_eq!(record.verbosity(), 0.0);

        record.messages = 4;
        record.characters = 10;
        assert_eq!(record.verbosity(), 2.5);
    }
}
