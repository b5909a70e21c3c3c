//! Multi-criteria ranking of users (and channels) for presentation.
//!
//! Registries are hash maps, so every ordering here ends with an explicit
//! name-ascending tie-break.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use super::EngagementStats;
use crate::types::{ChannelRecord, UserRecord};

/// Ranking strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// Message count, descending
    #[default]
    Messages,
    /// Character count, descending
    Characters,
    /// Average characters per message, descending
    Verbosity,
}

impl SortStrategy {
    pub const ALL: [SortStrategy; 3] = [
        SortStrategy::Messages,
        SortStrategy::Characters,
        SortStrategy::Verbosity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortStrategy::Messages => "messages",
            SortStrategy::Characters => "characters",
            SortStrategy::Verbosity => "verbosity",
        }
    }

    /// Look a strategy up by name; anything unrecognized ranks by messages.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "messages" => SortStrategy::Messages,
            "characters" => SortStrategy::Characters,
            "verbosity" => SortStrategy::Verbosity,
            other => {
                tracing::warn!(strategy = %other, "Unknown sort strategy, falling back to messages");
                SortStrategy::Messages
            }
        }
    }

    /// Compare two users under this strategy (best first), ignoring ties.
    fn compare(&self, a: &UserRecord, b: &UserRecord) -> Ordering {
        match self {
            SortStrategy::Messages => b.messages.cmp(&a.messages),
            SortStrategy::Characters => b.characters.cmp(&a.characters),
            SortStrategy::Verbosity => b.verbosity().total_cmp(&a.verbosity()),
        }
    }

    /// Total order: strategy key, then canonical name, then id.
    pub fn ordering(&self, a: &UserRecord, b: &UserRecord) -> Ordering {
        self.compare(a, b)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order users for display, optionally restricted to one canonical name.
pub fn rank<'a, I>(users: I, strategy: SortStrategy, only_user: Option<&str>) -> Vec<&'a UserRecord>
where
    I: IntoIterator<Item = &'a UserRecord>,
{
    let mut ranked: Vec<&UserRecord> = users
        .into_iter()
        .filter(|u| only_user.map_or(true, |name| u.name == name))
        .collect();
    ranked.sort_by(|a, b| strategy.ordering(a, b));
    ranked
}

/// Order every user in `stats`.
pub fn rank_users<'a>(
    stats: &'a EngagementStats,
    strategy: SortStrategy,
    only_user: Option<&str>,
) -> Vec<&'a UserRecord> {
    rank(stats.users.values(), strategy, only_user)
}

/// Channels by message count descending, then name ascending.
pub fn rank_channels(stats: &EngagementStats) -> Vec<&ChannelRecord> {
    let mut ranked: Vec<&ChannelRecord> = stats.channels.values().collect();
    ranked.sort_by(|a, b| b.messages.cmp(&a.messages).then_with(|| a.name.cmp(&b.name)));
    ranked
}
