//! Aggregation accumulator.
//!
//! A [`Tally`] holds the running counters for some subset of the corpus, typically one
//! channel-day shard. Recording is per event; merging is per key (sum counters, max
//! timestamps, additive union of affinity maps), so any sharding of the events gives
//! the same merged tally.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::types::{MessageEvent, Totals};

/// Counters for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTally {
    pub messages: u64,
    pub characters: u64,
    /// Channel name -> messages sent there
    pub channels: BTreeMap<String, u64>,
}

/// Counters for one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTally {
    pub messages: u64,
    pub characters: u64,
    pub last_message: Option<DateTime<Utc>>,
}

/// Partial or complete accumulation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    /// Keyed by user id
    pub users: HashMap<String, UserTally>,
    /// Keyed by channel name
    pub channels: HashMap<String, ChannelTally>,
    pub totals: Totals,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one qualifying event posted in `channel`.
    ///
    /// The user, the channel and the grand totals move together.
    pub fn record(&mut self, channel: &str, event: &MessageEvent) {
        let chars = event.char_count();

        let user = self.users.entry(event.user.clone()).or_default();
        user.messages += 1;
        user.characters += chars;
        *user.channels.entry(channel.to_string()).or_insert(0) += 1;

        let entry = self.channels.entry(channel.to_string()).or_default();
        entry.messages += 1;
        entry.characters += chars;
        entry.last_message = latest(entry.last_message, event.timestamp());

        self.totals.messages += 1;
        self.totals.characters += chars;
    }

    /// Fold another tally into this one.
    pub fn merge(&mut self, other: Tally) {
        for (id, theirs) in other.users {
            let ours = self.users.entry(id).or_default();
            ours.messages += theirs.messages;
            ours.characters += theirs.characters;
            for (channel, count) in theirs.channels {
                *ours.channels.entry(channel).or_insert(0) += count;
            }
        }

        for (name, theirs) in other.channels {
            let ours = self.channels.entry(name).or_default();
            ours.messages += theirs.messages;
            ours.characters += theirs.characters;
            ours.last_message = latest(ours.last_message, theirs.last_message);
        }

        self.totals.messages += other.totals.messages;
        self.totals.characters += other.totals.characters;
    }

    /// Owned merge, for use as a reduction operator.
    pub fn merged(mut self, other: Tally) -> Tally {
        // Fold the smaller side into the larger one.
        if self.users.len() < other.users.len() {
            let mut other = other;
            other.merge(self);
            return other;
        }
        self.merge(other);
        self
    }
}

fn latest(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
