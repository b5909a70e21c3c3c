//! Analytics module for chanstat
//!
//! The aggregation and ranking engine:
//! - [`filter`]: which message events count
//! - [`accumulator`]: shard-local tallies and their associative merge
//! - [`normalize`]: percentages against grand totals
//! - [`favorites`]: top four channels per user
//! - [`ranking`]: ordering users and channels for display
//! - [`report`]: presentation rows with cumulative percentages
//! - [`pipeline`]: the end-to-end run over an [`EventSource`](crate::ingest::EventSource)
//!
//! Stages pass owned registries along; nothing here keeps global state.

pub mod accumulator;
pub mod favorites;
pub mod filter;
pub mod normalize;
pub mod pipeline;
pub mod ranking;
pub mod report;

use std::collections::HashMap;

use crate::types::{ChannelMeta, ChannelRecord, Totals, UserDirectory, UserRecord};

pub use accumulator::{ChannelTally, Tally, UserTally};
pub use favorites::{favorite_channels, FAVORITE_CHANNEL_COUNT};
pub use filter::{accepts, FilterConfig, SYSTEM_SUBTYPES};
pub use normalize::{normalize, ratio};
pub use pipeline::{analyze, analyze_with_progress, tally_events};
pub use ranking::{rank, rank_channels, rank_users, SortStrategy};
pub use report::{channel_rows, user_rows, ChannelRow, UserRow};

/// Result of one run: every user and scanned channel with final counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngagementStats {
    /// Keyed by user id
    pub users: HashMap<String, UserRecord>,
    /// Keyed by channel name
    pub channels: HashMap<String, ChannelRecord>,
    pub totals: Totals,
}

impl EngagementStats {
    /// Build records from the directory and scanned channels, then copy the merged
    /// tally's counters onto them. Percentages are left for [`normalize`].
    ///
    /// Users without qualifying events keep zeroed counters; they still rank.
    pub fn assemble(directory: &UserDirectory, channels: Vec<ChannelMeta>, tally: Tally) -> Self {
        let mut users: HashMap<String, UserRecord> = directory
            .iter()
            .map(|meta| (meta.id.clone(), UserRecord::from_meta(meta.clone())))
            .collect();
        let mut records: HashMap<String, ChannelRecord> = channels
            .into_iter()
            .map(|meta| (meta.name.clone(), ChannelRecord::from_meta(meta)))
            .collect();

        for (id, counts) in tally.users {
            match users.get_mut(&id) {
                Some(user) => {
                    user.messages = counts.messages;
                    user.characters = counts.characters;
                    user.channels = counts.channels;
                }
                None => tracing::warn!(user = %id, "Tally has counts for a user outside the directory"),
            }
        }

        for (name, counts) in tally.channels {
            match records.get_mut(&name) {
                Some(channel) => {
                    channel.messages = counts.messages;
                    channel.characters = counts.characters;
                    channel.last_message = counts.last_message;
                }
                None => tracing::warn!(channel = %name, "Tally has counts for an unscanned channel"),
            }
        }

        Self {
            users,
            channels: records,
            totals: tally.totals,
        }
    }

    /// Users with at least one qualifying message.
    pub fn active_users(&self) -> usize {
        self.users.values().filter(|u| u.messages > 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageEvent, UserMeta, MESSAGE_KIND};
    use std::collections::HashSet;

    #[test]
    fn test_assemble_keeps_silent_users() {
        let directory = UserDirectory::from_entries(
            vec![
                UserMeta {
                    id: "U1".into(),
                    name: "alice".into(),
                    ..Default::default()
                },
                UserMeta {
                    id: "U2".into(),
                    name: "bob".into(),
                    ..Default::default()
                },
            ],
            &HashSet::new(),
        );
        let mut tally = Tally::new();
        tally.record(
            "general",
            &MessageEvent {
                kind: MESSAGE_KIND.into(),
                user: "U1".into(),
                ts: 42.0,
                text: "hey".into(),
                ..Default::default()
            },
        );

        let stats = EngagementStats::assemble(
            &directory,
            vec![ChannelMeta {
                name: "general".into(),
                ..Default::default()
            }],
            tally,
        );

        assert_eq!(stats.users.len(), 2);
        assert_eq!(stats.active_users(), 1);
        assert_eq!(stats.users["U1"].characters, 3);
        assert_eq!(stats.users["U2"].messages, 0);
        assert_eq!(stats.channels["general"].messages, 1);
        assert_eq!(stats.totals.messages, 1);
    }
}
