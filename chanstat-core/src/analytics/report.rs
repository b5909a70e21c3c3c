//! Presentation rows for ranked users.
//!
//! Cumulative percentages are a running sum over the ranked and limited sequence;
//! they live on the row, never on the [`UserRecord`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{ChannelRecord, UserRecord};

/// One line of the user report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRow {
    /// 1-based position in the ranking
    pub rank: usize,
    pub name: String,
    pub messages: u64,
    pub percent: f64,
    pub cumulative_percent: f64,
    pub characters: u64,
    pub char_percent: f64,
    pub cumulative_char_percent: f64,
    /// Average characters per message
    pub verbosity: f64,
    pub favorite_channels: Vec<String>,
}

/// One line of the channel report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelRow {
    pub name: String,
    pub messages: u64,
    pub percent: f64,
    pub characters: u64,
    pub char_percent: f64,
    pub last_message: Option<DateTime<Utc>>,
}

impl From<&ChannelRecord> for ChannelRow {
    fn from(channel: &ChannelRecord) -> Self {
        Self {
            name: channel.name.clone(),
            messages: channel.messages,
            percent: channel.percent,
            characters: channel.characters,
            char_percent: channel.char_percent,
            last_message: channel.last_message,
        }
    }
}

/// Build report rows for the first `limit` ranked users.
pub fn user_rows(ranked: &[&UserRecord], limit: usize) -> Vec<UserRow> {
    let mut cumulative_percent = 0.0;
    let mut cumulative_char_percent = 0.0;

    ranked
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, user)| {
            cumulative_percent += user.percent;
            cumulative_char_percent += user.char_percent;
            UserRow {
                rank: i + 1,
                name: user.name.clone(),
                messages: user.messages,
                percent: user.percent,
                cumulative_percent,
                characters: user.characters,
                char_percent: user.char_percent,
                cumulative_char_percent,
                verbosity: user.verbosity(),
                favorite_channels: user.favorite_channels(),
            }
        })
        .collect()
}

/// Build report rows for ranked channels.
pub fn channel_rows(ranked: &[&ChannelRecord]) -> Vec<ChannelRow> {
    ranked.iter().map(|c| ChannelRow::from(*c)).collect()
}
