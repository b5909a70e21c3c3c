//! Filter predicate: decides which message events count.
//!
//! The predicate is pure; it only reads the event, the user directory and the
//! run's [`FilterConfig`], so shards can evaluate it in any order.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::types::{MessageEvent, UserDirectory, MESSAGE_KIND};

/// Subtypes that mark structural notices rather than user content.
pub const SYSTEM_SUBTYPES: [&str; 5] = [
    "channel_join",
    "channel_leave",
    "bot_message",
    "channel_purpose",
    "channel_topic",
];

/// Date format accepted for `from`/`to` bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filters for one run. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Inclusive lower bound
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound
    pub to: Option<DateTime<Utc>>,
    /// Only count this channel
    pub channel: Option<String>,
    /// Only rank this user (canonical name); does not affect accumulation
    pub user: Option<String>,
    /// Canonical names dropped from the user directory
    pub exclude: HashSet<String>,
}

impl FilterConfig {
    /// Parse a `YYYY-MM-DD` bound into the start of that day, UTC.
    pub fn parse_date(value: &str) -> Result<DateTime<Utc>> {
        let date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
            Error::Config(format!(
                "could not parse date {:?} (expected YYYY-MM-DD): {}",
                value, e
            ))
        })?;
        date.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| Error::Config(format!("date out of range: {}", value)))
    }

    /// Split a comma separated exclusion list. Blank items are ignored.
    pub fn parse_exclude(list: &str) -> HashSet<String> {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether a channel contributes events at all.
    pub fn selects_channel(&self, name: &str) -> bool {
        self.channel.as_deref().map_or(true, |wanted| wanted == name)
    }

    /// Whether a user (by canonical name) appears in the ranking.
    pub fn selects_user(&self, name: &str) -> bool {
        self.user.as_deref().map_or(true, |wanted| wanted == name)
    }

    /// Human-readable time window, e.g. "for all time" or "after 2020-01-01".
    pub fn describe_window(&self) -> String {
        let fmt = |dt: &DateTime<Utc>| dt.format(DATE_FORMAT).to_string();
        match (&self.from, &self.to) {
            (None, None) => "for all time".to_string(),
            (Some(from), None) => format!("after {}", fmt(from)),
            (None, Some(to)) => format!("before {}", fmt(to)),
            (Some(from), Some(to)) => format!("between {} and {}", fmt(from), fmt(to)),
        }
    }

    /// Human-readable channel scope, e.g. "all channels" or "#general".
    pub fn describe_channels(&self) -> String {
        match &self.channel {
            Some(channel) => format!("#{}", channel),
            None => "all channels".to_string(),
        }
    }
}

/// Whether the event kind/subtype can carry user content.
pub fn is_user_content(event: &MessageEvent) -> bool {
    if event.kind != MESSAGE_KIND {
        return false;
    }
    match event.subtype.as_deref() {
        Some(subtype) => !SYSTEM_SUBTYPES.contains(&subtype),
        None => true,
    }
}

/// Whether the event falls inside the (inclusive) time window.
pub fn in_window(event: &MessageEvent, filter: &FilterConfig) -> bool {
    let secs = event.timestamp_secs();
    if let Some(from) = &filter.from {
        if secs < from.timestamp() {
            return false;
        }
    }
    if let Some(to) = &filter.to {
        if secs > to.timestamp() {
            return false;
        }
    }
    true
}

/// Decide whether a single event counts.
pub fn accepts(event: &MessageEvent, users: &UserDirectory, filter: &FilterConfig) -> bool {
    is_user_content(event)
        && !event.user.is_empty()
        && in_window(event, filter)
        && users.contains(&event.user)
}
