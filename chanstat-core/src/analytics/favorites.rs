//! Favorite-channel selection.

use std::collections::BTreeMap;

/// How many favorite channels a user gets.
pub const FAVORITE_CHANNEL_COUNT: usize = 4;

/// Top channels by affinity count, descending; ties by channel name ascending.
///
/// Returns bare names. Fewer than [`FAVORITE_CHANNEL_COUNT`] channels returns them all.
pub fn favorite_channels(affinity: &BTreeMap<String, u64>) -> Vec<String> {
    let mut pairs: Vec<(&String, &u64)> = affinity.iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    pairs
        .into_iter()
        .take(FAVORITE_CHANNEL_COUNT)
        .map(|(name, _)| name.clone())
        .collect()
}
