//! Percentage normalization against grand totals.

use super::EngagementStats;

/// `part / whole`, defined as 0 when `whole` is 0.
pub fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Fill in `percent`/`char_percent` on every user and channel.
///
/// Every record is divided by the same grand totals, never by a per-entity total.
pub fn normalize(stats: &mut EngagementStats) {
    let totals = stats.totals;

    for user in stats.users.values_mut() {
        user.percent = ratio(user.messages, totals.messages);
        user.char_percent = ratio(user.characters, totals.characters);
    }

    for channel in stats.channels.values_mut() {
        channel.percent = ratio(channel.messages, totals.messages);
        channel.char_percent = ratio(channel.characters, totals.characters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChannelMeta, ChannelRecord, Totals, UserMeta, UserRecord};

    fn user(id: &str, messages: u64, characters: u64) -> UserRecord {
        let mut record = UserRecord::from_meta(UserMeta {
            id: id.to_string(),
            name: id.to_lowercase(),
            ..Default::default()
        });
        record.messages = messages;
        record.characters = characters;
        record
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(5, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
    }

    #[test]
    fn test_empty_corpus_yields_exact_zeros() {
        let mut stats = EngagementStats::default();
        stats.users.insert("A".into(), user("A", 0, 0));
        stats.channels.insert(
            "general".into(),
            ChannelRecord::from_meta(ChannelMeta {
                name: "general".into(),
                ..Default::default()
            }),
        );

        normalize(&mut stats);

        let a = &stats.users["A"];
        assert_eq!(a.percent, 0.0);
        assert_eq!(a.char_percent, 0.0);
        assert!(!a.percent.is_nan());
        assert_eq!(stats.channels["general"].percent, 0.0);
    }

    #[test]
    fn test_percentages_use_grand_totals() {
        let mut stats = EngagementStats {
            totals: Totals {
                messages: 15,
                characters: 180,
            },
            ..Default::default()
        };
        stats.users.insert("A".into(), user("A", 10, 100));
        stats.users.insert("B".into(), user("B", 5, 80));

        normalize(&mut stats);

        assert!((stats.users["A"].percent - 2.0 / 3.0).abs() < 1e-9);
        assert!((stats.users["B"].percent - 1.0 / 3.0).abs() < 1e-9);
        assert!((stats.users["B"].char_percent - 80.0 / 180.0).abs() < 1e-9);

        let sum: f64 = stats.users.values().map(|u| u.percent).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
