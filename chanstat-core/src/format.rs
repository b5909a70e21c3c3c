//! Formatting helpers shared across report renderers.

use chrono::{DateTime, Utc};

/// Format a fraction in `[0, 1]` as a percentage with three decimals (e.g., "66.667%").
pub fn format_percent(fraction: f64) -> String {
    format!("{:.3}%", fraction * 100.0)
}

/// Format an average with two decimals.
pub fn format_ratio(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format channel names as a hash-prefixed list (e.g., "#general, #random").
pub fn format_channels(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("#{}", name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format an optional timestamp as a calendar day, or "-" if missing.
pub fn format_day_opt(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

/// Format a count with thousands separators (e.g., "12,345").
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
