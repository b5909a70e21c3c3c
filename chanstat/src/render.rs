//! Report renderers: boxed terminal tables, markdown and JSON.

use anyhow::Result;
use chanstat_core::analytics::{ChannelRow, UserRow};
use chanstat_core::format::{
    format_channels, format_count, format_day_opt, format_percent, format_ratio,
};
use chanstat_core::types::UserDirectory;
use chanstat_core::EngagementStats;
use serde_json::json;

use crate::RunContext;

const USER_HEADERS: [&str; 10] = [
    "#",
    "User",
    "Messages",
    "% of total",
    "Cumulative",
    "Characters",
    "% of total",
    "Cumulative",
    "Char / Msg",
    "Favorite Channels",
];

const CHANNEL_HEADERS: [&str; 6] = [
    "Channel",
    "Messages",
    "% of messages",
    "Characters",
    "% of characters",
    "Last message",
];

fn print_header(ctx: &RunContext) {
    println!("Using data dump: {}", ctx.dir);
    println!(
        "Showing data for {} {} sorted by {}",
        ctx.filter.describe_channels(),
        ctx.filter.describe_window(),
        ctx.strategy
    );
    let excluded = ctx.excluded();
    if !excluded.is_empty() {
        println!("Excluding these users: {}", excluded.join(", "));
    }
    println!();
}

fn user_cells(row: &UserRow) -> Vec<String> {
    vec![
        row.rank.to_string(),
        row.name.clone(),
        format_count(row.messages),
        format_percent(row.percent),
        format_percent(row.cumulative_percent),
        format_count(row.characters),
        format_percent(row.char_percent),
        format_percent(row.cumulative_char_percent),
        format_ratio(row.verbosity),
        format_channels(&row.favorite_channels),
    ]
}

fn channel_cells(row: &ChannelRow) -> Vec<String> {
    vec![
        format!("#{}", row.name),
        format_count(row.messages),
        format_percent(row.percent),
        format_count(row.characters),
        format_percent(row.char_percent),
        format_day_opt(row.last_message),
    ]
}

/// Draw a box-bordered table. Columns listed in `text_columns` are left aligned.
fn draw_table(headers: &[&str], rows: &[Vec<String>], text_columns: &[usize]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(mid), right)
    };
    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let pad = " ".repeat(widths[i] - cell.chars().count());
                if text_columns.contains(&i) {
                    format!(" {}{} ", cell, pad)
                } else {
                    format!(" {}{} ", pad, cell)
                }
            })
            .collect();
        format!("│{}│\n", padded.join("│"))
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = rule("┌", "┬", "┐");
    out.push_str(&line(header_cells.as_slice()));
    out.push_str(&rule("├", "┼", "┤"));
    for row in rows {
        out.push_str(&line(row.as_slice()));
    }
    out.push_str(&rule("└", "┴", "┘"));
    out
}

fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = format!("| {} |\n", headers.join(" | "));
    out.push_str(&format!("|{}\n", "---|".repeat(headers.len())));
    for row in rows {
        out.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    out
}

pub fn print_users_terminal(ctx: &RunContext, rows: &[UserRow]) {
    print_header(ctx);

    if rows.is_empty() {
        println!("  No users to show.");
        return;
    }

    let cells: Vec<Vec<String>> = rows.iter().map(user_cells).collect();
    print!("{}", draw_table(&USER_HEADERS, &cells, &[1, 9]));
}

pub fn print_users_markdown(ctx: &RunContext, rows: &[UserRow]) {
    println!("# Channel engagement");
    println!();
    println!("- **Data dump:** `{}`", ctx.dir);
    println!(
        "- **Scope:** {} {}",
        ctx.filter.describe_channels(),
        ctx.filter.describe_window()
    );
    println!("- **Sorted by:** {}", ctx.strategy);
    let excluded = ctx.excluded();
    if !excluded.is_empty() {
        println!("- **Excluded:** {}", excluded.join(", "));
    }
    println!();

    let cells: Vec<Vec<String>> = rows.iter().map(user_cells).collect();
    print!("{}", markdown_table(&USER_HEADERS, &cells));
}

fn filters_json(ctx: &RunContext) -> serde_json::Value {
    json!({
        "channel": ctx.filter.channel,
        "user": ctx.filter.user,
        "from": ctx.filter.from.map(|d| d.format("%Y-%m-%d").to_string()),
        "to": ctx.filter.to.map(|d| d.format("%Y-%m-%d").to_string()),
        "exclude": ctx.excluded(),
        "sort": ctx.strategy,
        "limit": ctx.limit,
    })
}

pub fn print_users_json(ctx: &RunContext, stats: &EngagementStats, rows: &[UserRow]) -> Result<()> {
    let output = json!({
        "source": ctx.dir,
        "filters": filters_json(ctx),
        "totals": stats.totals,
        "users": rows,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_channels_terminal(ctx: &RunContext, rows: &[ChannelRow]) {
    print_header(ctx);

    if rows.is_empty() {
        println!("  No channels scanned.");
        return;
    }

    let cells: Vec<Vec<String>> = rows.iter().map(channel_cells).collect();
    print!("{}", draw_table(&CHANNEL_HEADERS, &cells, &[0]));
}

pub fn print_channels_json(
    ctx: &RunContext,
    stats: &EngagementStats,
    rows: &[ChannelRow],
) -> Result<()> {
    let output = json!({
        "source": ctx.dir,
        "filters": filters_json(ctx),
        "totals": stats.totals,
        "channels": rows,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn print_directory(directory: &UserDirectory) -> Result<()> {
    let mut users: Vec<_> = directory.iter().collect();
    users.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    let entries: Vec<serde_json::Value> = users
        .into_iter()
        .map(|u| {
            json!({
                "name": u.name,
                "real_name": u.profile.real_name,
                "display_name": u.profile.display_name,
                "first_name": u.profile.first_name,
                "last_name": u.profile.last_name,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_table_aligns_columns() {
        let rows = vec![
            vec!["1".to_string(), "alice".to_string(), "10".to_string()],
            vec!["2".to_string(), "bo".to_string(), "5".to_string()],
        ];
        let table = draw_table(&["#", "User", "Messages"], &rows, &[1]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "│ # │ User  │ Messages │");
        assert_eq!(lines[3], "│ 1 │ alice │       10 │");
        assert_eq!(lines[4], "│ 2 │ bo    │        5 │");
        assert!(lines[0].starts_with('┌') && lines[5].ends_with('┘'));
    }

    #[test]
    fn test_markdown_table() {
        let rows = vec![vec!["a".to_string(), "1".to_string()]];
        let table = markdown_table(&["User", "Messages"], &rows);
        assert_eq!(table, "| User | Messages |\n|---|---|\n| a | 1 |\n");
    }

    #[test]
    fn test_user_cells_format_favorites() {
        let row = UserRow {
            rank: 1,
            name: "a".to_string(),
            messages: 10,
            percent: 2.0 / 3.0,
            cumulative_percent: 2.0 / 3.0,
            characters: 100,
            char_percent: 100.0 / 180.0,
            cumulative_char_percent: 100.0 / 180.0,
            verbosity: 10.0,
            favorite_channels: vec!["general".to_string(), "random".to_string()],
        };
        let cells = user_cells(&row);
        assert_eq!(cells[3], "66.667%");
        assert_eq!(cells[6], "55.556%");
        assert_eq!(cells[8], "10.00");
        assert_eq!(cells[9], "#general, #random");
    }
}
