//! chanstat - engagement statistics for exported chat workspaces
//!
//! Reads a Slack-style export directory and prints who talks the most, where,
//! and at what length.

mod render;

use std::collections::HashSet;

use anyhow::{Context, Result};
use chanstat_core::analytics::{
    analyze_with_progress, channel_rows, rank_channels, rank_users, user_rows, FilterConfig,
    SortStrategy,
};
use chanstat_core::config::validate_limit;
use chanstat_core::ingest::{EventSource, SlackExport};
use chanstat_core::types::UserDirectory;
use chanstat_core::{Config, EngagementStats};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser, Debug)]
#[command(name = "chanstat")]
#[command(about = "Who talks the most in your chat workspace export")]
#[command(version)]
struct Args {
    /// Export directory containing users.json and channels.json
    #[arg(long, default_value = ".")]
    dir: String,

    /// Only count messages from the start of this day (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Only count messages up to the start of this day (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// Only scan this channel
    #[arg(long)]
    channel: Option<String>,

    /// Only show this user (by canonical name); totals still cover everyone
    #[arg(long)]
    user: Option<String>,

    /// Comma separated canonical names to leave out entirely
    #[arg(long)]
    exclude: Option<String>,

    /// Ranking: messages, characters or verbosity
    #[arg(long)]
    sort: Option<String>,

    /// Maximum number of users to show
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Report to print (users, channels, directory)
    #[arg(long, default_value = "users")]
    report: String,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Do not draw a progress bar
    #[arg(long)]
    no_progress: bool,
}

/// Everything a renderer needs to describe the run.
pub struct RunContext {
    pub dir: String,
    pub filter: FilterConfig,
    pub strategy: SortStrategy,
    pub limit: usize,
}

impl RunContext {
    /// Excluded names in stable order.
    pub fn excluded(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filter.exclude.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = chanstat_core::logging::init(&config.logging).ok();

    let ctx = build_context(&args, &config)?;
    let export = SlackExport::open(&args.dir)
        .with_context(|| format!("failed to open export at {}", args.dir))?;

    tracing::info!(
        dir = %args.dir,
        report = %args.report,
        sort = %ctx.strategy,
        limit = ctx.limit,
        "chanstat starting"
    );

    match args.report.as_str() {
        "users" => {
            let stats = run_analysis(&export, &ctx.filter, !args.no_progress)?;
            let ranked = rank_users(&stats, ctx.strategy, ctx.filter.user.as_deref());
            let rows = user_rows(&ranked, ctx.limit);
            match args.export.as_deref() {
                Some("json") => render::print_users_json(&ctx, &stats, &rows)?,
                Some("md") => render::print_users_markdown(&ctx, &rows),
                Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
                None => render::print_users_terminal(&ctx, &rows),
            }
        }
        "channels" => {
            let stats = run_analysis(&export, &ctx.filter, !args.no_progress)?;
            let rows = channel_rows(&rank_channels(&stats));
            match args.export.as_deref() {
                Some("json") => render::print_channels_json(&ctx, &stats, &rows)?,
                Some(other) => anyhow::bail!("Unknown export format: {}. Use 'json'", other),
                None => render::print_channels_terminal(&ctx, &rows),
            }
        }
        "directory" => {
            let users = export.users().context("failed to read user directory")?;
            let directory = UserDirectory::from_entries(users, &ctx.filter.exclude);
            render::print_directory(&directory)?;
        }
        other => anyhow::bail!(
            "Unknown report: {}. Use 'users', 'channels' or 'directory'",
            other
        ),
    }

    Ok(())
}

/// Merge command-line flags over the config file.
fn build_context(args: &Args, config: &Config) -> Result<RunContext> {
    let from = args
        .from
        .as_deref()
        .map(FilterConfig::parse_date)
        .transpose()
        .context("invalid --from")?;
    let to = args
        .to
        .as_deref()
        .map(FilterConfig::parse_date)
        .transpose()
        .context("invalid --to")?;

    let mut exclude: HashSet<String> = config.report.exclude.iter().cloned().collect();
    if let Some(list) = &args.exclude {
        exclude.extend(FilterConfig::parse_exclude(list));
    }

    let strategy = match &args.sort {
        Some(name) => SortStrategy::from_name(name),
        None => config.report.strategy(),
    };
    let limit = validate_limit(args.limit.unwrap_or(config.report.limit))
        .context("invalid --limit")?;

    Ok(RunContext {
        dir: args.dir.clone(),
        filter: FilterConfig {
            from,
            to,
            channel: args.channel.clone(),
            user: args.user.clone(),
            exclude,
        },
        strategy,
        limit,
    })
}

/// Run the pipeline, drawing a progress bar over day batches on stderr.
fn run_analysis(
    export: &SlackExport,
    filter: &FilterConfig,
    show_progress: bool,
) -> Result<EngagementStats> {
    let pb = if show_progress {
        ProgressBar::new(0)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );

    // Batches complete out of order.
    let stats = analyze_with_progress(export, filter, |_done, total, batch| {
        if pb.length() != Some(total as u64) {
            pb.set_length(total as u64);
        }
        pb.inc(1);
        pb.set_message(format!("#{} {}", batch.channel, batch.day));
    })
    .context("failed to analyze export")?;

    pb.finish_and_clear();

    tracing::info!(
        users = stats.users.len(),
        active = stats.active_users(),
        messages = stats.totals.messages,
        "Analysis complete"
    );

    Ok(stats)
}
