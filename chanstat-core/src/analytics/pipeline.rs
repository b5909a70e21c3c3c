//! End-to-end run: source → filter → accumulate → normalize.
//!
//! Channel-day batches are independent shards. Each rayon worker reads and tallies
//! one batch on its own; partial tallies are combined with a tree reduction over
//! [`Tally::merged`]. The user directory and filter are only ever read.

use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::accumulator::Tally;
use super::filter::{accepts, FilterConfig};
use super::normalize::normalize;
use super::EngagementStats;
use crate::error::Result;
use crate::ingest::{BatchRef, EventSource};
use crate::types::{ChannelMeta, MessageEvent, UserDirectory};

/// Run the full pipeline over `source`.
pub fn analyze<S>(source: &S, filter: &FilterConfig) -> Result<EngagementStats>
where
    S: EventSource + ?Sized,
{
    analyze_with_progress(source, filter, |_, _, _| {})
}

/// Run the full pipeline, reporting each finished batch.
///
/// The callback receives `(completed_batches, total_batches, batch)` and may be
/// called from several threads at once.
pub fn analyze_with_progress<S, F>(
    source: &S,
    filter: &FilterConfig,
    on_progress: F,
) -> Result<EngagementStats>
where
    S: EventSource + ?Sized,
    F: Fn(usize, usize, &BatchRef) + Sync,
{
    let directory = UserDirectory::from_entries(source.users()?, &filter.exclude);
    let channels = scanned_channels(source.channels()?, filter);

    let mut batches = Vec::new();
    for channel in &channels {
        batches.extend(source.batches(&channel.name)?);
    }

    tracing::info!(
        source = %source.describe(),
        users = directory.len(),
        channels = channels.len(),
        batches = batches.len(),
        "Scanning export"
    );

    let total = batches.len();
    let completed = AtomicUsize::new(0);

    let tally = batches
        .par_iter()
        .map(|batch| -> Result<Tally> {
            let events = source.read_batch(batch)?;
            let tally = tally_events(&batch.channel, &events, &directory, filter);
            tracing::trace!(
                channel = %batch.channel,
                day = %batch.day,
                events = events.len(),
                counted = tally.totals.messages,
                "Batch tallied"
            );
            on_progress(completed.fetch_add(1, Ordering::Relaxed) + 1, total, batch);
            Ok(tally)
        })
        .try_reduce(Tally::new, |a, b| Ok(a.merged(b)))?;

    let mut stats = EngagementStats::assemble(&directory, channels, tally);
    normalize(&mut stats);

    tracing::info!(
        messages = stats.totals.messages,
        characters = stats.totals.characters,
        "Aggregation complete"
    );

    Ok(stats)
}

/// Tally the qualifying events of one channel.
pub fn tally_events<'a, I>(
    channel: &str,
    events: I,
    directory: &UserDirectory,
    filter: &FilterConfig,
) -> Tally
where
    I: IntoIterator<Item = &'a MessageEvent>,
{
    let mut tally = Tally::new();
    for event in events {
        if accepts(event, directory, filter) {
            tally.record(channel, event);
        }
    }
    tally
}

/// Non-archived channels that pass the channel restriction, first entry per name.
fn scanned_channels(channels: Vec<ChannelMeta>, filter: &FilterConfig) -> Vec<ChannelMeta> {
    let mut seen = HashSet::new();
    let scanned: Vec<ChannelMeta> = channels
        .into_iter()
        .filter(|c| !c.is_archived)
        .filter(|c| filter.selects_channel(&c.name))
        .filter(|c| {
            let first = seen.insert(c.name.clone());
            if !first {
                tracing::warn!(channel = %c.name, "Duplicate channel entry ignored");
            }
            first
        })
        .collect();

    if let Some(wanted) = &filter.channel {
        if scanned.is_empty() {
            tracing::warn!(channel = %wanted, "Channel restriction matched no active channel");
        }
    }

    scanned
}
