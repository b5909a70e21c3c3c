//! Event source trait abstraction
//!
//! Every export format implements [`EventSource`] to hand the analytics pipeline typed
//! metadata and day batches.
//!
//! ## Contract
//!
//! 1. **Typed records only**: sources decode; they never filter or aggregate
//! 2. **Fatal on malformed input**: a file that cannot be read or decoded is an `Err`
//! 3. **Shardable**: each [`BatchRef`] can be read independently, from any thread

use crate::error::Result;
use crate::types::{ChannelMeta, MessageEvent, UserMeta};
use std::path::PathBuf;

/// Handle to one channel-day batch of events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchRef {
    /// Channel the batch belongs to
    pub channel: String,
    /// Day label (file stem for file-backed sources)
    pub day: String,
    /// Backing file, if any
    pub path: Option<PathBuf>,
}

/// Trait implemented by all export readers.
///
/// ## Example
///
/// ```rust,ignore
/// use chanstat_core::ingest::{BatchRef, EventSource};
///
/// struct MySource;
///
/// impl EventSource for MySource {
///     fn users(&self) -> Result<Vec<UserMeta>> { ... }
///     // ... implement other methods
/// }
/// ```
pub trait EventSource: Send + Sync {
    /// Short description for logs and headers (e.g. the export path)
    fn describe(&self) -> String;

    /// All user directory entries, unfiltered
    fn users(&self) -> Result<Vec<UserMeta>>;

    /// All channel directory entries, archived ones included
    fn channels(&self) -> Result<Vec<ChannelMeta>>;

    /// Day batches for one channel. A channel with no data has no batches.
    fn batches(&self, channel: &str) -> Result<Vec<BatchRef>>;

    /// Decode one batch.
    fn read_batch(&self, batch: &BatchRef) -> Result<Vec<MessageEvent>>;
}
