//! Ingestion layer for exported chat workspaces
//!
//! This module turns an export on disk into the typed records the analytics
//! pipeline consumes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │  Export Files   │ ──► │   EventSource    │ ──► │    analytics    │
//! │ (users, days..) │     │  └─ SlackExport  │     │   (pipeline)    │
//! └─────────────────┘     └──────────────────┘     └─────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chanstat_core::ingest::{EventSource, SlackExport};
//!
//! let export = SlackExport::open("./export")?;
//! for channel in export.channels()? {
//!     println!("{}: {} day(s)", channel.name, export.batches(&channel.name)?.len());
//! }
//! ```

mod slack;
mod source;

pub use slack::{SlackExport, CHANNELS_FILE, USERS_FILE};
pub use source::{BatchRef, EventSource};
