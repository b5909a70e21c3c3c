//! # chanstat-core
//!
//! Core library for chanstat - engagement statistics for exported chat workspaces.
//!
//! This library provides:
//! - Domain types for users, channels and message events
//! - A reader for Slack-style export directories
//! - The aggregation and ranking engine
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Pipeline
//!
//! Data flows through five stages, each owning the registries it hands to the next:
//! - **Filter:** decides which message events count
//! - **Accumulate:** shard-local tallies per channel-day, merged associatively
//! - **Normalize:** percentages against corpus-wide totals
//! - **Select:** top four favorite channels per user
//! - **Rank:** ordered users for presentation
//!
//! ## Example
//!
//! ```rust,no_run
//! use chanstat_core::analytics::{analyze, rank_users, FilterConfig, SortStrategy};
//! use chanstat_core::ingest::SlackExport;
//!
//! let export = SlackExport::open("./export").expect("failed to open export");
//! let stats = analyze(&export, &FilterConfig::default()).expect("failed to analyze export");
//!
//! for user in rank_users(&stats, SortStrategy::Messages, None) {
//!     println!("{} {}", user.name, user.messages);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{EngagementStats, FilterConfig, SortStrategy};
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod types;
