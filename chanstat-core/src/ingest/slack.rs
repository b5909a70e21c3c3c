//! Reader for Slack-style export directories.
//!
//! ## Layout
//!
//! ```text
//! export/
//! ├── users.json          [{"id", "name", "profile": {...}}, ...]
//! ├── channels.json       [{"name", "is_archived", "members"}, ...]
//! ├── general/
//! │   ├── 2020-01-01.json [{"type", "subtype", "user", "ts", "text"}, ...]
//! │   └── 2020-01-02.json
//! └── random/
//!     └── ...
//! ```
//!
//! `ts` is a decimal string of seconds since the epoch (`"1577880000.000200"`).

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::source::{BatchRef, EventSource};
use crate::error::{Error, Result};
use crate::types::{ChannelMeta, MessageEvent, UserMeta};

/// User directory file name
pub const USERS_FILE: &str = "users.json";
/// Channel directory file name
pub const CHANNELS_FILE: &str = "channels.json";

/// A Slack-style export on disk.
#[derive(Debug, Clone)]
pub struct SlackExport {
    root: PathBuf,
}

impl SlackExport {
    /// Open an export rooted at `root`. Fails if `root` is not a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::Config(format!(
                "export directory not found: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = std::fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&content).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })
    }

    fn channel_dir(&self, channel: &str) -> Result<PathBuf> {
        let escapes = channel.is_empty()
            || channel == "."
            || channel == ".."
            || channel.contains(['/', '\\']);
        if escapes {
            return Err(Error::Parse {
                path: self.root.join(CHANNELS_FILE),
                message: format!("invalid channel name {:?}", channel),
            });
        }
        Ok(self.root.join(channel))
    }
}

impl EventSource for SlackExport {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn users(&self) -> Result<Vec<UserMeta>> {
        let users: Vec<UserMeta> = self.read_json(&self.root.join(USERS_FILE))?;
        tracing::debug!(count = users.len(), "Loaded user directory");
        Ok(users)
    }

    fn channels(&self) -> Result<Vec<ChannelMeta>> {
        let channels: Vec<ChannelMeta> = self.read_json(&self.root.join(CHANNELS_FILE))?;
        tracing::debug!(count = channels.len(), "Loaded channel directory");
        Ok(channels)
    }

    fn batches(&self, channel: &str) -> Result<Vec<BatchRef>> {
        let dir = self.channel_dir(channel)?;
        if !dir.is_dir() {
            tracing::debug!(channel = %channel, "No export directory for channel");
            return Ok(vec![]);
        }

        let pattern = format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()));
        let mut paths: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(channel = %channel, error = %e, "Skipping unreadable export entry");
                    None
                }
            })
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| BatchRef {
                channel: channel.to_string(),
                day: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: Some(path),
            })
            .collect())
    }

    fn read_batch(&self, batch: &BatchRef) -> Result<Vec<MessageEvent>> {
        let path = match &batch.path {
            Some(path) => path.clone(),
            None => self.channel_dir(&batch.channel)?.join(format!("{}.json", batch.day)),
        };

        let raw: Vec<RawMessage> = self.read_json(&path)?;
        raw.into_iter()
            .map(|message| message.into_event(&path))
            .collect()
    }
}

/// Wire shape of one message in a day file.
#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    ts: Option<RawTimestamp>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Number(f64),
}

impl RawMessage {
    fn into_event(self, path: &Path) -> Result<MessageEvent> {
        let ts = match self.ts {
            Some(RawTimestamp::Number(ts)) => ts,
            Some(RawTimestamp::Text(ts)) => ts.trim().parse::<f64>().map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                message: format!("invalid ts {:?}: {}", ts, e),
            })?,
            None => {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    message: "message without ts".to_string(),
                })
            }
        };
        if !ts.is_finite() {
            return Err(Error::Parse {
                path: path.to_path_buf(),
                message: format!("non-finite ts {}", ts),
            });
        }

        Ok(MessageEvent {
            kind: self.kind.unwrap_or_default(),
            subtype: self.subtype.filter(|s| !s.is_empty()),
            user: self.user.unwrap_or_default(),
            ts,
            text: self.text.unwrap_or_default(),
        })
    }
}
