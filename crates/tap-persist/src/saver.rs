use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use tap_message::BrokerMessage;
use tracing::debug;

use crate::config::OutputConfig;
use crate::error::PersistError;
use crate::namer::timestamp_filename;
use crate::writer::{save_json, save_split, with_suffix};

/// On-disk layout of a saved message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// `<name>.dat` with the raw body plus a `<name>.json` sidecar
    Raw,
    /// `<name>.json` holding metadata and body
    Json,
}

impl FromStr for SaveFormat {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(SaveFormat::Raw),
            "json" => Ok(SaveFormat::Json),
            other => Err(PersistError::Config(format!("Unknown save format: {}", other))),
        }
    }
}

/// Saves each message into one directory, named after its receipt time.
#[derive(Debug, Clone)]
pub struct MessageSaver {
    dir: PathBuf,
    format: SaveFormat,
    include_body: bool,
}

impl MessageSaver {
    pub fn new(dir: impl Into<PathBuf>, format: SaveFormat, include_body: bool) -> Self {
        Self {
            dir: dir.into(),
            format,
            include_body,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Result<Self, PersistError> {
        Ok(Self::new(
            config.dir.clone(),
            config.parse_format()?,
            config.include_body,
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> SaveFormat {
        self.format
    }

    /// Save `message` and return the path written: the `.json` file for
    /// `Json`, the base path shared by `.dat` and `.json` for `Raw`.
    ///
    /// `include_body` only applies to `Json`; split saves always carry the
    /// body in both files.
    pub fn save(&self, message: &BrokerMessage, received_at: DateTime<Utc>) -> Result<PathBuf, PersistError> {
        let base = self.dir.join(timestamp_filename(received_at));

        let path = match self.format {
            SaveFormat::Raw => {
                save_split(&base, message)?;
                base
            }
            SaveFormat::Json => {
                let path = with_suffix(&base, "json");
                save_json(&path, self.include_body, message)?;
                path
            }
        };

        debug!(
            path = ?path,
            format = ?self.format,
            bytes = message.body.len(),
            "Saved message"
        );
        Ok(path)
    }
}
