//! tap-persist: Persist tapped broker messages to the filesystem
//!
//! Two on-disk layouts: a raw `.dat` body with a `.json` metadata sidecar,
//! or one self-contained JSON document with the body base64 encoded.
//! File names are derived from the receipt time.

pub mod config;
pub mod error;
pub mod namer;
pub mod reader;
pub mod record;
pub mod saver;
pub mod writer;

pub use config::Config;
pub use error::PersistError;
pub use namer::timestamp_filename;
pub use record::PersistentMessageRecord;
pub use saver::{MessageSaver, SaveFormat};
pub use writer::Destination;
