use std::ffi::OsString;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tap_message::BrokerMessage;
use tempfile::NamedTempFile;

use crate::error::PersistError;
use crate::record::PersistentMessageRecord;

/// Where the unified writer sends its JSON document
pub enum Destination<'a> {
    /// File created (or replaced) at this path
    Path(&'a Path),
    /// Already open stream, e.g. stdout
    Stream(&'a mut dyn Write),
}

/// Write the payload bytes unchanged, without framing.
pub fn write_body<W: Write + ?Sized>(out: &mut W, message: &BrokerMessage) -> Result<(), PersistError> {
    out.write_all(&message.body)?;
    out.flush()?;
    Ok(())
}

/// Write the message as one pretty-printed JSON document.
///
/// With `include_body` unset the `Body` field is written as `""`.
pub fn write_json<W: Write + ?Sized>(
    out: &mut W,
    include_body: bool,
    message: &BrokerMessage,
) -> Result<(), PersistError> {
    let record = PersistentMessageRecord::from_message(message);
    let record = if include_body {
        record
    } else {
        record.without_body()
    };
    write_record(out, &record)
}

/// Write the message as a JSON document at `path`.
pub fn save_json(path: &Path, include_body: bool, message: &BrokerMessage) -> Result<(), PersistError> {
    write_atomic(path, |out| write_json(out, include_body, message))
}

/// Unified strategy: a single JSON document to a file or an open stream.
pub fn save_unified(
    destination: Destination<'_>,
    include_body: bool,
    message: &BrokerMessage,
) -> Result<(), PersistError> {
    match destination {
        Destination::Path(path) => save_json(path, include_body, message),
        Destination::Stream(out) => write_json(out, include_body, message),
    }
}

/// Split strategy: raw body to `<base>.dat`, metadata to `<base>.json`.
///
/// The two files are written one after the other. If the sidecar fails the
/// `.dat` file stays behind; readers treat that as an incomplete save.
pub fn save_split(base: &Path, message: &BrokerMessage) -> Result<(), PersistError> {
    write_atomic(&with_suffix(base, "dat"), |out| write_body(out, message))?;

    let record = PersistentMessageRecord::from_message(message);
    write_atomic(&with_suffix(base, "json"), |out| write_record(out, &record))
}

/// Append `.suffix` to `base`.
///
/// `Path::with_extension` would replace the fraction of a timestamp name.
pub(crate) fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn write_record<W: Write + ?Sized>(out: &mut W, record: &PersistentMessageRecord) -> Result<(), PersistError> {
    serde_json::to_writer_pretty(&mut *out, record)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Write into a uniquely named temp file next to `path` and rename it into
/// place, so `path` never holds a partially written document and concurrent
/// saves to one path resolve as last-writer-wins.
fn write_atomic<F>(path: &Path, write: F) -> Result<(), PersistError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), PersistError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // dropped without persist on every error path, which removes it
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        write(&mut out)?;
    }
    tmp.persist(path).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}
