use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::PersistError;
use crate::record::PersistentMessageRecord;
use crate::writer::with_suffix;

/// Decode a record from a unified document or a split sidecar.
pub fn read_json<R: Read>(reader: R) -> Result<PersistentMessageRecord, PersistError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_json(path: &Path) -> Result<PersistentMessageRecord, PersistError> {
    read_json(BufReader::new(File::open(path)?))
}

/// Load a split save from `<base>.json` and `<base>.dat`.
///
/// The `.dat` file is authoritative for the body. Without it the sidecar's
/// own body is used; a `.dat` without a sidecar is an incomplete save.
pub fn load_split(base: &Path) -> Result<PersistentMessageRecord, PersistError> {
    let dat_path = with_suffix(base, "dat");
    let json_path = with_suffix(base, "json");

    let record = match load_json(&json_path) {
        Ok(record) => record,
        Err(PersistError::Io(e)) if e.kind() == ErrorKind::NotFound && dat_path.exists() => {
            return Err(PersistError::IncompleteSave(dat_path));
        }
        Err(e) => return Err(e),
    };

    match fs::read(&dat_path) {
        Ok(body) => Ok(record.with_body(Bytes::from(body))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(record),
        Err(e) => Err(e.into()),
    }
}

/// Load whatever a save produced at `path`.
///
/// `*.json` is read as a single document. `*.dat` or a bare base name is
/// read as a split save, unless neither split file exists and `path` is
/// itself a file, which is then read as a single document.
pub fn load(path: &Path) -> Result<PersistentMessageRecord, PersistError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_json(path),
        Some("dat") => load_split(&split_base(path)),
        _ if path.is_file()
            && !with_suffix(path, "json").exists()
            && !with_suffix(path, "dat").exists() =>
        {
            load_json(path)
        }
        _ => load_split(path),
    }
}

/// Base path of a split save given either of its files.
pub fn split_base(path: &Path) -> PathBuf {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") | Some("dat") => path.with_extension(""),
        _ => path.to_path_buf(),
    }
}
