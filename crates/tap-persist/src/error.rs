use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Incomplete save: {} has no metadata sidecar", .0.display())]
    IncompleteSave(PathBuf),
}
