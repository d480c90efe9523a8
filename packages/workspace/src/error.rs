use std::path::PathBuf;

use emojiart_common::CommonError;
use emojiart_editor::{EditorError, FetchError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to watch palette directory: {0}")]
    Watcher(#[from] notify::Error),

    #[error("Failed to set up background fetching: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Storage(#[from] CommonError),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
