//! Content loading errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Post {path:?} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    #[error("Post file {0:?} has no usable name")]
    NoName(PathBuf),
}
