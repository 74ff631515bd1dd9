//! Error type shared by photo loading and strip export
//!
//! None of these reach the user as a dialog. The UI logs them and the
//! affected photo or download simply degrades.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoboothError {
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode strip: {0}")]
    Encode(#[from] image::ImageError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PhotoboothError>;
