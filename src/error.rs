use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The word-count file is not a JSON object of word to non-negative integer.
    #[error("malformed word-count file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("word counts sum to zero, cannot compute weights")]
    Division,

    #[error("image error for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("font file may be invalid: {}", .0.display())]
    Font(PathBuf),

    #[error("invalid color {0:?}")]
    Color(String),

    #[error("there are no words to draw")]
    EmptyCloud,
}
