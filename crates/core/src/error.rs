//! Error types for font set construction and queries.

use std::result;

use skrifa::raw::ReadError;

/// Errors that can occur while building or querying a font set.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("in-memory font loading is not supported by this backend")]
    Unsupported,

    #[error("failed to parse font data from '{source_name}': {error}")]
    Parse {
        source_name: String,
        #[source]
        error: ReadError,
    },

    #[error("font file loader is already registered")]
    LoaderAlreadyRegistered,

    #[error("font file loader for '{0}' is not registered")]
    LoaderNotRegistered(String),

    #[error("font set has already been built")]
    AlreadyBuilt,

    #[error("source '{name}' range {start}..{end} is outside its {len}-byte owner")]
    SourceOutOfBounds { name: String, start: usize, end: usize, len: usize },

    #[error("font data for '{0}' is not local")]
    DataNotLocal(String),

    #[error("failed to fetch font data for '{name}': {reason}")]
    Fetch { name: String, reason: String },
}

pub type Result<T> = result::Result<T, Error>;
