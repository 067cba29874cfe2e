//! Error types for font synthesis.

use std::result;

use read_fonts::ReadError;
use write_fonts::{BuilderError, error};

/// Errors that can occur while synthesizing fonts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    #[error("failed to build font: {0}")]
    Build(#[from] BuilderError),

    #[error("failed to write table: {0}")]
    Write(#[from] error::Error),

    #[error("conflicting cmap mappings")]
    Cmap,

    #[error("no fonts provided for collection")]
    NoFonts,

    #[error("collection would exceed 4 GiB")]
    CollectionTooLarge,
}

pub type Result<T> = result::Result<T, Error>;
