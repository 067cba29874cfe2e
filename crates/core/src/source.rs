//! In-memory font data sources.

use std::{fmt, ops::Range, sync::Arc};

use crate::{Error, Result};

/// Shared owner of font bytes.
///
/// Anything that can lend a byte slice can own font data: a `Vec<u8>`, a
/// `&'static [u8]`, or an application object such as a document that keeps
/// embedded fonts inside a larger package.
pub type SharedFontData = Arc<dyn AsRef<[u8]> + Send + Sync>;

/// A named buffer of raw, uncompressed font data.
///
/// The source holds a reference to the owner of the bytes and a range into
/// them; cloning a source or building a font set from it never copies the
/// font data, and the owner stays alive for as long as any clone does.
#[derive(Clone)]
pub struct FontByteSource {
    name: String,
    owner: SharedFontData,
    range: Range<usize>,
}

impl FontByteSource {
    /// Create a source covering all of the owner's bytes.
    pub fn new(name: impl Into<String>, owner: SharedFontData) -> Self {
        let len = (*owner).as_ref().len();
        Self { name: name.into(), owner, range: 0..len }
    }

    /// Create a source covering `range` of the owner's bytes.
    pub fn with_range(
        name: impl Into<String>,
        owner: SharedFontData,
        range: Range<usize>,
    ) -> Result<Self> {
        let name = name.into();
        let len = (*owner).as_ref().len();
        if range.start > range.end || range.end > len {
            return Err(Error::SourceOutOfBounds {
                name,
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(Self { name, owner, range })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The font bytes.
    pub fn data(&self) -> &[u8] {
        &(*self.owner).as_ref()[self.range.clone()]
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// The object keeping the bytes alive.
    pub fn owner(&self) -> &SharedFontData {
        &self.owner
    }
}

impl fmt::Debug for FontByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontByteSource")
            .field("name", &self.name)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}
