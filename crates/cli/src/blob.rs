//! Packing several fonts into one buffer.

use std::{ops::Range, sync::Arc};

use fontsets_core::{FontByteSource, SharedFontData};

/// A named font stored inside a [`FontBlob`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontPart {
    pub name: String,
    pub range: Range<usize>,
}

/// One contiguous buffer holding font files and any other payload.
///
/// Font parts start on 4-byte boundaries.
#[derive(Debug, Default)]
pub struct FontBlob {
    bytes: Vec<u8>,
    parts: Vec<FontPart>,
}

impl FontBlob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a font and remember where it lives.
    pub fn push(&mut self, name: impl Into<String>, data: &[u8]) -> Range<usize> {
        self.pad();
        let range = self.push_raw(data);
        self.parts.push(FontPart { name: name.into(), range: range.clone() });
        range
    }

    /// Append bytes that are not a font.
    pub fn push_raw(&mut self, data: &[u8]) -> Range<usize> {
        let start = self.bytes.len();
        self.bytes.extend_from_slice(data);
        start..self.bytes.len()
    }

    fn pad(&mut self) {
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn parts(&self) -> &[FontPart] {
        &self.parts
    }

    /// Sources for every font part, owned by `owner`.
    ///
    /// `owner` must lend exactly this blob's bytes.
    pub fn sources(&self, owner: SharedFontData) -> fontsets_core::Result<Vec<FontByteSource>> {
        self.parts
            .iter()
            .map(|part| FontByteSource::with_range(&part.name, Arc::clone(&owner), part.range.clone()))
            .collect()
    }
}

impl AsRef<[u8]> for FontBlob {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
