//! A document carrying its own fonts.

use std::sync::Arc;

use anyhow::{Context, Result};
use font_synth::SyntheticFont;
use fontsets_core::FontByteSource;

use crate::blob::FontBlob;

const SAMPLE_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

/// Text and embedded fonts stored together in one package.
///
/// Embedded fonts are exposed as sources owned by the document, so the
/// package stays alive while any font set uses them.
#[derive(Debug)]
pub struct Document {
    package: FontBlob,
    text_len: usize,
}

impl Document {
    /// Package `text` with the given embedded fonts.
    pub fn new<'a>(text: &str, fonts: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> Self {
        let mut package = FontBlob::new();
        let text_len = package.push_raw(text.as_bytes()).len();
        for (name, data) in fonts {
            package.push(name, data);
        }
        Self { package, text_len }
    }

    /// A short sample document with one embedded font.
    pub fn sample() -> Result<Self> {
        let font = SyntheticFont::new("Fontsets Serif", "Italic").x_height(528).cap_height(690);
        let data = font.build().context("Failed to build document font")?;
        let name = font.full_name();
        Ok(Self::new(SAMPLE_TEXT, [(name.as_str(), data.as_slice())]))
    }

    pub fn text(&self) -> &str {
        // The package starts with the UTF-8 text pushed in `new`.
        std::str::from_utf8(&self.package.bytes()[..self.text_len]).unwrap_or_default()
    }

    pub fn embedded_font_count(&self) -> usize {
        self.package.parts().len()
    }

    pub fn font_sources(self: &Arc<Self>) -> Result<Vec<FontByteSource>> {
        Ok(self.package.sources(self.clone())?)
    }
}

impl AsRef<[u8]> for Document {
    fn as_ref(&self) -> &[u8] {
        self.package.bytes()
    }
}
