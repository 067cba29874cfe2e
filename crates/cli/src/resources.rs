//! Fonts shipped with the application.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use font_synth::SyntheticFont;
use fontsets_core::FontByteSource;
use log::debug;

use crate::{blob::FontBlob, io::read_font};

/// Family of the bundled font.
pub const BUNDLED_FAMILY: &str = "Fontsets Sans";

/// The application's font resources, kept in one binary blob.
///
/// Sources handed out by [`BinaryResources::font_sources`] borrow from the
/// blob and keep the resources alive.
#[derive(Debug)]
pub struct BinaryResources {
    blob: FontBlob,
}

impl BinaryResources {
    /// Resources holding only the bundled font.
    pub fn bundled() -> Result<Self> {
        let mut blob = FontBlob::new();
        let font = SyntheticFont::new(BUNDLED_FAMILY, "Regular").x_height(486).cap_height(712);
        let data = font.build().context("Failed to build bundled font")?;
        blob.push(font.full_name(), &data);
        Ok(Self { blob })
    }

    /// Bundled font plus the given font files.
    pub fn with_files<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Result<Self> {
        let mut resources = Self::bundled()?;
        for path in paths {
            resources.add_file(path.as_ref())?;
        }
        Ok(resources)
    }

    fn add_file(&mut self, path: &Path) -> Result<()> {
        let data = read_font(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Adding {} ({} bytes) to resources", name, data.len());
        self.blob.push(name, &data);
        Ok(())
    }

    pub fn font_count(&self) -> usize {
        self.blob.parts().len()
    }

    pub fn font_sources(self: &Arc<Self>) -> Result<Vec<FontByteSource>> {
        Ok(self.blob.sources(self.clone())?)
    }
}

impl AsRef<[u8]> for BinaryResources {
    fn as_ref(&self) -> &[u8] {
        self.blob.bytes()
    }
}
