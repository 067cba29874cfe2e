//! The font subsystem a [`FontSetManager`](crate::FontSetManager) drives.

mod fontations;

use std::sync::Arc;

pub use fontations::SkrifaBackend;

use crate::{FontEntry, FontFile, FontFileLoader, FontSet, Result};

/// Vertical metrics of a realized face, in font units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    pub units_per_em: u16,
    pub ascent: f32,
    pub descent: f32,
    pub cap_height: Option<f32>,
    /// Taken from the font when present, otherwise estimated; 0 if neither
    /// is possible.
    pub x_height: f32,
}

/// A font set entry whose data has been read.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    /// Full name read from the font data itself.
    pub full_name: Option<String>,
    pub metrics: FaceMetrics,
}

/// Builds font sets and reads font data.
///
/// Implementations wrap a font stack; tests may substitute their own.
pub trait FontBackend {
    /// Whether files from [`InMemoryFontFileLoader`](crate::InMemoryFontFileLoader)
    /// can be used.
    fn supports_in_memory_loading(&self) -> bool;

    /// Make files created by `loader` usable in font sets.
    ///
    /// Registering the same loader twice is an error.
    fn register_loader(&mut self, loader: Arc<dyn FontFileLoader>) -> Result<()>;

    /// Forget a registered loader. Unknown loaders are ignored.
    fn unregister_loader(&mut self, loader: &Arc<dyn FontFileLoader>);

    /// Build a font set with the fonts of `files`, in order.
    fn build_font_set(&self, files: Vec<FontFile>) -> Result<FontSet>;

    /// Read the data behind `entry`.
    fn create_font_face(&self, entry: &FontEntry) -> Result<FontFace>;
}
