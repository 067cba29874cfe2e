//! Fontsets Core - build custom font sets from in-memory font data.
//!
//! Font data is handed over as [`FontByteSource`]s that borrow bytes from a
//! shared owner, so buffers are never copied. A [`FontSetManager`] registers
//! an in-memory loader with a [`FontBackend`], builds an immutable
//! [`FontSet`] and answers queries about it.

pub mod backend;
pub mod cancel;
pub mod config;
pub mod error;
pub mod font_set;
pub mod loader;
pub mod manager;
pub mod source;

pub use backend::{FaceMetrics, FontBackend, FontFace, SkrifaBackend};
pub use cancel::CancellationToken;
pub use config::{DEFAULT_FETCH_TIMEOUT, DEFAULT_LOCALE};
pub use error::{Error, Result};
pub use font_set::{FontEntry, FontProperties, FontProperty, FontSet, LocalizedName};
pub use loader::{FileKey, FontFile, FontFileLoader, InMemoryFontFileLoader, Locality};
pub use manager::FontSetManager;
pub use source::{FontByteSource, SharedFontData};
