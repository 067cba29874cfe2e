//! # Font Synth
//!
//! Build small but complete OpenType fonts in memory, with chosen names and
//! vertical metrics, and pack them into TrueType collections.
//!
//! The fonts carry `head`, `hhea`, `hmtx`, `maxp`, `cmap`, `post`, `glyf`,
//! `loca`, `name` and `OS/2` tables and two glyphs (`.notdef` and `x`), which
//! is enough for any OpenType reader to resolve names and metrics.
//!
//! ## Example
//!
//! ```
//! use font_synth::{SyntheticFont, build_collection};
//!
//! let regular = SyntheticFont::new("Example Sans", "Regular").x_height(480).build().unwrap();
//! let bold = SyntheticFont::new("Example Sans", "Bold").x_height(500).build().unwrap();
//! let ttc = build_collection(&[regular.as_slice(), bold.as_slice()]).unwrap();
//! assert_eq!(&ttc[..4], b"ttcf");
//! ```

mod collection;
mod error;
mod font;

pub use collection::build_collection;
pub use error::{Error, Result};
pub use font::{LANGUAGE_EN_US, SyntheticFont};
