//! Fontsets CLI library.

pub mod blob;
pub mod cli;
pub mod document;
pub mod io;
pub mod report;
pub mod resources;

pub use document::Document;
pub use resources::BinaryResources;
