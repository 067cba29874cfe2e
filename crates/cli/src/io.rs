//! Font file I/O.

use std::{
    fs::read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::glob;

/// File patterns picked up from font directories.
pub const FONT_PATTERNS: &[&str] = &["*.ttf", "*.otf", "*.ttc", "*.otc"];

/// Read font data from a file.
pub fn read_font(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    read(path).with_context(|| format!("Failed to read font: {}", path.display()))
}

/// Find fonts matching a glob pattern in a directory.
pub fn glob_fonts(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = dir.join(pattern);
    let pattern_str = pattern.to_str().context("Invalid pattern path")?;
    Ok(glob(pattern_str)
        .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
        .filter_map(Result::ok)
        .collect())
}

/// All font files directly inside `dir`, sorted by path.
pub fn font_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in FONT_PATTERNS {
        paths.extend(glob_fonts(dir, pattern)?);
    }
    paths.sort();
    Ok(paths)
}
