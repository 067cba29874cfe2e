//! Font file loaders.
//!
//! A loader turns a [`FileKey`] into font bytes and reports whether those
//! bytes are available yet. Loaders must be registered with a
//! [`FontBackend`](crate::FontBackend) before files they create can be added
//! to a font set.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{FontByteSource, Result};

/// Identifies one file within a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileKey(pub u32);

/// Whether font data is available now or must be fetched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locality {
    /// All data is available.
    Local,
    /// Some data has been fetched, the rest is still remote.
    Partial,
    /// No data is available until a download completes.
    Remote,
}

/// Source of font file data.
pub trait FontFileLoader: Send + Sync {
    fn locality(&self, key: FileKey) -> Locality;

    /// Ask for the file's data to be fetched.
    ///
    /// Returns immediately; completion is observed through
    /// [`FontFileLoader::locality`]. A no-op for local data.
    fn enqueue_download(&self, key: FileKey) -> Result<()>;

    /// The file's bytes, if they are local.
    fn file_data(&self, key: FileKey) -> Option<FontByteSource>;
}

/// Compare loaders by identity.
pub(crate) fn same_loader(a: &Arc<dyn FontFileLoader>, b: &Arc<dyn FontFileLoader>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// A file known to a loader.
#[derive(Clone)]
pub struct FontFile {
    loader: Arc<dyn FontFileLoader>,
    key: FileKey,
    name: String,
}

impl FontFile {
    pub fn new(loader: Arc<dyn FontFileLoader>, key: FileKey, name: impl Into<String>) -> Self {
        Self { loader, key, name: name.into() }
    }

    pub fn loader(&self) -> &Arc<dyn FontFileLoader> {
        &self.loader
    }

    pub fn key(&self) -> FileKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locality(&self) -> Locality {
        self.loader.locality(self.key)
    }

    pub fn enqueue_download(&self) -> Result<()> {
        self.loader.enqueue_download(self.key)
    }

    pub fn data(&self) -> Option<FontByteSource> {
        self.loader.file_data(self.key)
    }
}

impl fmt::Debug for FontFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFile")
            .field("key", &self.key)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Loader for font data that is already in memory.
///
/// Sources are kept in an arena indexed by [`FileKey`], so every file keeps
/// its source (and therefore the source's owner) alive for as long as the
/// loader lives. Data is always local.
#[derive(Debug, Default)]
pub struct InMemoryFontFileLoader {
    files: Mutex<Vec<FontByteSource>>,
}

impl InMemoryFontFileLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `source` and return a file referring to it.
    pub fn create_file(self: &Arc<Self>, source: FontByteSource) -> FontFile {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        let key = FileKey(files.len() as u32);
        let name = source.name().to_owned();
        files.push(source);
        FontFile::new(self.clone(), key, name)
    }

    /// Drop every file from `len` on. Files handed out for them must no
    /// longer be used.
    pub fn truncate(&self, len: usize) {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).truncate(len);
    }

    pub fn len(&self) -> usize {
        self.files.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FontFileLoader for InMemoryFontFileLoader {
    fn locality(&self, _key: FileKey) -> Locality {
        Locality::Local
    }

    fn enqueue_download(&self, _key: FileKey) -> Result<()> {
        Ok(())
    }

    fn file_data(&self, key: FileKey) -> Option<FontByteSource> {
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        files.get(key.0 as usize).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, bytes: &'static [u8]) -> FontByteSource {
        FontByteSource::new(name, Arc::new(bytes))
    }

    #[test]
    fn test_keys_follow_insertion_order() {
        let loader = Arc::new(InMemoryFontFileLoader::new());
        let a = loader.create_file(source("a", b"aaaa"));
        let b = loader.create_file(source("b", b"bb"));

        assert_eq!(a.key(), FileKey(0));
        assert_eq!(b.key(), FileKey(1));
        assert_eq!(b.name(), "b");
        assert_eq!(loader.len(), 2);
        assert_eq!(b.data().unwrap().data(), b"bb");
    }

    #[test]
    fn test_in_memory_data_is_local() {
        let loader = Arc::new(InMemoryFontFileLoader::new());
        let file = loader.create_file(source("a", b"aaaa"));
        assert_eq!(file.locality(), Locality::Local);
        assert!(file.enqueue_download().is_ok());
        assert_eq!(file.locality(), Locality::Local);
    }

    #[test]
    fn test_truncate_releases_sources() {
        let loader = Arc::new(InMemoryFontFileLoader::new());
        let kept = loader.create_file(source("kept", b"kk"));
        let dropped = loader.create_file(source("dropped", b"dd"));
        loader.truncate(1);

        assert_eq!(loader.len(), 1);
        assert!(kept.data().is_some());
        assert!(dropped.data().is_none());
    }

    #[test]
    fn test_unknown_key_has_no_data() {
        let loader = InMemoryFontFileLoader::new();
        assert!(loader.is_empty());
        assert!(loader.file_data(FileKey(3)).is_none());
    }

    #[test]
    fn test_same_loader_identity() {
        let a: Arc<dyn FontFileLoader> = Arc::new(InMemoryFontFileLoader::new());
        let b: Arc<dyn FontFileLoader> = Arc::new(InMemoryFontFileLoader::new());
        assert!(same_loader(&a, &a.clone()));
        assert!(!same_loader(&a, &b));
    }
}
