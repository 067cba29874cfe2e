//! Font set construction and queries.

use std::{
    fmt,
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use log::{debug, info, warn};

use crate::{
    CancellationToken, Error, FontBackend, FontByteSource, FontEntry, FontFace, FontFile,
    FontFileLoader, FontProperty, FontSet, InMemoryFontFileLoader, Locality, Result,
    SkrifaBackend,
    config::{DEFAULT_FETCH_TIMEOUT, DEFAULT_LOCALE, FETCH_POLL_INTERVAL},
};

/// Why waiting for font data stopped early.
#[derive(Debug, thiserror::Error)]
enum Interrupted {
    #[error("cancelled")]
    Cancelled,
    #[error("timed out")]
    TimedOut,
}

/// Builds a custom font set and answers queries about it.
///
/// A manager goes from unbuilt to built exactly once. Loaders it registers
/// with the backend stay registered for as long as the manager lives and
/// are unregistered when it is dropped.
pub struct FontSetManager<B: FontBackend = SkrifaBackend> {
    backend: B,
    locale: String,
    in_memory_loader: Option<Arc<InMemoryFontFileLoader>>,
    registered: Vec<Arc<dyn FontFileLoader>>,
    font_set: Option<Arc<FontSet>>,
}

impl Default for FontSetManager<SkrifaBackend> {
    fn default() -> Self {
        Self::new(SkrifaBackend::new())
    }
}

impl<B: FontBackend> FontSetManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            locale: DEFAULT_LOCALE.to_owned(),
            in_memory_loader: None,
            registered: Vec::new(),
            font_set: None,
        }
    }

    /// Prefer names in `locale` (a BCP-47 tag such as `de-DE`).
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Check before building from memory sources.
    pub fn supports_in_memory_fonts(&self) -> bool {
        self.backend.supports_in_memory_loading()
    }

    pub fn is_built(&self) -> bool {
        self.font_set.is_some()
    }

    pub fn font_set(&self) -> Option<&Arc<FontSet>> {
        self.font_set.as_ref()
    }

    /// Register an additional loader, such as one serving remote fonts.
    ///
    /// The loader is unregistered when the manager is dropped.
    pub fn register_loader(&mut self, loader: Arc<dyn FontFileLoader>) -> Result<()> {
        self.backend.register_loader(loader.clone())?;
        self.registered.push(loader);
        Ok(())
    }

    /// Build the font set from in-memory font data, in source order.
    ///
    /// The in-memory loader is registered on first use only. The sources'
    /// owners are kept alive by the resulting set; after a failed build the
    /// loader lets go of them again.
    pub fn build_from_memory_sources(
        &mut self,
        sources: impl IntoIterator<Item = FontByteSource>,
    ) -> Result<Arc<FontSet>> {
        self.ensure_unbuilt()?;
        if !self.supports_in_memory_fonts() {
            return Err(Error::Unsupported);
        }

        let loader = self.in_memory_loader()?;
        let first_new = loader.len();
        let files: Vec<_> = sources.into_iter().map(|source| loader.create_file(source)).collect();
        info!("Building font set from {} in-memory sources", files.len());

        self.build_from_font_files(files).inspect_err(|_| loader.truncate(first_new))
    }

    /// Build the font set from files of registered loaders.
    pub fn build_from_font_files(&mut self, files: Vec<FontFile>) -> Result<Arc<FontSet>> {
        self.ensure_unbuilt()?;
        let font_set = Arc::new(self.backend.build_font_set(files)?);
        self.font_set = Some(font_set.clone());
        Ok(font_set)
    }

    fn ensure_unbuilt(&self) -> Result<()> {
        if self.is_built() { Err(Error::AlreadyBuilt) } else { Ok(()) }
    }

    fn in_memory_loader(&mut self) -> Result<Arc<InMemoryFontFileLoader>> {
        if let Some(loader) = &self.in_memory_loader {
            return Ok(loader.clone());
        }
        let loader = Arc::new(InMemoryFontFileLoader::new());
        self.register_loader(loader.clone())?;
        self.in_memory_loader = Some(loader.clone());
        Ok(loader)
    }

    /// Number of fonts in the set; 0 before the set is built.
    pub fn font_count(&self) -> usize {
        self.font_set.as_ref().map_or(0, |set| set.len())
    }

    /// Unique full names across the set, in the manager's locale.
    pub fn full_names(&self) -> Vec<String> {
        self.full_names_for_locale(&self.locale)
    }

    /// Unique full names across the set, preferring `locale`, then en-US.
    pub fn full_names_for_locale(&self, locale: &str) -> Vec<String> {
        self.font_set
            .as_ref()
            .map(|set| set.property_values(FontProperty::FullName, locale))
            .unwrap_or_default()
    }

    /// Whether any font's data still has to be fetched.
    pub fn has_remote_fonts(&self) -> bool {
        self.font_set.as_ref().is_some_and(|set| set.has_remote_fonts())
    }

    /// One line per font with details read from the font data, waiting at
    /// most [`DEFAULT_FETCH_TIMEOUT`] for remote data.
    pub fn font_data_details(&self, cancel: &CancellationToken) -> Vec<String> {
        self.font_data_details_with_timeout(cancel, DEFAULT_FETCH_TIMEOUT)
    }

    /// One line per font, `"<full name>: x-height = <n>"`.
    ///
    /// Downloads are requested for every font first. If any font's data
    /// can't be read before `timeout` elapses or `cancel` fires, the result
    /// is empty rather than partial.
    pub fn font_data_details_with_timeout(
        &self,
        cancel: &CancellationToken,
        timeout: Duration,
    ) -> Vec<String> {
        let Some(font_set) = &self.font_set else {
            return Vec::new();
        };
        if cancel.is_cancelled() {
            debug!("Font data details cancelled before start");
            return Vec::new();
        }

        // A timeout too large to represent never expires.
        let deadline = Instant::now().checked_add(timeout);

        for entry in font_set.entries() {
            if let Err(e) = entry.enqueue_download() {
                warn!("Failed to request font data for {}: {e}", entry.file().name());
                return Vec::new();
            }
        }

        let mut details = Vec::with_capacity(font_set.len());
        for (index, entry) in font_set.entries().iter().enumerate() {
            if let Err(reason) = wait_until_local(entry, cancel, deadline) {
                warn!("Font data for {} unavailable: {reason}", entry.file().name());
                return Vec::new();
            }
            match self.backend.create_font_face(entry) {
                Ok(face) => details.push(format_details(index, &face)),
                Err(e) => {
                    warn!("Failed to read font data for {}: {e}", entry.file().name());
                    return Vec::new();
                }
            }
        }

        details
    }
}

impl<B: FontBackend> Drop for FontSetManager<B> {
    fn drop(&mut self) {
        for loader in self.registered.drain(..) {
            self.backend.unregister_loader(&loader);
        }
        debug!("Released font file loaders");
    }
}

impl<B: FontBackend + fmt::Debug> fmt::Debug for FontSetManager<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontSetManager")
            .field("backend", &self.backend)
            .field("locale", &self.locale)
            .field("registered", &self.registered.len())
            .field("font_count", &self.font_count())
            .finish()
    }
}

/// Poll until `entry` is local. Locality is checked first, so local data
/// never waits; cancellation is checked before the deadline. Without a
/// deadline only cancellation stops the wait.
fn wait_until_local(
    entry: &FontEntry,
    cancel: &CancellationToken,
    deadline: Option<Instant>,
) -> std::result::Result<(), Interrupted> {
    loop {
        if entry.locality() == Locality::Local {
            return Ok(());
        }
        if cancel.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        let pause = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(Interrupted::TimedOut);
                }
                FETCH_POLL_INTERVAL.min(deadline - now)
            }
            None => FETCH_POLL_INTERVAL,
        };
        thread::sleep(pause);
    }
}

fn format_details(index: usize, face: &FontFace) -> String {
    let name = face.full_name.clone().unwrap_or_else(|| format!("Font {index}"));
    format!("{name}: x-height = {}", face.metrics.x_height.round() as i64)
}
