//! Integration tests for building and querying custom font sets.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use font_synth::{SyntheticFont, build_collection};
use fontsets_core::{
    CancellationToken, Error, FileKey, FontBackend, FontByteSource, FontEntry, FontFace, FontFile,
    FontFileLoader, FontSet, FontSetManager, InMemoryFontFileLoader, Locality, Result,
    SharedFontData, SkrifaBackend,
};

// ============================================================================
// Helpers
// ============================================================================

fn font(family: &str, style: &str, x_height: i16) -> Vec<u8> {
    SyntheticFont::new(family, style).x_height(x_height).build().unwrap()
}

fn source(name: &str, data: Vec<u8>) -> FontByteSource {
    FontByteSource::new(name, Arc::new(data))
}

/// A document-like owner that embeds font data after some text.
struct Package {
    bytes: Vec<u8>,
}

impl AsRef<[u8]> for Package {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

fn package_source(text: &str, font: &[u8]) -> (Arc<Package>, FontByteSource) {
    let mut bytes = text.as_bytes().to_vec();
    let start = bytes.len();
    bytes.extend_from_slice(font);
    let package = Arc::new(Package { bytes });
    let owner: SharedFontData = package.clone();
    let source = FontByteSource::with_range("document font", owner, start..start + font.len())
        .unwrap();
    (package, source)
}

fn is_detail_line(line: &str) -> bool {
    let Some((name, value)) = line.rsplit_once(": x-height = ") else {
        return false;
    };
    !name.is_empty() && value.parse::<i64>().is_ok()
}

/// Backend that records loader registration events.
struct RecordingBackend {
    inner: SkrifaBackend,
    events: Arc<Mutex<Vec<&'static str>>>,
    in_memory: bool,
}

impl RecordingBackend {
    fn new(in_memory: bool) -> (Self, Arc<Mutex<Vec<&'static str>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (Self { inner: SkrifaBackend::new(), events: events.clone(), in_memory }, events)
    }
}

impl FontBackend for RecordingBackend {
    fn supports_in_memory_loading(&self) -> bool {
        self.in_memory
    }

    fn register_loader(&mut self, loader: Arc<dyn FontFileLoader>) -> Result<()> {
        self.events.lock().unwrap().push("register");
        self.inner.register_loader(loader)
    }

    fn unregister_loader(&mut self, loader: &Arc<dyn FontFileLoader>) {
        self.events.lock().unwrap().push("unregister");
        self.inner.unregister_loader(loader)
    }

    fn build_font_set(&self, files: Vec<FontFile>) -> Result<FontSet> {
        self.inner.build_font_set(files)
    }

    fn create_font_face(&self, entry: &FontEntry) -> Result<FontFace> {
        self.inner.create_font_face(entry)
    }
}

/// Loader for a single remote font whose data arrives on request, or never.
struct RemoteLoader {
    data: SharedFontData,
    arrives_on_request: bool,
    requested: AtomicBool,
    arrived: AtomicBool,
}

impl RemoteLoader {
    fn new(data: Vec<u8>, arrives_on_request: bool) -> Arc<Self> {
        Arc::new(Self {
            data: Arc::new(data),
            arrives_on_request,
            requested: AtomicBool::new(false),
            arrived: AtomicBool::new(false),
        })
    }
}

impl FontFileLoader for RemoteLoader {
    fn locality(&self, _key: FileKey) -> Locality {
        if self.arrived.load(Ordering::SeqCst) { Locality::Local } else { Locality::Remote }
    }

    fn enqueue_download(&self, _key: FileKey) -> Result<()> {
        self.requested.store(true, Ordering::SeqCst);
        if self.arrives_on_request {
            self.arrived.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn file_data(&self, _key: FileKey) -> Option<FontByteSource> {
        self.arrived
            .load(Ordering::SeqCst)
            .then(|| FontByteSource::new("remote.ttf", self.data.clone()))
    }
}

fn remote_manager(arrives_on_request: bool) -> (FontSetManager, Arc<RemoteLoader>) {
    let mut manager = FontSetManager::default();
    let loader = RemoteLoader::new(font("Remote Sans", "Regular", 540), arrives_on_request);
    manager.register_loader(loader.clone()).unwrap();
    let file = FontFile::new(loader.clone(), FileKey(0), "remote.ttf");
    manager.build_from_font_files(vec![file]).unwrap();
    (manager, loader)
}

// ============================================================================
// Building
// ============================================================================

#[test]
fn test_empty_sources_build_empty_set() {
    let mut manager: FontSetManager = FontSetManager::default();
    let set = manager.build_from_memory_sources(Vec::new()).unwrap();
    assert!(set.is_empty());
    assert_eq!(manager.font_count(), 0);
    assert!(manager.is_built());
}

#[test]
fn test_count_matches_distinct_fonts() {
    let mut manager: FontSetManager = FontSetManager::default();
    let sources = ["Alpha", "Beta", "Gamma", "Delta"]
        .iter()
        .map(|family| source(family, font(family, "Regular", 500)));
    manager.build_from_memory_sources(sources).unwrap();
    assert_eq!(manager.font_count(), 4);
}

#[test]
fn test_entries_follow_source_order() {
    let mut manager: FontSetManager = FontSetManager::default();
    manager
        .build_from_memory_sources([
            source("b", font("Beta", "Regular", 500)),
            source("a", font("Alpha", "Regular", 500)),
        ])
        .unwrap();
    assert_eq!(manager.full_names(), vec!["Beta Regular", "Alpha Regular"]);
}

#[test]
fn test_collection_source_adds_every_member() {
    let regular = font("Family", "Regular", 500);
    let bold = font("Family", "Bold", 520);
    let italic = font("Family", "Italic", 500);
    let ttc = build_collection(&[regular.as_slice(), bold.as_slice(), italic.as_slice()]).unwrap();

    let mut manager: FontSetManager = FontSetManager::default();
    manager
        .build_from_memory_sources([source("family.ttc", ttc), source("x", font("X", "Regular", 1))])
        .unwrap();
    assert_eq!(manager.font_count(), 4);
}

#[test]
fn test_malformed_font_data_is_fatal() {
    let mut manager: FontSetManager = FontSetManager::default();
    let err = manager
        .build_from_memory_sources([
            source("good.ttf", font("Good", "Regular", 500)),
            source("bad.ttf", b"this is not OpenType".to_vec()),
        ])
        .unwrap_err();

    assert!(matches!(err, Error::Parse { ref source_name, .. } if source_name == "bad.ttf"));
    assert!(!manager.is_built());
    assert_eq!(manager.font_count(), 0);
}

#[test]
fn test_real_font_data() {
    let mut manager: FontSetManager = FontSetManager::default();
    manager
        .build_from_memory_sources([FontByteSource::new(
            "cmap12.ttf",
            Arc::new(font_test_data::CMAP12_FONT1),
        )])
        .unwrap();
    assert_eq!(manager.font_count(), 1);

    let details = manager.font_data_details(&CancellationToken::new());
    assert_eq!(details.len(), 1);
    assert!(is_detail_line(&details[0]), "unexpected detail line: {}", details[0]);
}

#[test]
fn test_variable_font_named_instances() {
    let mut manager: FontSetManager = FontSetManager::default();
    manager
        .build_from_memory_sources([FontByteSource::new(
            "vazirmatn.ttf",
            Arc::new(font_test_data::VAZIRMATN_VAR),
        )])
        .unwrap();

    assert_eq!(manager.font_count(), 9);
    assert_eq!(manager.full_names(), vec!["Thin", "Regular", "Bold"]);

    let details = manager.font_data_details(&CancellationToken::new());
    assert_eq!(details.len(), 9);
    assert!(details[0].starts_with("Thin: x-height = "), "got: {details:?}");
    assert!(details[1].starts_with("Font 1: x-height = "), "got: {details:?}");
    assert!(details.iter().all(|line| is_detail_line(line)));
}

// ============================================================================
// Single build and loader lifetime
// ============================================================================

#[test]
fn test_second_build_is_rejected() {
    let (backend, events) = RecordingBackend::new(true);
    let mut manager = FontSetManager::new(backend);
    manager.build_from_memory_sources([source("a", font("A", "Regular", 500))]).unwrap();

    let err = manager.build_from_memory_sources([source("b", font("B", "Regular", 500))]);
    assert!(matches!(err, Err(Error::AlreadyBuilt)));
    assert_eq!(manager.font_count(), 1);
    assert_eq!(*events.lock().unwrap(), vec!["register"]);
}

#[test]
fn test_retry_after_failure_registers_once() {
    let (backend, events) = RecordingBackend::new(true);
    let mut manager = FontSetManager::new(backend);
    assert!(manager.build_from_memory_sources([source("bad", vec![0; 4])]).is_err());
    manager.build_from_memory_sources([source("a", font("A", "Regular", 500))]).unwrap();

    assert_eq!(manager.font_count(), 1);
    assert_eq!(*events.lock().unwrap(), vec!["register"]);
}

#[test]
fn test_drop_unregisters_loaders() {
    let (backend, events) = RecordingBackend::new(true);
    let mut manager = FontSetManager::new(backend);
    manager.build_from_memory_sources([source("a", font("A", "Regular", 500))]).unwrap();
    manager.register_loader(RemoteLoader::new(Vec::new(), false)).unwrap();
    drop(manager);

    assert_eq!(
        *events.lock().unwrap(),
        vec!["register", "register", "unregister", "unregister"]
    );
}

#[test]
fn test_drop_after_failed_build_unregisters() {
    let (backend, events) = RecordingBackend::new(true);
    {
        let mut manager = FontSetManager::new(backend);
        assert!(manager.build_from_memory_sources([source("bad", vec![1, 2, 3])]).is_err());
    }
    assert_eq!(*events.lock().unwrap(), vec!["register", "unregister"]);
}

#[test]
fn test_unsupported_backend_does_not_build() {
    let (backend, events) = RecordingBackend::new(false);
    let mut manager = FontSetManager::new(backend);
    assert!(!manager.supports_in_memory_fonts());

    let err = manager.build_from_memory_sources([source("a", font("A", "Regular", 500))]);
    assert!(matches!(err, Err(Error::Unsupported)));
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_set_keeps_source_owner_alive() {
    let owner: SharedFontData = Arc::new(font("Owned", "Regular", 500));
    let mut manager: FontSetManager = FontSetManager::default();
    let set = manager
        .build_from_memory_sources([FontByteSource::new("owned", owner.clone())])
        .unwrap();
    assert!(Arc::strong_count(&owner) > 1);

    drop(owner);
    let face = manager.backend().create_font_face(set.entry(0).unwrap()).unwrap();
    assert_eq!(face.full_name.as_deref(), Some("Owned Regular"));
}

// ============================================================================
// Names
// ============================================================================

#[test]
fn test_full_names_are_deduplicated() {
    let first = SyntheticFont::new("Shared", "Regular").x_height(500).build().unwrap();
    let second = SyntheticFont::new("Shared", "Book")
        .localized_full_name(font_synth::LANGUAGE_EN_US, "Shared Regular")
        .x_height(510)
        .build()
        .unwrap();

    let mut manager: FontSetManager = FontSetManager::default();
    manager.build_from_memory_sources([source("1", first), source("2", second)]).unwrap();

    assert_eq!(manager.font_count(), 2);
    assert_eq!(manager.full_names(), vec!["Shared Regular"]);
}

#[test]
fn test_full_names_prefer_locale() {
    let data = SyntheticFont::new("Example", "Regular")
        .localized_full_name(0x0407, "Beispiel Standard")
        .build()
        .unwrap();
    let plain = font("Plain", "Regular", 500);

    let mut manager = FontSetManager::new(SkrifaBackend::new()).with_locale("de-DE");
    manager.build_from_memory_sources([source("1", data), source("2", plain)]).unwrap();

    assert_eq!(manager.full_names(), vec!["Beispiel Standard", "Plain Regular"]);
    assert_eq!(manager.full_names_for_locale("en-US"), vec!["Example Regular", "Plain Regular"]);
}

// ============================================================================
// Locality and font data details
// ============================================================================

#[test]
fn test_resource_and_document_fonts() {
    let resource = source("resource", font("Resource Sans", "Regular", 486));
    let (document, embedded) =
        package_source("Sample document text.", &font("Document Serif", "Italic", 430));

    let mut manager: FontSetManager = FontSetManager::default();
    manager.build_from_memory_sources([resource, embedded]).unwrap();
    drop(document);

    assert_eq!(manager.font_count(), 2);
    assert!(!manager.has_remote_fonts());

    let details = manager.font_data_details(&CancellationToken::new());
    assert_eq!(
        details,
        vec!["Resource Sans Regular: x-height = 486", "Document Serif Italic: x-height = 430"]
    );
    assert!(details.iter().all(|line| is_detail_line(line)));
}

#[test]
fn test_cancelled_token_returns_empty_immediately() {
    let (manager, loader) = remote_manager(false);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let start = Instant::now();
    assert!(manager.font_data_details(&cancel).is_empty());
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(!loader.requested.load(Ordering::SeqCst));
}

#[test]
fn test_remote_font_is_fetched_on_request() {
    let (manager, loader) = remote_manager(true);
    assert!(manager.has_remote_fonts());
    assert!(manager.full_names().is_empty());

    let details = manager.font_data_details(&CancellationToken::new());
    assert!(loader.requested.load(Ordering::SeqCst));
    assert_eq!(details, vec!["Remote Sans Regular: x-height = 540"]);
    assert!(!manager.has_remote_fonts());
}

#[test]
fn test_remote_font_timeout_returns_empty() {
    let (manager, loader) = remote_manager(false);

    let start = Instant::now();
    let details =
        manager.font_data_details_with_timeout(&CancellationToken::new(), Duration::from_millis(60));
    assert!(details.is_empty());
    assert!(start.elapsed() >= Duration::from_millis(60));
    assert!(loader.requested.load(Ordering::SeqCst));
}

#[test]
fn test_cancel_while_waiting_returns_empty() {
    let (manager, _loader) = remote_manager(false);
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            cancel.cancel();
        })
    };

    let start = Instant::now();
    let details = manager.font_data_details(&cancel);
    canceller.join().unwrap();

    assert!(details.is_empty());
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_mixed_local_and_missing_remote_is_not_partial() {
    let mut manager: FontSetManager = FontSetManager::default();
    let memory = Arc::new(InMemoryFontFileLoader::new());
    let remote = RemoteLoader::new(font("Remote", "Regular", 500), false);
    manager.register_loader(memory.clone()).unwrap();
    manager.register_loader(remote.clone()).unwrap();

    let local = memory.create_file(source("local.ttf", font("Local", "Regular", 500)));
    let missing = FontFile::new(remote, FileKey(0), "remote.ttf");
    manager.build_from_font_files(vec![local, missing]).unwrap();

    assert_eq!(manager.font_count(), 2);
    assert!(manager.has_remote_fonts());
    assert_eq!(manager.full_names(), vec!["Local Regular"]);
    assert!(
        manager
            .font_data_details_with_timeout(&CancellationToken::new(), Duration::from_millis(10))
            .is_empty()
    );
}
