//! Immutable font sets and their entries.

use indexmap::IndexSet;

use crate::{FontFile, Locality, Result, config::DEFAULT_LOCALE};

/// A string together with its BCP-47 language tag, if known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedName {
    pub language: Option<String>,
    pub value: String,
}

impl LocalizedName {
    pub fn new(language: Option<&str>, value: impl Into<String>) -> Self {
        Self { language: language.map(str::to_owned), value: value.into() }
    }
}

/// Informational properties kept for every entry of a font set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontProperty {
    FullName,
    FamilyName,
    PostScriptName,
}

/// Localized property values of one font set entry.
#[derive(Debug, Clone, Default)]
pub struct FontProperties {
    pub full_name: Vec<LocalizedName>,
    pub family_name: Vec<LocalizedName>,
    pub postscript_name: Vec<LocalizedName>,
}

impl FontProperties {
    pub fn get(&self, property: FontProperty) -> &[LocalizedName] {
        match property {
            FontProperty::FullName => &self.full_name,
            FontProperty::FamilyName => &self.family_name,
            FontProperty::PostScriptName => &self.postscript_name,
        }
    }
}

/// Pick the best match for `locale` from `names`.
///
/// Tries an exact (case-insensitive) match, then `en-US`, then the first
/// value.
pub fn select_localized<'a>(names: &'a [LocalizedName], locale: &str) -> Option<&'a str> {
    let matching = |tag: &str| {
        names
            .iter()
            .find(|name| name.language.as_deref().is_some_and(|l| l.eq_ignore_ascii_case(tag)))
    };
    matching(locale)
        .or_else(|| matching(DEFAULT_LOCALE))
        .or_else(|| names.first())
        .map(|name| name.value.as_str())
}

/// One font within a font set.
///
/// An entry is a face inside a file: the only face of a single font, one
/// member of a collection, or one named instance of a variable font.
#[derive(Debug, Clone)]
pub struct FontEntry {
    file: FontFile,
    face_index: u32,
    instance: Option<usize>,
    properties: FontProperties,
}

impl FontEntry {
    pub fn new(
        file: FontFile,
        face_index: u32,
        instance: Option<usize>,
        properties: FontProperties,
    ) -> Self {
        Self { file, face_index, instance, properties }
    }

    pub fn file(&self) -> &FontFile {
        &self.file
    }

    /// Index of the face within its file (non-zero only for collections).
    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    /// Index of the named instance, for variable fonts.
    pub fn instance(&self) -> Option<usize> {
        self.instance
    }

    pub fn properties(&self) -> &FontProperties {
        &self.properties
    }

    pub fn locality(&self) -> Locality {
        self.file.locality()
    }

    pub fn enqueue_download(&self) -> Result<()> {
        self.file.enqueue_download()
    }
}

/// An immutable collection of font entries.
///
/// Entries are fixed once the set is built; a different collection of fonts
/// needs a new set.
#[derive(Debug, Clone, Default)]
pub struct FontSet {
    entries: Vec<FontEntry>,
}

impl FontSet {
    pub fn new(entries: Vec<FontEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, index: usize) -> Option<&FontEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[FontEntry] {
        &self.entries
    }

    /// Unique values of `property` across all entries.
    ///
    /// Each entry contributes its best match for `locale`. Values are kept in
    /// the order they are first seen, so the result is not sorted.
    pub fn property_values(&self, property: FontProperty, locale: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| select_localized(entry.properties().get(property), locale))
            .map(str::to_owned)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether any entry's data is not fully local.
    pub fn has_remote_fonts(&self) -> bool {
        self.entries.iter().any(|entry| entry.locality() != Locality::Local)
    }
}
