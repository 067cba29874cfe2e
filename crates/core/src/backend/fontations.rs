//! [`FontBackend`] over the fontations crates.

use std::{fmt, result, sync::Arc};

use log::{debug, info};
use skrifa::{
    FontRef, MetadataProvider,
    instance::{Location, Size},
    raw::{FileRef, ReadError},
    string::StringId,
};

use super::{FaceMetrics, FontBackend, FontFace};
use crate::{
    Error, FontEntry, FontFile, FontFileLoader, FontProperties, FontSet, LocalizedName, Result,
    config::DEFAULT_LOCALE, font_set::select_localized, loader::same_loader,
};

/// Font backend that parses font data with `read-fonts` and reads names and
/// metrics with `skrifa`.
///
/// Adding a file adds every font it contains: each member of a TrueType
/// collection, and each named instance of a variable font.
#[derive(Default)]
pub struct SkrifaBackend {
    loaders: Vec<Arc<dyn FontFileLoader>>,
}

impl SkrifaBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently registered loaders.
    pub fn loader_count(&self) -> usize {
        self.loaders.len()
    }

    fn is_registered(&self, loader: &Arc<dyn FontFileLoader>) -> bool {
        self.loaders.iter().any(|registered| same_loader(registered, loader))
    }
}

impl fmt::Debug for SkrifaBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkrifaBackend").field("loaders", &self.loaders.len()).finish()
    }
}

impl FontBackend for SkrifaBackend {
    fn supports_in_memory_loading(&self) -> bool {
        true
    }

    fn register_loader(&mut self, loader: Arc<dyn FontFileLoader>) -> Result<()> {
        if self.is_registered(&loader) {
            return Err(Error::LoaderAlreadyRegistered);
        }
        self.loaders.push(loader);
        Ok(())
    }

    fn unregister_loader(&mut self, loader: &Arc<dyn FontFileLoader>) {
        self.loaders.retain(|registered| !same_loader(registered, loader));
    }

    fn build_font_set(&self, files: Vec<FontFile>) -> Result<FontSet> {
        let mut entries = Vec::new();

        for file in files {
            if !self.is_registered(file.loader()) {
                return Err(Error::LoaderNotRegistered(file.name().to_owned()));
            }

            // Remote data can't be parsed yet; the entry stays anonymous.
            let Some(source) = file.data() else {
                debug!("{} is not local, adding it without properties", file.name());
                entries.push(FontEntry::new(file, 0, None, FontProperties::default()));
                continue;
            };

            let faces = read_faces(source.data())
                .map_err(|error| Error::Parse { source_name: file.name().to_owned(), error })?;

            for (face_index, font) in faces.iter().enumerate() {
                let face_index = face_index as u32;
                let instances: Vec<_> = font.named_instances().iter().collect();

                if instances.is_empty() {
                    entries.push(FontEntry::new(
                        file.clone(),
                        face_index,
                        None,
                        face_properties(font),
                    ));
                    continue;
                }

                for (index, instance) in instances.iter().enumerate() {
                    let properties = instance_properties(
                        font,
                        instance.subfamily_name_id(),
                        instance.postscript_name_id(),
                    );
                    entries.push(FontEntry::new(file.clone(), face_index, Some(index), properties));
                }
            }

            debug!("Added {} ({} faces)", file.name(), faces.len());
        }

        info!("Built font set with {} fonts", entries.len());
        Ok(FontSet::new(entries))
    }

    fn create_font_face(&self, entry: &FontEntry) -> Result<FontFace> {
        let file = entry.file();
        let source = file.data().ok_or_else(|| Error::DataNotLocal(file.name().to_owned()))?;
        let font = FontRef::from_index(source.data(), entry.face_index())
            .map_err(|error| Error::Parse { source_name: file.name().to_owned(), error })?;

        let location = entry
            .instance()
            .and_then(|index| font.named_instances().get(index))
            .map(|instance| instance.location())
            .unwrap_or_default();

        // Named instances share the default name records, so their full name
        // is the one composed when the set was built.
        let full_name = match entry.instance() {
            Some(_) => {
                select_localized(&entry.properties().full_name, DEFAULT_LOCALE).map(str::to_owned)
            }
            None => font
                .localized_strings(StringId::FULL_NAME)
                .english_or_first()
                .map(|name| name.chars().collect()),
        };

        Ok(FontFace { full_name, metrics: face_metrics(&font, &location) })
    }
}

/// Every font in a file: one for a single font, each member for a collection.
fn read_faces(data: &[u8]) -> result::Result<Vec<FontRef<'_>>, ReadError> {
    match FileRef::new(data)? {
        FileRef::Font(font) => Ok(vec![font]),
        FileRef::Collection(collection) => {
            (0..collection.len()).map(|index| collection.get(index)).collect()
        }
    }
}

fn localized(font: &FontRef, id: StringId) -> Vec<LocalizedName> {
    font.localized_strings(id)
        .map(|name| LocalizedName::new(name.language(), name.chars().collect::<String>()))
        .collect()
}

/// Typographic family names, or the legacy family names when absent.
fn family_names(font: &FontRef) -> Vec<LocalizedName> {
    let typographic = localized(font, StringId::TYPOGRAPHIC_FAMILY_NAME);
    if typographic.is_empty() { localized(font, StringId::FAMILY_NAME) } else { typographic }
}

fn face_properties(font: &FontRef) -> FontProperties {
    FontProperties {
        full_name: localized(font, StringId::FULL_NAME),
        family_name: family_names(font),
        postscript_name: localized(font, StringId::POSTSCRIPT_NAME),
    }
}

/// Properties of a named instance: full name is `"{family} {subfamily}"` per
/// language of the instance's subfamily name.
fn instance_properties(
    font: &FontRef,
    subfamily_name_id: StringId,
    postscript_name_id: Option<StringId>,
) -> FontProperties {
    let family_name = family_names(font);

    let full_name = localized(font, subfamily_name_id)
        .into_iter()
        .map(|style| {
            let tag = style.language.as_deref().unwrap_or(DEFAULT_LOCALE);
            let family = select_localized(&family_name, tag).unwrap_or_default();
            let value = format!("{family} {}", style.value).trim().to_owned();
            LocalizedName { language: style.language, value }
        })
        .collect();

    let postscript_name =
        postscript_name_id.map(|id| localized(font, id)).unwrap_or_default();

    FontProperties { full_name, family_name, postscript_name }
}

/// Metrics at `location`. A missing OS/2 x-height is estimated from the top
/// of the `x` glyph.
fn face_metrics(font: &FontRef, location: &Location) -> FaceMetrics {
    let metrics = font.metrics(Size::unscaled(), location);
    let x_height = metrics.x_height.or_else(|| x_glyph_top(font, location)).unwrap_or(0.0);

    FaceMetrics {
        units_per_em: metrics.units_per_em,
        ascent: metrics.ascent,
        descent: metrics.descent,
        cap_height: metrics.cap_height,
        x_height,
    }
}

fn x_glyph_top(font: &FontRef, location: &Location) -> Option<f32> {
    let glyph_id = font.charmap().map('x')?;
    let bounds = font.glyph_metrics(Size::unscaled(), location).bounds(glyph_id)?;
    debug!("No OS/2 x-height, using x glyph bounds");
    Some(bounds.y_max)
}
