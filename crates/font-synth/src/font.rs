//! Single-font synthesis.

use font_types::{FWord, Fixed, LongDateTime, Tag, UfWord, Version16Dot16};
use read_fonts::tables::glyf::CurvePoint;
use read_fonts::types::GlyphId;
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, Contour, GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::NameId,
};

use crate::{Error, Result};

/// Windows language ID for en-US.
pub const LANGUAGE_EN_US: u16 = 0x0409;

const PLATFORM_WINDOWS: u16 = 3;
const ENCODING_UNICODE_BMP: u16 = 1;

const NAME_ID_FAMILY: u16 = 1;
const NAME_ID_SUBFAMILY: u16 = 2;
const NAME_ID_FULL_NAME: u16 = 4;
const NAME_ID_POSTSCRIPT: u16 = 6;

const ADVANCE_WIDTH: u16 = 500;
const X_GLYPH_LEFT: i16 = 50;
const X_GLYPH_RIGHT: i16 = 450;

/// Description of a font to synthesize.
///
/// Names are written to the Windows/Unicode BMP platform. The full name
/// defaults to `"{family} {style}"` in en-US; additional localized full names
/// can be added with [`SyntheticFont::localized_full_name`].
#[derive(Debug, Clone)]
pub struct SyntheticFont {
    family: String,
    style: String,
    full_names: Vec<(u16, String)>,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    cap_height: i16,
    x_height: Option<i16>,
}

impl SyntheticFont {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
            full_names: Vec::new(),
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            cap_height: 700,
            x_height: Some(500),
        }
    }

    pub fn units_per_em(mut self, units_per_em: u16) -> Self {
        self.units_per_em = units_per_em;
        self
    }

    pub fn ascender(mut self, ascender: i16) -> Self {
        self.ascender = ascender;
        self
    }

    pub fn descender(mut self, descender: i16) -> Self {
        self.descender = descender;
        self
    }

    pub fn cap_height(mut self, cap_height: i16) -> Self {
        self.cap_height = cap_height;
        self
    }

    /// Set the OS/2 `sxHeight` value.
    ///
    /// The `x` glyph is always drawn up to this height.
    pub fn x_height(mut self, x_height: i16) -> Self {
        self.x_height = Some(x_height);
        self
    }

    /// Write a version 1 OS/2 table, which has no `sxHeight` field.
    ///
    /// The `x` glyph is then drawn up to `x_glyph_height`, so readers can
    /// still derive an x-height from its outline.
    pub fn without_os2_x_height(mut self, x_glyph_height: i16) -> Self {
        self.x_height = None;
        self.cap_height = x_glyph_height;
        self
    }

    /// Add (or replace) the full name for a Windows language ID.
    pub fn localized_full_name(mut self, language_id: u16, name: impl Into<String>) -> Self {
        let name = name.into();
        match self.full_names.iter_mut().find(|(id, _)| *id == language_id) {
            Some((_, existing)) => *existing = name,
            None => self.full_names.push((language_id, name)),
        }
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// The en-US full name that will be written.
    pub fn full_name(&self) -> String {
        self.full_names
            .iter()
            .find(|(id, _)| *id == LANGUAGE_EN_US)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| format!("{} {}", self.family, self.style))
    }

    fn postscript_name(&self) -> String {
        format!("{}-{}", self.family.replace(' ', ""), self.style.replace(' ', ""))
    }

    fn x_glyph_height(&self) -> i16 {
        self.x_height.unwrap_or(self.cap_height)
    }

    /// Build the font binary.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut glyf_builder = GlyfLocaBuilder::new();
        glyf_builder.add_glyph(&Glyph::Empty)?;
        glyf_builder.add_glyph(&Glyph::Simple(self.x_glyph()))?;
        let (glyf, loca, loca_format) = glyf_builder.build();

        let cmap = Cmap::from_mappings(vec![('x', GlyphId::new(1))]).map_err(|_| Error::Cmap)?;

        let mut builder = FontBuilder::new();
        builder.add_table(&self.head(loca_format))?;
        builder.add_table(&self.hhea())?;
        builder.add_table(&hmtx())?;
        builder.add_table(&maxp())?;
        builder.add_table(&cmap)?;
        builder.add_table(&post())?;
        builder.add_table(&glyf)?;
        builder.add_table(&loca)?;
        builder.add_table(&self.name())?;
        builder.add_table(&self.os2())?;

        Ok(builder.build())
    }

    fn x_glyph(&self) -> SimpleGlyph {
        let top = self.x_glyph_height();
        let points = vec![
            CurvePoint::new(X_GLYPH_LEFT, 0, true),
            CurvePoint::new(X_GLYPH_LEFT, top, true),
            CurvePoint::new(X_GLYPH_RIGHT, top, true),
            CurvePoint::new(X_GLYPH_RIGHT, 0, true),
        ];
        let mut glyph = SimpleGlyph {
            bbox: Bbox::default(),
            contours: vec![Contour::from(points)],
            instructions: vec![],
        };
        glyph.recompute_bounding_box();
        glyph
    }

    fn head(&self, loca_format: LocaFormat) -> Head {
        Head {
            font_revision: Fixed::from_f64(1.0),
            checksum_adjustment: 0,
            magic_number: 0x5F0F3CF5,
            flags: Flags::empty(),
            units_per_em: self.units_per_em,
            created: LongDateTime::new(0),
            modified: LongDateTime::new(0),
            x_min: X_GLYPH_LEFT,
            y_min: 0,
            x_max: X_GLYPH_RIGHT,
            y_max: self.x_glyph_height(),
            mac_style: MacStyle::empty(),
            lowest_rec_ppem: 8,
            font_direction_hint: 2,
            index_to_loc_format: match loca_format {
                LocaFormat::Short => 0,
                LocaFormat::Long => 1,
            },
        }
    }

    fn hhea(&self) -> Hhea {
        Hhea {
            ascender: FWord::new(self.ascender),
            descender: FWord::new(self.descender),
            line_gap: FWord::new(0),
            advance_width_max: UfWord::new(ADVANCE_WIDTH),
            min_left_side_bearing: FWord::new(0),
            min_right_side_bearing: FWord::new(0),
            x_max_extent: FWord::new(X_GLYPH_RIGHT),
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            number_of_h_metrics: 2,
        }
    }

    fn name(&self) -> Name {
        let mut strings = vec![
            (LANGUAGE_EN_US, NAME_ID_FAMILY, self.family.clone()),
            (LANGUAGE_EN_US, NAME_ID_SUBFAMILY, self.style.clone()),
            (LANGUAGE_EN_US, NAME_ID_POSTSCRIPT, self.postscript_name()),
        ];
        if !self.full_names.iter().any(|(id, _)| *id == LANGUAGE_EN_US) {
            strings.push((LANGUAGE_EN_US, NAME_ID_FULL_NAME, self.full_name()));
        }
        strings.extend(
            self.full_names.iter().map(|(id, name)| (*id, NAME_ID_FULL_NAME, name.clone())),
        );
        strings.sort_by_key(|(language_id, name_id, _)| (*language_id, *name_id));

        let records = strings
            .into_iter()
            .map(|(language_id, name_id, string)| {
                NameRecord::new(
                    PLATFORM_WINDOWS,
                    ENCODING_UNICODE_BMP,
                    language_id,
                    NameId::new(name_id),
                    string.into(),
                )
            })
            .collect();

        Name::new(records)
    }

    fn os2(&self) -> Os2 {
        let v2 = self.x_height.is_some();
        Os2 {
            x_avg_char_width: ADVANCE_WIDTH as i16,
            us_weight_class: 400,
            us_width_class: 5,
            fs_type: 0,
            y_subscript_x_size: 650,
            y_subscript_y_size: 600,
            y_subscript_x_offset: 0,
            y_subscript_y_offset: 75,
            y_superscript_x_size: 650,
            y_superscript_y_size: 600,
            y_superscript_x_offset: 0,
            y_superscript_y_offset: 350,
            y_strikeout_size: 50,
            y_strikeout_position: 300,
            s_family_class: 0,
            panose_10: [0; 10],
            ul_unicode_range_1: 1,
            ul_unicode_range_2: 0,
            ul_unicode_range_3: 0,
            ul_unicode_range_4: 0,
            ach_vend_id: Tag::new(b"NONE"),
            fs_selection: SelectionFlags::REGULAR,
            us_first_char_index: 'x' as u16,
            us_last_char_index: 'x' as u16,
            s_typo_ascender: self.ascender,
            s_typo_descender: self.descender,
            s_typo_line_gap: 0,
            us_win_ascent: self.ascender.unsigned_abs(),
            us_win_descent: self.descender.unsigned_abs(),
            ul_code_page_range_1: Some(1),
            ul_code_page_range_2: Some(0),
            sx_height: self.x_height,
            s_cap_height: v2.then_some(self.cap_height),
            us_default_char: v2.then_some(0),
            us_break_char: v2.then_some(0x20),
            us_max_context: v2.then_some(0),
            us_lower_optical_point_size: None,
            us_upper_optical_point_size: None,
        }
    }
}

fn hmtx() -> Hmtx {
    Hmtx {
        h_metrics: vec![
            LongMetric { advance: ADVANCE_WIDTH, side_bearing: 0 },
            LongMetric { advance: ADVANCE_WIDTH, side_bearing: X_GLYPH_LEFT },
        ],
        left_side_bearings: vec![],
    }
}

fn maxp() -> Maxp {
    Maxp {
        num_glyphs: 2,
        max_points: Some(4),
        max_contours: Some(1),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    }
}

fn post() -> Post {
    Post {
        version: Version16Dot16::VERSION_3_0,
        italic_angle: Fixed::from_f64(0.0),
        underline_position: FWord::new(-100),
        underline_thickness: FWord::new(50),
        is_fixed_pitch: 0,
        min_mem_type42: 0,
        max_mem_type42: 0,
        min_mem_type1: 0,
        max_mem_type1: 0,
        num_glyphs: Some(2),
        glyph_name_index: None,
        string_data: None,
    }
}
