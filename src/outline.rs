/*
 *  outline.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Outline text from system fonts: fontdb finds the faces, ttf-parser
 *  supplies advances and glyph outlines, tiny-skia fills them
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use tiny_skia::PathBuilder;
use ttf_parser::{GlyphId, OutlineBuilder};
use usvg::fontdb::{Database, Family, ID, Query, Weight};

use crate::typography::{Face, FontProvider, Role};
use crate::wrap::{MeasureError, TextMeasure};

/// Bullet marker for faces that can draw U+2022.
pub const OUTLINE_BULLET_MARKER: &str = "\u{2022} ";

/// Card text families, first match wins. The generic sans-serif comes last.
const PRIMARY_FAMILIES: [&str; 6] =
    ["Segoe UI", "Arial", "Helvetica", "DejaVu Sans", "Liberation Sans", "Noto Sans"];

/// Consulted per character when the primary face has no glyph.
const FALLBACK_FAMILIES: [&str; 9] = [
    "Noto Sans CJK SC",
    "Microsoft YaHei",
    "PingFang SC",
    "WenQuanYi Micro Hei",
    "Droid Sans Fallback",
    "Noto Sans Symbols",
    "Noto Sans Symbols2",
    "Segoe UI Symbol",
    "DejaVu Sans",
];

/// One face's bytes, copied out of the font database.
pub struct FontData {
    name: String,
    bytes: Vec<u8>,
    index: u32,
}

impl FontData {
    /// `None` unless ttf-parser accepts the face.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, index: u32) -> Option<Self> {
        ttf_parser::Face::parse(&bytes, index).ok()?;
        Some(Self { name: name.into(), bytes, index })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.bytes, self.index).ok()
    }
}

impl fmt::Debug for FontData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FontData({} #{}, {} bytes)", self.name, self.index, self.bytes.len())
    }
}

/// Regular and bold card faces plus the per-character fallback chain.
#[derive(Debug, Clone)]
pub struct OutlineFonts {
    regular: Arc<FontData>,
    bold: Arc<FontData>,
    fallback: Arc<[Arc<FontData>]>,
}

impl OutlineFonts {
    /// Fonts under `font_dir` (preferred) and the system font directories.
    /// `None` when no usable face is found.
    pub fn load(font_dir: Option<&Path>) -> Option<Self> {
        let mut db = Database::new();
        let mut preferred = Vec::new();
        if let Some(dir) = font_dir {
            db.load_fonts_dir(dir);
            preferred.extend(db.faces().filter_map(|f| f.families.first().map(|(name, _)| name.clone())));
            if preferred.is_empty() {
                warn!("no fonts found in {}", dir.display());
            }
        }
        db.load_system_fonts();
        debug!("{} font faces available", db.len());
        Self::from_database(&db, &preferred)
    }

    /// Pick the card faces from `db`, trying `preferred` families first.
    pub fn from_database(db: &Database, preferred: &[String]) -> Option<Self> {
        let mut families: Vec<Family<'_>> = preferred.iter().map(|n| Family::Name(n)).collect();
        families.extend(PRIMARY_FAMILIES.iter().map(|n| Family::Name(n)));
        families.push(Family::SansSerif);

        let regular_id = query(db, &families, Weight::NORMAL)?;
        let regular = Arc::new(copy_face(db, regular_id)?);
        let bold = match query(db, &families, Weight::BOLD) {
            Some(id) if id != regular_id => copy_face(db, id).map(Arc::new).unwrap_or_else(|| regular.clone()),
            _ => regular.clone(),
        };

        let mut seen = vec![regular_id];
        let mut fallback = Vec::new();
        for name in FALLBACK_FAMILIES {
            let Some(id) = query(db, &[Family::Name(name)], Weight::NORMAL) else { continue };
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Some(data) = copy_face(db, id) {
                fallback.push(Arc::new(data));
            }
        }

        info!(
            "card text in {} (bold {}), {} fallback faces",
            regular.name(),
            bold.name(),
            fallback.len()
        );
        Some(Self { regular, bold, fallback: fallback.into() })
    }

    /// True when some loaded face has a glyph for `c`.
    pub fn covers(&self, c: char) -> bool {
        std::iter::once(&self.regular)
            .chain(self.fallback.iter())
            .filter_map(|f| f.face())
            .any(|face| face.glyph_index(c).is_some())
    }
}

fn query(db: &Database, families: &[Family<'_>], weight: Weight) -> Option<ID> {
    db.query(&Query { families, weight, ..Query::default() })
}

fn copy_face(db: &Database, id: ID) -> Option<FontData> {
    let name = db
        .face(id)
        .and_then(|info| info.families.first().map(|(n, _)| n.clone()))
        .unwrap_or_default();
    db.with_face_data(id, |data, index| FontData::new(name, data.to_vec(), index))
        .flatten()
}

impl FontProvider for OutlineFonts {
    type Face = OutlineFace;

    fn face(&self, role: Role, px: u32) -> OutlineFace {
        let primary = if role.is_bold() { self.bold.clone() } else { self.regular.clone() };
        OutlineFace { primary, fallback: self.fallback.clone(), px: px.max(1) }
    }
}

/// An outline face at a pixel em size.
#[derive(Clone)]
pub struct OutlineFace {
    primary: Arc<FontData>,
    fallback: Arc<[Arc<FontData>]>,
    px: u32,
}

impl fmt::Debug for OutlineFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OutlineFace({} {}px)", self.primary.name(), self.px)
    }
}

impl PartialEq for OutlineFace {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.primary, &other.primary) && self.px == other.px
    }
}

/// Parsed faces for one call: primary first, then the fallbacks.
struct Chain<'a> {
    faces: Vec<ttf_parser::Face<'a>>,
}

impl<'a> Chain<'a> {
    /// Face and glyph for `c`; the primary's notdef when nothing covers it.
    fn glyph(&self, c: char) -> (&ttf_parser::Face<'a>, GlyphId) {
        self.faces
            .iter()
            .find_map(|face| face.glyph_index(c).map(|g| (face, g)))
            .unwrap_or((&self.faces[0], GlyphId(0)))
    }
}

impl OutlineFace {
    pub fn px(&self) -> u32 {
        self.px
    }

    fn chain(&self) -> Option<Chain<'_>> {
        let primary = self.primary.face()?;
        let mut faces = vec![primary];
        faces.extend(self.fallback.iter().filter_map(|f| f.face()));
        Some(Chain { faces })
    }

    fn scale(&self, face: &ttf_parser::Face<'_>) -> f32 {
        self.px as f32 / face.units_per_em().max(1) as f32
    }

    /// Filled outline of `text` with its line top at (`x`, `top`).
    /// `None` for blank text or a face that no longer parses.
    pub fn text_path(&self, text: &str, x: f32, top: f32) -> Option<tiny_skia::Path> {
        let chain = self.chain()?;
        let primary = &chain.faces[0];
        let baseline = top + primary.ascender() as f32 * self.scale(primary);

        let mut builder = PathBuilder::new();
        let mut pen = x;
        for c in text.chars() {
            let (face, glyph) = chain.glyph(c);
            let scale = self.scale(face);
            let mut outline = GlyphOutline { builder: &mut builder, x: pen, y: baseline, scale };
            face.outline_glyph(glyph, &mut outline);
            pen += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
        }
        builder.finish()
    }
}

impl TextMeasure for OutlineFace {
    fn width(&self, text: &str) -> Result<u32, MeasureError> {
        let chain = self
            .chain()
            .ok_or_else(|| MeasureError::new(text, format!("cannot parse font {}", self.primary.name())))?;
        let advance: f32 = text
            .chars()
            .map(|c| {
                let (face, glyph) = chain.glyph(c);
                face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * self.scale(face)
            })
            .sum();
        let width = advance.ceil();
        if !width.is_finite() || width > u32::MAX as f32 {
            return Err(MeasureError::new(text, "width overflows u32"));
        }
        Ok(width as u32)
    }
}

impl Face for OutlineFace {
    fn line_height(&self) -> u32 {
        match self.primary.face() {
            Some(face) => {
                let units = face.height() as f32 + face.line_gap() as f32;
                (units * self.scale(&face)).ceil().max(1.0) as u32
            }
            None => self.px,
        }
    }

    fn bullet_marker(&self) -> &'static str {
        OUTLINE_BULLET_MARKER
    }
}

/// Font units (y up) to canvas pixels (y down) at a pen position.
struct GlyphOutline<'a> {
    builder: &'a mut PathBuilder,
    x: f32,
    y: f32,
    scale: f32,
}

impl GlyphOutline<'_> {
    fn at(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.at(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.at(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.at(x1, y1);
        let (x, y) = self.at(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.at(x1, y1);
        let (x2, y2) = self.at(x2, y2);
        let (x, y) = self.at(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fonts() -> Option<OutlineFonts> {
        let fonts = OutlineFonts::load(None);
        if fonts.is_none() {
            eprintln!("no system fonts, skipping");
        }
        fonts
    }

    #[test]
    fn test_garbage_font_rejected() {
        assert!(FontData::new("junk", b"not a font".to_vec(), 0).is_none());
    }

    #[test]
    fn test_empty_directory_loads_nothing() {
        let db = Database::new();
        assert!(OutlineFonts::from_database(&db, &[]).is_none());
    }

    #[test]
    fn test_width_grows_with_text_and_size() {
        let Some(fonts) = fonts() else { return };
        let small = fonts.face(Role::Bullet, 14);
        let big = fonts.face(Role::Bullet, 28);
        assert_eq!(small.width("").unwrap(), 0);
        let one = small.width("Speed").unwrap();
        let two = small.width("Speed Speed").unwrap();
        assert!(one > 0 && two > one);
        assert!(big.width("Speed").unwrap() > one);
    }

    #[test]
    fn test_line_height_tracks_px() {
        let Some(fonts) = fonts() else { return };
        let face = fonts.face(Role::Subtitle, 16);
        assert!(face.line_height() >= 16, "{face:?}");
        assert!(face.line_height() < 32, "{face:?}");
        assert_eq!(face.bullet_marker(), OUTLINE_BULLET_MARKER);
    }

    #[test]
    fn test_title_uses_bold_slot() {
        let Some(fonts) = fonts() else { return };
        let title = fonts.face(Role::Title, 30);
        let subtitle = fonts.face(Role::Subtitle, 30);
        assert_eq!(title.px(), 30);
        // same size, so widths only differ by weight
        assert!(title.width("Processor").unwrap() >= subtitle.width("Processor").unwrap());
    }

    #[test]
    fn test_text_path_sits_below_top() {
        let Some(fonts) = fonts() else { return };
        let face = fonts.face(Role::Bullet, 20);
        let path = face.text_path("Hx", 10.0, 5.0).unwrap();
        let b = path.bounds();
        assert!(b.left() >= 10.0 && b.top() >= 5.0, "{b:?}");
        assert!(b.bottom() <= 5.0 + face.line_height() as f32 + 1.0, "{b:?}");
        assert!(face.text_path("   ", 0.0, 0.0).is_none());
    }
}
