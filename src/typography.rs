/*
 *  typography.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Font roles and bitmap font selection for a given scale
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
use std::sync::OnceLock;

use embedded_graphics::mono_font::{
    MonoFont,
    iso_8859_1::{
        FONT_6X10, FONT_6X13, FONT_6X13_BOLD, FONT_7X13, FONT_7X13_BOLD, FONT_7X14,
        FONT_7X14_BOLD, FONT_8X13, FONT_8X13_BOLD, FONT_9X15, FONT_9X15_BOLD, FONT_9X18,
        FONT_9X18_BOLD, FONT_10X20,
    },
};

use log::warn;

use crate::dimensions::scaled;
use crate::layout::BULLET_MARKER;
use crate::outline::{OutlineFace, OutlineFonts};
use crate::wrap::{MeasureError, TextMeasure};

/// Largest integer magnification tried when matching a pixel size.
pub const MAX_MAGNIFICATION: u32 = 4;

/// Regular faces, smallest first.
const REGULAR_FACES: [&MonoFont<'static>; 8] = [
    &FONT_6X10, &FONT_6X13, &FONT_7X13, &FONT_7X14, &FONT_8X13, &FONT_9X15, &FONT_9X18, &FONT_10X20,
];

/// Bold faces, smallest first. Used for card titles.
const BOLD_FACES: [&MonoFont<'static>; 6] = [
    &FONT_6X13_BOLD, &FONT_7X13_BOLD, &FONT_7X14_BOLD, &FONT_8X13_BOLD, &FONT_9X15_BOLD, &FONT_9X18_BOLD,
];

/// The four text roles on the exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Page header ("Flex Card" / last scan line)
    Header,
    /// Card title
    Title,
    /// Card subtitle
    Subtitle,
    /// Bullet lines
    Bullet,
}

impl Role {
    /// Pixel size at scale 1.0
    pub fn base_px(self) -> u32 {
        match self {
            Role::Header => 14,
            Role::Title => 30,
            Role::Subtitle => 16,
            Role::Bullet => 14,
        }
    }

    /// Smallest pixel size regardless of scale
    pub fn floor_px(self) -> u32 {
        match self {
            Role::Header => 11,
            Role::Title => 18,
            Role::Subtitle => 11,
            Role::Bullet => 10,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Role::Title)
    }

    pub fn px_at(self, scale: f32) -> u32 {
        scaled(self.base_px(), self.floor_px(), scale)
    }
}

/// A measurable face with a fixed line height.
pub trait Face: TextMeasure {
    fn line_height(&self) -> u32;

    /// Prefix put in front of every bullet.
    fn bullet_marker(&self) -> &'static str {
        BULLET_MARKER
    }
}

/// Supplies a face for a role at a requested pixel size.
pub trait FontProvider {
    type Face: Face + Clone + fmt::Debug;

    fn face(&self, role: Role, px: u32) -> Self::Face;
}

/// Faces for every role, derived from one scale.
#[derive(Debug, Clone, PartialEq)]
pub struct TypographySet<F> {
    pub header: F,
    pub title: F,
    pub subtitle: F,
    pub bullet: F,
}

impl<F> TypographySet<F> {
    pub fn for_scale<P>(provider: &P, scale: f32) -> Self
    where
        P: FontProvider<Face = F>,
    {
        Self {
            header: provider.face(Role::Header, Role::Header.px_at(scale)),
            title: provider.face(Role::Title, Role::Title.px_at(scale)),
            subtitle: provider.face(Role::Subtitle, Role::Subtitle.px_at(scale)),
            bullet: provider.face(Role::Bullet, Role::Bullet.px_at(scale)),
        }
    }
}

/// An embedded-graphics mono font drawn at an integer magnification.
#[derive(Clone, Copy)]
pub struct MonoFace {
    font: &'static MonoFont<'static>,
    magnification: u32,
}

impl MonoFace {
    pub fn new(font: &'static MonoFont<'static>, magnification: u32) -> Self {
        Self { font, magnification: magnification.max(1) }
    }

    pub fn font(&self) -> &'static MonoFont<'static> {
        self.font
    }

    pub fn magnification(&self) -> u32 {
        self.magnification
    }

    /// Glyph cell as (width, height) before magnification
    pub fn glyph_size(&self) -> (u32, u32) {
        (self.font.character_size.width, self.font.character_size.height)
    }
}

impl fmt::Debug for MonoFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.glyph_size();
        write!(f, "MonoFace({}x{} x{})", w, h, self.magnification)
    }
}

impl PartialEq for MonoFace {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.font, other.font) && self.magnification == other.magnification
    }
}

impl TextMeasure for MonoFace {
    fn width(&self, text: &str) -> Result<u32, MeasureError> {
        let n = text.chars().count() as u32;
        if n == 0 {
            return Ok(0);
        }
        let glyphs = n
            .checked_mul(self.font.character_size.width)
            .and_then(|w| w.checked_add((n - 1) * self.font.character_spacing))
            .and_then(|w| w.checked_mul(self.magnification))
            .ok_or_else(|| MeasureError::new(text, "width overflows u32"))?;
        Ok(glyphs)
    }
}

impl Face for MonoFace {
    fn line_height(&self) -> u32 {
        self.font.character_size.height * self.magnification
    }
}

/// The built-in ISO-8859-1 bitmap fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFonts;

impl FontProvider for BitmapFonts {
    type Face = MonoFace;

    fn face(&self, role: Role, px: u32) -> MonoFace {
        let faces: &[&'static MonoFont<'static>] = if role.is_bold() { &BOLD_FACES } else { &REGULAR_FACES };
        select_face(faces, px)
    }
}

/// Card text fonts: system outlines when any are installed, else the
/// built-in bitmap faces (which draw anything outside ISO-8859-1 as '?').
#[derive(Debug, Clone)]
pub enum TextFonts {
    Outline(OutlineFonts),
    Bitmap(BitmapFonts),
}

static SYSTEM_FONTS: OnceLock<Option<OutlineFonts>> = OnceLock::new();

impl TextFonts {
    /// System fonts, looked up once per process.
    pub fn system() -> Self {
        match SYSTEM_FONTS.get_or_init(|| OutlineFonts::load(None)) {
            Some(fonts) => TextFonts::Outline(fonts.clone()),
            None => Self::bitmap_fallback(),
        }
    }

    /// Fonts in `font_dir` first, then the system ones.
    pub fn with_font_dir(font_dir: Option<&Path>) -> Self {
        match font_dir {
            None => Self::system(),
            Some(dir) => match OutlineFonts::load(Some(dir)) {
                Some(fonts) => TextFonts::Outline(fonts),
                None => Self::bitmap_fallback(),
            },
        }
    }

    fn bitmap_fallback() -> Self {
        warn!("no outline fonts found; text outside ISO-8859-1 will render as '?'");
        TextFonts::Bitmap(BitmapFonts)
    }
}

impl FontProvider for TextFonts {
    type Face = TextFace;

    fn face(&self, role: Role, px: u32) -> TextFace {
        match self {
            TextFonts::Outline(fonts) => TextFace::Outline(fonts.face(role, px)),
            TextFonts::Bitmap(fonts) => TextFace::Bitmap(fonts.face(role, px)),
        }
    }
}

/// A face handed out by [`TextFonts`].
#[derive(Debug, Clone, PartialEq)]
pub enum TextFace {
    Outline(OutlineFace),
    Bitmap(MonoFace),
}

impl TextMeasure for TextFace {
    fn width(&self, text: &str) -> Result<u32, MeasureError> {
        match self {
            TextFace::Outline(f) => f.width(text),
            TextFace::Bitmap(f) => f.width(text),
        }
    }
}

impl Face for TextFace {
    fn line_height(&self) -> u32 {
        match self {
            TextFace::Outline(f) => f.line_height(),
            TextFace::Bitmap(f) => f.line_height(),
        }
    }

    fn bullet_marker(&self) -> &'static str {
        match self {
            TextFace::Outline(f) => f.bullet_marker(),
            TextFace::Bitmap(f) => f.bullet_marker(),
        }
    }
}

/// Pick the face/magnification whose line height is the largest not above
/// `px`. Lower magnification wins ties. Falls back to the smallest face.
fn select_face(faces: &[&'static MonoFont<'static>], px: u32) -> MonoFace {
    let mut best: Option<MonoFace> = None;
    for magnification in 1..=MAX_MAGNIFICATION {
        for &font in faces {
            let candidate = MonoFace::new(font, magnification);
            let height = candidate.line_height();
            if height > px {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => height > b.line_height(),
            };
            if better {
                best = Some(candidate);
            }
        }
    }
    best.unwrap_or_else(|| MonoFace::new(faces[0], 1))
}
