/*
 *  layout.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Per-card line wrapping and height
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

use crate::dimensions::DimensionSet;
use crate::section::{Icon, Section};
use crate::typography::{Face, TypographySet};
use crate::wrap::{MeasureError, wrap};

/// Bullet prefix for the bitmap faces. Middle dot, present in ISO-8859-1.
pub const BULLET_MARKER: &str = "\u{b7} ";

/// Wrapped content and height of one card at one scale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLayout {
    pub title_lines: Vec<String>,
    pub subtitle_lines: Vec<String>,
    pub bullet_lines: Vec<String>,
    /// max(icon, title + gap + subtitle)
    pub header_height: u32,
    /// Full card height including padding
    pub height: u32,
    pub icon: Icon,
}

impl CardLayout {
    pub fn has_icon(&self) -> bool {
        self.icon.is_some()
    }
}

/// Width left for title and subtitle beside the icon.
pub fn header_text_width(card_width: u32, has_icon: bool, dims: &DimensionSet) -> u32 {
    let inner = card_width.saturating_sub(dims.card_padding * 2);
    if has_icon {
        inner.saturating_sub(dims.icon_size + dims.icon_gap)
    } else {
        inner
    }
}

/// Lay out one section for a card of `card_width` pixels.
pub fn layout_card<F: Face>(
    section: &Section,
    card_width: u32,
    dims: &DimensionSet,
    typography: &TypographySet<F>,
) -> Result<CardLayout, MeasureError> {
    let has_icon = section.icon.is_some();
    let text_width = header_text_width(card_width, has_icon, dims);
    let bullet_width = card_width.saturating_sub(dims.card_padding * 2);

    let title_lines = wrap(&section.title, &typography.title, text_width)?;
    let subtitle_lines = wrap(&section.subtitle, &typography.subtitle, text_width)?;

    let mut bullet_lines = Vec::new();
    for bullet in &section.bullets {
        let marked = format!("{}{bullet}", typography.bullet.bullet_marker());
        bullet_lines.extend(wrap(&marked, &typography.bullet, bullet_width)?);
    }

    let text_height = title_lines.len() as u32 * typography.title.line_height()
        + dims.title_subtitle_gap
        + subtitle_lines.len() as u32 * typography.subtitle.line_height();
    let icon_height = if has_icon { dims.icon_size } else { 0 };
    let header_height = icon_height.max(text_height);

    let height = dims.card_padding
        + header_height
        + dims.header_bullets_gap
        + bullet_lines.len() as u32 * typography.bullet.line_height()
        + dims.card_padding;

    Ok(CardLayout {
        title_lines,
        subtitle_lines,
        bullet_lines,
        header_height,
        height,
        icon: section.icon.clone(),
    })
}
