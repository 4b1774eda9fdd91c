/*
 *  dimensions.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Canvas sizes and scale-derived spacing
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

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Gap between the logo and the header text, not scaled.
pub const LOGO_TEXT_GAP: u32 = 14;

/// `max(floor, round(base * scale))`
pub fn scaled(base: u32, floor: u32, scale: f32) -> u32 {
    let v = (base as f32 * scale).round();
    floor.max(if v <= 0.0 { 0 } else { v as u32 })
}

/// Known deployment canvas sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CanvasProfile {
    /// 1080x1350, portrait social card
    #[default]
    Standard,
    /// 1600x2000
    Large,
}

impl CanvasProfile {
    pub fn size(self) -> CanvasSize {
        match self {
            CanvasProfile::Standard => CanvasSize::new(1080, 1350),
            CanvasProfile::Large => CanvasSize::new(1600, 2000),
        }
    }
}

/// Fixed output size for one export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        CanvasProfile::Standard.size()
    }
}

/// Pixel spacing for one scale attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionSet {
    /// Margin around the whole canvas
    pub outer_padding: u32,

    /// Horizontal gap between the two grid columns
    pub column_gap: u32,

    /// Vertical gap between grid rows (and above the full-width card)
    pub row_gap: u32,

    /// Padding inside each card border
    pub card_padding: u32,

    /// Icon box edge
    pub icon_size: u32,

    /// Gap between icon and title/subtitle text
    pub icon_gap: u32,

    /// Gap between title block and subtitle block
    pub title_subtitle_gap: u32,

    /// Gap between card header and first bullet
    pub header_bullets_gap: u32,

    /// Gap between page header and the first card row
    pub header_gap: u32,

    /// Logo box edge (only used when a logo is present)
    pub logo_size: u32,

    /// Width of each grid card
    pub card_width: u32,

    /// Width of the full-width card
    pub full_width: u32,
}

impl DimensionSet {
    pub fn for_scale(scale: f32, canvas: CanvasSize) -> Self {
        let outer_padding = scaled(24, 16, scale);
        let column_gap = scaled(18, 12, scale);
        let full_width = canvas.width.saturating_sub(outer_padding * 2);
        Self {
            outer_padding,
            column_gap,
            row_gap: scaled(18, 12, scale),
            card_padding: scaled(22, 14, scale),
            icon_size: scaled(72, 42, scale),
            icon_gap: scaled(16, 8, scale),
            title_subtitle_gap: scaled(6, 4, scale),
            header_bullets_gap: scaled(12, 8, scale),
            header_gap: scaled(14, 8, scale),
            logo_size: scaled(84, 48, scale),
            card_width: full_width.saturating_sub(column_gap) / 2,
            full_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_rounds_and_floors() {
        assert_eq!(scaled(24, 16, 1.0), 24);
        assert_eq!(scaled(24, 16, 0.95), 23); // 22.8
        assert_eq!(scaled(24, 16, 0.65), 16); // 15.6 -> 16, floor 16
        assert_eq!(scaled(72, 42, 0.65), 47); // 46.8
        assert_eq!(scaled(6, 4, 0.65), 4);
    }

    #[test]
    fn test_full_scale_standard() {
        let d = DimensionSet::for_scale(1.0, CanvasProfile::Standard.size());
        assert_eq!(d.outer_padding, 24);
        assert_eq!(d.card_padding, 22);
        assert_eq!(d.icon_size, 72);
        assert_eq!(d.full_width, 1080 - 48);
        assert_eq!(d.card_width, (1080 - 48 - 18) / 2);
    }

    #[test]
    fn test_floor_scale_never_below_minimums() {
        let d = DimensionSet::for_scale(0.3, CanvasSize::new(1080, 1350));
        assert_eq!(d.outer_padding, 16);
        assert_eq!(d.column_gap, 12);
        assert_eq!(d.row_gap, 12);
        assert_eq!(d.card_padding, 14);
        assert_eq!(d.icon_size, 42);
        assert_eq!(d.icon_gap, 8);
        assert_eq!(d.title_subtitle_gap, 4);
        assert_eq!(d.header_bullets_gap, 8);
        assert_eq!(d.header_gap, 8);
        assert_eq!(d.logo_size, 48);
    }

    #[test]
    fn test_profiles() {
        assert_eq!(CanvasProfile::Standard.size(), CanvasSize::new(1080, 1350));
        assert_eq!(CanvasProfile::Large.size(), CanvasSize::new(1600, 2000));
        assert_eq!(CanvasSize::default(), CanvasSize::new(1080, 1350));
    }
}
