/*
 *  section.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Card content handed to the engine by the data source
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

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Number of cards on one export: six in the grid, one full width.
pub const SECTION_COUNT: usize = 7;

/// Cards laid out two per row.
pub const GRID_CARDS: usize = 6;

/// Which hardware category a card describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Cpu,
    Gpu,
    Ram,
    Storage,
    Motherboard,
    Bios,
    /// Operating system; the platform picks the icon
    Os(Platform),
}

impl SectionKind {
    /// Export order, the last one is the full-width card.
    pub fn export_order(platform: Platform) -> [SectionKind; SECTION_COUNT] {
        [
            SectionKind::Cpu,
            SectionKind::Gpu,
            SectionKind::Ram,
            SectionKind::Storage,
            SectionKind::Motherboard,
            SectionKind::Bios,
            SectionKind::Os(platform),
        ]
    }

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Cpu => "CPU",
            SectionKind::Gpu => "GPU",
            SectionKind::Ram => "RAM",
            SectionKind::Storage => "Storage",
            SectionKind::Motherboard => "Motherboard",
            SectionKind::Bios => "BIOS",
            SectionKind::Os(_) => "Operating System",
        }
    }
}

/// Operating system family, used only for the OS icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// Guess from a free-form OS name; anything unrecognised is Windows.
    pub fn from_os_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("linux") {
            Platform::Linux
        } else if name.contains("mac") || name.contains("darwin") || name.contains("os x") {
            Platform::MacOs
        } else {
            Platform::Windows
        }
    }
}

/// A resolved icon asset, or explicitly none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Icon {
    /// SVG, rendered at the target box size
    Vector(PathBuf),
    /// Bitmap, scaled preserving aspect ratio
    Raster(PathBuf),
    /// Nothing to draw; the card reserves no icon space
    #[default]
    None,
}

impl Icon {
    /// Classify an existing file by extension. Missing files become `None`.
    pub fn from_path(path: &Path) -> Self {
        if !path.is_file() {
            return Icon::None;
        }
        let is_svg = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
        if is_svg {
            Icon::Vector(path.to_path_buf())
        } else {
            Icon::Raster(path.to_path_buf())
        }
    }

    pub fn is_some(&self) -> bool {
        !matches!(self, Icon::None)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Icon::Vector(p) | Icon::Raster(p) => Some(p),
            Icon::None => None,
        }
    }
}

/// One card's content. Strings are rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    pub title: String,
    pub subtitle: String,
    pub bullets: Vec<String>,
    pub icon: Icon,
}

impl Section {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            bullets,
            icon: Icon::None,
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }
}

/// Everything one export renders.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub sections: [Section; SECTION_COUNT],
    /// Shown after "Last scan: ", opaque to the engine
    pub scanned_at: String,
    pub logo: Icon,
}

impl Snapshot {
    pub fn new(sections: [Section; SECTION_COUNT], scanned_at: impl Into<String>) -> Self {
        Self { sections, scanned_at: scanned_at.into(), logo: Icon::None }
    }

    pub fn with_logo(mut self, logo: Icon) -> Self {
        self.logo = logo;
        self
    }

    pub fn grid(&self) -> &[Section] {
        &self.sections[..GRID_CARDS]
    }

    pub fn full_width(&self) -> &Section {
        &self.sections[GRID_CARDS]
    }
}
