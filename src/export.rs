/*
 *  export.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  One call from a snapshot to a PNG on disk
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

use chrono::{DateTime, Local};
use log::info;

use crate::dimensions::CanvasSize;
use crate::draw::DrawFace;
use crate::error::ExportError;
use crate::render::{render, write_png};
use crate::search::find_scale;
use crate::section::{Icon, SECTION_COUNT, Section, Snapshot};
use crate::specs::SectionsFile;
use crate::typography::{FontProvider, TextFonts};

/// What one export did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub scale_percent: u32,
    /// false when the content overflows even at the minimum scale
    pub fits: bool,
    pub bytes: usize,
}

/// Lay out, paint and write `snapshot` as a PNG at `output`, with the
/// system fonts.
///
/// A fresh plan is built for every call; nothing is shared between exports.
pub fn export_png(
    snapshot: &Snapshot,
    header_label: &str,
    canvas: CanvasSize,
    output: &Path,
) -> Result<ExportReport, ExportError> {
    export_png_with(&TextFonts::system(), snapshot, header_label, canvas, output)
}

/// [`export_png`] with an explicit font provider.
pub fn export_png_with<P>(
    fonts: &P,
    snapshot: &Snapshot,
    header_label: &str,
    canvas: CanvasSize,
    output: &Path,
) -> Result<ExportReport, ExportError>
where
    P: FontProvider,
    P::Face: DrawFace,
{
    let plan = find_scale(snapshot, header_label, canvas, fonts)?;
    let png = render(&plan)?;
    write_png(output, &png)?;
    Ok(ExportReport {
        path: output.to_path_buf(),
        scale_percent: plan.scale_percent,
        fits: plan.fits(),
        bytes: png.len(),
    })
}

/// Exactly seven sections in export order, or `InvalidInput`.
pub fn snapshot_from_sections(
    sections: Vec<Section>,
    scanned_at: impl Into<String>,
    logo: Icon,
) -> Result<Snapshot, ExportError> {
    let count = sections.len();
    let sections: [Section; SECTION_COUNT] = sections.try_into().map_err(|_| {
        ExportError::InvalidInput(format!("expected {SECTION_COUNT} sections, got {count}"))
    })?;
    Ok(Snapshot::new(sections, scanned_at).with_logo(logo))
}

impl SectionsFile {
    pub fn into_snapshot(self, icon_dir: &Path, logo: Icon) -> Result<Snapshot, ExportError> {
        let sections = self.sections.into_iter().map(|r| r.into_section(icon_dir)).collect();
        snapshot_from_sections(sections, self.scanned_at, logo)
    }
}

/// `system_specs_YYYYmmdd_HHMMSS.png`
pub fn default_output_name(now: DateTime<Local>) -> String {
    format!("system_specs_{}.png", now.format("%Y%m%d_%H%M%S"))
}

/// Append `.png` unless the path already ends with it (any case).
pub fn ensure_png_extension(path: &Path) -> PathBuf {
    let has_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if has_png {
        return path.to_path_buf();
    }
    let mut s = path.as_os_str().to_os_string();
    s.push(".png");
    info!("output renamed to {}", Path::new(&s).display());
    PathBuf::from(s)
}
