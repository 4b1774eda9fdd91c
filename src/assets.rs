/*
 *  assets.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Icon and logo lookup in the asset directory
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

use log::debug;

use crate::section::{Icon, Platform, SectionKind};

pub const LOGO_FILE: &str = "Logo.png";

/// File name of the icon for each card kind.
pub fn icon_file(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Cpu => "processor.svg",
        SectionKind::Gpu => "graphics-card.png",
        SectionKind::Ram => "RAM.svg",
        SectionKind::Storage => "storage.svg",
        SectionKind::Motherboard => "motherboard.png",
        SectionKind::Bios => "bios.png",
        SectionKind::Os(Platform::Linux) => "linux-platform.png",
        SectionKind::Os(Platform::MacOs) => "apple-logo.png",
        SectionKind::Os(Platform::Windows) => "windows.png",
    }
}

/// Icon for `kind` in `icon_dir`; `Icon::None` when the file is absent.
pub fn resolve_icon(icon_dir: &Path, kind: SectionKind) -> Icon {
    let path = icon_dir.join(icon_file(kind));
    let icon = Icon::from_path(&path);
    if !icon.is_some() {
        debug!("no icon for {} at {}", kind.title(), path.display());
    }
    icon
}

/// Explicit logo when configured, else `<icon_dir>/Logo.png` if present.
pub fn resolve_logo(icon_dir: &Path, explicit: Option<&Path>) -> Icon {
    let path: PathBuf = match explicit {
        Some(p) => p.to_path_buf(),
        None => icon_dir.join(LOGO_FILE),
    };
    Icon::from_path(&path)
}
