/*
 *  render.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Paints a render plan onto a canvas and writes the PNG
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

use std::io::Write;
use std::path::Path;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::Rectangle};
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::canvas::Canvas;
use crate::dimensions::LOGO_TEXT_GAP;
use crate::draw::{DrawFace, draw_icon, draw_lines, draw_rounded_border};
use crate::error::ExportError;
use crate::layout::CardLayout;
use crate::search::RenderPlan;

pub const BACKGROUND: Rgb888 = Rgb888::new(0x00, 0x00, 0x00);
pub const TEXT: Rgb888 = Rgb888::new(0xff, 0xff, 0xff);
pub const SUBTITLE: Rgb888 = Rgb888::new(0xf2, 0xf2, 0xf2);
pub const BORDER: Rgb888 = Rgb888::new(0xf1, 0xf1, 0xf1);

pub const BORDER_RADIUS: u32 = 24;
pub const BORDER_WIDTH: u32 = 2;

fn draw_card<F: DrawFace>(
    canvas: &mut Canvas,
    plan: &RenderPlan<F>,
    card: &CardLayout,
    rect: Rectangle,
) {
    let d = &plan.dims;
    let t = &plan.typography;
    let Ok(()) = draw_rounded_border(canvas, rect, BORDER_RADIUS, BORDER_WIDTH, BORDER);

    let left = rect.top_left.x + d.card_padding as i32;
    let top = rect.top_left.y + d.card_padding as i32;

    let text_x = if card.has_icon() {
        draw_icon(canvas, &card.icon, Point::new(left, top), d.icon_size);
        left + (d.icon_size + d.icon_gap) as i32
    } else {
        left
    };

    let y = draw_lines(canvas, &card.title_lines, text_x, top, &t.title, TEXT);
    let y = y + d.title_subtitle_gap as i32;
    draw_lines(canvas, &card.subtitle_lines, text_x, y, &t.subtitle, SUBTITLE);

    let bullets_top = top + (card.header_height + d.header_bullets_gap) as i32;
    draw_lines(canvas, &card.bullet_lines, left, bullets_top, &t.bullet, TEXT);
}

fn draw_header<F: DrawFace>(canvas: &mut Canvas, plan: &RenderPlan<F>) {
    let d = &plan.dims;
    let origin = Point::new(d.outer_padding as i32, d.outer_padding as i32);

    let mut text_x = origin.x;
    if plan.header.logo.is_some() {
        draw_icon(canvas, &plan.header.logo, origin, d.logo_size);
        text_x += (d.logo_size + LOGO_TEXT_GAP) as i32;
    }

    let lines = [plan.header.label.clone(), plan.header.scan_line()];
    draw_lines(canvas, &lines, text_x, origin.y, &plan.typography.header, TEXT);
}

/// Paint the whole plan onto a fresh canvas.
///
/// Content that runs past the canvas edge (only possible at the minimum
/// scale) is clipped by the canvas bounds and nothing else.
pub fn paint<F: DrawFace>(plan: &RenderPlan<F>) -> Result<Canvas, ExportError> {
    let mut canvas = Canvas::new(plan.canvas, BACKGROUND).ok_or(ExportError::Canvas {
        width: plan.canvas.width,
        height: plan.canvas.height,
    })?;

    draw_header(&mut canvas, plan);

    for placement in plan.placements() {
        let card = plan.grid.get(placement.index).unwrap_or(&plan.full);
        draw_card(&mut canvas, plan, card, placement.rect);
    }
    debug!("painted {} cards at scale {}%", plan.grid.len() + 1, plan.scale_percent);
    Ok(canvas)
}

/// Paint and encode to PNG bytes.
pub fn render<F: DrawFace>(plan: &RenderPlan<F>) -> Result<Vec<u8>, ExportError> {
    let canvas = paint(plan)?;
    canvas
        .pixmap()
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))
}

/// Write `bytes` to `path` via a temp file in the same directory and an
/// atomic rename, so a failed write never leaves a partial file behind.
/// The file gets the same mode a plain create would (0666 less the umask).
pub fn write_png(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = temp_file_in(dir).map_err(|e| ExportError::io(path, e))?;
    tmp.write_all(bytes).map_err(|e| ExportError::io(path, e))?;
    tmp.as_file().sync_all().map_err(|e| ExportError::io(path, e))?;
    tmp.persist(path).map_err(|e| ExportError::io(path, e.error))?;
    info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

// tempfile creates 0600 files; ask for 0666 and let the umask apply
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    tempfile::Builder::new()
        .permissions(std::fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}
