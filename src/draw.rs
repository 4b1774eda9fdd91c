/*
 *  draw.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Drawing helpers: text lines, card borders and image assets
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

use std::fs;
use std::path::Path;

use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyleBuilder, Rectangle, RoundedRectangle, StrokeAlignment},
    text::{Baseline, Text},
};
use log::warn;
use thiserror::Error;
use tiny_skia::{Pixmap, Transform};

use crate::canvas::{Canvas, Magnified};
use crate::section::Icon;
use crate::svgimage::{SvgError, VectorIcon};
use crate::outline::OutlineFace;
use crate::typography::{Face, MonoFace, TextFace};

/// Errors that can happen while loading an image asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SVG error: {0}")]
    Svg(#[from] SvgError),
    #[error("decode error: {0}")]
    Decode(String),
}

/// A face that can paint a line of text onto the canvas.
pub trait DrawFace: Face {
    /// Draw `text` with its line top at `top_left`.
    fn draw(&self, canvas: &mut Canvas, text: &str, top_left: Point, color: Rgb888);
}

impl DrawFace for MonoFace {
    fn draw(&self, canvas: &mut Canvas, text: &str, top_left: Point, color: Rgb888) {
        let Ok(()) = draw_text(canvas, text, top_left, self, color);
    }
}

impl DrawFace for OutlineFace {
    fn draw(&self, canvas: &mut Canvas, text: &str, top_left: Point, color: Rgb888) {
        if let Some(path) = self.text_path(text, top_left.x as f32, top_left.y as f32) {
            canvas.fill_path(&path, color);
        }
    }
}

impl DrawFace for TextFace {
    fn draw(&self, canvas: &mut Canvas, text: &str, top_left: Point, color: Rgb888) {
        match self {
            TextFace::Outline(f) => f.draw(canvas, text, top_left, color),
            TextFace::Bitmap(f) => f.draw(canvas, text, top_left, color),
        }
    }
}

/// Draw one line of text with its top edge at `top_left`.
pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    top_left: Point,
    face: &MonoFace,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    let style = MonoTextStyle::new(face.font(), color);
    let mut magnified = Magnified::new(target, top_left, face.magnification());
    Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut magnified)?;
    Ok(())
}

/// Draw lines top-down, one line height apart. Returns the y below the last line.
pub fn draw_lines<F: DrawFace>(
    canvas: &mut Canvas,
    lines: &[String],
    x: i32,
    mut y: i32,
    face: &F,
    color: Rgb888,
) -> i32 {
    for line in lines {
        face.draw(canvas, line, Point::new(x, y), color);
        y += face.line_height() as i32;
    }
    y
}

/// Rounded-rect outline, stroke kept inside `rect`.
pub fn draw_rounded_border<D>(
    target: &mut D,
    rect: Rectangle,
    radius: u32,
    stroke_width: u32,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    RoundedRectangle::with_equal_corners(rect, Size::new_equal(radius))
        .into_styled(
            PrimitiveStyleBuilder::new()
                .stroke_color(color)
                .stroke_width(stroke_width)
                .stroke_alignment(StrokeAlignment::Inside)
                .build(),
        )
        .draw(target)?;
    Ok(())
}

fn load_vector(path: &Path, size: u32) -> Result<Pixmap, AssetError> {
    let data = fs::read(path)?;
    Ok(VectorIcon::parse(&data)?.rasterize(size, size)?)
}

fn load_raster(path: &Path) -> Result<Pixmap, AssetError> {
    let data = fs::read(path)?;
    Pixmap::decode_png(&data).map_err(|e| AssetError::Decode(e.to_string()))
}

/// Scale and offset that fit `w`x`h` inside a `size` box, centred.
pub fn letterbox(w: u32, h: u32, size: u32) -> (f32, f32, f32) {
    if w == 0 || h == 0 {
        return (0.0, 0.0, 0.0);
    }
    let scale = (size as f32 / w as f32).min(size as f32 / h as f32);
    let dx = (size as f32 - w as f32 * scale) / 2.0;
    let dy = (size as f32 - h as f32 * scale) / 2.0;
    (scale, dx, dy)
}

/// Draw an icon into the `size` box at `top_left`.
///
/// Vector icons fill the box; raster icons keep their aspect ratio.
/// Missing or undecodable assets are skipped with a warning.
pub fn draw_icon(canvas: &mut Canvas, icon: &Icon, top_left: Point, size: u32) {
    let (x, y) = (top_left.x as f32, top_left.y as f32);
    let result = match icon {
        Icon::None => return,
        Icon::Vector(path) => load_vector(path, size)
            .map(|pixmap| canvas.blit(pixmap.as_ref(), Transform::from_translate(x, y))),
        Icon::Raster(path) => load_raster(path).map(|pixmap| {
            let (scale, dx, dy) = letterbox(pixmap.width(), pixmap.height(), size);
            let transform = Transform::from_row(scale, 0.0, 0.0, scale, x + dx, y + dy);
            canvas.blit(pixmap.as_ref(), transform);
        }),
    };
    if let Err(e) = result {
        if let Some(path) = icon.path() {
            warn!("skipping {}: {e}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::CanvasSize;
    use crate::typography::{FontProvider, Role, TextFonts};
    use crate::wrap::TextMeasure;
    use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
    use embedded_graphics::pixelcolor::RgbColor;
    use std::path::PathBuf;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::new(CanvasSize::new(w, h), Rgb888::BLACK).unwrap()
    }

    fn bright(canvas: &Canvas, x: u32, y: u32) -> bool {
        canvas.pixel(x, y).is_some_and(|c| c.r() >= 250 && c.g() >= 250 && c.b() >= 250)
    }

    fn lit(canvas: &Canvas, area: Rectangle) -> usize {
        area.points()
            .filter(|p| canvas.pixel(p.x as u32, p.y as u32).is_some_and(|c| c != Rgb888::BLACK))
            .count()
    }

    #[test]
    fn test_draw_text_lands_in_cell() {
        let mut c = canvas(100, 40);
        let face = MonoFace::new(&FONT_6X10, 2);
        draw_text(&mut c, "H", Point::new(10, 5), &face, Rgb888::WHITE).unwrap();
        assert!(lit(&c, Rectangle::new(Point::new(10, 5), Size::new(12, 20))) > 0);
        assert_eq!(lit(&c, Rectangle::new(Point::new(30, 0), Size::new(70, 40))), 0);
    }

    #[test]
    fn test_draw_lines_advances() {
        let mut c = canvas(100, 100);
        let face = MonoFace::new(&FONT_6X10, 1);
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let y = draw_lines(&mut c, &lines, 0, 7, &face, Rgb888::WHITE);
        assert_eq!(y, 37);
    }

    /// Lit pixels of `text` drawn alone on a fresh canvas.
    fn ink<F: DrawFace>(face: &F, text: &str) -> Vec<Point> {
        let mut c = canvas(80, 60);
        face.draw(&mut c, text, Point::new(4, 4), Rgb888::WHITE);
        Rectangle::new(Point::zero(), Size::new(80, 60))
            .points()
            .filter(|p| c.pixel(p.x as u32, p.y as u32).is_some_and(|px| px != Rgb888::BLACK))
            .collect()
    }

    #[test]
    fn test_outline_text_draws_beyond_latin1() {
        let TextFonts::Outline(fonts) = TextFonts::system() else { return };
        let face = fonts.face(Role::Bullet, 28);
        let question = ink(&face, "?");
        assert!(!question.is_empty());
        for text in ["\u{2122}", "\u{2022}", "\u{5bb6}", "\u{5bb6}\u{5ead}\u{4e2d}\u{6587}\u{7248}"] {
            let c = text.chars().next().unwrap();
            if !fonts.covers(c) {
                continue;
            }
            let drawn = ink(&face, text);
            assert!(!drawn.is_empty(), "{text} drew nothing");
            assert_ne!(drawn, question, "{text} drawn as '?'");
        }
    }

    #[test]
    fn test_outline_width_matches_ink() {
        let TextFonts::Outline(fonts) = TextFonts::system() else { return };
        let face = fonts.face(Role::Bullet, 28);
        let width = face.width("\u{2122}\u{2022}").unwrap() as i32;
        let right = ink(&face, "\u{2122}\u{2022}").iter().map(|p| p.x).max().unwrap_or(0);
        // ink stays inside the measured advance, give or take anti-aliasing
        assert!(right <= 4 + width + 1, "ink to {right}, measured {width}");
    }

    #[test]
    fn test_border_stays_inside() {
        let mut c = canvas(60, 60);
        let rect = Rectangle::new(Point::new(10, 10), Size::new(40, 30));
        draw_rounded_border(&mut c, rect, 8, 2, Rgb888::WHITE).unwrap();
        // straight top edge
        assert_eq!(c.pixel(30, 10), Some(Rgb888::WHITE));
        assert_eq!(c.pixel(30, 9), Some(Rgb888::BLACK));
        // interior untouched
        assert_eq!(c.pixel(30, 25), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_letterbox() {
        let (s, dx, dy) = letterbox(200, 100, 50);
        assert_eq!(s, 0.25);
        assert_eq!(dx, 0.0);
        assert_eq!(dy, 12.5);
        assert_eq!(letterbox(0, 10, 50), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_missing_icon_is_skipped() {
        let mut c = canvas(20, 20);
        draw_icon(&mut c, &Icon::Raster(PathBuf::from("/nope/gpu.png")), Point::zero(), 16);
        draw_icon(&mut c, &Icon::Vector(PathBuf::from("/nope/cpu.svg")), Point::zero(), 16);
        assert_eq!(lit(&c, Rectangle::new(Point::zero(), Size::new(20, 20))), 0);
    }

    #[test]
    fn test_corrupt_raster_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not png").unwrap();
        let mut c = canvas(20, 20);
        draw_icon(&mut c, &Icon::Raster(path), Point::zero(), 16);
        assert_eq!(lit(&c, Rectangle::new(Point::zero(), Size::new(20, 20))), 0);
    }

    #[test]
    fn test_raster_icon_letterboxed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        let mut src = Pixmap::new(40, 20).unwrap();
        src.fill(tiny_skia::Color::WHITE);
        src.save_png(&path).unwrap();

        let mut c = canvas(40, 40);
        draw_icon(&mut c, &Icon::Raster(path), Point::zero(), 20);
        // scaled to 20x10, centred vertically at y 5..15
        assert!(bright(&c, 10, 10));
        assert_eq!(c.pixel(10, 1), Some(Rgb888::BLACK));
        assert_eq!(c.pixel(10, 18), Some(Rgb888::BLACK));
        assert_eq!(c.pixel(30, 10), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_vector_icon_fills_box() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpu.svg");
        std::fs::write(
            &path,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="8"><rect width="4" height="8" fill="#ffffff"/></svg>"##,
        )
        .unwrap();
        let mut c = canvas(40, 40);
        draw_icon(&mut c, &Icon::Vector(path), Point::new(5, 5), 20);
        assert!(bright(&c, 6, 6));
        assert!(bright(&c, 23, 23));
        assert_eq!(c.pixel(30, 30), Some(Rgb888::BLACK));
    }
}
