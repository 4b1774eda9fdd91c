/*
 *  canvas.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  RGBA canvas exposed to embedded-graphics as a DrawTarget
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tiny_skia::{FillRule, Paint, Pixmap, PixmapPaint, PixmapRef, PremultipliedColorU8, Transform};

use crate::dimensions::CanvasSize;

#[inline]
fn premultiplied(c: Rgb888) -> PremultipliedColorU8 {
    // opaque colours are always valid premultiplied values
    PremultipliedColorU8::from_rgba(c.r(), c.g(), c.b(), 255).unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

/// A runtime-sized RGBA canvas, owned by one export.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// `None` when the size is zero or too large to allocate.
    pub fn new(size: CanvasSize, fill: Rgb888) -> Option<Self> {
        let mut pixmap = Pixmap::new(size.width, size.height)?;
        pixmap.pixels_mut().fill(premultiplied(fill));
        Some(Self { pixmap })
    }

    pub fn width(&self) -> u32 { self.pixmap.width() }
    pub fn height(&self) -> u32 { self.pixmap.height() }

    pub fn pixmap(&self) -> &Pixmap { &self.pixmap }

    /// Colour at (x,y); None if out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        // Pixmap::pixel only checks the linear index, so (width, y) would wrap
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgb888::new(p.red(), p.green(), p.blue()))
    }

    /// Composite `src` with a transform, alpha blended.
    pub fn blit(&mut self, src: PixmapRef, transform: Transform) {
        let paint = PixmapPaint {
            quality: tiny_skia::FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(0, 0, src, &paint, transform, None);
    }

    /// Fill `path` anti-aliased, non-zero winding.
    pub fn fill_path(&mut self, path: &tiny_skia::Path, color: Rgb888) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r(), color.g(), color.b(), 255);
        paint.anti_alias = true;
        self.pixmap.fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        let (w, h) = (self.pixmap.width() as usize, self.pixmap.height() as usize);
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < w && y < h {
                return Some(y * w + x);
            }
        }
        None
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.pixmap.width(), self.pixmap.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.pixmap.pixels_mut()[i] = premultiplied(c);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // clip once, then fill rows directly
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else { return Ok(()); };
        let w = self.pixmap.width() as usize;
        let c = premultiplied(color);
        let pixels = self.pixmap.pixels_mut();
        for y in area.top_left.y..=bottom_right.y {
            let base = y as usize * w;
            pixels[base + area.top_left.x as usize..=base + bottom_right.x as usize].fill(c);
        }
        Ok(())
    }
}

/// Draws every source pixel as a `factor`x`factor` block at `origin`.
///
/// Lets the bitmap fonts render at integer multiples of their cell size.
pub struct Magnified<'a, D> {
    target: &'a mut D,
    origin: Point,
    factor: u32,
}

impl<'a, D> Magnified<'a, D>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    pub fn new(target: &'a mut D, origin: Point, factor: u32) -> Self {
        Self { target, origin, factor: factor.max(1) }
    }
}

impl<D> OriginDimensions for Magnified<'_, D>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    fn size(&self) -> Size {
        let s = self.target.size();
        let w = (s.width as i32 - self.origin.x).max(0) as u32;
        let h = (s.height as i32 - self.origin.y).max(0) as u32;
        Size::new(w.div_ceil(self.factor), h.div_ceil(self.factor))
    }
}

impl<D> DrawTarget for Magnified<'_, D>
where
    D: DrawTarget<Color = Rgb888> + OriginDimensions,
{
    type Color = Rgb888;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let f = self.factor as i32;
        for Pixel(p, c) in pixels {
            if self.factor == 1 {
                self.target.draw_iter(core::iter::once(Pixel(self.origin + p, c)))?;
                continue;
            }
            let top_left = self.origin + Point::new(p.x * f, p.y * f);
            self.target.fill_solid(&Rectangle::new(top_left, Size::new_equal(self.factor)), c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_new_fills_background() {
        let canvas = Canvas::new(CanvasSize::new(4, 3), Rgb888::BLACK).unwrap();
        assert_eq!(canvas.size(), Size::new(4, 3));
        assert_eq!(canvas.pixel(3, 2), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_pixel_past_row_end_does_not_wrap() {
        let mut canvas = Canvas::new(CanvasSize::new(4, 3), Rgb888::BLACK).unwrap();
        canvas.draw_iter([Pixel(Point::new(0, 1), Rgb888::WHITE)]).unwrap();
        assert_eq!(canvas.pixel(0, 1), Some(Rgb888::WHITE));
        // (4,0) is one past the row, not (0,1)
        assert_eq!(canvas.pixel(4, 0), None);
        assert_eq!(canvas.pixel(0, 3), None);
        assert_eq!(canvas.pixel(u32::MAX, 0), None);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(Canvas::new(CanvasSize::new(0, 10), Rgb888::BLACK).is_none());
    }

    #[test]
    fn test_draw_iter_clips() {
        let mut canvas = Canvas::new(CanvasSize::new(4, 4), Rgb888::BLACK).unwrap();
        canvas
            .draw_iter([Pixel(Point::new(1, 1), Rgb888::WHITE), Pixel(Point::new(-1, 9), Rgb888::WHITE)])
            .unwrap();
        assert_eq!(canvas.pixel(1, 1), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(0, 0), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_fill_solid_clipped_to_canvas() {
        let mut canvas = Canvas::new(CanvasSize::new(5, 5), Rgb888::BLACK).unwrap();
        Rectangle::new(Point::new(3, 3), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
            .draw(&mut canvas)
            .unwrap();
        assert_eq!(canvas.pixel(4, 4), Some(Rgb888::RED));
        assert_eq!(canvas.pixel(2, 2), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_fill_path_covers_interior() {
        let mut canvas = Canvas::new(CanvasSize::new(20, 20), Rgb888::BLACK).unwrap();
        let rect = tiny_skia::Rect::from_xywh(4.0, 4.0, 8.0, 8.0).unwrap();
        canvas.fill_path(&tiny_skia::PathBuilder::from_rect(rect), Rgb888::WHITE);
        assert_eq!(canvas.pixel(8, 8), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(2, 2), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(13, 8), Some(Rgb888::BLACK));
    }

    #[test]
    fn test_magnified_blocks() {
        let mut canvas = Canvas::new(CanvasSize::new(10, 10), Rgb888::BLACK).unwrap();
        {
            let mut big = Magnified::new(&mut canvas, Point::new(2, 2), 3);
            big.draw_iter([Pixel(Point::new(1, 0), Rgb888::WHITE)]).unwrap();
        }
        // source (1,0) -> (5..8, 2..5)
        assert_eq!(canvas.pixel(5, 2), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(7, 4), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(4, 2), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(8, 2), Some(Rgb888::BLACK));
    }
}
