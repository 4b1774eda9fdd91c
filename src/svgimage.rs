//! Vector icons.
//!
//! Parsed once with `usvg`, rasterised by `resvg` into a `tiny_skia::Pixmap`
//! of exactly the box size, then composited onto the export canvas.

use log::debug;
use thiserror::Error;
use tiny_skia::{Pixmap, Transform};

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(#[from] usvg::Error),
    #[error("cannot allocate a {0}x{1} icon")]
    Alloc(u32, u32),
    #[error("SVG has no drawable area")]
    Empty,
}

/// A parsed SVG document.
#[derive(Debug)]
pub struct VectorIcon {
    tree: usvg::Tree,
}

impl VectorIcon {
    pub fn parse(data: &[u8]) -> Result<Self, SvgError> {
        let tree = usvg::Tree::from_data(data, &usvg::Options::default())?;
        Ok(Self { tree })
    }

    /// Intrinsic document size
    pub fn size(&self) -> (f32, f32) {
        let s = self.tree.size();
        (s.width(), s.height())
    }

    /// Render stretched to `width`x`height` on a transparent pixmap.
    pub fn rasterize(&self, width: u32, height: u32) -> Result<Pixmap, SvgError> {
        let (w, h) = self.size();
        if w <= 0.0 || h <= 0.0 {
            return Err(SvgError::Empty);
        }
        let mut pixmap = Pixmap::new(width, height).ok_or(SvgError::Alloc(width, height))?;
        let transform = Transform::from_scale(width as f32 / w, height as f32 / h);
        resvg::render(&self.tree, transform, &mut pixmap.as_mut());
        debug!("svg {w}x{h} rasterised to {width}x{height}");
        Ok(pixmap)
    }
}
