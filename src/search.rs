/*
 *  search.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Global scale search and the immutable render plan
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

use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
};
use log::{debug, info, warn};

use crate::dimensions::{CanvasSize, DimensionSet};
use crate::layout::{CardLayout, layout_card};
use crate::section::{Icon, Snapshot};
use crate::typography::{Face, FontProvider, TypographySet};
use crate::wrap::MeasureError;

/// Scales tried, in percent, largest first. Coarse on purpose.
pub const SCALE_STEPS_PERCENT: [u32; 8] = [100, 95, 90, 85, 80, 75, 70, 65];

/// The floor; accepted even when it overflows.
pub const MIN_SCALE_PERCENT: u32 = 65;

/// Default first header line.
pub const DEFAULT_HEADER_LABEL: &str = "Flex Card";

/// Page header content: label, last-scan line and optional logo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub label: String,
    pub scanned_at: String,
    pub logo: Icon,
}

impl PageHeader {
    pub fn new(label: impl Into<String>, snapshot: &Snapshot) -> Self {
        Self {
            label: label.into(),
            scanned_at: snapshot.scanned_at.clone(),
            logo: snapshot.logo.clone(),
        }
    }

    pub fn scan_line(&self) -> String {
        format!("Last scan: {}", self.scanned_at)
    }
}

/// Where one card lands on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Index into the snapshot's sections
    pub index: usize,
    pub rect: Rectangle,
}

/// Everything the renderer needs, fixed for one export.
#[derive(Debug, Clone)]
pub struct RenderPlan<F> {
    pub canvas: CanvasSize,
    pub scale_percent: u32,
    pub dims: DimensionSet,
    pub typography: TypographySet<F>,
    /// Two-column cards, row-major
    pub grid: Vec<CardLayout>,
    /// The full-width card below the grid
    pub full: CardLayout,
    pub header: PageHeader,
    /// Height of the page header block
    pub header_height: u32,
}

impl<F: Face> RenderPlan<F> {
    /// Per-row height: the taller card of each pair.
    pub fn row_heights(&self) -> Vec<u32> {
        self.grid
            .chunks(2)
            .map(|row| row.iter().map(|c| c.height).max().unwrap_or(0))
            .collect()
    }

    /// Y where the first card row starts
    pub fn cards_top(&self) -> u32 {
        self.dims.outer_padding + self.header_height + self.dims.header_gap
    }

    /// Total canvas height this plan needs.
    pub fn required_height(&self) -> u32 {
        let rows = self.row_heights();
        let gaps = self.dims.row_gap * rows.len().saturating_sub(1) as u32;
        self.cards_top()
            + rows.iter().sum::<u32>()
            + gaps
            + self.dims.row_gap
            + self.full.height
            + self.dims.outer_padding
    }

    pub fn fits(&self) -> bool {
        self.required_height() <= self.canvas.height
    }

    /// Card rectangles in snapshot order. Grid cards take their row height.
    pub fn placements(&self) -> Vec<Placement> {
        let d = &self.dims;
        let left = d.outer_padding as i32;
        let right = (d.outer_padding + d.card_width + d.column_gap) as i32;
        let mut y = self.cards_top() as i32;
        let mut out = Vec::with_capacity(self.grid.len() + 1);

        for (row, height) in self.row_heights().into_iter().enumerate() {
            for col in 0..2 {
                let index = row * 2 + col;
                if index >= self.grid.len() {
                    break;
                }
                let x = if col == 0 { left } else { right };
                out.push(Placement {
                    index,
                    rect: Rectangle::new(Point::new(x, y), Size::new(d.card_width, height)),
                });
            }
            y += (height + d.row_gap) as i32;
        }

        out.push(Placement {
            index: self.grid.len(),
            rect: Rectangle::new(Point::new(left, y), Size::new(d.full_width, self.full.height)),
        });
        out
    }
}

/// Build the plan for one scale step.
pub fn plan_for_scale<P: FontProvider>(
    snapshot: &Snapshot,
    header_label: &str,
    canvas: CanvasSize,
    provider: &P,
    scale_percent: u32,
) -> Result<RenderPlan<P::Face>, MeasureError> {
    let scale = scale_percent as f32 / 100.0;
    let dims = DimensionSet::for_scale(scale, canvas);
    let typography = TypographySet::for_scale(provider, scale);

    let grid = snapshot
        .grid()
        .iter()
        .map(|s| layout_card(s, dims.card_width, &dims, &typography))
        .collect::<Result<Vec<_>, _>>()?;
    let full = layout_card(snapshot.full_width(), dims.full_width, &dims, &typography)?;

    let header = PageHeader::new(header_label, snapshot);
    let logo = if header.logo.is_some() { dims.logo_size } else { 0 };
    let header_height = (typography.header.line_height() * 2).max(logo);

    Ok(RenderPlan {
        canvas,
        scale_percent,
        dims,
        typography,
        grid,
        full,
        header,
        header_height,
    })
}

/// Shrink from 100% in 5% steps until everything fits or 65% is reached.
///
/// Never backtracks; the floor plan is returned even if it overflows.
pub fn find_scale<P: FontProvider>(
    snapshot: &Snapshot,
    header_label: &str,
    canvas: CanvasSize,
    provider: &P,
) -> Result<RenderPlan<P::Face>, MeasureError> {
    let mut plan = None;
    for percent in SCALE_STEPS_PERCENT {
        let candidate = plan_for_scale(snapshot, header_label, canvas, provider, percent)?;
        let required = candidate.required_height();
        debug!("scale {}%: need {}px of {}px", percent, required, canvas.height);
        let fits = required <= canvas.height;
        plan = Some(candidate);
        if fits {
            break;
        }
    }

    // SCALE_STEPS_PERCENT is non-empty
    let Some(plan) = plan else {
        return plan_for_scale(snapshot, header_label, canvas, provider, MIN_SCALE_PERCENT);
    };

    if plan.fits() {
        info!("layout fits at scale {}%", plan.scale_percent);
    } else {
        warn!(
            "layout overflows by {}px at minimum scale {}%",
            plan.required_height() - canvas.height,
            plan.scale_percent
        );
    }
    Ok(plan)
}
