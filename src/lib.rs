/*
 *  lib.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Adaptive card layout and PNG composition for hardware snapshots
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

//! Seven hardware cards on one fixed-size PNG.
//!
//! The pipeline is: pick the largest scale step at which everything fits
//! ([`search::find_scale`]), then paint the resulting [`search::RenderPlan`]
//! ([`render::render`]) and write it atomically. [`export::export_png`]
//! runs all of it in one call.

pub mod assets;
pub mod canvas;
pub mod config;
pub mod dimensions;
pub mod draw;
pub mod error;
pub mod export;
pub mod layout;
pub mod outline;
pub mod render;
pub mod search;
pub mod section;
pub mod specs;
pub mod svgimage;
pub mod typography;
pub mod wrap;

pub use dimensions::{CanvasProfile, CanvasSize};
pub use error::ExportError;
pub use export::{ExportReport, export_png};
pub use search::{RenderPlan, find_scale};
pub use section::{Icon, Platform, Section, SectionKind, Snapshot};
pub use wrap::{MeasureError, TextMeasure, wrap};
