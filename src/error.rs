/*
 *  error.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error types for the export pipeline
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

use std::path::PathBuf;

use thiserror::Error;

use crate::wrap::MeasureError;

/// Anything that fails a whole export call.
///
/// Asset problems (missing or corrupt icons/logo) are not here: those are
/// logged and the asset is left out.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Text could not be measured; no layout is guessed
    #[error("text measurement failed: {0}")]
    Measure(#[from] MeasureError),

    /// The pixel buffer could not be allocated
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    /// Writing or renaming the output failed
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input did not match the engine's contract
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io { path: path.into(), source }
    }
}
