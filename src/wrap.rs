/*
 *  wrap.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Greedy word wrapping against a pixel width budget
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

use thiserror::Error;

/// A width-measuring function failed for a given string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to measure {text:?}: {reason}")]
pub struct MeasureError {
    pub text: String,
    pub reason: String,
}

impl MeasureError {
    pub fn new(text: &str, reason: impl Into<String>) -> Self {
        Self { text: text.to_string(), reason: reason.into() }
    }
}

/// Anything that can tell us how wide a string renders, in pixels.
pub trait TextMeasure {
    fn width(&self, text: &str) -> Result<u32, MeasureError>;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> Result<u32, MeasureError>,
{
    fn width(&self, text: &str) -> Result<u32, MeasureError> {
        self(text)
    }
}

/// Wrap `text` into lines no wider than `max_width` pixels.
///
/// Explicit newlines split the text into paragraphs which are wrapped
/// independently; a blank paragraph yields a blank line. Words are never
/// split, so a single word wider than the budget sits alone on its line
/// and overflows.
pub fn wrap<M>(text: &str, measure: &M, max_width: u32) -> Result<Vec<String>, MeasureError>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        wrap_paragraph(paragraph, measure, max_width, &mut lines)?;
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    Ok(lines)
}

fn wrap_paragraph<M>(
    paragraph: &str,
    measure: &M,
    max_width: u32,
    lines: &mut Vec<String>,
) -> Result<(), MeasureError>
where
    M: TextMeasure + ?Sized,
{
    let mut words = paragraph.split_whitespace();
    let Some(first) = words.next() else {
        lines.push(String::new());
        return Ok(());
    };

    let mut current = first.to_string();
    for word in words {
        let candidate = format!("{current} {word}");
        if measure.width(&candidate)? <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    Ok(())
}
