use crate::foundation::core::Resolution;
use crate::foundation::error::{NarrataError, NarrataResult};
use crate::subtitle::style::SubtitleStyle;

/// Horizontal text measurement at a given font size.
///
/// The rasterizer measures with its shaping engine; layout logic only needs widths.
pub trait TextMeasure {
    /// Advance width in pixels of `text` set at `font_size`.
    fn measure_width(&mut self, text: &str, font_size: f32) -> NarrataResult<f32>;
}

/// One line of subtitle text positioned on the frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PlacedLine {
    /// Line content.
    pub text: String,
    /// Measured width (px).
    pub width: f32,
    /// Left edge (px) so that the line is horizontally centered.
    pub x: f32,
    /// Top of the line box (px).
    pub y: f32,
}

/// Bottom-anchored block of wrapped subtitle lines.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SubtitleLayout {
    /// Font size the lines were measured at.
    pub font_size: f32,
    /// Vertical advance between consecutive lines.
    pub line_height: f32,
    /// Lines in reading order, top to bottom.
    pub lines: Vec<PlacedLine>,
}

impl SubtitleLayout {
    /// Total height of the text block.
    pub fn block_height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }
}

/// Greedy word wrap against measured widths.
///
/// A word is appended to the current line while the candidate line fits in `max_width`;
/// otherwise the line is closed and the word starts a new one. A word that alone exceeds
/// `max_width` still gets its own line.
pub fn wrap_words(
    text: &str,
    max_width: f32,
    font_size: f32,
    measure: &mut dyn TextMeasure,
) -> NarrataResult<Vec<String>> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measure.measure_width(&candidate, font_size)? > max_width {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

/// Wrap and place `text` for a frame of size `res`.
///
/// Lines are centered horizontally. The block sits `bottom_margin_px` above the bottom edge:
/// the first line's top is `height - lines * line_height - bottom_margin_px`, each following
/// line one `line_height` lower.
pub fn layout_subtitle(
    text: &str,
    res: Resolution,
    style: &SubtitleStyle,
    measure: &mut dyn TextMeasure,
) -> NarrataResult<SubtitleLayout> {
    let font_size = style.font_size_for(res);
    if !font_size.is_finite() || font_size <= 0.0 {
        return Err(NarrataError::input("subtitle font size must be finite and > 0"));
    }
    let max_width = style.max_line_width(res.width);
    let line_height = font_size * style.line_height_factor;

    let wrapped = wrap_words(text, max_width, font_size, measure)?;
    let block_height = wrapped.len() as f32 * line_height;
    let mut y = res.height as f32 - block_height - style.bottom_margin_px;

    let mut lines = Vec::with_capacity(wrapped.len());
    for line in wrapped {
        let width = measure.measure_width(&line, font_size)?;
        let x = (res.width as f32 - width) / 2.0;
        lines.push(PlacedLine {
            text: line,
            width,
            x,
            y,
        });
        y += line_height;
    }

    Ok(SubtitleLayout {
        font_size,
        line_height,
        lines,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/layout.rs"]
mod tests;
