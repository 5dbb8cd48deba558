//! Label measurement: the boundary to whatever service knows real font metrics,
//! plus a heuristic fallback used for the approximate first pass.

use std::sync::OnceLock;

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LegendError;
use crate::options::FontConfig;
use crate::source::LegendGroup;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.3;
/// Entries are never shorter than this before padding.
pub const MIN_ENTRY_TEXT_HEIGHT: f64 = 16.0;
/// Extra vertical room added to every entry.
pub const ENTRY_HEIGHT_PAD: f64 = 3.0;

/// Measured extent of a label.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

impl TextSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Measurement service.
pub trait TextMeasurer {
    fn measure(&self, label: &str, font: &FontConfig) -> Result<TextSize, LegendError>;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &FontConfig) -> Result<TextSize, LegendError>,
{
    fn measure(&self, label: &str, font: &FontConfig) -> Result<TextSize, LegendError> {
        self(label, font)
    }
}

/// Estimates sizes from character counts; good enough for a first pass and for
/// static output where no font engine is around.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasurer;

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, label: &str, font: &FontConfig) -> Result<TextSize, LegendError> {
        let lines = split_lines(label);
        let width = lines
            .iter()
            .map(|l| estimate_text_width_px(&strip_markup(l), font.size_px))
            .fold(0.0, f64::max);
        let height = lines.len().max(1) as f64 * font.size_px * LINE_HEIGHT_RATIO;
        Ok(TextSize::new(width, height))
    }
}

/// Heuristic: estimate pixel width of text.
pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    (text.chars().count() as f64 * font_px * 0.60).ceil()
}

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line-break pattern"))
}

fn markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("valid markup pattern"))
}

/// Split a label on `<br>` line breaks.
pub fn split_lines(label: &str) -> Vec<&str> {
    line_break_re().split(label).collect()
}

/// Drop inline markup such as `<b>` or `<sup>` for measurement and painting.
/// Bare `<` and `>` in plain text are kept.
pub fn strip_markup(line: &str) -> String {
    markup_re().replace_all(line, "").into_owned()
}

/// Entry box for a measured label: text height floored at 16px plus padding.
pub fn entry_size(text: TextSize) -> TextSize {
    TextSize::new(
        text.width.max(0.0),
        text.height.max(MIN_ENTRY_TEXT_HEIGHT) + ENTRY_HEIGHT_PAD,
    )
}

/// Size used when a label cannot be measured.
pub fn fallback_entry_size() -> TextSize {
    entry_size(TextSize::default())
}

/// Measure every entry in place. A failed or nonsensical measurement falls back
/// to the minimum entry size and is logged; it never aborts the pass.
pub fn measure_entries(groups: &mut [LegendGroup], font: &FontConfig, measurer: &dyn TextMeasurer) {
    for entry in groups.iter_mut().flat_map(|g| g.entries.iter_mut()) {
        let size = match measurer.measure(&entry.label, font) {
            Ok(s) if s.width.is_finite() && s.height.is_finite() => entry_size(s),
            Ok(s) => {
                warn!(
                    "non-finite size {}x{} for legend label {:?}; using fallback",
                    s.width, s.height, entry.label
                );
                fallback_entry_size()
            }
            Err(e) => {
                warn!("{e}; using fallback size");
                fallback_entry_size()
            }
        };
        entry.width = size.width;
        entry.height = size.height;
    }
}
