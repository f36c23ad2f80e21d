use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

mod wrap;


pub use wrap::{split_line_to_words, wrap_text_lines};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
    pub font_weight: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
            font_weight: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

/// A label broken into lines that each fit the requested width (except single unbreakable
/// characters, which always get their own line).
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedText {
    pub lines: Vec<String>,
    pub metrics: TextMetrics,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    fn line_height(&self, style: &TextStyle) -> f64 {
        self.measure("", style).height
    }
}

/// Wraps `text` to `max_width` and measures the result.
pub fn measure_wrapped(
    measurer: &dyn TextMeasurer,
    text: &str,
    style: &TextStyle,
    max_width: Option<f64>,
) -> WrappedText {
    let lines = wrap_text_lines(text, measurer, style, max_width);
    let width = lines
        .iter()
        .map(|l| measurer.measure(l, style).width)
        .fold(0.0, f64::max);
    let height = lines.len() as f64 * measurer.line_height(style);
    WrappedText {
        metrics: TextMetrics {
            width,
            height,
            line_count: lines.len(),
        },
        lines,
    }
}

/// Font-free measurer: every column of `unicode-width` advances by `font_size * char_width_factor`.
///
/// Zero factors select the defaults (0.6 em per column, 1.25 line height).
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    fn char_width_factor(&self) -> f64 {
        if self.char_width_factor > 0.0 {
            self.char_width_factor
        } else {
            0.6
        }
    }

    fn line_height_factor(&self) -> f64 {
        if self.line_height_factor > 0.0 {
            self.line_height_factor
        } else {
            1.25
        }
    }

    pub fn columns(line: &str) -> usize {
        line.chars().map(|ch| ch.width().unwrap_or(0)).sum()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let font_size = style.font_size.max(1.0);
        let bold = style
            .font_weight
            .as_deref()
            .is_some_and(|w| w == "bold" || w.parse::<u16>().is_ok_and(|n| n >= 600));
        let em = self.char_width_factor() * if bold { 1.05 } else { 1.0 };

        let mut lines = 0usize;
        let mut max_cols = 0usize;
        for line in text.split('\n') {
            lines += 1;
            max_cols = max_cols.max(Self::columns(line));
        }
        let lines = lines.max(1);

        TextMetrics {
            width: max_cols as f64 * font_size * em,
            height: lines as f64 * font_size * self.line_height_factor(),
            line_count: lines,
        }
    }
}
