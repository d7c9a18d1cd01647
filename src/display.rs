//! Terminal rendering of scan output
//!
//! Maps each tier's opacity onto the ANSI grayscale ramp and prints the
//! document with matched regions dimmed. This is the bundled render sink;
//! editor hosts bring their own.

use std::io::Write;

use crossterm::{
    queue,
    style::{Color, ResetColor, SetForegroundColor},
};
use unicode_width::UnicodeWidthChar;

use crate::config::TierValues;
use crate::document::Document;
use crate::engine::{Tier, TierBuckets};
use crate::error::Result;
use crate::line::Line;
use crate::position::{TextPosition, TextRange};
use crate::session::RenderSink;

/// Options for the terminal renderer
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Emit ANSI colors (disable when piping output)
    pub color: bool,
    /// Show a line-number gutter
    pub line_numbers: bool,
    /// Truncate lines to this display width
    pub max_width: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            line_numbers: false,
            max_width: None,
        }
    }
}

/// Renders a document snapshot with scan output applied.
///
/// Implements [`RenderSink`], so a session can hand its buckets straight
/// to the terminal.
pub struct TerminalRenderer<'a, W: Write> {
    out: W,
    doc: &'a Document,
    values: TierValues,
    options: RenderOptions,
}

impl<'a, W: Write> TerminalRenderer<'a, W> {
    pub fn new(out: W, doc: &'a Document, values: TierValues, options: RenderOptions) -> Self {
        Self {
            out,
            doc,
            values,
            options,
        }
    }

    /// Print the whole document with `buckets` applied
    pub fn render(&mut self, buckets: &TierBuckets) -> Result<()> {
        let lnum_width = line_number_width(self.doc.line_count());
        for line_idx in 0..self.doc.line_count() {
            let line = match self.doc.line(line_idx) {
                Some(line) => line,
                None => break,
            };
            if self.options.line_numbers {
                write!(self.out, "{:>width$} ", line_idx + 1, width = lnum_width - 1)?;
            }
            self.render_line(line_idx, line, buckets)?;
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_line(&mut self, line_idx: usize, line: &Line, buckets: &TierBuckets) -> Result<()> {
        let gutter = if self.options.line_numbers {
            line_number_width(self.doc.line_count())
        } else {
            0
        };
        let budget = self.options.max_width.map(|w| w.saturating_sub(gutter));

        let mut current: Option<Tier> = None;
        let mut column = 0;
        let mut width = 0;
        for ch in line.text().chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
            if let Some(budget) = budget {
                if width + ch_width > budget {
                    break;
                }
            }
            let tier = tier_at(buckets, line_idx, column);
            if tier != current {
                if self.options.color {
                    match tier {
                        Some(tier) => queue!(
                            self.out,
                            SetForegroundColor(grayscale(self.values.value(tier)))
                        )?,
                        None => queue!(self.out, ResetColor)?,
                    }
                }
                current = tier;
            }
            write!(self.out, "{ch}")?;
            column += ch.len_utf16();
            width += ch_width;
        }
        if current.is_some() && self.options.color {
            queue!(self.out, ResetColor)?;
        }
        Ok(())
    }
}

impl<W: Write> RenderSink for TerminalRenderer<'_, W> {
    fn apply(&mut self, doc_id: &str, buckets: &TierBuckets) {
        if let Err(e) = self.render(buckets) {
            log::error!("{doc_id}: render failed: {e}");
        }
    }

    fn clear(&mut self, _doc_id: &str) {}
}

/// The tier rendered at one position.
///
/// Where tiers overlap the least emphasized wins; cross-tier precedence is
/// this renderer's policy, not an engine guarantee.
fn tier_at(buckets: &TierBuckets, line: usize, column: usize) -> Option<Tier> {
    let pos = TextPosition::new(line, column);
    for tier in [Tier::Min, Tier::Mid, Tier::Max] {
        if covers(buckets.bucket(tier), pos) {
            return Some(tier);
        }
    }
    None
}

fn covers(ranges: &[TextRange], pos: TextPosition) -> bool {
    ranges.iter().any(|range| range.contains(pos))
}

/// Map an opacity in [0, 1] onto the 24-step ANSI grayscale ramp
fn grayscale(opacity: f64) -> Color {
    let step = (opacity.clamp(0.0, 1.0) * 23.0).round() as u8;
    Color::AnsiValue(232 + step)
}

/// Width of the line-number gutter, including the separator space
fn line_number_width(line_count: usize) -> usize {
    let digits = if line_count == 0 {
        1
    } else {
        (line_count as f64).log10().floor() as usize + 1
    };
    digits.max(3) + 1
}
