//! Character-level wrapping of styled text.
//!
//! Lines break between any two characters rather than at word boundaries,
//! which behaves the same for scripts without spaces (CJK) and for Latin
//! text. Changing this changes every node's size and so the whole layout.

use smallvec::SmallVec;
use tracing::trace;

use crate::markup::{MarkupParser, StyledRun};
use crate::metrics::{FontDescriptor, StyleMetrics, TextMeasurer};

/// One visual line: styled runs laid left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WrappedLine {
    runs: SmallVec<[StyledRun; 4]>,
}

impl WrappedLine {
    /// The runs on this line.
    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// Whether the line holds no text (a blank line).
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The line's text with styling stripped.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn push(&mut self, run: StyledRun) {
        self.runs.push(run);
    }
}

impl FromIterator<StyledRun> for WrappedLine {
    fn from_iter<I: IntoIterator<Item = StyledRun>>(iter: I) -> Self {
        Self {
            runs: iter.into_iter().collect(),
        }
    }
}

/// Wraps marked-up text to a maximum line width.
pub struct TextWrapper<'a, M: TextMeasurer + ?Sized> {
    measurer: &'a M,
    parser: MarkupParser,
}

impl<'a, M: TextMeasurer + ?Sized> TextWrapper<'a, M> {
    pub fn new(measurer: &'a M) -> Self {
        Self {
            measurer,
            parser: MarkupParser::default(),
        }
    }

    /// Use a specific markup parser (e.g. with another default color).
    pub fn with_parser(mut self, parser: MarkupParser) -> Self {
        self.parser = parser;
        self
    }

    /// Wrap `text` so that no line exceeds `max_width`, except a line holding
    /// a single character wider than the limit.
    ///
    /// Each `\n`-separated paragraph is parsed independently. A blank
    /// paragraph yields one empty line; `<br/>` always ends the current line.
    pub fn wrap(&self, text: &str, font: &FontDescriptor, max_width: f64) -> Vec<WrappedLine> {
        let mut metrics = StyleMetrics::new(self.measurer, font);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let runs = self.parser.parse(paragraph);
            if runs.is_empty() {
                lines.push(WrappedLine::default());
                continue;
            }
            wrap_paragraph(&runs, &mut metrics, max_width, &mut lines);
        }

        trace!(lines = lines.len(), max_width, "wrapped text");
        lines
    }
}

fn wrap_paragraph<M: TextMeasurer + ?Sized>(
    runs: &[StyledRun],
    metrics: &mut StyleMetrics<'_, M>,
    max_width: f64,
    lines: &mut Vec<WrappedLine>,
) {
    let mut line = WrappedLine::default();
    let mut width = 0.0;
    // A break opens a line that must be emitted even if nothing follows.
    let mut opened_by_break = false;

    for run in runs {
        if run.is_line_break() {
            lines.push(std::mem::take(&mut line));
            width = 0.0;
            opened_by_break = true;
            continue;
        }

        let mut pending = String::new();
        for ch in run.text.chars() {
            let advance = metrics.char_width(run.bold, run.italic, ch);
            let has_content = !line.is_empty() || !pending.is_empty();
            if has_content && width + advance > max_width {
                if !pending.is_empty() {
                    line.push(run.with_text(std::mem::take(&mut pending)));
                }
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }
            pending.push(ch);
            width += advance;
        }
        if !pending.is_empty() {
            line.push(run.with_text(pending));
        }
    }

    if !line.is_empty() || opened_by_break {
        lines.push(line);
    }
}
