//! Font description and the text measurement seam.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Font family, size and style flags.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontDescriptor {
    /// Font family name
    pub family: String,
    /// Font size in points
    pub size: f64,
    /// Bold weight
    pub bold: bool,
    /// Italic slant
    pub italic: bool,
}

impl FontDescriptor {
    /// A regular-weight, upright font.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    /// Set the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set the italic flag.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// This font with a run's style flags layered on top.
    ///
    /// A bold base font stays bold inside unstyled runs.
    pub fn styled(&self, bold: bool, italic: bool) -> Self {
        Self {
            family: self.family.clone(),
            size: self.size,
            bold: self.bold || bold,
            italic: self.italic || italic,
        }
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("sans-serif", 11.0)
    }
}

// Sizes compare bitwise so descriptors can key caches.
impl PartialEq for FontDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.size.to_bits() == other.size.to_bits()
            && self.bold == other.bold
            && self.italic == other.italic
    }
}

impl Eq for FontDescriptor {}

impl Hash for FontDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.size.to_bits().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
    }
}

/// Measured extent of a single-line string.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtent {
    /// Advance width of the string
    pub width: f64,
    /// Line spacing of the font (ascent + descent + leading)
    pub line_height: f64,
}

/// Text measurement provided by the host toolkit.
///
/// Implementors return the advance width of `text` set in `font` on one line,
/// and the font's line spacing. Results are assumed finite and non-negative.
pub trait TextMeasurer {
    /// Measure `text` in `font`.
    fn measure(&self, text: &str, font: &FontDescriptor) -> TextExtent;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font: &FontDescriptor) -> TextExtent {
        (**self).measure(text, font)
    }
}

/// Fixed advance per character and fixed line height, whatever the font.
///
/// Handy for tests and headless hosts.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    pub char_width: f64,
    pub line_height: f64,
}

impl MonospaceMeasurer {
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, _font: &FontDescriptor) -> TextExtent {
        TextExtent {
            width: text.chars().count() as f64 * self.char_width,
            line_height: self.line_height,
        }
    }
}

/// Font-size proportional approximation used when no font data is available.
///
/// Latin glyphs in a proportional face average about 0.6x the font size;
/// bold faces run slightly wider. Line spacing is 1.2x the size.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl TextMeasurer for ApproximateMeasurer {
    fn measure(&self, text: &str, font: &FontDescriptor) -> TextExtent {
        const CHAR_WIDTH_RATIO: f64 = 0.6;
        const BOLD_WIDTH_RATIO: f64 = 1.1;
        const LINE_HEIGHT_RATIO: f64 = 1.2;

        let mut advance = font.size * CHAR_WIDTH_RATIO;
        if font.bold {
            advance *= BOLD_WIDTH_RATIO;
        }
        TextExtent {
            width: text.chars().count() as f64 * advance,
            line_height: font.size * LINE_HEIGHT_RATIO,
        }
    }
}

/// Per-style font and glyph-width memo for a single wrap or measure call.
///
/// Wrapping measures text one character at a time; this keeps one derived
/// font per bold/italic combination and each character's advance so the
/// measurer is asked at most once per (style, character).
pub struct StyleMetrics<'a, M: TextMeasurer + ?Sized> {
    measurer: &'a M,
    base: &'a FontDescriptor,
    fonts: HashMap<(bool, bool), FontDescriptor>,
    advances: HashMap<(bool, bool, char), f64>,
}

impl<'a, M: TextMeasurer + ?Sized> StyleMetrics<'a, M> {
    pub fn new(measurer: &'a M, base: &'a FontDescriptor) -> Self {
        Self {
            measurer,
            base,
            fonts: HashMap::new(),
            advances: HashMap::new(),
        }
    }

    /// The base font with the given style flags applied.
    pub fn font(&mut self, bold: bool, italic: bool) -> &FontDescriptor {
        let base = self.base;
        self.fonts
            .entry((bold, italic))
            .or_insert_with(|| base.styled(bold, italic))
    }

    /// Advance width of a single character in the given style.
    pub fn char_width(&mut self, bold: bool, italic: bool, ch: char) -> f64 {
        if let Some(&w) = self.advances.get(&(bold, italic, ch)) {
            return w;
        }
        let measurer = self.measurer;
        let mut buf = [0u8; 4];
        let width = measurer.measure(ch.encode_utf8(&mut buf), self.font(bold, italic)).width;
        self.advances.insert((bold, italic, ch), width);
        width
    }

    /// Extent of a whole string in the given style.
    pub fn extent(&mut self, text: &str, bold: bool, italic: bool) -> TextExtent {
        let measurer = self.measurer;
        measurer.measure(text, self.font(bold, italic))
    }

    /// Number of distinct derived fonts created so far.
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }
}
