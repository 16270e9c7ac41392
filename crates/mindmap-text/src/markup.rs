//! Inline markup parsing.
//!
//! Recognized tags: `<b>`/`</b>`, `<i>`/`</i>`, `<u>`/`</u>`, `<c:#RRGGBB>`
//! (pushes a color), `</c>` (pops it) and `<br>`/`<br/>` (forced break).
//! Anything else that looks like a tag is kept as literal text.

use mindmap_core::Color;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::char,
    combinator::{map_opt, value},
    sequence::delimited,
    IResult,
};

/// Text color used outside any `<c:...>` tag (#333333).
pub const DEFAULT_TEXT_COLOR: Color = Color::rgb(0.2, 0.2, 0.2);

/// A contiguous fragment of text sharing one style.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: Color,
}

impl StyledRun {
    /// An unstyled run in the given color.
    pub fn plain(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            underline: false,
            color,
        }
    }

    /// The zero-width run emitted for `<br/>`.
    pub fn line_break(color: Color) -> Self {
        Self::plain("\n", color)
    }

    /// Whether this run is a forced line break.
    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }

    /// A run with the same style and different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tag {
    Bold(bool),
    Italic(bool),
    Underline(bool),
    PushColor(Color),
    PopColor,
    Break,
}

fn color_open(input: &str) -> IResult<&str, Tag> {
    map_opt(
        delimited(
            tag("<c:#"),
            take_while_m_n(6, 6, |c: char| c.is_ascii_hexdigit()),
            char('>'),
        ),
        |hex: &str| Color::from_hex(hex).map(Tag::PushColor),
    )(input)
}

fn markup_tag(input: &str) -> IResult<&str, Tag> {
    alt((
        value(Tag::Break, alt((tag("<br/>"), tag("<br>")))),
        value(Tag::Bold(true), tag("<b>")),
        value(Tag::Bold(false), tag("</b>")),
        value(Tag::Italic(true), tag("<i>")),
        value(Tag::Italic(false), tag("</i>")),
        value(Tag::Underline(true), tag("<u>")),
        value(Tag::Underline(false), tag("</u>")),
        value(Tag::PopColor, tag("</c>")),
        color_open,
    ))(input)
}

/// Style state threaded through one parse.
struct ParseState {
    bold: bool,
    italic: bool,
    underline: bool,
    color: Color,
    color_stack: Vec<Color>,
    default_color: Color,
    literal: String,
    runs: Vec<StyledRun>,
}

impl ParseState {
    fn new(default_color: Color) -> Self {
        Self {
            bold: false,
            italic: false,
            underline: false,
            color: default_color,
            color_stack: Vec::new(),
            default_color,
            literal: String::new(),
            runs: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if self.literal.is_empty() {
            return;
        }
        self.runs.push(StyledRun {
            text: std::mem::take(&mut self.literal),
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
            color: self.color,
        });
    }

    fn apply(&mut self, tag: Tag) {
        self.flush();
        match tag {
            Tag::Bold(on) => self.bold = on,
            Tag::Italic(on) => self.italic = on,
            Tag::Underline(on) => self.underline = on,
            Tag::PushColor(color) => {
                self.color_stack.push(self.color);
                self.color = color;
            }
            Tag::PopColor => {
                self.color = self.color_stack.pop().unwrap_or(self.default_color);
            }
            Tag::Break => self.runs.push(StyledRun::line_break(self.color)),
        }
    }
}

/// Splits marked-up text into styled runs.
///
/// Parsing is pure: tag state starts fresh on every call.
#[derive(Debug, Clone, Copy)]
pub struct MarkupParser {
    default_color: Color,
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT_COLOR)
    }
}

impl MarkupParser {
    pub fn new(default_color: Color) -> Self {
        Self { default_color }
    }

    /// The color of text outside any color tag.
    pub fn default_color(&self) -> Color {
        self.default_color
    }

    /// Parse `text` into runs. Empty runs are never produced.
    pub fn parse(&self, text: &str) -> Vec<StyledRun> {
        let mut state = ParseState::new(self.default_color);
        let mut rest = text;

        while !rest.is_empty() {
            if rest.starts_with('<') {
                if let Ok((after, tag)) = markup_tag(rest) {
                    state.apply(tag);
                    rest = after;
                    continue;
                }
            }
            // Take at least one character, then everything up to the next '<'.
            let first = rest.chars().next().map_or(1, char::len_utf8);
            let end = rest[first..].find('<').map_or(rest.len(), |i| i + first);
            state.literal.push_str(&rest[..end]);
            rest = &rest[end..];
        }

        state.flush();
        state.runs
    }
}
