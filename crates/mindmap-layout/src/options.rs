//! Tunable constants for measurement and placement.

use mindmap_core::{Color, MAX_IMAGE_HEIGHT, MAX_IMAGE_WIDTH};
use mindmap_text::{FontDescriptor, DEFAULT_TEXT_COLOR};

/// Options for measuring a single topic.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeasureOptions {
    /// Maximum text line width before wrapping
    pub max_width: f64,
    /// Smallest width a topic is ever given
    pub min_width: f64,
    /// Smallest height a topic is ever given
    pub min_height: f64,
    /// Total horizontal padding around the text block
    pub horizontal_padding: f64,
    /// Total vertical padding around the text block
    pub vertical_padding: f64,
    /// Gap between an image and the text below it
    pub image_spacing: f64,
    /// Added to the font size to get the height of a blank line
    pub empty_line_extra: f64,
    /// Box images are subsampled into
    pub image_max_width: u32,
    pub image_max_height: u32,
    /// Text color outside any color tag
    pub default_text_color: Color,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            max_width: 250.0,
            min_width: 100.0,
            min_height: 35.0,
            horizontal_padding: 20.0,
            vertical_padding: 12.0,
            image_spacing: 10.0,
            empty_line_extra: 10.0,
            image_max_width: MAX_IMAGE_WIDTH,
            image_max_height: MAX_IMAGE_HEIGHT,
            default_text_color: DEFAULT_TEXT_COLOR,
        }
    }
}

impl MeasureOptions {
    /// Set the wrapping width.
    pub fn with_max_width(mut self, max_width: f64) -> Self {
        self.max_width = max_width;
        self
    }

    /// Set the minimum topic size.
    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }
}

/// Options for placing topics.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Horizontal gap between a parent's edge and its children's edge
    pub horizontal_margin: f64,
    /// Vertical gap between sibling subtrees
    pub vertical_spacing: f64,
    /// Margin of the root's frame beyond its text block, per side
    pub root_frame_padding_x: f64,
    pub root_frame_padding_y: f64,
    /// Font for the root topic; the pass font is used when unset
    pub root_font: Option<FontDescriptor>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            horizontal_margin: 80.0,
            vertical_spacing: 30.0,
            root_frame_padding_x: 12.0,
            root_frame_padding_y: 10.0,
            root_font: None,
        }
    }
}

impl LayoutOptions {
    /// Set the horizontal margin.
    pub fn with_horizontal_margin(mut self, margin: f64) -> Self {
        self.horizontal_margin = margin;
        self
    }

    /// Set the vertical spacing between sibling subtrees.
    pub fn with_vertical_spacing(mut self, spacing: f64) -> Self {
        self.vertical_spacing = spacing;
        self
    }

    /// Set the root frame's margin beyond its text block.
    ///
    /// Scene building draws the frame and anchors root connectors with the
    /// same values.
    pub fn with_root_frame_padding(mut self, x: f64, y: f64) -> Self {
        self.root_frame_padding_x = x;
        self.root_frame_padding_y = y;
        self
    }

    /// Use a dedicated font for the root topic.
    pub fn with_root_font(mut self, font: FontDescriptor) -> Self {
        self.root_font = Some(font);
        self
    }
}
