//! Drawing constants and colors.

use mindmap_core::Color;

/// Options for connectors and decorations.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Samples for plain connectors
    pub bezier_steps: usize,
    /// Samples for tapered root connectors
    pub tapered_steps: usize,
    /// Samples for the drag preview connector
    pub shadow_steps: usize,
    /// Root connector width at the root end
    pub tapered_start_width: f64,
    /// Root connector width at the child end
    pub tapered_end_width: f64,
    /// Width of connectors between deeper topics
    pub connector_width: f64,
    /// How far a topic's underline extends past its text block
    pub underline_overhang: f64,
    /// Corner radius of the root frame; its margin comes from the layout options
    pub root_frame_radius: f64,
    /// Gap between a topic's edge and its collapse icon center
    pub collapse_icon_offset: f64,
    pub collapse_icon_radius: f64,
    /// Top margin above a topic's first line
    pub text_top_margin: f64,
    pub reference_width: f64,

    pub root_outline: Color,
    pub root_fill: Color,
    pub root_selected_fill: Color,
    pub highlight_fill: Color,
    pub highlight_outline: Color,
    /// Color of the connector previewed while moving a topic
    pub shadow_color: Color,
    pub reference_color: Color,
    /// Colors cycled through by root-child index
    pub branch_palette: Vec<Color>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            bezier_steps: 15,
            tapered_steps: 30,
            shadow_steps: 20,
            tapered_start_width: 8.0,
            tapered_end_width: 2.0,
            connector_width: 2.0,
            underline_overhang: 5.0,
            root_frame_radius: 10.0,
            collapse_icon_offset: 10.0,
            collapse_icon_radius: 8.0,
            text_top_margin: 10.0,
            reference_width: 2.0,
            root_outline: Color::from_rgb8(0x34, 0x49, 0x5e),
            root_fill: Color::WHITE,
            root_selected_fill: Color::from_rgb8(0xea, 0xf2, 0xf8),
            highlight_fill: Color::from_rgb8(0xe3, 0xf2, 0xfd),
            highlight_outline: Color::from_rgb8(0x90, 0xca, 0xf9),
            shadow_color: Color::from_rgb8(0xcc, 0xcc, 0xcc),
            reference_color: Color::BLACK,
            branch_palette: vec![
                Color::from_rgb8(0xe7, 0x4c, 0x3c),
                Color::from_rgb8(0x34, 0x98, 0xdb),
                Color::from_rgb8(0x2e, 0xcc, 0x71),
                Color::from_rgb8(0xf3, 0x9c, 0x12),
                Color::from_rgb8(0x9b, 0x59, 0xb6),
                Color::from_rgb8(0x1a, 0xbc, 0x9c),
            ],
        }
    }
}

impl RenderOptions {
    /// Replace the branch palette. An empty palette falls back to the root outline.
    pub fn with_branch_palette(mut self, palette: Vec<Color>) -> Self {
        self.branch_palette = palette;
        self
    }

    /// Set the widths of the tapered root connectors.
    pub fn with_taper(mut self, start_width: f64, end_width: f64) -> Self {
        self.tapered_start_width = start_width;
        self.tapered_end_width = end_width;
        self
    }
}
