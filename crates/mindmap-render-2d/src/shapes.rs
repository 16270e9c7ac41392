//! Tessellation of scene commands into triangle meshes.

use glam::DVec2;
use lyon::geom::{point, Box2D};
use lyon::path::builder::BorderRadii;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, LineCap, StrokeOptions, StrokeTessellator,
    StrokeVertex, VertexBuffers,
};
use mindmap_core::Color;
use mindmap_layout::Bounds;
use tracing::warn;

use crate::connectors::ReferenceCurve;
use crate::curves::TaperedCurve;
use crate::decorations::{CollapseGlyph, CollapseIcon};
use crate::scene::RenderCommand;

/// A vertex for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Tessellated mesh ready for rendering.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn append(&mut self, buffers: VertexBuffers<Vertex, u32>) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(buffers.vertices);
        self.indices.extend(buffers.indices.iter().map(|i| i + base));
    }
}

/// Turns connectors, frames and icons into triangles.
///
/// Text and images are left to the host.
pub struct Tessellator {
    fill_tessellator: FillTessellator,
    stroke_tessellator: StrokeTessellator,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

fn pt(p: DVec2) -> lyon::math::Point {
    point(p.x as f32, p.y as f32)
}

impl Tessellator {
    pub fn new() -> Self {
        Self {
            fill_tessellator: FillTessellator::new(),
            stroke_tessellator: StrokeTessellator::new(),
        }
    }

    /// Append the triangles for `command` to `mesh`.
    pub fn tessellate_command(&mut self, command: &RenderCommand, mesh: &mut Mesh) {
        match command {
            RenderCommand::Highlight {
                bounds,
                radius,
                fill,
                outline,
                ..
            } => self.tessellate_frame(bounds, *radius, *fill, *outline, 1.0, mesh),
            RenderCommand::Frame {
                bounds,
                radius,
                fill,
                outline,
                line_width,
                ..
            } => self.tessellate_frame(bounds, *radius, *fill, *outline, *line_width, mesh),
            RenderCommand::Underline {
                from, to, color, width, ..
            } => self.tessellate_line(*from, *to, *width, *color, mesh),
            RenderCommand::CollapseIcon { icon, color, .. } => self.tessellate_collapse_icon(icon, *color, mesh),
            RenderCommand::Connector { curve, color, .. } => self.tessellate_connector(curve, *color, mesh),
            RenderCommand::Reference {
                curve, color, width, ..
            } => self.tessellate_reference(curve, *width, *color, mesh),
            RenderCommand::Text { .. } | RenderCommand::Image { .. } => {}
        }
    }

    /// Stroke each segment of a connector at its own width, with round caps
    /// so consecutive segments join smoothly.
    pub fn tessellate_connector(&mut self, curve: &TaperedCurve, color: Color, mesh: &mut Mesh) {
        for (from, to, width) in curve.segments() {
            self.tessellate_line(from, to, width, color, mesh);
        }
    }

    /// Stroke a straight segment with round caps.
    pub fn tessellate_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color, mesh: &mut Mesh) {
        let mut builder = Path::builder();
        builder.begin(pt(from));
        builder.line_to(pt(to));
        builder.end(false);
        self.tessellate_stroke(&builder.build(), width, color, mesh);
    }

    /// Stroke a reference curve as a single cubic.
    pub fn tessellate_reference(&mut self, curve: &ReferenceCurve, width: f64, color: Color, mesh: &mut Mesh) {
        let mut builder = Path::builder();
        builder.begin(pt(curve.start));
        builder.cubic_bezier_to(pt(curve.control1), pt(curve.control2), pt(curve.end));
        builder.end(false);
        self.tessellate_stroke(&builder.build(), width, color, mesh);
    }

    /// Fill and outline a rounded rectangle.
    pub fn tessellate_frame(
        &mut self,
        bounds: &Bounds,
        radius: f64,
        fill: Color,
        outline: Color,
        line_width: f64,
        mesh: &mut Mesh,
    ) {
        let rect = Box2D::new(
            point(bounds.x as f32, bounds.y as f32),
            point(bounds.right() as f32, bounds.bottom() as f32),
        );
        let mut builder = Path::builder();
        builder.add_rounded_rectangle(&rect, &BorderRadii::new(radius as f32), Winding::Positive);
        let path = builder.build();

        self.tessellate_fill(&path, fill, mesh);
        self.tessellate_stroke(&path, line_width, outline, mesh);
    }

    /// White disc with a colored ring, plus a minus bar when expanded.
    ///
    /// The child count of a collapsed icon is text and left to the host.
    pub fn tessellate_collapse_icon(&mut self, icon: &CollapseIcon, color: Color, mesh: &mut Mesh) {
        let mut builder = Path::builder();
        builder.add_circle(pt(icon.center), icon.radius as f32, Winding::Positive);
        let path = builder.build();
        self.tessellate_fill(&path, Color::WHITE, mesh);
        self.tessellate_stroke(&path, 1.0, color, mesh);

        if icon.glyph == CollapseGlyph::Minus {
            let bar = DVec2::new(4.0, 0.0);
            self.tessellate_line(icon.center - bar, icon.center + bar, 1.0, color, mesh);
        }
    }

    fn tessellate_fill(&mut self, path: &Path, fill: Color, mesh: &mut Mesh) {
        let color = fill.to_array();
        let mut buffers: VertexBuffers<Vertex, u32> = VertexBuffers::new();

        let result = self.fill_tessellator.tessellate_path(
            path,
            &FillOptions::default(),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                Vertex::new(vertex.position().x, vertex.position().y, color)
            }),
        );

        match result {
            Ok(()) => mesh.append(buffers),
            Err(e) => warn!(error = ?e, "fill tessellation failed"),
        }
    }

    fn tessellate_stroke(&mut self, path: &Path, width: f64, stroke: Color, mesh: &mut Mesh) {
        let color = stroke.to_array();
        let mut buffers: VertexBuffers<Vertex, u32> = VertexBuffers::new();

        let options = StrokeOptions::default()
            .with_line_width(width as f32)
            .with_line_cap(LineCap::Round);

        let result = self.stroke_tessellator.tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |vertex: StrokeVertex| {
                Vertex::new(vertex.position().x, vertex.position().y, color)
            }),
        );

        match result {
            Ok(()) => mesh.append(buffers),
            Err(e) => warn!(error = ?e, "stroke tessellation failed"),
        }
    }
}
