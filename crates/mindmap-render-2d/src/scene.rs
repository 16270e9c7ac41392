//! Scene building from a laid-out mind map.
//!
//! The scene is a flat list of toolkit-agnostic draw commands. Hosts paint
//! text and images themselves and can hand everything else to the
//! [`Tessellator`](crate::Tessellator).

use glam::DVec2;
use mindmap_core::{Color, MindMap, Node, NodeId, ReferenceId};
use mindmap_layout::{Bounds, LayoutEngine, NodeGeometry};
use mindmap_text::{FontDescriptor, StyleMetrics, TextMeasurer};
use tracing::{debug, instrument, trace};

use crate::connectors::{connection_points, reference_curve, ReferenceCurve};
use crate::curves::TaperedCurve;
use crate::decorations::{branch_color, collapse_icon, highlight, root_frame, underline, CollapseIcon};
use crate::options::RenderOptions;

/// A styled text fragment placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Top-left corner of the run's box
    pub origin: DVec2,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub font: FontDescriptor,
    pub color: Color,
    pub underline: bool,
}

impl TextRun {
    pub fn center(&self) -> DVec2 {
        self.origin + DVec2::new(self.width, self.height) / 2.0
    }

    /// Segment to stroke under an underlined run, 2 units above its bottom.
    pub fn underline_segment(&self) -> Option<(DVec2, DVec2)> {
        self.underline.then(|| {
            let y = self.origin.y + self.height - 2.0;
            (DVec2::new(self.origin.x, y), DVec2::new(self.origin.x + self.width, y))
        })
    }
}

/// A render command representing something to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Selection box behind a topic
    Highlight {
        node: NodeId,
        bounds: Bounds,
        radius: f64,
        fill: Color,
        outline: Color,
    },
    /// The root's rounded outline
    Frame {
        node: NodeId,
        bounds: Bounds,
        radius: f64,
        fill: Color,
        outline: Color,
        line_width: f64,
    },
    /// A topic's underline
    Underline {
        node: NodeId,
        from: DVec2,
        to: DVec2,
        color: Color,
        width: f64,
    },
    Text {
        node: NodeId,
        run: TextRun,
    },
    /// A topic's image, drawn at its display size
    Image {
        node: NodeId,
        center: DVec2,
        width: f64,
        height: f64,
    },
    CollapseIcon {
        node: NodeId,
        icon: CollapseIcon,
        color: Color,
    },
    /// Connector ending at `child`
    Connector {
        child: NodeId,
        curve: TaperedCurve,
        color: Color,
    },
    Reference {
        reference: ReferenceId,
        curve: ReferenceCurve,
        color: Color,
        width: f64,
    },
}

/// Draw commands in paint order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Union of all visible topics, if any were placed
    pub bounds: Option<Bounds>,
    pub commands: Vec<RenderCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Connector commands as `(child, curve)`.
    pub fn connectors(&self) -> impl Iterator<Item = (NodeId, &TaperedCurve)> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Connector { child, curve, .. } => Some((*child, curve)),
            _ => None,
        })
    }
}

/// Build the scene for `map` as laid out by `engine`.
///
/// Visible topics are emitted in pre-order, each followed by the connector
/// from its parent; references between visible topics come last. `font` is
/// the base font passed to the layout pass.
#[instrument(level = "debug", skip_all)]
pub fn build_scene<M: TextMeasurer>(
    map: &MindMap,
    engine: &LayoutEngine<M>,
    font: &FontDescriptor,
    options: &RenderOptions,
    selection: Option<NodeId>,
) -> Scene {
    let mut builder = SceneBuilder {
        scene: Scene {
            bounds: engine.geometry().content_bounds(map),
            commands: Vec::new(),
        },
        map,
        engine,
        font,
        options,
    };

    for id in map.visible_nodes() {
        builder.build_node(id, selection == Some(id));
    }
    builder.build_references();

    debug!(commands = builder.scene.len(), "scene built");
    builder.scene
}

struct SceneBuilder<'a, M: TextMeasurer> {
    scene: Scene,
    map: &'a MindMap,
    engine: &'a LayoutEngine<M>,
    font: &'a FontDescriptor,
    options: &'a RenderOptions,
}

impl<'a, M: TextMeasurer> SceneBuilder<'a, M> {
    fn build_node(&mut self, id: NodeId, selected: bool) {
        let (Some(node), Some(g)) = (self.map.get(id), self.engine.geometry().get(id)) else {
            trace!(node = %id, "skipping unplaced node");
            return;
        };
        let color = branch_color(self.map, id, self.options);

        if selected {
            self.scene.push(RenderCommand::Highlight {
                node: id,
                bounds: highlight(g),
                radius: 6.0,
                fill: self.options.highlight_fill,
                outline: self.options.highlight_outline,
            });
        }

        if node.is_root() {
            self.scene.push(RenderCommand::Frame {
                node: id,
                bounds: root_frame(g, self.engine.options()),
                radius: self.options.root_frame_radius,
                fill: if selected {
                    self.options.root_selected_fill
                } else {
                    self.options.root_fill
                },
                outline: color,
                line_width: if selected { 4.0 } else { 3.0 },
            });
        } else {
            let (from, to) = underline(g, self.options);
            self.scene.push(RenderCommand::Underline {
                node: id,
                from,
                to,
                color,
                width: if selected { 3.0 } else { 2.0 },
            });
        }

        self.build_content(node, g);

        if let Some(icon) = collapse_icon(node, g, self.options) {
            self.scene.push(RenderCommand::CollapseIcon { node: id, icon, color });
        }

        self.build_connector(node, g, color);
    }

    /// Image then wrapped text, top to bottom from the topic's top margin.
    fn build_content(&mut self, node: &Node, g: &NodeGeometry) {
        let engine = self.engine;
        let font = engine.font_for(self.map, node.id, self.font);
        let sizer = engine.sizer();
        let measure = sizer.options();
        let mut y = g.y - g.half_height() + self.options.text_top_margin;

        if let Some(image) = &node.image {
            let (w, h) = image.display_size(measure.image_max_width, measure.image_max_height);
            let (w, h) = (w as f64, h as f64);
            self.scene.push(RenderCommand::Image {
                node: node.id,
                center: DVec2::new(g.x, y + h / 2.0),
                width: w,
                height: h,
            });
            y += h + measure.image_spacing;
        }

        let lines = sizer.wrap(&node.text, font, measure.max_width);
        let mut metrics = StyleMetrics::new(sizer.measurer(), font);
        for line in &lines {
            if line.is_empty() {
                y += font.size + measure.empty_line_extra;
                continue;
            }
            let extents: Vec<_> = line
                .runs()
                .iter()
                .map(|run| metrics.extent(&run.text, run.bold, run.italic))
                .collect();
            let line_width: f64 = extents.iter().map(|e| e.width).sum();

            let mut x = g.x - line_width / 2.0;
            let mut line_height: f64 = 0.0;
            for (run, extent) in line.runs().iter().zip(&extents) {
                self.scene.push(RenderCommand::Text {
                    node: node.id,
                    run: TextRun {
                        origin: DVec2::new(x, y),
                        width: extent.width,
                        height: extent.line_height,
                        text: run.text.clone(),
                        font: metrics.font(run.bold, run.italic).clone(),
                        color: run.color,
                        underline: run.underline,
                    },
                });
                x += extent.width;
                line_height = line_height.max(extent.line_height);
            }
            y += if line_height > 0.0 {
                line_height
            } else {
                font.size + measure.empty_line_extra
            };
        }
    }

    fn build_connector(&mut self, node: &Node, g: &NodeGeometry, color: Color) {
        let Some(parent_id) = node.parent else {
            return;
        };
        let Some(parent) = self.map.get(parent_id) else {
            return;
        };
        if parent.collapsed {
            return;
        }
        let Some(pg) = self.engine.geometry().get(parent_id) else {
            return;
        };
        let layout = self.engine.options();
        let connector = connection_points(pg, parent.is_root(), g, node.direction, layout, self.options);
        self.scene.push(RenderCommand::Connector {
            child: node.id,
            curve: connector.stroke(self.options),
            color,
        });
    }

    fn build_references(&mut self) {
        let geometry = self.engine.geometry();
        for reference in self.map.references() {
            if !self.map.is_visible(reference.source) || !self.map.is_visible(reference.target) {
                continue;
            }
            let (Some(source), Some(target)) = (geometry.get(reference.source), geometry.get(reference.target)) else {
                continue;
            };
            self.scene.push(RenderCommand::Reference {
                reference: reference.id,
                curve: reference_curve(reference, source, target),
                color: self.options.reference_color,
                width: self.options.reference_width,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_core::ImagePayload;
    use mindmap_layout::LayoutOptions;
    use mindmap_text::MonospaceMeasurer;

    fn font() -> FontDescriptor {
        FontDescriptor::new("Arial", 10.0)
    }

    fn laid_out(map: &mut MindMap) -> LayoutEngine<MonospaceMeasurer> {
        let mut engine = LayoutEngine::new(MonospaceMeasurer::new(10.0, 16.0));
        engine.apply_layout(map, &font(), 0.0, 0.0);
        engine
    }

    fn texts(scene: &Scene, node: NodeId) -> Vec<&TextRun> {
        scene
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Text { node: n, run } if *n == node => Some(run),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_root_only_scene() {
        let mut map = MindMap::new("Root");
        let engine = laid_out(&mut map);
        let scene = build_scene(&map, &engine, &font(), &RenderOptions::default(), None);

        assert!(matches!(scene.commands[0], RenderCommand::Frame { line_width, .. } if line_width == 3.0));
        assert_eq!(scene.connectors().count(), 0);
        assert_eq!(scene.bounds, Some(Bounds::new(-50.0, -17.5, 100.0, 35.0)));

        let runs = texts(&scene, map.root());
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Root");
        // 4 chars centered on x = 0, first line 10 below the top edge
        assert_eq!(runs[0].origin, DVec2::new(-20.0, -7.5));
    }

    #[test]
    fn test_connectors_follow_visibility() {
        let mut map = MindMap::new("Root");
        let root = map.root();
        let a = map.add_child(root, "a").unwrap();
        let a1 = map.add_child(a, "a1").unwrap();
        let engine = laid_out(&mut map);

        let scene = build_scene(&map, &engine, &font(), &RenderOptions::default(), None);
        let connectors: Vec<_> = scene.connectors().collect();
        assert_eq!(connectors.len(), 2);
        assert_eq!(connectors[0].0, a);
        assert_eq!(connectors[0].1.widths[0], 8.0);
        assert_eq!(connectors[1].0, a1);
        assert!(connectors[1].1.widths.iter().all(|&w| w == 2.0));

        map.set_collapsed(a, true).unwrap();
        let scene = build_scene(&map, &engine, &font(), &RenderOptions::default(), None);
        let children: Vec<_> = scene.connectors().map(|(c, _)| c).collect();
        assert_eq!(children, vec![a]);
        assert!(texts(&scene, a1).is_empty());
        assert!(scene.commands.iter().any(|c| matches!(
            c,
            RenderCommand::CollapseIcon { icon, .. } if icon.glyph == crate::CollapseGlyph::Count(1)
        )));
    }

    #[test]
    fn test_frame_and_root_connector_share_layout_padding() {
        let mut map = MindMap::new("Root");
        let a = map.add_child(map.root(), "a").unwrap();
        let mut engine = LayoutEngine::new(MonospaceMeasurer::new(10.0, 16.0))
            .with_options(LayoutOptions::default().with_root_frame_padding(40.0, 20.0));
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);

        let scene = build_scene(&map, &engine, &font(), &RenderOptions::default(), None);
        let frame = scene
            .commands
            .iter()
            .find_map(|c| match c {
                RenderCommand::Frame { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .unwrap();
        assert_eq!(frame, Bounds::new(-90.0, -37.5, 180.0, 75.0));

        // the child column clears that frame by exactly the margin
        let child = engine.geometry().get(a).unwrap();
        assert!((child.x - child.half_width() - frame.right() - 80.0).abs() < 1e-9);

        let (_, curve) = scene.connectors().next().unwrap();
        assert!((curve.points[0].x - frame.right()).abs() < 1e-9);
    }

    #[test]
    fn test_selection_highlight_and_underline_width() {
        let mut map = MindMap::new("Root");
        let a = map.add_child(map.root(), "a").unwrap();
        let engine = laid_out(&mut map);

        let scene = build_scene(&map, &engine, &font(), &RenderOptions::default(), Some(a));
        let highlighted: Vec<_> = scene
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Highlight { node, .. } => Some(*node),
                _ => None,
            })
            .collect();
        assert_eq!(highlighted, vec![a]);
        assert!(scene.commands.iter().any(|c| matches!(
            c,
            RenderCommand::Underline { node, width, .. } if *node == a && *width == 3.0
        )));
    }

    #[test]
    fn test_styled_runs_and_image_placement() {
        let mut map = MindMap::new("Root");
        let a = map.add_child(map.root(), "ab<b>cd</b>\n<u>e</u>").unwrap();
        map.set_image(a, Some(ImagePayload::new(vec![0u8; 4], 40, 20))).unwrap();
        let engine = laid_out(&mut map);
        let g = *engine.geometry().get(a).unwrap();

        let scene = build_scene(&map, &engine, &font(), &RenderOptions::default(), None);
        let image = scene
            .commands
            .iter()
            .find_map(|c| match c {
                RenderCommand::Image { node, center, .. } if *node == a => Some(*center),
                _ => None,
            })
            .unwrap();
        let top = g.y - g.height / 2.0 + 10.0;
        assert_eq!(image, DVec2::new(g.x, top + 10.0));

        let runs = texts(&scene, a);
        assert_eq!(runs.len(), 3);
        assert!(!runs[0].font.bold);
        assert!(runs[1].font.bold);
        assert_eq!(runs[1].origin.x, runs[0].origin.x + 20.0);
        // below the 20-high image plus 10 spacing
        assert_eq!(runs[0].origin.y, top + 30.0);
        assert_eq!(runs[2].origin.y, top + 30.0 + 16.0);
        assert!(runs[2].underline_segment().is_some());
        assert!(runs[0].underline_segment().is_none());
    }

    #[test]
    fn test_references_between_visible_nodes() {
        let mut map = MindMap::new("Root");
        let root = map.root();
        let a = map.add_child(root, "a").unwrap();
        let b = map.add_child(root, "b").unwrap();
        let b1 = map.add_child(b, "b1").unwrap();
        let r1 = map.add_reference(a, b).unwrap();
        map.add_reference(a, b1).unwrap();
        map.set_collapsed(b, true).unwrap();
        let engine = laid_out(&mut map);

        let scene = build_scene(&map, &engine, &font(), &RenderOptions::default(), None);
        let refs: Vec<_> = scene
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::Reference { reference, .. } => Some(*reference),
                _ => None,
            })
            .collect();
        assert_eq!(refs, vec![r1]);
        assert!(matches!(scene.commands.last(), Some(RenderCommand::Reference { .. })));
    }
}
