//! Parent-child connectors and reference curves.
//!
//! Connectors from the root start on the root's frame and end at the near
//! end of the child's underline, tapering as they go. Deeper connectors run
//! from the parent's outer side to the child's inner side at underline height
//! with a constant width.

use glam::DVec2;
use mindmap_core::{Color, Direction, Reference};
use mindmap_layout::{LayoutOptions, NodeGeometry};

use crate::curves::{cubic_bezier_points, tapered_controls, TaperedCurve};
use crate::geometry::rect_edge_point;
use crate::options::RenderOptions;

/// Anchors and controls of one parent-child connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connector {
    pub start: DVec2,
    pub control1: DVec2,
    pub control2: DVec2,
    pub end: DVec2,
    /// Whether the stroke narrows from parent to child
    pub tapered: bool,
}

impl Connector {
    /// Sample the curve at `steps + 1` points.
    pub fn points(&self, steps: usize) -> Vec<DVec2> {
        cubic_bezier_points(self.start, self.control1, self.control2, self.end, steps)
    }

    /// The stroke drawn for this connector in a finished layout.
    pub fn stroke(&self, options: &RenderOptions) -> TaperedCurve {
        if self.tapered {
            TaperedCurve::tapered(
                self.points(options.tapered_steps),
                options.tapered_start_width,
                options.tapered_end_width,
            )
        } else {
            TaperedCurve::uniform(self.points(options.bezier_steps), options.connector_width)
        }
    }

    /// The lighter-sampled stroke used while previewing a move.
    pub fn shadow_stroke(&self, options: &RenderOptions) -> TaperedCurve {
        let points = self.points(options.shadow_steps);
        if self.tapered {
            TaperedCurve::tapered(points, options.tapered_start_width, options.tapered_end_width)
        } else {
            TaperedCurve::uniform(points, options.connector_width)
        }
    }
}

fn center(g: &NodeGeometry) -> DVec2 {
    DVec2::new(g.x, g.y)
}

/// Connector from `parent` to `child`.
///
/// `child_direction` picks the near underline end for root connectors, which
/// start on the root frame the layout pass cleared. Deeper connectors pick
/// sides from the relative x of the two topics.
pub fn connection_points(
    parent: &NodeGeometry,
    parent_is_root: bool,
    child: &NodeGeometry,
    child_direction: Direction,
    layout: &LayoutOptions,
    options: &RenderOptions,
) -> Connector {
    if parent_is_root {
        root_connection_points(parent, child, child_direction, layout, options)
    } else {
        subtree_connection_points(parent, child)
    }
}

fn root_connection_points(
    root: &NodeGeometry,
    child: &NodeGeometry,
    child_direction: Direction,
    layout: &LayoutOptions,
    options: &RenderOptions,
) -> Connector {
    // near end of the underline, facing the root
    let reach = child.half_width() + options.underline_overhang;
    let end = DVec2::new(child.x - child_direction.sign() * reach, child.y + child.half_height());

    let frame_half = DVec2::new(
        root.half_width() + layout.root_frame_padding_x,
        root.half_height() + layout.root_frame_padding_y,
    );
    let start = rect_edge_point(center(root), frame_half, end - center(root));
    let (control1, control2) = tapered_controls(start, end);

    Connector {
        start,
        control1,
        control2,
        end,
        tapered: true,
    }
}

fn subtree_connection_points(parent: &NodeGeometry, child: &NodeGeometry) -> Connector {
    let sign = if child.x > parent.x { 1.0 } else { -1.0 };
    let start = DVec2::new(parent.x + sign * parent.half_width(), parent.y + parent.half_height());
    let end = DVec2::new(child.x - sign * child.half_width(), child.y + child.half_height());
    let dx = end.x - start.x;

    Connector {
        start,
        control1: DVec2::new(start.x + dx * 0.4, start.y),
        control2: DVec2::new(start.x + dx * 0.6, end.y),
        end,
        tapered: false,
    }
}

/// The connector previewed while a topic is dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveShadow {
    pub curve: TaperedCurve,
    pub color: Color,
}

/// Connector preview for dropping a topic with `shadow` geometry under `parent`.
pub fn move_shadow(
    parent: &NodeGeometry,
    parent_is_root: bool,
    shadow: &NodeGeometry,
    shadow_direction: Direction,
    layout: &LayoutOptions,
    options: &RenderOptions,
) -> MoveShadow {
    let connector = connection_points(parent, parent_is_root, shadow, shadow_direction, layout, options);
    MoveShadow {
        curve: connector.shadow_stroke(options),
        color: options.shadow_color,
    }
}

/// A cross-link curve between two topics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceCurve {
    pub start: DVec2,
    pub control1: DVec2,
    pub control2: DVec2,
    pub end: DVec2,
}

impl ReferenceCurve {
    pub fn points(&self, steps: usize) -> Vec<DVec2> {
        cubic_bezier_points(self.start, self.control1, self.control2, self.end, steps)
    }
}

/// Curve for `reference` between its placed endpoints.
///
/// The curve leaves the source through the horizontal edge facing the target
/// and enters the target through the edge facing the source, both at the
/// topics' center x. Explicit controls on the reference replace the derived
/// ones independently.
pub fn reference_curve(reference: &Reference, source: &NodeGeometry, target: &NodeGeometry) -> ReferenceCurve {
    let (sy, ty) = if source.y >= target.y {
        (source.y - source.half_height(), target.y + target.half_height())
    } else {
        (source.y + source.half_height(), target.y - target.half_height())
    };
    let start = DVec2::new(source.x, sy);
    let end = DVec2::new(target.x, ty);
    let rise = ty - sy;

    let control1 = reference
        .control1
        .map_or(DVec2::new(start.x, sy + rise * 0.3), |(x, y)| DVec2::new(x, y));
    let control2 = reference
        .control2
        .map_or(DVec2::new(end.x, ty - rise * 0.3), |(x, y)| DVec2::new(x, y));

    ReferenceCurve {
        start,
        control1,
        control2,
        end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_core::{NodeId, ReferenceId};

    fn geom(x: f64, y: f64, width: f64, height: f64) -> NodeGeometry {
        NodeGeometry {
            x,
            y,
            width,
            height,
            subtree_height: height,
        }
    }

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-9
    }

    fn connect(parent: &NodeGeometry, parent_is_root: bool, child: &NodeGeometry, direction: Direction) -> Connector {
        connection_points(
            parent,
            parent_is_root,
            child,
            direction,
            &LayoutOptions::default(),
            &RenderOptions::default(),
        )
    }

    #[test]
    fn test_root_connector_to_right_child() {
        let root = geom(0.0, 0.0, 100.0, 40.0);
        let child = geom(200.0, 0.0, 100.0, 40.0);
        let c = connect(&root, true, &child, Direction::Right);

        assert!(c.tapered);
        // underline runs 145..255 at y = 20; near end is 145
        assert!(close(c.end, DVec2::new(145.0, 20.0)));
        // frame half extents 62 x 30; ray (145, 20) leaves through the right side
        assert!(close(c.start, DVec2::new(62.0, 62.0 * 20.0 / 145.0)));
        assert_eq!(c.control1.y, 20.0);
        assert!((c.control1.x - (c.start.x + (c.end.x - c.start.x) * 0.4)).abs() < 1e-9);
    }

    #[test]
    fn test_root_connector_to_left_child_uses_right_underline_end() {
        let root = geom(0.0, 0.0, 100.0, 40.0);
        let child = geom(-200.0, -80.0, 100.0, 40.0);
        let c = connect(&root, true, &child, Direction::Left);

        assert!(close(c.end, DVec2::new(-145.0, -60.0)));
        assert!(c.start.x < 0.0);
        // ends differ vertically, so both controls sit at the end's height
        assert_eq!(c.control1.y, -60.0);
        assert_eq!(c.control2.y, -60.0);
    }

    #[test]
    fn test_subtree_connector_sides() {
        let parent = geom(200.0, 0.0, 100.0, 40.0);
        let right = geom(380.0, 50.0, 100.0, 40.0);
        let c = connect(&parent, false, &right, Direction::Right);
        assert!(!c.tapered);
        assert!(close(c.start, DVec2::new(250.0, 20.0)));
        assert!(close(c.end, DVec2::new(330.0, 70.0)));
        assert!(close(c.control1, DVec2::new(282.0, 20.0)));
        assert!(close(c.control2, DVec2::new(298.0, 70.0)));

        let left = geom(20.0, 0.0, 100.0, 40.0);
        let c = connect(&parent, false, &left, Direction::Left);
        assert!(close(c.start, DVec2::new(150.0, 20.0)));
        assert!(close(c.end, DVec2::new(70.0, 20.0)));
    }

    #[test]
    fn test_connector_strokes() {
        let layout = LayoutOptions::default();
        let options = RenderOptions::default();
        let root = geom(0.0, 0.0, 100.0, 40.0);
        let child = geom(200.0, 0.0, 100.0, 40.0);

        let tapered = connection_points(&root, true, &child, Direction::Right, &layout, &options).stroke(&options);
        assert_eq!(tapered.widths.len(), 30);
        assert_eq!(tapered.widths[0], 8.0);

        let next = geom(380.0, 0.0, 100.0, 40.0);
        let plain = connection_points(&child, false, &next, Direction::Right, &layout, &options).stroke(&options);
        assert_eq!(plain.points.len(), 16);
        assert!(plain.widths.iter().all(|&w| w == 2.0));
    }

    #[test]
    fn test_move_shadow() {
        let layout = LayoutOptions::default();
        let options = RenderOptions::default();
        let root = geom(0.0, 0.0, 100.0, 40.0);
        let shadow = geom(200.0, 30.0, 100.0, 40.0);

        let from_root = move_shadow(&root, true, &shadow, Direction::Right, &layout, &options);
        assert_eq!(from_root.color, options.shadow_color);
        assert_eq!(from_root.curve.points.len(), 21);
        assert_eq!(from_root.curve.widths[0], 8.0);
        assert!(from_root.curve.widths[19] < 3.0);

        let from_topic = move_shadow(
            &shadow,
            false,
            &geom(380.0, 30.0, 100.0, 40.0),
            Direction::Right,
            &layout,
            &options,
        );
        assert!(from_topic.curve.widths.iter().all(|&w| w == 2.0));
    }

    #[test]
    fn test_root_connector_follows_layout_frame_padding() {
        let root = geom(0.0, 0.0, 100.0, 40.0);
        let child = geom(300.0, 0.0, 100.0, 40.0);
        let wide = LayoutOptions::default().with_root_frame_padding(40.0, 10.0);
        let c = connection_points(&root, true, &child, Direction::Right, &wide, &RenderOptions::default());
        // ray toward (245, 20) leaves the 90 x 30 frame through its right side
        assert!(close(c.start, DVec2::new(90.0, 90.0 * 20.0 / 245.0)));
    }

    fn reference() -> Reference {
        Reference {
            id: ReferenceId(0),
            source: NodeId(1),
            target: NodeId(2),
            control1: None,
            control2: None,
        }
    }

    #[test]
    fn test_reference_curve_downward() {
        let source = geom(0.0, 0.0, 100.0, 40.0);
        let target = geom(50.0, 200.0, 100.0, 40.0);
        let curve = reference_curve(&reference(), &source, &target);
        assert!(close(curve.start, DVec2::new(0.0, 20.0)));
        assert!(close(curve.end, DVec2::new(50.0, 180.0)));
        assert!(close(curve.control1, DVec2::new(0.0, 68.0)));
        assert!(close(curve.control2, DVec2::new(50.0, 132.0)));
    }

    #[test]
    fn test_reference_curve_upward_with_override() {
        let source = geom(0.0, 200.0, 100.0, 40.0);
        let target = geom(0.0, 0.0, 100.0, 40.0);
        let mut r = reference();
        r.control2 = Some((300.0, -50.0));
        let curve = reference_curve(&r, &source, &target);
        assert!(close(curve.start, DVec2::new(0.0, 180.0)));
        assert!(close(curve.end, DVec2::new(0.0, 20.0)));
        assert!(close(curve.control1, DVec2::new(0.0, 132.0)));
        assert!(close(curve.control2, DVec2::new(300.0, -50.0)));
        assert_eq!(curve.points(10).len(), 11);
    }
}
