//! Frames, underlines, highlights, collapse icons and branch colors.

use glam::DVec2;
use mindmap_core::{Color, MindMap, Node, NodeId};
use mindmap_layout::{Bounds, LayoutOptions, NodeGeometry};

use crate::options::RenderOptions;

/// Horizontal and vertical margin of the selection highlight.
const HIGHLIGHT_PADDING: (f64, f64) = (10.0, 4.0);

/// The root's outline rectangle, with the margin the layout pass cleared.
pub fn root_frame(g: &NodeGeometry, layout: &LayoutOptions) -> Bounds {
    Bounds::from_center(
        g.x,
        g.y,
        g.width + 2.0 * layout.root_frame_padding_x,
        g.height + 2.0 * layout.root_frame_padding_y,
    )
}

/// End points of a topic's underline, along its bottom edge.
pub fn underline(g: &NodeGeometry, options: &RenderOptions) -> (DVec2, DVec2) {
    let y = g.y + g.half_height();
    let reach = g.half_width() + options.underline_overhang;
    (DVec2::new(g.x - reach, y), DVec2::new(g.x + reach, y))
}

/// Rectangle drawn behind the selected topic.
pub fn highlight(g: &NodeGeometry) -> Bounds {
    let (px, py) = HIGHLIGHT_PADDING;
    Bounds::from_center(g.x, g.y, g.width + 2.0 * px, g.height + 2.0 * py)
}

/// What the collapse icon shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseGlyph {
    /// Collapsed: number of hidden children
    Count(usize),
    /// Expanded
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollapseIcon {
    pub center: DVec2,
    pub radius: f64,
    pub glyph: CollapseGlyph,
}

/// Collapse toggle of a non-root topic with children, on its outer side at
/// underline height.
pub fn collapse_icon(node: &Node, g: &NodeGeometry, options: &RenderOptions) -> Option<CollapseIcon> {
    if node.is_root() || node.is_leaf() {
        return None;
    }
    let x = g.x + node.direction.sign() * (g.half_width() + options.collapse_icon_offset);
    let glyph = if node.collapsed {
        CollapseGlyph::Count(node.children.len())
    } else {
        CollapseGlyph::Minus
    };
    Some(CollapseIcon {
        center: DVec2::new(x, g.y + g.half_height()),
        radius: options.collapse_icon_radius,
        glyph,
    })
}

/// Color of a topic's branch: the root outline for the root, otherwise the
/// palette entry of the root child it descends from.
pub fn branch_color(map: &MindMap, id: NodeId, options: &RenderOptions) -> Color {
    match map.branch_index(id) {
        Some(index) if !options.branch_palette.is_empty() => {
            options.branch_palette[index % options.branch_palette.len()]
        }
        _ => options.root_outline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> NodeGeometry {
        NodeGeometry {
            x: 100.0,
            y: 50.0,
            width: 120.0,
            height: 40.0,
            subtree_height: 40.0,
        }
    }

    #[test]
    fn test_frame_underline_highlight() {
        let options = RenderOptions::default();
        assert_eq!(
            root_frame(&geom(), &LayoutOptions::default()),
            Bounds::new(28.0, 20.0, 144.0, 60.0)
        );
        let wide = LayoutOptions::default().with_root_frame_padding(30.0, 5.0);
        assert_eq!(root_frame(&geom(), &wide), Bounds::new(10.0, 25.0, 180.0, 50.0));
        assert_eq!(
            underline(&geom(), &options),
            (DVec2::new(35.0, 70.0), DVec2::new(165.0, 70.0))
        );
        assert_eq!(highlight(&geom()), Bounds::new(30.0, 26.0, 140.0, 48.0));
    }

    #[test]
    fn test_collapse_icon() {
        let options = RenderOptions::default();
        let mut map = MindMap::new("root");
        let a = map.add_child(map.root(), "a").unwrap();
        assert!(collapse_icon(map.get(a).unwrap(), &geom(), &options).is_none());

        map.add_child(a, "a1").unwrap();
        map.add_child(a, "a2").unwrap();
        let icon = collapse_icon(map.get(a).unwrap(), &geom(), &options).unwrap();
        assert_eq!(icon.center, DVec2::new(170.0, 70.0));
        assert_eq!(icon.glyph, CollapseGlyph::Minus);

        map.set_collapsed(a, true).unwrap();
        let icon = collapse_icon(map.get(a).unwrap(), &geom(), &options).unwrap();
        assert_eq!(icon.glyph, CollapseGlyph::Count(2));

        let root = map.get(map.root()).unwrap();
        assert!(collapse_icon(root, &geom(), &options).is_none());
    }

    #[test]
    fn test_collapse_icon_on_left_branch() {
        let options = RenderOptions::default();
        let mut map = MindMap::new("root");
        let a = map.add_child_with_direction(map.root(), "a", mindmap_core::Direction::Left).unwrap();
        map.add_child(a, "a1").unwrap();
        let icon = collapse_icon(map.get(a).unwrap(), &geom(), &options).unwrap();
        assert_eq!(icon.center.x, 30.0);
    }

    #[test]
    fn test_branch_colors() {
        let options = RenderOptions::default();
        let mut map = MindMap::new("root");
        let root = map.root();
        let children: Vec<_> = (0..8).map(|i| map.add_child(root, format!("c{i}")).unwrap()).collect();
        let grandchild = map.add_child(children[1], "g").unwrap();

        assert_eq!(branch_color(&map, root, &options), options.root_outline);
        assert_eq!(branch_color(&map, children[0], &options), options.branch_palette[0]);
        assert_eq!(branch_color(&map, grandchild, &options), options.branch_palette[1]);
        assert_eq!(branch_color(&map, children[7], &options), options.branch_palette[1]);

        let bare = RenderOptions::default().with_branch_palette(Vec::new());
        assert_eq!(branch_color(&map, grandchild, &bare), bare.root_outline);
    }
}
