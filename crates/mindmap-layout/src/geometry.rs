//! Computed positions and sizes, kept beside the tree rather than in it.

use std::collections::HashMap;

use mindmap_core::{MindMap, NodeId};

/// Extra margin around a topic that still counts as a hit.
pub const HIT_PADDING: f64 = 10.0;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Top-left corner
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Bounds of a box centered on `(cx, cy)`.
    pub fn from_center(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Check if a point is inside the bounds (edges included).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Smallest bounds covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Bounds::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Grow by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Bounds {
        Bounds::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }
}

/// Layout results for one topic. `(x, y)` is the center.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Vertical room for the topic and its expanded descendants
    pub subtree_height: f64,
}

impl NodeGeometry {
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_center(self.x, self.y, self.width, self.height)
    }
}

/// Side-table of [`NodeGeometry`] keyed by node id.
///
/// Nodes below a collapsed ancestor keep whatever geometry they last had;
/// callers must filter by visibility before drawing or picking them.
#[derive(Debug, Clone, Default)]
pub struct LayoutGeometry {
    nodes: HashMap<NodeId, NodeGeometry>,
}

impl LayoutGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeGeometry> {
        self.nodes.get(&id)
    }

    /// The entry for `id`, created zeroed if missing.
    pub fn entry(&mut self, id: NodeId) -> &mut NodeGeometry {
        self.nodes.entry(id).or_default()
    }

    pub fn insert(&mut self, id: NodeId, geometry: NodeGeometry) {
        self.nodes.insert(id, geometry);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeGeometry)> {
        self.nodes.iter().map(|(id, g)| (*id, g))
    }

    /// Drop entries for nodes no longer in `map`. Returns how many were removed.
    pub fn prune(&mut self, map: &MindMap) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|id, _| map.contains(*id));
        before - self.nodes.len()
    }

    /// Rectangle of a placed node.
    pub fn bounds(&self, id: NodeId) -> Option<Bounds> {
        self.get(id).map(NodeGeometry::bounds)
    }

    /// Topmost visible node under `(x, y)`, allowing [`HIT_PADDING`] of slack.
    ///
    /// Nodes later in visible order are drawn on top and so win ties.
    pub fn hit_test(&self, map: &MindMap, x: f64, y: f64) -> Option<NodeId> {
        map.visible_nodes().into_iter().rev().find(|&id| {
            self.bounds(id)
                .is_some_and(|b| b.expand(HIT_PADDING).contains(x, y))
        })
    }

    /// Union of every visible node's rectangle.
    pub fn content_bounds(&self, map: &MindMap) -> Option<Bounds> {
        map.visible_nodes()
            .into_iter()
            .filter_map(|id| self.bounds(id))
            .reduce(|acc, b| acc.union(&b))
    }
}
