//! The layout pass: measure, accumulate subtree heights, place.

use mindmap_core::{Direction, MindMap, NodeId};
use mindmap_text::{FontDescriptor, TextMeasurer};
use tracing::{debug, instrument, trace, warn};

use crate::angles::{column_order, compute_root_child_angles};
use crate::geometry::LayoutGeometry;
use crate::options::{LayoutOptions, MeasureOptions};
use crate::size::{NodeSize, SizeCalculator};

/// Lays out a [`MindMap`] into a [`LayoutGeometry`].
///
/// The engine owns the size cache, so keeping one engine per document across
/// passes avoids re-wrapping unchanged topics.
pub struct LayoutEngine<M: TextMeasurer> {
    options: LayoutOptions,
    sizer: SizeCalculator<M>,
    geometry: LayoutGeometry,
}

impl<M: TextMeasurer> LayoutEngine<M> {
    pub fn new(measurer: M) -> Self {
        Self {
            options: LayoutOptions::default(),
            sizer: SizeCalculator::new(measurer),
            geometry: LayoutGeometry::new(),
        }
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_measure_options(mut self, options: MeasureOptions) -> Self {
        self.sizer.set_options(options);
        self
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    pub fn sizer(&self) -> &SizeCalculator<M> {
        &self.sizer
    }

    pub fn sizer_mut(&mut self) -> &mut SizeCalculator<M> {
        &mut self.sizer
    }

    /// The font a node is measured and drawn in.
    pub fn font_for<'a>(&'a self, map: &MindMap, id: NodeId, font: &'a FontDescriptor) -> &'a FontDescriptor {
        match &self.options.root_font {
            Some(root_font) if id == map.root() => root_font,
            _ => font,
        }
    }

    fn measure(&mut self, map: &MindMap, id: NodeId, font: &FontDescriptor) -> NodeSize {
        let Some(node) = map.get(id) else {
            return NodeSize::default();
        };
        let node_font = match &self.options.root_font {
            Some(root_font) if node.is_root() => root_font,
            _ => font,
        };
        let size = self.sizer.measure(node, node_font);
        let entry = self.geometry.entry(id);
        entry.width = size.width;
        entry.height = size.height;
        size
    }

    /// Height of `id` and its expanded descendants stacked, measuring as it goes.
    ///
    /// A leaf or collapsed node counts only its own height. Unknown ids give 0.
    pub fn subtree_height(&mut self, map: &MindMap, id: NodeId, font: &FontDescriptor) -> f64 {
        let Some(node) = map.get(id) else {
            return 0.0;
        };
        let own = self.measure(map, id, font).height;

        let height = if node.collapsed || node.is_leaf() {
            own
        } else {
            let mut stacked = 0.0;
            for &child in &node.children {
                stacked += self.subtree_height(map, child, font);
            }
            stacked += self.options.vertical_spacing * (node.children.len() - 1) as f64;
            own.max(stacked)
        };

        self.geometry.entry(id).subtree_height = height;
        height
    }

    /// Assign a size and center to every visible node, with the root at
    /// `(center_x, center_y)`.
    ///
    /// Root children get their side from their angle and pass it down to
    /// their whole branch. Children of collapsed nodes keep their previous
    /// geometry. Running the pass twice without changes yields the same result.
    #[instrument(level = "debug", skip_all, fields(nodes = map.len()))]
    pub fn apply_layout(&mut self, map: &mut MindMap, font: &FontDescriptor, center_x: f64, center_y: f64) {
        let pruned = self.geometry.prune(map);
        self.sizer.retain(|id| map.contains(id));
        if pruned > 0 {
            trace!(pruned, "dropped geometry of removed nodes");
        }

        let root = map.root();
        self.subtree_height(map, root, font);
        {
            let entry = self.geometry.entry(root);
            entry.x = center_x;
            entry.y = center_y;
        }

        let root_collapsed = map.get(root).is_some_and(|n| n.collapsed);
        let children = map.children(root).to_vec();
        if root_collapsed || children.is_empty() {
            debug!(children = children.len(), "layout pass complete");
            return;
        }

        let angles = compute_root_child_angles(children.len());
        for (&child, &angle) in children.iter().zip(&angles) {
            if let Err(error) = map.set_branch_direction(child, Direction::from_angle(angle)) {
                warn!(%error, "could not assign branch side");
            }
        }

        let root_half_width = self.geometry.entry(root).half_width() + self.options.root_frame_padding_x;
        let (right, left) = column_order(&angles);
        for (column, direction) in [(&right, Direction::Right), (&left, Direction::Left)] {
            let ids: Vec<NodeId> = column.iter().map(|&i| children[i]).collect();
            self.place_column(map, &ids, direction, root_half_width, center_x, center_y);
        }

        debug!(
            right = right.len(),
            left = left.len(),
            visible = map.visible_nodes().len(),
            "layout pass complete"
        );
    }

    /// Stack one column of root children around the root's y.
    fn place_column(
        &mut self,
        map: &MindMap,
        ids: &[NodeId],
        direction: Direction,
        root_half_width: f64,
        center_x: f64,
        center_y: f64,
    ) {
        if ids.is_empty() {
            return;
        }
        let max_half_width = ids
            .iter()
            .filter_map(|&id| self.geometry.get(id))
            .map(|g| g.half_width())
            .fold(0.0, f64::max);
        let x = center_x + direction.sign() * (root_half_width + self.options.horizontal_margin + max_half_width);
        trace!(%direction, x, count = ids.len(), "placing root column");

        self.stack(map, ids, center_y, |_, _| x);
    }

    /// Place the children of an expanded node beside it, then recurse.
    fn layout_branch(&mut self, map: &MindMap, id: NodeId) {
        let Some(node) = map.get(id) else {
            return;
        };
        if node.collapsed || node.is_leaf() {
            return;
        }
        let Some(&parent) = self.geometry.get(id) else {
            return;
        };
        let margin = self.options.horizontal_margin;
        self.stack(map, &node.children, parent.y, |child_half_width, direction| {
            parent.x + direction.sign() * (parent.half_width() + margin + child_half_width)
        });
    }

    /// Stack `ids` vertically, each in a slice as tall as its subtree, the
    /// whole block centered on `center_y`. `x_for` maps a node's half width and
    /// direction to its center x.
    fn stack(
        &mut self,
        map: &MindMap,
        ids: &[NodeId],
        center_y: f64,
        x_for: impl Fn(f64, Direction) -> f64,
    ) {
        let spacing = self.options.vertical_spacing;
        let total: f64 = ids
            .iter()
            .filter_map(|&id| self.geometry.get(id))
            .map(|g| g.subtree_height)
            .sum::<f64>()
            + spacing * (ids.len().saturating_sub(1)) as f64;

        let mut top = center_y - total / 2.0;
        for &id in ids {
            let direction = map.get(id).map_or(Direction::Right, |n| n.direction);
            let entry = self.geometry.entry(id);
            entry.x = x_for(entry.half_width(), direction);
            entry.y = top + entry.subtree_height / 2.0;
            top += entry.subtree_height + spacing;
            self.layout_branch(map, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::NodeGeometry;
    use mindmap_text::{ApproximateMeasurer, MonospaceMeasurer};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    fn engine() -> LayoutEngine<MonospaceMeasurer> {
        LayoutEngine::new(MonospaceMeasurer::new(10.0, 16.0))
    }

    fn font() -> FontDescriptor {
        FontDescriptor::new("Arial", 10.0)
    }

    fn at(engine: &LayoutEngine<MonospaceMeasurer>, id: NodeId) -> NodeGeometry {
        *engine.geometry().get(id).unwrap()
    }

    fn snapshot(engine: &LayoutEngine<MonospaceMeasurer>, map: &MindMap) -> Vec<(NodeId, NodeGeometry)> {
        map.nodes().map(|n| (n.id, at(engine, n.id))).collect()
    }

    #[test]
    fn test_single_child_sits_right_of_root() {
        init_tracing();
        let mut map = MindMap::new("Root");
        let child = map.add_child(map.root(), "Child").unwrap();

        let mut engine = engine();
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);

        let root = at(&engine, map.root());
        assert_eq!((root.x, root.y), (0.0, 0.0));
        assert_eq!((root.width, root.height), (100.0, 35.0));

        // 50 + 12 frame + 80 margin + 50
        let placed = at(&engine, child);
        assert!((placed.x - 192.0).abs() < 1e-9);
        assert!(placed.y.abs() < 1e-9);
        assert_eq!(map.get(child).unwrap().direction, Direction::Right);
    }

    #[test]
    fn test_frame_padding_and_wrap_width_drive_placement() {
        let mut map = MindMap::new("Root");
        let child = map.add_child(map.root(), "c".repeat(20)).unwrap();

        let mut engine = engine()
            .with_options(LayoutOptions::default().with_root_frame_padding(30.0, 10.0))
            .with_measure_options(MeasureOptions::default().with_max_width(100.0));
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);

        // 20 chars wrap at 100 into two lines: 100 + 20 wide, 2 * 16 + 12 high
        let placed = at(&engine, child);
        assert_eq!((placed.width, placed.height), (120.0, 44.0));
        // 50 + 30 frame + 80 margin + 60
        assert!((placed.x - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_subtree_heights() {
        let mut map = MindMap::new("Root");
        let root = map.root();
        let a = map.add_child(root, "a").unwrap();
        map.add_child(root, "b").unwrap();
        map.add_child(a, "a1").unwrap();
        map.add_child(a, "a2").unwrap();
        map.add_child(a, "a3").unwrap();

        let mut engine = engine();
        // three leaves: 3 * 35 + 2 * 30
        assert!((engine.subtree_height(&map, a, &font()) - 165.0).abs() < 1e-9);
        // 165 + 35 + 30
        assert!((engine.subtree_height(&map, root, &font()) - 230.0).abs() < 1e-9);
    }

    #[test]
    fn test_collapsed_subtree_height_is_own_height() {
        let mut map = MindMap::new("Root");
        let a = map.add_child(map.root(), "a").unwrap();
        for i in 0..5 {
            map.add_child(a, "x".repeat(i * 40)).unwrap();
        }
        map.set_collapsed(a, true).unwrap();

        let mut engine = engine();
        let height = engine.subtree_height(&map, a, &font());
        assert_eq!(height, engine.geometry().get(a).unwrap().height);
        assert_eq!(height, 35.0);
    }

    #[test]
    fn test_two_children_stack_around_root() {
        let mut map = MindMap::new("Root");
        let root = map.root();
        let a = map.add_child(root, "a").unwrap();
        let b = map.add_child(root, "b").unwrap();

        let mut engine = engine();
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);

        assert!((at(&engine, a).y + 32.5).abs() < 1e-9);
        assert!((at(&engine, b).y - 32.5).abs() < 1e-9);
        assert_eq!(at(&engine, a).x, at(&engine, b).x);
    }

    #[test]
    fn test_five_children_column_order() {
        let mut map = MindMap::new("Root");
        let root = map.root();
        let ids: Vec<_> = (0..5).map(|i| map.add_child(root, format!("c{i}")).unwrap()).collect();

        let mut engine = engine();
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);

        for &id in &ids[..3] {
            assert_eq!(map.get(id).unwrap().direction, Direction::Right);
            assert!(at(&engine, id).x > 0.0);
        }
        for &id in &ids[3..] {
            assert_eq!(map.get(id).unwrap().direction, Direction::Left);
            assert!(at(&engine, id).x < 0.0);
        }
        assert!(at(&engine, ids[0]).y < at(&engine, ids[1]).y);
        assert!(at(&engine, ids[1]).y < at(&engine, ids[2]).y);
        // left column reads in decreasing angle: 300° above 240°
        assert!(at(&engine, ids[4]).y < at(&engine, ids[3]).y);
    }

    #[test]
    fn test_three_children_keep_unbalanced_columns() {
        let mut map = MindMap::new("Root");
        let root = map.root();
        let ids: Vec<_> = (0..3).map(|i| map.add_child(root, format!("c{i}")).unwrap()).collect();

        let mut engine = engine();
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);

        let sides: Vec<_> = ids.iter().map(|&id| map.get(id).unwrap().direction).collect();
        assert_eq!(sides, vec![Direction::Right, Direction::Right, Direction::Left]);
        assert!(at(&engine, ids[2]).y.abs() < 1e-9);
    }

    #[test]
    fn test_direction_propagates_to_branch() {
        let mut map = MindMap::new("Root");
        let root = map.root();
        let ids: Vec<_> = (0..3).map(|i| map.add_child(root, format!("c{i}")).unwrap()).collect();
        // the third root child starts out balanced to the right
        let grandchild = map.add_child(ids[2], "g").unwrap();
        assert_eq!(map.get(grandchild).unwrap().direction, Direction::Right);

        let mut engine = engine();
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);

        assert_eq!(map.get(ids[2]).unwrap().direction, Direction::Left);
        assert_eq!(map.get(grandchild).unwrap().direction, Direction::Left);
        let parent = at(&engine, ids[2]);
        let placed = at(&engine, grandchild);
        assert!((placed.x - (parent.x - 180.0)).abs() < 1e-9);
        assert!((placed.y - parent.y).abs() < 1e-9);
    }

    #[test]
    fn test_collapsed_children_keep_stale_geometry() {
        let mut map = MindMap::new("Root");
        let root = map.root();
        let a = map.add_child(root, "a").unwrap();
        let leaf = map.add_child(a, "leaf").unwrap();

        let mut engine = engine();
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);
        let before = at(&engine, leaf);

        map.set_collapsed(a, true).unwrap();
        map.add_child(root, "b").unwrap();
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);

        assert_ne!(at(&engine, a).y, 0.0);
        assert_eq!(at(&engine, leaf), before);
    }

    #[test]
    fn test_removed_nodes_are_pruned() {
        let mut map = MindMap::new("Root");
        let a = map.add_child(map.root(), "a").unwrap();

        let mut engine = engine();
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);
        assert_eq!(engine.geometry().len(), 2);

        map.remove(a).unwrap();
        engine.apply_layout(&mut map, &font(), 0.0, 0.0);
        assert_eq!(engine.geometry().len(), 1);
        assert_eq!(engine.sizer().cache_len(), 1);
    }

    #[test]
    fn test_root_font_applies_to_root_only() {
        let text = "a fairly long root topic";
        let mut map = MindMap::new(text);
        let child = map.add_child(map.root(), text).unwrap();

        let mut engine = LayoutEngine::new(ApproximateMeasurer)
            .with_options(LayoutOptions::default().with_root_font(FontDescriptor::new("Arial", 20.0)));
        engine.apply_layout(&mut map, &FontDescriptor::new("Arial", 10.0), 0.0, 0.0);

        let root = engine.geometry().get(map.root()).unwrap();
        let child = engine.geometry().get(child).unwrap();
        assert!(root.width > child.width);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut map = MindMap::new("Root");
        let root = map.root();
        for i in 0..6 {
            let c = map.add_child(root, format!("child {i}")).unwrap();
            for j in 0..i {
                map.add_child(c, "x".repeat(j * 20)).unwrap();
            }
        }

        let mut engine = engine();
        engine.apply_layout(&mut map, &font(), 100.0, 50.0);
        let first = snapshot(&engine, &map);
        engine.apply_layout(&mut map, &font(), 100.0, 50.0);
        assert_eq!(first, snapshot(&engine, &map));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_idempotent_on_random_trees(
                parents in prop::collection::vec(any::<prop::sample::Index>(), 1..40),
                lengths in prop::collection::vec(0usize..60, 40),
            ) {
                let mut map = MindMap::new("Root");
                let mut ids = vec![map.root()];
                for (i, parent) in parents.iter().enumerate() {
                    let parent = ids[parent.index(ids.len())];
                    let id = map.add_child(parent, "w".repeat(lengths[i])).unwrap();
                    ids.push(id);
                }

                let mut engine = engine();
                engine.apply_layout(&mut map, &font(), 0.0, 0.0);
                let first = snapshot(&engine, &map);
                engine.apply_layout(&mut map, &font(), 0.0, 0.0);
                prop_assert_eq!(first, snapshot(&engine, &map));

                for &id in &ids {
                    let g = at(&engine, id);
                    prop_assert!(g.subtree_height >= g.height);
                }
            }
        }
    }
}
