//! The mind-map tree model.
//!
//! Nodes live in an insertion-ordered arena keyed by [`NodeId`]. Parents own
//! an ordered list of child ids and children hold their parent's id, so both
//! directions of navigation are O(1) without reference cycles.
//!
//! Derived geometry (sizes, positions, subtree heights) is not stored here;
//! the layout crate keeps it in its own side-table.

use indexmap::IndexMap;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::image::ImagePayload;
use crate::types::{Direction, NodeId, ReferenceId};

/// A topic in the mind map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Unique ID for this node
    pub id: NodeId,
    /// Parent node ID (None for the root)
    pub parent: Option<NodeId>,
    /// Child node IDs, in display order
    pub children: Vec<NodeId>,
    /// Text content, possibly containing inline markup
    pub text: String,
    /// Optional image shown above the text
    pub image: Option<ImagePayload>,
    /// Whether the children are hidden
    pub collapsed: bool,
    /// Side of the root this node's branch grows toward
    pub direction: Direction,
}

impl Node {
    fn new(id: NodeId, text: impl Into<String>) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            text: text.into(),
            image: None,
            collapsed: false,
            direction: Direction::Right,
        }
    }

    /// Whether this node is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A non-tree link between two nodes, drawn as a dashed curve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reference {
    pub id: ReferenceId,
    pub source: NodeId,
    pub target: NodeId,
    /// Explicit first control point, overriding the derived one
    pub control1: Option<(f64, f64)>,
    /// Explicit second control point, overriding the derived one
    pub control2: Option<(f64, f64)>,
}

/// A rooted tree of topics plus cross-links.
#[derive(Debug, Clone)]
pub struct MindMap {
    /// All nodes, in insertion order
    nodes: IndexMap<NodeId, Node>,
    /// The root node ID
    root: NodeId,
    /// Cross-links between nodes
    references: Vec<Reference>,
    /// Counter for generating unique node IDs
    next_node_id: u64,
    /// Counter for generating unique reference IDs
    next_reference_id: u64,
}

impl MindMap {
    /// Create a map containing only a root with the given text.
    pub fn new(root_text: impl Into<String>) -> Self {
        let root = NodeId(0);
        let mut nodes = IndexMap::new();
        nodes.insert(root, Node::new(root, root_text));
        Self {
            nodes,
            root,
            references: Vec::new(),
            next_node_id: 1,
            next_reference_id: 0,
        }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// The root node ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn node(&self, id: NodeId) -> TreeResult<&Node> {
        self.nodes.get(&id).ok_or(TreeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(TreeError::NodeNotFound(id))
    }

    /// Whether the node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A map always has a root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Child IDs of a node (empty for unknown IDs).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent ID of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Side the next root child should be placed on: right unless the right
    /// side already has more root children than the left.
    pub fn balanced_direction(&self) -> Direction {
        let (right, left) = self
            .children(self.root)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .fold((0usize, 0usize), |(r, l), n| match n.direction {
                Direction::Right => (r + 1, l),
                Direction::Left => (r, l + 1),
            });
        if right <= left {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// Append a child. Root children take the balanced direction, deeper
    /// nodes inherit their parent's.
    #[instrument(level = "debug", skip(self, text))]
    pub fn add_child(&mut self, parent: NodeId, text: impl Into<String>) -> TreeResult<NodeId> {
        let direction = self.direction_under(parent)?;
        self.insert_child(parent, None, text.into(), direction)
    }

    /// Append a root child on an explicit side.
    ///
    /// Deeper nodes always take their branch's side, so `parent` must be the root.
    #[instrument(level = "debug", skip(self, text))]
    pub fn add_child_with_direction(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
        direction: Direction,
    ) -> TreeResult<NodeId> {
        if !self.node(parent)?.is_root() {
            return Err(TreeError::SideFollowsBranch(parent));
        }
        self.insert_child(parent, None, text.into(), direction)
    }

    /// Insert a new node right after `sibling` under the same parent.
    #[instrument(level = "debug", skip(self, text))]
    pub fn add_sibling(&mut self, sibling: NodeId, text: impl Into<String>) -> TreeResult<NodeId> {
        let parent = self
            .node(sibling)?
            .parent
            .ok_or(TreeError::RootImmutable { operation: "given a sibling" })?;
        let position = self
            .children(parent)
            .iter()
            .position(|&c| c == sibling)
            .map(|i| i + 1);
        let direction = self.direction_under(parent)?;
        self.insert_child(parent, position, text.into(), direction)
    }

    fn direction_under(&self, parent: NodeId) -> TreeResult<Direction> {
        let parent_node = self.node(parent)?;
        Ok(if parent_node.is_root() {
            self.balanced_direction()
        } else {
            parent_node.direction
        })
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        position: Option<usize>,
        text: String,
        direction: Direction,
    ) -> TreeResult<NodeId> {
        self.node(parent)?;
        let id = self.next_id();
        let mut node = Node::new(id, text);
        node.parent = Some(parent);
        node.direction = direction;
        self.nodes.insert(id, node);

        let parent_node = self.node_mut(parent)?;
        match position {
            Some(i) if i <= parent_node.children.len() => parent_node.children.insert(i, id),
            _ => parent_node.children.push(id),
        }
        Ok(id)
    }

    /// Remove a node together with its subtree and every reference touching it.
    ///
    /// Returns the removed IDs in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        let parent = self
            .node(id)?
            .parent
            .ok_or(TreeError::RootImmutable { operation: "removed" })?;

        let removed = self.descendants(id);
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.retain(|&c| c != id);
        }
        for gone in &removed {
            self.nodes.shift_remove(gone);
        }
        self.references
            .retain(|r| !removed.contains(&r.source) && !removed.contains(&r.target));
        Ok(removed)
    }

    /// Re-parent a node, appending it to `new_parent`'s children.
    #[instrument(level = "debug", skip(self))]
    pub fn move_to(&mut self, id: NodeId, new_parent: NodeId) -> TreeResult<()> {
        let old_parent = self
            .node(id)?
            .parent
            .ok_or(TreeError::RootImmutable { operation: "moved" })?;
        self.node(new_parent)?;
        if self.is_descendant_of(new_parent, id) {
            return Err(TreeError::CycleDetected {
                node: id,
                target: new_parent,
            });
        }

        if let Some(p) = self.nodes.get_mut(&old_parent) {
            p.children.retain(|&c| c != id);
        }
        // Computed after detaching so the moved node does not count itself.
        let direction = self.direction_under(new_parent)?;
        self.node_mut(new_parent)?.children.push(id);
        self.node_mut(id)?.parent = Some(new_parent);
        self.propagate_direction(id, direction);
        Ok(())
    }

    /// Move a root child's whole branch to `direction`.
    #[instrument(level = "trace", skip(self))]
    pub fn set_branch_direction(&mut self, id: NodeId, direction: Direction) -> TreeResult<()> {
        if self.node(id)?.parent != Some(self.root) {
            return Err(TreeError::SideFollowsBranch(id));
        }
        self.propagate_direction(id, direction);
        Ok(())
    }

    fn propagate_direction(&mut self, id: NodeId, direction: Direction) {
        for n in self.descendants(id) {
            if let Some(node) = self.nodes.get_mut(&n) {
                node.direction = direction;
            }
        }
    }

    /// Replace a node's text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> TreeResult<()> {
        self.node_mut(id)?.text = text.into();
        Ok(())
    }

    /// Attach or clear a node's image.
    pub fn set_image(&mut self, id: NodeId, image: Option<ImagePayload>) -> TreeResult<()> {
        self.node_mut(id)?.image = image;
        Ok(())
    }

    /// Collapse or expand a node.
    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) -> TreeResult<()> {
        self.node_mut(id)?.collapsed = collapsed;
        Ok(())
    }

    /// Flip a node's collapsed flag, returning the new state.
    pub fn toggle_collapsed(&mut self, id: NodeId) -> TreeResult<bool> {
        let node = self.node_mut(id)?;
        node.collapsed = !node.collapsed;
        Ok(node.collapsed)
    }

    /// Whether `id` lies in the subtree rooted at `ancestor` (a node is its
    /// own descendant).
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent(c);
        }
        false
    }

    /// Strict ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(c) = current {
            result.push(c);
            current = self.parent(c);
        }
        result
    }

    /// Distance from the root (the root has depth 0).
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// A node is visible when none of its ancestors is collapsed.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.contains(id)
            && self
                .ancestors(id)
                .iter()
                .all(|a| self.nodes.get(a).map_or(true, |n| !n.collapsed))
    }

    /// The node and its whole subtree, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            result.push(current);
            stack.extend(node.children.iter().rev());
        }
        result
    }

    /// Visible nodes in pre-order, starting at the root.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            result.push(current);
            if !node.collapsed {
                stack.extend(node.children.iter().rev());
            }
        }
        result
    }

    /// Index, among the root's children, of the branch containing `id`.
    ///
    /// None for the root itself.
    pub fn branch_index(&self, id: NodeId) -> Option<usize> {
        let mut branch = id;
        loop {
            let parent = self.parent(branch)?;
            if parent == self.root {
                break;
            }
            branch = parent;
        }
        self.children(self.root).iter().position(|&c| c == branch)
    }

    /// All cross-links.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Get a cross-link by ID.
    pub fn reference(&self, id: ReferenceId) -> Option<&Reference> {
        self.references.iter().find(|r| r.id == id)
    }

    /// Link two distinct existing nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn add_reference(&mut self, source: NodeId, target: NodeId) -> TreeResult<ReferenceId> {
        self.node(source)?;
        self.node(target)?;
        if source == target {
            return Err(TreeError::SelfReference(source));
        }
        let id = ReferenceId(self.next_reference_id);
        self.next_reference_id += 1;
        self.references.push(Reference {
            id,
            source,
            target,
            control1: None,
            control2: None,
        });
        Ok(id)
    }

    /// Remove a cross-link.
    pub fn remove_reference(&mut self, id: ReferenceId) -> TreeResult<Reference> {
        let index = self
            .references
            .iter()
            .position(|r| r.id == id)
            .ok_or(TreeError::ReferenceNotFound(id))?;
        Ok(self.references.remove(index))
    }

    /// Override (or reset with `None`) a cross-link's control points.
    pub fn set_reference_controls(
        &mut self,
        id: ReferenceId,
        control1: Option<(f64, f64)>,
        control2: Option<(f64, f64)>,
    ) -> TreeResult<()> {
        let reference = self
            .references
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(TreeError::ReferenceNotFound(id))?;
        reference.control1 = control1;
        reference.control2 = control2;
        Ok(())
    }
}
