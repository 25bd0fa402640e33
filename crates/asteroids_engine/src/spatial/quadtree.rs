//! Adaptive quadtree rebuilt from scratch every tick
//!
//! The tree indexes square [`Aabb`]s by entity id. Each node keeps the ids
//! of boxes that fit inside it but not inside any one of its quadrants, so a
//! box lands at the deepest node that fully contains it. Children are only
//! created when a box needs them.
//!
//! All nodes and id cells live in two [`Pool`]s carved once from an arena.
//! [`QuadTree::finalize`] rewinds both pools in O(1) and
//! [`QuadTree::init`] plants a fresh root, so a tick never allocates.
//!
//! ```
//! use asteroids_engine::ecs::EntityId;
//! use asteroids_engine::foundation::memory::Arena;
//! use asteroids_engine::spatial::{Aabb, QuadTree, QuadTreeCapacity};
//!
//! let mut arena = Arena::create("QUADTREE", 1 << 20).unwrap();
//! let mut tree = QuadTree::new(&mut arena, QuadTreeCapacity { nodes: 256, ids: 64 }).unwrap();
//! tree.init(4, 1000.0).unwrap();
//!
//! let ship = Aabb::from_xy(600.0, 600.0, 10.0);
//! assert!(tree.insert(EntityId::new(0), &ship));
//! let node = tree.query(&ship).unwrap();
//! assert!(tree.node(node).unwrap().bounds().contains_xy(&ship));
//! ```

use super::{Aabb, SpatialError};
use crate::ecs::EntityId;
use crate::foundation::memory::{Arena, Pool};

/// Index of a node inside its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Raw slot in the node pool
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One quarter of a node, named by compass direction in XY (+Y is north)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// -X, +Y
    NorthWest,
    /// +X, +Y
    NorthEast,
    /// +X, -Y
    SouthEast,
    /// -X, -Y
    SouthWest,
}

impl Quadrant {
    /// Order in which quadrants are tried by both insert and query
    pub const ALL: [Self; 4] = [
        Self::NorthWest,
        Self::NorthEast,
        Self::SouthEast,
        Self::SouthWest,
    ];

    const fn slot(self) -> usize {
        match self {
            Self::NorthWest => 0,
            Self::NorthEast => 1,
            Self::SouthEast => 2,
            Self::SouthWest => 3,
        }
    }

    /// Direction of the quadrant center from the parent center
    #[must_use]
    pub const fn signs(self) -> (f32, f32) {
        match self {
            Self::NorthWest => (-1.0, 1.0),
            Self::NorthEast => (1.0, 1.0),
            Self::SouthEast => (1.0, -1.0),
            Self::SouthWest => (-1.0, -1.0),
        }
    }

    /// Bounds of this quadrant of `parent`
    #[must_use]
    pub fn child_bounds(self, parent: &Aabb) -> Aabb {
        let half_edge = parent.half_edge * 0.5;
        let (sx, sy) = self.signs();
        let mut pos = parent.pos;
        pos.x += sx * half_edge;
        pos.y += sy * half_edge;
        Aabb::new(pos, half_edge)
    }
}

/// Node capacities carved at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadTreeCapacity {
    /// Maximum nodes per tick, root included
    pub nodes: usize,
    /// Maximum ids stored per tick
    pub ids: usize,
}

#[derive(Debug, Clone, Copy)]
struct IdCell {
    id: EntityId,
    next: Option<usize>,
}

/// A square region of the tree
#[derive(Debug, Clone)]
pub struct QuadNode {
    bounds: Aabb,
    depth: u32,
    children: [Option<NodeIndex>; 4],
    head: Option<usize>,
    tail: Option<usize>,
    id_count: usize,
}

impl QuadNode {
    const fn new(bounds: Aabb, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            children: [None; 4],
            head: None,
            tail: None,
            id_count: 0,
        }
    }

    /// Region covered by this node
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Depth of this node; the root is depth 1
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Child in `quadrant`, if one has been created
    #[must_use]
    pub const fn child(&self, quadrant: Quadrant) -> Option<NodeIndex> {
        self.children[quadrant.slot()]
    }

    /// Existing children with their quadrants
    pub fn children(&self) -> impl Iterator<Item = (Quadrant, NodeIndex)> + '_ {
        Quadrant::ALL
            .into_iter()
            .filter_map(move |q| self.child(q).map(|child| (q, child)))
    }

    /// Whether no child has been created
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Number of ids stored directly in this node
    #[must_use]
    pub const fn id_count(&self) -> usize {
        self.id_count
    }
}

/// Ids stored directly in one node, in insertion order
#[derive(Debug, Clone)]
pub struct NodeIds<'a> {
    cells: &'a [IdCell],
    next: Option<usize>,
}

impl Iterator for NodeIds<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.cells.get(self.next?)?;
        self.next = cell.next;
        Some(cell.id)
    }
}

enum Step {
    Descend(NodeIndex),
    Create(Quadrant, Aabb),
    Land,
}

/// Per-tick spatial index over entity bounding boxes
#[derive(Debug)]
pub struct QuadTree {
    nodes: Pool<QuadNode>,
    cells: Pool<IdCell>,
    root: Option<NodeIndex>,
    max_depth: u32,
    dropped_inserts: usize,
}

impl QuadTree {
    /// Carve node and id storage from `arena`
    ///
    /// The tree is empty until [`QuadTree::init`] plants a root.
    ///
    /// # Errors
    ///
    /// [`SpatialError::Memory`] if the arena cannot cover both pools.
    pub fn new(arena: &mut Arena, capacity: QuadTreeCapacity) -> Result<Self, SpatialError> {
        let nodes = Pool::carve(arena, capacity.nodes)?;
        let cells = Pool::carve(arena, capacity.ids)?;
        log::debug!(
            "Quadtree storage carved from [{}]: {} nodes, {} ids",
            arena.tag(),
            capacity.nodes,
            capacity.ids
        );

        Ok(Self {
            nodes,
            cells,
            root: None,
            max_depth: 0,
            dropped_inserts: 0,
        })
    }

    /// Plant a root centered at the origin covering `±half_edge`
    ///
    /// Any previous contents are discarded first.
    ///
    /// # Errors
    ///
    /// Rejects a zero depth or a non-positive/non-finite half-edge, and
    /// fails if the node pool cannot hold the root.
    pub fn init(&mut self, max_depth: u32, half_edge: f32) -> Result<NodeIndex, SpatialError> {
        if max_depth == 0 {
            return Err(SpatialError::InvalidDepth);
        }
        if !half_edge.is_finite() || half_edge <= 0.0 {
            return Err(SpatialError::InvalidHalfEdge(half_edge));
        }

        self.finalize();
        let slot = self.nodes.push(QuadNode::new(Aabb::from_xy(0.0, 0.0, half_edge), 1))?;
        let root = NodeIndex(slot);
        self.root = Some(root);
        self.max_depth = max_depth;
        Ok(root)
    }

    /// Discard every node and id; the tree needs [`QuadTree::init`] again
    pub fn finalize(&mut self) {
        self.nodes.reset();
        self.cells.reset();
        self.root = None;
        self.dropped_inserts = 0;
    }

    /// Store `id` at the deepest node whose region fully contains `aabb`
    ///
    /// Returns `false` without touching the tree when the root does not
    /// contain the box (or the tree has no root). Also returns `false`
    /// when node or id storage runs out; those drops are counted in
    /// [`QuadTree::dropped_inserts`].
    pub fn insert(&mut self, id: EntityId, aabb: &Aabb) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        if !self.nodes.get(root.0).is_some_and(|n| n.bounds.contains_xy(aabb)) {
            log::trace!("Quadtree rejected {id:?}: outside root");
            return false;
        }
        if self.cells.is_full() {
            self.record_drop(id);
            return false;
        }

        let mut current = root;
        loop {
            match self.next_step(current, aabb) {
                Step::Land => break,
                Step::Descend(child) => current = child,
                Step::Create(quadrant, bounds) => {
                    let depth = self.nodes.get(current.0).map_or(1, |n| n.depth) + 1;
                    let Ok(slot) = self.nodes.push(QuadNode::new(bounds, depth)) else {
                        self.record_drop(id);
                        return false;
                    };
                    let child = NodeIndex(slot);
                    if let Some(parent) = self.nodes.get_mut(current.0) {
                        parent.children[quadrant.slot()] = Some(child);
                    }
                    current = child;
                }
            }
        }

        self.append(current, id)
    }

    fn next_step(&self, current: NodeIndex, aabb: &Aabb) -> Step {
        let Some(node) = self.nodes.get(current.0) else {
            return Step::Land;
        };
        if node.depth >= self.max_depth {
            return Step::Land;
        }

        for quadrant in Quadrant::ALL {
            let bounds = quadrant.child_bounds(&node.bounds);
            if bounds.contains_xy(aabb) {
                return match node.children[quadrant.slot()] {
                    Some(child) => Step::Descend(child),
                    None => Step::Create(quadrant, bounds),
                };
            }
        }
        Step::Land
    }

    fn append(&mut self, node_index: NodeIndex, id: EntityId) -> bool {
        let Ok(cell) = self.cells.push(IdCell { id, next: None }) else {
            self.record_drop(id);
            return false;
        };
        let Some(node) = self.nodes.get_mut(node_index.0) else {
            return false;
        };

        match node.tail {
            Some(tail) => {
                if let Some(last) = self.cells.get_mut(tail) {
                    last.next = Some(cell);
                }
            }
            None => node.head = Some(cell),
        }
        node.tail = Some(cell);
        node.id_count += 1;
        true
    }

    fn record_drop(&mut self, id: EntityId) {
        if self.dropped_inserts == 0 {
            log::warn!(
                "Quadtree storage exhausted ({} nodes, {} ids); dropping {id:?} and later inserts this tick",
                self.nodes.len(),
                self.cells.len()
            );
        }
        self.dropped_inserts += 1;
    }

    /// Deepest existing node whose region fully contains `aabb`
    ///
    /// Walks the same quadrant order as [`QuadTree::insert`] but never
    /// creates nodes. `None` when the root does not contain the box.
    #[must_use]
    pub fn query(&self, aabb: &Aabb) -> Option<NodeIndex> {
        let mut current = self.root?;
        let mut node = self.nodes.get(current.0)?;
        if !node.bounds.contains_xy(aabb) {
            return None;
        }

        'descend: loop {
            for (_, child) in node.children() {
                if let Some(child_node) = self.nodes.get(child.0) {
                    if child_node.bounds.contains_xy(aabb) {
                        current = child;
                        node = child_node;
                        continue 'descend;
                    }
                }
            }
            return Some(current);
        }
    }

    /// Root node, if the tree is initialised
    #[must_use]
    pub const fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Node at `index`
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&QuadNode> {
        self.nodes.get(index.0)
    }

    /// Ids stored directly in the node at `index`
    #[must_use]
    pub fn ids(&self, index: NodeIndex) -> NodeIds<'_> {
        NodeIds {
            cells: self.cells.as_slice(),
            next: self.nodes.get(index.0).and_then(|n| n.head),
        }
    }

    /// Every live node in creation order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &QuadNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (NodeIndex(slot), node))
    }

    /// Live node count, root included
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids stored this tick
    #[must_use]
    pub fn id_count(&self) -> usize {
        self.cells.len()
    }

    /// Maximum node depth set by the last init
    #[must_use]
    pub const fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Inserts refused this tick because storage ran out
    #[must_use]
    pub const fn dropped_inserts(&self) -> usize {
        self.dropped_inserts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::memory::megabytes;
    use approx::assert_relative_eq;

    const WORLD_HALF_EDGE: f32 = 100_000.0;

    fn tree_with(capacity: QuadTreeCapacity, max_depth: u32, half_edge: f32) -> (Arena, QuadTree) {
        let mut arena = Arena::create("QUADTREE", megabytes(4)).unwrap();
        let mut tree = QuadTree::new(&mut arena, capacity).unwrap();
        tree.init(max_depth, half_edge).unwrap();
        (arena, tree)
    }

    fn world_tree() -> (Arena, QuadTree) {
        tree_with(QuadTreeCapacity { nodes: 4096, ids: 1024 }, 10, WORLD_HALF_EDGE)
    }

    #[test]
    fn test_init_creates_root_only() {
        let (_arena, tree) = world_tree();
        let root = tree.root().unwrap();
        let node = tree.node(root).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(node.depth(), 1);
        assert!(node.is_leaf());
        assert_relative_eq!(node.bounds().half_edge, WORLD_HALF_EDGE);
        assert_eq!(tree.ids(root).count(), 0);
    }

    #[test]
    fn test_invalid_init_arguments() {
        let mut arena = Arena::create("QUADTREE", 4096).unwrap();
        let mut tree = QuadTree::new(&mut arena, QuadTreeCapacity { nodes: 8, ids: 8 }).unwrap();
        assert!(matches!(tree.init(0, 10.0), Err(SpatialError::InvalidDepth)));
        assert!(matches!(tree.init(4, -1.0), Err(SpatialError::InvalidHalfEdge(_))));
        assert!(matches!(tree.init(4, f32::NAN), Err(SpatialError::InvalidHalfEdge(_))));
    }

    #[test]
    fn test_insert_outside_root_is_rejected_without_mutation() {
        let (_arena, mut tree) = world_tree();
        assert!(!tree.insert(EntityId::new(1), &Aabb::from_xy(200_000.0, 0.0, 1.0)));
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.id_count(), 0);
        assert_eq!(tree.dropped_inserts(), 0);
    }

    #[test]
    fn test_uninitialised_tree_rejects_inserts() {
        let (_arena, mut tree) = world_tree();
        tree.finalize();
        assert!(!tree.insert(EntityId::new(1), &Aabb::default()));
        assert!(tree.query(&Aabb::default()).is_none());
    }

    #[test]
    fn test_box_at_world_corner_lands_at_max_depth() {
        let (_arena, mut tree) = world_tree();
        let aabb = Aabb::from_xy(99_999.0, 99_999.0, 1.0);

        assert!(tree.insert(EntityId::new(7), &aabb));

        let node = tree.query(&aabb).unwrap();
        assert_eq!(tree.node(node).unwrap().depth(), 10);
        assert_eq!(tree.ids(node).collect::<Vec<_>>(), vec![EntityId::new(7)]);
        // One new node per level below the root
        assert_eq!(tree.node_count(), 10);
    }

    #[test]
    fn test_box_straddling_center_stays_in_root() {
        let (_arena, mut tree) = world_tree();
        let aabb = Aabb::from_xy(0.0, 0.0, 1.0);
        assert!(tree.insert(EntityId::new(3), &aabb));

        let root = tree.root().unwrap();
        assert_eq!(tree.query(&aabb), Some(root));
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.node(root).unwrap().id_count(), 1);
    }

    #[test]
    fn test_children_created_lazily_per_quadrant() {
        let (_arena, mut tree) = tree_with(QuadTreeCapacity { nodes: 64, ids: 64 }, 2, 100.0);
        // Fits the north-east quadrant only
        assert!(tree.insert(EntityId::new(0), &Aabb::from_xy(50.0, 50.0, 40.0)));
        // Fits the south-west quadrant only
        assert!(tree.insert(EntityId::new(1), &Aabb::from_xy(-50.0, -50.0, 40.0)));

        let root = tree.node(tree.root().unwrap()).unwrap();
        let quadrants: Vec<_> = root.children().map(|(q, _)| q).collect();
        assert_eq!(quadrants, vec![Quadrant::NorthEast, Quadrant::SouthWest]);
        assert!(root.child(Quadrant::NorthWest).is_none());

        let ne = tree.node(root.child(Quadrant::NorthEast).unwrap()).unwrap();
        assert_relative_eq!(ne.bounds().half_edge, 50.0);
        assert_relative_eq!(ne.bounds().pos.x, 50.0);
        assert_relative_eq!(ne.bounds().pos.y, 50.0);
    }

    #[test]
    fn test_quadrant_offsets() {
        let parent = Aabb::from_xy(10.0, 10.0, 8.0);
        let expected = [(6.0, 14.0), (14.0, 14.0), (14.0, 6.0), (6.0, 6.0)];
        for (quadrant, (x, y)) in Quadrant::ALL.into_iter().zip(expected) {
            let child = quadrant.child_bounds(&parent);
            assert_relative_eq!(child.pos.x, x);
            assert_relative_eq!(child.pos.y, y);
            assert_relative_eq!(child.half_edge, 4.0);
        }
    }

    #[test]
    fn test_ids_kept_in_insertion_order() {
        let (_arena, mut tree) = world_tree();
        let aabb = Aabb::from_xy(0.0, 0.0, 5.0);
        for raw in [4, 2, 9] {
            assert!(tree.insert(EntityId::new(raw), &aabb));
        }
        let root = tree.root().unwrap();
        let ids: Vec<u32> = tree.ids(root).map(EntityId::raw).collect();
        assert_eq!(ids, vec![4, 2, 9]);
    }

    #[test]
    fn test_query_never_creates_nodes() {
        let (_arena, tree) = world_tree();
        let aabb = Aabb::from_xy(5_000.0, 5_000.0, 1.0);
        assert_eq!(tree.query(&aabb), tree.root());
        assert_eq!(tree.node_count(), 1);
        assert!(tree.query(&Aabb::from_xy(0.0, 0.0, 200_000.0)).is_none());
    }

    #[test]
    fn test_finalize_and_init_reset_to_root_only() {
        let (_arena, mut tree) = world_tree();
        for i in 0..50_u16 {
            let f = f32::from(i);
            tree.insert(EntityId::new(u32::from(i)), &Aabb::from_xy(f * 1_000.0, -f * 700.0, 3.0));
        }
        assert!(tree.node_count() > 1);

        tree.finalize();
        tree.init(10, WORLD_HALF_EDGE).unwrap();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.id_count(), 0);
        assert_eq!(tree.ids(tree.root().unwrap()).count(), 0);
    }

    #[test]
    fn test_node_exhaustion_drops_insert() {
        let (_arena, mut tree) = tree_with(QuadTreeCapacity { nodes: 1, ids: 8 }, 4, 100.0);
        assert!(!tree.insert(EntityId::new(0), &Aabb::from_xy(50.0, 50.0, 1.0)));
        assert_eq!(tree.dropped_inserts(), 1);
        // Boxes that stay in the root still fit
        assert!(tree.insert(EntityId::new(1), &Aabb::from_xy(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_id_exhaustion_drops_insert() {
        let (_arena, mut tree) = tree_with(QuadTreeCapacity { nodes: 8, ids: 1 }, 4, 100.0);
        assert!(tree.insert(EntityId::new(0), &Aabb::default()));
        assert!(!tree.insert(EntityId::new(1), &Aabb::default()));
        assert_eq!(tree.dropped_inserts(), 1);
        assert_eq!(tree.id_count(), 1);
    }

    #[test]
    fn test_depth_one_keeps_everything_in_root() {
        let (_arena, mut tree) = tree_with(QuadTreeCapacity { nodes: 8, ids: 8 }, 1, 100.0);
        assert!(tree.insert(EntityId::new(0), &Aabb::from_xy(90.0, 90.0, 1.0)));
        assert_eq!(tree.node_count(), 1);
    }
}
