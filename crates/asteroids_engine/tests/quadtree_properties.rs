//! Property tests for the bounding boxes and the per-tick quadtree

use asteroids_engine::ecs::EntityId;
use asteroids_engine::foundation::math::Vec3;
use asteroids_engine::foundation::memory::{megabytes, Arena};
use asteroids_engine::spatial::{Aabb, QuadTree, QuadTreeCapacity, Quadrant};
use proptest::prelude::*;

const ROOT_HALF_EDGE: f32 = 1024.0;

fn arb_box() -> impl Strategy<Value = Aabb> {
    (-1100.0f32..1100.0, -1100.0f32..1100.0, 0.25f32..80.0)
        .prop_map(|(x, y, half_edge)| Aabb::from_xy(x, y, half_edge))
}

fn tree(max_depth: u32) -> (Arena, QuadTree) {
    let mut arena = Arena::create("QUADTREE", megabytes(2)).unwrap();
    let mut tree = QuadTree::new(&mut arena, QuadTreeCapacity { nodes: 8192, ids: 512 }).unwrap();
    tree.init(max_depth, ROOT_HALF_EDGE).unwrap();
    (arena, tree)
}

proptest! {
    #[test]
    fn containment_implies_corners_inside(a in arb_box(), b in arb_box()) {
        if a.contains_xy(&b) {
            for (x, y) in b.corners_xy() {
                prop_assert!(a.point_inside(&Vec3::new(x, y, 0.0)));
            }
        }
        prop_assert!(a.contains_xy(&a));
    }

    #[test]
    fn inserted_boxes_are_found_where_they_landed(
        boxes in prop::collection::vec(arb_box(), 1..200),
        max_depth in 1u32..12,
    ) {
        let (_arena, mut tree) = tree(max_depth);
        let root = *tree.node(tree.root().unwrap()).unwrap().bounds();

        let mut stored = 0;
        for (i, aabb) in boxes.iter().enumerate() {
            let id = EntityId::new(u32::try_from(i).unwrap());
            let inserted = tree.insert(id, aabb);
            prop_assert_eq!(inserted, root.contains_xy(aabb));
            stored += usize::from(inserted);
        }
        prop_assert_eq!(tree.id_count(), stored);

        for (i, aabb) in boxes.iter().enumerate() {
            let id = EntityId::new(u32::try_from(i).unwrap());
            match tree.query(aabb) {
                Some(node) => {
                    prop_assert!(tree.node(node).unwrap().bounds().contains_xy(aabb));
                    prop_assert!(tree.ids(node).any(|stored_id| stored_id == id));
                }
                None => prop_assert!(!root.contains_xy(aabb)),
            }
        }
    }

    #[test]
    fn children_tile_their_parent(
        boxes in prop::collection::vec(arb_box(), 1..200),
        max_depth in 1u32..12,
    ) {
        let (_arena, mut tree) = tree(max_depth);
        for (i, aabb) in boxes.iter().enumerate() {
            tree.insert(EntityId::new(u32::try_from(i).unwrap()), aabb);
        }

        for (_, node) in tree.nodes() {
            prop_assert!(node.depth() >= 1 && node.depth() <= max_depth);
            let parent = node.bounds();
            for (quadrant, child_index) in node.children() {
                let child = tree.node(child_index).unwrap();
                let (sx, sy) = quadrant.signs();
                prop_assert_eq!(child.depth(), node.depth() + 1);
                prop_assert_eq!(child.bounds().half_edge, parent.half_edge * 0.5);
                prop_assert_eq!(child.bounds().pos.x, parent.pos.x + sx * child.bounds().half_edge);
                prop_assert_eq!(child.bounds().pos.y, parent.pos.y + sy * child.bounds().half_edge);
                prop_assert!(parent.contains_xy(child.bounds()));
            }
        }
    }

    #[test]
    fn rebuild_leaves_an_empty_root(boxes in prop::collection::vec(arb_box(), 0..100)) {
        let (_arena, mut tree) = tree(10);
        for (i, aabb) in boxes.iter().enumerate() {
            tree.insert(EntityId::new(u32::try_from(i).unwrap()), aabb);
        }

        tree.finalize();
        let root = tree.init(10, ROOT_HALF_EDGE).unwrap();

        prop_assert_eq!(tree.node_count(), 1);
        prop_assert_eq!(tree.id_count(), 0);
        prop_assert!(tree.node(root).unwrap().is_leaf());
        prop_assert_eq!(tree.ids(root).count(), 0);
    }
}

#[test]
fn quadrants_partition_the_parent() {
    let parent = Aabb::from_xy(-32.0, 64.0, 16.0);
    let children: Vec<Aabb> = Quadrant::ALL.iter().map(|q| q.child_bounds(&parent)).collect();

    let area: f32 = children.iter().map(|c| (2.0 * c.half_edge).powi(2)).sum();
    assert_eq!(area, (2.0 * parent.half_edge).powi(2));

    for (i, a) in children.iter().enumerate() {
        assert!(parent.contains_xy(a));
        for b in &children[i + 1..] {
            // Neighbours share at most an edge
            let overlap_x = (a.max_x().min(b.max_x()) - a.min_x().max(b.min_x())).max(0.0);
            let overlap_y = (a.max_y().min(b.max_y()) - a.min_y().max(b.min_y())).max(0.0);
            assert_eq!(overlap_x * overlap_y, 0.0);
        }
    }
}
