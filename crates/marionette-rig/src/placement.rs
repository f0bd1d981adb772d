//! Placement pass.
//!
//! Converts every drawable's parent-relative position and rotation into an
//! absolute placed transform in one top-down traversal. For a node with
//! local position `p` and rotation `r`, given its parent's placed
//! `offset`/`rotate`:
//!
//! ```text
//! placed_position = offset + rotate(p, rotate)
//! placed_rotation = rotate + r
//! ```
//!
//! and its children are placed with the node's own placed transform.
//! The pass is pure given the local transforms; running it twice yields the
//! same result.

use serde::{Deserialize, Serialize};

use marionette_core::Point2D;

use crate::tree::{DrawableId, DrawableTree};

/// An absolute position and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub position: Point2D,
    /// Radians.
    pub rotation: f64,
}

impl Placement {
    pub fn new(position: Point2D, rotation: f64) -> Self {
        Self { position, rotation }
    }

    /// Compose a child's local transform onto this one.
    pub fn then(&self, local_position: Point2D, local_rotation: f64) -> Placement {
        Placement {
            position: self.position + local_position.rotate(self.rotation),
            rotation: self.rotation + local_rotation,
        }
    }

    /// Map a point from this placement's local frame to absolute coordinates.
    pub fn to_world(&self, local: Point2D) -> Point2D {
        self.position + local.rotate(self.rotation)
    }

    /// Map an absolute point into this placement's local frame.
    pub fn to_local(&self, world: Point2D) -> Point2D {
        (world - self.position).rotate(-self.rotation)
    }
}

/// Place `id` and its subtree given the parent's absolute `offset` and `rotate`.
pub fn place(tree: &mut DrawableTree, id: DrawableId, offset: Point2D, rotate: f64) {
    let Some(node) = tree.nodes.get_mut(id) else {
        return;
    };
    let placed = Placement::new(offset, rotate).then(node.position(), node.rotation());
    node.set_placement(placed);

    for i in 0..node.children.len() {
        let child = tree.nodes[id].children[i];
        place(tree, child, placed.position, placed.rotation);
    }
}

/// Place every root of the tree, in order, from the same parent transform.
pub fn place_roots(tree: &mut DrawableTree, offset: Point2D, rotate: f64) {
    for i in 0..tree.roots().len() {
        let root = tree.roots()[i];
        place(tree, root, offset, rotate);
    }
    tracing::trace!(drawables = tree.len(), "placement pass complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawable::DrawableNode;
    use crate::shape::ShapeKind;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn node(name: &str, x: f64, y: f64, rotation: f64) -> DrawableNode {
        DrawableNode::new(name, ShapeKind::Empty)
            .with_position(x, y)
            .with_rotation(rotation)
    }

    fn assert_point(actual: Point2D, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-9 && (actual.y - y).abs() < 1e-9,
            "expected ({x}, {y}), got ({}, {})",
            actual.x,
            actual.y
        );
    }

    #[test]
    fn test_three_level_chain() {
        let mut tree = DrawableTree::new();
        let r = tree.add_root(node("R", 0.0, 0.0, 0.0)).unwrap();
        let c = tree.add_child(r, node("C", 10.0, 0.0, 0.0)).unwrap();
        let g = tree.add_child(c, node("G", 5.0, 0.0, 0.0)).unwrap();

        place(&mut tree, r, Point2D::new(100.0, 100.0), 0.0);

        assert_point(tree.get(r).unwrap().placed_position(), 100.0, 100.0);
        assert_point(tree.get(c).unwrap().placed_position(), 110.0, 100.0);
        assert_point(tree.get(g).unwrap().placed_position(), 115.0, 100.0);
    }

    #[test]
    fn test_unrotated_positions_sum() {
        let mut tree = DrawableTree::new();
        let a = tree.add_root(node("a", 1.0, 2.0, 0.0)).unwrap();
        let b = tree.add_child(a, node("b", 3.0, -4.0, 0.0)).unwrap();
        let c = tree.add_child(b, node("c", -0.5, 7.0, 0.0)).unwrap();

        place_roots(&mut tree, Point2D::zero(), 0.0);
        assert_point(tree.get(c).unwrap().placed_position(), 3.5, 5.0);
    }

    #[test]
    fn test_rotation_composes_additively() {
        let mut tree = DrawableTree::new();
        let root = tree.add_root(node("root", 0.0, 0.0, 0.3)).unwrap();
        let child = tree.add_child(root, node("child", 10.0, 0.0, 0.9)).unwrap();

        place_roots(&mut tree, Point2D::zero(), 0.0);
        assert!((tree.get(child).unwrap().placed_rotation() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_parent_rotation_swings_child() {
        let mut tree = DrawableTree::new();
        let shoulder = tree.add_root(node("shoulder", 0.0, 0.0, FRAC_PI_2)).unwrap();
        let elbow = tree.add_child(shoulder, node("elbow", 10.0, 0.0, FRAC_PI_2)).unwrap();
        let wrist = tree.add_child(elbow, node("wrist", 10.0, 0.0, 0.0)).unwrap();

        place_roots(&mut tree, Point2D::new(50.0, 50.0), 0.0);

        assert_point(tree.get(elbow).unwrap().placed_position(), 50.0, 60.0);
        assert_point(tree.get(wrist).unwrap().placed_position(), 40.0, 60.0);
        assert!((tree.get(wrist).unwrap().placed_rotation() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_zero_rotate_is_plain_offset() {
        let placement = Placement::new(Point2D::new(3.0, 4.0), 0.0);
        assert_eq!(
            placement.then(Point2D::new(1.0, 1.0), 0.0).position,
            Point2D::new(4.0, 5.0)
        );
    }

    #[test]
    fn test_place_is_idempotent() {
        let mut tree = DrawableTree::new();
        let root = tree.add_root(node("root", 5.0, 5.0, 0.7)).unwrap();
        let child = tree.add_child(root, node("child", 12.0, -3.0, -1.1)).unwrap();

        place_roots(&mut tree, Point2D::new(1.0, 2.0), 0.25);
        let first = tree.get(child).unwrap().placement();
        place_roots(&mut tree, Point2D::new(1.0, 2.0), 0.25);
        assert_eq!(tree.get(child).unwrap().placement(), first);
    }

    #[test]
    fn test_to_local_inverts_to_world() {
        let placement = Placement::new(Point2D::new(-4.0, 9.0), 2.2);
        let p = Point2D::new(13.0, -6.5);
        let back = placement.to_local(placement.to_world(p));
        assert_point(back, 13.0, -6.5);
    }
}
