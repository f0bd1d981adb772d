use slotmap::new_key_type;

use marionette_core::error::check_time;
use marionette_core::{MarionetteError, MarionetteResult, Point2D};

use crate::channel::PointChannel;
use crate::drawable::DrawableNode;
use crate::render::Canvas;
use crate::tree::{DrawableId, DrawableTree};

new_key_type! {
    /// Handle to an actor inside a [`Picture`](crate::picture::Picture).
    pub struct ActorId;
}

/// A character or object made of drawables.
///
/// The actor owns its drawable tree. Draw order is the order drawables were
/// added and is independent of the tree shape, so an arm can be drawn behind
/// the torso it hangs from.
#[derive(Debug, Clone)]
pub struct Actor {
    name: String,
    id: Option<ActorId>,
    tree: DrawableTree,
    draw_order: Vec<DrawableId>,
    position: Point2D,
    channel: PointChannel,
    enabled: bool,
    clickable: bool,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            tree: DrawableTree::new(),
            draw_order: Vec::new(),
            position: Point2D::zero(),
            channel: PointChannel::new(),
            enabled: true,
            clickable: true,
        }
    }

    /// Builder: set the actor position.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Point2D::new(x, y);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle assigned when the actor was added to a picture.
    pub fn id(&self) -> Option<ActorId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Option<ActorId>) {
        self.id = id;
        self.tree.set_actor(id);
    }

    /// Absolute position the root drawables are placed from.
    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn set_position(&mut self, position: Point2D) -> MarionetteResult<()> {
        if !position.is_finite() {
            return Err(MarionetteError::invalid_argument(format!(
                "actor '{}' position must be finite, got ({}, {})",
                self.name, position.x, position.y
            )));
        }
        self.position = position;
        Ok(())
    }

    pub fn position_channel(&self) -> &PointChannel {
        &self.channel
    }

    pub fn position_channel_mut(&mut self) -> &mut PointChannel {
        &mut self.channel
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_clickable(&self) -> bool {
        self.clickable
    }

    pub fn set_clickable(&mut self, clickable: bool) {
        self.clickable = clickable;
    }

    pub fn tree(&self) -> &DrawableTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut DrawableTree {
        &mut self.tree
    }

    pub fn drawable(&self, id: DrawableId) -> Option<&DrawableNode> {
        self.tree.get(id)
    }

    pub fn drawable_mut(&mut self, id: DrawableId) -> Option<&mut DrawableNode> {
        self.tree.get_mut(id)
    }

    pub fn find(&self, name: &str) -> Option<DrawableId> {
        self.tree.find(name)
    }

    pub fn draw_order(&self) -> &[DrawableId] {
        &self.draw_order
    }

    /// Replace the draw order. `order` must list every drawable exactly once.
    pub fn set_draw_order(&mut self, order: Vec<DrawableId>) -> MarionetteResult<()> {
        let mut seen = std::collections::HashSet::new();
        let complete = order.len() == self.tree.len()
            && order
                .iter()
                .all(|&id| self.tree.contains(id) && seen.insert(id));
        if !complete {
            return Err(MarionetteError::invalid_argument(format!(
                "draw order for actor '{}' must list each of its {} drawables once",
                self.name,
                self.tree.len()
            )));
        }
        self.draw_order = order;
        Ok(())
    }

    pub fn add_root(&mut self, node: DrawableNode) -> MarionetteResult<DrawableId> {
        let id = self.tree.add_root(node)?;
        self.draw_order.push(id);
        Ok(id)
    }

    pub fn add_child(
        &mut self,
        parent: DrawableId,
        node: DrawableNode,
    ) -> MarionetteResult<DrawableId> {
        let id = self.tree.add_child(parent, node)?;
        self.draw_order.push(id);
        Ok(id)
    }

    pub fn attach(&mut self, parent: DrawableId, child: DrawableId) -> MarionetteResult<()> {
        self.tree.attach(parent, child)
    }

    /// Destroy a drawable and everything below it.
    pub fn remove(&mut self, id: DrawableId) -> MarionetteResult<Vec<DrawableId>> {
        let removed = self.tree.remove(id)?;
        self.draw_order.retain(|d| self.tree.contains(*d));
        Ok(removed)
    }

    /// Drag a movable drawable by a screen-space delta.
    pub fn drag(&mut self, id: DrawableId, screen_delta: Point2D) -> MarionetteResult<()> {
        match self.tree.get(id) {
            Some(node) if node.is_movable() => self.tree.drag(id, screen_delta),
            Some(node) => Err(MarionetteError::invalid_argument(format!(
                "drawable '{}' is not movable",
                node.name()
            ))),
            None => Err(MarionetteError::invalid_child(format!(
                "cannot drag {id:?}: unknown drawable"
            ))),
        }
    }

    /// Run the placement pass from the actor position with no rotation.
    pub fn place(&mut self) {
        self.tree.place(self.position, 0.0);
    }

    /// Record the actor position and every drawable rotation at `time`.
    /// On error no channel has been touched.
    pub fn set_keyframe(&mut self, time: f64) -> MarionetteResult<()> {
        self.check_keyframe(time)?;
        self.channel.add_keyframe(time, self.position)?;
        for node in self.tree.nodes.values_mut() {
            node.set_keyframe(time)?;
        }
        Ok(())
    }

    /// Check that [`Actor::set_keyframe`] at `time` would succeed.
    pub(crate) fn check_keyframe(&self, time: f64) -> MarionetteResult<()> {
        check_time(time)?;
        if !self.position.is_finite() {
            return Err(MarionetteError::invalid_argument(format!(
                "actor '{}' has a non-finite position",
                self.name
            )));
        }
        self.tree.nodes.values().try_for_each(DrawableNode::check_transform)
    }

    /// Refresh the actor position and drawable rotations from their channels.
    pub fn get_keyframe(&mut self, time: f64) {
        if let Some(position) = self.channel.evaluate(time) {
            self.position = position;
        }
        for node in self.tree.nodes.values_mut() {
            node.get_keyframe(time);
        }
    }

    /// Remove the keyframes at exactly `time` from every channel.
    pub fn delete_keyframe(&mut self, time: f64) {
        self.channel.remove_keyframe(time);
        for node in self.tree.nodes.values_mut() {
            node.delete_keyframe(time);
        }
    }

    /// Draw the drawables visible at `time`, in draw order.
    pub fn draw(&self, canvas: &mut dyn Canvas, time: f64) {
        if !self.enabled {
            return;
        }
        for node in self.draw_order.iter().filter_map(|&id| self.tree.get(id)) {
            if node.is_visible_at(time) {
                node.draw(canvas);
            }
        }
    }

    /// The topmost visible drawable under `point`, if the actor takes clicks.
    pub fn hit_test(&self, point: Point2D, time: f64) -> Option<DrawableId> {
        if !self.enabled || !self.clickable {
            return None;
        }
        self.draw_order.iter().rev().copied().find(|&id| {
            self.tree.get(id).is_some_and(|node| {
                if !node.is_placed() {
                    tracing::debug!(drawable = %node.name(), "hit test before placement");
                }
                node.is_visible_at(time) && node.hit_test(point)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DisplayList;
    use crate::shape::{ImageShape, PolygonShape, ShapeKind};
    use marionette_core::{Color, Size2D};

    fn square(name: &str, x: f64, y: f64) -> DrawableNode {
        DrawableNode::new(
            name,
            PolygonShape::rectangle(Point2D::new(-5.0, -5.0), Size2D::new(10.0, 10.0), Color::RED),
        )
        .with_position(x, y)
    }

    #[test]
    fn test_draw_order_follows_insertion() {
        let mut actor = Actor::new("sparty");
        let torso = actor.add_root(square("torso", 0.0, 0.0)).unwrap();
        let arm = actor.add_child(torso, square("arm", 20.0, 0.0)).unwrap();
        assert_eq!(actor.draw_order(), &[torso, arm]);

        actor.set_draw_order(vec![arm, torso]).unwrap();
        assert_eq!(actor.draw_order(), &[arm, torso]);
        assert!(actor.set_draw_order(vec![arm]).is_err());
        assert!(actor.set_draw_order(vec![arm, arm]).is_err());
    }

    #[test]
    fn test_remove_prunes_draw_order() {
        let mut actor = Actor::new("sparty");
        let torso = actor.add_root(square("torso", 0.0, 0.0)).unwrap();
        let arm = actor.add_child(torso, square("arm", 20.0, 0.0)).unwrap();
        actor.add_child(arm, square("hand", 10.0, 0.0)).unwrap();

        actor.remove(arm).unwrap();
        assert_eq!(actor.draw_order(), &[torso]);
        assert_eq!(actor.tree().len(), 1);
    }

    #[test]
    fn test_place_uses_actor_position() {
        let mut actor = Actor::new("sparty").with_position(100.0, 200.0);
        let torso = actor.add_root(square("torso", 0.0, 0.0)).unwrap();
        let arm = actor.add_child(torso, square("arm", 20.0, 0.0)).unwrap();
        actor.place();
        assert_eq!(
            actor.drawable(arm).unwrap().placed_position(),
            Point2D::new(120.0, 200.0)
        );
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut actor = Actor::new("sparty");
        let torso = actor.add_root(square("torso", 0.0, 0.0)).unwrap();
        let patch = actor.add_child(torso, square("patch", 2.0, 0.0)).unwrap();
        actor.place();

        assert_eq!(actor.hit_test(Point2D::new(4.0, 0.0), 0.0), Some(patch));
        assert_eq!(actor.hit_test(Point2D::new(-4.0, 0.0), 0.0), Some(torso));
        assert_eq!(actor.hit_test(Point2D::new(40.0, 0.0), 0.0), None);

        actor.set_clickable(false);
        assert_eq!(actor.hit_test(Point2D::new(4.0, 0.0), 0.0), None);
    }

    #[test]
    fn test_start_time_hides_drawable() {
        let mut actor = Actor::new("sparty");
        let torso = actor.add_root(square("torso", 0.0, 0.0)).unwrap();
        let hat = actor.add_child(torso, square("hat", 0.0, -10.0)).unwrap();
        actor.drawable_mut(hat).unwrap().set_start_time(2.0).unwrap();
        actor.place();

        let mut early = DisplayList::new();
        actor.draw(&mut early, 1.0);
        assert_eq!(early.len(), 1);

        let mut late = DisplayList::new();
        actor.draw(&mut late, 2.0);
        assert_eq!(late.len(), 2);

        assert_eq!(actor.hit_test(Point2D::new(0.0, -10.0), 1.0), None);
        assert_eq!(actor.hit_test(Point2D::new(0.0, -10.0), 2.0), Some(hat));
    }

    #[test]
    fn test_disabled_actor_draws_nothing() {
        let mut actor = Actor::new("sparty");
        actor.add_root(square("torso", 0.0, 0.0)).unwrap();
        actor.place();
        actor.set_enabled(false);
        let mut list = DisplayList::new();
        actor.draw(&mut list, 0.0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_keyframes_drive_position_and_rotation() {
        let mut actor = Actor::new("sparty");
        let torso = actor.add_root(DrawableNode::new("torso", ShapeKind::Empty)).unwrap();

        actor.set_keyframe(0.0).unwrap();
        actor.set_position(Point2D::new(100.0, 0.0)).unwrap();
        actor.drawable_mut(torso).unwrap().set_rotation(1.0).unwrap();
        actor.set_keyframe(1.0).unwrap();

        actor.get_keyframe(0.5);
        assert_eq!(actor.position(), Point2D::new(50.0, 0.0));
        assert!((actor.drawable(torso).unwrap().rotation() - 0.5).abs() < 1e-12);

        actor.delete_keyframe(1.0);
        actor.get_keyframe(0.5);
        assert_eq!(actor.position(), Point2D::zero());
        assert_eq!(actor.drawable(torso).unwrap().rotation(), 0.0);
    }

    #[test]
    fn test_failed_keyframe_leaves_channels_alone() {
        let mut actor = Actor::new("sparty").with_position(f64::NAN, 0.0);
        let torso = actor.add_root(DrawableNode::new("torso", ShapeKind::Empty)).unwrap();

        assert!(actor.set_keyframe(1.0).is_err());
        assert!(!actor.position_channel().has_keyframes());
        assert!(!actor.drawable(torso).unwrap().angle_channel().has_keyframes());

        assert!(actor.set_position(Point2D::new(f64::INFINITY, 0.0)).is_err());
        actor.set_position(Point2D::new(1.0, 2.0)).unwrap();
        assert!(actor.set_keyframe(-1.0).is_err());
        assert!(!actor.position_channel().has_keyframes());
        actor.set_keyframe(1.0).unwrap();
        assert_eq!(actor.drawable(torso).unwrap().angle_channel().len(), 1);
    }

    #[test]
    fn test_drag_requires_movable() {
        let mut actor = Actor::new("sparty");
        let torso = actor.add_root(square("torso", 0.0, 0.0)).unwrap();
        let head = actor
            .add_child(
                torso,
                DrawableNode::new(
                    "head",
                    ImageShape::new("head.png", Size2D::new(10.0, 10.0), Point2D::new(5.0, 10.0))
                        .movable(),
                ),
            )
            .unwrap();
        actor.place();

        assert!(actor.drag(torso, Point2D::new(1.0, 0.0)).is_err());
        actor.drag(head, Point2D::new(3.0, 4.0)).unwrap();
        assert_eq!(actor.drawable(head).unwrap().position(), Point2D::new(3.0, 4.0));
    }
}
