use marionette_core::error::check_time;
use marionette_core::{MarionetteError, MarionetteResult, Point2D};

use crate::actor::ActorId;
use crate::channel::AngleChannel;
use crate::placement::Placement;
use crate::render::Canvas;
use crate::shape::{PropertyEditor, Shape, ShapeKind};
use crate::tree::DrawableId;

/// One articulated part of an actor.
///
/// The local `position` and `rotation` are relative to the parent drawable.
/// The placed transform is absolute and is written by the placement pass; it
/// reads as zero until the first pass has run (see [`DrawableNode::is_placed`]).
///
/// Nodes live in a [`DrawableTree`](crate::tree::DrawableTree), which owns
/// them. `parent` and `actor` are plain handles and never keep anything alive.
#[derive(Debug, Clone)]
pub struct DrawableNode {
    name: String,
    position: Point2D,
    rotation: f64,
    placed: Placement,
    is_placed: bool,
    start_time: f64,
    channel: AngleChannel,
    shape: ShapeKind,

    pub(crate) parent: Option<DrawableId>,
    pub(crate) children: Vec<DrawableId>,
    pub(crate) actor: Option<ActorId>,
}

impl DrawableNode {
    /// Create a detached drawable at the parent's origin with no rotation.
    pub fn new(name: impl Into<String>, shape: impl Into<ShapeKind>) -> Self {
        Self {
            name: name.into(),
            position: Point2D::zero(),
            rotation: 0.0,
            placed: Placement::default(),
            is_placed: false,
            start_time: 0.0,
            channel: AngleChannel::new(),
            shape: shape.into(),
            parent: None,
            children: Vec::new(),
            actor: None,
        }
    }

    /// Builder: set the local position.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Point2D::new(x, y);
        self
    }

    /// Builder: set the local rotation in radians.
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn set_position(&mut self, position: Point2D) -> MarionetteResult<()> {
        self.position = self.finite_position(position)?;
        Ok(())
    }

    /// Translate the local position. Children follow on the next placement
    /// pass because they are expressed relative to this node.
    pub fn move_by(&mut self, delta: Point2D) -> MarionetteResult<()> {
        self.position = self.finite_position(self.position + delta)?;
        Ok(())
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f64) -> MarionetteResult<()> {
        if !rotation.is_finite() {
            return Err(MarionetteError::invalid_argument(format!(
                "drawable '{}' rotation must be finite, got {rotation}",
                self.name
            )));
        }
        self.rotation = rotation;
        Ok(())
    }

    fn finite_position(&self, position: Point2D) -> MarionetteResult<Point2D> {
        if position.is_finite() {
            Ok(position)
        } else {
            Err(MarionetteError::invalid_argument(format!(
                "drawable '{}' position must be finite, got ({}, {})",
                self.name, position.x, position.y
            )))
        }
    }

    pub fn placement(&self) -> Placement {
        self.placed
    }

    pub fn placed_position(&self) -> Point2D {
        self.placed.position
    }

    pub fn placed_rotation(&self) -> f64 {
        self.placed.rotation
    }

    /// Whether a placement pass has reached this node since it was created.
    pub fn is_placed(&self) -> bool {
        self.is_placed
    }

    pub(crate) fn set_placement(&mut self, placement: Placement) {
        self.placed = placement;
        self.is_placed = true;
    }

    pub fn parent(&self) -> Option<DrawableId> {
        self.parent
    }

    /// Overwrite the parent handle. This does not touch any child list;
    /// prefer [`DrawableTree::attach`](crate::tree::DrawableTree::attach),
    /// which keeps both directions in sync.
    pub fn set_parent(&mut self, parent: Option<DrawableId>) {
        self.parent = parent;
    }

    /// Children in insertion order, which is also their placement order.
    pub fn children(&self) -> &[DrawableId] {
        &self.children
    }

    /// The actor this drawable belongs to, if it has been added to one.
    pub fn actor(&self) -> Option<ActorId> {
        self.actor
    }

    pub fn angle_channel(&self) -> &AngleChannel {
        &self.channel
    }

    pub fn angle_channel_mut(&mut self) -> &mut AngleChannel {
        &mut self.channel
    }

    /// Record the current rotation as a keyframe at `time`.
    pub fn set_keyframe(&mut self, time: f64) -> MarionetteResult<()> {
        self.channel.add_keyframe(time, self.rotation)?;
        tracing::debug!(drawable = %self.name, time, angle = self.rotation, "set keyframe");
        Ok(())
    }

    /// Refresh the rotation from the channel at `time`. A drawable with no
    /// keyframes keeps its current rotation.
    pub fn get_keyframe(&mut self, time: f64) {
        if self.channel.has_keyframes() {
            self.rotation = self.channel.evaluate(time);
        }
    }

    /// Remove the keyframe at exactly `time`, if any.
    pub fn delete_keyframe(&mut self, time: f64) -> bool {
        self.channel.remove_keyframe(time).is_some()
    }

    /// Time from which this drawable is shown. Defaults to 0 (always shown).
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn set_start_time(&mut self, time: f64) -> MarionetteResult<()> {
        self.start_time = check_time(time)?;
        Ok(())
    }

    /// Whether the drawable is shown at `time`.
    pub fn is_visible_at(&self, time: f64) -> bool {
        time >= self.start_time
    }

    pub fn shape(&self) -> &ShapeKind {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut ShapeKind {
        &mut self.shape
    }

    pub fn is_movable(&self) -> bool {
        self.shape.is_movable()
    }

    /// Draw at the last placed transform.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.shape.draw(canvas, &self.placed);
    }

    /// Test an absolute point against the last placed transform.
    pub fn hit_test(&self, point: Point2D) -> bool {
        self.shape.hit_test(&self.placed, point)
    }

    /// Let the UI edit the name, then whatever the shape kind exposes.
    pub fn edit_properties(&mut self, editor: &mut dyn PropertyEditor) {
        editor.edit_text("name", &mut self.name);
        self.shape.edit_properties(editor);
    }

    /// Check that the local transform is usable by the placement pass.
    pub(crate) fn check_transform(&self) -> MarionetteResult<()> {
        if !self.position.is_finite() || !self.rotation.is_finite() {
            return Err(MarionetteError::invalid_argument(format!(
                "drawable '{}' has a non-finite transform",
                self.name
            )));
        }
        Ok(())
    }
}
