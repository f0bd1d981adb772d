use slotmap::SlotMap;

use marionette_core::{AngleWrap, MarionetteConfig, MarionetteError, MarionetteResult, Point2D};

use crate::actor::{Actor, ActorId};
use crate::render::Canvas;
use crate::timeline::Timeline;
use crate::tree::DrawableId;

/// The whole animated scene: actors in draw order plus the timeline.
///
/// Moving the timeline cursor with [`Picture::set_time`] runs the per-frame
/// update: every channel is evaluated at the new time and every actor is
/// placed, so draw and hit-test calls afterwards see current transforms.
#[derive(Debug, Clone, Default)]
pub struct Picture {
    actors: SlotMap<ActorId, Actor>,
    order: Vec<ActorId>,
    timeline: Timeline,
    angle_wrap: AngleWrap,
}

impl Picture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &MarionetteConfig) -> MarionetteResult<Self> {
        Ok(Self {
            actors: SlotMap::with_key(),
            order: Vec::new(),
            timeline: Timeline::from_config(&config.timeline)?,
            angle_wrap: config.channel.angle_wrap,
        })
    }

    /// Take ownership of `actor` and wire its back-reference into every drawable.
    pub fn add_actor(&mut self, mut actor: Actor) -> ActorId {
        actor.tree_mut().set_angle_wrap(self.angle_wrap);
        let id = self.actors.insert_with_key(|id| {
            actor.set_id(Some(id));
            actor
        });
        self.order.push(id);
        tracing::debug!(actor = %self.actors[id].name(), "add actor");
        id
    }

    /// Remove an actor. The returned actor no longer refers to this picture.
    pub fn remove_actor(&mut self, id: ActorId) -> MarionetteResult<Actor> {
        let mut actor = self
            .actors
            .remove(id)
            .ok_or_else(|| MarionetteError::UnknownActor(format!("{id:?}")))?;
        self.order.retain(|&a| a != id);
        actor.set_id(None);
        Ok(actor)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    pub fn find_actor(&self, name: &str) -> Option<ActorId> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.actors[id].name() == name)
    }

    /// Actors in draw order.
    pub fn actors(&self) -> impl Iterator<Item = (ActorId, &Actor)> {
        self.order.iter().map(move |&id| (id, &self.actors[id]))
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    pub fn angle_wrap(&self) -> AngleWrap {
        self.angle_wrap
    }

    pub fn set_angle_wrap(&mut self, wrap: AngleWrap) {
        self.angle_wrap = wrap;
        for actor in self.actors.values_mut() {
            actor.tree_mut().set_angle_wrap(wrap);
        }
    }

    /// Move the timeline cursor and bring every actor up to date.
    pub fn set_time(&mut self, time: f64) -> MarionetteResult<()> {
        self.timeline.set_current_time(time)?;
        self.update();
        Ok(())
    }

    pub fn set_frame(&mut self, frame: u64) -> MarionetteResult<()> {
        self.timeline.set_frame(frame)?;
        self.update();
        Ok(())
    }

    /// Evaluate every channel at the current time, then place every actor.
    pub fn update(&mut self) {
        let time = self.timeline.current_time();
        for actor in self.actors.values_mut() {
            actor.get_keyframe(time);
            actor.place();
        }
    }

    /// Place every actor without touching the channels, e.g. after an edit.
    pub fn place(&mut self) {
        for actor in self.actors.values_mut() {
            actor.place();
        }
    }

    /// Capture every actor's current pose as keyframes at the current time.
    /// Nothing is keyed unless every actor can be.
    pub fn set_keyframes(&mut self) -> MarionetteResult<()> {
        let time = self.timeline.current_time();
        for actor in self.actors.values() {
            actor.check_keyframe(time)?;
        }
        for actor in self.actors.values_mut() {
            actor.set_keyframe(time)?;
        }
        tracing::debug!(time, "captured keyframes");
        Ok(())
    }

    /// Delete the keyframes at the current time, then re-evaluate the pose.
    pub fn delete_keyframes(&mut self) {
        let time = self.timeline.current_time();
        for actor in self.actors.values_mut() {
            actor.delete_keyframe(time);
        }
        self.update();
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let time = self.timeline.current_time();
        for (_, actor) in self.actors() {
            actor.draw(canvas, time);
        }
    }

    /// The topmost drawable under `point` across all actors.
    pub fn hit_test(&self, point: Point2D) -> Option<(ActorId, DrawableId)> {
        let time = self.timeline.current_time();
        self.order.iter().rev().find_map(|&id| {
            self.actors[id]
                .hit_test(point, time)
                .map(|drawable| (id, drawable))
        })
    }
}
