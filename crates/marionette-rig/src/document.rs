//! Saved pictures.
//!
//! A [`PictureDocument`] is the serializable form of a [`Picture`]: the
//! timeline, then each actor with its drawables nested the way the tree is,
//! and every channel as an ordered list of `(time, value)` keyframes.
//!
//! Loading rebuilds the picture through the regular validated operations,
//! so a hand-edited file cannot produce an out-of-order channel, a negative
//! keyframe time or a draw order that misses a drawable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use marionette_core::{MarionetteError, MarionetteResult, Point2D};

use crate::actor::Actor;
use crate::channel::Keyframe;
use crate::drawable::DrawableNode;
use crate::picture::Picture;
use crate::shape::ShapeKind;
use crate::timeline::Timeline;
use crate::tree::{DrawableId, DrawableTree};

pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PictureDocument {
    pub version: u32,
    pub timeline: TimelineRecord,
    #[serde(default)]
    pub actors: Vec<ActorDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRecord {
    pub frame_rate: f64,
    pub num_frames: u32,
    #[serde(default)]
    pub current_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorDocument {
    pub name: String,
    #[serde(default)]
    pub position: Point2D,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub clickable: bool,
    #[serde(default)]
    pub position_keyframes: Vec<Keyframe<Point2D>>,
    #[serde(default)]
    pub drawables: Vec<DrawableRecord>,
    /// Indices into the depth-first listing of `drawables`. Empty means
    /// depth-first order.
    #[serde(default)]
    pub draw_order: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawableRecord {
    pub name: String,
    #[serde(default)]
    pub position: Point2D,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub shape: ShapeKind,
    #[serde(default)]
    pub keyframes: Vec<Keyframe<f64>>,
    #[serde(default)]
    pub children: Vec<DrawableRecord>,
}

fn default_true() -> bool {
    true
}

impl PictureDocument {
    pub fn from_picture(picture: &Picture) -> Self {
        let timeline = picture.timeline();
        Self {
            version: DOCUMENT_VERSION,
            timeline: TimelineRecord {
                frame_rate: timeline.frame_rate(),
                num_frames: timeline.num_frames(),
                current_time: timeline.current_time(),
            },
            actors: picture
                .actors()
                .map(|(_, actor)| ActorDocument::from_actor(actor))
                .collect(),
        }
    }

    /// Rebuild the picture and bring it up to date at the saved time.
    pub fn into_picture(self, mut picture: Picture) -> MarionetteResult<Picture> {
        if self.version > DOCUMENT_VERSION {
            return Err(MarionetteError::Validation(format!(
                "document version {} is newer than supported version {DOCUMENT_VERSION}",
                self.version
            )));
        }
        *picture.timeline_mut() =
            Timeline::new(self.timeline.frame_rate, self.timeline.num_frames)?;
        for actor in self.actors {
            picture.add_actor(actor.into_actor()?);
        }
        picture.set_time(self.timeline.current_time)?;
        Ok(picture)
    }

    pub fn to_json(&self) -> MarionetteResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> MarionetteResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to_file(&self, path: &Path) -> MarionetteResult<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), actors = self.actors.len(), "saved picture");
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> MarionetteResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let document = Self::from_json(&contents)?;
        tracing::info!(path = %path.display(), actors = document.actors.len(), "loaded picture");
        Ok(document)
    }
}

impl ActorDocument {
    pub fn from_actor(actor: &Actor) -> Self {
        let tree = actor.tree();
        let listing = tree.depth_first();
        let draw_order = actor
            .draw_order()
            .iter()
            .filter_map(|id| listing.iter().position(|l| l == id))
            .collect();

        Self {
            name: actor.name().to_string(),
            position: actor.position(),
            enabled: actor.is_enabled(),
            clickable: actor.is_clickable(),
            position_keyframes: actor.position_channel().keyframes().to_vec(),
            drawables: tree
                .roots()
                .iter()
                .map(|&root| DrawableRecord::from_tree(tree, root))
                .collect(),
            draw_order,
        }
    }

    pub fn into_actor(self) -> MarionetteResult<Actor> {
        let mut actor = Actor::new(self.name);
        actor.set_position(self.position)?;
        actor.set_enabled(self.enabled);
        actor.set_clickable(self.clickable);
        for key in self.position_keyframes {
            actor.position_channel_mut().add_keyframe(key.time, key.value)?;
        }

        let mut listing = Vec::new();
        for record in self.drawables {
            record.build(&mut actor, None, &mut listing)?;
        }

        if !self.draw_order.is_empty() {
            let order = self
                .draw_order
                .iter()
                .map(|&index| {
                    listing.get(index).copied().ok_or_else(|| {
                        MarionetteError::Validation(format!(
                            "draw order index {index} out of range for actor '{}'",
                            actor.name()
                        ))
                    })
                })
                .collect::<MarionetteResult<Vec<_>>>()?;
            actor.set_draw_order(order)?;
        } else {
            actor.set_draw_order(listing)?;
        }
        Ok(actor)
    }
}

impl DrawableRecord {
    fn from_tree(tree: &DrawableTree, id: DrawableId) -> Self {
        let node = &tree.nodes[id];
        Self {
            name: node.name().to_string(),
            position: node.position(),
            rotation: node.rotation(),
            start_time: node.start_time(),
            shape: node.shape().clone(),
            keyframes: node.angle_channel().keyframes().to_vec(),
            children: node
                .children()
                .iter()
                .map(|&child| DrawableRecord::from_tree(tree, child))
                .collect(),
        }
    }

    /// Add this record and its children to `actor`, appending the new
    /// handles to `listing` depth-first.
    fn build(
        self,
        actor: &mut Actor,
        parent: Option<DrawableId>,
        listing: &mut Vec<DrawableId>,
    ) -> MarionetteResult<()> {
        let mut node = DrawableNode::new(self.name, self.shape)
            .with_position(self.position.x, self.position.y)
            .with_rotation(self.rotation);
        node.set_start_time(self.start_time)?;
        for key in self.keyframes {
            node.angle_channel_mut().add_keyframe(key.time, key.value)?;
        }

        let id = match parent {
            Some(parent) => actor.add_child(parent, node)?,
            None => actor.add_root(node)?,
        };
        listing.push(id);

        for child in self.children {
            child.build(actor, Some(id), listing)?;
        }
        Ok(())
    }
}
