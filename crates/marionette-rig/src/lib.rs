//! # marionette-rig
//!
//! The skeletal animation model: actors built from trees of drawables, the
//! keyframe channels that animate them and the placement pass that turns
//! parent-relative transforms into absolute ones each frame.
//!
//! A [`Picture`] owns actors and a [`Timeline`]; seeking the timeline
//! evaluates every channel and places every actor, after which drawing and
//! hit testing read the placed transforms.

pub mod actor;
pub mod channel;
pub mod document;
pub mod drawable;
pub mod picture;
pub mod placement;
pub mod render;
pub mod shape;
pub mod timeline;
pub mod tree;
pub mod validate;

pub use actor::{Actor, ActorId};
pub use channel::{AngleChannel, Channel, Interpolate, Keyframe, PointChannel, Segment};
pub use document::{ActorDocument, DrawableRecord, PictureDocument};
pub use drawable::DrawableNode;
pub use picture::Picture;
pub use placement::Placement;
pub use render::{Canvas, DisplayList, DrawCommand};
pub use shape::{ImageShape, LineShape, PolygonShape, PropertyEditor, Shape, ShapeKind};
pub use timeline::Timeline;
pub use tree::{DrawableId, DrawableTree};
pub use validate::{validate_actor, validate_picture};
