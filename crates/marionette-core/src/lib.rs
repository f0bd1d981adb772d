//! # marionette-core
//!
//! Core types and primitives for the Marionette 2D animation editor.
//! This crate contains foundational types shared across all Marionette crates:
//! points and rotation math, colors, timestamps, configuration and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod math;
pub mod time;

pub use color::Color;
pub use config::{AngleWrap, MarionetteConfig};
pub use error::{MarionetteError, MarionetteResult};
pub use math::{Point2D, Size2D};
pub use time::Timestamp;
