//! Keyframe channels.
//!
//! A [`Channel`] stores `(time, value)` keyframes sorted by time with at most
//! one keyframe per exact time. Queries locate the bracketing pair with a
//! binary search and interpolate linearly, clamping to the first keyframe
//! before it and to the last keyframe after it.
//!
//! [`AngleChannel`] drives a drawable's rotation; [`PointChannel`] drives an
//! actor's position.

use serde::{Deserialize, Serialize};

use marionette_core::error::check_time;
use marionette_core::math::shortest_arc;
use marionette_core::{AngleWrap, MarionetteError, MarionetteResult, Point2D};

/// A value a channel can interpolate.
pub trait Interpolate: Copy {
    fn interpolate(start: Self, end: Self, t: f64) -> Self;

    /// Whether the value is usable as keyframe data (no NaN or infinity).
    fn is_valid(&self) -> bool;
}

impl Interpolate for f64 {
    fn interpolate(start: Self, end: Self, t: f64) -> Self {
        start + (end - start) * t
    }

    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

impl Interpolate for Point2D {
    fn interpolate(start: Self, end: Self, t: f64) -> Self {
        start.lerp(&end, t)
    }

    fn is_valid(&self) -> bool {
        self.is_finite()
    }
}

/// A value at a specific time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<V> {
    /// Seconds from the start of the timeline.
    pub time: f64,
    pub value: V,
}

impl<V> Keyframe<V> {
    pub fn new(time: f64, value: V) -> Self {
        Self { time, value }
    }
}

/// Where a query time falls relative to a channel's keyframes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment<V> {
    /// Before the first keyframe, after the last one, or on a single keyframe.
    Hold(V),
    /// Between two keyframes; `t` is the normalized position in `[0, 1)`.
    Between {
        from: Keyframe<V>,
        to: Keyframe<V>,
        t: f64,
    },
}

/// Sorted keyframe storage with linear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel<V> {
    keyframes: Vec<Keyframe<V>>,
}

impl<V> Default for Channel<V> {
    fn default() -> Self {
        Self {
            keyframes: Vec::new(),
        }
    }
}

impl<V: Interpolate> Channel<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a keyframe, replacing the value of any keyframe at exactly `time`.
    pub fn add_keyframe(&mut self, time: f64, value: V) -> MarionetteResult<()> {
        let time = check_time(time)?;
        if !value.is_valid() {
            return Err(MarionetteError::invalid_argument(format!(
                "keyframe value at {time}s is not finite"
            )));
        }

        match self.search(time) {
            Ok(index) => self.keyframes[index].value = value,
            Err(index) => self.keyframes.insert(index, Keyframe::new(time, value)),
        }
        Ok(())
    }

    /// Remove the keyframe at exactly `time`, returning its value if there was one.
    pub fn remove_keyframe(&mut self, time: f64) -> Option<V> {
        let index = self.search(time).ok()?;
        Some(self.keyframes.remove(index).value)
    }

    /// The value of the keyframe at exactly `time`.
    pub fn keyframe_at(&self, time: f64) -> Option<V> {
        self.search(time)
            .ok()
            .map(|index| self.keyframes[index].value)
    }

    pub fn has_keyframes(&self) -> bool {
        !self.keyframes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn keyframes(&self) -> &[Keyframe<V>] {
        &self.keyframes
    }

    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Exact-time lookup. Both zeros match the same keyframe.
    fn search(&self, time: f64) -> Result<usize, usize> {
        let time = time + 0.0;
        self.keyframes
            .binary_search_by(|k| k.time.total_cmp(&time))
    }

    /// Times of the first and last keyframes.
    pub fn span(&self) -> Option<(f64, f64)> {
        Some((self.keyframes.first()?.time, self.keyframes.last()?.time))
    }

    /// Locate `time` among the keyframes. `None` only when the channel is empty.
    pub fn segment(&self, time: f64) -> Option<Segment<V>> {
        let first = self.keyframes.first()?;
        let last = self.keyframes[self.keyframes.len() - 1];

        // NaN compares false against everything; treat it as "before the start".
        if time.is_nan() || time <= first.time {
            return Some(Segment::Hold(first.value));
        }
        if time >= last.time {
            return Some(Segment::Hold(last.value));
        }

        // First keyframe strictly after `time`. The clamps above guarantee
        // 0 < next < len.
        let next = self.keyframes.partition_point(|k| k.time <= time);
        let from = self.keyframes[next - 1];
        let to = self.keyframes[next];
        let t = (time - from.time) / (to.time - from.time);
        Some(Segment::Between { from, to, t })
    }

    /// Interpolated value at `time`, or `None` if there are no keyframes.
    pub fn evaluate(&self, time: f64) -> Option<V> {
        match self.segment(time)? {
            Segment::Hold(value) => Some(value),
            Segment::Between { from, to, t } => Some(V::interpolate(from.value, to.value, t)),
        }
    }
}

/// Channel animating an actor's position.
pub type PointChannel = Channel<Point2D>;

/// Channel animating a drawable's rotation, in radians.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AngleChannel {
    keys: Channel<f64>,
    wrap: AngleWrap,
}

impl AngleChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wrap(wrap: AngleWrap) -> Self {
        Self {
            keys: Channel::new(),
            wrap,
        }
    }

    pub fn wrap(&self) -> AngleWrap {
        self.wrap
    }

    pub fn set_wrap(&mut self, wrap: AngleWrap) {
        self.wrap = wrap;
    }

    pub fn add_keyframe(&mut self, time: f64, angle: f64) -> MarionetteResult<()> {
        self.keys.add_keyframe(time, angle)
    }

    pub fn remove_keyframe(&mut self, time: f64) -> Option<f64> {
        self.keys.remove_keyframe(time)
    }

    pub fn keyframe_at(&self, time: f64) -> Option<f64> {
        self.keys.keyframe_at(time)
    }

    pub fn has_keyframes(&self) -> bool {
        self.keys.has_keyframes()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keyframes(&self) -> &[Keyframe<f64>] {
        self.keys.keyframes()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn span(&self) -> Option<(f64, f64)> {
        self.keys.span()
    }

    /// Angle at `time`. Returns 0 when the channel has no keyframes.
    pub fn evaluate(&self, time: f64) -> f64 {
        match self.keys.segment(time) {
            None => 0.0,
            Some(Segment::Hold(angle)) => angle,
            Some(Segment::Between { from, to, t }) => match self.wrap {
                AngleWrap::Linear => f64::interpolate(from.value, to.value, t),
                AngleWrap::Shortest => from.value + shortest_arc(from.value, to.value) * t,
            },
        }
    }
}
