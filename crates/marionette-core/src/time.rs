use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{check_time, MarionetteResult};

/// A point on the animation timeline, in seconds from the start.
///
/// Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Timestamp {
    seconds: f64,
}

impl Timestamp {
    /// Create a timestamp, rejecting negative and non-finite values.
    pub fn new(seconds: f64) -> MarionetteResult<Self> {
        Ok(Self {
            seconds: check_time(seconds)?,
        })
    }

    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    /// Timestamp of the start of `frame` at `fps` frames per second.
    pub fn from_frame(frame: u64, fps: f64) -> MarionetteResult<Self> {
        Self::new(frame as f64 / fps)
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Convert to a frame index for a given FPS.
    pub fn to_frame(&self, fps: f64) -> u64 {
        // Nudge by a small epsilon so 1.0 / 30.0 * 30.0 lands on frame 1.
        (self.seconds * fps + 1e-9).floor() as u64
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Timestamp::zero()
    }
}

impl TryFrom<f64> for Timestamp {
    type Error = crate::error::MarionetteError;

    fn try_from(seconds: f64) -> MarionetteResult<Self> {
        Timestamp::new(seconds)
    }
}

impl From<Timestamp> for f64 {
    fn from(ts: Timestamp) -> f64 {
        ts.seconds
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = (self.seconds * 1000.0).round() as u64;
        let minutes = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let ms = total_ms % 1_000;
        write!(f, "{:02}:{:02}.{:03}", minutes, secs, ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_rejects_bad_values() {
        assert!(Timestamp::new(-1.0).is_err());
        assert!(Timestamp::new(f64::NAN).is_err());
        assert!(Timestamp::new(f64::INFINITY).is_err());
        assert!(Timestamp::new(0.0).is_ok());
    }

    #[test]
    fn test_timestamp_frames() {
        let ts = Timestamp::new(1.0).unwrap();
        assert_eq!(ts.to_frame(30.0), 30);

        let ts = Timestamp::from_frame(1, 30.0).unwrap();
        assert_eq!(ts.to_frame(30.0), 1);
        assert!((ts.as_seconds() - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_timestamp_display() {
        let ts = Timestamp::new(61.5).unwrap();
        assert_eq!(format!("{}", ts), "01:01.500");
    }

    #[test]
    fn test_timestamp_serde_validates() {
        let ts: Timestamp = serde_json::from_str("2.5").unwrap();
        assert!((ts.as_seconds() - 2.5).abs() < 1e-12);
        assert!(serde_json::from_str::<Timestamp>("-2.5").is_err());
    }
}
