use marionette_core::config::TimelineConfig;
use marionette_core::{MarionetteError, MarionetteResult, Timestamp};

/// The animation timeline: a frame rate, a length in frames and a cursor.
///
/// The cursor may be seeked anywhere at or after zero, including past the
/// last frame; channels clamp to their last keyframe there.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    frame_rate: f64,
    num_frames: u32,
    current_time: Timestamp,
}

impl Timeline {
    pub fn new(frame_rate: f64, num_frames: u32) -> MarionetteResult<Self> {
        Ok(Self {
            frame_rate: check_frame_rate(frame_rate)?,
            num_frames,
            current_time: Timestamp::zero(),
        })
    }

    pub fn from_config(config: &TimelineConfig) -> MarionetteResult<Self> {
        Self::new(config.frame_rate, config.num_frames)
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn set_frame_rate(&mut self, frame_rate: f64) -> MarionetteResult<()> {
        self.frame_rate = check_frame_rate(frame_rate)?;
        Ok(())
    }

    pub fn num_frames(&self) -> u32 {
        self.num_frames
    }

    pub fn set_num_frames(&mut self, num_frames: u32) {
        self.num_frames = num_frames;
    }

    /// Length of the animation in seconds.
    pub fn duration(&self) -> f64 {
        f64::from(self.num_frames) / self.frame_rate
    }

    pub fn current_time(&self) -> f64 {
        self.current_time.as_seconds()
    }

    /// The cursor as a timestamp; displays as `mm:ss.mmm`.
    pub fn timestamp(&self) -> Timestamp {
        self.current_time
    }

    pub fn set_current_time(&mut self, time: f64) -> MarionetteResult<()> {
        self.current_time = Timestamp::new(time)?;
        Ok(())
    }

    pub fn current_frame(&self) -> u64 {
        self.current_time.to_frame(self.frame_rate)
    }

    pub fn set_frame(&mut self, frame: u64) -> MarionetteResult<()> {
        self.current_time = Timestamp::from_frame(frame, self.frame_rate)?;
        Ok(())
    }

    /// Start times of every frame, for scrubbing through the whole animation.
    pub fn frame_times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=u64::from(self.num_frames)).map(move |frame| frame as f64 / self.frame_rate)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        let config = TimelineConfig::default();
        Self {
            frame_rate: config.frame_rate,
            num_frames: config.num_frames,
            current_time: Timestamp::zero(),
        }
    }
}

fn check_frame_rate(frame_rate: f64) -> MarionetteResult<f64> {
    if frame_rate.is_finite() && frame_rate > 0.0 {
        Ok(frame_rate)
    } else {
        Err(MarionetteError::invalid_argument(format!(
            "frame rate must be positive, got {frame_rate}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeline() {
        let timeline = Timeline::default();
        assert_eq!(timeline.num_frames(), 300);
        assert!((timeline.duration() - 10.0).abs() < 1e-12);
        assert_eq!(timeline.current_time(), 0.0);
        assert_eq!(timeline.current_frame(), 0);
    }

    #[test]
    fn test_seek_by_frame_and_time() {
        let mut timeline = Timeline::new(24.0, 48).unwrap();
        timeline.set_frame(12).unwrap();
        assert!((timeline.current_time() - 0.5).abs() < 1e-12);
        assert_eq!(timeline.current_frame(), 12);

        timeline.set_current_time(1.75).unwrap();
        assert_eq!(timeline.current_frame(), 42);

        // Past the end is allowed.
        timeline.set_current_time(5.0).unwrap();
        assert_eq!(timeline.current_frame(), 120);
        assert_eq!(timeline.timestamp().to_string(), "00:05.000");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Timeline::new(0.0, 10).is_err());
        assert!(Timeline::new(f64::NAN, 10).is_err());

        let mut timeline = Timeline::default();
        timeline.set_current_time(2.0).unwrap();
        assert!(matches!(
            timeline.set_current_time(-1.0),
            Err(MarionetteError::InvalidTime(_))
        ));
        assert_eq!(timeline.current_time(), 2.0);
        assert!(timeline.set_frame_rate(-30.0).is_err());
    }

    #[test]
    fn test_frame_times() {
        let timeline = Timeline::new(2.0, 4).unwrap();
        let times: Vec<f64> = timeline.frame_times().collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }
}
