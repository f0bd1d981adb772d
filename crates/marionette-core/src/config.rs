use serde::{Deserialize, Serialize};

use crate::error::MarionetteResult;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub frame_rate: f64,
    pub num_frames: u32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            num_frames: 300,
        }
    }
}

/// How an angle channel interpolates between two keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleWrap {
    /// Interpolate the raw radian values, however far apart they are.
    #[default]
    Linear,
    /// Take the shorter rotational path between the two keyframe angles.
    Shortest,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub angle_wrap: AngleWrap,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String, // "error" | "warn" | "info" | "debug" | "trace"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MarionetteConfig {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MarionetteConfig {
    pub fn load_from_file(path: &std::path::Path) -> MarionetteResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> MarionetteResult<Self> {
        let config: MarionetteConfig = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> MarionetteResult<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = MarionetteConfig::from_toml("").unwrap();
        assert_eq!(config.timeline.num_frames, 300);
        assert!((config.timeline.frame_rate - 30.0).abs() < 1e-12);
        assert_eq!(config.channel.angle_wrap, AngleWrap::Linear);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_config() {
        let config = MarionetteConfig::from_toml(
            r#"
            [channel]
            angle_wrap = "shortest"

            [timeline]
            frame_rate = 24.0
            num_frames = 48
            "#,
        )
        .unwrap();
        assert_eq!(config.channel.angle_wrap, AngleWrap::Shortest);
        assert_eq!(config.timeline.num_frames, 48);
    }

    #[test]
    fn test_unknown_wrap_is_rejected() {
        let result = MarionetteConfig::from_toml("[channel]\nangle_wrap = \"spiral\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!(
            "marionette-config-{}.toml",
            std::process::id()
        ));
        let mut config = MarionetteConfig::default();
        config.logging.level = "debug".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = MarionetteConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.logging.level, "debug");
        std::fs::remove_file(&path).ok();
    }
}
