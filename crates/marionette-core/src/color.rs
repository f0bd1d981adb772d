use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MarionetteError, MarionetteResult};

/// 8-bit RGBA color used for drawable fills and strokes.
///
/// Serialized as a hex string, e.g. `"#FF8800"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> MarionetteResult<Self> {
        let hex = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| MarionetteError::invalid_argument(format!("invalid hex color '{hex}'")))
        };
        match hex.len() {
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(MarionetteError::invalid_argument(format!(
                "invalid hex color '{hex}'"
            ))),
        }
    }

    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = MarionetteError;

    fn try_from(hex: String) -> MarionetteResult<Self> {
        Self::from_hex(&hex)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex_rgb() {
        let c = Color::from_hex("#FF8800").unwrap();
        assert_eq!(c, Color::rgb(255, 136, 0));
    }

    #[test]
    fn test_color_from_hex_rgba() {
        let c = Color::from_hex("FF880080").unwrap();
        assert_eq!(c, Color::rgba(255, 136, 0, 128));
    }

    #[test]
    fn test_color_from_hex_invalid() {
        assert!(Color::from_hex("invalid").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_color_display_round_trips() {
        assert_eq!(Color::RED.to_string(), "#FF0000");
        let translucent = Color::rgba(16, 32, 48, 127);
        assert_eq!(Color::from_hex(&translucent.to_string()).unwrap(), translucent);
    }

    #[test]
    fn test_color_serializes_as_hex() {
        let json = serde_json::to_string(&Color::rgba(255, 136, 0, 128)).unwrap();
        assert_eq!(json, "\"#FF880080\"");
        let c: Color = serde_json::from_str("\"#0000FF\"").unwrap();
        assert_eq!(c, Color::BLUE);
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }
}
