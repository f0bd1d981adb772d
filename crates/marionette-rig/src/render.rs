use serde::{Deserialize, Serialize};

use marionette_core::{Color, Point2D, Size2D};

/// Drawing surface handed to drawables. Coordinates are absolute (placed).
pub trait Canvas {
    fn fill_polygon(&mut self, points: &[Point2D], color: Color);

    fn stroke_line(&mut self, from: Point2D, to: Point2D, width: f64, color: Color);

    /// Draw an image whose top-left corner sits at `origin`, rotated by
    /// `rotation` radians about that corner.
    fn draw_image(&mut self, asset: &str, origin: Point2D, rotation: f64, size: Size2D);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillPolygon {
        points: Vec<Point2D>,
        color: Color,
    },
    StrokeLine {
        from: Point2D,
        to: Point2D,
        width: f64,
        color: Color,
    },
    DrawImage {
        asset: String,
        origin: Point2D,
        rotation: f64,
        size: Size2D,
    },
}

/// A [`Canvas`] that records commands instead of rasterizing them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayList {
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Canvas for DisplayList {
    fn fill_polygon(&mut self, points: &[Point2D], color: Color) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_line(&mut self, from: Point2D, to: Point2D, width: f64, color: Color) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }

    fn draw_image(&mut self, asset: &str, origin: Point2D, rotation: f64, size: Size2D) {
        self.commands.push(DrawCommand::DrawImage {
            asset: asset.to_string(),
            origin,
            rotation,
            size,
        });
    }
}
