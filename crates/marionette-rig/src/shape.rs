//! Concrete drawable kinds.
//!
//! Every kind implements [`Shape`]; [`ShapeKind`] is the closed set a
//! drawable can hold and forwards to the variant.

use serde::{Deserialize, Serialize};

use marionette_core::{Color, Point2D, Size2D};

use crate::placement::Placement;
use crate::render::Canvas;

/// Property-editing surface supplied by the UI layer.
///
/// Each method presents one field; it returns `true` if the user changed it.
pub trait PropertyEditor {
    fn edit_color(&mut self, label: &str, value: &mut Color) -> bool;

    fn edit_text(&mut self, label: &str, value: &mut String) -> bool;

    fn edit_number(&mut self, label: &str, value: &mut f64) -> bool;
}

/// Behavior shared by every drawable kind.
pub trait Shape {
    /// Draw at the given placed transform.
    fn draw(&self, canvas: &mut dyn Canvas, placement: &Placement);

    /// Whether the absolute `point` lies on the shape at the given placement.
    fn hit_test(&self, placement: &Placement, point: Point2D) -> bool;

    /// Whether the user may drag this drawable directly.
    fn is_movable(&self) -> bool {
        false
    }

    /// Present the kind's own properties for editing. Kinds with nothing to
    /// edit keep the default.
    fn edit_properties(&mut self, _editor: &mut dyn PropertyEditor) {}
}

/// A filled polygon with vertices relative to the drawable's pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonShape {
    pub points: Vec<Point2D>,
    pub color: Color,
}

impl PolygonShape {
    pub fn new(points: Vec<Point2D>, color: Color) -> Self {
        Self { points, color }
    }

    /// Axis-aligned rectangle with its top-left corner at `origin`.
    pub fn rectangle(origin: Point2D, size: Size2D, color: Color) -> Self {
        let Point2D { x, y } = origin;
        Self::new(
            vec![
                Point2D::new(x, y),
                Point2D::new(x + size.width, y),
                Point2D::new(x + size.width, y + size.height),
                Point2D::new(x, y + size.height),
            ],
            color,
        )
    }
}

impl Shape for PolygonShape {
    fn draw(&self, canvas: &mut dyn Canvas, placement: &Placement) {
        if self.points.len() < 3 {
            return;
        }
        let world: Vec<Point2D> = self
            .points
            .iter()
            .map(|p| placement.to_world(*p))
            .collect();
        canvas.fill_polygon(&world, self.color);
    }

    fn hit_test(&self, placement: &Placement, point: Point2D) -> bool {
        self.points.len() >= 3 && contains_point(&self.points, placement.to_local(point))
    }

    fn edit_properties(&mut self, editor: &mut dyn PropertyEditor) {
        editor.edit_color("Color", &mut self.color);
    }
}

/// Even-odd ray cast.
fn contains_point(polygon: &[Point2D], p: Point2D) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// An image drawn so that its `pivot` pixel sits on the drawable's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageShape {
    pub asset: String,
    pub size: Size2D,
    pub pivot: Point2D,
    #[serde(default)]
    pub movable: bool,
}

impl ImageShape {
    pub fn new(asset: impl Into<String>, size: Size2D, pivot: Point2D) -> Self {
        Self {
            asset: asset.into(),
            size,
            pivot,
            movable: false,
        }
    }

    pub fn movable(mut self) -> Self {
        self.movable = true;
        self
    }
}

impl Shape for ImageShape {
    fn draw(&self, canvas: &mut dyn Canvas, placement: &Placement) {
        let origin = placement.to_world(-self.pivot);
        canvas.draw_image(&self.asset, origin, placement.rotation, self.size);
    }

    fn hit_test(&self, placement: &Placement, point: Point2D) -> bool {
        let p = placement.to_local(point) + self.pivot;
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.size.width && p.y < self.size.height
    }

    fn is_movable(&self) -> bool {
        self.movable
    }

    fn edit_properties(&mut self, editor: &mut dyn PropertyEditor) {
        editor.edit_text("Image", &mut self.asset);
    }
}

/// A stroked segment from the pivot to `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineShape {
    pub end: Point2D,
    pub width: f64,
    pub color: Color,
}

impl LineShape {
    pub fn new(end: Point2D, width: f64, color: Color) -> Self {
        Self { end, width, color }
    }
}

impl Shape for LineShape {
    fn draw(&self, canvas: &mut dyn Canvas, placement: &Placement) {
        canvas.stroke_line(
            placement.position,
            placement.to_world(self.end),
            self.width,
            self.color,
        );
    }

    fn hit_test(&self, placement: &Placement, point: Point2D) -> bool {
        let p = placement.to_local(point);
        let len2 = self.end.dot(&self.end);
        let t = if len2 > 0.0 {
            (p.dot(&self.end) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let nearest = Point2D::new(self.end.x * t, self.end.y * t);
        (p - nearest).length() <= self.width / 2.0
    }

    fn edit_properties(&mut self, editor: &mut dyn PropertyEditor) {
        editor.edit_color("Color", &mut self.color);
        editor.edit_number("Width", &mut self.width);
    }
}

/// The visual kind of a drawable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeKind {
    Polygon(PolygonShape),
    Image(ImageShape),
    Line(LineShape),
    /// A joint with no visual of its own.
    #[default]
    Empty,
}

impl Shape for ShapeKind {
    fn draw(&self, canvas: &mut dyn Canvas, placement: &Placement) {
        match self {
            ShapeKind::Polygon(shape) => shape.draw(canvas, placement),
            ShapeKind::Image(shape) => shape.draw(canvas, placement),
            ShapeKind::Line(shape) => shape.draw(canvas, placement),
            ShapeKind::Empty => {}
        }
    }

    fn hit_test(&self, placement: &Placement, point: Point2D) -> bool {
        match self {
            ShapeKind::Polygon(shape) => shape.hit_test(placement, point),
            ShapeKind::Image(shape) => shape.hit_test(placement, point),
            ShapeKind::Line(shape) => shape.hit_test(placement, point),
            ShapeKind::Empty => false,
        }
    }

    fn is_movable(&self) -> bool {
        match self {
            ShapeKind::Polygon(shape) => shape.is_movable(),
            ShapeKind::Image(shape) => shape.is_movable(),
            ShapeKind::Line(shape) => shape.is_movable(),
            ShapeKind::Empty => false,
        }
    }

    fn edit_properties(&mut self, editor: &mut dyn PropertyEditor) {
        match self {
            ShapeKind::Polygon(shape) => shape.edit_properties(editor),
            ShapeKind::Image(shape) => shape.edit_properties(editor),
            ShapeKind::Line(shape) => shape.edit_properties(editor),
            ShapeKind::Empty => {}
        }
    }
}

impl From<PolygonShape> for ShapeKind {
    fn from(shape: PolygonShape) -> Self {
        ShapeKind::Polygon(shape)
    }
}

impl From<ImageShape> for ShapeKind {
    fn from(shape: ImageShape) -> Self {
        ShapeKind::Image(shape)
    }
}

impl From<LineShape> for ShapeKind {
    fn from(shape: LineShape) -> Self {
        ShapeKind::Line(shape)
    }
}
