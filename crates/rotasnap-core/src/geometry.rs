//! Rectangle geometry shared by the transform and snap engines.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Slack allowed when comparing coordinates that went through trigonometry.
pub const GEOMETRY_EPSILON: f64 = 1e-6;

/// Rectangle geometry that cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("Invalid size {width}x{height}: width and height must be non-negative")]
    NegativeSize { width: f64, height: f64 },
    #[error("Non-finite coordinate in rectangle")]
    NonFinite,
}

/// A rectangle that rotates clockwise around its own center.
///
/// `x`/`y` is the top-left corner of the *unrotated* rectangle, so a shape
/// rotated by 90° still reports the same `x`/`y` it had at 0°. Deserialized
/// rectangles have their rotation normalized and their size checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRectangle")]
pub struct Rectangle {
    /// Left edge of the unrotated rectangle.
    pub x: f64,
    /// Top edge of the unrotated rectangle.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Rotation in degrees, clockwise, in `[0, 360)`.
    pub rotate: f64,
}

/// Rectangle fields as written in JSON, before normalization.
#[derive(Deserialize)]
struct RawRectangle {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    rotate: f64,
}

impl TryFrom<RawRectangle> for Rectangle {
    type Error = GeometryError;

    fn try_from(raw: RawRectangle) -> Result<Self, Self::Error> {
        let RawRectangle {
            x,
            y,
            width,
            height,
            rotate,
        } = raw;
        if ![x, y, width, height, rotate].iter().all(|v| v.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if width < 0.0 || height < 0.0 {
            return Err(GeometryError::NegativeSize { width, height });
        }
        Ok(Rectangle::new(x, y, width, height).with_rotate(rotate))
    }
}

impl Rectangle {
    /// Create an axis-aligned rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotate: 0.0,
        }
    }

    /// Return a copy rotated to `degrees` (normalized into `[0, 360)`).
    pub fn with_rotate(mut self, degrees: f64) -> Self {
        self.rotate = normalize_degrees(degrees);
        self
    }

    /// Center of the rectangle; also its rotation center.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// The unrotated box as a kurbo `Rect`.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Whether the rectangle has no rotation.
    pub fn is_axis_aligned(&self) -> bool {
        self.rotate == 0.0
    }

    /// Min, mid and max coordinates on both axes of the unrotated box.
    pub fn samples(&self) -> AxisSamples {
        AxisSamples {
            x: [self.x, self.x + self.width / 2.0, self.x + self.width],
            y: [self.y, self.y + self.height / 2.0, self.y + self.height],
        }
    }

    /// Return a copy moved by `(dx, dy)`.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Return a copy with a snap correction added on top.
    pub fn apply(self, correction: Correction) -> Self {
        Self {
            x: self.x + correction.x,
            y: self.y + correction.y,
            width: self.width + correction.width,
            height: self.height + correction.height,
            rotate: self.rotate,
        }
    }

    /// Field-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Rectangle, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
            && (self.rotate - other.rotate).abs() <= tolerance
    }
}

/// Which of the three samples on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleIndex {
    Min,
    Mid,
    Max,
}

impl SampleIndex {
    /// All samples in evaluation order.
    pub const ALL: [SampleIndex; 3] = [SampleIndex::Min, SampleIndex::Mid, SampleIndex::Max];

    fn index(self) -> usize {
        match self {
            SampleIndex::Min => 0,
            SampleIndex::Mid => 1,
            SampleIndex::Max => 2,
        }
    }
}

/// The edges and midline of a rectangle on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSamples {
    /// `[x_min, x_mid, x_max]`.
    pub x: [f64; 3],
    /// `[y_min, y_mid, y_max]`.
    pub y: [f64; 3],
}

impl AxisSamples {
    /// X coordinate of the given sample.
    pub fn x_at(&self, index: SampleIndex) -> f64 {
        self.x[index.index()]
    }

    /// Y coordinate of the given sample.
    pub fn y_at(&self, index: SampleIndex) -> f64 {
        self.y[index.index()]
    }

    /// Box spanned by the min and max samples.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x[0], self.y[0], self.x[2], self.y[2])
    }
}

/// Position and size deltas that realize a snap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Correction {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Correction {
    /// No correction.
    pub const ZERO: Correction = Correction {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Check if every field is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// A rectangle owned by the host, identified by id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub rect: Rectangle,
}

impl Shape {
    /// Create a shape with a fresh id.
    pub fn new(rect: Rectangle) -> Self {
        Self {
            id: Uuid::new_v4(),
            rect,
        }
    }

    /// Create a shape with a known id.
    pub fn with_id(id: ShapeId, rect: Rectangle) -> Self {
        Self { id, rect }
    }
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Rotate `point` clockwise around `center` by `degrees` (y axis points down).
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        dx * cos - dy * sin + center.x,
        dx * sin + dy * cos + center.y,
    )
}

/// The point diametrically opposite `point` across `center`.
pub fn reflect_through(point: Point, center: Point) -> Point {
    center + (center - point)
}
