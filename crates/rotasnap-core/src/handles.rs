//! Handle definitions for rectangle manipulation.

use crate::geometry::{Rectangle, rotate_point};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Distance from the top edge to the rotation grip (in world units).
pub const ROTATE_HANDLE_OFFSET: f64 = 30.0;

/// The kind of handle - determines what a drag changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandleKind {
    /// Dragging the body translates the shape.
    Move,
    /// Grip above the top edge; spins the shape around its center.
    Rotate,
    // Corner handles
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    // Edge handles (resize one dimension)
    TopMiddle,
    BottomMiddle,
    MiddleLeft,
    MiddleRight,
}

impl HandleKind {
    /// Every handle kind.
    pub const ALL: [HandleKind; 10] = [
        HandleKind::Move,
        HandleKind::Rotate,
        HandleKind::TopLeft,
        HandleKind::TopMiddle,
        HandleKind::TopRight,
        HandleKind::BottomLeft,
        HandleKind::BottomMiddle,
        HandleKind::BottomRight,
        HandleKind::MiddleLeft,
        HandleKind::MiddleRight,
    ];

    /// Check if this is one of the four corner handles.
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft
                | HandleKind::TopRight
                | HandleKind::BottomLeft
                | HandleKind::BottomRight
        )
    }

    /// Check if this is one of the four edge-midpoint handles.
    pub fn is_edge(self) -> bool {
        matches!(
            self,
            HandleKind::TopMiddle
                | HandleKind::BottomMiddle
                | HandleKind::MiddleLeft
                | HandleKind::MiddleRight
        )
    }

    /// Check if dragging this handle changes the size.
    pub fn is_resize(self) -> bool {
        self.is_corner() || self.is_edge()
    }

    /// Which side of the center the handle sits on, per axis.
    ///
    /// `-1` is left/top, `1` is right/bottom, `0` is the midline.
    pub fn direction(self) -> (f64, f64) {
        match self {
            HandleKind::TopLeft => (-1.0, -1.0),
            HandleKind::TopMiddle => (0.0, -1.0),
            HandleKind::TopRight => (1.0, -1.0),
            HandleKind::MiddleLeft => (-1.0, 0.0),
            HandleKind::MiddleRight => (1.0, 0.0),
            HandleKind::BottomLeft => (-1.0, 1.0),
            HandleKind::BottomMiddle => (0.0, 1.0),
            HandleKind::BottomRight => (1.0, 1.0),
            HandleKind::Move | HandleKind::Rotate => (0.0, 0.0),
        }
    }

    /// Position of the handle on the unrotated rectangle.
    ///
    /// `Move` and `Rotate` resolve to the center.
    pub fn unrotated_position(self, rect: &Rectangle) -> Point {
        let (dx, dy) = self.direction();
        let pick = |dir: f64, min: f64, size: f64| {
            if dir < 0.0 {
                min
            } else if dir > 0.0 {
                min + size
            } else {
                min + size / 2.0
            }
        };
        Point::new(pick(dx, rect.x, rect.width), pick(dy, rect.y, rect.height))
    }

    /// Position of the handle in world space (rotation applied).
    pub fn world_position(self, rect: &Rectangle) -> Point {
        rotate_point(self.unrotated_position(rect), rect.center(), rect.rotate)
    }
}

/// A manipulation handle on a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// The kind of handle (determines behavior).
    pub kind: HandleKind,
    /// Position in world coordinates.
    pub position: Point,
}

impl Handle {
    /// Create a new handle.
    pub fn new(kind: HandleKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Check if a point (in world coordinates) hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Get the grips drawn around a rectangle: the rotation grip first, then the
/// eight resize handles. `Move` has no grip; it covers the body.
pub fn handle_positions(rect: &Rectangle) -> Vec<Handle> {
    let center = rect.center();
    let grip = Point::new(center.x, rect.y - ROTATE_HANDLE_OFFSET);

    let mut handles = Vec::with_capacity(9);
    handles.push(Handle::new(
        HandleKind::Rotate,
        rotate_point(grip, center, rect.rotate),
    ));
    handles.extend(
        HandleKind::ALL
            .into_iter()
            .filter(|kind| kind.is_resize())
            .map(|kind| Handle::new(kind, kind.world_position(rect))),
    );
    handles
}

/// Find which handle (if any) is hit at the given point.
/// Falls back to `Move` when the point is inside the rotated body.
pub fn hit_test_handle(rect: &Rectangle, point: Point, tolerance: f64) -> Option<HandleKind> {
    if let Some(handle) = handle_positions(rect)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
    {
        return Some(handle.kind);
    }

    let local = rotate_point(point, rect.center(), -rect.rotate);
    rect.bounds().contains(local).then_some(HandleKind::Move)
}
