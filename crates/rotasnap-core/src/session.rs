//! Transform math for one active drag gesture.
//!
//! A [`TransformSession`] is opened at pointer-down with a snapshot of the
//! shape and turns every later pointer position into a candidate
//! [`Rectangle`]. Resizes keep the point opposite the dragged handle (the
//! *symmetric point*) fixed in world space, whatever the rotation.

use crate::config::EngineConfig;
use crate::geometry::{
    Correction, GEOMETRY_EPSILON, Rectangle, Shape, ShapeId, reflect_through, rotate_point,
};
use crate::handles::HandleKind;
use kurbo::Point;
use thiserror::Error;

/// Why a pointer position produced no new geometry.
///
/// Rejections are per-frame and silent: the previous candidate stays in
/// place and the next pointer move may succeed.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Rejection {
    #[error("candidate {width}x{height} is below the minimum size")]
    DegenerateResize { width: f64, height: f64 },
    #[error("edge resize would push the center across the anchor")]
    InvertedAnchor,
    #[error("pointer sits exactly on the rotation center")]
    DegenerateRotation,
}

/// Result of feeding one pointer position into a session.
pub type UpdateResult = Result<Rectangle, Rejection>;

/// State of an active move/resize/rotate gesture on a single shape.
#[derive(Debug, Clone)]
pub struct TransformSession {
    shape_id: ShapeId,
    handle: HandleKind,
    /// Geometry at pointer-down.
    origin: Rectangle,
    /// Rotation center at pointer-down.
    center: Point,
    /// World position of the dragged handle at pointer-down.
    handle_point: Point,
    /// `handle_point` reflected through `center`; stays fixed while resizing.
    symmetric_point: Point,
    pointer_down: Point,
    aspect_locked: bool,
    /// `width / height` at pointer-down when aspect-locked, otherwise 1.
    proportion: f64,
    min_size: f64,
    /// Last accepted candidate.
    current: Rectangle,
    correction: Correction,
}

impl TransformSession {
    /// Start a gesture on `shape` with the pointer pressed at `pointer_down`.
    pub fn open(
        shape: &Shape,
        handle: HandleKind,
        pointer_down: Point,
        config: &EngineConfig,
    ) -> Self {
        let rect = shape.rect;
        let center = rect.center();
        let handle_point = handle.world_position(&rect);
        let symmetric_point = reflect_through(handle_point, center);
        let proportion = if config.aspect_locked {
            rect.width / rect.height
        } else {
            1.0
        };

        log::debug!(
            "Opened {:?} session on {} at ({:.1}, {:.1})",
            handle,
            shape.id,
            pointer_down.x,
            pointer_down.y
        );

        Self {
            shape_id: shape.id,
            handle,
            origin: rect,
            center,
            handle_point,
            symmetric_point,
            pointer_down,
            aspect_locked: config.aspect_locked,
            proportion,
            min_size: config.min_size,
            current: rect,
            correction: Correction::ZERO,
        }
    }

    /// Compute the candidate for a new pointer position.
    ///
    /// On rejection the previous candidate is kept and returned by
    /// [`current`](Self::current).
    pub fn update(&mut self, pointer: Point) -> UpdateResult {
        let result = match self.handle {
            HandleKind::Move => Ok(self.drag_move(pointer)),
            HandleKind::Rotate => self.drag_rotate(pointer),
            handle if handle.is_corner() => self.drag_corner(pointer),
            _ => self.drag_edge(pointer),
        };

        match result {
            Ok(rect) => {
                self.current = rect;
                Ok(rect)
            }
            Err(rejection) => {
                log::trace!("{:?} frame rejected: {}", self.handle, rejection);
                Err(rejection)
            }
        }
    }

    fn drag_move(&self, pointer: Point) -> Rectangle {
        self.origin.translated(
            pointer.x - self.pointer_down.x,
            pointer.y - self.pointer_down.y,
        )
    }

    /// Angle from the center to the pointer, 0° pointing up, whole degrees.
    ///
    /// The quadrant branches are evaluated in order and overlap on the axes,
    /// so a pointer straight above the center resolves through the first one.
    fn drag_rotate(&self, pointer: Point) -> UpdateResult {
        let dx = pointer.x - self.center.x;
        let dy = pointer.y - self.center.y;
        let hypot = dx.hypot(dy);
        if hypot == 0.0 {
            return Err(Rejection::DegenerateRotation);
        }

        let magnitude = (dy.abs() / hypot).asin().to_degrees().round();
        let rotate = if dx >= 0.0 && dy <= 0.0 {
            90.0 - magnitude
        } else if dx <= 0.0 && dy <= 0.0 {
            270.0 + magnitude
        } else if dx <= 0.0 && dy >= 0.0 {
            270.0 - magnitude
        } else {
            90.0 + magnitude
        };
        let rotate = if rotate == 360.0 { 0.0 } else { rotate };

        Ok(Rectangle {
            rotate,
            ..self.origin
        })
    }

    fn drag_corner(&self, pointer: Point) -> UpdateResult {
        let (sx, sy) = self.handle.direction();
        let rotate = self.origin.rotate;
        let anchor_world = self.symmetric_point;

        let mut center = pointer.midpoint(anchor_world);
        let mut corner = rotate_point(pointer, center, -rotate);
        let mut anchor = rotate_point(anchor_world, center, -rotate);
        let (mut width, mut height) = corner_extent(corner, anchor, sx, sy);

        if self.aspect_locked {
            // Pull the dragged corner in along the longer side.
            if width / height > self.proportion {
                corner.x -= sx * (width - height * self.proportion).abs();
            } else {
                corner.y -= sy * (height - width / self.proportion).abs();
            }

            // Moving the corner shifted the true center; redo the un-rotation
            // around it so the anchor stays where it was.
            let dragged = rotate_point(corner, center, rotate);
            center = dragged.midpoint(anchor_world);
            corner = rotate_point(dragged, center, -rotate);
            anchor = rotate_point(anchor_world, center, -rotate);
            (width, height) = corner_extent(corner, anchor, sx, sy);
        }

        if !(width >= self.min_size && height >= self.min_size) {
            return Err(Rejection::DegenerateResize { width, height });
        }

        Ok(Rectangle {
            x: if sx < 0.0 { corner.x } else { anchor.x },
            y: if sy < 0.0 { corner.y } else { anchor.y },
            width,
            height,
            rotate,
        })
    }

    fn drag_edge(&self, pointer: Point) -> UpdateResult {
        let rotate = self.origin.rotate;
        let (dx, _) = self.handle.direction();
        let horizontal = dx != 0.0;

        // Work in the handle's unrotated frame and keep only the controlled axis.
        let local = rotate_point(pointer, self.handle_point, -rotate);
        let projected = if horizontal {
            Point::new(local.x, self.handle_point.y)
        } else {
            Point::new(self.handle_point.x, local.y)
        };
        let dragged = rotate_point(projected, self.handle_point, rotate);

        let extent = dragged.distance(self.symmetric_point);
        let center = dragged.midpoint(self.symmetric_point);
        let (width, height) = if horizontal {
            (extent, self.origin.height)
        } else {
            (self.origin.width, extent)
        };

        if !(extent >= self.min_size) {
            return Err(Rejection::DegenerateResize { width, height });
        }
        if !stays_on_handle_side(center, self.handle_point, self.symmetric_point) {
            return Err(Rejection::InvertedAnchor);
        }

        Ok(Rectangle {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
            rotate,
        })
    }

    /// Set the snap correction shown on top of the candidate.
    pub fn set_correction(&mut self, correction: Correction) {
        self.correction = correction;
    }

    /// Candidate with the snap correction applied, unless that would shrink
    /// it below the minimum size.
    pub fn preview(&self) -> Rectangle {
        let corrected = self.current.apply(self.correction);
        if corrected.width < self.min_size || corrected.height < self.min_size {
            self.current
        } else {
            corrected
        }
    }

    /// End the gesture and return the geometry to commit.
    pub fn close(self) -> Rectangle {
        let committed = self.preview();
        log::debug!(
            "Closed {:?} session on {}: {:?}",
            self.handle,
            self.shape_id,
            committed
        );
        committed
    }

    /// Abandon the gesture without committing.
    pub fn dispose(self) {
        log::debug!(
            "Disposed {:?} session on {} without commit",
            self.handle,
            self.shape_id
        );
    }

    /// The shape being transformed.
    pub fn shape_id(&self) -> ShapeId {
        self.shape_id
    }

    /// The handle being dragged.
    pub fn handle(&self) -> HandleKind {
        self.handle
    }

    /// Last accepted candidate (uncorrected).
    pub fn current(&self) -> Rectangle {
        self.current
    }

    /// World position of the dragged handle at pointer-down.
    pub fn handle_point(&self) -> Point {
        self.handle_point
    }

    /// The fixed anchor opposite the handle.
    pub fn symmetric_point(&self) -> Point {
        self.symmetric_point
    }

    /// Width/height ratio enforced by aspect lock (1 when unlocked).
    pub fn proportion(&self) -> f64 {
        self.proportion
    }
}

/// Width and height spanned by a dragged corner and its anchor, signed so
/// that a corner on the correct side yields positive values.
fn corner_extent(corner: Point, anchor: Point, sx: f64, sy: f64) -> (f64, f64) {
    ((corner.x - anchor.x) * sx, (corner.y - anchor.y) * sy)
}

/// Whether `center` has not crossed `anchor` coming from `handle`, per axis.
fn stays_on_handle_side(center: Point, handle: Point, anchor: Point) -> bool {
    let within = |c: f64, h: f64, a: f64| {
        if h > a {
            c >= a - GEOMETRY_EPSILON
        } else {
            c <= a + GEOMETRY_EPSILON
        }
    };
    within(center.x, handle.x, anchor.x) && within(center.y, handle.y, anchor.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_SIZE;

    const EPS: f64 = 1e-6;

    fn square() -> Shape {
        Shape::new(Rectangle::new(0.0, 0.0, 100.0, 100.0))
    }

    fn open(shape: &Shape, handle: HandleKind, aspect_locked: bool) -> TransformSession {
        let config = EngineConfig::default().with_aspect_locked(aspect_locked);
        let down = handle.world_position(&shape.rect);
        TransformSession::open(shape, handle, down, &config)
    }

    /// World position of `handle` on `rect`, after rotation.
    fn world(handle: HandleKind, rect: &Rectangle) -> Point {
        handle.world_position(rect)
    }

    fn opposite(handle: HandleKind) -> HandleKind {
        match handle {
            HandleKind::TopLeft => HandleKind::BottomRight,
            HandleKind::TopRight => HandleKind::BottomLeft,
            HandleKind::BottomLeft => HandleKind::TopRight,
            HandleKind::BottomRight => HandleKind::TopLeft,
            HandleKind::TopMiddle => HandleKind::BottomMiddle,
            HandleKind::BottomMiddle => HandleKind::TopMiddle,
            HandleKind::MiddleLeft => HandleKind::MiddleRight,
            HandleKind::MiddleRight => HandleKind::MiddleLeft,
            other => other,
        }
    }

    #[test]
    fn test_move_without_displacement_is_identity() {
        let shape = Shape::new(Rectangle::new(12.0, 34.0, 56.0, 78.0).with_rotate(20.0));
        let down = Point::new(40.0, 60.0);
        let mut session =
            TransformSession::open(&shape, HandleKind::Move, down, &EngineConfig::default());

        let rect = session.update(down).unwrap();
        assert_eq!(rect, shape.rect);
    }

    #[test]
    fn test_move_translates_only_position() {
        let shape = square();
        let mut session = TransformSession::open(
            &shape,
            HandleKind::Move,
            Point::new(50.0, 50.0),
            &EngineConfig::default(),
        );

        let rect = session.update(Point::new(70.0, 45.0)).unwrap();
        assert_eq!(rect, Rectangle::new(20.0, -5.0, 100.0, 100.0));
    }

    #[test]
    fn test_symmetric_point_is_reflection() {
        let shape = square();
        let session = open(&shape, HandleKind::TopLeft, false);
        assert_eq!(session.handle_point(), Point::new(0.0, 0.0));
        assert_eq!(session.symmetric_point(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_rotate_straight_up_is_zero() {
        let shape = Shape::new(Rectangle::new(0.0, 0.0, 100.0, 100.0).with_rotate(45.0));
        let mut session = open(&shape, HandleKind::Rotate, false);

        let rect = session.update(Point::new(50.0, -80.0)).unwrap();
        assert!((rect.rotate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_axis_directions() {
        let shape = square();
        let mut session = open(&shape, HandleKind::Rotate, false);

        let right = session.update(Point::new(150.0, 50.0)).unwrap();
        assert!((right.rotate - 90.0).abs() < f64::EPSILON);
        let below = session.update(Point::new(50.0, 150.0)).unwrap();
        assert!((below.rotate - 180.0).abs() < f64::EPSILON);
        let left = session.update(Point::new(-50.0, 50.0)).unwrap();
        assert!((left.rotate - 270.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_diagonals_and_rounding() {
        let shape = square();
        let mut session = open(&shape, HandleKind::Rotate, false);

        let upper_right = session.update(Point::new(100.0, 0.0)).unwrap();
        assert!((upper_right.rotate - 45.0).abs() < f64::EPSILON);
        let upper_left = session.update(Point::new(0.0, 0.0)).unwrap();
        assert!((upper_left.rotate - 315.0).abs() < f64::EPSILON);
        // Slightly left of straight up rounds to a full turn, which wraps to 0.
        let nearly_up = session.update(Point::new(49.9, -950.0)).unwrap();
        assert!((nearly_up.rotate - 0.0).abs() < f64::EPSILON);
        // Position and size never change.
        assert_eq!(nearly_up.x, 0.0);
        assert_eq!(nearly_up.width, 100.0);
    }

    #[test]
    fn test_rotate_on_center_is_rejected() {
        let shape = square();
        let mut session = open(&shape, HandleKind::Rotate, false);
        session.update(Point::new(150.0, 50.0)).unwrap();

        let err = session.update(Point::new(50.0, 50.0)).unwrap_err();
        assert_eq!(err, Rejection::DegenerateRotation);
        assert!((session.current().rotate - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_corner_resize_unrotated() {
        let shape = square();
        let mut session = open(&shape, HandleKind::BottomRight, false);

        let rect = session.update(Point::new(150.0, 120.0)).unwrap();
        assert!(rect.approx_eq(&Rectangle::new(0.0, 0.0, 150.0, 120.0), EPS));

        let mut session = open(&shape, HandleKind::TopLeft, false);
        let rect = session.update(Point::new(-10.0, 20.0)).unwrap();
        assert!(rect.approx_eq(&Rectangle::new(-10.0, 20.0, 110.0, 80.0), EPS));

        let mut session = open(&shape, HandleKind::TopRight, false);
        let rect = session.update(Point::new(130.0, -30.0)).unwrap();
        assert!(rect.approx_eq(&Rectangle::new(0.0, -30.0, 130.0, 130.0), EPS));

        let mut session = open(&shape, HandleKind::BottomLeft, false);
        let rect = session.update(Point::new(25.0, 75.0)).unwrap();
        assert!(rect.approx_eq(&Rectangle::new(25.0, 0.0, 75.0, 75.0), EPS));
    }

    #[test]
    fn test_edge_resize_unrotated() {
        let shape = square();

        let mut session = open(&shape, HandleKind::TopMiddle, false);
        // Horizontal pointer drift is ignored.
        let rect = session.update(Point::new(80.0, -20.0)).unwrap();
        assert!(rect.approx_eq(&Rectangle::new(0.0, -20.0, 100.0, 120.0), EPS));

        let mut session = open(&shape, HandleKind::MiddleRight, false);
        let rect = session.update(Point::new(60.0, 10.0)).unwrap();
        assert!(rect.approx_eq(&Rectangle::new(0.0, 0.0, 60.0, 100.0), EPS));

        let mut session = open(&shape, HandleKind::BottomMiddle, false);
        let rect = session.update(Point::new(50.0, 300.0)).unwrap();
        assert!(rect.approx_eq(&Rectangle::new(0.0, 0.0, 100.0, 300.0), EPS));

        let mut session = open(&shape, HandleKind::MiddleLeft, false);
        let rect = session.update(Point::new(-250.0, 50.0)).unwrap();
        assert!(rect.approx_eq(&Rectangle::new(-250.0, 0.0, 350.0, 100.0), EPS));
    }

    #[test]
    fn test_edge_resize_past_anchor_is_rejected() {
        let shape = square();
        let mut session = open(&shape, HandleKind::TopMiddle, false);
        session.update(Point::new(50.0, 10.0)).unwrap();

        let err = session.update(Point::new(50.0, 150.0)).unwrap_err();
        assert_eq!(err, Rejection::InvertedAnchor);
        let err = session.update(Point::new(50.0, 98.0)).unwrap_err();
        assert!(matches!(err, Rejection::DegenerateResize { .. }));
        assert!(session.current().approx_eq(&Rectangle::new(0.0, 10.0, 100.0, 90.0), EPS));
    }

    #[test]
    fn test_rotated_edge_resize_past_anchor_is_rejected() {
        let shape = Shape::new(Rectangle::new(0.0, 0.0, 100.0, 60.0).with_rotate(30.0));
        for handle in [
            HandleKind::TopMiddle,
            HandleKind::BottomMiddle,
            HandleKind::MiddleLeft,
            HandleKind::MiddleRight,
        ] {
            let handle_point = world(handle, &shape.rect);
            let anchor = world(opposite(handle), &shape.rect);
            let mut session = open(&shape, handle, false);

            let past = anchor + (anchor - handle_point) * 0.5;
            assert_eq!(session.update(past), Err(Rejection::InvertedAnchor), "{handle:?}");
            assert_eq!(session.current(), shape.rect);

            let grown = session
                .update(anchor + (handle_point - anchor) * 3.0)
                .unwrap();
            let (extent, original) = if handle.direction().0 != 0.0 {
                (grown.width, shape.rect.width)
            } else {
                (grown.height, shape.rect.height)
            };
            assert!((extent - 3.0 * original).abs() < EPS, "{handle:?}");
            assert!((world(opposite(handle), &grown) - anchor).hypot() < EPS);
        }
    }

    #[test]
    fn test_corner_past_anchor_is_rejected() {
        let shape = square();
        let mut session = open(&shape, HandleKind::TopLeft, false);
        let valid = session.update(Point::new(30.0, 30.0)).unwrap();

        for pointer in [
            Point::new(98.0, 50.0),
            Point::new(150.0, 160.0),
            Point::new(101.0, 101.0),
        ] {
            let err = session.update(pointer).unwrap_err();
            assert!(matches!(err, Rejection::DegenerateResize { .. }));
        }
        assert_eq!(session.current(), valid);
    }

    #[test]
    fn test_aspect_lock_keeps_proportion() {
        let shape = Shape::new(Rectangle::new(0.0, 0.0, 200.0, 100.0).with_rotate(30.0));
        for handle in [
            HandleKind::TopLeft,
            HandleKind::TopRight,
            HandleKind::BottomLeft,
            HandleKind::BottomRight,
        ] {
            let mut session = open(&shape, handle, true);
            assert!((session.proportion() - 2.0).abs() < f64::EPSILON);
            let start = world(handle, &shape.rect);
            for offset in [(-40.0, 10.0), (25.0, 60.0), (70.0, -15.0), (-5.0, -80.0)] {
                let pointer = Point::new(start.x + offset.0, start.y + offset.1);
                if let Ok(rect) = session.update(pointer) {
                    assert!(
                        (rect.width / rect.height - 2.0).abs() < EPS,
                        "{handle:?} {offset:?}: {rect:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_symmetric_point_fixed_for_every_resize_handle() {
        for rotate in [0.0, 30.0, 90.0, 215.0] {
            let shape = Shape::new(Rectangle::new(40.0, 60.0, 120.0, 80.0).with_rotate(rotate));
            for aspect_locked in [false, true] {
                for handle in HandleKind::ALL.into_iter().filter(|h| h.is_resize()) {
                    let mut session = open(&shape, handle, aspect_locked);
                    let anchor = session.symmetric_point();
                    let start = world(handle, &shape.rect);
                    for offset in [(15.0, -10.0), (-20.0, 30.0), (60.0, 45.0)] {
                        let pointer = Point::new(start.x + offset.0, start.y + offset.1);
                        if let Ok(rect) = session.update(pointer) {
                            let moved = world(opposite(handle), &rect);
                            assert!(
                                moved.distance(anchor) < EPS,
                                "{handle:?} at {rotate}°: {moved:?} != {anchor:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_accepted_candidates_respect_min_size() {
        let shape = Shape::new(Rectangle::new(0.0, 0.0, 50.0, 50.0).with_rotate(60.0));
        for handle in HandleKind::ALL.into_iter().filter(|h| h.is_resize()) {
            let mut session = open(&shape, handle, false);
            let anchor = session.symmetric_point();
            let start = session.handle_point();
            for step in 0..=20 {
                let t = step as f64 / 20.0;
                let pointer = start + (anchor - start) * (t * 1.2);
                if let Ok(rect) = session.update(pointer) {
                    assert!(rect.width >= MIN_SIZE && rect.height >= MIN_SIZE);
                }
            }
        }
    }

    #[test]
    fn test_rotated_edge_resize_follows_local_axis() {
        // A quarter turn puts the top edge on the right-hand side.
        let shape = Shape::new(Rectangle::new(0.0, 0.0, 100.0, 100.0).with_rotate(90.0));
        let mut session = open(&shape, HandleKind::TopMiddle, false);
        assert!((session.handle_point().x - 100.0).abs() < EPS);

        let rect = session.update(Point::new(150.0, 20.0)).unwrap();
        assert!((rect.height - 150.0).abs() < EPS);
        assert!((rect.width - 100.0).abs() < EPS);
        assert!((rect.center().x - 75.0).abs() < EPS);
        assert!((rect.center().y - 50.0).abs() < EPS);
    }

    #[test]
    fn test_close_folds_correction() {
        let shape = square();
        let mut session = open(&shape, HandleKind::BottomRight, false);
        session.update(Point::new(120.0, 120.0)).unwrap();
        session.set_correction(Correction {
            x: 0.0,
            y: 0.0,
            width: 3.0,
            height: -2.0,
        });

        assert!(session.preview().approx_eq(&Rectangle::new(0.0, 0.0, 123.0, 118.0), EPS));
        assert!(session.close().approx_eq(&Rectangle::new(0.0, 0.0, 123.0, 118.0), EPS));
    }

    #[test]
    fn test_close_falls_back_when_correction_too_small() {
        let shape = square();
        let mut session = open(&shape, HandleKind::MiddleRight, false);
        session.update(Point::new(6.0, 50.0)).unwrap();
        session.set_correction(Correction {
            width: -3.0,
            ..Correction::ZERO
        });

        assert!(session.close().approx_eq(&Rectangle::new(0.0, 0.0, 6.0, 100.0), EPS));
    }

    #[test]
    fn test_close_without_movement_commits_origin() {
        let shape = square();
        let session = open(&shape, HandleKind::TopLeft, false);
        assert_eq!(session.close(), shape.rect);
    }
}
