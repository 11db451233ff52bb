//! Snap functionality for aligning a dragged rectangle to its siblings.
//!
//! Each axis is handled independently: the closest sibling edge or midline
//! within the threshold wins, and its signed distance becomes a
//! [`Correction`] whose fields depend on the handle being dragged.

use crate::config::EngineConfig;
use crate::geometry::{AxisSamples, Correction, Rectangle, SampleIndex, Shape, ShapeId};
use crate::handles::HandleKind;
use kurbo::{Point, Rect};
use serde::Serialize;

/// The closest sibling sample found on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapCandidate {
    /// Absolute distance to the matched sample.
    pub distance: f64,
    /// Which of the sibling's samples matched.
    pub point_index: SampleIndex,
    /// All samples of the matched sibling.
    pub samples: AxisSamples,
    /// Signed delta that moves the dragged sample onto the sibling's.
    pub correct: f64,
}

/// A guide segment drawn while a snap is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GuideLine {
    pub start: Point,
    pub end: Point,
}

/// Result of a snap computation.
///
/// Index 0 of the arrays belongs to the x axis (vertical guide), index 1 to
/// the y axis (horizontal guide).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SnapOutcome {
    /// Deltas to add to the candidate rectangle.
    pub correction: Correction,
    /// Match on the x axis.
    pub x: Option<SnapCandidate>,
    /// Match on the y axis.
    pub y: Option<SnapCandidate>,
    /// Guide segments for each matched axis.
    pub guide_lines: [Option<GuideLine>; 2],
    /// Boxes of the matched siblings.
    pub reference_rects: [Option<Rect>; 2],
}

impl SnapOutcome {
    /// An outcome with no snapping.
    pub fn none() -> Self {
        Self::default()
    }

    /// Check if any axis snapped.
    pub fn is_snapped(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Running minimum for one axis.
struct Closest {
    threshold: f64,
    best: Option<SnapCandidate>,
}

impl Closest {
    fn new(threshold: f64) -> Self {
        Self {
            threshold,
            best: None,
        }
    }

    /// Keep `delta` if it is strictly closer than the current best and
    /// strictly inside the threshold; ties keep the earlier match.
    fn consider(&mut self, delta: f64, point_index: SampleIndex, samples: AxisSamples) {
        let distance = delta.abs();
        let best = self.best.map_or(f64::INFINITY, |b| b.distance);
        if distance < best && distance < self.threshold {
            self.best = Some(SnapCandidate {
                distance,
                point_index,
                samples,
                correct: delta,
            });
        }
    }
}

/// Computes snap corrections against axis-aligned siblings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    threshold: f64,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SnapEngine {
    /// Create an engine with the given (exclusive) distance threshold.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Create an engine using the config's snap threshold.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.snap_threshold)
    }

    /// Find the closest alignment for `candidate` among `siblings`.
    ///
    /// Moves compare every edge and midline of the candidate; resizes only
    /// compare the dragged handle's position. Rotations, rotated candidates,
    /// rotated siblings and the dragged shape itself never snap.
    pub fn compute_correction(
        &self,
        candidate: &Rectangle,
        handle: HandleKind,
        dragged_id: ShapeId,
        siblings: &[Shape],
    ) -> SnapOutcome {
        if handle == HandleKind::Rotate || !candidate.is_axis_aligned() {
            return SnapOutcome::none();
        }

        let dragged = candidate.samples();
        let handle_point = handle.unrotated_position(candidate);
        let mut closest_x = Closest::new(self.threshold);
        let mut closest_y = Closest::new(self.threshold);

        for sibling in siblings
            .iter()
            .filter(|s| s.id != dragged_id && s.rect.is_axis_aligned())
        {
            let samples = sibling.rect.samples();
            for index in SampleIndex::ALL {
                let (sx, sy) = (samples.x_at(index), samples.y_at(index));
                if handle == HandleKind::Move {
                    for dx in dragged.x {
                        closest_x.consider(sx - dx, index, samples);
                    }
                    for dy in dragged.y {
                        closest_y.consider(sy - dy, index, samples);
                    }
                } else {
                    closest_x.consider(sx - handle_point.x, index, samples);
                    closest_y.consider(sy - handle_point.y, index, samples);
                }
            }
        }

        let (x, y) = (closest_x.best, closest_y.best);
        let correct_x = x.map_or(0.0, |c| c.correct);
        let correct_y = y.map_or(0.0, |c| c.correct);

        SnapOutcome {
            correction: correction_for(handle, correct_x, correct_y),
            x,
            y,
            guide_lines: [
                x.map(|c| vertical_guide(&c, &dragged, correct_y)),
                y.map(|c| horizontal_guide(&c, &dragged, correct_x)),
            ],
            reference_rects: [
                x.map(|c| c.samples.to_rect()),
                y.map(|c| c.samples.to_rect()),
            ],
        }
    }
}

/// Map per-axis deltas onto the fields a handle controls, keeping the
/// opposite side of the rectangle in place.
pub fn correction_for(handle: HandleKind, cx: f64, cy: f64) -> Correction {
    let zero = Correction::ZERO;
    match handle {
        HandleKind::Move => Correction { x: cx, y: cy, ..zero },
        HandleKind::TopLeft => Correction {
            x: cx,
            y: cy,
            width: -cx,
            height: -cy,
        },
        HandleKind::TopMiddle => Correction { y: cy, height: -cy, ..zero },
        HandleKind::TopRight => Correction {
            y: cy,
            width: cx,
            height: -cy,
            ..zero
        },
        HandleKind::BottomLeft => Correction {
            x: cx,
            width: -cx,
            height: cy,
            ..zero
        },
        HandleKind::BottomMiddle => Correction { height: cy, ..zero },
        HandleKind::BottomRight => Correction { width: cx, height: cy, ..zero },
        HandleKind::MiddleLeft => Correction { x: cx, width: -cx, ..zero },
        HandleKind::MiddleRight => Correction { width: cx, ..zero },
        HandleKind::Rotate => zero,
    }
}

/// Vertical guide through the matched sibling x sample, running from the
/// higher shape's top to the lower shape's bottom.
fn vertical_guide(matched: &SnapCandidate, dragged: &AxisSamples, correct_y: f64) -> GuideLine {
    let x = matched.samples.x_at(matched.point_index);
    let (y0, y1) = if matched.samples.y[0] > dragged.y[0] {
        (dragged.y[0] + correct_y, matched.samples.y[2])
    } else {
        (matched.samples.y[0], dragged.y[2] + correct_y)
    };
    GuideLine {
        start: Point::new(x, y0),
        end: Point::new(x, y1),
    }
}

/// Horizontal guide through the matched sibling y sample.
fn horizontal_guide(matched: &SnapCandidate, dragged: &AxisSamples, correct_x: f64) -> GuideLine {
    let y = matched.samples.y_at(matched.point_index);
    let (x0, x1) = if matched.samples.x[0] > dragged.x[0] {
        (dragged.x[0] + correct_x, matched.samples.x[2])
    } else {
        (matched.samples.x[0], dragged.x[2] + correct_x)
    };
    GuideLine {
        start: Point::new(x0, y),
        end: Point::new(x1, y),
    }
}
