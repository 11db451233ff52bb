//! Pointer-driven gesture lifecycle.
//!
//! The host forwards pointer-down/move/up; the controller owns the
//! [`TransformSession`], throttles moves, runs the [`SnapEngine`] and hands
//! back events to render or commit. Geometry is never written to the host's
//! shapes directly.

use crate::config::EngineConfig;
use crate::geometry::{Rectangle, Shape, ShapeId};
use crate::handles::HandleKind;
use crate::input::{CaptureGuard, PointerCapture};
use crate::session::TransformSession;
use crate::snap::{SnapEngine, SnapOutcome};
use crate::throttle::{Instant, Throttle};
use kurbo::Point;
use serde::Serialize;

/// Notification produced by the controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum GestureEvent {
    /// Transient preview while dragging.
    Changing {
        shape_id: ShapeId,
        handle: HandleKind,
        /// Candidate with the snap correction applied.
        rect: Rectangle,
        snap: SnapOutcome,
    },
    /// Final geometry to persist; emitted once per gesture.
    Changed { shape_id: ShapeId, rect: Rectangle },
}

/// Current state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging(HandleKind),
}

#[derive(Debug)]
struct ActiveGesture {
    session: TransformSession,
    engine: SnapEngine,
    throttle: Throttle,
    capture: CaptureGuard,
    snap: SnapOutcome,
}

/// Drives at most one gesture at a time.
#[derive(Debug)]
pub struct GestureController {
    config: EngineConfig,
    active: Option<ActiveGesture>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GestureController {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    /// The config new gestures are opened with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the config. An open gesture keeps the values it started with.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    pub fn state(&self) -> GestureState {
        match &self.active {
            Some(active) => GestureState::Dragging(active.session.handle()),
            None => GestureState::Idle,
        }
    }

    /// The open session, if any.
    pub fn session(&self) -> Option<&TransformSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    /// Snap outcome of the last accepted move.
    pub fn last_snap(&self) -> Option<&SnapOutcome> {
        self.active.as_ref().map(|active| &active.snap)
    }

    /// Start a gesture on `shape`.
    ///
    /// An already open gesture is discarded without commit and its capture
    /// released.
    pub fn pointer_down(
        &mut self,
        shape: &Shape,
        handle: HandleKind,
        position: Point,
        capture: Box<dyn PointerCapture>,
    ) {
        if self.active.is_some() {
            log::warn!("Pointer down while a gesture is open, discarding it");
            self.cancel();
        }

        self.active = Some(ActiveGesture {
            session: TransformSession::open(shape, handle, position, &self.config),
            engine: SnapEngine::from_config(&self.config),
            throttle: Throttle::new(self.config.throttle_interval()),
            capture: CaptureGuard::new(capture),
            snap: SnapOutcome::none(),
        });
    }

    /// Feed a pointer move received at `now`.
    ///
    /// Returns `None` when idle, when the move falls inside the throttle
    /// window, or when the session rejects the position.
    pub fn pointer_move(
        &mut self,
        position: Point,
        now: Instant,
        siblings: &[Shape],
    ) -> Option<GestureEvent> {
        let active = self.active.as_mut()?;
        if !active.throttle.ready(now) {
            log::trace!("Dropped pointer move inside throttle window");
            return None;
        }

        let candidate = active.session.update(position).ok()?;
        let shape_id = active.session.shape_id();
        let handle = active.session.handle();

        active.snap = active
            .engine
            .compute_correction(&candidate, handle, shape_id, siblings);
        active.session.set_correction(active.snap.correction);

        Some(GestureEvent::Changing {
            shape_id,
            handle,
            rect: active.session.preview(),
            snap: active.snap,
        })
    }

    /// End the gesture and return the geometry to commit.
    ///
    /// Emits `Changed` even when the pointer never moved.
    pub fn pointer_up(&mut self) -> Option<GestureEvent> {
        let mut active = self.active.take()?;
        active.capture.release();
        let shape_id = active.session.shape_id();
        let rect = active.session.close();
        Some(GestureEvent::Changed { shape_id, rect })
    }

    /// Tear down the open gesture without committing.
    ///
    /// Returns `false` if no gesture was open.
    pub fn cancel(&mut self) -> bool {
        match self.active.take() {
            Some(mut active) => {
                active.capture.release();
                active.session.dispose();
                true
            }
            None => false,
        }
    }
}
