//! Pointer plumbing between the host and a gesture.

use kurbo::{Affine, Point};
use std::fmt;

/// Map a host screen position into canvas coordinates.
///
/// `screen_to_canvas` is the inverse of the host's view transform.
pub fn pointer_position(screen_to_canvas: Affine, screen: Point) -> Point {
    screen_to_canvas * screen
}

/// A host-side pointer subscription that must be torn down when a gesture ends.
///
/// Hosts typically capture the pointer (or attach document-level listeners)
/// on pointer-down; `release` undoes that.
pub trait PointerCapture {
    fn release(&mut self);
}

impl<F: FnMut()> PointerCapture for F {
    fn release(&mut self) {
        (*self)()
    }
}

/// A capture with nothing to release.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn release(&mut self) {}
}

/// Owns a capture and releases it exactly once, at the latest on drop.
pub(crate) struct CaptureGuard(Option<Box<dyn PointerCapture>>);

impl CaptureGuard {
    pub(crate) fn new(capture: Box<dyn PointerCapture>) -> Self {
        Self(Some(capture))
    }

    /// Release the capture if it is still held.
    pub(crate) fn release(&mut self) {
        if let Some(mut capture) = self.0.take() {
            capture.release();
        }
    }

    pub(crate) fn is_held(&self) -> bool {
        self.0.is_some()
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureGuard")
            .field("held", &self.is_held())
            .finish()
    }
}
