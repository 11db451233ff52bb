//! Rotasnap Core Library
//!
//! Platform-agnostic transform and alignment engine for rotated rectangles:
//! move, resize and rotate math, sibling snapping, and the pointer gesture
//! lifecycle that ties them together.

pub mod config;
pub mod geometry;
pub mod gesture;
pub mod handles;
pub mod input;
pub mod session;
pub mod snap;
pub mod throttle;

pub use config::{ConfigError, EngineConfig};
pub use geometry::{
    AxisSamples, Correction, GeometryError, Rectangle, SampleIndex, Shape, ShapeId,
};
pub use gesture::{GestureController, GestureEvent, GestureState};
pub use handles::{Handle, HandleKind, handle_positions, hit_test_handle};
pub use input::{NoCapture, PointerCapture, pointer_position};
pub use session::{Rejection, TransformSession, UpdateResult};
pub use snap::{GuideLine, SnapCandidate, SnapEngine, SnapOutcome};
pub use throttle::{Instant, Throttle};
