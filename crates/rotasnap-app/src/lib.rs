//! Rotasnap Application
//!
//! A headless pointer host for the rotasnap engine: loads a scene, replays a
//! scripted gesture through the controller and commits the result.

mod replay;
mod scene;

pub use replay::{Replay, replay};
pub use scene::{GestureScript, Scene, SceneError, ScriptedMove, SceneShape, ShapeStore};
