//! Scene files: the shapes on the canvas plus a scripted gesture.

use kurbo::Point;
use rotasnap_core::{ConfigError, EngineConfig, HandleKind, Rectangle, Shape, ShapeId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Scene loading errors.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Scene parse error: {0}")]
    Parse(String),
    #[error("Gesture targets shape {0}, which does not exist")]
    UnknownShape(usize),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A shape as written in a scene file. The id is optional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShapeId>,
    #[serde(flatten)]
    pub rect: Rectangle,
}

impl SceneShape {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: None,
            rect: Rectangle::new(x, y, width, height),
        }
    }
}

/// One recorded pointer move, `at_ms` after pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedMove {
    pub at_ms: u64,
    pub x: f64,
    pub y: f64,
}

impl ScriptedMove {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A pointer-down on one shape followed by moves and a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureScript {
    /// Index into the scene's shapes.
    pub shape: usize,
    pub handle: HandleKind,
    pub down: Point,
    #[serde(default)]
    pub moves: Vec<ScriptedMove>,
}

/// A canvas and the gesture to replay on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub config: EngineConfig,
    pub shapes: Vec<SceneShape>,
    pub gesture: GestureScript,
}

impl Default for Scene {
    /// Four seed rectangles with the first one dragged next to the third.
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            shapes: vec![
                SceneShape::new(124.0, 125.0, 100.0, 100.0),
                SceneShape::new(723.0, 265.0, 200.0, 130.0),
                SceneShape::new(482.0, 422.0, 130.0, 200.0),
                SceneShape::new(208.0, 402.0, 231.0, 503.0),
            ],
            gesture: GestureScript {
                shape: 0,
                handle: HandleKind::Move,
                down: Point::new(174.0, 175.0),
                moves: vec![
                    ScriptedMove { at_ms: 0, x: 200.0, y: 190.0 },
                    ScriptedMove { at_ms: 10, x: 300.0, y: 220.0 },
                    ScriptedMove { at_ms: 40, x: 530.0, y: 300.0 },
                ],
            },
        }
    }
}

impl Scene {
    /// Parse and validate a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let scene: Self =
            serde_json::from_str(json).map_err(|e| SceneError::Parse(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read a scene file from disk.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let json = fs::read_to_string(path)
            .map_err(|e| SceneError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        log::info!("Loaded scene from {}", path.display());
        Self::from_json(&json)
    }

    /// Check the config and that the gesture targets an existing shape.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.config.validate()?;
        if self.gesture.shape >= self.shapes.len() {
            return Err(SceneError::UnknownShape(self.gesture.shape));
        }
        Ok(())
    }
}

/// The host's copy of the shapes; only committed geometry lands here.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    /// Build a store from scene shapes, assigning fresh ids where missing.
    pub fn from_scene(shapes: &[SceneShape]) -> Self {
        Self {
            shapes: shapes
                .iter()
                .map(|entry| Shape::with_id(entry.id.unwrap_or_else(Uuid::new_v4), entry.rect))
                .collect(),
        }
    }

    /// Replace the geometry of shape `id`. Returns `false` if it is unknown.
    pub fn apply(&mut self, id: ShapeId, rect: Rectangle) -> bool {
        match self.shapes.iter_mut().find(|shape| shape.id == id) {
            Some(shape) => {
                shape.rect = rect;
                true
            }
            None => {
                log::warn!("Commit for unknown shape {}", id);
                false
            }
        }
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }
}
