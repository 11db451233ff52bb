//! Feeds a scripted gesture through the engine the way a pointer host would.

use crate::scene::{Scene, SceneError, ShapeStore};
use rotasnap_core::{GestureController, GestureEvent, Instant};
use std::time::Duration;

/// Everything a replay produced.
#[derive(Debug)]
pub struct Replay {
    /// Events in emission order; the last one is the commit.
    pub events: Vec<GestureEvent>,
    /// Shapes after the commit was applied.
    pub store: ShapeStore,
}

/// Run the scene's gesture from pointer-down to pointer-up.
pub fn replay(scene: &Scene) -> Result<Replay, SceneError> {
    scene.validate()?;

    let mut store = ShapeStore::from_scene(&scene.shapes);
    let script = &scene.gesture;
    let target = *store
        .as_slice()
        .get(script.shape)
        .ok_or(SceneError::UnknownShape(script.shape))?;

    let mut controller = GestureController::new(scene.config.clone());
    let mut events = Vec::new();
    let base = Instant::now();

    controller.pointer_down(
        &target,
        script.handle,
        script.down,
        Box::new(|| log::debug!("Released pointer capture")),
    );

    for step in &script.moves {
        let now = base + Duration::from_millis(step.at_ms);
        if let Some(event) = controller.pointer_move(step.position(), now, store.as_slice()) {
            events.push(event);
        }
    }

    if let Some(event) = controller.pointer_up() {
        if let GestureEvent::Changed { shape_id, rect } = &event {
            store.apply(*shape_id, *rect);
        }
        events.push(event);
    }

    log::info!(
        "Replayed {:?} gesture: {} of {} moves handled",
        script.handle,
        events.len().saturating_sub(1),
        script.moves.len()
    );

    Ok(Replay { events, store })
}
