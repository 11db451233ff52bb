//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() -> std::process::ExitCode {
    use rotasnap_app::{Scene, replay};
    use std::path::PathBuf;
    use std::process::ExitCode;

    env_logger::init();
    log::info!("Starting rotasnap");

    let scene = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Scene::load(&path),
        None => Ok(Scene::default()),
    };

    let result = match scene.and_then(|scene| replay(&scene)) {
        Ok(result) => result,
        Err(e) => {
            log::error!("Replay failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for event in &result.events {
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => {
                log::error!("Failed to serialize event: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    for shape in result.store.as_slice() {
        log::info!("{} -> {:?}", shape.id, shape.rect);
    }
    ExitCode::SUCCESS
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
