use std::path::Path;

use sceneview::engine::SceneEngine;
use sceneview::error::SceneError;
use sceneview::options::Options;
use sceneview::scene::{Category, SceneDocument};

/// Per-frame summaries logged before the report is cut short.
const MAX_REPORTED_FRAMES: usize = 10_000;

fn run(scene_path: &str, options_path: Option<&str>) -> Result<(), SceneError> {
    let document = SceneDocument::load(Path::new(scene_path))?;
    let options = match options_path {
        Some(path) => Options::load(Path::new(path))?,
        None => Options::default(),
    };
    log::info!(
        "loaded {scene_path}: {} points, {} lines, {} aux",
        document.elements(Category::Points).len(),
        document.elements(Category::Lines).len(),
        document.elements(Category::Aux).len(),
    );

    let engine = SceneEngine::new(document, options);
    let (min, max) = engine.index().frame_range();
    log::info!(
        "frames {min}..={max}, scene radius {:.2}",
        engine.index().scene_radius()
    );

    let span = i128::from(max) - i128::from(min) + 1;
    if span > MAX_REPORTED_FRAMES as i128 {
        log::warn!(
            "{span} frames in range; reporting the first \
             {MAX_REPORTED_FRAMES}"
        );
    }
    for frame in (min..=max).take(MAX_REPORTED_FRAMES) {
        let visible = engine.set_frame(frame)?;
        log::info!(
            "frame {frame}: {} points, {} lines, {} aux visible",
            visible.points.len(),
            visible.lines.len(),
            visible.aux.len(),
        );
    }

    let visible = engine.clear_frame()?;
    log::info!("unfiltered: {} elements visible", visible.len());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(scene_path) = args.get(1) else {
        log::error!("usage: sceneview <scene.json> [options.toml]");
        std::process::exit(2);
    };

    if let Err(e) = run(scene_path, args.get(2).map(String::as_str)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
