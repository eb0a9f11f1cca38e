use anyhow::{Context, Result, bail};
use scroller_config::ScrollerConfig;
use scroller_scene::{ConfigPatch, Engine, EngineConfig, MemoryDom, SceneDocument};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const BUILTIN_SCENE: &str = include_str!("../scenes/slides.json");

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ScrollerConfig::load();

    // A scene path on the command line wins over the configured one.
    let scene_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.demo.scene.clone());
    let document = match &scene_path {
        Some(path) => SceneDocument::load(path)
            .with_context(|| format!("loading scene {}", path.display()))?,
        None => SceneDocument::from_json(BUILTIN_SCENE).context("parsing built-in scene")?,
    };

    let mut dom = MemoryDom::new(config.demo.viewport_height);
    document.populate(&mut dom);

    let settings = EngineConfig::from_settings(&config.transition)?;
    let mut engine = Engine::new(dom);
    engine.configure(
        ConfigPatch::default()
            .transition_ms(settings.transition_ms)
            .timing(settings.timing),
    );
    engine.onscroll(|position, delta| tracing::debug!(position, delta, "scroll"));

    let length = document.install(&mut engine)?;
    tracing::info!(
        length,
        leaves = engine.tree().map_or(0, |tree| tree.leaf_count()),
        "scene installed"
    );
    log_writes(&mut engine, None);

    let step = config.demo.step;
    if !step.is_finite() || step <= 0.0 {
        bail!("demo step must be positive, got {step}");
    }
    let end = config.demo.end.unwrap_or(length);

    let mut position = 0.0;
    while position <= end {
        engine.animate(position);
        log_writes(&mut engine, Some(position));
        position += step;
    }

    Ok(())
}

fn log_writes(engine: &mut Engine<MemoryDom>, position: Option<f64>) {
    let writes = engine.dom_mut().drain_writes();
    for write in &writes {
        let selector = engine.dom().selector(write.target).unwrap_or("?");
        tracing::info!(
            position,
            selector,
            property = %write.property,
            value = %write.value,
            "style"
        );
    }
}
