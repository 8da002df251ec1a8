//! Cutline - editable timeline driver
//!
//! Boots logging and configuration, then runs an editing session against
//! the in-process engine. With a path argument the local timeline is read
//! from that file first and written back on exit.

use anyhow::{Context, Result};
use cutline_app::{ClipSource, EditorSession};
use cutline_core::StoreConfig;
use cutline_ges::StubEngine;
use cutline_timeline::{Clip, ClipKind, Layer, Marker};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match StoreConfig::default_path() {
        Some(path) => StoreConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => StoreConfig::default(),
    };

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log filter")?;
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Cutline starting...");

    let timeline_path = std::env::args().nth(1).map(PathBuf::from);
    let engine = Arc::new(StubEngine::new());
    let mut session = EditorSession::init(config, engine).await?;

    match &timeline_path {
        Some(path) if path.exists() => {
            session.open_timeline(path)?;
            info!(path = %path.display(), clips = session.timeline().clip_count(), "Timeline loaded");
        }
        _ => seed_timeline(&mut session)?,
    }

    let project = session.open_new_project("Demo").await?;
    let local = session.clips_by_layer(&ClipSource::Local)?;
    for (layer, clips) in &local {
        info!(layer = layer.display_name(), clips = clips.len(), "Local layer");
    }
    info!(
        %project,
        duration = session.timeline_duration(),
        "Session ready"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&session.registry().list_projects())?
    );

    if let Some(path) = &timeline_path {
        session.save_timeline(path)?;
        info!(path = %path.display(), "Timeline saved");
    }
    session.teardown();
    Ok(())
}

/// Starting content for an empty timeline.
fn seed_timeline(session: &mut EditorSession<StubEngine>) -> Result<()> {
    let timeline = session.timeline_mut();
    timeline.set_project_name("Demo")?;
    timeline.add_clip(Clip::new("Intro", Layer::Main, ClipKind::TestPattern, 0.0, 5.0))?;
    timeline.add_clip(Clip::title("Cutline", 0.5, 4.5))?;
    timeline.add_clip(Clip::new("Bed", Layer::Audio, ClipKind::Audio, 0.0, 5.0))?;
    timeline.add_marker(Marker::new("Title in", 0.5).with_color("#ffcc00"))?;
    Ok(())
}
