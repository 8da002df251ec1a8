//! Integration tests for engine-backed projects.
//!
//! Drives cutline-ges through the stub engine and through an
//! [`EditorSession`] from cutline-app.

use cutline_app::{ClipSource, EditorSession};
use cutline_core::{CutlineError, FrameRate, StoreConfig};
use cutline_ges::{
    GesRegistry, ProjectId, ProjectSettings, ProjectStatus, ProjectTemplate, StubEngine,
};
use cutline_timeline::{Clip, ClipKind, Layer};
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────

async fn available_registry() -> (Arc<StubEngine>, Arc<GesRegistry<StubEngine>>) {
    let engine = Arc::new(StubEngine::new());
    let registry = Arc::new(GesRegistry::new(engine.clone()));
    assert!(registry.check_availability().await);
    (engine, registry)
}

fn demo_settings() -> ProjectSettings {
    ProjectSettings::new(1920, 1080, "30/1".parse::<FrameRate>().unwrap())
}

// ── End-to-end scenarios ───────────────────────────────────────

#[tokio::test]
async fn create_and_select_demo() {
    let (_engine, registry) = available_registry().await;

    let id = registry.create_project("Demo", demo_settings()).await.unwrap();
    assert_eq!(id.as_str(), "p1");

    registry.set_current_project(&"p1".into()).unwrap();
    let view = registry.view();
    assert_eq!(view.projects[&id].status, ProjectStatus::Idle);
    assert_eq!(view.current_project_id, Some(ProjectId::from("p1")));
}

#[tokio::test]
async fn unreachable_engine_blocks_create() {
    let engine = Arc::new(StubEngine::unreachable());
    let registry = GesRegistry::new(engine.clone());

    assert!(!registry.check_availability().await);
    let view = registry.view();
    assert!(!view.available);
    assert!(view.error.is_some_and(|e| !e.to_string().is_empty()));

    assert!(registry.create_project("Demo", demo_settings()).await.is_err());
    assert_eq!(engine.call_count("create"), 0);
}

#[tokio::test]
async fn delete_current_vs_other() {
    let (_engine, registry) = available_registry().await;
    let first = registry.create_project("First", demo_settings()).await.unwrap();
    let second = registry.create_project("Second", demo_settings()).await.unwrap();
    registry.set_current_project(&second).unwrap();

    registry.delete_project(&first).await.unwrap();
    assert_eq!(registry.current_project_id(), Some(second.clone()));

    registry.delete_project(&second).await.unwrap();
    assert_eq!(registry.current_project_id(), None);
}

// ── Registry behaviour ─────────────────────────────────────────

#[tokio::test]
async fn selecting_without_load_shows_local_entry() {
    let (engine, registry) = available_registry().await;
    let id = registry.create_project("Demo", demo_settings()).await.unwrap();
    engine
        .push_clip(&id, Clip::new("a", Layer::Main, ClipKind::Video, 0.0, 3.0))
        .unwrap();

    registry.set_current_project(&id).unwrap();
    let current = registry.current_project().unwrap();
    assert!(!current.loaded);
    assert!(current.clips.is_empty());

    registry.load_project(&id).await.unwrap();
    let current = registry.current_project().unwrap();
    assert!(current.loaded);
    assert_eq!(current.metadata.duration, 3.0);
    assert_eq!(registry.list_projects()[0].clip_count, 1);
}

#[tokio::test]
async fn template_projects_use_preset_settings() {
    let (_engine, registry) = available_registry().await;

    for template in ProjectTemplate::ALL {
        let id = registry
            .create_from_template(template, template.display_name())
            .await
            .unwrap();
        let project = registry.project(&id).unwrap();
        let settings = template.settings();
        assert_eq!(project.metadata.width, settings.width);
        assert_eq!(project.metadata.height, settings.height);
        assert_eq!(project.metadata.framerate, settings.framerate);
    }
    assert_eq!(registry.projects().len(), ProjectTemplate::ALL.len());
}

#[tokio::test]
async fn out_of_range_settings_rejected() {
    let (engine, registry) = available_registry().await;

    for settings in [
        ProjectSettings::new(479, 1080, FrameRate::FPS_30),
        ProjectSettings::new(7681, 1080, FrameRate::FPS_30),
        ProjectSettings::new(1920, 269, FrameRate::FPS_30),
        ProjectSettings::new(1920, 4321, FrameRate::FPS_30),
    ] {
        let err = registry.create_project("Demo", settings).await.unwrap_err();
        assert!(matches!(err, CutlineError::Validation(_)));
    }
    let long_name = "x".repeat(201);
    assert!(registry.create_project(&long_name, demo_settings()).await.is_err());
    assert_eq!(engine.call_count("create"), 0);
}

#[tokio::test]
async fn conflicting_deletes_on_one_project() {
    let (engine, registry) = available_registry().await;
    let id = registry.create_project("Demo", demo_settings()).await.unwrap();

    engine.hold();
    let first = {
        let registry = registry.clone();
        let id = id.clone();
        tokio::spawn(async move { registry.delete_project(&id).await })
    };
    while !registry.is_loading() {
        tokio::task::yield_now().await;
    }

    let err = registry.delete_project(&id).await.unwrap_err();
    assert!(matches!(err, CutlineError::Conflict(_)));

    engine.release(1);
    first.await.unwrap().unwrap();
    assert!(registry.projects().is_empty());
    assert_eq!(engine.call_count("delete"), 1);
}

// ── Editor session ─────────────────────────────────────────────

#[tokio::test]
async fn session_keeps_namespaces_apart() {
    let engine = Arc::new(StubEngine::new());
    let mut session = EditorSession::init(StoreConfig::default(), engine.clone())
        .await
        .unwrap();

    let id = session.open_new_project("Demo").await.unwrap();
    engine.push_clip(&id, Clip::title("Remote", 0.0, 2.0)).unwrap();
    session.registry().load_project(&id).await.unwrap();

    session
        .timeline_mut()
        .add_clip(Clip::new("Local", Layer::Main, ClipKind::Video, 0.0, 9.0))
        .unwrap();

    let remote = session.clips_by_layer(&ClipSource::Project(id)).unwrap();
    let local = session.clips_by_layer(&ClipSource::Local).unwrap();
    assert_eq!(remote[&Layer::Text].len(), 1);
    assert!(remote[&Layer::Main].is_empty());
    assert_eq!(local[&Layer::Main].len(), 1);
    assert!(local[&Layer::Text].is_empty());

    session.undo();
    assert_eq!(session.timeline_duration(), 0.0);
    assert_eq!(session.registry().list_projects()[0].clip_count, 1);

    session.teardown();
}

#[tokio::test]
async fn session_with_unreachable_engine_still_edits() {
    let engine = Arc::new(StubEngine::unreachable());
    let mut session = EditorSession::init(StoreConfig::default(), engine.clone())
        .await
        .unwrap();

    assert!(!session.registry().is_available());
    assert!(session.create_project("Demo").await.is_err());
    assert_eq!(engine.call_count("create"), 0);

    session
        .timeline_mut()
        .add_clip(Clip::new("Offline", Layer::Main, ClipKind::Image, 0.0, 2.0))
        .unwrap();
    assert_eq!(session.timeline_duration(), 2.0);
}
