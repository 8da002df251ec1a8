//! Integration tests for the local timeline.
//!
//! Exercises cutline-core configuration together with the
//! cutline-timeline store, views and persistence.

use cutline_core::{CutlineError, StoreConfig};
use cutline_timeline::{
    aggregate_duration, clips_by_layer, BulkEdit, Clip, ClipKind, ClipPatch, Layer, LayerFlags,
    Marker, TimelineFile, TimelineStore, ViewCache,
};
use std::collections::HashSet;
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

fn clip(name: &str, layer: Layer, start: f64, end: f64) -> Clip {
    Clip::new(name, layer, ClipKind::Video, start, end)
}

fn build_timeline() -> TimelineStore {
    let mut store = TimelineStore::new(&StoreConfig::default());
    store.set_project_name("Integration Cut").unwrap();
    store.add_clip(clip("Intro", Layer::Main, 0.0, 5.0)).unwrap();
    store.add_clip(clip("Body", Layer::Main, 5.0, 35.0)).unwrap();
    store.add_clip(Clip::title("Chapter One", 5.0, 8.0)).unwrap();
    store
        .add_clip(Clip::new("Music", Layer::Audio, ClipKind::Audio, 0.0, 45.0))
        .unwrap();
    store
}

// ── History ────────────────────────────────────────────────────

#[test]
fn undo_everything_returns_to_empty() {
    let mut store = build_timeline();
    let edits = store.history().past_len();
    assert_eq!(edits, 5);

    for _ in 0..edits {
        assert!(store.undo());
    }
    assert!(store.clips().is_empty());
    assert_eq!(store.project_name(), "Untitled Project");
    assert!(!store.undo());
}

#[test]
fn redo_reverses_undo() {
    let mut store = build_timeline();
    let before = store.snapshot();

    for _ in 0..3 {
        store.undo();
    }
    for _ in 0..3 {
        assert!(store.redo());
    }
    assert_eq!(store.snapshot(), before);
    assert!(!store.can_redo());
}

#[test]
fn new_edit_truncates_redo() {
    let mut store = build_timeline();
    store.undo();
    store.undo();
    assert_eq!(store.history().future_len(), 2);

    store.add_clip(clip("Cutaway", Layer::Overlay, 10.0, 12.0)).unwrap();
    assert_eq!(store.history().future_len(), 0);
    assert!(!store.redo());
}

#[test]
fn empty_history_is_noop() {
    let mut store = TimelineStore::default();
    let version = store.version();
    assert!(!store.undo());
    assert!(!store.redo());
    assert!(store.clips().is_empty());
    assert_eq!(store.version(), version);
}

#[test]
fn invalid_clip_leaves_history_alone() {
    let mut store = build_timeline();
    let depth = store.history().past_len();

    let err = store.add_clip(clip("Backwards", Layer::Main, 4.0, 4.0)).unwrap_err();
    assert!(matches!(err, CutlineError::Validation(_)));
    assert_eq!(store.clip_count(), 4);
    assert_eq!(store.history().past_len(), depth);
}

#[test]
fn history_depth_from_config() {
    let config = StoreConfig {
        history_depth: 3,
        ..StoreConfig::default()
    };
    let mut store = TimelineStore::new(&config);
    for i in 0..10 {
        store.add_clip(clip(&format!("c{i}"), Layer::Main, 0.0, 1.0)).unwrap();
    }
    assert_eq!(store.history().past_len(), 3);
    for _ in 0..3 {
        assert!(store.undo());
    }
    assert_eq!(store.clip_count(), 7);
    assert!(!store.undo());
}

// ── Editing ────────────────────────────────────────────────────

#[test]
fn relayer_then_undo_restores_order() {
    let mut store = build_timeline();
    let intro = store.clips()[0].id;
    let order_before: Vec<_> = store.clips().iter().map(|c| c.id).collect();

    store
        .reorder_or_relayer_clip(intro, Layer::Overlay, 1.0, 6.0)
        .unwrap();
    assert_eq!(store.clips().last().unwrap().id, intro);
    assert_eq!(store.history().undo_label(), Some("Move clip to layer"));

    store.undo();
    let order_after: Vec<_> = store.clips().iter().map(|c| c.id).collect();
    assert_eq!(order_after, order_before);
}

#[test]
fn move_and_trim() {
    let mut store = build_timeline();
    let body = store.clips()[1].id;

    store.move_clip(body, 10.0).unwrap();
    let moved = store.clip(body).unwrap();
    assert_eq!((moved.start, moved.end), (10.0, 40.0));

    store.trim_clip(body, 12.0, Some(2.0)).unwrap();
    let trimmed = store.clip(body).unwrap();
    assert_eq!((trimmed.start, trimmed.end, trimmed.in_point), (10.0, 22.0, 2.0));

    assert!(store.trim_clip(body, 0.0, None).is_err());
    assert!(store.move_clip(body, -1.0).is_err());
}

#[test]
fn update_and_remove_unknown_clip() {
    let mut store = build_timeline();
    let ghost = Uuid::new_v4();
    let depth = store.history().past_len();

    assert!(matches!(
        store.update_clip(ghost, &ClipPatch::timing(0.0, 1.0)),
        Err(CutlineError::NotFound(_))
    ));
    assert!(matches!(store.remove_clip(ghost), Err(CutlineError::NotFound(_))));
    assert_eq!(store.history().past_len(), depth);
}

#[test]
fn locked_layer_rejects_edits() {
    let mut store = build_timeline();
    store.set_layer_flags(
        Layer::Audio,
        LayerFlags {
            locked: true,
            ..LayerFlags::default()
        },
    );
    let music = store.clips()[3].id;

    assert!(store.remove_clip(music).is_err());
    assert!(store
        .add_clip(Clip::new("VO", Layer::Audio, ClipKind::Audio, 0.0, 3.0))
        .is_err());
    assert_eq!(store.clip_count(), 4);
}

#[test]
fn ripple_delete_then_insert_round_trip() {
    let mut store = build_timeline();
    let body = store.clips()[1].id;
    let music = store.clips()[3].id;

    let removed = store.ripple_delete(10.0).unwrap();
    assert_eq!(removed.id, body);
    // Music starts before the removed span and stays put
    assert_eq!(store.clip(music).unwrap().start, 0.0);

    store.ripple_insert(5.0, removed.duration()).unwrap();
    store.bulk_edit(&[music], BulkEdit::Mute).unwrap();
    assert!(store.clip(music).unwrap().muted);

    for _ in 0..3 {
        store.undo();
    }
    assert_eq!(store.clip(body).unwrap().start, 5.0);
    assert!(!store.clip(music).unwrap().muted);
}

#[test]
fn markers_survive_undo_and_views() {
    let mut store = build_timeline();
    let mut cache = ViewCache::new();
    let duration = cache.aggregate_duration(&store);

    store.add_marker(Marker::new("Drop", 20.0)).unwrap();
    store.add_marker(Marker::new("Start", 0.0)).unwrap();
    let names: Vec<_> = store.markers().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Start", "Drop"]);
    assert_eq!(cache.aggregate_duration(&store), duration);

    store.undo();
    store.undo();
    assert!(store.markers().is_empty());
}

// ── Views ──────────────────────────────────────────────────────

#[test]
fn buckets_partition_all_clips() {
    let store = build_timeline();
    let buckets = clips_by_layer(store.clips());

    let layers: Vec<_> = buckets.keys().copied().collect();
    assert_eq!(layers, Layer::ALL.to_vec());

    let ids: Vec<_> = buckets.values().flatten().map(|c| c.id).collect();
    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(ids.len(), store.clip_count());
    assert_eq!(unique, store.clips().iter().map(|c| c.id).collect::<HashSet<_>>());
    for (layer, clips) in &buckets {
        assert!(clips.iter().all(|c| c.layer == *layer));
    }
}

#[test]
fn aggregate_duration_examples() {
    assert_eq!(aggregate_duration(&Vec::<Clip>::new()), 0.0);

    let clips = vec![
        clip("a", Layer::Main, 0.0, 3.2),
        clip("b", Layer::Main, 1.0, 7.5),
        clip("c", Layer::Main, 0.0, 1.0),
    ];
    assert_eq!(aggregate_duration(&clips), 7.5);
}

#[test]
fn view_cache_tracks_undo() {
    let mut store = build_timeline();
    let mut cache = ViewCache::new();
    assert_eq!(cache.aggregate_duration(&store), 45.0);

    store.undo();
    assert_eq!(cache.aggregate_duration(&store), 35.0);
    assert_eq!(cache.clips_by_layer(&store)[&Layer::Audio].len(), 0);

    store.redo();
    assert_eq!(cache.aggregate_duration(&store), 45.0);
    assert_eq!(cache.clips_by_layer(&store)[&Layer::Audio].len(), 1);
}

// ── Persistence ────────────────────────────────────────────────

#[test]
fn save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.json");
    let store = build_timeline();

    TimelineFile::save(&store, &path).unwrap();

    let mut reopened = TimelineStore::default();
    reopened.open(TimelineFile::load(&path).unwrap()).unwrap();
    assert_eq!(reopened.snapshot(), store.snapshot());
    assert!(!reopened.can_undo());
}

#[test]
fn config_round_trip_drives_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = StoreConfig {
        default_project_name: "Scratch".into(),
        ..StoreConfig::default()
    };
    config.save(&path).unwrap();

    let loaded = StoreConfig::load(&path).unwrap();
    let mut store = TimelineStore::new(&loaded);
    assert_eq!(store.project_name(), "Scratch");
    store.set_project_name("Named").unwrap();
    store.set_project_name("   ").unwrap();
    assert_eq!(store.project_name(), "Scratch");
}
