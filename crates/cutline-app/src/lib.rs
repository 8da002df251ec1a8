//! Cutline App - Editor session
//!
//! [`EditorSession`] owns everything one editor window works with: the
//! local timeline and its history, the memoized derived views, and the
//! registry of engine-backed projects. It is constructed explicitly with
//! [`EditorSession::init`] and passed to whatever needs it.

use cutline_core::{Result, StoreConfig};
use cutline_ges::{EngineClient, GesRegistry, ProjectId, ProjectSettings, TracingNotifier};
use cutline_timeline::{ClipsByLayer, TimelineFile, TimelineStore, ViewCache};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Which clip namespace a view reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipSource {
    /// The local editable timeline
    Local,
    /// The remote clips of an engine project
    Project(ProjectId),
}

/// One editing session.
pub struct EditorSession<E> {
    config: StoreConfig,
    timeline: TimelineStore,
    views: ViewCache,
    registry: Arc<GesRegistry<E>>,
}

impl<E: EngineClient> EditorSession<E> {
    /// Build a session and probe the engine once.
    pub async fn init(config: StoreConfig, engine: Arc<E>) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(
            GesRegistry::new(engine).with_notifier(Arc::new(TracingNotifier)),
        );
        let available = registry.check_availability().await;

        let timeline = TimelineStore::new(&config);
        info!(
            timeline = %timeline.id(),
            history_depth = config.history_depth,
            engine_available = available,
            "Editor session started"
        );

        Ok(Self {
            config,
            timeline,
            views: ViewCache::new(),
            registry,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn timeline(&self) -> &TimelineStore {
        &self.timeline
    }

    /// Mutable access for edits. Views notice changes through the version
    /// counter, so no explicit invalidation is needed.
    pub fn timeline_mut(&mut self) -> &mut TimelineStore {
        &mut self.timeline
    }

    /// Shared handle to the project registry.
    pub fn registry(&self) -> &Arc<GesRegistry<E>> {
        &self.registry
    }

    /// Settings for new projects, from the configured defaults.
    pub fn default_settings(&self) -> ProjectSettings {
        ProjectSettings::new(
            self.config.default_width,
            self.config.default_height,
            self.config.default_framerate,
        )
    }

    /// Create an engine project with the configured default settings.
    pub async fn create_project(&self, name: &str) -> Result<ProjectId> {
        self.registry
            .create_project(name, self.default_settings())
            .await
    }

    /// Create, load and select a project in one go.
    pub async fn open_new_project(&self, name: &str) -> Result<ProjectId> {
        let id = self.create_project(name).await?;
        self.registry.load_project(&id).await?;
        self.registry.set_current_project(&id)?;
        Ok(id)
    }

    /// Deselect the current project. It stays in the registry and the engine.
    pub fn close_project(&self) {
        self.registry.clear_current_project();
    }

    /// Clips of the chosen namespace grouped per layer.
    pub fn clips_by_layer(&mut self, source: &ClipSource) -> Result<ClipsByLayer> {
        match source {
            ClipSource::Local => Ok(self.views.clips_by_layer(&self.timeline).clone()),
            ClipSource::Project(id) => self.registry.clips_by_layer(id),
        }
    }

    /// Length of the local timeline in seconds.
    pub fn timeline_duration(&mut self) -> f64 {
        self.views.aggregate_duration(&self.timeline)
    }

    pub fn undo(&mut self) -> bool {
        self.timeline.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.timeline.redo()
    }

    /// Write the local timeline to disk.
    pub fn save_timeline(&self, path: &Path) -> Result<()> {
        TimelineFile::save(&self.timeline, path)
    }

    /// Replace the local timeline with one read from disk. History is cleared.
    pub fn open_timeline(&mut self, path: &Path) -> Result<()> {
        let snapshot = TimelineFile::load(path)?;
        self.timeline.open(snapshot)
    }

    /// End the session. Registry contents are forgotten and any in-flight
    /// registry results are discarded.
    pub fn teardown(self) {
        self.registry.reset();
        info!(
            timeline = %self.timeline.id(),
            edits = self.timeline.history().past_len(),
            "Editor session closed"
        );
    }
}
