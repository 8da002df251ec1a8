//! Registry of engine-backed projects.
//!
//! All state sits behind one lock that is never held across an engine call.
//! An operation marks itself in flight, awaits the engine, then applies its
//! result and clears the in-flight mark inside a single critical section, so
//! readers see either the state before the operation or after it.
//!
//! Per-project serialization: a create, load or delete on a project id that
//! already has one of those operations in flight is rejected with
//! [`CutlineError::Conflict`]. Creates are keyed by name until the engine
//! has assigned an id. Results of operations started before
//! [`GesRegistry::reset`] are discarded.
//!
//! Failures are recorded in [`RegistryView::error`] and also returned. The
//! recorded error is cleared by the next successful operation.

use cutline_core::{CutlineError, Result};
use cutline_timeline::{clip_counts_by_layer, clips_by_layer, ClipsByLayer, Layer};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::engine::EngineClient;
use crate::notify::{Notice, Notifier};
use crate::project::{validate_name, GesProject, ProjectId, ProjectSettings, ProjectStatus, ProjectSummary};
use crate::templates::ProjectTemplate;

/// Point-in-time copy of the registry's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryView {
    /// Engine reachable as of the last probe
    pub available: bool,
    /// Some operation is in flight
    pub loading: bool,
    /// Last failure, cleared by the next success
    pub error: Option<CutlineError>,
    pub projects: IndexMap<ProjectId, GesProject>,
    pub current_project_id: Option<ProjectId>,
}

#[derive(Debug, Default)]
struct RegistryState {
    available: bool,
    in_flight: usize,
    busy: HashSet<String>,
    /// Bumped by `reset`; results from older epochs are dropped
    epoch: u64,
    error: Option<CutlineError>,
    projects: IndexMap<ProjectId, GesProject>,
    current: Option<ProjectId>,
}

/// Marks one operation in flight. Dropping it without [`commit`](Self::commit)
/// (e.g. a cancelled future) releases the mark.
struct InFlight<'a> {
    state: &'a Mutex<RegistryState>,
    key: Option<String>,
    epoch: u64,
    done: bool,
}

impl InFlight<'_> {
    /// Clear the in-flight mark and apply `f` in the same critical section.
    /// `f` receives whether the registry was reset since the operation began.
    fn commit<R>(mut self, f: impl FnOnce(&mut RegistryState, bool) -> R) -> R {
        let mut state = self.state.lock();
        release(&mut state, self.key.as_deref());
        self.done = true;
        let stale = state.epoch != self.epoch;
        f(&mut state, stale)
    }

    /// [`commit`](Self::commit) for operations with a result. The recorded
    /// error is set on failure and cleared on success in the same critical
    /// section. Stale outcomes leave it alone.
    fn finish<T>(self, f: impl FnOnce(&mut RegistryState, bool) -> Result<T>) -> Result<T> {
        self.commit(|state, stale| {
            let outcome = f(state, stale);
            if !stale {
                state.error = outcome.as_ref().err().cloned();
            }
            outcome
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.done {
            release(&mut self.state.lock(), self.key.as_deref());
        }
    }
}

fn release(state: &mut RegistryState, key: Option<&str>) {
    state.in_flight = state.in_flight.saturating_sub(1);
    if let Some(key) = key {
        state.busy.remove(key);
    }
}

/// Tracks remote projects, the current selection, and engine status.
pub struct GesRegistry<E> {
    engine: Arc<E>,
    state: Mutex<RegistryState>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<E: EngineClient> GesRegistry<E> {
    /// Create a registry; the engine counts as unavailable until probed.
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            state: Mutex::new(RegistryState::default()),
            notifier: None,
        }
    }

    /// Attach a notification sink.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The engine client.
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    // ── Reads ───────────────────────────────────────────────────

    /// Copy of the whole observable state.
    pub fn view(&self) -> RegistryView {
        let state = self.state.lock();
        RegistryView {
            available: state.available,
            loading: state.in_flight > 0,
            error: state.error.clone(),
            projects: state.projects.clone(),
            current_project_id: state.current.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.state.lock().available
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn error(&self) -> Option<CutlineError> {
        self.state.lock().error.clone()
    }

    pub fn current_project_id(&self) -> Option<ProjectId> {
        self.state.lock().current.clone()
    }

    /// The current project, if any.
    pub fn current_project(&self) -> Option<GesProject> {
        let state = self.state.lock();
        state
            .current
            .as_ref()
            .and_then(|id| state.projects.get(id))
            .cloned()
    }

    pub fn project(&self, id: &ProjectId) -> Option<GesProject> {
        self.state.lock().projects.get(id).cloned()
    }

    /// All projects keyed by id, in creation order.
    pub fn projects(&self) -> IndexMap<ProjectId, GesProject> {
        self.state.lock().projects.clone()
    }

    /// Listing rows for every project.
    pub fn list_projects(&self) -> Vec<ProjectSummary> {
        self.state
            .lock()
            .projects
            .values()
            .map(GesProject::summary)
            .collect()
    }

    /// A project's remote clips grouped per layer.
    pub fn clips_by_layer(&self, id: &ProjectId) -> Result<ClipsByLayer> {
        let state = self.state.lock();
        let project = state
            .projects
            .get(id)
            .ok_or_else(|| CutlineError::not_found("project", id))?;
        Ok(clips_by_layer(project.clips.values()))
    }

    /// A project's remote clip count per layer.
    pub fn clip_counts_by_layer(&self, id: &ProjectId) -> Result<IndexMap<Layer, usize>> {
        let state = self.state.lock();
        let project = state
            .projects
            .get(id)
            .ok_or_else(|| CutlineError::not_found("project", id))?;
        Ok(clip_counts_by_layer(project.clips.values()))
    }

    // ── Operations ──────────────────────────────────────────────

    /// Probe the engine and record the result. Safe to call repeatedly.
    pub async fn check_availability(&self) -> bool {
        let op = self.begin_unkeyed();
        let reachable = self.engine.probe().await;

        let applied = op.commit(|state, stale| {
            if stale {
                debug!("Discarding availability result from before reset");
                return false;
            }
            state.available = reachable;
            if reachable {
                state.error = None;
            } else {
                state.error = Some(CutlineError::Engine("editing engine is unreachable".into()));
            }
            true
        });

        if !applied {
            return reachable;
        }
        if reachable {
            info!("Editing engine available");
        } else {
            warn!("Editing engine unreachable");
            self.notify(Notice::error("Editing engine is unreachable"));
        }
        reachable
    }

    /// Create a project. Does not select it.
    pub async fn create_project(&self, name: &str, settings: ProjectSettings) -> Result<ProjectId> {
        let name = match validate_name(name).and_then(|n| settings.validate().map(|()| n)) {
            Ok(name) => name.to_string(),
            Err(err) => return Err(self.fail(err)),
        };
        self.require_available()?;
        let op = self
            .begin(format!("create:{name}"))
            .map_err(|err| self.fail(err))?;

        info!(%name, width = settings.width, height = settings.height, framerate = %settings.framerate, "Creating project");
        let result = self
            .engine
            .create_session(&name, settings.width, settings.height, settings.framerate)
            .await;

        let outcome = op.finish(|state, stale| {
            let id = result?;
            if stale {
                return Err(CutlineError::Conflict(format!(
                    "registry was reset while creating '{name}'"
                )));
            }
            if state.projects.contains_key(&id) {
                return Err(CutlineError::Engine(format!(
                    "engine returned existing project id '{id}'"
                )));
            }
            state
                .projects
                .insert(id.clone(), GesProject::new(id.clone(), name.clone(), settings));
            Ok(id)
        });

        match outcome {
            Ok(id) => {
                info!(%id, %name, "Project created");
                self.notify(Notice::info(format!("Created project '{name}'")));
                Ok(id)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Create a project from a preset.
    pub async fn create_from_template(&self, template: ProjectTemplate, name: &str) -> Result<ProjectId> {
        debug!(template = template.key(), "Creating project from template");
        self.create_project(name, template.settings()).await
    }

    /// Ask the engine for a project's session and refresh the local entry.
    /// The current selection is never changed.
    pub async fn load_project(&self, id: &ProjectId) -> Result<()> {
        self.require_known(id)?;
        self.require_available()?;
        let op = self
            .begin(id.to_string())
            .map_err(|err| self.fail(err))?;

        info!(%id, "Loading project");
        let result = self.engine.load_session(id).await;

        let outcome = op.finish(|state, stale| {
            let snapshot = result?;
            let project = match state.projects.get_mut(id) {
                Some(project) if !stale => project,
                _ => {
                    return Err(CutlineError::not_found("project", id));
                }
            };
            let skipped = project.refresh_from(snapshot);
            if skipped.invalid > 0 {
                warn!(%id, count = skipped.invalid, "Engine returned invalid clips");
            }
            if skipped.duplicate > 0 {
                warn!(%id, count = skipped.duplicate, "Engine returned clips with repeated ids");
            }
            Ok(project.clips.len())
        });

        match outcome {
            Ok(clips) => {
                info!(%id, clips, "Project loaded");
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Discard a project locally and in the engine. Clears the current
    /// selection if it pointed at this project.
    pub async fn delete_project(&self, id: &ProjectId) -> Result<()> {
        self.require_known(id)?;
        self.require_available()?;
        let op = self
            .begin(id.to_string())
            .map_err(|err| self.fail(err))?;

        info!(%id, "Deleting project");
        let result = self.engine.delete_session(id).await;

        let outcome = op.finish(|state, stale| {
            let existed = result?;
            if stale {
                return Err(CutlineError::not_found("project", id));
            }
            if !existed {
                warn!(%id, "Engine had no session for deleted project");
            }
            let removed = state.projects.shift_remove(id);
            if state.current.as_ref() == Some(id) {
                state.current = None;
            }
            Ok(removed.map(|p| p.name))
        });

        match outcome {
            Ok(name) => {
                info!(%id, "Project deleted");
                self.notify(Notice::info(format!(
                    "Deleted project '{}'",
                    name.unwrap_or_else(|| id.to_string())
                )));
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Select a project. Does not load it; the local entry is shown as is.
    pub fn set_current_project(&self, id: &ProjectId) -> Result<()> {
        let mut state = self.state.lock();
        if !state.projects.contains_key(id) {
            let err = CutlineError::not_found("project", id);
            state.error = Some(err.clone());
            return Err(err);
        }
        debug!(%id, "Current project selected");
        state.current = Some(id.clone());
        state.error = None;
        Ok(())
    }

    /// Clear the selection.
    pub fn clear_current_project(&self) {
        self.state.lock().current = None;
    }

    /// Record a playback status pushed by the engine.
    pub fn apply_engine_status(&self, id: &ProjectId, status: ProjectStatus) -> Result<()> {
        let mut state = self.state.lock();
        let project = state
            .projects
            .get_mut(id)
            .ok_or_else(|| CutlineError::not_found("project", id))?;
        debug!(%id, ?status, "Engine status update");
        project.status = status;
        Ok(())
    }

    /// Forget all projects and status. In-flight results are discarded.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.epoch += 1;
        state.available = false;
        state.error = None;
        state.projects.clear();
        state.current = None;
        info!(epoch = state.epoch, "Registry reset");
    }

    // ── Helpers ─────────────────────────────────────────────────

    /// Mark an operation on `key` in flight, or fail if one already is.
    fn begin(&self, key: String) -> Result<InFlight<'_>> {
        let mut state = self.state.lock();
        if !state.busy.insert(key.clone()) {
            return Err(CutlineError::Conflict(format!(
                "an operation on '{}' is already in progress",
                key.trim_start_matches("create:")
            )));
        }
        state.in_flight += 1;
        Ok(InFlight {
            state: &self.state,
            key: Some(key),
            epoch: state.epoch,
            done: false,
        })
    }

    fn begin_unkeyed(&self) -> InFlight<'_> {
        let mut state = self.state.lock();
        state.in_flight += 1;
        InFlight {
            state: &self.state,
            key: None,
            epoch: state.epoch,
            done: false,
        }
    }

    fn require_known(&self, id: &ProjectId) -> Result<()> {
        if self.state.lock().projects.contains_key(id) {
            Ok(())
        } else {
            Err(self.fail(CutlineError::not_found("project", id)))
        }
    }

    fn require_available(&self) -> Result<()> {
        if self.state.lock().available {
            Ok(())
        } else {
            Err(self.fail(CutlineError::Engine(
                "editing engine is not available".into(),
            )))
        }
    }

    /// Record `err` as the last error, then report it.
    fn fail(&self, err: CutlineError) -> CutlineError {
        self.state.lock().error = Some(err.clone());
        self.report(err)
    }

    /// Log and notify an error that is already recorded. Returns it for
    /// propagation.
    fn report(&self, err: CutlineError) -> CutlineError {
        warn!(error = %err, "Registry operation failed");
        self.notify(Notice::error(err.to_string()));
        err
    }

    fn notify(&self, notice: Notice) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(notice);
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────
