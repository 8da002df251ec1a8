//! In-process engine used when no real engine is attached, and in tests.
//!
//! Sessions live in memory. Ids are assigned as `p1`, `p2`, ... The stub can
//! be made unreachable, told to fail the next call, or gated so calls stay
//! in flight until released.

use async_trait::async_trait;
use cutline_core::{CutlineError, FrameRate, Result};
use cutline_timeline::{aggregate_duration, Clip};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::engine::{EngineClient, ProjectSnapshot};
use crate::project::{ProjectId, ProjectMetadata, ProjectStatus};

#[derive(Debug)]
struct StubState {
    reachable: bool,
    next_id: u64,
    sessions: IndexMap<ProjectId, ProjectSnapshot>,
    fail_next: Option<String>,
    calls: Vec<&'static str>,
}

/// Memory-backed [`EngineClient`].
#[derive(Debug)]
pub struct StubEngine {
    state: Mutex<StubState>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl StubEngine {
    /// A reachable engine with no sessions.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StubState {
                reachable: true,
                next_id: 1,
                sessions: IndexMap::new(),
                fail_next: None,
                calls: Vec::new(),
            }),
            gate: Mutex::new(None),
        }
    }

    /// An engine that fails every probe and call.
    pub fn unreachable() -> Self {
        let engine = Self::new();
        engine.set_reachable(false);
        engine
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.state.lock().reachable = reachable;
    }

    /// Make the next session call fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state.lock().fail_next = Some(message.into());
    }

    /// Hold every subsequent call, probes included, until
    /// [`release`](Self::release).
    pub fn hold(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let `n` held calls finish.
    pub fn release(&self, n: usize) {
        if let Some(gate) = self.gate.lock().as_ref() {
            gate.add_permits(n);
        }
    }

    /// Put a clip into a session, as if edited on the engine side.
    pub fn push_clip(&self, id: &ProjectId, clip: Clip) -> Result<()> {
        let mut state = self.state.lock();
        let session = state
            .sessions
            .get_mut(id)
            .ok_or_else(|| CutlineError::not_found("session", id))?;
        session.clips.push(clip);
        session.metadata.duration = aggregate_duration(&session.clips);
        Ok(())
    }

    /// Change a session's playback status.
    pub fn set_status(&self, id: &ProjectId, status: ProjectStatus) -> Result<()> {
        let mut state = self.state.lock();
        let session = state
            .sessions
            .get_mut(id)
            .ok_or_else(|| CutlineError::not_found("session", id))?;
        session.status = status;
        Ok(())
    }

    /// Whether a session exists engine-side.
    pub fn has_session(&self, id: &ProjectId) -> bool {
        self.state.lock().sessions.contains_key(id)
    }

    /// Number of calls of a kind (`"probe"`, `"create"`, `"load"`, `"delete"`).
    pub fn call_count(&self, kind: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == kind).count()
    }

    /// Count the call and wait at the gate if it is held.
    async fn pass_gate(&self, kind: &'static str) -> Result<()> {
        self.state.lock().calls.push(kind);

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            debug!(kind, "Stub engine call held");
            let permit = gate
                .acquire()
                .await
                .map_err(|_| CutlineError::Engine("stub gate closed".into()))?;
            permit.forget();
        }
        Ok(())
    }

    async fn enter(&self, kind: &'static str) -> Result<()> {
        self.pass_gate(kind).await?;

        let mut state = self.state.lock();
        if !state.reachable {
            return Err(CutlineError::Engine("engine unreachable".into()));
        }
        if let Some(message) = state.fail_next.take() {
            return Err(CutlineError::Engine(message));
        }
        Ok(())
    }
}

impl Default for StubEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngineClient for StubEngine {
    async fn probe(&self) -> bool {
        if self.pass_gate("probe").await.is_err() {
            return false;
        }
        self.state.lock().reachable
    }

    async fn create_session(
        &self,
        name: &str,
        width: u32,
        height: u32,
        framerate: FrameRate,
    ) -> Result<ProjectId> {
        self.enter("create").await?;

        let mut state = self.state.lock();
        let id = ProjectId::new(format!("p{}", state.next_id));
        state.next_id += 1;
        state.sessions.insert(
            id.clone(),
            ProjectSnapshot {
                name: name.to_string(),
                status: ProjectStatus::Idle,
                metadata: ProjectMetadata {
                    width,
                    height,
                    framerate,
                    duration: 0.0,
                },
                clips: Vec::new(),
            },
        );
        debug!(%id, name, %framerate, "Stub session created");
        Ok(id)
    }

    async fn load_session(&self, id: &ProjectId) -> Result<ProjectSnapshot> {
        self.enter("load").await?;

        self.state
            .lock()
            .sessions
            .get(id)
            .cloned()
            .ok_or_else(|| CutlineError::Engine(format!("no session '{id}'")))
    }

    async fn delete_session(&self, id: &ProjectId) -> Result<bool> {
        self.enter("delete").await?;

        Ok(self.state.lock().sessions.shift_remove(id).is_some())
    }
}
