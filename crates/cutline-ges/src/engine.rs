//! Contract of the external editing engine.
//!
//! The transport is not modeled here; an implementation may talk HTTP, IPC,
//! or run in-process (see [`StubEngine`](crate::stub::StubEngine)).

use async_trait::async_trait;
use cutline_core::{FrameRate, Result};
use cutline_timeline::Clip;
use serde::{Deserialize, Serialize};

use crate::project::{ProjectId, ProjectMetadata, ProjectStatus};

/// The engine's authoritative view of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub name: String,
    pub status: ProjectStatus,
    pub metadata: ProjectMetadata,
    pub clips: Vec<Clip>,
}

/// Session API of the external editing engine.
///
/// Failures are reported as [`CutlineError::Engine`](cutline_core::CutlineError::Engine).
#[async_trait]
pub trait EngineClient: Send + Sync {
    /// Whether the engine is reachable.
    async fn probe(&self) -> bool;

    /// Create a session and return its id. The frame rate goes over the wire
    /// in its rational string form (`"30/1"`).
    async fn create_session(
        &self,
        name: &str,
        width: u32,
        height: u32,
        framerate: FrameRate,
    ) -> Result<ProjectId>;

    /// Materialize or restore a session.
    async fn load_session(&self, id: &ProjectId) -> Result<ProjectSnapshot>;

    /// Discard a session. `Ok(false)` when the engine had no such session.
    async fn delete_session(&self, id: &ProjectId) -> Result<bool>;
}
