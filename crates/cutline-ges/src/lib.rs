//! Cutline GES - Engine-backed project registry
//!
//! Tracks the remote editing sessions that live in the external editing
//! engine:
//! - Engine client contract and an in-process stub engine
//! - Project model, settings validation, and templates
//! - Registry with availability/loading/error state and per-project
//!   operation serialization
//! - Fire-and-forget notification sink

pub mod engine;
pub mod notify;
pub mod project;
pub mod registry;
pub mod stub;
pub mod templates;

pub use engine::{EngineClient, ProjectSnapshot};
pub use notify::{Notice, NoticeLevel, Notifier, TracingNotifier};
pub use project::{GesProject, ProjectId, ProjectMetadata, ProjectSettings, ProjectStatus, ProjectSummary, SkippedClips};
pub use registry::{GesRegistry, RegistryView};
pub use stub::StubEngine;
pub use templates::ProjectTemplate;
