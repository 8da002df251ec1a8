//! Cutline Timeline - Editable timeline store
//!
//! Implements the local editing model:
//! - Clips placed on a fixed set of layers
//! - Snapshot-based undo/redo history
//! - Timeline store with validated, history-recorded mutations, including
//!   bulk and ripple edits and markers
//! - Derived views (clips by layer, per-layer counts, timeline length)
//! - Tagged JSON timeline files

pub mod clip;
pub mod edit;
pub mod history;
pub mod layer;
pub mod marker;
pub mod persist;
pub mod store;
pub mod views;

pub use clip::{Clip, ClipId, ClipKind, ClipPatch};
pub use edit::BulkEdit;
pub use history::{HistoryEntry, HistoryStack};
pub use layer::{Layer, LayerFlags};
pub use marker::{Marker, MarkerId};
pub use persist::TimelineFile;
pub use store::{TimelineSnapshot, TimelineStore};
pub use views::{aggregate_duration, clip_counts_by_layer, clips_by_layer, ClipsByLayer, ViewCache};
