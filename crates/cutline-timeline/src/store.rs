//! The timeline store: canonical clip list, markers, project name, and
//! history.
//!
//! Every mutation validates first, then records the pre-mutation snapshot,
//! then applies. A rejected mutation leaves clips, name and history as they
//! were.

use cutline_core::{CutlineError, Result, StoreConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clip::{Clip, ClipId, ClipPatch};
use crate::edit::BulkEdit;
use crate::history::HistoryStack;
use crate::layer::{Layer, LayerFlags};
use crate::marker::{Marker, MarkerId};

/// The timeline's mutable fields at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    /// Clips in insertion order
    pub clips: Vec<Clip>,
    /// Project name
    pub project_name: String,
    /// Markers in insertion order
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl TimelineSnapshot {
    /// Check every clip and marker, and that ids are unique.
    pub fn validate(&self) -> Result<()> {
        let mut clip_ids = HashSet::new();
        for clip in &self.clips {
            clip.validate()?;
            if !clip_ids.insert(clip.id) {
                return Err(CutlineError::validation(format!(
                    "duplicate clip id {}",
                    clip.id
                )));
            }
        }
        let mut marker_ids = HashSet::new();
        for marker in &self.markers {
            marker.validate()?;
            if !marker_ids.insert(marker.id) {
                return Err(CutlineError::validation(format!(
                    "duplicate marker id {}",
                    marker.id
                )));
            }
        }
        Ok(())
    }
}

/// Owns the local timeline of one editing session.
#[derive(Debug)]
pub struct TimelineStore {
    /// Distinguishes store instances for view caching
    id: Uuid,
    clips: Vec<Clip>,
    markers: Vec<Marker>,
    project_name: String,
    history: HistoryStack<TimelineSnapshot>,
    /// Indexed by `Layer::priority`
    layer_flags: [LayerFlags; 5],
    default_name: String,
    /// Bumped on every change to clips, markers or name, including undo/redo
    version: u64,
}

impl TimelineStore {
    /// Create an empty store.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            clips: Vec::new(),
            markers: Vec::new(),
            project_name: config.default_project_name.clone(),
            history: HistoryStack::new(config.history_depth),
            layer_flags: [LayerFlags::default(); 5],
            default_name: config.default_project_name.clone(),
            version: 0,
        }
    }

    // ── Reads ───────────────────────────────────────────────────

    /// Store instance id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// All clips in insertion order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Look up a clip.
    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Number of clips.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Markers sorted by position. Markers at the same position keep the
    /// order they were added in.
    pub fn markers(&self) -> Vec<&Marker> {
        let mut markers: Vec<_> = self.markers.iter().collect();
        markers.sort_by(|a, b| a.position.total_cmp(&b.position));
        markers
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Current project name.
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Undo/redo history (for enabling controls).
    pub fn history(&self) -> &HistoryStack<TimelineSnapshot> {
        &self.history
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Structural version; changes whenever clips, markers or name change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Capture the current clips, markers and name.
    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            clips: self.clips.clone(),
            project_name: self.project_name.clone(),
            markers: self.markers.clone(),
        }
    }

    /// UI-local flags for a layer.
    pub fn layer_flags(&self, layer: Layer) -> LayerFlags {
        self.layer_flags[layer.priority() as usize]
    }

    /// Replace a layer's flags. Not recorded in history.
    pub fn set_layer_flags(&mut self, layer: Layer, flags: LayerFlags) {
        self.layer_flags[layer.priority() as usize] = flags;
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Rename the project. A blank name commits the default label.
    pub fn set_project_name(&mut self, name: &str) -> Result<()> {
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            self.default_name.clone()
        } else {
            trimmed.to_string()
        };
        if name == self.project_name {
            return Ok(());
        }

        self.commit("Rename project");
        info!(from = %self.project_name, to = %name, "Project renamed");
        self.project_name = name;
        Ok(())
    }

    /// Add a clip. Returns its id.
    pub fn add_clip(&mut self, clip: Clip) -> Result<ClipId> {
        clip.validate()?;
        self.ensure_unlocked(clip.layer)?;
        if self.clip(clip.id).is_some() {
            return Err(CutlineError::validation(format!(
                "clip id {} already exists",
                clip.id
            )));
        }

        self.commit("Add clip");
        let id = clip.id;
        debug!(clip = %id, layer = %clip.layer, start = clip.start, end = clip.end, "Clip added");
        self.clips.push(clip);
        Ok(id)
    }

    /// Apply a partial update to a clip, keeping its position in the list.
    pub fn update_clip(&mut self, id: ClipId, patch: &ClipPatch) -> Result<()> {
        let index = self.index_of(id)?;
        let current = &self.clips[index];
        let patched = patch.apply_to(current);
        patched.validate()?;
        self.ensure_unlocked(current.layer)?;
        self.ensure_unlocked(patched.layer)?;

        self.commit("Update clip");
        debug!(clip = %id, "Clip updated");
        self.clips[index] = patched;
        Ok(())
    }

    /// Remove a clip. Returns the removed clip.
    pub fn remove_clip(&mut self, id: ClipId) -> Result<Clip> {
        let index = self.index_of(id)?;
        self.ensure_unlocked(self.clips[index].layer)?;

        self.commit("Remove clip");
        debug!(clip = %id, "Clip removed");
        Ok(self.clips.remove(index))
    }

    /// Place a clip on `layer` between `start` and `end`.
    ///
    /// A clip that changes layer moves to the end of the list so it is the
    /// last entry in its new layer's bucket; same-layer moves keep their slot.
    pub fn reorder_or_relayer_clip(
        &mut self,
        id: ClipId,
        layer: Layer,
        start: f64,
        end: f64,
    ) -> Result<()> {
        let index = self.index_of(id)?;
        let current = &self.clips[index];
        let mut placed = current.clone();
        placed.layer = layer;
        placed.start = start;
        placed.end = end;
        placed.validate()?;
        self.ensure_unlocked(current.layer)?;
        self.ensure_unlocked(layer)?;

        let relayered = current.layer != layer;
        self.commit(if relayered { "Move clip to layer" } else { "Move clip" });
        debug!(clip = %id, layer = %layer, start, end, relayered, "Clip placed");
        if relayered {
            self.clips.remove(index);
            self.clips.push(placed);
        } else {
            self.clips[index] = placed;
        }
        Ok(())
    }

    /// Move a clip to a new start time, keeping its duration.
    pub fn move_clip(&mut self, id: ClipId, new_start: f64) -> Result<()> {
        let clip = self.clip(id).ok_or_else(|| CutlineError::not_found("clip", id))?;
        let (layer, duration) = (clip.layer, clip.duration());
        self.reorder_or_relayer_clip(id, layer, new_start, new_start + duration)
    }

    /// Change a clip's duration and optionally its source in point.
    pub fn trim_clip(&mut self, id: ClipId, new_duration: f64, new_in_point: Option<f64>) -> Result<()> {
        let clip = self.clip(id).ok_or_else(|| CutlineError::not_found("clip", id))?;
        let patch = ClipPatch {
            end: Some(clip.start + new_duration),
            in_point: new_in_point,
            ..ClipPatch::default()
        };
        self.update_clip(id, &patch)
    }

    /// Apply `edit` to every clip in `ids` as a single history entry.
    ///
    /// The whole batch is rejected if any id is unknown, sits on a locked
    /// layer, or would leave a clip invalid. Returns the ids of the edited
    /// clips, or of the new copies for [`BulkEdit::Duplicate`].
    pub fn bulk_edit(&mut self, ids: &[ClipId], edit: BulkEdit) -> Result<Vec<ClipId>> {
        if ids.is_empty() {
            return Err(CutlineError::validation("no clips selected"));
        }
        let mut selected = Vec::with_capacity(ids.len());
        for &id in ids {
            let index = self.index_of(id)?;
            self.ensure_unlocked(self.clips[index].layer)?;
            if !selected.contains(&index) {
                selected.push(index);
            }
        }

        let mut clips = self.clips.clone();
        let mut affected = Vec::with_capacity(selected.len());
        match edit {
            BulkEdit::Shift { offset } => {
                for &i in &selected {
                    clips[i].start += offset;
                    clips[i].end += offset;
                    affected.push(clips[i].id);
                }
            }
            BulkEdit::Delete => {
                affected.extend(selected.iter().map(|&i| clips[i].id));
                clips.retain(|c| !affected.contains(&c.id));
            }
            BulkEdit::Duplicate { offset } => {
                for &i in &selected {
                    let mut copy = clips[i].clone();
                    copy.id = Uuid::new_v4();
                    copy.start += offset;
                    copy.end += offset;
                    affected.push(copy.id);
                    clips.push(copy);
                }
            }
            BulkEdit::Mute | BulkEdit::Unmute => {
                let muted = edit == BulkEdit::Mute;
                for &i in &selected {
                    clips[i].muted = muted;
                    affected.push(clips[i].id);
                }
            }
        }

        self.replace_clips(edit.label(), clips)?;
        debug!(op = edit.label(), clips = affected.len(), "Bulk edit applied");
        Ok(affected)
    }

    /// Open a gap of `duration` seconds at `position`: every clip starting
    /// at or after `position` moves later. Returns the moved clip ids.
    pub fn ripple_insert(&mut self, position: f64, duration: f64) -> Result<Vec<ClipId>> {
        check_position(position)?;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(CutlineError::validation(format!(
                "ripple duration must be positive, got {duration}"
            )));
        }

        let mut clips = self.clips.clone();
        let moved = self.shift_later(&mut clips, position, duration, None)?;
        self.replace_clips("Ripple insert", clips)?;
        info!(position, duration, moved = moved.len(), "Ripple insert");
        Ok(moved)
    }

    /// Remove the first clip covering `position` and close the gap: clips
    /// starting at or after its end move earlier by its duration.
    pub fn ripple_delete(&mut self, position: f64) -> Result<Clip> {
        check_position(position)?;
        let index = self
            .clips
            .iter()
            .position(|c| c.start <= position && position < c.end)
            .ok_or_else(|| CutlineError::NotFound(format!("clip at {position}s")))?;
        self.ensure_unlocked(self.clips[index].layer)?;

        let mut clips = self.clips.clone();
        let removed = clips.remove(index);
        let moved = self.shift_later(&mut clips, removed.end, -removed.duration(), None)?;
        self.replace_clips("Ripple delete", clips)?;
        info!(clip = %removed.id, moved = moved.len(), "Ripple delete");
        Ok(removed)
    }

    /// Change a clip's duration and move every clip that started at or after
    /// its old end by the same amount. Returns the moved clip ids.
    pub fn ripple_trim(&mut self, id: ClipId, new_duration: f64) -> Result<Vec<ClipId>> {
        let index = self.index_of(id)?;
        self.ensure_unlocked(self.clips[index].layer)?;

        let mut clips = self.clips.clone();
        let old_end = clips[index].end;
        clips[index].end = clips[index].start + new_duration;
        let delta = clips[index].end - old_end;
        let moved = self.shift_later(&mut clips, old_end, delta, Some(id))?;
        self.replace_clips("Ripple trim", clips)?;
        info!(clip = %id, delta, moved = moved.len(), "Ripple trim");
        Ok(moved)
    }

    /// Add a marker. Returns its id.
    pub fn add_marker(&mut self, marker: Marker) -> Result<MarkerId> {
        marker.validate()?;
        if self.marker(marker.id).is_some() {
            return Err(CutlineError::validation(format!(
                "marker id {} already exists",
                marker.id
            )));
        }

        self.commit("Add marker");
        let id = marker.id;
        debug!(marker = %id, position = marker.position, name = %marker.name, "Marker added");
        self.markers.push(marker);
        Ok(id)
    }

    /// Remove a marker. Returns the removed marker.
    pub fn remove_marker(&mut self, id: MarkerId) -> Result<Marker> {
        let index = self
            .markers
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| CutlineError::not_found("marker", id))?;

        self.commit("Remove marker");
        debug!(marker = %id, "Marker removed");
        Ok(self.markers.remove(index))
    }

    /// Undo the last edit. Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.snapshot()) {
            Some(prev) => {
                self.restore(prev);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone edit. Returns false when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.snapshot()) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    /// Replace the whole timeline (e.g. after opening a file) and clear history.
    pub fn open(&mut self, snapshot: TimelineSnapshot) -> Result<()> {
        snapshot.validate()?;

        info!(clips = snapshot.clips.len(), markers = snapshot.markers.len(), name = %snapshot.project_name, "Timeline opened");
        self.history.clear();
        self.restore(snapshot);
        if self.project_name.trim().is_empty() {
            self.project_name = self.default_name.clone();
        }
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn commit(&mut self, label: &str) {
        self.history.record(label, self.snapshot());
        self.version += 1;
    }

    fn restore(&mut self, snapshot: TimelineSnapshot) {
        self.clips = snapshot.clips;
        self.markers = snapshot.markers;
        self.project_name = snapshot.project_name;
        self.version += 1;
    }

    /// Validate and install a new clip list as one history entry. Nothing
    /// is recorded when the list is unchanged.
    fn replace_clips(&mut self, label: &str, clips: Vec<Clip>) -> Result<()> {
        for clip in &clips {
            clip.validate()?;
        }
        if clips != self.clips {
            self.commit(label);
            self.clips = clips;
        }
        Ok(())
    }

    /// Move every clip in `clips` that starts at or after `from` by `delta`,
    /// skipping `except`.
    fn shift_later(
        &self,
        clips: &mut [Clip],
        from: f64,
        delta: f64,
        except: Option<ClipId>,
    ) -> Result<Vec<ClipId>> {
        let mut moved = Vec::new();
        for clip in clips
            .iter_mut()
            .filter(|c| c.start >= from && Some(c.id) != except)
        {
            self.ensure_unlocked(clip.layer)?;
            clip.start += delta;
            clip.end += delta;
            moved.push(clip.id);
        }
        Ok(moved)
    }

    fn index_of(&self, id: ClipId) -> Result<usize> {
        self.clips
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CutlineError::not_found("clip", id))
    }

    fn ensure_unlocked(&self, layer: Layer) -> Result<()> {
        if self.layer_flags(layer).locked {
            return Err(CutlineError::validation(format!("layer {layer} is locked")));
        }
        Ok(())
    }
}

/// A clone is a separate store with its own id, so views cached for one are
/// never served for the other.
impl Clone for TimelineStore {
    fn clone(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            clips: self.clips.clone(),
            markers: self.markers.clone(),
            project_name: self.project_name.clone(),
            history: self.history.clone(),
            layer_flags: self.layer_flags,
            default_name: self.default_name.clone(),
            version: self.version,
        }
    }
}

fn check_position(position: f64) -> Result<()> {
    if !position.is_finite() || position < 0.0 {
        return Err(CutlineError::validation(format!(
            "position must be a non-negative number, got {position}"
        )));
    }
    Ok(())
}

impl Default for TimelineStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

// ── Tests ───────────────────────────────────────────────────────
