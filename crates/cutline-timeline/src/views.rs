//! Derived views over a clip set.
//!
//! All selectors are pure and linear in the clip count. [`ViewCache`] only
//! memoizes; it keys on the store's structural version, never on the
//! identity of the clip allocation.

use indexmap::IndexMap;
use uuid::Uuid;

use crate::clip::Clip;
use crate::layer::Layer;
use crate::store::TimelineStore;

/// Clips grouped per layer. Every layer has a bucket, in priority order;
/// clips keep their input order within a bucket.
pub type ClipsByLayer = IndexMap<Layer, Vec<Clip>>;

fn empty_buckets<T>() -> IndexMap<Layer, T>
where
    T: Default,
{
    Layer::ALL.into_iter().map(|layer| (layer, T::default())).collect()
}

/// Partition clips into per-layer buckets.
pub fn clips_by_layer<'a, I>(clips: I) -> ClipsByLayer
where
    I: IntoIterator<Item = &'a Clip>,
{
    let mut buckets: ClipsByLayer = empty_buckets();
    for clip in clips {
        buckets.entry(clip.layer).or_default().push(clip.clone());
    }
    buckets
}

/// Number of clips on each layer.
pub fn clip_counts_by_layer<'a, I>(clips: I) -> IndexMap<Layer, usize>
where
    I: IntoIterator<Item = &'a Clip>,
{
    let mut counts: IndexMap<Layer, usize> = empty_buckets();
    for clip in clips {
        *counts.entry(clip.layer).or_default() += 1;
    }
    counts
}

/// Timeline length: the latest clip end, or zero when there are no clips.
pub fn aggregate_duration<'a, I>(clips: I) -> f64
where
    I: IntoIterator<Item = &'a Clip>,
{
    clips.into_iter().map(|c| c.end).fold(0.0, f64::max)
}

/// Memoized views of one timeline store.
#[derive(Debug, Default)]
pub struct ViewCache {
    key: Option<(Uuid, u64)>,
    by_layer: ClipsByLayer,
    duration: f64,
}

impl ViewCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clips by layer for `store`, recomputed when its version moved.
    pub fn clips_by_layer(&mut self, store: &TimelineStore) -> &ClipsByLayer {
        self.refresh(store);
        &self.by_layer
    }

    /// Timeline length for `store`.
    pub fn aggregate_duration(&mut self, store: &TimelineStore) -> f64 {
        self.refresh(store);
        self.duration
    }

    fn refresh(&mut self, store: &TimelineStore) {
        let key = (store.id(), store.version());
        if self.key == Some(key) {
            return;
        }
        tracing::trace!(version = store.version(), "Recomputing timeline views");
        self.by_layer = clips_by_layer(store.clips());
        self.duration = aggregate_duration(store.clips());
        self.key = Some(key);
    }
}
