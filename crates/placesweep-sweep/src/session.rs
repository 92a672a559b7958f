//! The single writer of the accumulated result set.
//!
//! Every mutation (page merge, single removal, bulk clear) takes the session
//! lock once, updates the result set and the view reconciler together, and
//! releases it before returning. The lock is never held across an `.await`,
//! so merges always see the most recently committed set.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use placesweep_core::{PlaceDetail, PlaceId, PlaceResult, Query, Region};

use crate::view::{MarkerBoard, ViewReconciler};

/// What a single merge changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Results appended by this merge.
    pub added: usize,
    /// Details dropped because their id was already present.
    pub skipped: usize,
    /// Size of the result set after the merge.
    pub total: usize,
}

struct SessionState {
    region: Option<Region>,
    results: IndexMap<PlaceId, PlaceResult>,
    view: Box<dyn ViewReconciler>,
}

/// Shared handle to one search session. Cloning is cheap and every clone
/// sees the same state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(MarkerBoard::new())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Session")
            .field("region", &state.region)
            .field("results", &state.results.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(view: impl ViewReconciler + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                region: None,
                results: IndexMap::new(),
                view: Box::new(view),
            })),
        }
    }

    /// Replaces the active region. Existing results are kept.
    pub fn set_region(&self, region: Region) {
        self.inner.lock().region = Some(region);
    }

    /// Removes the active region, returning it.
    pub fn clear_region(&self) -> Option<Region> {
        self.inner.lock().region.take()
    }

    #[must_use]
    pub fn region(&self) -> Option<Region> {
        self.inner.lock().region.clone()
    }

    /// Snapshot of the results in display (insertion) order.
    #[must_use]
    pub fn results(&self) -> Vec<PlaceResult> {
        self.inner.lock().results.values().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, id: &PlaceId) -> Option<PlaceResult> {
        self.inner.lock().results.get(id).cloned()
    }

    /// Result ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<PlaceId> {
        self.inner.lock().results.keys().cloned().collect()
    }

    pub(crate) fn id_set(&self) -> HashSet<PlaceId> {
        self.inner.lock().results.keys().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, id: &PlaceId) -> bool {
        self.inner.lock().results.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().results.is_empty()
    }

    /// Ids that currently have a marker.
    #[must_use]
    pub fn marker_ids(&self) -> Vec<PlaceId> {
        self.inner.lock().view.marker_ids()
    }

    /// Appends `details` as results tagged with `query`, in the given order.
    ///
    /// Membership is checked against the live set inside the lock, so an id
    /// inserted by another run in the meantime is skipped (first write wins)
    /// and an id the user removed in the meantime is inserted again.
    pub(crate) fn merge(&self, query: &Query, details: Vec<(PlaceId, PlaceDetail)>) -> MergeOutcome {
        let mut state = self.inner.lock();
        let SessionState { results, view, .. } = &mut *state;

        let mut added = 0;
        let mut skipped = 0;
        for (id, detail) in details {
            if results.contains_key(&id) {
                tracing::debug!(place_id = %id, query = %query, "already in result set; keeping first");
                skipped += 1;
                continue;
            }
            let result = PlaceResult {
                id: id.clone(),
                query: query.clone(),
                detail,
            };
            view.on_result_inserted(&result);
            results.insert(id, result);
            added += 1;
        }

        MergeOutcome {
            added,
            skipped,
            total: results.len(),
        }
    }

    /// Removes one result and its marker. Display order of the rest is kept.
    pub fn remove(&self, id: &PlaceId) -> Option<PlaceResult> {
        let mut state = self.inner.lock();
        let removed = state.results.shift_remove(id)?;
        state.view.on_result_removed(id);
        tracing::debug!(place_id = %id, "result removed");
        Some(removed)
    }

    /// Removes every result and marker, returning how many results there were.
    pub fn clear(&self) -> usize {
        let mut state = self.inner.lock();
        let count = state.results.len();
        state.results.clear();
        state.view.on_bulk_clear();
        tracing::debug!(count, "results cleared");
        count
    }
}
