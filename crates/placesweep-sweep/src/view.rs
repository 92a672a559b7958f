//! Per-result view state (map markers) kept in step with the result set.

use std::collections::HashMap;

use placesweep_core::{LatLng, PlaceId, PlaceResult};

/// Mirrors the accumulated result set onto a view surface.
///
/// Only [`crate::Session`] calls these hooks, always inside the same critical
/// section that changed the result set.
pub trait ViewReconciler: Send {
    /// Creates a marker for `result` unless one already exists for its id.
    fn on_result_inserted(&mut self, result: &PlaceResult);

    /// Destroys the marker for `id`; no-op when absent.
    fn on_result_removed(&mut self, id: &PlaceId);

    /// Destroys every marker.
    fn on_bulk_clear(&mut self);

    /// Ids that currently have a marker, in no particular order.
    fn marker_ids(&self) -> Vec<PlaceId>;
}

/// Opaque handle to a marker on the view surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub handle: MarkerHandle,
    pub position: LatLng,
}

/// Headless reconciler: tracks markers in memory without drawing anything.
#[derive(Debug, Default)]
pub struct MarkerBoard {
    markers: HashMap<PlaceId, Marker>,
    next_handle: u64,
}

impl MarkerBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &PlaceId) -> Option<&Marker> {
        self.markers.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl ViewReconciler for MarkerBoard {
    fn on_result_inserted(&mut self, result: &PlaceResult) {
        if self.markers.contains_key(&result.id) {
            tracing::warn!(place_id = %result.id, "marker already present; keeping existing one");
            return;
        }
        self.next_handle += 1;
        self.markers.insert(
            result.id.clone(),
            Marker {
                handle: MarkerHandle(self.next_handle),
                position: result.detail.location,
            },
        );
    }

    fn on_result_removed(&mut self, id: &PlaceId) {
        self.markers.remove(id);
    }

    fn on_bulk_clear(&mut self) {
        self.markers.clear();
    }

    fn marker_ids(&self) -> Vec<PlaceId> {
        self.markers.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placesweep_core::{PlaceDetail, Query};

    fn result(id: &str, lat: f64, lng: f64) -> PlaceResult {
        PlaceResult {
            id: PlaceId::from(id),
            query: Query::parse("cafe").unwrap(),
            detail: PlaceDetail {
                name: format!("Place {id}"),
                formatted_address: None,
                phone: None,
                website: None,
                rating: None,
                rating_count: None,
                categories: Vec::new(),
                photo_ref: None,
                url: None,
                location: LatLng::new(lat, lng),
            },
        }
    }

    #[test]
    fn insert_creates_marker_at_result_location() {
        let mut board = MarkerBoard::new();
        board.on_result_inserted(&result("A", 1.0, 2.0));
        let marker = board.get(&PlaceId::from("A")).expect("marker created");
        assert_eq!(marker.position, LatLng::new(1.0, 2.0));
    }

    #[test]
    fn insert_is_idempotent_per_id() {
        let mut board = MarkerBoard::new();
        board.on_result_inserted(&result("A", 1.0, 2.0));
        let first = board.get(&PlaceId::from("A")).cloned().unwrap();

        board.on_result_inserted(&result("A", 9.0, 9.0));
        assert_eq!(board.len(), 1);
        assert_eq!(board.get(&PlaceId::from("A")), Some(&first));
    }

    #[test]
    fn remove_absent_id_is_a_no_op() {
        let mut board = MarkerBoard::new();
        board.on_result_inserted(&result("A", 1.0, 2.0));
        board.on_result_removed(&PlaceId::from("Z"));
        assert_eq!(board.marker_ids(), vec![PlaceId::from("A")]);
    }

    #[test]
    fn bulk_clear_destroys_every_marker() {
        let mut board = MarkerBoard::new();
        board.on_result_inserted(&result("A", 1.0, 2.0));
        board.on_result_inserted(&result("B", 3.0, 4.0));
        board.on_bulk_clear();
        assert!(board.is_empty());
    }

    #[test]
    fn handles_are_not_reused_after_removal() {
        let mut board = MarkerBoard::new();
        board.on_result_inserted(&result("A", 1.0, 2.0));
        let old = board.get(&PlaceId::from("A")).unwrap().handle;
        board.on_result_removed(&PlaceId::from("A"));
        board.on_result_inserted(&result("A", 1.0, 2.0));
        assert_ne!(board.get(&PlaceId::from("A")).unwrap().handle, old);
    }
}
