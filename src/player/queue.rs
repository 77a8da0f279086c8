use super::types::{QueueSnapshot, Track};
use std::sync::Arc;

/// Holds the authoritative queue snapshot plus an optional optimistic view
/// of the upcoming list.
///
/// The overlay only exists between a local edit (move/remove) and the next
/// server snapshot; it is never folded back into the authoritative list.
#[derive(Debug, Default)]
pub struct QueueStore {
    snapshot: Arc<QueueSnapshot>,
    pending_upcoming: Option<Vec<Track>>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything at once. Drops any optimistic overlay.
    pub fn apply(&mut self, snapshot: QueueSnapshot) {
        self.snapshot = Arc::new(snapshot);
        self.pending_upcoming = None;
    }

    pub fn snapshot(&self) -> Arc<QueueSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn current(&self) -> Option<&Track> {
        self.snapshot.current.as_ref()
    }

    pub fn previous(&self) -> &[Track] {
        &self.snapshot.previous
    }

    /// Authoritative upcoming list.
    pub fn upcoming(&self) -> &[Track] {
        &self.snapshot.upcoming
    }

    /// What the queue view should show: local edits first, then the server.
    pub fn upcoming_view(&self) -> &[Track] {
        self.pending_upcoming
            .as_deref()
            .unwrap_or(&self.snapshot.upcoming)
    }

    pub fn has_pending_edits(&self) -> bool {
        self.pending_upcoming.is_some()
    }

    /// Throw away local edits the server refused. Returns true if there
    /// were any.
    pub fn discard_pending(&mut self) -> bool {
        self.pending_upcoming.take().is_some()
    }

    /// Reorder the view the same way the server will: take the track out of
    /// `from`, shift `to` down by one if it was after `from`, insert.
    pub fn optimistic_move(&mut self, from: usize, to: usize) -> bool {
        let len = self.upcoming_view().len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }

        let list = self.pending_mut();
        let track = list.remove(from);
        let to = if to > from { to - 1 } else { to };
        list.insert(to, track);
        true
    }

    pub fn optimistic_remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.upcoming_view().len() {
            return None;
        }
        Some(self.pending_mut().remove(index))
    }

    fn pending_mut(&mut self) -> &mut Vec<Track> {
        let snapshot = &self.snapshot;
        self.pending_upcoming
            .get_or_insert_with(|| snapshot.upcoming.clone())
    }
}
