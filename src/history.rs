use std::collections::VecDeque;

/// Number of snapshots kept when nothing else is configured
pub const DEFAULT_CAPACITY: usize = 10;

/// Bounded undo/redo history of whole-bitmap snapshots.
///
/// The snapshot at `cursor` is the live one: edits write straight into it via
/// [`HistoryRing::current_mut`]. Before each edit [`HistoryRing::capture_before_edit`]
/// pushes a copy of the current state, so the state the edit starts from stays
/// reachable by undo.
///
/// Invariant: `0 <= cursor <= redo_limit < capacity`, and `redo_limit` is
/// always the last stored snapshot.
#[derive(Debug, Clone)]
pub struct HistoryRing<T> {
    /// Oldest first
    snapshots: VecDeque<T>,
    cursor: usize,
    capacity: usize,
}

impl<T: Clone> HistoryRing<T> {
    /// Creates a history holding only `initial`. A capacity of zero is treated as one.
    pub fn new(initial: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut snapshots = VecDeque::with_capacity(capacity);
        snapshots.push_back(initial);
        Self {
            snapshots,
            cursor: 0,
            capacity,
        }
    }

    /// Open a fresh slot for the next edit.
    ///
    /// Any redo branch beyond the cursor is dropped. When the ring is full the
    /// oldest snapshot is evicted instead of growing. Afterwards the snapshot
    /// at `cursor` is an independent copy of the previous state and the one
    /// before it holds that state untouched.
    pub fn capture_before_edit(&mut self) {
        self.snapshots.truncate(self.cursor + 1);
        let copy = self.snapshots[self.cursor].clone();

        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
            log::debug!("History full, evicted oldest snapshot");
        }

        self.snapshots.push_back(copy);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. Returns false when already at the oldest.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        log::debug!("Undo to snapshot {} of {}", self.cursor, self.snapshots.len());
        true
    }

    /// Step forward one snapshot. Returns false when nothing was undone.
    pub fn redo(&mut self) -> bool {
        if self.cursor == self.redo_limit() {
            return false;
        }
        self.cursor += 1;
        log::debug!("Redo to snapshot {} of {}", self.cursor, self.snapshots.len());
        true
    }

    /// Forget everything and start over from `snapshot`
    pub fn reset(&mut self, snapshot: T) {
        self.snapshots.clear();
        self.snapshots.push_back(snapshot);
        self.cursor = 0;
    }

    /// The snapshot currently on display
    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// The snapshot currently on display, for the running edit to draw into
    pub fn current_mut(&mut self) -> &mut T {
        &mut self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Highest cursor position redo can reach
    pub fn redo_limit(&self) -> usize {
        self.snapshots.len() - 1
    }

    /// Number of snapshots currently stored
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if there is an older snapshot to go back to
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Returns true if there are undone snapshots to go forward to
    pub fn can_redo(&self) -> bool {
        self.cursor < self.redo_limit()
    }
}
