//! Bounded command history with up/down browsing.

/// Default number of remembered lines
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Fixed-capacity ring of submitted lines.
///
/// The browse offset is relative to the live line: 0 is the line being
/// edited, -1 the most recent entry, and so on. The live line is saved as a
/// draft when browsing starts and handed back when browsing returns to 0.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    slots: Vec<String>,
    /// Total lines ever recorded
    write_index: usize,
    offset: isize,
    draft: String,
}

impl HistoryBuffer {
    /// Create an empty history. A zero capacity is raised to one slot.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![String::new(); capacity.max(1)],
            write_index: 0,
            offset: 0,
            draft: String::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of entries currently retained
    pub fn len(&self) -> usize {
        self.write_index.min(self.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.write_index == 0
    }

    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Whether an older entry is currently shown instead of the live line
    pub fn is_browsing(&self) -> bool {
        self.offset != 0
    }

    /// Append a submitted line. Empty lines are not stored.
    pub fn record(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        let slot = self.write_index % self.capacity();
        self.slots[slot] = line.to_string();
        self.write_index += 1;
    }

    /// Step one entry back in time.
    ///
    /// `live` is the line currently being edited; it is kept as the draft
    /// when browsing starts. Returns `None` once the oldest retained entry is
    /// reached.
    pub fn recall_older(&mut self, live: &str) -> Option<&str> {
        let next = self.offset - 1;
        if next.unsigned_abs() > self.len() {
            return None;
        }
        if self.offset == 0 {
            self.draft = live.to_string();
        }
        self.offset = next;
        Some(self.slot_at_offset())
    }

    /// Step one entry forward; returns the saved draft when arriving back at
    /// the live line, `None` when already there.
    pub fn recall_newer(&mut self) -> Option<&str> {
        match self.offset {
            0 => None,
            -1 => {
                self.offset = 0;
                Some(&self.draft)
            }
            _ => {
                self.offset += 1;
                Some(self.slot_at_offset())
            }
        }
    }

    /// Return to the live line and forget the draft
    pub fn reset(&mut self) {
        self.offset = 0;
        self.draft.clear();
    }

    /// Retained entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &str> + '_ {
        let start = self.write_index - self.len();
        (start..self.write_index).map(move |i| self.slots[i % self.capacity()].as_str())
    }

    fn slot_at_offset(&self) -> &str {
        debug_assert!(self.offset < 0);
        let index = self.write_index - self.offset.unsigned_abs();
        &self.slots[index % self.capacity()]
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
