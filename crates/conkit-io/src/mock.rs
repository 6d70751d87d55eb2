//! In-memory surface for tests and headless use

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use conkit_core::{
    Attribute, Cell, CellSurface, ConsoleError, ConsoleResult, Event, EventSource, Key,
};
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A cell grid plus a scripted input stream.
///
/// Events pushed with [`push_event`](Self::push_event) and friends are
/// returned by [`EventSource::poll_event`] in order; polling blocks while
/// none are queued and fails once [`close_input`](Self::close_input) has
/// been called and the queue is drained.
pub struct MemorySurface {
    width: usize,
    height: usize,
    cells: Mutex<Vec<Cell>>,
    events_tx: Mutex<Option<Sender<Event>>>,
    events_rx: Receiver<Event>,
    flush_count: AtomicUsize,
    fail_flush: AtomicBool,
    initialized: AtomicBool,
}

impl MemorySurface {
    pub fn new(width: usize, height: usize) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            width,
            height,
            cells: Mutex::new(vec![Cell::BLANK; width * height]),
            events_tx: Mutex::new(Some(events_tx)),
            events_rx,
            flush_count: AtomicUsize::new(0),
            fail_flush: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
        }
    }

    /// Queue an input event
    pub fn push_event(&self, event: Event) {
        if let Some(sender) = lock(&self.events_tx).as_ref() {
            let _ = sender.send(event);
        }
    }

    pub fn push_key(&self, key: Key) {
        self.push_event(Event::key(key));
    }

    /// Queue one character event per char of `text`
    pub fn push_text(&self, text: &str) {
        for event in Event::text(text) {
            self.push_event(event);
        }
    }

    /// Stop accepting input; polling fails once queued events are consumed
    pub fn close_input(&self) {
        lock(&self.events_tx).take();
    }

    /// Number of queued, not yet polled events
    pub fn pending_events(&self) -> usize {
        self.events_rx.len()
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(lock(&self.cells)[y * self.width + x])
    }

    /// Text of row `y` without trailing blanks
    pub fn row_text(&self, y: usize) -> String {
        if y >= self.height {
            return String::new();
        }
        let cells = lock(&self.cells);
        let row: String = cells[y * self.width..(y + 1) * self.width]
            .iter()
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }

    /// Every row, trailing blanks trimmed
    pub fn screen_lines(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row_text(y)).collect()
    }

    /// Rows joined by newlines with trailing empty rows dropped
    pub fn screen_text(&self) -> String {
        let mut lines = self.screen_lines();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    /// Coordinates of every reverse-video cell
    pub fn highlighted_cells(&self) -> Vec<(usize, usize)> {
        lock(&self.cells)
            .iter()
            .enumerate()
            .filter(|(_, c)| c.fg.reverse)
            .map(|(i, _)| (i % self.width, i / self.width))
            .collect()
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count.load(Ordering::SeqCst)
    }

    /// Make every following flush fail
    pub fn set_flush_failure(&self, fail: bool) {
        self.fail_flush.store(fail, Ordering::SeqCst);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
}

impl CellSurface for MemorySurface {
    fn init(&self) -> ConsoleResult<()> {
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) {
        self.initialized.store(false, Ordering::SeqCst);
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_cell(&self, x: usize, y: usize, ch: char, fg: Attribute, bg: Attribute) {
        if x < self.width && y < self.height {
            lock(&self.cells)[y * self.width + x] = Cell { ch, fg, bg };
        }
    }

    fn cell_buffer(&self) -> Vec<Cell> {
        lock(&self.cells).clone()
    }

    fn flush(&self) -> ConsoleResult<()> {
        if self.fail_flush.load(Ordering::SeqCst) {
            return Err(ConsoleError::FlushFailed(
                "memory surface flush failure".to_string(),
            ));
        }
        self.flush_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl EventSource for MemorySurface {
    fn poll_event(&self) -> ConsoleResult<Event> {
        let event = self
            .events_rx
            .recv()
            .map_err(|_| ConsoleError::TerminalError("input closed".to_string()))?;
        trace!("MemorySurface: polled {event:?}");
        Ok(event)
    }
}
