// Shared helpers for console integration tests

#![allow(dead_code)]

use std::sync::Arc;

use conkit_core::{Console, Event, Key, PrefixCompleter, Rect};
use conkit_io::MemorySurface;

pub const VOCABULARY: [&str; 7] = ["a", "ab", "abc", "bad", "carrot", "jane", "jack"];

/// A started console filling a fresh memory surface
pub fn console(width: usize, height: usize) -> (Arc<MemorySurface>, Console) {
    let surface = Arc::new(MemorySurface::new(width, height));
    let mut console = Console::new(surface.clone(), Rect::full((width, height)));
    console.start();
    (surface, console)
}

/// Same as [`console`] with the standard vocabulary for completion
pub fn completing_console(width: usize, height: usize) -> (Arc<MemorySurface>, Console) {
    let (surface, console) = console(width, height);
    (surface, console.with_completer(PrefixCompleter::new(VOCABULARY)))
}

pub fn type_text(console: &mut Console, text: &str) {
    for event in Event::text(text) {
        console.handle_event(event);
    }
}

pub fn press(console: &mut Console, key: Key) {
    console.handle_event(Event::key(key));
}

/// Type a line and submit it
pub fn submit(console: &mut Console, text: &str) {
    type_text(console, text);
    press(console, Key::Enter);
}
