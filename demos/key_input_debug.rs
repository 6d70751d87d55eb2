//! Key input debug demo
//!
//! Usage: cargo run --example key_input_debug
//! Shows every decoded event. Press Escape or Ctrl+C to exit.

use std::sync::Arc;

use conkit::io::{create_terminal, debug};
use conkit::prelude::*;

/// Writes one line per event until Escape or Ctrl+C
struct KeyLog {
    editor: LineEditor,
}

fn describe(event: &Event) -> String {
    match event {
        Event::Key(key) => match key.ch {
            Some(ch) => format!("Key(key={:?}, ch={ch:?})", key.key),
            None => format!("Key(key={:?})", key.key),
        },
        Event::Resize { width, height } => format!("Resize({width}x{height})"),
    }
}

impl Component for KeyLog {
    fn name(&self) -> &str {
        "keylog"
    }

    fn run(&mut self, queue: &EventQueue) -> ConsoleResult<()> {
        self.editor.write_line("Press keys to see decoded events. Escape or Ctrl+C exits.");
        self.editor.surface().flush()?;

        while let Some(event) = queue.poll_event() {
            self.editor.write_line(&describe(&event));
            self.editor.surface().flush()?;
            if let Event::Key(KeyEvent {
                key: Key::Escape | Key::ControlC,
                ..
            }) = event
            {
                break;
            }
        }
        Ok(())
    }
}

fn main() -> ConsoleResult<()> {
    debug::init_from_env();

    let terminal = create_terminal()?;
    terminal.surface.init()?;

    let editor = LineEditor::new(
        terminal.surface.clone(),
        Rect::full(terminal.surface.size()),
    );
    let mut router = EventRouter::new(Arc::clone(&terminal.source));
    router.register(KeyLog { editor });
    let result = router.run();

    terminal.surface.close();
    result
}
