//! Simple console demo
//!
//! Usage: cargo run --example simple_console
//! Type a word and press Tab to complete it, Enter to echo, Ctrl+C to exit.
//! Set `CONKIT_DEBUG=1` to write a debug log.

use std::sync::Arc;

use conkit::io::{create_terminal, debug};
use conkit::prelude::*;

const VOCABULARY: [&str; 7] = ["a", "ab", "abc", "bad", "carrot", "jane", "jack"];

fn main() -> ConsoleResult<()> {
    if let Some(path) = debug::init_from_env() {
        eprintln!("debug log: {}", path.display());
    }

    let terminal = create_terminal()?;
    terminal.surface.init()?;

    let rect = Rect::full(terminal.surface.size());
    let console = Console::new(terminal.surface.clone(), rect)
        .with_completer(PrefixCompleter::new(VOCABULARY));

    let mut router = EventRouter::new(Arc::clone(&terminal.source));
    router.register(console);
    let result = router.run();

    terminal.surface.close();
    if let Err(e) = &result {
        eprintln!("console failed: {e}");
    }
    result
}
