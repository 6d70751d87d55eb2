//! # Conkit: terminal console widgets
//!
//! Conkit draws interactive line-oriented widgets into a character-cell
//! surface and routes keyboard input between them.
//!
//! ```no_run
//! use std::sync::Arc;
//! use conkit::prelude::*;
//!
//! fn main() -> ConsoleResult<()> {
//!     let terminal = conkit::io::create_terminal()?;
//!     terminal.surface.init()?;
//!
//!     let console = Console::new(terminal.surface.clone(), Rect::full(terminal.surface.size()))
//!         .with_completer(PrefixCompleter::new(["help", "history", "quit"]));
//!
//!     let mut router = EventRouter::new(Arc::clone(&terminal.source));
//!     router.register(console);
//!     let result = router.run();
//!
//!     terminal.surface.close();
//!     result
//! }
//! ```
//!
//! The crate is split in two layers:
//!
//! - `conkit-core`: keys and decoding, the line editor, completion, history,
//!   the [`Console`] widget and the [`EventRouter`]
//! - `conkit-io`: surface backends, the Unix terminal and an in-memory grid

pub use conkit_core::*;

/// Surface backends
pub mod io {
    pub use conkit_io::{create_terminal, debug, MemorySurface, TerminalHandle};

    #[cfg(unix)]
    pub use conkit_io::UnixTerminal;
}

pub mod prelude {
    pub use conkit_core::prelude::*;
    pub use conkit_io::{create_terminal, MemorySurface, TerminalHandle};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_facade_runs_console_on_memory_surface() {
        let memory = Arc::new(MemorySurface::new(20, 4));
        let handle = TerminalHandle::shared(memory.clone());

        let console = Console::new(handle.surface.clone(), Rect::full((20, 4)));
        let mut router = EventRouter::new(handle.source.clone());
        router.register(console);

        memory.push_text("hi");
        memory.push_key(Key::Enter);
        memory.push_key(Key::ControlC);
        router.run().unwrap();

        assert_eq!(memory.row_text(0), "> hi");
        assert_eq!(memory.row_text(1), "hi");
    }
}
