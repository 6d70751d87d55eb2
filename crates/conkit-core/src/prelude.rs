//! Convenient re-exports for common usage patterns
//!
//! ```
//! use conkit_core::prelude::*;
//!
//! let completer = PrefixCompleter::new(["help", "history"]);
//! assert_eq!(completer.complete("he").prefix, "help");
//! ```

// Widgets
pub use crate::console::{Console, ConsoleConfig, ConsoleState};
pub use crate::editor::LineEditor;
pub use crate::executer::{ConsoleWriter, EchoExecuter, Execution, Executer};

// Completion and history
pub use crate::completion::{Completer, Completion, PrefixCompleter};
pub use crate::history::HistoryBuffer;

// Routing and input
pub use crate::key::{Event, Key, KeyEvent};
pub use crate::router::{Component, EventQueue, EventRouter};

// Surfaces
pub use crate::surface::{Attribute, CellSurface, Color, EventSource, Rect};

// Error handling
pub use crate::error::{ConsoleError, ConsoleResult};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let _key = Key::Enter;
        let _config = ConsoleConfig::default();
        let _history = HistoryBuffer::default();
        let _rect = Rect::full((80, 24));
        let _result: ConsoleResult<()> = Ok(());
    }
}
