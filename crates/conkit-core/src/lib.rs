//! Conkit Core Library
//!
//! Terminal console widgets drawn into a character-cell surface: a line
//! editor with wrapping and scrolling, prefix-tree tab completion, bounded
//! history and an interactive [`Console`] widget. An [`EventRouter`] runs
//! each component on its own thread and feeds the active one from a single
//! input source.
//!
//! Surfaces and input sources are traits ([`CellSurface`], [`EventSource`]);
//! backends live in the `conkit-io` crate.

pub mod key;
pub mod key_parser;
pub mod sequence_matcher;

// Surfaces and errors
pub mod error;
pub mod surface;

// Editing engine
pub mod completion;
pub mod editor;
pub mod history;

// Widgets and routing
pub mod console;
pub mod executer;
pub mod router;

pub mod prelude;

// Re-export commonly used types for convenience
pub use key::{Event, Key, KeyEvent};
pub use key_parser::{KeyParser, ParserState};
pub use sequence_matcher::{LongestMatchResult, MatchResult, SequenceMatcher};

pub use error::{ConsoleError, ConsoleResult};
pub use surface::{Attribute, Cell, CellSurface, Color, EventSource, Rect};

pub use completion::{Completer, Completion, PrefixCompleter};
pub use editor::LineEditor;
pub use history::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};

pub use console::{layout_columns, Console, ConsoleConfig, ConsoleState, MAX_HISTORY_CAPACITY};
pub use executer::{ConsoleWriter, EchoExecuter, Execution, Executer};
pub use router::{Component, EventQueue, EventRouter, QueueSender, DEFAULT_QUEUE_CAPACITY};
