//! Interactive command-line widget.
//!
//! A [`Console`] reads key events from its queue, edits the current line in
//! its [`LineEditor`], browses history, completes with the configured
//! [`Completer`] and hands submitted lines to its [`Executer`].

use crate::completion::Completer;
use crate::editor::LineEditor;
use crate::error::{ConsoleError, ConsoleResult};
use crate::executer::{ConsoleWriter, EchoExecuter, Executer};
use crate::history::{HistoryBuffer, DEFAULT_HISTORY_CAPACITY};
use crate::key::{Event, Key, KeyEvent};
use crate::router::{Component, EventQueue};
use crate::surface::{CellSurface, Rect};
use log::{debug, error, info, trace};
use std::sync::Arc;
use unicode_width::UnicodeWidthChar;

/// Largest accepted history capacity
pub const MAX_HISTORY_CAPACITY: usize = 100_000;

/// Console widget configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Text printed before every input line
    pub prompt: String,
    /// Number of submitted lines remembered for up/down recall
    pub history_capacity: usize,
    /// Blank cells between completion columns
    pub column_padding: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            column_padding: 2,
        }
    }
}

impl ConsoleConfig {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_column_padding(mut self, padding: usize) -> Self {
        self.column_padding = padding;
        self
    }

    pub fn validate(&self) -> ConsoleResult<()> {
        if self.prompt.is_empty() {
            return Err(ConsoleError::ConfigurationError(
                "Prompt cannot be empty".to_string(),
            ));
        }

        if self.prompt.chars().any(|c| c.is_control()) {
            return Err(ConsoleError::ConfigurationError(
                "Prompt cannot contain control characters".to_string(),
            ));
        }

        if self.history_capacity == 0 {
            return Err(ConsoleError::ConfigurationError(
                "History capacity must be greater than 0".to_string(),
            ));
        }

        if self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConsoleError::ConfigurationError(format!(
                "History capacity cannot exceed {MAX_HISTORY_CAPACITY}"
            )));
        }

        Ok(())
    }
}

/// Lifecycle of a console widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleState {
    AwaitingInput,
    Terminated,
}

pub struct Console {
    editor: LineEditor,
    history: HistoryBuffer,
    completer: Option<Box<dyn Completer>>,
    executer: Box<dyn Executer>,
    config: ConsoleConfig,
    state: ConsoleState,
    last_status: i32,
    started: bool,
}

impl Console {
    /// Console with the default configuration and an [`EchoExecuter`]
    pub fn new(surface: Arc<dyn CellSurface>, rect: Rect) -> Self {
        Self::build(surface, rect, ConsoleConfig::default())
    }

    pub fn with_config(
        surface: Arc<dyn CellSurface>,
        rect: Rect,
        config: ConsoleConfig,
    ) -> ConsoleResult<Self> {
        config.validate()?;
        Ok(Self::build(surface, rect, config))
    }

    fn build(surface: Arc<dyn CellSurface>, rect: Rect, config: ConsoleConfig) -> Self {
        Self {
            editor: LineEditor::new(surface, rect),
            history: HistoryBuffer::new(config.history_capacity),
            completer: None,
            executer: Box::new(EchoExecuter),
            config,
            state: ConsoleState::AwaitingInput,
            last_status: 0,
            started: false,
        }
    }

    pub fn with_executer(mut self, executer: impl Executer + 'static) -> Self {
        self.set_executer(executer);
        self
    }

    pub fn with_completer(mut self, completer: impl Completer + 'static) -> Self {
        self.set_completer(completer);
        self
    }

    pub fn set_executer(&mut self, executer: impl Executer + 'static) {
        self.executer = Box::new(executer);
    }

    pub fn set_completer(&mut self, completer: impl Completer + 'static) {
        self.completer = Some(Box::new(completer));
    }

    pub fn state(&self) -> ConsoleState {
        self.state
    }

    /// Status returned by the most recent command
    pub fn last_status(&self) -> i32 {
        self.last_status
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Print the first prompt. Called by [`run`](Self::run); only needed
    /// when driving the console with [`handle_event`](Self::handle_event).
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            self.editor.begin_prompt(&self.config.prompt);
        }
    }

    /// Consume events from `queue` until terminated or the queue disconnects
    pub fn run(&mut self, queue: &EventQueue) -> ConsoleResult<()> {
        self.start();
        self.present()?;

        while self.state == ConsoleState::AwaitingInput {
            let Some(event) = queue.poll_event() else {
                debug!("Console: event queue disconnected");
                break;
            };
            self.handle_event(event);
            self.present()?;
        }

        info!("Console: stopped with status {}", self.last_status);
        Ok(())
    }

    fn present(&self) -> ConsoleResult<()> {
        self.editor.surface().flush().map_err(|e| {
            error!("Console: flush failed: {e}");
            e
        })
    }

    /// Apply one input event
    pub fn handle_event(&mut self, event: Event) {
        if self.state == ConsoleState::Terminated {
            return;
        }
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize { width, height } => {
                debug!("Console: resize to {width}x{height} ignored");
            }
        }
    }

    fn handle_key(&mut self, event: KeyEvent) {
        trace!("Console: key {event:?}");

        if let Some(ch) = event.printable() {
            if ch.width() == Some(1) {
                let offset = self.editor.cursor_offset();
                self.editor.insert_at(offset, ch);
            } else {
                trace!("Console: dropping non single-cell character {ch:?}");
            }
            return;
        }

        match event.key {
            Key::Enter => self.submit(),
            Key::ControlC => {
                debug!("Console: interrupted");
                self.state = ConsoleState::Terminated;
            }
            Key::Backspace | Key::ControlH => {
                let offset = self.editor.cursor_offset();
                self.editor.delete_before(offset);
            }
            Key::Up => {
                let live = self.editor.line();
                if let Some(text) = self.history.recall_older(&live) {
                    self.editor.replace_line(text);
                }
            }
            Key::Down => {
                if let Some(text) = self.history.recall_newer() {
                    self.editor.replace_line(text);
                }
            }
            Key::Tab => self.complete(),
            Key::Left => self.editor.move_cursor(-1),
            Key::Right => self.editor.move_cursor(1),
            _ => trace!("Console: ignoring {:?}", event.key),
        }
    }

    fn submit(&mut self) {
        self.editor.move_to_end();
        let line = self.editor.take_line();
        self.editor.new_row();

        let execution = self.executer.execute(&line, &mut self.editor);
        debug!(
            "Console: executed {line:?} -> status {}, keep running {}",
            execution.status, execution.keep_running
        );
        self.last_status = execution.status;
        self.history.record(&line);
        self.history.reset();

        if execution.keep_running {
            self.editor.begin_prompt(&self.config.prompt);
        } else {
            self.state = ConsoleState::Terminated;
        }
    }

    fn complete(&mut self) {
        let Some(completer) = &self.completer else {
            return;
        };
        let line = self.editor.line();
        let mut completion = completer.complete(&line);
        debug!(
            "Console: completion for {line:?}: prefix {:?}, {} matches",
            completion.prefix,
            completion.matches.len()
        );

        match completion.matches.len() {
            0 => {}
            1 => self.editor.replace_line(&completion.matches[0]),
            _ => {
                completion.matches.sort();
                self.editor.replace_line(&completion.prefix);
                self.editor.new_row();
                let width = self.editor.rect().width;
                for row in layout_columns(&completion.matches, width, self.config.column_padding) {
                    self.editor.write_line(&row);
                }
                self.editor.begin_prompt(&self.config.prompt);
                self.editor.replace_line(&completion.prefix);
            }
        }
    }
}

impl Component for Console {
    fn name(&self) -> &str {
        "console"
    }

    fn run(&mut self, queue: &EventQueue) -> ConsoleResult<()> {
        Console::run(self, queue)
    }
}

/// Arrange `matches` into rows of equal-width columns.
///
/// Column width is the longest match plus `padding`; as many columns are
/// used as fit in `width` (at least one). Rows carry no trailing padding.
pub fn layout_columns(matches: &[String], width: usize, padding: usize) -> Vec<String> {
    let Some(longest) = matches.iter().map(|m| m.chars().count()).max() else {
        return Vec::new();
    };
    let column_width = longest + padding;
    let columns = ((width + padding) / column_width.max(1)).max(1);

    matches
        .chunks(columns)
        .map(|chunk| {
            let mut row = String::new();
            for (i, entry) in chunk.iter().enumerate() {
                if i + 1 == chunk.len() {
                    row.push_str(entry);
                } else {
                    row.push_str(&format!("{entry:<column_width$}"));
                }
            }
            row
        })
        .collect()
}
