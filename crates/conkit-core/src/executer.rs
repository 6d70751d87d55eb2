//! Command execution capability invoked when a line is submitted.

use log::debug;

/// Output sink handed to executers; backed by the console's line editor
pub trait ConsoleWriter {
    /// Append text at the cursor, wrapping at the widget edge
    fn write(&mut self, text: &str);

    /// Append text and move to the start of a fresh row
    fn write_line(&mut self, text: &str);
}

/// Outcome of running one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    /// Status code of the command, 0 on success
    pub status: i32,
    /// `false` terminates the console
    pub keep_running: bool,
}

impl Execution {
    pub fn proceed(status: i32) -> Self {
        Self {
            status,
            keep_running: true,
        }
    }

    pub fn stop(status: i32) -> Self {
        Self {
            status,
            keep_running: false,
        }
    }
}

impl Default for Execution {
    fn default() -> Self {
        Self::proceed(0)
    }
}

/// Application command logic
pub trait Executer: Send {
    fn execute(&mut self, command: &str, out: &mut dyn ConsoleWriter) -> Execution;
}

impl<F> Executer for F
where
    F: FnMut(&str, &mut dyn ConsoleWriter) -> Execution + Send,
{
    fn execute(&mut self, command: &str, out: &mut dyn ConsoleWriter) -> Execution {
        self(command, out)
    }
}

/// Echoes every non-empty line back; `exit` stops the console
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoExecuter;

impl Executer for EchoExecuter {
    fn execute(&mut self, command: &str, out: &mut dyn ConsoleWriter) -> Execution {
        if command == "exit" {
            debug!("EchoExecuter: exit requested");
            return Execution::stop(0);
        }
        if !command.is_empty() {
            out.write_line(command);
        }
        Execution::proceed(0)
    }
}
