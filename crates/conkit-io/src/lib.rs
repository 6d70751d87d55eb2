//! Surface backends for conkit.
//!
//! - [`MemorySurface`]: in-memory grid and scripted input, for tests and
//!   headless runs
//! - [`UnixTerminal`]: raw-mode VT terminal on stdin/stdout (Unix only)
//! - [`debug`]: file logger enabled through `CONKIT_DEBUG`

use std::sync::Arc;

pub use conkit_core::{CellSurface, ConsoleError, ConsoleResult, EventSource};

pub mod debug;
pub mod mock;

#[cfg(unix)]
mod unix;

pub use mock::MemorySurface;

#[cfg(unix)]
pub use unix::UnixTerminal;

/// One backend viewed both as the drawing surface and as the input source
#[derive(Clone)]
pub struct TerminalHandle {
    pub surface: Arc<dyn CellSurface>,
    pub source: Arc<dyn EventSource>,
}

impl TerminalHandle {
    pub fn new<T>(terminal: T) -> Self
    where
        T: CellSurface + EventSource + 'static,
    {
        Self::shared(Arc::new(terminal))
    }

    pub fn shared<T>(terminal: Arc<T>) -> Self
    where
        T: CellSurface + EventSource + 'static,
    {
        Self {
            surface: terminal.clone(),
            source: terminal,
        }
    }
}

/// Open the native terminal of the current platform, not yet initialized
pub fn create_terminal() -> ConsoleResult<TerminalHandle> {
    #[cfg(unix)]
    {
        Ok(TerminalHandle::new(UnixTerminal::new()?))
    }

    #[cfg(not(unix))]
    {
        Err(ConsoleError::UnsupportedFeature {
            feature: "terminal surface".to_string(),
            platform: std::env::consts::OS.to_string(),
        })
    }
}
