//! Error types for console surfaces, widgets and the event router.

use thiserror::Error;

/// Console operation errors
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Platform I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup/teardown error
    #[error("Terminal error: {0}")]
    TerminalError(String),

    /// The surface could not present its cells
    #[error("Flush failed: {0}")]
    FlushFailed(String),

    /// Invalid widget or router configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Feature not supported on this platform
    #[error("Feature '{feature}' not supported on platform '{platform}'")]
    UnsupportedFeature { feature: String, platform: String },

    /// Thread management error
    #[error("Thread error: {0}")]
    ThreadError(String),

    /// A registered component failed while running
    #[error("Component '{name}' failed: {reason}")]
    ComponentFailed { name: String, reason: String },
}

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConsoleError::UnsupportedFeature {
            feature: "raw mode".to_string(),
            platform: "windows".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Feature 'raw mode' not supported on platform 'windows'"
        );

        let err = ConsoleError::ComponentFailed {
            name: "console-0".to_string(),
            reason: "Flush failed: closed".to_string(),
        };
        assert_eq!(err.to_string(), "Component 'console-0' failed: Flush failed: closed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ConsoleError = io.into();
        assert!(matches!(err, ConsoleError::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }
}
