use thiserror::Error;

/// Error type returned by listener callbacks.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by listener callbacks.
pub type ListenerResult = Result<(), ListenerError>;

#[derive(Error, Debug)]
pub enum EmitterError {
    /// Rejected before any mutation took place.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Out of range: {message}")]
    OutOfRange { message: String },

    /// A listener failed; the remaining listeners of that emit were skipped.
    #[error("Listener for event '{event}' failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: ListenerError,
    },

    #[error("Config error: {message}")]
    Config { message: String },
}

pub type EmitterResult<T> = Result<T, EmitterError>;

// エラー作成用のヘルパー関数
impl EmitterError {
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        EmitterError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn out_of_range<S: Into<String>>(message: S) -> Self {
        EmitterError::OutOfRange {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        EmitterError::Config {
            message: message.into(),
        }
    }

    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::InvalidArgument { .. } => "invalid_argument",
            EmitterError::OutOfRange { .. } => "out_of_range",
            EmitterError::Listener { .. } => "listener_failed",
            EmitterError::Config { .. } => "config",
        }
    }

    /// True when the error came from listener code rather than from the registry.
    pub fn is_listener_failure(&self) -> bool {
        matches!(self, EmitterError::Listener { .. })
    }
}

/// Fails with [`EmitterError::InvalidArgument`] on an empty event name.
pub(crate) fn ensure_event_name(event: &str) -> EmitterResult<()> {
    if event.is_empty() {
        return Err(EmitterError::invalid_argument(
            "event name must not be an empty string",
        ));
    }
    Ok(())
}
