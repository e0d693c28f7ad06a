//! Error types for the runtime
//!
//! Every fallible runtime operation returns [`CoreResult`]. Node code never
//! defines its own taxonomy; failures surface through these variants.

use thiserror::Error;

/// Errors raised by the runtime
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller-supplied value rejected (node name, topic name, timer period)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Topic-level delivery problem
    #[error("Communication error: {0}")]
    Communication(String),

    /// Operation attempted on a context that is not running
    #[error("Context is not running (already shut down or never initialized)")]
    ContextShutdown,

    /// Topic already registered with a different message type
    #[error("Topic '{topic}' already exists with a different message type (requested {expected})")]
    TopicTypeMismatch { topic: String, expected: String },

    /// Runtime or node failed to start
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CoreError::Config(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        CoreError::InvalidInput(msg.into())
    }

    pub fn communication<S: Into<String>>(msg: S) -> Self {
        CoreError::Communication(msg.into())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

/// Result alias used across the runtime
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(CoreError::config("x"), CoreError::Config(m) if m == "x"));
        assert!(matches!(
            CoreError::invalid_input("bad"),
            CoreError::InvalidInput(m) if m == "bad"
        ));
    }

    #[test]
    fn test_display_mentions_topic() {
        let err = CoreError::TopicTypeMismatch {
            topic: "/chatter".to_string(),
            expected: "u32".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("/chatter"));
        assert!(text.contains("u32"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
