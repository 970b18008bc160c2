//! Result and error types for Gesto.

use crate::document::NodeId;
use crate::sequencer::Phase;
use thiserror::Error;

/// Result type for Gesto operations
pub type GestoResult<T> = Result<T, GestoError>;

/// Errors that can occur while simulating an interaction
#[derive(Debug, Error)]
pub enum GestoError {
    /// Target is not attached to a document
    #[error("Target {node} is not attached to a document")]
    DetachedTarget {
        /// Offending node
        node: NodeId,
    },

    /// Node handle is not owned by the document
    #[error("Unknown node {node}")]
    UnknownNode {
        /// Offending node
        node: NodeId,
    },

    /// An event listener failed during dispatch
    #[error("Listener for '{event}' failed: {message}")]
    Listener {
        /// Event name being dispatched
        event: String,
        /// Error message reported by the listener
        message: String,
    },

    /// Sequencer was driven through an illegal phase change
    #[error("Invalid sequencer transition {from:?} -> {to:?}")]
    InvalidTransition {
        /// Phase before the transition
        from: Phase,
        /// Requested phase
        to: Phase,
    },

    /// Scenario description could not be turned into a document
    #[error("Scenario error: {message}")]
    Scenario {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl GestoError {
    /// Create a listener error
    #[must_use]
    pub fn listener(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Listener {
            event: event.into(),
            message: message.into(),
        }
    }

    /// Create a scenario error
    #[must_use]
    pub fn scenario(message: impl Into<String>) -> Self {
        Self::Scenario {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_display() {
        let err = GestoError::DetachedTarget { node: NodeId(7) };
        assert_eq!(err.to_string(), "Target #7 is not attached to a document");
    }

    #[test]
    fn test_listener_display() {
        let err = GestoError::listener("change", "boom");
        assert_eq!(err.to_string(), "Listener for 'change' failed: boom");
    }

    #[test]
    fn test_transition_display() {
        let err = GestoError::InvalidTransition {
            from: Phase::Idle,
            to: Phase::Clicked,
        };
        assert!(err.to_string().contains("Idle -> Clicked"));
    }

    #[test]
    fn test_io_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GestoError = io.into();
        assert!(matches!(err, GestoError::Io(_)));
    }
}
