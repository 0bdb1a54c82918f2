//! Error types for container operations

/// Result type for container operations
pub type Result<T> = std::result::Result<T, LinearError>;

/// Error returned by every fallible container operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinearError {
    /// Empty key, absent value or non-positive capacity
    #[error("invalid argument to {operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },

    /// Removal or read attempted on a container with no entries
    #[error("cannot {operation}: container is empty")]
    EmptyContainer { operation: &'static str },

    /// Lookup or update targeted a key that is not stored
    #[error("cannot {operation}: key '{key}' not found")]
    KeyNotFound { operation: &'static str, key: String },

    /// Entry does not fit the byte budget
    #[error(
        "cannot {operation}: entry needs {requested_bytes} bytes but only {available_bytes} are available"
    )]
    InsufficientCapacity {
        operation: &'static str,
        requested_bytes: u64,
        available_bytes: u64,
    },

    /// Invalid construction parameters or configuration sources
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl LinearError {
    pub(crate) fn invalid_argument(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the error reports an empty container
    pub fn is_empty_container(&self) -> bool {
        matches!(self, Self::EmptyContainer { .. })
    }

    /// Whether the error reports a missing key
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }

    /// Whether the error reports an exhausted byte budget
    pub fn is_capacity_error(&self) -> bool {
        matches!(self, Self::InsufficientCapacity { .. })
    }

    /// Name of the operation that failed, when the error is tied to one
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { operation, .. }
            | Self::EmptyContainer { operation }
            | Self::KeyNotFound { operation, .. }
            | Self::InsufficientCapacity { operation, .. } => Some(operation),
            Self::Configuration { .. } => None,
        }
    }
}
