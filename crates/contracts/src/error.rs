//! Layered error definitions
//!
//! Categorized by source: config / lock / io

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Locking Errors =====
    /// The follower's queue is already borrowed by another call
    #[error("follower '{follower}' queue is busy")]
    QueueBusy { follower: String },

    /// A previous holder of the follower lock panicked
    #[error("follower '{follower}' lock poisoned")]
    LockPoisoned { follower: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create queue busy error
    pub fn queue_busy(follower: impl Into<String>) -> Self {
        Self::QueueBusy {
            follower: follower.into(),
        }
    }

    /// Create lock poisoned error
    pub fn lock_poisoned(follower: impl Into<String>) -> Self {
        Self::LockPoisoned {
            follower: follower.into(),
        }
    }
}
