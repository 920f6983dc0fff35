//! Coordinator error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by coordinator operations
#[derive(Debug, Error)]
pub enum CoordError {
    #[error("No agent registered for category '{category}'")]
    UnhandledCategory { category: String },

    #[error("Category '{category}' is already registered to {existing}")]
    DuplicateRegistration { category: String, existing: String },

    #[error("Agent name '{name}' is already registered")]
    DuplicateAgentName { name: String },

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Payload is {size} bytes, limit is {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Agent {agent} failed to handle event: {source}")]
    HandlerFailed {
        agent: String,
        #[source]
        source: HandlerError,
    },

    #[error("Coordinator channel closed")]
    ChannelClosed,
}

impl CoordError {
    /// Check if this is a routing miss (no agent for the category)
    pub fn is_unhandled(&self) -> bool {
        matches!(self, CoordError::UnhandledCategory { .. })
    }

    /// Check if this error rejected a registration
    pub fn is_registration_conflict(&self) -> bool {
        matches!(
            self,
            CoordError::DuplicateRegistration { .. } | CoordError::DuplicateAgentName { .. }
        )
    }
}

/// Error raised by an agent's handler
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Why a single broadcast delivery failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryFailureReason {
    /// No agent with that name is registered
    UnknownCollaborator,
    /// The collaborator's inbox is at capacity
    InboxFull,
    /// The collaborator dropped its inbox
    InboxClosed,
}

impl std::fmt::Display for DeliveryFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCollaborator => write!(f, "unknown collaborator"),
            Self::InboxFull => write!(f, "inbox full"),
            Self::InboxClosed => write!(f, "inbox closed"),
        }
    }
}

/// A failed delivery to one collaborator during broadcast
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Delivery to {collaborator} failed: {reason}")]
pub struct DeliveryFailure {
    pub collaborator: String,
    pub reason: DeliveryFailureReason,
}

impl DeliveryFailure {
    pub fn new(collaborator: impl Into<String>, reason: DeliveryFailureReason) -> Self {
        Self {
            collaborator: collaborator.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhandled_category_message() {
        let err = CoordError::UnhandledCategory {
            category: "unregistered".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("unregistered"));
        assert!(err.is_unhandled());
        assert!(!err.is_registration_conflict());
    }

    #[test]
    fn test_duplicate_registration_message() {
        let err = CoordError::DuplicateRegistration {
            category: "mall-event".to_string(),
            existing: "Atlas".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("mall-event"));
        assert!(msg.contains("Atlas"));
        assert!(err.is_registration_conflict());
    }

    #[test]
    fn test_delivery_failure_message() {
        let failure = DeliveryFailure::new("Aurora", DeliveryFailureReason::InboxClosed);
        assert_eq!(failure.to_string(), "Delivery to Aurora failed: inbox closed");
    }

    #[test]
    fn test_handler_failed_keeps_source() {
        let err = CoordError::HandlerFailed {
            agent: "Concierge".to_string(),
            source: HandlerError::new("template render failed"),
        };

        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("template render failed"));
    }
}
