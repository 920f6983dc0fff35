//! Event and response records

use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::error::CoordError;

/// A unit of work submitted for routing
///
/// Events are immutable once built and are consumed by the coordinator when
/// submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    category: Category,
    payload: String,
}

impl Event {
    pub fn new(category: Category, payload: impl Into<String>) -> Self {
        Self {
            category,
            payload: payload.into(),
        }
    }

    /// Build an event from a raw category tag
    pub fn parse(category: &str, payload: impl Into<String>) -> Result<Self, CoordError> {
        Ok(Self::new(Category::new(category)?, payload))
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// An agent's output after handling an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    category: Category,
    agent: String,
    payload: String,
}

impl Response {
    pub(crate) fn new(category: Category, agent: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            category,
            agent: agent.into(),
            payload: payload.into(),
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Name of the agent that produced this response
    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}
