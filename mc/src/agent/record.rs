//! Registered agent record

use std::sync::Arc;

use tracing::debug;

use super::handler::{Handler, HandlerResult};
use super::persona::Persona;
use crate::domain::{Category, Event};

/// A named handler bound to one category
///
/// Agents are immutable once built. Cloning shares the handler.
#[derive(Clone)]
pub struct Agent {
    name: String,
    capability: Category,
    description: String,
    handler: Arc<dyn Handler>,
}

impl Agent {
    /// Create an agent from any handler
    pub fn new(name: impl Into<String>, capability: Category, handler: impl Handler + 'static) -> Self {
        let name = name.into();
        debug!(%name, %capability, "Agent::new: called");
        Self {
            name,
            capability,
            description: String::new(),
            handler: Arc::new(handler),
        }
    }

    /// Create one of the built-in mall agents
    pub fn persona(persona: Persona) -> Self {
        debug!(?persona, "Agent::persona: called");
        Self::new(persona.name(), persona.category(), persona).with_description(persona.role())
    }

    /// All four built-in agents, in declaration order
    pub fn builtin() -> Vec<Self> {
        Persona::ALL.iter().copied().map(Self::persona).collect()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capability(&self) -> &Category {
        &self.capability
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn handle(&self, event: &Event) -> HandlerResult {
        self.handler.handle(event)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("capability", &self.capability)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
