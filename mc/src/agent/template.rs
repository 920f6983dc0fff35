//! Template-backed handlers for config-defined agents
//!
//! The response text is a handlebars template rendered with `agent`,
//! `category` and `payload`. Templates are compiled once at construction.

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::handler::{Handler, HandlerResult};
use crate::domain::Event;
use crate::error::HandlerError;

const TEMPLATE_NAME: &str = "response";

/// Context passed to the template
#[derive(Debug, Serialize)]
struct TemplateContext<'a> {
    agent: &'a str,
    category: &'a str,
    payload: &'a str,
}

/// Renders a handlebars template for each event
pub struct TemplateHandler {
    agent: String,
    hbs: Handlebars<'static>,
}

impl TemplateHandler {
    /// Compile a template for the named agent
    ///
    /// Strict mode is on, so a template referencing an unknown variable fails
    /// when rendered instead of producing blank text.
    pub fn new(agent: impl Into<String>, template: &str) -> Result<Self> {
        let agent = agent.into();
        debug!(%agent, "TemplateHandler::new: called");

        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| eyre!("Invalid template for agent {}: {}", agent, e))?;

        Ok(Self { agent, hbs })
    }
}

impl Handler for TemplateHandler {
    fn handle(&self, event: &Event) -> HandlerResult {
        let context = TemplateContext {
            agent: &self.agent,
            category: event.category().as_str(),
            payload: event.payload(),
        };

        self.hbs
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| HandlerError::new(format!("template render failed: {}", e)))
    }
}
