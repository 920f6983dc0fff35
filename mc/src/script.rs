//! Batch scripts for `mc run`
//!
//! A script is a YAML file with a list of steps:
//!
//! ```yaml
//! steps:
//!   - category: mall-event
//!     payload: Fall Festival
//!     collaborators: [Aurora, Sentinel]
//! ```

use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::Event;
use crate::error::CoordError;

/// A sequence of events to route
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

/// One event plus the agents that should receive its response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptStep {
    pub category: String,
    pub payload: String,
    #[serde(default)]
    pub collaborators: Vec<String>,
}

impl ScriptStep {
    /// Build the event for this step
    ///
    /// Categories are validated here rather than at load time so one bad step
    /// does not abort the whole run.
    pub fn event(&self) -> Result<Event, CoordError> {
        Event::parse(&self.category, self.payload.clone())
    }
}

impl Script {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse script {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let script: Self = serde_yaml::from_str(content)?;
        tracing::debug!(steps = script.steps.len(), "Script::parse: parsed");
        Ok(script)
    }
}
