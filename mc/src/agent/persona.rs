//! Built-in mall agents
//!
//! Atlas, Aurora, Mercury and Sentinel each own one mall problem category and
//! phrase their work as short status sentences.

use serde::{Deserialize, Serialize};

use super::handler::{Handler, HandlerResult};
use crate::domain::{Category, Event};

/// One of the four built-in mall agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    /// Mall events and campaigns
    Atlas,
    /// Shopper experience
    Aurora,
    /// Retailer operations
    Mercury,
    /// Security and compliance
    Sentinel,
}

impl Persona {
    pub const ALL: [Persona; 4] = [Persona::Atlas, Persona::Aurora, Persona::Mercury, Persona::Sentinel];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Atlas => "Atlas",
            Self::Aurora => "Aurora",
            Self::Mercury => "Mercury",
            Self::Sentinel => "Sentinel",
        }
    }

    pub fn category(&self) -> Category {
        Category::builtin(match self {
            Self::Atlas => Category::MALL_EVENT,
            Self::Aurora => Category::CUSTOMER_EXPERIENCE,
            Self::Mercury => Category::RETAIL_OPERATIONS,
            Self::Sentinel => Category::SECURITY_COMPLIANCE,
        })
    }

    /// One-line description of what the agent looks after
    pub fn role(&self) -> &'static str {
        match self {
            Self::Atlas => "Coordinates mall events and seasonal campaigns",
            Self::Aurora => "Looks after shopper experience and visitor feedback",
            Self::Mercury => "Handles retailer inventory and fulfillment",
            Self::Sentinel => "Monitors security and compliance",
        }
    }

    /// Focus phrase used in coordination sentences
    fn focus(&self) -> &'static str {
        match self {
            Self::Atlas => "coordinating the mall event",
            Self::Aurora => "improving the customer experience",
            Self::Mercury => "optimizing retail operations",
            Self::Sentinel => "reviewing security and compliance",
        }
    }

    pub fn identify_problem(&self, input: &str) -> String {
        format!("{} identified a problem: {}", self.name(), input)
    }

    pub fn propose_solution(&self, input: &str) -> String {
        format!("{} proposes a solution: {}", self.name(), input)
    }

    pub fn collaborate(&self, peer: &str, input: &str) -> String {
        format!("{} is collaborating with {} on: {}", self.name(), peer, input)
    }

    pub fn execute(&self, input: &str) -> String {
        format!("{} is executing: {}", self.name(), input)
    }

    /// The sentence an agent answers with when an event is routed to it
    pub fn coordinate(&self, input: &str) -> String {
        format!("{} is {}: {}", self.name(), self.focus(), input)
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "atlas" => Ok(Self::Atlas),
            "aurora" => Ok(Self::Aurora),
            "mercury" => Ok(Self::Mercury),
            "sentinel" => Ok(Self::Sentinel),
            _ => Err(format!("Unknown agent: {}. Use: atlas, aurora, mercury, or sentinel", s)),
        }
    }
}

impl Handler for Persona {
    fn handle(&self, event: &Event) -> HandlerResult {
        Ok(self.coordinate(event.payload()))
    }
}
