//! mallcoord - Category-routed coordinator for mall-management agents
//!
//! A small coordination core for a multi-agent mall system. Producers submit
//! typed events; the coordinator hands each event to the single agent that
//! owns its category and broadcasts the agent's response to named
//! collaborators.
//!
//! # Core Concepts
//!
//! - **One owner per category**: registering a second agent for a category fails
//! - **Synchronous routing**: `submit` runs the handler and returns its response
//! - **Best-effort broadcast**: each collaborator delivery succeeds or fails on its own
//!
//! # Modules
//!
//! - [`domain`] - Category, Event and Response records
//! - [`agent`] - Handler trait, built-in personas, template agents
//! - [`coordinator`] - Routing core, inboxes, service task and journal
//! - [`config`] - Configuration types and loading
//! - [`script`] - Batch scripts for routing many events
//! - [`cli`] - Command-line interface

pub mod agent;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod script;

// Re-export commonly used types
pub use agent::{Agent, Handler, HandlerResult, Persona, TemplateHandler};
pub use config::Config;
pub use coordinator::{
    AgentInbox, BroadcastReport, Coordinator, CoordinatorConfig, CoordinatorHandle, CoordinatorMetrics,
    CoordinatorService, CoordinatorStatus, Journal, JournalEntry, Routed,
};
pub use domain::{Category, Event, Response};
pub use error::{CoordError, DeliveryFailure, DeliveryFailureReason, HandlerError};
pub use script::{Script, ScriptStep};
