//! Coordinator for agent routing
//!
//! The Coordinator owns the agent registry and mediates all agent traffic:
//! - **Submit:** route an event to the one agent owning its category
//! - **Broadcast:** best-effort delivery of a response to named collaborators
//! - **Route:** submit followed by broadcast
//!
//! [`Coordinator`] is the synchronous core. [`CoordinatorService`] runs it in a
//! tokio task behind a cloneable [`CoordinatorHandle`].

mod activity;
mod config;
mod core;
mod inbox;
mod journal;
mod messages;
mod service;

pub use activity::{ActivityEntry, ActivityKind, ActivityLog, CoordinatorStatus};
pub use config::CoordinatorConfig;
pub use core::Coordinator;
pub use inbox::AgentInbox;
pub use journal::{Journal, JournalEntry};
pub use messages::{BroadcastReport, CoordRequest, CoordinatorMetrics, Routed};
pub use service::{CoordinatorHandle, CoordinatorService};
