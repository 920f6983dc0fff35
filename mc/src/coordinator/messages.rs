//! Message types for the Coordinator

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use super::activity::CoordinatorStatus;
use super::inbox::AgentInbox;
use crate::agent::Agent;
use crate::domain::{Event, Response};
use crate::error::{CoordError, DeliveryFailure};

/// Outcome of one broadcast
///
/// Every collaborator appears exactly once, either in `delivered` or in
/// `failed`, in the order they were named.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: Vec<String>,
    pub failed: Vec<DeliveryFailure>,
}

impl BroadcastReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Response plus its broadcast outcome
#[derive(Debug, Clone)]
pub struct Routed {
    pub response: Response,
    pub report: BroadcastReport,
}

/// Internal requests to the Coordinator service task
#[derive(Debug)]
pub enum CoordRequest {
    /// Register an agent under its capability
    Register {
        agent: Agent,
        reply_tx: oneshot::Sender<Result<AgentInbox, CoordError>>,
    },

    /// Hand an event to its agent
    Submit {
        event: Event,
        reply_tx: oneshot::Sender<Result<Response, CoordError>>,
    },

    /// Deliver a response to named collaborators
    Broadcast {
        response: Response,
        collaborators: Vec<String>,
        reply_tx: oneshot::Sender<BroadcastReport>,
    },

    /// Submit then broadcast the response
    Route {
        event: Event,
        collaborators: Vec<String>,
        reply_tx: oneshot::Sender<Result<Routed, CoordError>>,
    },

    /// Get current metrics
    GetMetrics {
        reply_tx: oneshot::Sender<CoordinatorMetrics>,
    },

    /// Get agent list and recent activity
    GetStatus {
        reply_tx: oneshot::Sender<CoordinatorStatus>,
    },

    /// Shutdown the coordinator
    Shutdown,
}

/// Coordinator metrics for observability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorMetrics {
    pub registered_agents: usize,
    pub events_submitted: u64,
    pub responses: u64,
    pub unhandled_events: u64,
    pub rejected_payloads: u64,
    pub handler_failures: u64,
    pub deliveries: u64,
    pub delivery_failures: u64,
}
