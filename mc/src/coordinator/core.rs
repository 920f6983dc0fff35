//! Coordinator core: registry, routing and broadcast

use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use super::activity::{ActivityKind, ActivityLog, CoordinatorStatus};
use super::config::CoordinatorConfig;
use super::inbox::AgentInbox;
use super::messages::{BroadcastReport, CoordinatorMetrics, Routed};
use crate::agent::Agent;
use crate::domain::{Category, Event, Response};
use crate::error::{CoordError, DeliveryFailure, DeliveryFailureReason};

/// Number of activity entries included in a status snapshot
const STATUS_RECENT: usize = 10;

/// Routes events to the agent owning their category
///
/// All calls are synchronous: `submit` runs the agent's handler on the
/// caller's thread and `broadcast` never waits on a full inbox.
pub struct Coordinator {
    config: CoordinatorConfig,
    agents: HashMap<Category, Agent>,
    /// Categories in registration order
    order: Vec<Category>,
    inboxes: HashMap<String, mpsc::Sender<Response>>,
    activity: ActivityLog,
    metrics: CoordinatorMetrics,
}

impl Coordinator {
    /// Create an empty Coordinator with the given configuration
    pub fn new(config: CoordinatorConfig) -> Self {
        debug!(?config, "Coordinator::new: called");
        let activity = ActivityLog::new(config.activity_capacity);
        Self {
            config,
            agents: HashMap::new(),
            order: Vec::new(),
            inboxes: HashMap::new(),
            activity,
            metrics: CoordinatorMetrics::default(),
        }
    }

    /// Register an agent under its capability
    ///
    /// Fails if the category or the agent name is already taken; the existing
    /// registration is left untouched.
    pub fn register(&mut self, agent: Agent) -> Result<AgentInbox, CoordError> {
        debug!(name = %agent.name(), capability = %agent.capability(), "Coordinator::register: called");

        if let Some(existing) = self.agents.get(agent.capability()) {
            warn!(
                category = %agent.capability(),
                existing = %existing.name(),
                rejected = %agent.name(),
                "Duplicate registration rejected"
            );
            return Err(CoordError::DuplicateRegistration {
                category: agent.capability().to_string(),
                existing: existing.name().to_string(),
            });
        }

        if self.inboxes.contains_key(agent.name()) {
            warn!(name = %agent.name(), "Duplicate agent name rejected");
            return Err(CoordError::DuplicateAgentName {
                name: agent.name().to_string(),
            });
        }

        let (tx, rx) = mpsc::channel(self.config.inbox_buffer.max(1));
        let name = agent.name().to_string();
        let category = agent.capability().clone();

        self.inboxes.insert(name.clone(), tx);
        self.order.push(category.clone());
        self.agents.insert(category.clone(), agent);
        self.metrics.registered_agents = self.agents.len();

        info!(%name, %category, "Agent registered");
        Ok(AgentInbox::new(name, rx))
    }

    /// Route an event to its agent and return the agent's response
    pub fn submit(&mut self, event: Event) -> Result<Response, CoordError> {
        debug!(category = %event.category(), "Coordinator::submit: called");
        self.metrics.events_submitted += 1;

        let Some(agent) = self.agents.get(event.category()) else {
            warn!(category = %event.category(), "No agent registered for category");
            self.metrics.unhandled_events += 1;
            self.activity.record(event.category().as_str(), ActivityKind::Unhandled);
            return Err(CoordError::UnhandledCategory {
                category: event.category().to_string(),
            });
        };

        let size = event.payload().len();
        let max = self.config.max_payload_size;
        if size > max {
            warn!(category = %event.category(), agent = %agent.name(), size, max, "Payload too large");
            self.metrics.rejected_payloads += 1;
            self.activity.record(
                event.category().as_str(),
                ActivityKind::PayloadRejected {
                    agent: agent.name().to_string(),
                    size,
                },
            );
            return Err(CoordError::PayloadTooLarge { size, max });
        }

        match agent.handle(&event) {
            Ok(payload) => {
                debug!(agent = %agent.name(), "Coordinator::submit: handled");
                let response = Response::new(event.category().clone(), agent.name(), payload);
                self.metrics.responses += 1;
                self.activity.record(
                    event.category().as_str(),
                    ActivityKind::Responded {
                        agent: agent.name().to_string(),
                    },
                );
                Ok(response)
            }
            Err(source) => {
                warn!(agent = %agent.name(), error = %source, "Handler failed");
                let agent_name = agent.name().to_string();
                self.metrics.handler_failures += 1;
                self.activity.record(
                    event.category().as_str(),
                    ActivityKind::HandlerFailed {
                        agent: agent_name.clone(),
                        message: source.to_string(),
                    },
                );
                Err(CoordError::HandlerFailed {
                    agent: agent_name,
                    source,
                })
            }
        }
    }

    /// Deliver a response to each named collaborator's inbox
    ///
    /// Each delivery is attempted independently; failures are collected in
    /// the report and never stop the remaining deliveries. A name listed more
    /// than once is delivered to once.
    pub fn broadcast<S: AsRef<str>>(&mut self, response: Response, collaborators: &[S]) -> BroadcastReport {
        debug!(
            agent = %response.agent(),
            collaborators = collaborators.len(),
            "Coordinator::broadcast: called"
        );

        let mut report = BroadcastReport::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for name in collaborators {
            let name: &str = name.as_ref();
            if !seen.insert(name) {
                continue;
            }

            let outcome = match self.inboxes.get(name) {
                None => Err(DeliveryFailureReason::UnknownCollaborator),
                Some(tx) => tx.try_send(response.clone()).map_err(|e| match e {
                    TrySendError::Full(_) => DeliveryFailureReason::InboxFull,
                    TrySendError::Closed(_) => DeliveryFailureReason::InboxClosed,
                }),
            };

            match outcome {
                Ok(()) => {
                    debug!(to = %name, "Coordinator::broadcast: delivered");
                    self.metrics.deliveries += 1;
                    self.activity.record(
                        response.category().as_str(),
                        ActivityKind::Delivered {
                            from: response.agent().to_string(),
                            to: name.to_string(),
                        },
                    );
                    report.delivered.push(name.to_string());
                }
                Err(reason) => {
                    warn!(to = %name, %reason, "Delivery failed");
                    self.metrics.delivery_failures += 1;
                    self.activity.record(
                        response.category().as_str(),
                        ActivityKind::DeliveryFailed {
                            from: response.agent().to_string(),
                            to: name.to_string(),
                            reason: reason.to_string(),
                        },
                    );
                    report.failed.push(DeliveryFailure::new(name, reason));
                }
            }
        }

        report
    }

    /// Submit an event, then broadcast the response to collaborators
    pub fn route<S: AsRef<str>>(&mut self, event: Event, collaborators: &[S]) -> Result<Routed, CoordError> {
        debug!(category = %event.category(), "Coordinator::route: called");
        let response = self.submit(event)?;
        let report = self.broadcast(response.clone(), collaborators);
        Ok(Routed { response, report })
    }

    /// Registered agents in registration order
    pub fn agents(&self) -> Vec<&Agent> {
        self.order.iter().filter_map(|c| self.agents.get(c)).collect()
    }

    /// Agent registered for a category, if any
    pub fn agent_for(&self, category: &Category) -> Option<&Agent> {
        self.agents.get(category)
    }

    pub fn metrics(&self) -> CoordinatorMetrics {
        self.metrics.clone()
    }

    pub fn status(&self) -> CoordinatorStatus {
        debug!("Coordinator::status: called");
        CoordinatorStatus {
            total_agents: self.agents.len(),
            agent_names: self.agents().iter().map(|a| a.name().to_string()).collect(),
            recent: self.activity.recent(STATUS_RECENT),
            last_activity: self.activity.last_timestamp(),
        }
    }
}
