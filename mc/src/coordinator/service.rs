//! Coordinator service task and its client handle
//!
//! The service owns a [`Coordinator`] inside a tokio task and serves
//! [`CoordRequest`]s one at a time, so the registry keeps a single writer even
//! when many async callers share a [`CoordinatorHandle`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::activity::CoordinatorStatus;
use super::config::CoordinatorConfig;
use super::core::Coordinator;
use super::inbox::AgentInbox;
use super::journal::{Journal, JournalEntry};
use super::messages::{BroadcastReport, CoordRequest, CoordinatorMetrics, Routed};
use crate::agent::Agent;
use crate::domain::{Event, Response};
use crate::error::CoordError;

/// Runs a Coordinator behind a request channel
pub struct CoordinatorService {
    coordinator: Coordinator,
    tx: mpsc::Sender<CoordRequest>,
    rx: mpsc::Receiver<CoordRequest>,
    /// Optional journal for routed responses
    journal: Option<Journal>,
}

impl CoordinatorService {
    /// Create a new service with the given configuration
    pub fn new(config: CoordinatorConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.channel_buffer.max(1));
        Self {
            coordinator: Coordinator::new(config),
            tx,
            rx,
            journal: None,
        }
    }

    /// Create a new service that journals routed responses
    pub fn with_journal(config: CoordinatorConfig, journal: Journal) -> Self {
        let mut service = Self::new(config);
        service.journal = Some(journal);
        service
    }

    /// Get a handle for talking to the service
    pub fn handle(&self) -> CoordinatorHandle {
        CoordinatorHandle { tx: self.tx.clone() }
    }

    /// Run the service task
    ///
    /// This consumes the service and runs until shutdown is requested or
    /// every handle is dropped.
    pub async fn run(self) {
        info!("Coordinator service started");

        let Self {
            mut coordinator,
            tx,
            mut rx,
            journal,
        } = self;
        // Only handles keep the channel open from here on
        drop(tx);

        while let Some(req) = rx.recv().await {
            match req {
                CoordRequest::Register { agent, reply_tx } => {
                    let _ = reply_tx.send(coordinator.register(agent));
                }

                CoordRequest::Submit { event, reply_tx } => {
                    let result = coordinator.submit(event);
                    if let (Ok(response), Some(journal)) = (&result, &journal) {
                        record(journal, response.clone(), &BroadcastReport::default()).await;
                    }
                    let _ = reply_tx.send(result);
                }

                CoordRequest::Broadcast {
                    response,
                    collaborators,
                    reply_tx,
                } => {
                    let _ = reply_tx.send(coordinator.broadcast(response, &collaborators));
                }

                CoordRequest::Route {
                    event,
                    collaborators,
                    reply_tx,
                } => {
                    let result = coordinator.route(event, &collaborators);
                    if let (Ok(routed), Some(journal)) = (&result, &journal) {
                        record(journal, routed.response.clone(), &routed.report).await;
                    }
                    let _ = reply_tx.send(result);
                }

                CoordRequest::GetMetrics { reply_tx } => {
                    let _ = reply_tx.send(coordinator.metrics());
                }

                CoordRequest::GetStatus { reply_tx } => {
                    let _ = reply_tx.send(coordinator.status());
                }

                CoordRequest::Shutdown => {
                    info!("Coordinator service shutting down");
                    break;
                }
            }
        }

        info!("Coordinator service stopped");
    }
}

/// Journal a response, logging instead of failing the request
async fn record(journal: &Journal, response: Response, report: &BroadcastReport) {
    let entry = JournalEntry::new(response, report);
    if let Err(e) = journal.append(&entry).await {
        warn!("Failed to journal response: {}", e);
    }
}

/// Cloneable async client for the coordinator service
#[derive(Clone, Debug)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<CoordRequest>,
}

impl CoordinatorHandle {
    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> CoordRequest) -> Result<T, CoordError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| CoordError::ChannelClosed)?;
        reply_rx.await.map_err(|_| CoordError::ChannelClosed)
    }

    /// Register an agent and get its inbox
    pub async fn register(&self, agent: Agent) -> Result<AgentInbox, CoordError> {
        debug!(name = %agent.name(), "CoordinatorHandle::register: called");
        self.request(|reply_tx| CoordRequest::Register { agent, reply_tx })
            .await?
    }

    /// Route an event to its agent and wait for the response
    pub async fn submit(&self, event: Event) -> Result<Response, CoordError> {
        debug!(category = %event.category(), "CoordinatorHandle::submit: called");
        self.request(|reply_tx| CoordRequest::Submit { event, reply_tx }).await?
    }

    /// Deliver a response to named collaborators
    pub async fn broadcast(&self, response: Response, collaborators: Vec<String>) -> Result<BroadcastReport, CoordError> {
        debug!(agent = %response.agent(), ?collaborators, "CoordinatorHandle::broadcast: called");
        self.request(|reply_tx| CoordRequest::Broadcast {
            response,
            collaborators,
            reply_tx,
        })
        .await
    }

    /// Submit an event and broadcast the response
    pub async fn route(&self, event: Event, collaborators: Vec<String>) -> Result<Routed, CoordError> {
        debug!(category = %event.category(), ?collaborators, "CoordinatorHandle::route: called");
        self.request(|reply_tx| CoordRequest::Route {
            event,
            collaborators,
            reply_tx,
        })
        .await?
    }

    /// Get current coordinator metrics
    pub async fn metrics(&self) -> Result<CoordinatorMetrics, CoordError> {
        debug!("CoordinatorHandle::metrics: called");
        self.request(|reply_tx| CoordRequest::GetMetrics { reply_tx }).await
    }

    /// Get registered agents and recent activity
    pub async fn status(&self) -> Result<CoordinatorStatus, CoordError> {
        debug!("CoordinatorHandle::status: called");
        self.request(|reply_tx| CoordRequest::GetStatus { reply_tx }).await
    }

    /// Request shutdown of the service
    pub async fn shutdown(&self) -> Result<(), CoordError> {
        debug!("CoordinatorHandle::shutdown: called");
        self.tx
            .send(CoordRequest::Shutdown)
            .await
            .map_err(|_| CoordError::ChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Persona;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_service_route_and_shutdown() {
        let service = CoordinatorService::new(CoordinatorConfig::default());
        let handle = service.handle();
        let task = tokio::spawn(service.run());

        let _atlas = handle.register(Agent::persona(Persona::Atlas)).await.unwrap();
        let mut aurora = handle.register(Agent::persona(Persona::Aurora)).await.unwrap();

        let routed = handle
            .route(
                Event::parse("mall-event", "Fall Festival").unwrap(),
                vec!["Aurora".to_string()],
            )
            .await
            .unwrap();

        assert_eq!(routed.response.agent(), "Atlas");
        assert_eq!(routed.report.delivered, vec!["Aurora"]);
        assert_eq!(aurora.recv().await.unwrap(), routed.response);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_service_errors_propagate() {
        let service = CoordinatorService::new(CoordinatorConfig::default());
        let handle = service.handle();
        let task = tokio::spawn(service.run());

        let _atlas = handle.register(Agent::persona(Persona::Atlas)).await.unwrap();
        let dup = handle.register(Agent::persona(Persona::Atlas)).await.unwrap_err();
        assert!(dup.is_registration_conflict());

        let miss = handle
            .submit(Event::parse("unregistered", "x").unwrap())
            .await
            .unwrap_err();
        assert!(miss.is_unhandled());

        let metrics = handle.metrics().await.unwrap();
        assert_eq!(metrics.registered_agents, 1);
        assert_eq!(metrics.unhandled_events, 1);

        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_after_shutdown() {
        let service = CoordinatorService::new(CoordinatorConfig::default());
        let handle = service.handle();
        let task = tokio::spawn(service.run());

        handle.shutdown().await.unwrap();
        task.await.unwrap();

        let err = handle.metrics().await.unwrap_err();
        assert!(matches!(err, CoordError::ChannelClosed));
    }

    #[tokio::test]
    async fn test_service_stops_when_handles_dropped() {
        let service = CoordinatorService::new(CoordinatorConfig::default());
        let handle = service.handle();
        let task = tokio::spawn(service.run());

        drop(handle);

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), task).await;
        assert!(result.is_ok(), "Service should stop once all handles are gone");
    }

    #[tokio::test]
    async fn test_service_journals_routes() {
        let temp_dir = TempDir::new().unwrap();
        let journal = Journal::new(temp_dir.path());
        let service = CoordinatorService::with_journal(CoordinatorConfig::default(), journal.clone());
        let handle = service.handle();
        let task = tokio::spawn(service.run());

        let _sentinel = handle.register(Agent::persona(Persona::Sentinel)).await.unwrap();
        handle
            .route(
                Event::parse("security-compliance", "door 4 alarm").unwrap(),
                vec!["Ghost".to_string()],
            )
            .await
            .unwrap();
        let _ = handle.submit(Event::parse("nobody", "x").unwrap()).await;

        handle.shutdown().await.unwrap();
        task.await.unwrap();

        let entries = journal.read_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].response.agent(), "Sentinel");
        assert_eq!(entries[0].failed[0].collaborator, "Ghost");
    }
}
