//! AgentInbox - receiving end of an agent's broadcast channel

use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::Response;

/// Inbox for responses broadcast to one agent
///
/// Returned by `register`. Dropping the inbox makes later deliveries to the
/// agent fail with `InboxClosed`.
#[derive(Debug)]
pub struct AgentInbox {
    agent: String,
    rx: mpsc::Receiver<Response>,
}

impl AgentInbox {
    pub(crate) fn new(agent: String, rx: mpsc::Receiver<Response>) -> Self {
        debug!(%agent, "AgentInbox::new: called");
        Self { agent, rx }
    }

    /// Name of the agent owning this inbox
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Wait for the next delivered response
    ///
    /// Returns None once the coordinator holding the sender is dropped.
    pub async fn recv(&mut self) -> Option<Response> {
        debug!(agent = %self.agent, "AgentInbox::recv: called");
        let result = self.rx.recv().await;
        if result.is_none() {
            debug!("AgentInbox::recv: channel closed");
        }
        result
    }

    /// Take the next response if one is waiting
    pub fn try_recv(&mut self) -> Option<Response> {
        debug!(agent = %self.agent, "AgentInbox::try_recv: called");
        self.rx.try_recv().ok()
    }

    /// Take every response currently waiting
    pub fn drain(&mut self) -> Vec<Response> {
        debug!(agent = %self.agent, "AgentInbox::drain: called");
        let mut responses = Vec::new();
        while let Ok(response) = self.rx.try_recv() {
            responses.push(response);
        }
        responses
    }

    /// Number of responses waiting
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
