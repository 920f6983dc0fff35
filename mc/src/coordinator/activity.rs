//! Bounded log of recent routing activity

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to an event or response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ActivityKind {
    /// An agent produced a response
    Responded { agent: String },
    /// No agent was registered for the category
    Unhandled,
    /// The payload exceeded the size limit
    PayloadRejected { agent: String, size: usize },
    /// The agent's handler returned an error
    HandlerFailed { agent: String, message: String },
    /// A response reached a collaborator's inbox
    Delivered { from: String, to: String },
    /// A response could not reach a collaborator
    DeliveryFailed { from: String, to: String, reason: String },
}

/// One timestamped activity record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub category: String,
    #[serde(flatten)]
    pub kind: ActivityKind,
}

impl ActivityEntry {
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            ActivityKind::Unhandled
                | ActivityKind::PayloadRejected { .. }
                | ActivityKind::HandlerFailed { .. } | ActivityKind::DeliveryFailed { .. }
        )
    }
}

impl std::fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ts = self.timestamp.format("%Y-%m-%d %H:%M:%S");
        match &self.kind {
            ActivityKind::Responded { agent } => write!(f, "{} [{}] {} responded", ts, self.category, agent),
            ActivityKind::Unhandled => write!(f, "{} [{}] unhandled", ts, self.category),
            ActivityKind::PayloadRejected { agent, size } => {
                write!(f, "{} [{}] {} rejected {} byte payload", ts, self.category, agent, size)
            }
            ActivityKind::HandlerFailed { agent, message } => {
                write!(f, "{} [{}] {} failed: {}", ts, self.category, agent, message)
            }
            ActivityKind::Delivered { from, to } => write!(f, "{} [{}] {} -> {}", ts, self.category, from, to),
            ActivityKind::DeliveryFailed { from, to, reason } => {
                write!(f, "{} [{}] {} -> {} failed: {}", ts, self.category, from, to, reason)
            }
        }
    }
}

/// Keeps the most recent entries, dropping the oldest at capacity
#[derive(Debug)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn record(&mut self, category: impl Into<String>, kind: ActivityKind) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ActivityEntry {
            timestamp: Utc::now(),
            category: category.into(),
            kind,
        });
    }

    /// The last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<ActivityEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.entries.back().map(|e| e.timestamp)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Snapshot of the coordinator for status reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorStatus {
    pub total_agents: usize,
    pub agent_names: Vec<String>,
    pub recent: Vec<ActivityEntry>,
    pub last_activity: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responded(agent: &str) -> ActivityKind {
        ActivityKind::Responded {
            agent: agent.to_string(),
        }
    }

    #[test]
    fn test_log_drops_oldest_at_capacity() {
        let mut log = ActivityLog::new(2);
        log.record("a", responded("Atlas"));
        log.record("b", responded("Aurora"));
        log.record("c", responded("Mercury"));

        let recent = log.recent(10);
        assert_eq!(log.len(), 2);
        assert_eq!(recent[0].category, "b");
        assert_eq!(recent[1].category, "c");
    }

    #[test]
    fn test_recent_returns_tail() {
        let mut log = ActivityLog::new(10);
        for i in 0..5 {
            log.record(format!("cat-{}", i), ActivityKind::Unhandled);
        }

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].category, "cat-3");
        assert_eq!(recent[1].category, "cat-4");
        assert_eq!(log.last_timestamp(), Some(recent[1].timestamp));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut log = ActivityLog::new(0);
        log.record("a", ActivityKind::Unhandled);
        assert!(log.is_empty());
        assert!(log.last_timestamp().is_none());
    }

    #[test]
    fn test_entry_serialization_flattens_kind() {
        let mut log = ActivityLog::new(1);
        log.record(
            "mall-event",
            ActivityKind::DeliveryFailed {
                from: "Atlas".to_string(),
                to: "Ghost".to_string(),
                reason: "unknown collaborator".to_string(),
            },
        );

        let entry = &log.recent(1)[0];
        assert!(entry.is_failure());

        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["kind"], "delivery-failed");
        assert_eq!(json["to"], "Ghost");
        assert_eq!(json["category"], "mall-event");
        assert!(entry.to_string().contains("Atlas -> Ghost failed"));
    }
}
