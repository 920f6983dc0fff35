//! Response journal
//!
//! Appends every routed response and its broadcast outcome to a JSONL file so
//! past coordination can be reviewed with `mc history`.

use std::path::PathBuf;

use chrono::Utc;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use super::messages::BroadcastReport;
use crate::domain::Response;
use crate::error::DeliveryFailure;

const JOURNAL_FILE: &str = "responses.jsonl";

/// One journaled response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique entry ID
    pub id: String,
    /// Unix timestamp when recorded
    #[serde(rename = "created-at")]
    pub created_at: i64,
    pub response: Response,
    /// Collaborators that received the response
    #[serde(default)]
    pub delivered: Vec<String>,
    /// Collaborators that could not be reached
    #[serde(default)]
    pub failed: Vec<DeliveryFailure>,
}

impl JournalEntry {
    pub fn new(response: Response, report: &BroadcastReport) -> Self {
        debug!(agent = %response.agent(), "JournalEntry::new: called");
        Self {
            id: Uuid::now_v7().to_string(),
            created_at: Utc::now().timestamp(),
            response,
            delivered: report.delivered.clone(),
            failed: report.failed.clone(),
        }
    }

    /// Check if the entry involves an agent as sender or recipient
    pub fn involves(&self, agent: &str) -> bool {
        self.response.agent() == agent
            || self.delivered.iter().any(|a| a == agent)
            || self.failed.iter().any(|f| f.collaborator == agent)
    }
}

/// Append-only JSONL store for journal entries
#[derive(Debug, Clone)]
pub struct Journal {
    dir: PathBuf,
}

impl Journal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        debug!(?dir, "Journal::new: called");
        Self { dir }
    }

    /// Path of the JSONL file
    pub fn path(&self) -> PathBuf {
        self.dir.join(JOURNAL_FILE)
    }

    /// Append one entry
    pub async fn append(&self, entry: &JournalEntry) -> Result<()> {
        debug!(id = %entry.id, "Journal::append: called");
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create journal directory {}", self.dir.display()))?;

        let line = serde_json::to_string(entry)? + "\n";
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())
            .await
            .context("Failed to open journal file")?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!("Journal::append: entry written");
        Ok(())
    }

    /// Read every entry, oldest first
    ///
    /// Lines that fail to parse are skipped with a warning.
    pub async fn read_all(&self) -> Result<Vec<JournalEntry>> {
        debug!("Journal::read_all: called");
        let path = self.path();
        if !path.exists() {
            debug!("Journal::read_all: journal file does not exist");
            return Ok(vec![]);
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read journal {}", path.display()))?;

        let entries: Vec<JournalEntry> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(line = n + 1, error = %e, "Skipping malformed journal line");
                    None
                }
            })
            .collect();

        debug!(count = entries.len(), "Journal::read_all: returning entries");
        Ok(entries)
    }

    /// Last `limit` entries, optionally restricted to one agent
    pub async fn history(&self, agent: Option<&str>, limit: usize) -> Result<Vec<JournalEntry>> {
        debug!(?agent, %limit, "Journal::history: called");
        let entries: Vec<JournalEntry> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|e| agent.is_none_or(|a| e.involves(a)))
            .collect();

        let skip = entries.len().saturating_sub(limit);
        Ok(entries.into_iter().skip(skip).collect())
    }
}
