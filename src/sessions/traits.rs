//! Session storage traits and types for conversation state.
//!
//! Sessions record which handler served the last turn (feeding the router's
//! context) and a transcript whose trailing window feeds the switch policy.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::routing::AgentKind;

/// A tracked conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// Handler that served the most recent turn, if any.
    pub last_agent: Option<AgentKind>,
}

/// A single entry in a session transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.content)
    }
}

/// Storage for conversation sessions and transcripts.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a new session with the given id. Returns the created session.
    async fn create(&self, id: &str) -> Result<Session>;

    /// Get an existing session by id, if it exists.
    async fn get(&self, id: &str) -> Result<Option<Session>>;

    /// Record the handler that served the latest turn.
    async fn set_last_agent(&self, id: &str, agent: AgentKind) -> Result<()>;

    /// Append an entry to the session transcript.
    async fn append_transcript(&self, id: &str, entry: TranscriptEntry) -> Result<()>;

    /// Retrieve transcript entries, optionally only the most recent `limit`.
    async fn get_transcript(
        &self,
        id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<TranscriptEntry>>;

    /// Delete a session and its transcript.
    async fn delete(&self, id: &str) -> Result<()>;

    /// The name of this session store implementation.
    fn name(&self) -> &str;
}
