//! In-memory session store implementation.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::traits::{Session, SessionStore, TranscriptEntry};

/// An in-memory session store backed by mutex-protected hash maps.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    transcripts: Mutex<HashMap<String, Vec<TranscriptEntry>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            transcripts: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, id: &str) -> Result<Session> {
        let now = Utc::now();
        let session = Session {
            id: id.to_string(),
            created_at: now,
            last_activity: now,
            last_agent: None,
        };

        let mut sessions = self.sessions.lock();
        sessions.insert(id.to_string(), session.clone());
        Ok(session)
    }

    async fn get(&self, id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.lock();
        Ok(sessions.get(id).cloned())
    }

    async fn set_last_agent(&self, id: &str, agent: crate::routing::AgentKind) -> Result<()> {
        let mut sessions = self.sessions.lock();
        match sessions.get_mut(id) {
            Some(session) => {
                session.last_agent = Some(agent);
                session.last_activity = Utc::now();
                Ok(())
            }
            None => bail!("session not found: {id}"),
        }
    }

    async fn append_transcript(&self, id: &str, entry: TranscriptEntry) -> Result<()> {
        {
            let mut sessions = self.sessions.lock();
            if let Some(session) = sessions.get_mut(id) {
                session.last_activity = Utc::now();
            }
        }

        let mut transcripts = self.transcripts.lock();
        transcripts.entry(id.to_string()).or_default().push(entry);
        Ok(())
    }

    async fn get_transcript(
        &self,
        id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<TranscriptEntry>> {
        let transcripts = self.transcripts.lock();
        let entries = match transcripts.get(id) {
            Some(entries) => entries.clone(),
            None => return Ok(Vec::new()),
        };

        match limit {
            Some(n) => {
                let start = entries.len().saturating_sub(n);
                Ok(entries[start..].to_vec())
            }
            None => Ok(entries),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut sessions = self.sessions.lock();
        sessions.remove(id);
        drop(sessions);

        let mut transcripts = self.transcripts.lock();
        transcripts.remove(id);
        Ok(())
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}
