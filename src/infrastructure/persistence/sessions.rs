use crate::domain::entities::Session;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::session_repository::SessionRepository;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-local session store. Entries live until the process exits.
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create_session(&self, session: Session) -> DomainResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.token) {
            return Err(DomainError::Conflict(format!(
                "Session token {} is already registered",
                session.token
            )));
        }
        sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get_session(&self, token: &str) -> DomainResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(token).cloned())
    }

    async fn count_sessions(&self) -> DomainResult<usize> {
        Ok(self.sessions.read().await.len())
    }
}
