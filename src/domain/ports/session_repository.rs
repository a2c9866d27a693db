use crate::domain::entities::Session;
use crate::domain::errors::DomainResult;

/// Storage backend for gateway sessions.
#[async_trait::async_trait]
pub trait SessionRepository: Send + Sync {
    /// Register a session. Fails with `DomainError::Conflict` if the token is
    /// already taken.
    async fn create_session(&self, session: Session) -> DomainResult<()>;
    async fn get_session(&self, token: &str) -> DomainResult<Option<Session>>;
    async fn count_sessions(&self) -> DomainResult<usize>;
}
