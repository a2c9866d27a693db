use crate::domain::ports::retailer_client::RetailerClient;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Entity: a logged-in user's handle on the retailer.
///
/// The token is what the frontend sends back in `X-Session-ID`; the client
/// owns the cookie jar the retailer filled during login.
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub client: Arc<dyn RetailerClient>,
}

impl Session {
    /// Wrap an authenticated client under a freshly generated random token.
    pub fn new(client: Arc<dyn RetailerClient>) -> Self {
        Self {
            token: Uuid::new_v4().to_string(),
            client,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}
