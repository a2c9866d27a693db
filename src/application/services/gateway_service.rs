use crate::domain::entities::{
    AddToCartRequest, HealthResponse, LoginRequest, LoginResponse, SearchParams, Session,
};
use crate::domain::errors::{DomainError, UpstreamError};
use crate::domain::ports::retailer_client::{RetailerClient, RetailerClientFactory};
use crate::domain::ports::session_repository::SessionRepository;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";

/// Everything the gateway can report back to the HTTP layer.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The retailer refused the credentials, or could not be reached to check them.
    #[error("Login failed: {0}")]
    LoginFailed(UpstreamError),
    #[error("Session ID required")]
    SessionRequired,
    #[error("Invalid or expired session")]
    InvalidSession,
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        source: UpstreamError,
    },
    #[error("Session store error: {0}")]
    Store(#[from] DomainError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

fn upstream_failure(context: &'static str) -> impl FnOnce(UpstreamError) -> GatewayError {
    move |source| {
        warn!(
            status = ?source.status(),
            timed_out = source.is_timeout(),
            "{}: {}",
            context,
            source
        );
        GatewayError::Upstream { context, source }
    }
}

/// Maps session tokens to authenticated retailer clients and forwards each
/// request to the client owned by the caller's session.
#[derive(Clone)]
pub struct GatewayService {
    session_repo: Arc<dyn SessionRepository>,
    client_factory: Arc<dyn RetailerClientFactory>,
}

impl GatewayService {
    pub fn new(
        session_repo: Arc<dyn SessionRepository>,
        client_factory: Arc<dyn RetailerClientFactory>,
    ) -> Self {
        Self {
            session_repo,
            client_factory,
        }
    }

    /// Log in upstream with a brand new client and register it under a fresh
    /// token. Nothing is stored when the retailer rejects the login.
    pub async fn login(&self, request: &LoginRequest) -> GatewayResult<LoginResponse> {
        let client = self
            .client_factory
            .create_client()
            .map_err(GatewayError::LoginFailed)?;

        if let Err(e) = client.login(&request.email, &request.password).await {
            warn!(status = ?e.status(), "Upstream login rejected: {}", e);
            return Err(GatewayError::LoginFailed(e));
        }

        let session = Session::new(client);
        let session_id = session.token.clone();
        self.session_repo.create_session(session).await?;

        let active = self.session_repo.count_sessions().await?;
        info!(active_sessions = active, "Session created");

        Ok(LoginResponse {
            session_id,
            message: LOGIN_SUCCESS_MESSAGE.to_string(),
        })
    }

    /// Find the client registered for `token`.
    ///
    /// Only the local mapping is checked; whether the retailer still honours
    /// the cookies is discovered on the next upstream call.
    pub async fn resolve(&self, token: Option<&str>) -> GatewayResult<Arc<dyn RetailerClient>> {
        let token = match token {
            Some(token) if !token.is_empty() => token,
            _ => return Err(GatewayError::SessionRequired),
        };

        self.session_repo
            .get_session(token)
            .await?
            .map(|session| session.client)
            .ok_or(GatewayError::InvalidSession)
    }

    pub async fn search(&self, token: Option<&str>, params: &SearchParams) -> GatewayResult<Value> {
        let client = self.resolve(token).await?;
        client
            .search_products(&params.q, params.limit, &params.mode)
            .await
            .map_err(upstream_failure("Search failed"))
    }

    /// Product detail, or `null` when the retailer's response carried no `data`.
    pub async fn get_product(&self, token: Option<&str>, product_id: &str) -> GatewayResult<Value> {
        let client = self.resolve(token).await?;
        let product = client
            .get_product(product_id)
            .await
            .map_err(upstream_failure("Failed to get product"))?;

        Ok(product.unwrap_or(Value::Null))
    }

    pub async fn add_to_cart(
        &self,
        token: Option<&str>,
        item: &AddToCartRequest,
    ) -> GatewayResult<Value> {
        let client = self.resolve(token).await?;
        client
            .add_to_cart(&item.store_product_id, item.quantity, &item.mode)
            .await
            .map_err(upstream_failure("Failed to add to cart"))
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::ok()
    }
}
