use crate::domain::entities::StoreProductId;
use crate::domain::errors::UpstreamResult;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Outbound port to the retailer's REST API.
///
/// One instance represents one upstream login: implementations keep the
/// cookies handed out by `login` and replay them on every later call.
#[async_trait]
pub trait RetailerClient: Send + Sync {
    /// Authenticate against the retailer. Success leaves session cookies in
    /// the client.
    async fn login(&self, email: &str, password: &str) -> UpstreamResult<()>;

    /// Full-text product search. The body is returned exactly as received.
    async fn search_products(&self, query: &str, limit: i64, mode: &str) -> UpstreamResult<Value>;

    /// Product detail lookup. Yields the `data` member of the response, or
    /// `None` when the retailer omitted it.
    async fn get_product(&self, product_id: &str) -> UpstreamResult<Option<Value>>;

    async fn add_to_cart(
        &self,
        store_product_id: &StoreProductId,
        quantity: i64,
        mode: &str,
    ) -> UpstreamResult<Value>;
}

/// Builds a fresh, unauthenticated client for each login so cookie jars are
/// never shared between sessions.
pub trait RetailerClientFactory: Send + Sync {
    fn create_client(&self) -> UpstreamResult<Arc<dyn RetailerClient>>;
}
