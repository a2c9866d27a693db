use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// DTO: Credentials posted to `/api/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// DTO: Response for a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub session_id: String,
    pub message: String,
}

/// DTO: Query string of `/api/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_search_mode")]
    pub mode: String,
}

fn default_limit() -> i64 {
    8
}

fn default_search_mode() -> String {
    "pickup".to_string()
}

/// DTO: Body of `/api/cart/add`
#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartRequest {
    pub store_product_id: StoreProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default = "default_cart_mode")]
    pub mode: String,
}

fn default_quantity() -> i64 {
    1
}

fn default_cart_mode() -> String {
    "each".to_string()
}

/// DTO: Response of `/api/health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Retailer-side product identifier.
///
/// The frontend sends it as a string or a bare integer; the retailer only
/// accepts strings, so it is normalized on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StoreProductId(String);

impl StoreProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StoreProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(id) => StoreProductId(id),
            RawId::Unsigned(id) => StoreProductId(id.to_string()),
            RawId::Signed(id) => StoreProductId(id.to_string()),
        })
    }
}
