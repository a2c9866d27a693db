use crate::config::UpstreamConfig;
use crate::domain::entities::StoreProductId;
use crate::domain::errors::{UpstreamError, UpstreamResult};
use crate::domain::ports::retailer_client::{RetailerClient, RetailerClientFactory};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str = "application/json, text/plain, */*";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Expansion lists the cart endpoint insists on; it rejects the call without them.
pub const CART_PRODUCT_EXPANDS: &str = "is_in_default_favorite_list,modifications,\
availableModifications,modificationsAttributes,store_mapping";
pub const CART_EXPAND: &str = "loyalty,withOutOfStockProducts";

/// Product detail is always fetched in pickup mode.
const PRODUCT_MODE: &str = "pickup";

#[derive(Debug, Serialize)]
struct LoginPayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchPayload {
    tag_id: Vec<String>,
    category_id: Option<String>,
    department_id: Option<String>,
    e_search: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartPayload<'a> {
    mode: &'a str,
    quantity: i64,
    store_product_id: &'a str,
    modification_id: Option<&'a str>,
}

/// Base64 (standard alphabet, padded) of the UTF-8 bytes of a search term,
/// as the retailer expects in `eSearch`.
pub fn encode_search_term(query: &str) -> String {
    STANDARD.encode(query.as_bytes())
}

/// reqwest-backed client for the retailer's `rest-proxy/v2` API.
///
/// Each instance owns its own cookie store, so one instance corresponds to
/// exactly one upstream login.
pub struct HttpRetailerClient {
    base_url: String,
    store_id: String,
    http: Client,
}

impl HttpRetailerClient {
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| {
            UpstreamError::Configuration(format!("Invalid base URL {}: {}", base_url, e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
        );
        headers.insert(ORIGIN, header_value(&base_url)?);
        headers.insert(REFERER, header_value(&format!("{}/", base_url))?);

        let http = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                UpstreamError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            base_url,
            store_id: config.store_id.clone(),
            http,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/rest-proxy/v2/{}", self.base_url, path)
    }

    fn store_url(&self, path: &str) -> String {
        self.api_url(&format!("layout/stores/{}/{}", self.store_id, path))
    }

    fn product_url(&self, product_id: &str) -> UpstreamResult<Url> {
        let mut url = Url::parse(&self.store_url("products"))
            .map_err(|e| UpstreamError::Configuration(format!("Invalid product URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| UpstreamError::Configuration("Base URL cannot carry a path".to_string()))?
            .push(product_id);
        Ok(url)
    }

    /// Send a request and turn anything but a 2xx into an error carrying the
    /// upstream status and body.
    async fn send(&self, operation: &'static str, request: RequestBuilder) -> UpstreamResult<Response> {
        let started = Instant::now();
        let result = request.send().await;
        metrics::histogram!("upstream_request_duration_seconds", "operation" => operation)
            .record(started.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::counter!(
                    "upstream_requests_total",
                    "operation" => operation,
                    "outcome" => "transport_error"
                )
                .increment(1);
                warn!(operation, "Upstream request failed: {}", e);
                return Err(transport_error(operation, e));
            }
        };

        let status = response.status();
        info!(operation, status = status.as_u16(), "Upstream responded");

        if status.is_success() {
            metrics::counter!("upstream_requests_total", "operation" => operation, "outcome" => "ok")
                .increment(1);
            return Ok(response);
        }

        metrics::counter!(
            "upstream_requests_total",
            "operation" => operation,
            "outcome" => "http_error"
        )
        .increment(1);
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    operation,
                    status = status.as_u16(),
                    "Could not read upstream error body: {}",
                    e
                );
                String::new()
            }
        };
        Err(UpstreamError::Status {
            operation,
            status: status.as_u16(),
            body,
        })
    }

    async fn read_json(operation: &'static str, response: Response) -> UpstreamResult<Value> {
        let body = response.text().await.map_err(|e| transport_error(operation, e))?;
        debug!(operation, snippet = %snippet(&body), "Upstream body");
        serde_json::from_str(&body).map_err(|e| UpstreamError::Decode {
            operation,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl RetailerClient for HttpRetailerClient {
    async fn login(&self, email: &str, password: &str) -> UpstreamResult<()> {
        let payload = LoginPayload {
            kind: "email",
            email,
            password,
        };
        let request = self.http.post(self.api_url("auth/login")).json(&payload);

        self.send("login", request).await?;
        Ok(())
    }

    async fn search_products(&self, query: &str, limit: i64, mode: &str) -> UpstreamResult<Value> {
        let payload = SearchPayload {
            tag_id: Vec::new(),
            category_id: None,
            department_id: None,
            e_search: encode_search_term(query),
        };
        let limit = limit.to_string();
        let request = self
            .http
            .post(self.store_url("products/search"))
            .query(&[("mode", mode), ("limit", limit.as_str())])
            .json(&payload);

        let response = self.send("search_products", request).await?;
        Self::read_json("search_products", response).await
    }

    async fn get_product(&self, product_id: &str) -> UpstreamResult<Option<Value>> {
        let request = self
            .http
            .get(self.product_url(product_id)?)
            .query(&[("mode", PRODUCT_MODE)]);

        let response = self.send("get_product", request).await?;
        product_data(Self::read_json("get_product", response).await?)
    }

    async fn add_to_cart(
        &self,
        store_product_id: &StoreProductId,
        quantity: i64,
        mode: &str,
    ) -> UpstreamResult<Value> {
        debug!(%store_product_id, quantity, mode, "Adding to cart");
        let payload = CartPayload {
            mode,
            quantity,
            store_product_id: store_product_id.as_str(),
            modification_id: None,
        };
        let request = self
            .http
            .put(self.api_url("layout/cart/add"))
            .query(&[
                ("productExpands", CART_PRODUCT_EXPANDS),
                ("expand", CART_EXPAND),
            ])
            .json(&payload);

        let response = self.send("add_to_cart", request).await?;
        Self::read_json("add_to_cart", response).await
    }
}

/// The `data` member of a product response. A body that is not a JSON object
/// is a decode failure; an object without `data` is simply no product.
fn product_data(body: Value) -> UpstreamResult<Option<Value>> {
    match body {
        Value::Object(mut body) => Ok(body.remove("data")),
        other => Err(UpstreamError::Decode {
            operation: "get_product",
            message: format!("expected a JSON object, got {}", snippet(&other.to_string())),
        }),
    }
}

/// Production factory: every login gets a new [`HttpRetailerClient`].
#[derive(Clone, Debug)]
pub struct HttpRetailerClientFactory {
    config: UpstreamConfig,
}

impl HttpRetailerClientFactory {
    pub fn new(config: UpstreamConfig) -> Self {
        Self { config }
    }
}

impl RetailerClientFactory for HttpRetailerClientFactory {
    fn create_client(&self) -> UpstreamResult<Arc<dyn RetailerClient>> {
        Ok(Arc::new(HttpRetailerClient::new(&self.config)?))
    }
}

fn header_value(value: &str) -> UpstreamResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| UpstreamError::Configuration(format!("Invalid header value {}: {}", value, e)))
}

fn transport_error(operation: &'static str, e: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport {
        operation,
        timed_out: e.is_timeout(),
        message: e.to_string(),
    }
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(500) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
