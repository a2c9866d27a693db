use std::env;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://shop.heinzcatering.berkeleybowl.com";
pub const DEFAULT_STORE_ID: &str = "2047";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the retailer.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub store_id: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            store_id: DEFAULT_STORE_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub upstream: UpstreamConfig,
    pub cors_allowed_origin: String,
    pub upstream_email: Option<String>,
    pub upstream_password: Option<String>,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let server_port = var("SERVER_PORT")
            .unwrap_or_else(|| "8000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let base_url = var("UPSTREAM_BASE_URL")
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let store_id = var("UPSTREAM_STORE_ID").unwrap_or_else(|| DEFAULT_STORE_ID.to_string());

        let timeout_secs: u64 = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidTimeout)?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        let cors_allowed_origin =
            var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        let upstream_email = var("UPSTREAM_EMAIL").filter(|v| !v.is_empty());
        let upstream_password = var("UPSTREAM_PASSWORD").filter(|v| !v.is_empty());

        let otel_exporter_endpoint = var("OTEL_EXPORTER_OTLP_ENDPOINT");

        let service_name = var("SERVICE_NAME").unwrap_or_else(|| "basket-relay".to_string());

        let metrics_port = match var("METRICS_PORT") {
            Some(raw) => Some(raw.parse().map_err(|_| ConfigError::InvalidMetricsPort)?),
            None => None,
        };

        Ok(Config {
            server_host,
            server_port,
            upstream: UpstreamConfig {
                base_url,
                store_id,
                timeout: Duration::from_secs(timeout_secs),
            },
            cors_allowed_origin,
            upstream_email,
            upstream_password,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Credentials for running against the retailer without the HTTP layer.
    pub fn upstream_credentials(&self) -> Result<(&str, &str), ConfigError> {
        match (&self.upstream_email, &self.upstream_password) {
            (Some(email), Some(password)) => Ok((email.as_str(), password.as_str())),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid metrics port number")]
    InvalidMetricsPort,

    #[error("UPSTREAM_TIMEOUT_SECS must be a positive number of seconds")]
    InvalidTimeout,

    #[error("Please set UPSTREAM_EMAIL and UPSTREAM_PASSWORD environment variables")]
    MissingCredentials,
}
