//! Dashboard configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//!
//! None - every setting has a workable local default.
//!
//! ## Optional
//! - `WMS_API_BASE_URL` - Base URL of the warehouse API (default: `http://localhost:3000/api/v1`)
//! - `DASHBOARD_HOST` - Bind address (default: 127.0.0.1)
//! - `DASHBOARD_PORT` - Listen port (default: 3001)
//! - `DASHBOARD_ORDERS_SOURCE` - `mock` or `live` (default: mock)
//! - `DASHBOARD_LOG_JSON` - `true` for JSON log output (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (0.0 to 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (0.0 to 1.0)
//!
//! ## Optional (TLS)
//! - `DASHBOARD_TLS_CERT` - PEM-encoded certificate chain
//! - `DASHBOARD_TLS_KEY` - PEM-encoded private key

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default base URL of the warehouse API.
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api/v1";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard application configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Warehouse API configuration
    pub wms_api: WmsApiConfig,
    /// Where the orders table gets its rows
    pub orders_source: OrdersSource,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// Warehouse API connection settings.
#[derive(Debug, Clone)]
pub struct WmsApiConfig {
    /// Base URL, e.g. `http://localhost:3000/api/v1`
    pub base_url: String,
}

impl WmsApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("WMS_API_BASE_URL", DEFAULT_API_BASE_URL);
        // Validate early so a typo fails at startup, not on the first request.
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("WMS_API_BASE_URL".to_string(), e.to_string()))?;
        Ok(Self { base_url })
    }
}

/// Which backend serves the orders table.
///
/// The upstream deployment ships without order endpoints, so the table
/// defaults to the placeholder rows; `live` switches it to `/order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrdersSource {
    #[default]
    Mock,
    Live,
}

impl FromStr for OrdersSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mock" => Ok(Self::Mock),
            "live" => Ok(Self::Live),
            other => Err(format!("invalid orders source: {other} (expected mock or live)")),
        }
    }
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env("DASHBOARD_TLS_CERT");
        let key_pem = get_optional_env("DASHBOARD_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "DASHBOARD_TLS_*".to_string(),
                "Both DASHBOARD_TLS_CERT and DASHBOARD_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("DASHBOARD_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("DASHBOARD_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_PORT".to_string(), e.to_string()))?;

        let wms_api = WmsApiConfig::from_env()?;

        let orders_source = get_env_or_default("DASHBOARD_ORDERS_SOURCE", "mock")
            .parse::<OrdersSource>()
            .map_err(|e| ConfigError::InvalidEnvVar("DASHBOARD_ORDERS_SOURCE".to_string(), e))?;

        let log_json = get_optional_env("DASHBOARD_LOG_JSON").is_some_and(|v| v == "true" || v == "1");

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let tls = TlsConfig::from_env()?;

        Ok(Self {
            host,
            port,
            wms_api,
            orders_source,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> DashboardConfig {
        DashboardConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            wms_api: WmsApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
            },
            orders_source: OrdersSource::Mock,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
            tls: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = test_config();
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3001);
    }

    #[test]
    fn test_orders_source_parse() {
        assert_eq!("mock".parse::<OrdersSource>().unwrap(), OrdersSource::Mock);
        assert_eq!("live".parse::<OrdersSource>().unwrap(), OrdersSource::Live);
        assert!("static".parse::<OrdersSource>().is_err());
    }

    #[test]
    fn test_orders_source_defaults_to_mock() {
        assert_eq!(OrdersSource::default(), OrdersSource::Mock);
    }

    #[test]
    fn test_default_api_base_url() {
        assert_eq!(DEFAULT_API_BASE_URL, "http://localhost:3000/api/v1");
    }

    #[test]
    fn test_tls_config_debug_redacts_key() {
        let config = TlsConfig {
            cert_pem: "---CERT---".to_string(),
            key_pem: SecretString::from("---PRIVATE KEY---"),
        };
        let output = format!("{config:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("PRIVATE KEY"));
    }
}
