//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! HTTP cache headers, display text, logging and default paths. `AppConfig` is
//! the root configuration struct containing all settings.

use std::path::Path;
use std::time::Duration;

use const_format::formatcp;
use serde::{Deserialize, Serialize};

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Status pages reflect a live backend call and must never be served from an
// upstream cache. Static assets are fingerprint-free but change only on deploy.

/// Static assets (CSS) - long cache with immutable hint
pub const HTTP_CACHE_STATIC_MAX_AGE: u32 = 86400;

/// Error responses - short TTL so a broken deploy recovers quickly
pub const HTTP_CACHE_ERROR_MAX_AGE: u32 = 5;

pub const CACHE_CONTROL_PAGE: &str = "no-store";

pub const CACHE_CONTROL_STATIC: &str =
    formatcp!("public, max-age={}, immutable", HTTP_CACHE_STATIC_MAX_AGE);

pub const CACHE_CONTROL_ERROR: &str = formatcp!("public, max-age={}", HTTP_CACHE_ERROR_MAX_AGE);

// =============================================================================
// Status Page Display Text
// =============================================================================

/// Message shown while the backend call is outstanding
pub const LOADING_MESSAGE: &str = "Loading...";

/// Message shown once the backend call has failed
pub const FAILURE_MESSAGE: &str = "Failed to connect to backend";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default directory holding the Tera templates
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Default directory for static files
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default backend route answering the greeting
pub const DEFAULT_HELLO_PATH: &str = "/api/hello";

/// Default heading of the status page
pub const DEFAULT_SITE_NAME: &str = "Zinad Fullstack App";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "zinad_status=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// Backend health endpoint
    pub backend: BackendConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Mounted page registry limits
    #[serde(default)]
    pub pages: PageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for open connections on shutdown (default: 30)
    #[serde(default = "HttpServerConfig::default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

impl HttpServerConfig {
    fn default_shutdown_grace() -> u64 {
        30
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

/// Where and how the status page reaches the backend
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Scheme, host and port of the backend, e.g. `http://backend:8000`
    pub base_url: String,
    #[serde(default = "BackendConfig::default_hello_path")]
    pub hello_path: String,
    /// Whole-request timeout in seconds (default: 10)
    #[serde(default = "BackendConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// TCP connect timeout in seconds (default: 5)
    #[serde(default = "BackendConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl BackendConfig {
    fn default_hello_path() -> String {
        DEFAULT_HELLO_PATH.to_string()
    }

    fn default_request_timeout() -> u64 {
        10
    }

    fn default_connect_timeout() -> u64 {
        5
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    /// Full URL of the hello endpoint.
    pub fn hello_url(&self) -> Result<reqwest::Url, ConfigError> {
        let base = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Validation(format!("backend.base_url '{}': {}", self.base_url, e))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "backend.base_url '{}' must use http or https",
                self.base_url
            )));
        }
        if !self.hello_path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "backend.hello_path '{}' must start with '/'",
                self.hello_path
            )));
        }
        base.join(&self.hello_path).map_err(|e| {
            ConfigError::Validation(format!("backend.hello_path '{}': {}", self.hello_path, e))
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Heading shown on the status page
    #[serde(default = "UiConfig::default_site_name")]
    pub site_name: String,
    /// How long `GET /` waits for the backend call before rendering "Loading..."
    #[serde(default = "UiConfig::default_render_wait")]
    pub render_wait_ms: u64,
    /// Refresh interval of a page that is still loading
    #[serde(default = "UiConfig::default_refresh")]
    pub refresh_seconds: u64,
    #[serde(default = "UiConfig::default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "UiConfig::default_static_dir")]
    pub static_dir: String,
    /// Version string, populated at runtime
    #[serde(skip_deserializing, default = "UiConfig::default_version")]
    pub version: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            site_name: Self::default_site_name(),
            render_wait_ms: Self::default_render_wait(),
            refresh_seconds: Self::default_refresh(),
            templates_dir: Self::default_templates_dir(),
            static_dir: Self::default_static_dir(),
            version: Self::default_version(),
        }
    }
}

impl UiConfig {
    fn default_site_name() -> String {
        DEFAULT_SITE_NAME.to_string()
    }

    fn default_render_wait() -> u64 {
        1500
    }

    fn default_refresh() -> u64 {
        1
    }

    fn default_templates_dir() -> String {
        DEFAULT_TEMPLATES_DIR.to_string()
    }

    fn default_static_dir() -> String {
        DEFAULT_STATIC_DIR.to_string()
    }

    fn default_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    pub fn render_wait(&self) -> Duration {
        Duration::from_millis(self.render_wait_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    /// Maximum number of mounted pages kept at once (default: 10000)
    #[serde(default = "PageConfig::default_max_mounted")]
    pub max_mounted: u64,
    /// Seconds a page stays mounted without being rendered (default: 5 minutes)
    #[serde(default = "PageConfig::default_idle_ttl")]
    pub idle_ttl_seconds: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            max_mounted: Self::default_max_mounted(),
            idle_ttl_seconds: Self::default_idle_ttl(),
        }
    }
}

impl PageConfig {
    fn default_max_mounted() -> u64 {
        10000
    }

    fn default_idle_ttl() -> u64 {
        300 // 5 minutes
    }

    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        contents.parse()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.backend.hello_url()?;

        if self.ui.refresh_seconds == 0 {
            return Err(ConfigError::Validation(
                "ui.refresh_seconds must be at least 1".to_string(),
            ));
        }
        if self.pages.max_mounted == 0 {
            return Err(ConfigError::Validation(
                "pages.max_mounted must be at least 1".to_string(),
            ));
        }
        if !matches!(self.logging.format.to_ascii_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format '{}' must be \"text\" or \"json\"",
                self.logging.format
            )));
        }

        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
