//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::events::NotificationKind;
use crate::intercept::{WatchRule, ORDER_PATTERN, REPORT_PATTERN};
use crate::upstream::SalesApiConfig;
use crate::widget::WidgetSettings;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub intercept: InterceptConfig,

    #[serde(default)]
    pub widget: WidgetSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8084".to_string(),
        "http://127.0.0.1:8084".to_string(),
    ]
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Remote sales API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_sales_base_url")]
    pub sales_base_url: String,

    /// Falls back to `sales_base_url` when unset
    #[serde(default)]
    pub orders_base_url: Option<String>,

    #[serde(default = "default_upstream_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_send_contact_number")]
    pub send_contact_number: bool,

    /// Extra headers sent on order creation
    #[serde(default)]
    pub order_headers: BTreeMap<String, String>,
}

fn default_sales_base_url() -> String {
    "https://sales-analysis-api-soa1.onrender.com".to_string()
}

fn default_upstream_timeout() -> u64 {
    30_000
}

fn default_send_contact_number() -> bool {
    true
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            sales_base_url: default_sales_base_url(),
            orders_base_url: None,
            request_timeout_ms: default_upstream_timeout(),
            send_contact_number: default_send_contact_number(),
            order_headers: BTreeMap::new(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn client_config(&self) -> SalesApiConfig {
        SalesApiConfig {
            sales_base_url: self.sales_base_url.clone(),
            orders_base_url: self
                .orders_base_url
                .clone()
                .unwrap_or_else(|| self.sales_base_url.clone()),
            send_contact_number: self.send_contact_number,
            order_headers: self.order_headers.clone(),
        }
    }
}

/// Which outbound calls produce notifications
#[derive(Debug, Clone, Deserialize)]
pub struct InterceptConfig {
    #[serde(default = "default_report_pattern")]
    pub report_pattern: String,

    #[serde(default = "default_order_pattern")]
    pub order_pattern: String,
}

fn default_report_pattern() -> String {
    REPORT_PATTERN.to_string()
}

fn default_order_pattern() -> String {
    ORDER_PATTERN.to_string()
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            report_pattern: default_report_pattern(),
            order_pattern: default_order_pattern(),
        }
    }
}

impl InterceptConfig {
    pub fn rules(&self) -> Vec<WatchRule> {
        vec![
            WatchRule::new(&self.report_pattern, NotificationKind::ReportDataUpdated),
            WatchRule::new(&self.order_pattern, NotificationKind::OrderCreated),
        ]
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, or fall back to the default locations
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("salesdesk").join("config.toml")),
            Some(PathBuf::from("/etc/salesdesk/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `SALESDESK_*` overrides from any key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = lookup("SALESDESK_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("SALESDESK_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid SALESDESK_PORT"),
            }
        }

        // Upstream overrides
        if let Some(url) = lookup("SALESDESK_SALES_API_URL") {
            self.upstream.sales_base_url = url;
        }
        if let Some(url) = lookup("SALESDESK_ORDERS_API_URL") {
            self.upstream.orders_base_url = Some(url);
        }

        // Logging overrides
        if let Some(level) = lookup("SALESDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SALESDESK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# SalesDesk Gateway Configuration
#
# Environment variables override these settings:
# - SALESDESK_HOST
# - SALESDESK_PORT
# - SALESDESK_SALES_API_URL
# - SALESDESK_ORDERS_API_URL
# - SALESDESK_LOG_LEVEL
# - SALESDESK_LOG_FORMAT

[api]
# Gateway host
host = "0.0.0.0"

# Gateway port
port = 8082

# Allowed CORS origins (the dashboard); empty allows any origin
cors_origins = ["http://localhost:8084", "http://127.0.0.1:8084"]

[upstream]
# Remote sales API (reports and fulfillment)
sales_base_url = "https://sales-analysis-api-soa1.onrender.com"

# Order creation API, defaults to sales_base_url
# orders_base_url = "https://orders.example.com"

# Timeout for calls to the remote API (ms)
request_timeout_ms = 30000

# Forward the optional contact number on new orders
send_contact_number = true

# Extra headers for order creation
[upstream.order_headers]
# "ngrok-skip-browser-warning" = "true"

[intercept]
# Responses from calls whose URL contains these substrings are published
report_pattern = "/api/sales/generate-report"
order_pattern = "/api/orders/create"

[widget]
orchestration_id = "dc32db464f4449efb6b4531a37154977_4ef8abfc-f9ba-4be6-a2d3-df876913a154"
host_url = "https://eu-gb.watson-orchestrate.cloud.ibm.com"
root_element_id = "watsonx-chat-root"
show_launcher = true
deployment_platform = "ibmcloud"
crn = "crn:v1:bluemix:public:watsonx-orchestrate:eu-gb:a/dc32db464f4449efb6b4531a37154977:4ef8abfc-f9ba-4be6-a2d3-df876913a154::"

# Delay between writing the widget config and injecting the loader (ms)
injection_delay_ms = 100

# Agent used on routes without a specific entry
[widget.default_agent]
agent_id = "69e6d33d-9326-442f-a870-bce64c94adeb"
agent_environment_id = "f997ce1f-ce83-4532-aff5-4e1c670fe810"

# Per-route agents
[[widget.routes]]
route = "/"
agent_id = "1f37ccc3-06ab-4567-a4f6-9ab9b7fd74f0"
agent_environment_id = "1790bb0a-9025-4477-907d-fa086b379fe0"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_generated_default_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 8082);
        assert_eq!(config.widget.injection_delay_ms, 100);
        assert_eq!(config.widget.routes.len(), 1);
        assert_eq!(config.intercept.rules().len(), 2);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[upstream]
sales_base_url = "https://sales.example.com"
send_contact_number = false

[upstream.order_headers]
"ngrok-skip-browser-warning" = "true"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        let client = config.upstream.client_config();

        assert_eq!(client.sales_base_url, "https://sales.example.com");
        assert_eq!(client.orders_base_url, "https://sales.example.com");
        assert!(!client.send_contact_number);
        assert_eq!(
            client.order_headers.get("ngrok-skip-browser-warning").map(String::as_str),
            Some("true")
        );
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nport = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SALESDESK_PORT", "9000"),
            ("SALESDESK_ORDERS_API_URL", "https://orders.example.com"),
            ("SALESDESK_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 9000);
        assert_eq!(
            config.upstream.client_config().orders_base_url,
            "https://orders.example.com"
        );
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_invalid_port_override_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "SALESDESK_PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.api.port, 8082);
    }
}
