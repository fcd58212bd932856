//! Chat Widget Configuration
//!
//! The embedded chat widget is configured through a global object the
//! loader script reads on startup. The gateway owns the deployment settings
//! and picks the agent per dashboard route: order entry talks to the
//! order-placing agent, every other page to the sales-analysis agent.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Path of the loader script under the widget host
pub const LOADER_PATH: &str = "/wxochat/wxoLoader.js";

/// Substring identifying injected loader scripts
pub const LOADER_MARKER: &str = "wxoLoader.js";

/// Which agent a chat session talks to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    #[serde(rename = "agentId", alias = "agent_id")]
    pub agent_id: String,
    #[serde(rename = "agentEnvironmentId", alias = "agent_environment_id")]
    pub agent_environment_id: String,
}

impl AgentIdentity {
    pub fn new(agent_id: impl Into<String>, agent_environment_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_environment_id: agent_environment_id.into(),
        }
    }

    /// Sales-analysis agent
    pub fn sales() -> Self {
        Self::new(
            "69e6d33d-9326-442f-a870-bce64c94adeb",
            "f997ce1f-ce83-4532-aff5-4e1c670fe810",
        )
    }

    /// Order-placing agent
    pub fn orders() -> Self {
        Self::new(
            "1f37ccc3-06ab-4567-a4f6-9ab9b7fd74f0",
            "1790bb0a-9025-4477-907d-fa086b379fe0",
        )
    }
}

/// An agent bound to one dashboard route
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteAgent {
    pub route: String,
    #[serde(flatten)]
    pub agent: AgentIdentity,
}

/// The `[widget]` config section
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetSettings {
    #[serde(default = "default_orchestration_id")]
    pub orchestration_id: String,

    #[serde(default = "default_host_url")]
    pub host_url: String,

    #[serde(default = "default_root_element_id")]
    pub root_element_id: String,

    #[serde(default = "default_show_launcher")]
    pub show_launcher: bool,

    #[serde(default = "default_deployment_platform")]
    pub deployment_platform: String,

    #[serde(default = "default_crn")]
    pub crn: String,

    /// Browser timers take 32-bit milliseconds
    #[serde(default = "default_injection_delay")]
    pub injection_delay_ms: u32,

    #[serde(default = "AgentIdentity::sales")]
    pub default_agent: AgentIdentity,

    #[serde(default = "default_routes")]
    pub routes: Vec<RouteAgent>,
}

fn default_orchestration_id() -> String {
    "dc32db464f4449efb6b4531a37154977_4ef8abfc-f9ba-4be6-a2d3-df876913a154".to_string()
}

fn default_host_url() -> String {
    "https://eu-gb.watson-orchestrate.cloud.ibm.com".to_string()
}

fn default_root_element_id() -> String {
    "watsonx-chat-root".to_string()
}

fn default_show_launcher() -> bool {
    true
}

fn default_deployment_platform() -> String {
    "ibmcloud".to_string()
}

fn default_crn() -> String {
    "crn:v1:bluemix:public:watsonx-orchestrate:eu-gb:a/dc32db464f4449efb6b4531a37154977:4ef8abfc-f9ba-4be6-a2d3-df876913a154::".to_string()
}

fn default_injection_delay() -> u32 {
    100
}

fn default_routes() -> Vec<RouteAgent> {
    vec![RouteAgent {
        route: "/".to_string(),
        agent: AgentIdentity::orders(),
    }]
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            orchestration_id: default_orchestration_id(),
            host_url: default_host_url(),
            root_element_id: default_root_element_id(),
            show_launcher: default_show_launcher(),
            deployment_platform: default_deployment_platform(),
            crn: default_crn(),
            injection_delay_ms: default_injection_delay(),
            default_agent: AgentIdentity::sales(),
            routes: default_routes(),
        }
    }
}

impl WidgetSettings {
    /// Agent for a dashboard route
    ///
    /// Routes compare without a trailing slash, so `/reports/` and
    /// `/reports` resolve the same.
    pub fn agent_for(&self, route: &str) -> &AgentIdentity {
        let route = normalize_route(route);
        self.routes
            .iter()
            .find(|r| normalize_route(&r.route) == route)
            .map(|r| &r.agent)
            .unwrap_or(&self.default_agent)
    }

    /// Full widget configuration for a dashboard route
    pub fn config_for(&self, route: &str) -> WidgetConfig {
        WidgetConfig {
            orchestration_id: self.orchestration_id.clone(),
            host_url: self.host_url.clone(),
            root_element_id: self.root_element_id.clone(),
            show_launcher: self.show_launcher,
            deployment_platform: self.deployment_platform.clone(),
            crn: self.crn.clone(),
            chat_options: self.agent_for(route).clone(),
        }
    }

    pub fn loader_url(&self) -> String {
        loader_url(&self.host_url)
    }

    pub fn injection_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.injection_delay_ms))
    }
}

/// The object the loader script reads from the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(rename = "orchestrationID")]
    pub orchestration_id: String,
    #[serde(rename = "hostURL")]
    pub host_url: String,
    #[serde(rename = "rootElementID")]
    pub root_element_id: String,
    #[serde(rename = "showLauncher")]
    pub show_launcher: bool,
    #[serde(rename = "deploymentPlatform")]
    pub deployment_platform: String,
    pub crn: String,
    #[serde(rename = "chatOptions")]
    pub chat_options: AgentIdentity,
}

/// `{host}/wxochat/wxoLoader.js?embed=true`
pub fn loader_url(host_url: &str) -> String {
    format!("{}{}?embed=true", host_url.trim_end_matches('/'), LOADER_PATH)
}

fn normalize_route(route: &str) -> &str {
    let trimmed = route.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_orders_route_uses_orders_agent() {
        let settings = WidgetSettings::default();
        assert_eq!(settings.agent_for("/"), &AgentIdentity::orders());
        assert_eq!(settings.agent_for(""), &AgentIdentity::orders());
    }

    #[test]
    fn test_other_routes_use_default_agent() {
        let settings = WidgetSettings::default();
        assert_eq!(settings.agent_for("/reports"), &AgentIdentity::sales());
        assert_eq!(settings.agent_for("/fulfillment/"), &AgentIdentity::sales());
    }

    #[test]
    fn test_config_wire_shape() {
        let config = WidgetSettings::default().config_for("/reports");
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["orchestrationID"], default_orchestration_id());
        assert_eq!(value["hostURL"], "https://eu-gb.watson-orchestrate.cloud.ibm.com");
        assert_eq!(value["rootElementID"], "watsonx-chat-root");
        assert_eq!(value["showLauncher"], true);
        assert_eq!(value["deploymentPlatform"], "ibmcloud");
        assert_eq!(
            value["chatOptions"],
            json!({
                "agentId": "69e6d33d-9326-442f-a870-bce64c94adeb",
                "agentEnvironmentId": "f997ce1f-ce83-4532-aff5-4e1c670fe810"
            })
        );
    }

    #[test]
    fn test_loader_url() {
        assert_eq!(
            loader_url("https://host.example.com/"),
            "https://host.example.com/wxochat/wxoLoader.js?embed=true"
        );
        assert!(WidgetSettings::default().loader_url().contains(LOADER_MARKER));
    }

    #[test]
    fn test_settings_from_toml() {
        let settings: WidgetSettings = toml::from_str(
            r#"
injection_delay_ms = 250

[default_agent]
agent_id = "a"
agent_environment_id = "b"

[[routes]]
route = "/fulfillment"
agent_id = "c"
agent_environment_id = "d"
"#,
        )
        .unwrap();

        assert_eq!(settings.injection_delay(), Duration::from_millis(250));
        assert_eq!(settings.agent_for("/fulfillment"), &AgentIdentity::new("c", "d"));
        // Explicit routes replace the built-in ones
        assert_eq!(settings.agent_for("/"), &AgentIdentity::new("a", "b"));
    }

    #[test]
    fn test_delay_wider_than_browser_timer_is_rejected() {
        let result: Result<WidgetSettings, _> = toml::from_str("injection_delay_ms = 5000000000");
        assert!(result.is_err());

        let max: WidgetSettings = toml::from_str("injection_delay_ms = 4294967295").unwrap();
        assert_eq!(max.injection_delay_ms, u32::MAX);
    }
}
