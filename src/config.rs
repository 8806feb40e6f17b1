//! Viewer settings.
//!
//! Defaults cover the stock backend. A host page may override any field by
//! embedding `<script type="application/json" id="install-log-config">` with
//! a JSON object; missing fields keep their defaults.

use std::time::Duration;

use serde::Deserialize;

/// Id of the optional config element in the host page.
pub const CONFIG_ELEMENT_ID: &str = "install-log-config";

/// WebSocket close code for an intentional shutdown.
pub const NORMAL_CLOSURE: u16 = 1000;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Prefix prepended to every `/v1/...` path; empty means same origin.
    pub api_base: String,
    pub reconnect_delay_ms: u32,
    pub poll_interval_ms: u32,
    pub max_lines: usize,
    pub history_limit: u32,
    /// Local storage key holding the bearer token.
    pub token_key: String,
    /// Element id of the container viewers are mounted in.
    pub container_id: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            reconnect_delay_ms: 3_000,
            poll_interval_ms: 30_000,
            max_lines: 1_000,
            history_limit: 10_000,
            token_key: "auth_token".to_string(),
            container_id: "log-container".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the override element from the current document, if any.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match raw {
            Some(raw) if !raw.trim().is_empty() => match Self::from_json(&raw) {
                Ok(config) => {
                    log::debug!("loaded viewer config overrides: {config:?}");
                    config
                }
                Err(e) => {
                    log::warn!("ignoring invalid #{CONFIG_ELEMENT_ID}: {e}");
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms.into())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.into())
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_contract() {
        let config = ViewerConfig::default();
        assert_eq!(config.reconnect_delay(), Duration::from_secs(3));
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.max_lines, 1000);
        assert_eq!(config.history_limit, 10_000);
        assert_eq!(config.token_key, "auth_token");
        assert_eq!(config.api_url("/v1/log/status"), "/v1/log/status");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = ViewerConfig::from_json(r#"{"api_base":"https://panel.example/","max_lines":50}"#).unwrap();
        assert_eq!(config.max_lines, 50);
        assert_eq!(config.poll_interval_ms, 30_000);
        assert_eq!(
            config.api_url("/v1/soft/install"),
            "https://panel.example/v1/soft/install"
        );
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(ViewerConfig::from_json(r#"{"max_lines":"many"}"#).is_err());
    }
}
