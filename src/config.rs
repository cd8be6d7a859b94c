use serde::Deserialize;
use web_sys::Document;

use crate::error::Result;

#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001" // Development URL when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    "" // Production URL
}

/// Absolute endpoints are used as-is, paths are resolved against the backend.
pub fn resolve_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        format!("{}{}", get_backend_url(), endpoint)
    } else {
        endpoint.to_string()
    }
}

/// Id of the optional `<script type="application/json">` block holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub navigation: NavigationConfig,
    pub reveal: RevealConfig,
    pub counter_tick_ms: u32,
    pub notifications: NotificationConfig,
    pub newsletter: NewsletterConfig,
    pub effects: EffectsConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Header buffer subtracted from each section top when matching the scroll offset.
    pub header_offset: f64,
    pub scrolled_threshold: f64,
    pub scroll_throttle_ms: u32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RevealConfig {
    pub selector: String,
    pub threshold: f64,
    pub bottom_margin_px: u32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationConfig {
    pub reveal_delay_ms: u32,
    pub auto_dismiss_ms: u32,
    pub removal_delay_ms: u32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsletterConfig {
    pub simulated_delay_ms: u32,
    /// When set, submissions are POSTed here instead of simulated.
    pub endpoint: Option<String>,
    pub success_message: String,
    pub invalid_message: String,
    pub failure_message: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectsConfig {
    pub parallax_speed: f64,
    pub entrance_stagger_ms: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            navigation: NavigationConfig::default(),
            reveal: RevealConfig::default(),
            counter_tick_ms: 20,
            notifications: NotificationConfig::default(),
            newsletter: NewsletterConfig::default(),
            effects: EffectsConfig::default(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            header_offset: 100.0,
            scrolled_threshold: 100.0,
            scroll_throttle_ms: 16,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".stat__card, .barrier__card, .solution__card, .section__header".to_string(),
            threshold: 0.1,
            bottom_margin_px: 100,
        }
    }
}

impl RevealConfig {
    /// Negative bottom margin so the trigger fires slightly before full entry.
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin_px)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 100,
            auto_dismiss_ms: 5000,
            removal_delay_ms: 300,
        }
    }
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 2000,
            endpoint: None,
            success_message: "Thanks for subscribing! We'll keep you posted.".to_string(),
            invalid_message: "Please enter a valid email address".to_string(),
            failure_message: "Something went wrong, please try again later".to_string(),
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            parallax_speed: 0.5,
            entrance_stagger_ms: 200,
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads the `#site-config` block if the page has one, defaults otherwise.
    pub fn from_document(document: &Document) -> Result<Self> {
        match document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|element| element.text_content())
        {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_keeps_defaults() {
        let config = SiteConfig::from_json("{}").expect("empty config parses");
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SiteConfig::from_json(
            r#"{"notifications": {"autoDismissMs": 8000}, "newsletter": {"endpoint": "/api/newsletter"}}"#,
        )
        .expect("partial config parses");

        assert_eq!(config.notifications.auto_dismiss_ms, 8000);
        assert_eq!(config.notifications.removal_delay_ms, 300);
        assert_eq!(config.notifications.reveal_delay_ms, 100);
        assert_eq!(config.newsletter.endpoint.as_deref(), Some("/api/newsletter"));
        assert_eq!(config.newsletter.simulated_delay_ms, 2000);
        assert_eq!(config.counter_tick_ms, 20);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = SiteConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::error::SiteError::Config(_)));
    }

    #[test]
    fn root_margin_offsets_the_bottom_edge() {
        let reveal = RevealConfig::default();
        assert_eq!(reveal.root_margin(), "0px 0px -100px 0px");
    }

    #[test]
    fn relative_endpoints_are_resolved_against_backend() {
        assert_eq!(
            resolve_endpoint("/api/newsletter"),
            format!("{}/api/newsletter", get_backend_url())
        );
        assert_eq!(
            resolve_endpoint("https://lists.example.com/subscribe"),
            "https://lists.example.com/subscribe"
        );
    }
}
