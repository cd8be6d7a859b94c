use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SiteError {
    /// An element the feature needs is not on the page. Callers treat this as
    /// "feature not present" rather than a failure.
    #[error("element not found: {0}")]
    MissingElement(String),

    #[error("javascript error: {0}")]
    Js(String),

    #[error("stylesheet error: {0}")]
    Style(#[from] stylist::Error),

    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Request(#[from] gloo_net::Error),

    #[error("subscription rejected with status {0}")]
    Rejected(u16),
}

impl SiteError {
    pub fn missing(selector: impl Into<String>) -> Self {
        SiteError::MissingElement(selector.into())
    }

    pub fn is_missing_element(&self) -> bool {
        matches!(self, SiteError::MissingElement(_))
    }
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => SiteError::Js(message),
            None => SiteError::Js(format!("{:?}", value)),
        }
    }
}

pub type Result<T, E = SiteError> = std::result::Result<T, E>;
