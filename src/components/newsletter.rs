use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlButtonElement, HtmlFormElement, HtmlInputElement};

use crate::components::notification::{NotificationCenter, NotificationKind};
use crate::config::{self, NewsletterConfig};
use crate::dom;
use crate::error::{Result, SiteError};

const FORM_SELECTOR: &str = ".newsletter__form";
const EMAIL_SELECTOR: &str = "input[type=\"email\"]";
const BUSY_LABEL: &str = "<i class=\"fas fa-spinner fa-spin\"></i>";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Serialize)]
struct SubscribeRequest<'a> {
    email: &'a str,
}

/// Where a valid address goes.
#[derive(Clone, Debug, PartialEq)]
pub enum Subscriber {
    /// No backend: always succeeds after a fixed delay.
    Simulated { delay_ms: u32 },
    Endpoint { url: String },
}

impl Subscriber {
    pub fn from_config(config: &NewsletterConfig) -> Self {
        match config.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => Subscriber::Endpoint {
                url: config::resolve_endpoint(endpoint),
            },
            _ => Subscriber::Simulated {
                delay_ms: config.simulated_delay_ms,
            },
        }
    }

    pub async fn subscribe(&self, email: &str) -> Result<()> {
        match self {
            Subscriber::Simulated { delay_ms } => {
                TimeoutFuture::new(*delay_ms).await;
                Ok(())
            }
            Subscriber::Endpoint { url } => {
                let response = Request::post(url)
                    .json(&SubscribeRequest { email })?
                    .send()
                    .await?;
                if response.ok() {
                    Ok(())
                } else {
                    Err(SiteError::Rejected(response.status()))
                }
            }
        }
    }
}

/// Messages shown to the user, with per-form overrides from data attributes.
#[derive(Clone, Debug)]
struct Messages {
    success: String,
    invalid: String,
    failure: String,
}

impl Messages {
    fn for_form(form: &HtmlFormElement, config: &NewsletterConfig) -> Self {
        let attr = |name: &str, fallback: &str| form.get_attribute(name).unwrap_or_else(|| fallback.to_string());
        Self {
            success: attr("data-success-message", &config.success_message),
            invalid: attr("data-invalid-message", &config.invalid_message),
            failure: attr("data-failure-message", &config.failure_message),
        }
    }
}

/// Newsletter signup: validate, show the button busy, subscribe, report, reset.
pub struct NewsletterForm;

impl NewsletterForm {
    pub fn mount(document: &Document, config: &NewsletterConfig, notifications: NotificationCenter) -> Result<()> {
        let form = dom::require(document, FORM_SELECTOR)?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| SiteError::Js(format!("{} is not a form", FORM_SELECTOR)))?;
        let subscriber = Subscriber::from_config(config);
        let messages = Messages::for_form(&form, config);

        let target = form.clone();
        dom::listen(&target, "submit", "newsletter", move |event| {
            event.prevent_default();
            submit(&form, &subscriber, &messages, &notifications)
        })?;

        log::info!("Newsletter form ready");
        Ok(())
    }
}

fn submit(
    form: &HtmlFormElement,
    subscriber: &Subscriber,
    messages: &Messages,
    notifications: &NotificationCenter,
) -> Result<()> {
    let email = form
        .query_selector(EMAIL_SELECTOR)?
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default();

    if !is_valid_email(&email) {
        notifications.notify(&messages.invalid, NotificationKind::Error)?;
        return Ok(());
    }

    let button = form
        .query_selector("button")?
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
    let original_label = button.as_ref().map(|b| b.inner_html());
    if let Some(button) = button.as_ref() {
        button.set_inner_html(BUSY_LABEL);
        button.set_disabled(true);
    }

    let form = form.clone();
    let subscriber = subscriber.clone();
    let messages = messages.clone();
    let notifications = notifications.clone();
    spawn_local(async move {
        let outcome = subscriber.subscribe(&email).await;
        let reported = match outcome {
            Ok(()) => {
                let shown = notifications.notify(&messages.success, NotificationKind::Success);
                form.reset();
                shown
            }
            Err(e) => {
                log::error!("Newsletter subscription failed: {}", e);
                notifications.notify(&messages.failure, NotificationKind::Error)
            }
        };
        if let Err(e) = reported {
            log::error!("Failed to show newsletter result: {}", e);
        }

        if let (Some(button), Some(label)) = (button, original_label) {
            button.set_inner_html(&label);
            button.set_disabled(false);
        }
    });
    Ok(())
}
