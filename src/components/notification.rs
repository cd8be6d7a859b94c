//! Transient toast notifications stacked in the top-right corner.
//!
//! A notification is inserted hidden, revealed shortly after so its entry
//! transition plays, and torn down in two phases: the `show` class is removed
//! first and the element is detached once the exit transition had time to run.
//! Automatic and manual dismissal share the same teardown, and every step
//! checks the tracked state first, so a pending timer firing after a manual
//! close is harmless.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use gloo_timers::callback::Timeout;
use stylist::GlobalStyle;
use web_sys::{Document, Element};

use crate::config::NotificationConfig;
use crate::dom;
use crate::error::{Result, SiteError};

const SHOW_CLASS: &str = "show";
const STACK_CLASS: &str = "notification-stack";

const STYLES: &str = r#"
    .notification-stack {
        position: fixed;
        top: 20px;
        right: 20px;
        display: flex;
        flex-direction: column;
        align-items: flex-end;
        gap: 0.75rem;
        z-index: 9999;
        pointer-events: none;
    }

    .notification {
        pointer-events: auto;
        background: white;
        padding: 1rem 1.5rem;
        border-radius: 8px;
        box-shadow: 0 10px 25px rgba(0,0,0,0.1);
        display: flex;
        align-items: center;
        justify-content: space-between;
        gap: 1rem;
        max-width: 400px;
        transform: translateX(120%);
        transition: transform 0.3s ease-out;
        border-left: 4px solid;
    }

    .notification--success {
        border-left-color: #10b981;
        color: #065f46;
    }

    .notification--error {
        border-left-color: #ef4444;
        color: #991b1b;
    }

    .notification--warning {
        border-left-color: #f59e0b;
        color: #92400e;
    }

    .notification--info {
        border-left-color: #3b82f6;
        color: #1e40af;
    }

    .notification.show {
        transform: translateX(0);
    }

    .notification__content {
        display: flex;
        align-items: center;
        gap: 0.5rem;
    }

    .notification__close {
        background: none;
        border: none;
        cursor: pointer;
        color: #6b7280;
        padding: 0.25rem;
    }

    .notification__close:hover {
        color: #374151;
    }
"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
    Warning,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
        }
    }

    /// Font Awesome icon name.
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Success => "check-circle",
            NotificationKind::Error => "exclamation-circle",
            NotificationKind::Warning => "exclamation-triangle",
            NotificationKind::Info => "info-circle",
        }
    }

    pub fn class_name(&self) -> String {
        format!("notification notification--{}", self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Inserted, entry transition not started yet.
    Pending,
    Visible,
    /// Exit transition running, removal scheduled.
    Hidden,
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub phase: Phase,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Visible
    }
}

/// Notifications currently on screen, oldest first.
#[derive(Debug, Default)]
pub struct NotificationStack {
    next_id: u64,
    entries: Vec<Notification>,
}

impl NotificationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind, now: DateTime<Utc>) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;
        self.entries.push(Notification {
            id,
            message: message.into(),
            kind,
            phase: Phase::Pending,
            created_at: now,
        });
        id
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Pending → Visible. A notification already dismissed stays hidden.
    pub fn reveal(&mut self, id: NotificationId) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(n) if n.phase == Phase::Pending => {
                n.phase = Phase::Visible;
                true
            }
            _ => false,
        }
    }

    /// Starts the teardown. Only the first call for a notification returns
    /// true, so the removal is scheduled once.
    pub fn hide(&mut self, id: NotificationId) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(n) if n.phase != Phase::Hidden => {
                n.phase = Phase::Hidden;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        let index = self.entries.iter().position(|n| n.id == id)?;
        Some(self.entries.remove(index))
    }
}

struct Inner {
    document: Document,
    config: NotificationConfig,
    stack: NotificationStack,
    elements: HashMap<NotificationId, Element>,
    /// Close-button listeners, dropped together with their element.
    listeners: HashMap<NotificationId, dom::Listener>,
    /// Set on the first notification; its presence means the stylesheet is in.
    styles: Option<GlobalStyle>,
    container: Option<Element>,
}

/// Handle to the page's notification area. Clones share the same stack.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Rc<RefCell<Inner>>,
}

impl NotificationCenter {
    pub fn new(document: Document, config: NotificationConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                document,
                config,
                stack: NotificationStack::new(),
                elements: HashMap::new(),
                listeners: HashMap::new(),
                styles: None,
                container: None,
            })),
        }
    }

    /// Shows `message`, auto-dismissing it after the configured delay.
    pub fn notify(&self, message: &str, kind: NotificationKind) -> Result<NotificationId> {
        let container = self.ensure_mounted()?;

        let (id, element, config) = {
            let mut inner = self.inner.borrow_mut();
            let element = build_element(&inner.document, message, kind)?;
            let id = inner.stack.push(message, kind, Utc::now());
            inner.elements.insert(id, element.clone());
            (id, element, inner.config.clone())
        };
        if let Err(e) = self.attach(id, &container, &element) {
            self.remove(id);
            return Err(e);
        }

        let center = self.clone();
        Timeout::new(config.reveal_delay_ms, move || center.reveal(id)).forget();

        let center = self.clone();
        Timeout::new(config.auto_dismiss_ms, move || center.dismiss(id)).forget();

        log::debug!("Notification {:?} ({}) shown", id, kind.as_str());
        Ok(id)
    }

    /// Phase one of the teardown; the element is detached after the removal delay.
    pub fn dismiss(&self, id: NotificationId) {
        let (element, removal_delay) = {
            let mut inner = self.inner.borrow_mut();
            if !inner.stack.hide(id) {
                return;
            }
            (inner.elements.get(&id).cloned(), inner.config.removal_delay_ms)
        };

        if let Some(element) = element {
            if let Err(e) = dom::remove_class(&element, SHOW_CLASS) {
                log::error!("Failed to hide notification: {}", e);
            }
        }

        let center = self.clone();
        Timeout::new(removal_delay, move || center.remove(id)).forget();
    }

    /// Wires the close button, then puts the element on screen.
    fn attach(&self, id: NotificationId, container: &Element, element: &Element) -> Result<()> {
        let close = element
            .query_selector(".notification__close")?
            .ok_or_else(|| SiteError::missing(".notification__close"))?;
        let center = self.clone();
        let listener = dom::Listener::new(&close, "click", "notification", move |_| {
            center.dismiss(id);
            Ok(())
        })?;
        self.inner.borrow_mut().listeners.insert(id, listener);
        container.append_child(element)?;
        Ok(())
    }

    /// Number of notifications that have not been removed yet.
    pub fn len(&self) -> usize {
        self.inner.borrow().stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().stack.is_empty()
    }

    /// Close-button listeners still attached, one per notification not yet removed.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_visible(&self, id: NotificationId) -> bool {
        self.inner
            .borrow()
            .stack
            .get(id)
            .map(Notification::is_visible)
            .unwrap_or(false)
    }

    fn reveal(&self, id: NotificationId) {
        let element = {
            let mut inner = self.inner.borrow_mut();
            if !inner.stack.reveal(id) {
                return;
            }
            inner.elements.get(&id).cloned()
        };
        if let Some(element) = element {
            if let Err(e) = dom::add_class(&element, SHOW_CLASS) {
                log::error!("Failed to reveal notification: {}", e);
            }
        }
    }

    fn remove(&self, id: NotificationId) {
        let (element, listener) = {
            let mut inner = self.inner.borrow_mut();
            if inner.stack.remove(id).is_none() {
                return;
            }
            (inner.elements.remove(&id), inner.listeners.remove(&id))
        };
        drop(listener);
        if let Some(element) = element {
            if element.parent_node().is_some() {
                element.remove();
            }
        }
    }

    /// Injects the stylesheet and creates the stacking container, once.
    fn ensure_mounted(&self) -> Result<Element> {
        let mut inner = self.inner.borrow_mut();
        if inner.styles.is_none() {
            inner.styles = Some(GlobalStyle::new(STYLES)?);
        }

        if let Some(container) = inner.container.as_ref() {
            if container.is_connected() {
                return Ok(container.clone());
            }
        }

        let body = inner.document.body().ok_or_else(|| SiteError::missing("body"))?;
        let container = inner.document.create_element("div")?;
        container.set_class_name(STACK_CLASS);
        container.set_attribute("aria-live", "polite")?;
        body.append_child(&container)?;
        inner.container = Some(container.clone());
        Ok(container)
    }
}

fn build_element(document: &Document, message: &str, kind: NotificationKind) -> Result<Element> {
    let notification = document.create_element("div")?;
    notification.set_class_name(&kind.class_name());
    notification.set_attribute("role", "status")?;

    let content = document.create_element("div")?;
    content.set_class_name("notification__content");
    let icon = document.create_element("i")?;
    icon.set_class_name(&format!("fas fa-{}", kind.icon()));
    let text = document.create_element("span")?;
    text.set_text_content(Some(message));
    content.append_child(&icon)?;
    content.append_child(&text)?;

    let close = document.create_element("button")?;
    close.set_class_name("notification__close");
    close.set_attribute("type", "button")?;
    close.set_attribute("aria-label", "Close")?;
    let close_icon = document.create_element("i")?;
    close_icon.set_class_name("fas fa-times");
    close.append_child(&close_icon)?;

    notification.append_child(&content)?;
    notification.append_child(&close)?;
    Ok(notification)
}
