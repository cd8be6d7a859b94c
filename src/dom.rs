//! Small helpers over web-sys shared by the components.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement};

use crate::error::{Result, SiteError};

/// All elements matching `selector`, in document order.
pub fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>> {
    let nodes = root.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Like `query_all`, but an empty match is reported as a missing element.
pub fn require_all(root: &Document, selector: &str) -> Result<Vec<Element>> {
    let elements = query_all(root, selector)?;
    if elements.is_empty() {
        return Err(SiteError::missing(selector));
    }
    Ok(elements)
}

pub fn require(root: &Document, selector: &str) -> Result<Element> {
    root.query_selector(selector)?
        .ok_or_else(|| SiteError::missing(selector))
}

pub fn require_id(root: &Document, id: &str) -> Result<Element> {
    root.get_element_by_id(id)
        .ok_or_else(|| SiteError::missing(format!("#{}", id)))
}

pub fn as_html(element: &Element) -> Result<HtmlElement> {
    element
        .clone()
        .dyn_into::<HtmlElement>()
        .map_err(|_| SiteError::Js(format!("<{}> is not an html element", element.tag_name())))
}

pub fn add_class(element: &Element, class: &str) -> Result<()> {
    element.class_list().add_1(class)?;
    Ok(())
}

pub fn remove_class(element: &Element, class: &str) -> Result<()> {
    element.class_list().remove_1(class)?;
    Ok(())
}

pub fn set_class(element: &Element, class: &str, on: bool) -> Result<()> {
    if on {
        add_class(element, class)
    } else {
        remove_class(element, class)
    }
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

fn guarded<F>(feature: &'static str, mut handler: F) -> Closure<dyn FnMut(Event)>
where
    F: FnMut(Event) -> Result<()> + 'static,
{
    Closure::wrap(Box::new(move |event: Event| {
        if let Err(e) = handler(event) {
            log::error!("{} handler failed: {}", feature, e);
        }
    }) as Box<dyn FnMut(Event)>)
}

/// Attaches `handler` for the lifetime of the page. A handler error is logged
/// under `feature` and never reaches the user or other listeners.
///
/// Only for targets that live as long as the page; elements created and
/// removed at runtime use [`Listener`].
pub fn listen<F>(target: &EventTarget, event: &str, feature: &'static str, handler: F) -> Result<()>
where
    F: FnMut(Event) -> Result<()> + 'static,
{
    let callback = guarded(feature, handler);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// An event listener that is detached and freed when dropped.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new<F>(target: &EventTarget, event: &'static str, feature: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) -> Result<()> + 'static,
    {
        let callback = guarded(feature, handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
