use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::dom;
use crate::error::Result;

const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
const HEADER_SELECTOR: &str = ".header";

/// Element id named by an in-page link, `None` for a bare `#`.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Scroll position that puts the target's top edge just below the header.
pub fn scroll_position(target_top: f64, header_height: f64) -> f64 {
    (target_top - header_height).max(0.0)
}

pub fn mount(window: &Window, document: &Document) -> Result<usize> {
    let anchors = dom::require_all(document, ANCHOR_SELECTOR)?;

    for anchor in &anchors {
        let window = window.clone();
        let document = document.clone();
        let href = anchor.get_attribute("href").unwrap_or_default();
        dom::listen(anchor, "click", "smooth scroll", move |event| {
            event.prevent_default();
            let Some(id) = fragment_id(&href) else {
                return Ok(());
            };
            let Some(target) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return Ok(());
            };
            let header_height = document
                .query_selector(HEADER_SELECTOR)?
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                .map(|header| header.offset_height() as f64)
                .unwrap_or(0.0);

            let options = ScrollToOptions::new();
            options.set_top(scroll_position(target.offset_top() as f64, header_height));
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
            Ok(())
        })?;
    }

    log::info!("Smooth scrolling wired for {} anchors", anchors.len());
    Ok(anchors.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hash_has_no_target() {
        assert_eq!(fragment_id("#"), None);
        assert_eq!(fragment_id("#stats"), Some("stats"));
        assert_eq!(fragment_id("stats"), None);
    }

    #[test]
    fn position_accounts_for_header_and_never_goes_negative() {
        assert_eq!(scroll_position(900.0, 80.0), 820.0);
        assert_eq!(scroll_position(40.0, 80.0), 0.0);
    }
}
