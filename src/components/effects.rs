use gloo_timers::callback::Timeout;
use web_sys::{Document, IntersectionObserverInit, Window};

use crate::components::reveal::one_shot_observer;
use crate::config::EffectsConfig;
use crate::dom;
use crate::error::Result;

const HERO_CONTENT: &str = ".hero__content";
const HERO_VISUAL: &str = ".hero__visual";
/// The visual trails the content for depth.
const VISUAL_DEPTH: f64 = 0.3;

/// Vertical offsets for the hero content and visual at `scroll_y`.
pub fn parallax_offsets(scroll_y: f64, speed: f64) -> (f64, f64) {
    let content = scroll_y * speed;
    (content, content * VISUAL_DEPTH)
}

pub fn entrance_delay(index: usize, stagger_ms: u32) -> u32 {
    (index as u32).saturating_mul(stagger_ms)
}

pub fn mount_parallax(window: &Window, document: &Document, config: &EffectsConfig) -> Result<()> {
    let content = dom::as_html(&dom::require(document, HERO_CONTENT)?)?;
    let visual = dom::as_html(&dom::require(document, HERO_VISUAL)?)?;
    let speed = config.parallax_speed;

    let scroll_source = window.clone();
    dom::listen(window, "scroll", "parallax", move |_| {
        let (content_y, visual_y) = parallax_offsets(scroll_source.scroll_y()?, speed);
        content
            .style()
            .set_property("transform", &format!("translateY({}px)", content_y))?;
        visual
            .style()
            .set_property("transform", &format!("translateY({}px)", visual_y))?;
        Ok(())
    })?;
    Ok(())
}

/// Fades the hero blocks in one after another.
pub fn mount_entrance(document: &Document, config: &EffectsConfig) -> Result<()> {
    let selector = format!("{}, {}", HERO_CONTENT, HERO_VISUAL);
    let elements = dom::require_all(document, &selector)?;

    for (index, element) in elements.iter().enumerate() {
        let element = dom::as_html(element)?;
        let style = element.style();
        style.set_property("opacity", "0")?;
        style.set_property("transform", "translateY(30px)")?;

        Timeout::new(entrance_delay(index, config.entrance_stagger_ms), move || {
            let style = element.style();
            let shown = style
                .set_property("transition", "all 0.8s ease-out")
                .and_then(|_| style.set_property("opacity", "1"))
                .and_then(|_| style.set_property("transform", "translateY(0)"));
            if let Err(e) = shown {
                log::error!("Entrance animation failed: {:?}", e);
            }
        })
        .forget();
    }
    Ok(())
}

/// Swaps `data-src` into `src` when an image first comes into view.
pub fn mount_lazy_images(document: &Document) -> Result<usize> {
    let images = dom::require_all(document, "img[data-src]")?;

    let observer = one_shot_observer(&IntersectionObserverInit::new(), |image| {
        if let Some(src) = image.get_attribute("data-src") {
            image.set_attribute("src", &src)?;
        }
        dom::remove_class(image, "lazy")
    })?;
    for image in &images {
        observer.observe(image);
    }
    Ok(images.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visual_moves_slower_than_content() {
        let (content, visual) = parallax_offsets(200.0, 0.5);
        assert!((content - 100.0).abs() < 1e-9);
        assert!((visual - 30.0).abs() < 1e-9);
        assert_eq!(parallax_offsets(0.0, 0.5), (0.0, 0.0));
    }

    #[test]
    fn entrance_is_staggered_by_index() {
        assert_eq!(entrance_delay(0, 200), 0);
        assert_eq!(entrance_delay(1, 200), 200);
        assert_eq!(entrance_delay(3, 200), 600);
    }
}
