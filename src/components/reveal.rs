use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::components::counter::CounterAnimator;
use crate::config::RevealConfig;
use crate::dom;
use crate::error::Result;

pub const REVEALED_CLASS: &str = "animate";
const STAT_CARD_CLASS: &str = "stat__card";
const STAT_NUMBER_SELECTOR: &str = ".stat__number";

/// Creates an observer that calls `on_enter` the first time each observed
/// element intersects, then stops watching that element.
pub fn one_shot_observer<F>(options: &IntersectionObserverInit, mut on_enter: F) -> Result<IntersectionObserver>
where
    F: FnMut(&Element) -> Result<()> + 'static,
{
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if !entry.is_intersecting() {
                continue;
            }
            let target = entry.target();
            observer.unobserve(&target);
            if let Err(e) = on_enter(&target) {
                log::error!("Intersection handler failed: {}", e);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), options)?;
    callback.forget();
    Ok(observer)
}

/// Reveals cards and headers as they scroll into view and starts the
/// percentage counters inside statistic cards.
pub struct ViewportObserver;

impl ViewportObserver {
    /// Returns how many elements are being watched.
    pub fn mount(document: &Document, config: &RevealConfig, counters: CounterAnimator) -> Result<usize> {
        let targets = dom::require_all(document, &config.selector)?;

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.threshold));
        options.set_root_margin(&config.root_margin());

        let observer = one_shot_observer(&options, move |target| reveal(target, &counters).map(|_| ()))?;
        for target in &targets {
            observer.observe(target);
        }

        log::info!("Watching {} elements for reveal", targets.len());
        Ok(targets.len())
    }
}

/// Marks `target` revealed and starts its counter if it is a statistic card.
/// Returns false, changing nothing, when it was already revealed.
pub fn reveal(target: &Element, counters: &CounterAnimator) -> Result<bool> {
    if dom::has_class(target, REVEALED_CLASS) {
        return Ok(false);
    }
    dom::add_class(target, REVEALED_CLASS)?;

    if dom::has_class(target, STAT_CARD_CLASS) {
        if let Some(number) = target.query_selector(STAT_NUMBER_SELECTOR)? {
            counters.animate(&number);
        }
    }
    Ok(true)
}
