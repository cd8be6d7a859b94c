use gloo_timers::callback::Timeout;
use once_cell::sync::Lazy;
use regex::Regex;
use web_sys::Element;

use crate::dom;

/// Marks an element whose count has started; never removed.
pub const COUNTED_CLASS: &str = "counted";
pub const TARGET_ATTRIBUTE: &str = "data-number";

/// Number of ticks a full count takes.
const STEPS: f64 = 100.0;

/// Frames of a count from 0 to `target`, as displayed text.
///
/// Each frame adds `target / 100` to a running total and shows its ceiling.
/// The total is clamped so the last frame is exactly `"{target}%"`; a target
/// of zero or below yields a single `"0%"` frame.
#[derive(Debug, Clone)]
pub struct CountUp {
    target: i64,
    step: f64,
    current: f64,
    finished: bool,
}

impl CountUp {
    pub fn new(target: i64) -> Self {
        Self {
            target,
            step: target as f64 / STEPS,
            current: 0.0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for CountUp {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }
        if self.target <= 0 {
            self.finished = true;
            return Some(percent(0));
        }

        let target = self.target as f64;
        self.current = (self.current + self.step).min(target);
        if self.current >= target {
            self.finished = true;
            return Some(percent(self.target));
        }
        Some(percent((self.current.ceil() as i64).min(self.target)))
    }
}

fn percent(value: i64) -> String {
    format!("{}%", value)
}

static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid leading integer pattern"));

/// The integer a target attribute starts with, so `"85%"` and `"85.5"` are 85.
fn leading_integer(raw: &str) -> Option<i64> {
    LEADING_INTEGER
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Missing or unparsable targets count as zero.
pub fn parse_target(raw: Option<&str>) -> i64 {
    raw.and_then(leading_integer).unwrap_or(0)
}

#[derive(Clone, Copy, Debug)]
pub struct CounterAnimator {
    tick_ms: u32,
}

impl CounterAnimator {
    pub fn new(tick_ms: u32) -> Self {
        Self { tick_ms }
    }

    /// Starts counting `element` up to its `data-number`. Returns false when the
    /// element was already counted, in which case nothing changes.
    pub fn animate(&self, element: &Element) -> bool {
        if dom::has_class(element, COUNTED_CLASS) {
            return false;
        }
        if let Err(e) = dom::add_class(element, COUNTED_CLASS) {
            log::error!("Failed to mark counter: {}", e);
            return false;
        }

        let raw = element.get_attribute(TARGET_ATTRIBUTE);
        if raw.as_deref().and_then(leading_integer).is_none() {
            log::warn!("Counter has no usable {}: {:?}", TARGET_ATTRIBUTE, raw);
        }
        let frames = CountUp::new(parse_target(raw.as_deref()));
        tick(element.clone(), frames, self.tick_ms);
        true
    }
}

fn tick(element: Element, mut frames: CountUp, tick_ms: u32) {
    let Some(text) = frames.next() else {
        return;
    };
    element.set_text_content(Some(&text));

    if !frames.is_finished() {
        let timeout = Timeout::new(tick_ms, move || tick(element, frames, tick_ms));
        timeout.forget();
    }
}
