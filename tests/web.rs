//! Browser tests, run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement};

use landing_frontend::components::counter::CounterAnimator;
use landing_frontend::components::navigation::NavigationController;
use landing_frontend::components::newsletter::NewsletterForm;
use landing_frontend::components::notification::{NotificationCenter, NotificationKind};
use landing_frontend::components::reveal::reveal;
use landing_frontend::config::{NavigationConfig, NewsletterConfig, NotificationConfig};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn append(parent: &Element, tag: &str, html: &str) -> Element {
    let element = document().create_element(tag).unwrap();
    element.set_inner_html(html);
    parent.append_child(&element).unwrap();
    element
}

fn body() -> Element {
    document().body().unwrap().into()
}

fn quick_notifications() -> NotificationConfig {
    NotificationConfig {
        reveal_delay_ms: 10,
        auto_dismiss_ms: 60_000,
        removal_delay_ms: 20,
    }
}

fn notification_count() -> u32 {
    document().query_selector_all(".notification").unwrap().length()
}

fn stylesheets_containing(needle: &str) -> usize {
    let styles = document().query_selector_all("style").unwrap();
    (0..styles.length())
        .filter_map(|i| styles.item(i))
        .filter(|style| style.text_content().unwrap_or_default().contains(needle))
        .count()
}

#[wasm_bindgen_test]
async fn mounting_an_already_parsed_page_boots_immediately() {
    let window = web_sys::window().unwrap();
    assert_ne!(document().ready_state(), "loading");

    let center = landing_frontend::mount_all(&window, &document());
    let id = center.notify("booted", NotificationKind::Info).unwrap();
    assert_eq!(center.len(), 1);

    center.dismiss(id);
    TimeoutFuture::new(500).await;
    assert!(center.is_empty());
}

#[wasm_bindgen_test]
async fn revealing_a_stat_card_counts_once() {
    let card = append(
        &body(),
        "div",
        r#"<span class="stat__number" data-number="30">0%</span>"#,
    );
    card.set_class_name("stat__card");
    let number = card.query_selector(".stat__number").unwrap().unwrap();
    let counters = CounterAnimator::new(1);

    assert!(reveal(&card, &counters).unwrap());
    assert!(card.class_list().contains("animate"));
    assert!(number.class_list().contains("counted"));

    TimeoutFuture::new(2_000).await;
    assert_eq!(number.text_content().as_deref(), Some("30%"));

    assert!(!reveal(&card, &counters).unwrap());
    TimeoutFuture::new(50).await;
    assert_eq!(number.text_content().as_deref(), Some("30%"));
    card.remove();
}

#[wasm_bindgen_test]
fn revealing_a_plain_element_only_marks_it() {
    let header = append(&body(), "div", r#"<span class="stat__number" data-number="30">0%</span>"#);
    let number = header.query_selector(".stat__number").unwrap().unwrap();

    assert!(reveal(&header, &CounterAnimator::new(1)).unwrap());
    assert!(header.class_list().contains("animate"));
    assert!(!number.class_list().contains("counted"));
    assert_eq!(number.text_content().as_deref(), Some("0%"));
    header.remove();
}

#[wasm_bindgen_test]
fn zero_counter_finishes_synchronously() {
    let counter = append(&body(), "span", "");
    counter.set_attribute("data-number", "0").unwrap();

    assert!(CounterAnimator::new(20).animate(&counter));
    assert_eq!(counter.text_content().as_deref(), Some("0%"));
    assert!(counter.class_list().contains("counted"));
    counter.remove();
}

#[wasm_bindgen_test]
async fn counter_runs_to_target_once() {
    let counter = append(&body(), "span", "");
    counter.set_attribute("data-number", "40").unwrap();
    let animator = CounterAnimator::new(1);

    assert!(animator.animate(&counter));
    assert!(!animator.animate(&counter));

    TimeoutFuture::new(2_000).await;
    assert_eq!(counter.text_content().as_deref(), Some("40%"));

    assert!(!animator.animate(&counter));
    TimeoutFuture::new(50).await;
    assert_eq!(counter.text_content().as_deref(), Some("40%"));
    counter.remove();
}

#[wasm_bindgen_test]
async fn notifications_stack_and_dismiss_independently() {
    let before = notification_count();
    let center = NotificationCenter::new(document(), quick_notifications());

    let ids: Vec<_> = ["one", "two", "three"]
        .iter()
        .map(|m| center.notify(m, NotificationKind::Info).unwrap())
        .collect();
    assert_eq!(center.len(), 3);
    assert_eq!(center.listener_count(), 3);
    assert_eq!(notification_count(), before + 3);

    TimeoutFuture::new(100).await;
    assert!(ids.iter().all(|id| center.is_visible(*id)));

    center.dismiss(ids[1]);
    assert!(!center.is_visible(ids[1]));
    TimeoutFuture::new(150).await;

    assert_eq!(center.len(), 2);
    assert_eq!(center.listener_count(), 2);
    assert_eq!(notification_count(), before + 2);
    assert!(center.is_visible(ids[0]));
    assert!(center.is_visible(ids[2]));

    center.dismiss(ids[0]);
    center.dismiss(ids[2]);
    TimeoutFuture::new(150).await;
    assert!(center.is_empty());
    assert_eq!(center.listener_count(), 0);
    assert_eq!(notification_count(), before);
}

#[wasm_bindgen_test]
async fn close_button_and_auto_dismiss_remove_once() {
    let before = notification_count();
    let center = NotificationCenter::new(
        document(),
        NotificationConfig {
            reveal_delay_ms: 10,
            auto_dismiss_ms: 80,
            removal_delay_ms: 20,
        },
    );
    center.notify("bye", NotificationKind::Warning).unwrap();
    assert_eq!(center.listener_count(), 1);
    TimeoutFuture::new(40).await;

    // This center's container was appended last, so its button comes last.
    let buttons = document().query_selector_all(".notification__close").unwrap();
    let close = buttons
        .item(buttons.length() - 1)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    close.click();
    close.click();

    // Past the auto-dismiss timer as well.
    TimeoutFuture::new(300).await;
    assert!(center.is_empty());
    assert_eq!(center.listener_count(), 0);
    assert_eq!(notification_count(), before);
}

#[wasm_bindgen_test]
async fn stylesheet_is_injected_once() {
    let first = NotificationCenter::new(document(), quick_notifications());
    let second = NotificationCenter::new(document(), quick_notifications());

    let mut ids = Vec::new();
    for (message, kind) in [("a", NotificationKind::Success), ("b", NotificationKind::Error)] {
        ids.push((first.clone(), first.notify(message, kind).unwrap()));
        ids.push((second.clone(), second.notify(message, kind).unwrap()));
    }
    assert_eq!(stylesheets_containing(".notification-stack"), 1);

    for (center, id) in &ids {
        center.dismiss(*id);
    }
    TimeoutFuture::new(100).await;
    assert!(first.is_empty() && second.is_empty());
    assert_eq!(stylesheets_containing(".notification-stack"), 1);
}

#[wasm_bindgen_test]
async fn newsletter_rejects_then_accepts() {
    let fixture = append(
        &body(),
        "div",
        r#"<form class="newsletter__form">
               <input type="email" name="email">
               <button type="submit">Subscribe</button>
           </form>"#,
    );
    let form = fixture
        .query_selector("form")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlFormElement>()
        .unwrap();
    let input = form
        .query_selector("input")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlInputElement>()
        .unwrap();
    let button = form
        .query_selector("button")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlButtonElement>()
        .unwrap();

    let center = NotificationCenter::new(document(), quick_notifications());
    let config = NewsletterConfig {
        simulated_delay_ms: 50,
        ..NewsletterConfig::default()
    };
    NewsletterForm::mount(&document(), &config, center.clone()).unwrap();

    input.set_value("bad-email");
    form.dispatch_event(&Event::new("submit").unwrap()).unwrap();
    assert_eq!(center.len(), 1);
    assert!(!button.disabled());
    assert_eq!(input.value(), "bad-email");

    input.set_value("user@example.com");
    form.dispatch_event(&Event::new("submit").unwrap()).unwrap();
    assert!(button.disabled());
    assert!(button.inner_html().contains("fa-spinner"));
    assert_eq!(center.len(), 1);

    TimeoutFuture::new(400).await;
    assert_eq!(center.len(), 2);
    assert_eq!(input.value(), "");
    assert!(!button.disabled());
    assert_eq!(button.inner_html(), "Subscribe");

    fixture.remove();
}

#[wasm_bindgen_test]
async fn navigation_highlights_one_link_and_toggles_menu() {
    let fixture = append(
        &body(),
        "div",
        r##"<header id="header"></header>
            <button id="nav-toggle"></button>
            <ul id="nav-menu">
                <li><a class="nav__link active" href="#nav-one">One</a></li>
                <li><a class="nav__link" href="#nav-two">Two</a></li>
                <li><a class="nav__link" href="#nav-three">Three</a></li>
            </ul>
            <div style="position: relative">
                <section id="nav-one" style="display: block; margin: 0; height: 500px"></section>
                <section id="nav-two" style="display: block; margin: 0; height: 500px"></section>
                <section id="nav-three" style="display: block; margin: 0; height: 500px"></section>
            </div>"##,
    );
    let window = web_sys::window().unwrap();
    let nav = NavigationController::mount(&window, &document(), &NavigationConfig::default()).unwrap();

    let active = || {
        let links = document().query_selector_all(".nav__link.active").unwrap();
        (0..links.length())
            .filter_map(|i| links.item(i))
            .filter_map(|n| n.dyn_into::<Element>().ok())
            .filter_map(|el| el.get_attribute("href"))
            .collect::<Vec<_>>()
    };

    assert_eq!(nav.highlight_at(600.0).unwrap().as_deref(), Some("nav-two"));
    assert_eq!(active(), vec!["#nav-two".to_string()]);

    assert_eq!(nav.highlight_at(1000.0).unwrap().as_deref(), Some("nav-three"));
    assert_eq!(active(), vec!["#nav-three".to_string()]);

    // Below every section: highlight stays where it was.
    assert_eq!(nav.highlight_at(10_000.0).unwrap(), None);
    assert_eq!(active(), vec!["#nav-three".to_string()]);

    nav.toggle_menu().unwrap();
    assert!(nav.is_menu_open());
    let menu = document().get_element_by_id("nav-menu").unwrap();
    assert!(menu.class_list().contains("show"));

    let overlay = document()
        .query_selector(".nav__overlay")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    assert!(nav.has_overlay());
    overlay.click();
    assert!(!nav.is_menu_open());
    assert!(!nav.has_overlay());
    assert!(!menu.class_list().contains("show"));
    assert!(document().query_selector(".nav__overlay").unwrap().is_none());

    // Once its listener is freed, clicking the detached overlay does nothing.
    TimeoutFuture::new(10).await;
    nav.toggle_menu().unwrap();
    assert!(nav.is_menu_open());
    overlay.click();
    assert!(nav.is_menu_open());
    nav.close_menu().unwrap();
    assert!(!nav.has_overlay());

    fixture.remove();
}
