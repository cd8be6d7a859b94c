use wasm_bindgen::JsCast;
use web_sys::{Document, ErrorEvent, PromiseRejectionEvent, Window};

pub mod config;
pub mod dom;
pub mod error;
pub mod throttle;
pub mod components {
    pub mod counter;
    pub mod effects;
    pub mod navigation;
    pub mod newsletter;
    pub mod notification;
    pub mod reveal;
    pub mod smooth_scroll;
}

use components::{
    counter::CounterAnimator,
    effects,
    navigation::NavigationController,
    newsletter::NewsletterForm,
    notification::NotificationCenter,
    reveal::ViewportObserver,
    smooth_scroll,
};
use config::SiteConfig;
use error::Result;

/// Boots every page feature once the document has been parsed.
pub fn start() {
    let Some(window) = web_sys::window() else {
        log::error!("No window available, nothing to attach to");
        return;
    };
    let Some(document) = window.document() else {
        log::error!("No document available, nothing to attach to");
        return;
    };

    install_error_handlers(&window);

    if document.ready_state() == "loading" {
        let (win, doc) = (window.clone(), document.clone());
        let mut booted = false;
        let listening = dom::listen(&document, "DOMContentLoaded", "bootstrap", move |_| {
            if !std::mem::replace(&mut booted, true) {
                mount_all(&win, &doc);
            }
            Ok(())
        });
        if let Err(e) = listening {
            log::error!("Failed to wait for the document: {}", e);
        }
    } else {
        mount_all(&window, &document);
    }
}

/// Mounts each feature on its own; a feature that fails or whose elements
/// are absent does not stop the others.
pub fn mount_all(window: &Window, document: &Document) -> NotificationCenter {
    let config = SiteConfig::from_document(document).unwrap_or_else(|e| {
        log::warn!("Ignoring site config: {}", e);
        SiteConfig::default()
    });

    let notifications = NotificationCenter::new(document.clone(), config.notifications.clone());
    let counters = CounterAnimator::new(config.counter_tick_ms);

    report("navigation", NavigationController::mount(window, document, &config.navigation));
    report("scroll reveal", ViewportObserver::mount(document, &config.reveal, counters));
    report("smooth scroll", smooth_scroll::mount(window, document));
    report(
        "newsletter",
        NewsletterForm::mount(document, &config.newsletter, notifications.clone()),
    );
    report("parallax", effects::mount_parallax(window, document, &config.effects));
    report("entrance", effects::mount_entrance(document, &config.effects));
    report("lazy images", effects::mount_lazy_images(document));

    log::info!("Page features mounted");
    notifications
}

fn report<T>(feature: &str, result: Result<T>) {
    match result {
        Ok(_) => log::debug!("{} mounted", feature),
        Err(e) if e.is_missing_element() => log::info!("Skipping {}: {}", feature, e),
        Err(e) => log::error!("Failed to mount {}: {}", feature, e),
    }
}

/// Uncaught errors are logged only; nothing reaches the user.
fn install_error_handlers(window: &Window) {
    let errors = dom::listen(window, "error", "error handler", |event| {
        match event.dyn_ref::<ErrorEvent>() {
            Some(error) => log::error!(
                "Uncaught error: {} ({}:{}:{})",
                error.message(),
                error.filename(),
                error.lineno(),
                error.colno()
            ),
            None => log::error!("Uncaught error event: {}", event.type_()),
        }
        Ok(())
    });
    let rejections = dom::listen(window, "unhandledrejection", "error handler", |event| {
        match event.dyn_ref::<PromiseRejectionEvent>() {
            Some(rejection) => log::error!("Unhandled rejection: {:?}", rejection.reason()),
            None => log::error!("Unhandled rejection event"),
        }
        Ok(())
    });

    for installed in [errors, rejections] {
        if let Err(e) = installed {
            log::error!("Failed to install error handler: {}", e);
        }
    }
}
