//! Mobile menu, header scroll state and active section highlighting.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Utc;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

use crate::config::NavigationConfig;
use crate::dom;
use crate::error::Result;
use crate::throttle::{Decision, Throttle};

const MENU_ID: &str = "nav-menu";
const TOGGLE_ID: &str = "nav-toggle";
const HEADER_ID: &str = "header";
const LINK_SELECTOR: &str = ".nav__link";
const SECTION_SELECTOR: &str = "section[id]";
const OVERLAY_CLASS: &str = "nav__overlay show";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    pub menu_open: bool,
}

impl NavState {
    pub fn toggle(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Returns whether anything changed.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.menu_open, false)
    }
}

/// Vertical extent of a `section[id]` in page coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Index of the first section whose range, shifted up by `header_offset`,
/// contains `scroll_y`.
pub fn active_section(sections: &[SectionSpan], scroll_y: f64, header_offset: f64) -> Option<usize> {
    sections.iter().position(|section| {
        let top = section.top - header_offset;
        scroll_y > top && scroll_y <= top + section.height
    })
}

pub fn link_matches(href: Option<&str>, section_id: &str) -> bool {
    href.and_then(|h| h.strip_prefix('#'))
        .map(|fragment| fragment == section_id)
        .unwrap_or(false)
}

struct Menu {
    panel: Element,
    toggle: Element,
    overlay: RefCell<Option<(Element, dom::Listener)>>,
    state: Cell<NavState>,
}

pub struct NavigationController {
    document: Document,
    window: Window,
    config: NavigationConfig,
    menu: Option<Menu>,
    header: Option<Element>,
    links: Vec<Element>,
    throttle: RefCell<Throttle>,
}

impl NavigationController {
    /// Wires whatever navigation the page has. Each part is optional: a page
    /// without a toggle still gets link highlighting and vice versa.
    pub fn mount(window: &Window, document: &Document, config: &NavigationConfig) -> Result<Rc<Self>> {
        let menu = match (dom::require_id(document, MENU_ID), dom::require_id(document, TOGGLE_ID)) {
            (Ok(panel), Ok(toggle)) => Some(Menu {
                panel,
                toggle,
                overlay: RefCell::new(None),
                state: Cell::new(NavState::default()),
            }),
            (Err(e), _) | (_, Err(e)) => {
                log::info!("Mobile menu disabled: {}", e);
                None
            }
        };

        let controller = Rc::new(Self {
            document: document.clone(),
            window: window.clone(),
            config: config.clone(),
            menu,
            header: document.get_element_by_id(HEADER_ID),
            links: dom::query_all(document, LINK_SELECTOR)?,
            throttle: RefCell::new(Throttle::new(config.scroll_throttle_ms)),
        });

        if let Some(menu) = controller.menu.as_ref() {
            let nav = controller.clone();
            dom::listen(&menu.toggle, "click", "navigation", move |_| nav.toggle_menu())?;
        }
        for link in &controller.links {
            let nav = controller.clone();
            dom::listen(link, "click", "navigation", move |_| nav.close_menu())?;
        }

        let nav = controller.clone();
        dom::listen(window, "scroll", "navigation", move |_| {
            nav.on_scroll();
            Ok(())
        })?;

        log::info!("Navigation ready with {} links", controller.links.len());
        Ok(controller)
    }

    pub fn has_overlay(&self) -> bool {
        self.menu
            .as_ref()
            .map(|menu| menu.overlay.borrow().is_some())
            .unwrap_or(false)
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu
            .as_ref()
            .map(|menu| menu.state.get().menu_open)
            .unwrap_or(false)
    }

    pub fn toggle_menu(self: &Rc<Self>) -> Result<()> {
        let Some(menu) = self.menu.as_ref() else {
            return Ok(());
        };
        let mut state = menu.state.get();
        let open = state.toggle();
        menu.state.set(state);

        dom::set_class(&menu.panel, "show", open)?;
        dom::set_class(&menu.toggle, "active", open)?;
        if open {
            self.show_overlay(menu)
        } else {
            remove_overlay(menu);
            Ok(())
        }
    }

    pub fn close_menu(&self) -> Result<()> {
        let Some(menu) = self.menu.as_ref() else {
            return Ok(());
        };
        let mut state = menu.state.get();
        state.close();
        menu.state.set(state);

        dom::remove_class(&menu.panel, "show")?;
        dom::remove_class(&menu.toggle, "active")?;
        remove_overlay(menu);
        Ok(())
    }

    fn show_overlay(self: &Rc<Self>, menu: &Menu) -> Result<()> {
        if menu.overlay.borrow().is_some() {
            return Ok(());
        }
        let Some(body) = self.document.body() else {
            return Ok(());
        };
        let overlay = self.document.create_element("div")?;
        overlay.set_class_name(OVERLAY_CLASS);
        let nav = self.clone();
        let listener = dom::Listener::new(&overlay, "click", "navigation", move |_| nav.close_menu())?;
        body.append_child(&overlay)?;
        *menu.overlay.borrow_mut() = Some((overlay, listener));
        Ok(())
    }

    fn on_scroll(self: &Rc<Self>) {
        let decision = self.throttle.borrow_mut().poll(now_ms());
        match decision {
            Decision::Run => self.refresh(),
            Decision::Defer(delay) => {
                let nav = self.clone();
                Timeout::new(delay, move || {
                    nav.throttle.borrow_mut().ran_deferred(now_ms());
                    nav.refresh();
                })
                .forget();
            }
            Decision::Skip => {}
        }
    }

    fn refresh(&self) {
        let scroll_y = match self.window.scroll_y() {
            Ok(y) => y,
            Err(e) => {
                log::error!("Failed to read scroll position: {:?}", e);
                return;
            }
        };
        if let Err(e) = self.update_header(scroll_y) {
            log::error!("Header update failed: {}", e);
        }
        if let Err(e) = self.highlight_at(scroll_y) {
            log::error!("Link highlight failed: {}", e);
        }
    }

    fn update_header(&self, scroll_y: f64) -> Result<()> {
        match self.header.as_ref() {
            Some(header) => dom::set_class(header, "scrolled", scroll_y > self.config.scrolled_threshold),
            None => Ok(()),
        }
    }

    /// Marks the link of the section containing `scroll_y` active. Returns the
    /// matched section id; with no match the current highlight is kept.
    pub fn highlight_at(&self, scroll_y: f64) -> Result<Option<String>> {
        if self.links.is_empty() {
            return Ok(None);
        }
        let sections = self.sections()?;
        let Some(index) = active_section(&sections, scroll_y, self.config.header_offset) else {
            return Ok(None);
        };
        let id = &sections[index].id;

        for link in &self.links {
            dom::remove_class(link, "active")?;
        }
        if let Some(link) = self
            .links
            .iter()
            .find(|link| link_matches(link.get_attribute("href").as_deref(), id))
        {
            dom::add_class(link, "active")?;
        }
        Ok(Some(id.clone()))
    }

    fn sections(&self) -> Result<Vec<SectionSpan>> {
        Ok(dom::query_all(&self.document, SECTION_SELECTOR)?
            .into_iter()
            .filter_map(|section| {
                let id = section.id();
                let html = section.dyn_into::<web_sys::HtmlElement>().ok()?;
                Some(SectionSpan {
                    id,
                    top: html.offset_top() as f64,
                    height: html.offset_height() as f64,
                })
            })
            .collect())
    }
}

fn remove_overlay(menu: &Menu) {
    let taken = menu.overlay.borrow_mut().take();
    if let Some((overlay, listener)) = taken {
        overlay.remove();
        // The overlay's own click handler may be the caller; free it after it returns.
        Timeout::new(0, move || drop(listener)).forget();
    }
}

fn now_ms() -> f64 {
    Utc::now().timestamp_millis() as f64
}
