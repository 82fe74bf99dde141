//! Click navigation.
//!
//! Clicking an entry smooth-scrolls the page so the heading lands just
//! under the fixed header. The URL fragment is written only after the
//! scroll settles; writing it up front would make the browser jump and
//! fight the animation. A synthetic scroll event afterwards nudges the
//! scan so the clicked section highlights without waiting for the user.

use gloo_timers::callback::Timeout;
use lectern_toc_core::click_scroll_target;
use smol_str::format_smolstr;
use wasm_bindgen::JsValue;

use crate::controller::ControllerState;
use crate::dom;

pub(crate) fn scroll_to_section(state: &ControllerState, id: &str) {
    let Some(window) = web_sys::window() else {
        tracing::warn!("no window, cannot scroll to section");
        return;
    };
    let Some(document) = window.document() else {
        tracing::warn!("no document, cannot scroll to section");
        return;
    };
    let Some(element) = document.get_element_by_id(id) else {
        // heading not rendered, let the browser's own anchor jump try
        let _ = window.location().set_hash(id);
        return;
    };

    let target = {
        let tracker = state.tracker.borrow();
        click_scroll_target(
            dom::scroll_y(),
            element.get_bounding_client_rect().top(),
            tracker.config(),
        )
    };

    let options = web_sys::ScrollToOptions::new();
    options.set_top(target);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);

    let settle_ms = state.tracker.borrow().config().settle_delay_ms;
    let fragment = format_smolstr!("#{id}");
    let settle = Timeout::new(settle_ms, move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(&fragment));
        }
        if let Ok(event) = web_sys::Event::new("scroll") {
            let _ = window.dispatch_event(&event);
        }
    });
    state.hooks.borrow_mut().settle = Some(settle);
}
