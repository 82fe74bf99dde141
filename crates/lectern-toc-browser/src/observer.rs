//! Intersection observer wiring.
//!
//! The observer is the cheap signal: the browser tells us when headings
//! cross the activation band instead of us polling layout. The root margin
//! narrows the viewport to that band, with the top edge pulled down to the
//! activation line and most of the bottom cut away.

use std::rc::Rc;

use lectern_toc_core::IntersectionHit;
use smol_str::{SmolStr, format_smolstr};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::controller::{ControllerState, notify_active};
use crate::dom::ResolvedHeading;

/// Report at every quarter of visibility.
const THRESHOLDS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

pub(crate) fn attach(state: &Rc<ControllerState>, headings: &[ResolvedHeading]) {
    let margin = {
        let tracker = state.tracker.borrow();
        let config = tracker.config();
        format_smolstr!(
            "-{}px 0px -{}% 0px",
            config.activation_line(),
            config.bottom_margin_percent
        )
    };

    let callback_state = state.clone();
    let callback: Closure<dyn FnMut(js_sys::Array)> =
        Closure::new(move |entries: js_sys::Array| {
            let hits: Vec<IntersectionHit> = entries
                .iter()
                .filter_map(|entry| {
                    entry
                        .dyn_into::<web_sys::IntersectionObserverEntry>()
                        .ok()
                })
                .filter(|entry| entry.is_intersecting())
                .filter_map(|entry| {
                    let id = entry.target().id();
                    if id.is_empty() {
                        return None;
                    }
                    Some(IntersectionHit {
                        id: SmolStr::new(id),
                        top: entry.bounding_client_rect().top(),
                        ratio: entry.intersection_ratio(),
                    })
                })
                .collect();
            let changed = callback_state
                .tracker
                .borrow_mut()
                .update_from_intersections(&hits);
            if changed {
                notify_active(&callback_state);
            }
        });

    let init = web_sys::IntersectionObserverInit::new();
    init.set_root_margin(&margin);
    let thresholds = js_sys::Array::new();
    for threshold in THRESHOLDS {
        thresholds.push(&JsValue::from_f64(threshold));
    }
    init.set_threshold(&thresholds.into());

    let observer = match web_sys::IntersectionObserver::new_with_options(
        callback.as_ref().unchecked_ref(),
        &init,
    ) {
        Ok(observer) => observer,
        Err(error) => {
            // scroll scanning still works without the observer
            tracing::warn!("intersection observer unavailable: {:?}", error);
            return;
        }
    };
    for heading in headings {
        observer.observe(&heading.element);
    }

    let mut hooks = state.hooks.borrow_mut();
    hooks.observer_callback = Some(callback);
    hooks.observer = Some(observer);
}
