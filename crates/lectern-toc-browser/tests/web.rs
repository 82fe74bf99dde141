//! WASM browser tests for lectern-toc-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

#![cfg(all(target_arch = "wasm32", target_os = "unknown"))]

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use gloo_timers::future::TimeoutFuture;
use lectern_toc_browser::{TocController, strip_heading_prefixes};
use lectern_toc_core::{OutlineEntry, SmolStr, TrackerConfig, TrackerPhase};

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Builds a page of alternating spacers and `h2` headings.
fn setup_headings(ids: &[&str]) {
    let document = document();
    let body = document.body().unwrap();
    body.set_inner_html("");
    for id in ids {
        let spacer = document.create_element("div").unwrap();
        spacer.set_attribute("style", "height: 400px").unwrap();
        body.append_child(&spacer).unwrap();
        let heading = document.create_element("h2").unwrap();
        heading.set_id(id);
        heading.set_text_content(Some(&id.to_uppercase()));
        body.append_child(&heading).unwrap();
    }
    let tail = document.create_element("div").unwrap();
    tail.set_attribute("style", "height: 1200px").unwrap();
    body.append_child(&tail).unwrap();
}

fn outline(ids: &[&str]) -> Vec<OutlineEntry> {
    ids.iter()
        .map(|id| OutlineEntry {
            value: id.to_uppercase(),
            depth: 2,
            id: Some(SmolStr::new(id)),
            children: Vec::new(),
        })
        .collect()
}

// === Controller lifecycle ===

#[wasm_bindgen_test]
async fn test_controller_resolves_and_picks_a_section() {
    setup_headings(&["intro", "details"]);
    let controller = TocController::new(TrackerConfig::default());
    controller.set_outline(&outline(&["intro", "details"]));

    TimeoutFuture::new(50).await;
    assert_eq!(controller.phase(), TrackerPhase::Observing);
    // near the top of the page the first section is highlighted
    assert_eq!(controller.active_id().as_deref(), Some("intro"));
}

#[wasm_bindgen_test]
async fn test_missing_headings_give_up_after_retries() {
    setup_headings(&[]);
    let config = TrackerConfig {
        max_retries: 2,
        retry_delay_ms: 10,
        ..TrackerConfig::default()
    };
    let controller = TocController::new(config);
    controller.set_outline(&outline(&["ghost"]));

    TimeoutFuture::new(100).await;
    assert_eq!(
        controller.phase(),
        TrackerPhase::AwaitingDom { attempts: 2 }
    );
    assert_eq!(controller.active_id(), None);
}

#[wasm_bindgen_test]
async fn test_empty_outline_never_starts() {
    setup_headings(&[]);
    let controller = TocController::new(TrackerConfig::default());
    controller.set_outline(&[]);

    TimeoutFuture::new(30).await;
    assert_eq!(controller.phase(), TrackerPhase::Uninitialized);
}

#[wasm_bindgen_test]
async fn test_active_change_callback_fires() {
    setup_headings(&["alpha", "beta"]);
    let controller = TocController::new(TrackerConfig::default());
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    controller.on_active_change(move |id| sink.borrow_mut().push(id.to_owned()));
    controller.set_outline(&outline(&["alpha", "beta"]));

    TimeoutFuture::new(50).await;
    assert_eq!(seen.borrow().first().map(String::as_str), Some("alpha"));
}

#[wasm_bindgen_test]
async fn test_callback_replaced_during_notification() {
    setup_headings(&["alpha", "beta"]);
    let controller = Rc::new(TocController::new(TrackerConfig::default()));
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let handle = Rc::downgrade(&controller);
    controller.on_active_change(move |id| {
        sink.borrow_mut().push(id.to_owned());
        // a host may swap its handler from inside the notification
        if let Some(controller) = handle.upgrade() {
            let sink = sink.clone();
            controller.on_active_change(move |id| sink.borrow_mut().push(format!("late:{id}")));
        }
    });
    controller.set_outline(&outline(&["alpha", "beta"]));

    TimeoutFuture::new(50).await;
    assert_eq!(seen.borrow().first().map(String::as_str), Some("alpha"));
    assert_eq!(controller.phase(), TrackerPhase::Observing);
}

#[wasm_bindgen_test]
async fn test_dispose_stops_tracking() {
    setup_headings(&["solo"]);
    let controller = TocController::new(TrackerConfig::default());
    controller.set_outline(&outline(&["solo"]));

    TimeoutFuture::new(50).await;
    controller.dispose();
    assert_eq!(controller.phase(), TrackerPhase::Disposed);
    assert_eq!(controller.active_id(), None);
}

#[wasm_bindgen_test]
async fn test_outline_swap_retargets_tracking() {
    setup_headings(&["old-intro", "old-details"]);
    let controller = TocController::new(TrackerConfig::default());
    controller.set_outline(&outline(&["old-intro", "old-details"]));

    TimeoutFuture::new(50).await;
    assert_eq!(controller.active_id().as_deref(), Some("old-intro"));

    // a new post renders: fresh headings, fresh outline, same controller
    setup_headings(&["new-intro", "new-details"]);
    controller.set_outline(&outline(&["new-intro", "new-details"]));

    TimeoutFuture::new(50).await;
    assert_eq!(controller.phase(), TrackerPhase::Observing);
    assert_eq!(controller.active_id().as_deref(), Some("new-intro"));
}

// === Navigation ===

#[wasm_bindgen_test]
async fn test_navigate_updates_fragment_after_settling() {
    setup_headings(&["target"]);
    let controller = TocController::new(TrackerConfig::default());
    controller.set_outline(&outline(&["target"]));

    TimeoutFuture::new(50).await;
    controller.navigate_to("target");
    // settle delay is 300ms by default
    TimeoutFuture::new(450).await;
    let hash = web_sys::window().unwrap().location().hash().unwrap();
    assert_eq!(hash, "#target");
}

// === Anchor sweep ===

#[wasm_bindgen_test]
fn test_sweep_strips_heading_prefixes() {
    let body = document().body().unwrap();
    body.set_inner_html(
        "<h2 id=\"user-content-alpha\">Alpha</h2>\
         <h3 id=\"beta\">Beta</h3>\
         <p id=\"user-content-aside\">aside</p>",
    );

    strip_heading_prefixes();

    assert!(document().get_element_by_id("alpha").is_some());
    // already-clean heading untouched
    assert!(document().get_element_by_id("beta").is_some());
    // non-heading ids keep their prefix
    assert!(document().get_element_by_id("user-content-aside").is_some());
}
