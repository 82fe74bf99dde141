//! Table-of-contents controller.
//!
//! One controller drives one rendered post. It owns the tracker plus every
//! DOM hook around it: the retry timer while headings render, the
//! intersection observer, the scroll listener with its animation-frame
//! throttle, and the settle timer after click navigation. Dropping the
//! controller tears all of that down.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use lectern_toc_core::{
    OutlineEntry, ResolveStep, SectionTracker, SmolStr, TrackerConfig, TrackerPhase,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::dom::{self, ResolvedHeading};
use crate::navigate;
use crate::observer;

pub struct TocController {
    state: Rc<ControllerState>,
}

pub(crate) struct ControllerState {
    pub(crate) tracker: RefCell<SectionTracker>,
    /// A scan is already queued for the next animation frame.
    pub(crate) raf_pending: Cell<bool>,
    pub(crate) raf_id: Cell<Option<i32>>,
    pub(crate) hooks: RefCell<Hooks>,
    pub(crate) on_active: RefCell<Option<Rc<dyn Fn(&str)>>>,
}

/// Everything registered with the browser, so teardown can unregister it.
/// The timers cancel themselves on drop.
#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) observer: Option<web_sys::IntersectionObserver>,
    pub(crate) observer_callback: Option<Closure<dyn FnMut(js_sys::Array)>>,
    pub(crate) scroll_callback: Option<Closure<dyn FnMut()>>,
    pub(crate) frame_callback: Option<Closure<dyn FnMut()>>,
    pub(crate) retry: Option<Timeout>,
    pub(crate) settle: Option<Timeout>,
}

impl TocController {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            state: Rc::new(ControllerState {
                tracker: RefCell::new(SectionTracker::new(config)),
                raf_pending: Cell::new(false),
                raf_id: Cell::new(None),
                hooks: RefCell::new(Hooks::default()),
                on_active: RefCell::new(None),
            }),
        }
    }

    /// Install the outline for the current post and start looking for its
    /// headings in the page. Replaces any outline installed before.
    pub fn set_outline(&self, outline: &[OutlineEntry]) {
        teardown(&self.state);
        self.state.tracker.borrow_mut().set_outline(outline);
        if self.state.tracker.borrow().ids().is_empty() {
            tracing::debug!("outline has no anchored headings, nothing to track");
            return;
        }
        schedule_resolve(&self.state, 0);
    }

    pub fn active_id(&self) -> Option<SmolStr> {
        self.state.tracker.borrow().active_id().map(SmolStr::new)
    }

    pub fn phase(&self) -> TrackerPhase {
        self.state.tracker.borrow().phase()
    }

    /// Register the callback fired whenever the highlighted section changes.
    pub fn on_active_change(&self, callback: impl Fn(&str) + 'static) {
        *self.state.on_active.borrow_mut() = Some(Rc::new(callback));
    }

    /// Smooth-scroll to a section and update the URL fragment once the
    /// scroll settles.
    pub fn navigate_to(&self, id: &str) {
        navigate::scroll_to_section(&self.state, id);
    }

    /// Stop tracking and release every DOM hook.
    pub fn dispose(&self) {
        teardown(&self.state);
        self.state.tracker.borrow_mut().dispose();
    }
}

impl Drop for TocController {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn schedule_resolve(state: &Rc<ControllerState>, delay_ms: u32) {
    let retry_state = state.clone();
    let timeout = Timeout::new(delay_ms, move || attempt_resolve(&retry_state));
    state.hooks.borrow_mut().retry = Some(timeout);
}

fn attempt_resolve(state: &Rc<ControllerState>) {
    let ids = state.tracker.borrow().ids().to_vec();
    let headings = dom::resolve_headings(&ids);
    let step = state.tracker.borrow_mut().note_resolution(headings.len());
    match step {
        ResolveStep::Ready => start_observing(state, headings),
        ResolveStep::Retry => {
            let delay = state.tracker.borrow().config().retry_delay_ms;
            schedule_resolve(state, delay);
        }
        ResolveStep::GiveUp => {
            state.hooks.borrow_mut().retry = None;
            tracing::debug!("table of contents inactive, headings not found");
        }
    }
}

fn start_observing(state: &Rc<ControllerState>, headings: Vec<ResolvedHeading>) {
    let Some(window) = web_sys::window() else {
        tracing::warn!("no window, scroll tracking disabled");
        return;
    };
    let headings = Rc::new(headings);

    observer::attach(state, &headings);

    // one reusable closure per signal, held in hooks until teardown
    let frame_state = state.clone();
    let frame_headings = headings.clone();
    let frame: Closure<dyn FnMut()> = Closure::new(move || {
        frame_state.raf_pending.set(false);
        frame_state.raf_id.set(None);
        run_scan(&frame_state, &frame_headings);
    });

    let scroll_state = state.clone();
    let scroll: Closure<dyn FnMut()> = Closure::new(move || {
        if scroll_state.raf_pending.replace(true) {
            return;
        }
        let Some(window) = web_sys::window() else {
            scroll_state.raf_pending.set(false);
            return;
        };
        let hooks = scroll_state.hooks.borrow();
        let Some(frame) = hooks.frame_callback.as_ref() else {
            scroll_state.raf_pending.set(false);
            return;
        };
        match window.request_animation_frame(frame.as_ref().unchecked_ref()) {
            Ok(id) => scroll_state.raf_id.set(Some(id)),
            Err(_) => scroll_state.raf_pending.set(false),
        }
    });

    let options = web_sys::AddEventListenerOptions::new();
    options.set_passive(true);
    let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
        "scroll",
        scroll.as_ref().unchecked_ref(),
        &options,
    );

    {
        let mut hooks = state.hooks.borrow_mut();
        hooks.frame_callback = Some(frame);
        hooks.scroll_callback = Some(scroll);
        hooks.retry = None;
    }

    // seed the highlight before the first scroll event
    run_scan(state, &headings);
}

fn run_scan(state: &Rc<ControllerState>, headings: &[ResolvedHeading]) {
    let offsets = dom::snapshot_offsets(headings);
    let scroll_y = dom::scroll_y();
    let changed = state
        .tracker
        .borrow_mut()
        .update_from_scan(&offsets, scroll_y);
    if changed {
        notify_active(state);
    }
}

pub(crate) fn notify_active(state: &ControllerState) {
    let active = state.tracker.borrow().active_id().map(SmolStr::new);
    let Some(active) = active else {
        return;
    };
    // cloned out of the cell so the callback itself may call on_active_change
    let callback = state.on_active.borrow().clone();
    if let Some(callback) = callback {
        callback(&active);
    }
}

fn teardown(state: &ControllerState) {
    state.raf_pending.set(false);
    if let Some(id) = state.raf_id.take() {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(id);
        }
    }
    let mut hooks = state.hooks.borrow_mut();
    if let Some(observer) = hooks.observer.take() {
        observer.disconnect();
    }
    hooks.observer_callback = None;
    if let Some(scroll) = hooks.scroll_callback.take() {
        if let Some(window) = web_sys::window() {
            let _ = window
                .remove_event_listener_with_callback("scroll", scroll.as_ref().unchecked_ref());
        }
    }
    hooks.frame_callback = None;
    hooks.retry = None;
    hooks.settle = None;
}
