//! Section tracking state machine.
//!
//! The tracker owns everything about "which section is active" except the
//! DOM itself. The browser layer feeds it resolution attempts, scroll
//! scans and intersection reports; the tracker decides what they mean.

use lectern_render::{OutlineEntry, flatten_ids};
use smol_str::SmolStr;

use crate::config::TrackerConfig;
use crate::select::{HeadingOffset, IntersectionHit, select_by_intersection, select_by_scroll};

/// Lifecycle of a [`SectionTracker`].
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// No outline installed, or its headings carried no anchors.
    Uninitialized,
    /// Waiting for the rendered headings to appear in the page.
    AwaitingDom { attempts: u32 },
    /// Headings resolved, position signals are live.
    Observing,
    /// Shut down, ignores everything.
    Disposed,
}

/// What the caller should do after a DOM resolution attempt.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum ResolveStep {
    /// Headings found, start observing.
    Ready,
    /// Nothing found yet, try again after the retry delay.
    Retry,
    /// Out of attempts, or nothing left to track.
    GiveUp,
}

pub struct SectionTracker {
    config: TrackerConfig,
    ids: Vec<SmolStr>,
    phase: TrackerPhase,
    active: Option<SmolStr>,
}

impl SectionTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            ids: Vec::new(),
            phase: TrackerPhase::Uninitialized,
            active: None,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Anchor ids being followed, in document order.
    pub fn ids(&self) -> &[SmolStr] {
        &self.ids
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Install a new outline and reset tracking.
    pub fn set_outline(&mut self, outline: &[OutlineEntry]) {
        self.ids = flatten_ids(outline);
        self.active = None;
        self.phase = TrackerPhase::Uninitialized;
        tracing::debug!(sections = self.ids.len(), "outline installed");
    }

    /// Record one attempt to find the heading elements in the page.
    /// `resolved` is how many tracked anchors were actually found.
    pub fn note_resolution(&mut self, resolved: usize) -> ResolveStep {
        if self.phase == TrackerPhase::Disposed || self.ids.is_empty() {
            return ResolveStep::GiveUp;
        }
        if resolved > 0 {
            self.phase = TrackerPhase::Observing;
            return ResolveStep::Ready;
        }
        let attempts = match self.phase {
            TrackerPhase::AwaitingDom { attempts } => attempts + 1,
            _ => 1,
        };
        self.phase = TrackerPhase::AwaitingDom { attempts };
        if attempts < self.config.max_retries {
            ResolveStep::Retry
        } else {
            tracing::debug!(attempts, "headings never appeared, giving up");
            ResolveStep::GiveUp
        }
    }

    /// Feed a scroll-scan snapshot. True when the active section changed.
    pub fn update_from_scan(&mut self, headings: &[HeadingOffset], scroll_y: f64) -> bool {
        if self.phase != TrackerPhase::Observing {
            return false;
        }
        let selected = select_by_scroll(headings, scroll_y, &self.config);
        self.apply_selection(selected)
    }

    /// Feed an intersection report. True when the active section changed.
    pub fn update_from_intersections(&mut self, hits: &[IntersectionHit]) -> bool {
        if self.phase != TrackerPhase::Observing {
            return false;
        }
        let selected = select_by_intersection(hits, &self.config);
        self.apply_selection(selected)
    }

    // an empty selection keeps the current section highlighted
    fn apply_selection(&mut self, selected: Option<&str>) -> bool {
        let Some(selected) = selected else {
            return false;
        };
        if self.active.as_deref() == Some(selected) {
            return false;
        }
        self.active = Some(SmolStr::new(selected));
        tracing::debug!(section = selected, "active section changed");
        true
    }

    /// Stop tracking permanently.
    pub fn dispose(&mut self) {
        self.phase = TrackerPhase::Disposed;
        self.active = None;
    }
}
