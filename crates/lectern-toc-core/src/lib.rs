//! Lectern table-of-contents core
//!
//! The platform-free half of active-section tracking: selection math and
//! the tracker state machine, both plain data in and plain data out. The
//! browser crate wires these to the real DOM; tests drive them directly.

pub mod config;
pub mod select;
pub mod tracker;

pub use config::TrackerConfig;
pub use lectern_render::{CONTENT_ID_PREFIX, OutlineEntry, flatten_ids};
pub use select::{
    HeadingOffset, IntersectionHit, click_scroll_target, select_by_intersection, select_by_scroll,
};
pub use smol_str::SmolStr;
pub use tracker::{ResolveStep, SectionTracker, TrackerPhase};
