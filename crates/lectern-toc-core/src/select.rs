//! Active-section selection.
//!
//! Two independent signals feed the tracker: a scroll-driven scan over
//! every heading's page position, and intersection observer reports for
//! headings crossing the activation band. Both reduce to "which anchor is
//! active", and both live here as plain functions over plain data so the
//! selection rules are testable without a DOM.

use smol_str::SmolStr;

use crate::config::TrackerConfig;

/// A heading's position from a scroll-driven scan.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadingOffset {
    pub id: SmolStr,
    /// Distance from the viewport top, as layout reports it. Negative
    /// when the heading has scrolled past.
    pub top: f64,
}

/// One intersection observer report for a visible heading.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionHit {
    pub id: SmolStr,
    pub top: f64,
    pub ratio: f64,
}

/// Pick the active section from a full position scan.
///
/// A heading qualifies when its top sits at or above the activation line,
/// give or take the below-tolerance. Among qualifiers the one closest to
/// the line wins, with distance below the line scaled up by the penalty
/// so a section just entered from above beats one approaching from below.
/// Ties keep the earlier heading. With no qualifier at all, the first
/// heading wins near the top of the page and nobody wins elsewhere.
pub fn select_by_scroll<'a>(
    headings: &'a [HeadingOffset],
    scroll_y: f64,
    config: &TrackerConfig,
) -> Option<&'a str> {
    let line = config.activation_line();
    let mut best: Option<(&HeadingOffset, f64)> = None;
    for heading in headings {
        if heading.top > line + config.below_tolerance {
            continue;
        }
        let distance = if heading.top <= line {
            line - heading.top
        } else {
            (heading.top - line) * config.below_penalty
        };
        let better = match &best {
            Some((_, best_distance)) => distance < *best_distance,
            None => true,
        };
        if better {
            best = Some((heading, distance));
        }
    }
    match best {
        Some((heading, _)) => Some(heading.id.as_str()),
        None if scroll_y < config.top_region => headings.first().map(|h| h.id.as_str()),
        None => None,
    }
}

/// Pick the active section from intersection reports.
///
/// The entry closest to the activation line wins; equal distances fall
/// back to the larger visible ratio, then to report order.
pub fn select_by_intersection<'a>(
    hits: &'a [IntersectionHit],
    config: &TrackerConfig,
) -> Option<&'a str> {
    let line = config.activation_line();
    hits.iter()
        .min_by(|a, b| {
            let da = (a.top - line).abs();
            let db = (b.top - line).abs();
            da.total_cmp(&db).then(b.ratio.total_cmp(&a.ratio))
        })
        .map(|hit| hit.id.as_str())
}

/// Absolute scroll position that puts `element_top` just under the header.
///
/// `element_top` is viewport-relative, so the current scroll position is
/// added back in. Never negative.
pub fn click_scroll_target(scroll_y: f64, element_top: f64, config: &TrackerConfig) -> f64 {
    (scroll_y + element_top - config.click_offset()).max(0.0)
}
