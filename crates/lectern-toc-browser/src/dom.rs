//! Heading lookups and position snapshots.

use lectern_toc_core::{HeadingOffset, SmolStr};

/// A tracked anchor resolved to its element in the page.
pub struct ResolvedHeading {
    pub id: SmolStr,
    pub element: web_sys::Element,
}

/// Look up the heading element for every tracked anchor id. Anchors not
/// in the page yet are skipped; the caller decides whether to retry.
pub fn resolve_headings(ids: &[SmolStr]) -> Vec<ResolvedHeading> {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        tracing::warn!("no document, table of contents stays inactive");
        return Vec::new();
    };
    ids.iter()
        .filter_map(|id| {
            document
                .get_element_by_id(id)
                .map(|element| ResolvedHeading {
                    id: id.clone(),
                    element,
                })
        })
        .collect()
}

/// Viewport-relative top of every resolved heading, in document order.
pub fn snapshot_offsets(headings: &[ResolvedHeading]) -> Vec<HeadingOffset> {
    headings
        .iter()
        .map(|heading| HeadingOffset {
            id: heading.id.clone(),
            top: heading.element.get_bounding_client_rect().top(),
        })
        .collect()
}

/// Window vertical scroll offset, zero when unavailable.
pub fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|window| window.scroll_y().ok())
        .unwrap_or(0.0)
}
