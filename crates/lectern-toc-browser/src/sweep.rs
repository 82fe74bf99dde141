//! Heading id cleanup for server-rendered pages.
//!
//! A page rendered by a pipeline that keeps the sanitizer prefix arrives
//! with `user-content-` ids in the DOM. This sweep rewrites them in place
//! so fragment links and the tracker agree on the clean anchors.

/// Strip the sanitizer prefix from every heading id in the document.
///
/// Already-clean ids and non-heading elements are left alone, so running
/// the sweep twice changes nothing.
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub fn strip_heading_prefixes() {
    use lectern_toc_core::CONTENT_ID_PREFIX;
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        tracing::warn!("no document, heading ids keep their prefix");
        return;
    };
    let Ok(node_list) =
        document.query_selector_all("h1[id], h2[id], h3[id], h4[id], h5[id], h6[id]")
    else {
        return;
    };

    for i in 0..node_list.length() {
        let Some(node) = node_list.item(i) else {
            continue;
        };
        let Some(element) = node.dyn_ref::<web_sys::Element>() else {
            continue;
        };
        let id = element.id();
        if let Some(stripped) = id.strip_prefix(CONTENT_ID_PREFIX) {
            element.set_id(stripped);
        }
    }
}

/// No-op on non-WASM targets.
#[cfg(not(all(target_arch = "wasm32", target_os = "unknown")))]
pub fn strip_heading_prefixes() {}
