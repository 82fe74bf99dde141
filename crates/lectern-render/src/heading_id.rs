//! Heading id normalization.
//!
//! The sanitizer upstream of this pipeline prefixes every user-supplied id
//! with `user-content-` to keep authored anchors from shadowing browser
//! internals. In-page links want the clean ids back, so this pass strips
//! the prefix from every heading before serialization.

use smol_str::SmolStr;

use crate::tree::{Element, Node, PropertyValue, Tree};

/// Prefix the upstream sanitizer adds to authored ids.
pub const CONTENT_ID_PREFIX: &str = "user-content-";

/// Strip [`CONTENT_ID_PREFIX`] from the `id` attribute of every `h1`..`h6`
/// element in the tree.
///
/// The id may be stored as a bare string or as a one-element list; either
/// way the stored form is kept. Headings without an id, ids without the
/// prefix, and lists of any other length are left untouched, so applying
/// the pass twice is the same as applying it once.
pub fn normalize_heading_ids(tree: &mut Tree) {
    visit(&mut tree.children);
}

fn visit(children: &mut [Node]) {
    for node in children {
        if let Node::Element(element) = node {
            if element.is_heading() {
                strip_prefix(element);
            }
            visit(&mut element.children);
        }
    }
}

fn strip_prefix(element: &mut Element) {
    let Some(value) = element.properties.get_mut("id") else {
        return;
    };
    let id = match value {
        PropertyValue::Single(id) => id,
        PropertyValue::List(items) => {
            let [id] = items.as_mut_slice() else {
                return;
            };
            id
        }
    };
    if let Some(stripped) = id.strip_prefix(CONTENT_ID_PREFIX) {
        let stripped = SmolStr::new(stripped);
        *id = stripped;
    }
}
