//! Document outline extraction.
//!
//! The outline powers the table of contents: one entry per heading, nested
//! by depth, each carrying the heading text and its anchor id.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::tree::{Element, Node, PropertyValue, Tree};

/// One heading in the document outline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Concatenated text content of the heading.
    pub value: String,
    /// Heading depth, 1 through 6.
    pub depth: u8,
    /// Anchor id, if the heading has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SmolStr>,
    /// Headings nested under this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineEntry>,
}

/// Collect every heading in the tree into a nested outline.
///
/// A heading becomes a child of the closest preceding heading with a
/// smaller depth. Skipped levels are tolerated, so an `h3` directly after
/// an `h1` still nests under it.
pub fn extract_outline(tree: &Tree) -> Vec<OutlineEntry> {
    let mut flat = Vec::new();
    collect_headings(&tree.children, &mut flat);
    let mut headings = flat.into_iter().peekable();
    nest_entries(&mut headings, 0)
}

/// Anchor ids of the outline in document order, skipping entries without one.
pub fn flatten_ids(entries: &[OutlineEntry]) -> Vec<SmolStr> {
    let mut ids = Vec::new();
    push_ids(entries, &mut ids);
    ids
}

fn collect_headings(children: &[Node], flat: &mut Vec<OutlineEntry>) {
    for node in children {
        let Some(element) = node.as_element() else {
            continue;
        };
        if let Some(depth) = element.heading_depth() {
            flat.push(OutlineEntry {
                value: element.text_content(),
                depth,
                id: heading_id(element),
                children: Vec::new(),
            });
        } else {
            collect_headings(&element.children, flat);
        }
    }
}

fn heading_id(element: &Element) -> Option<SmolStr> {
    match element.properties.get("id")? {
        PropertyValue::Single(id) => Some(id.clone()),
        PropertyValue::List(items) => items.first().cloned(),
    }
}

fn nest_entries(
    headings: &mut std::iter::Peekable<std::vec::IntoIter<OutlineEntry>>,
    min_depth: u8,
) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    while let Some(mut entry) = headings.next_if(|next| next.depth > min_depth) {
        entry.children = nest_entries(headings, entry.depth);
        entries.push(entry);
    }
    entries
}

fn push_ids(entries: &[OutlineEntry], ids: &mut Vec<SmolStr>) {
    for entry in entries {
        if let Some(id) = &entry.id {
            if !id.is_empty() {
                ids.push(id.clone());
            }
        }
        push_ids(&entry.children, ids);
    }
}
