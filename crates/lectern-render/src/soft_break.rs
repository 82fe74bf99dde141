//! Soft line break expansion.
//!
//! Markdown authors expect a bare newline inside a paragraph to render as a
//! line break, and the two-space / trailing-backslash hard break markers to
//! survive the trip through the parser. Some upstream parsers leave both as
//! literal characters inside text nodes instead of emitting `<br>`. This pass
//! rewrites those text nodes into text and `br` element siblings.
//!
//! Two rules apply, in order, to each text node:
//!
//! 1. Marker expansion: the sequences `"  \n"`, `"  \r\n"`, `"\\\n"` and
//!    `"\\\r\n"` each become a `br`, with the surrounding text kept as
//!    siblings. This applies anywhere in the tree.
//! 2. Newline expansion: a remaining bare `\n` becomes a `br`, but only
//!    for text directly inside `p`, `li`, `td` or `th`, and only when the
//!    text does not end with a newline.
//!
//! Text anywhere under `pre` or `code` is never touched, and a node is only
//! replaced when expansion produces more than one child. Running the pass
//! over already-expanded output changes nothing.

use crate::tree::{Element, Node, Tree};

/// Hard break markers, matched anywhere in a text node.
const MARKERS: [&str; 4] = ["  \n", "  \r\n", "\\\n", "\\\r\n"];

/// Parents whose direct text children get bare-newline expansion.
fn splits_bare_newlines(parent_tag: Option<&str>) -> bool {
    matches!(parent_tag, Some("p" | "li" | "td" | "th"))
}

fn is_verbatim_tag(tag: &str) -> bool {
    matches!(tag, "pre" | "code")
}

/// Expand soft break markers and bare newlines into `br` elements.
pub fn expand_soft_breaks(tree: &mut Tree) {
    expand_children(&mut tree.children, None, false);
}

fn expand_children(children: &mut Vec<Node>, parent_tag: Option<&str>, in_verbatim: bool) {
    let mut index = 0;
    while index < children.len() {
        let expanded = match &mut children[index] {
            Node::Element(element) => {
                let verbatim = in_verbatim || is_verbatim_tag(&element.tag_name);
                expand_children(
                    &mut element.children,
                    Some(element.tag_name.as_str()),
                    verbatim,
                );
                None
            }
            Node::Text(_) if in_verbatim => None,
            Node::Text(text) => expand_text(&text.value, parent_tag),
        };
        match expanded {
            Some(nodes) => {
                let count = nodes.len();
                children.splice(index..index + 1, nodes);
                index += count;
            }
            None => index += 1,
        }
    }
}

/// Expansion of a single text node, or `None` when the node stays as is.
fn expand_text(text: &str, parent_tag: Option<&str>) -> Option<Vec<Node>> {
    let split_newlines = splits_bare_newlines(parent_tag);
    let nodes = if MARKERS.iter().any(|marker| text.contains(marker)) {
        let mut nodes = Vec::new();
        let mut cursor = 0;
        while let Some((at, len)) = find_marker(text, cursor) {
            push_fragment(&mut nodes, &text[cursor..at], split_newlines);
            nodes.push(Element::new("br").into());
            cursor = at + len;
        }
        push_fragment(&mut nodes, &text[cursor..], split_newlines);
        nodes
    } else if split_newlines && has_inner_newline(text) {
        expand_newlines(text)
    } else {
        return None;
    };
    (nodes.len() > 1).then_some(nodes)
}

/// Earliest marker occurrence at or after `from`, as `(index, length)`.
///
/// No marker is a prefix of another, so at most one of them can match at
/// any given index.
fn find_marker(text: &str, from: usize) -> Option<(usize, usize)> {
    MARKERS
        .iter()
        .filter_map(|marker| {
            text[from..]
                .find(marker)
                .map(|at| (from + at, marker.len()))
        })
        .min_by_key(|(at, _)| *at)
}

fn push_fragment(nodes: &mut Vec<Node>, fragment: &str, split_newlines: bool) {
    if fragment.is_empty() {
        return;
    }
    if split_newlines && has_inner_newline(fragment) {
        nodes.extend(expand_newlines(fragment));
    } else {
        nodes.push(Node::text(fragment));
    }
}

// A trailing newline marks end-of-block whitespace, not an authored break.
fn has_inner_newline(text: &str) -> bool {
    text.contains('\n') && !text.ends_with('\n')
}

fn expand_newlines(text: &str) -> Vec<Node> {
    let parts: Vec<&str> = text.split('\n').collect();
    let mut nodes = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        if !part.is_empty() {
            nodes.push(Node::text(*part));
        }
        if i + 1 < parts.len() {
            nodes.push(Element::new("br").into());
        }
    }
    nodes
}
