//! Lectern renderer
//!
//! Markdown in, post-processed HTML and a document outline out. The tree
//! passes also run standalone over trees produced by other parsers, which
//! is what keeps the blog's server and client output identical.

use serde::{Deserialize, Serialize};

pub mod heading_id;
pub mod html;
#[cfg(feature = "markdown")]
pub mod ingest;
pub mod outline;
pub mod soft_break;
pub mod tree;

pub use heading_id::{CONTENT_ID_PREFIX, normalize_heading_ids};
pub use html::{HtmlWriter, tree_to_html};
#[cfg(feature = "markdown")]
pub use ingest::{default_md_options, tree_from_markdown};
pub use outline::{OutlineEntry, extract_outline, flatten_ids};
pub use smol_str::SmolStr;
pub use soft_break::expand_soft_breaks;
pub use tree::{Element, Node, Properties, PropertyValue, Text, Tree};

/// Run every tree pass in order.
///
/// Heading ids are normalized before soft breaks expand, so the outline
/// taken afterwards matches the anchors the serialized page will carry.
pub fn postprocess(tree: &mut Tree) {
    normalize_heading_ids(tree);
    expand_soft_breaks(tree);
}

/// A fully rendered post, ready to ship to the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPost {
    pub html: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outline: Vec<OutlineEntry>,
}

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum RenderError {
    #[error("markup serialization failed")]
    #[diagnostic(code(lectern::render::serialize))]
    Serialize(#[from] std::fmt::Error),
}

/// Render markdown into HTML plus its outline.
#[cfg(feature = "markdown")]
pub fn render_post(source: &str) -> Result<RenderedPost, RenderError> {
    let mut tree = tree_from_markdown(source);
    postprocess(&mut tree);
    let outline = extract_outline(&tree);
    let html = tree_to_html(&tree)?;
    tracing::debug!(
        source_bytes = source.len(),
        html_bytes = html.len(),
        headings = outline.len(),
        "rendered post"
    );
    Ok(RenderedPost { html, outline })
}
