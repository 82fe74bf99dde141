//! Markdown ingestion.
//!
//! Parses CommonMark (plus tables, strikethrough, task lists and heading
//! attributes) into a [`Tree`]. Heading ids are slugged GitHub-style and
//! carry the sanitizer prefix, so the tree looks exactly like one that came
//! out of a sanitizing markdown pipeline and can be fed straight into the
//! post-processing passes.

use std::collections::HashSet;

use pulldown_cmark::{
    Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use smol_str::{SmolStr, format_smolstr};

use crate::heading_id::CONTENT_ID_PREFIX;
use crate::tree::{Element, Node, PropertyValue, Tree};

pub fn default_md_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Parse markdown into a [`Tree`].
pub fn tree_from_markdown(source: &str) -> Tree {
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(source, default_md_options()) {
        builder.handle(event);
    }
    builder.finish()
}

struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Element>,
    slugger: Slugger,
    /// Explicit id from heading attributes, pending until the heading closes.
    heading_id: Option<SmolStr>,
    table_alignments: Vec<Alignment>,
    in_table_head: bool,
    cell_index: usize,
    image: Option<PendingImage>,
}

/// An image whose alt text is still being collected from inline events.
struct PendingImage {
    element: Element,
    alt: String,
    depth: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            root: Vec::new(),
            stack: Vec::new(),
            slugger: Slugger::new(),
            heading_id: None,
            table_alignments: Vec::new(),
            in_table_head: false,
            cell_index: 0,
            image: None,
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        if self.image.is_some() {
            self.handle_in_image(event);
            return;
        }
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => {
                let element = Element::with_children("code", vec![Node::text(code.as_ref())]);
                self.push_node(element.into());
            }
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.push_node(Element::new("br").into()),
            Event::Rule => self.push_node(Element::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input");
                input.properties.set("type", "checkbox");
                input.properties.set("disabled", "");
                if checked {
                    input.properties.set("checked", "");
                }
                self.push_node(input.into());
            }
            // raw html never reaches the output tree
            Event::Html(_) | Event::InlineHtml(_) => {}
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(Element::new("p")),
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                let mut element = Element::new(heading_tag(level));
                if !classes.is_empty() {
                    let classes = classes
                        .iter()
                        .map(|class| SmolStr::new(class.as_ref()))
                        .collect::<Vec<_>>();
                    element.properties.set("class", PropertyValue::List(classes));
                }
                for (name, value) in attrs {
                    let value = value.map(|v| SmolStr::new(v.as_ref())).unwrap_or_default();
                    element.properties.set(SmolStr::new(name.as_ref()), value);
                }
                self.heading_id = id.map(|id| SmolStr::new(id.as_ref()));
                self.open(element);
            }
            Tag::BlockQuote(_) => self.open(Element::new("blockquote")),
            Tag::CodeBlock(kind) => {
                let mut code = Element::new("code");
                if let CodeBlockKind::Fenced(info) = &kind {
                    if let Some(language) = info.split_whitespace().next() {
                        code.properties
                            .set("class", format_smolstr!("language-{language}"));
                    }
                }
                self.open(Element::new("pre"));
                self.open(code);
            }
            Tag::List(Some(start)) => {
                let mut list = Element::new("ol");
                if start != 1 {
                    list.properties.set("start", format_smolstr!("{start}"));
                }
                self.open(list);
            }
            Tag::List(None) => self.open(Element::new("ul")),
            Tag::Item => self.open(Element::new("li")),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                self.open(Element::new("table"));
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                self.open(Element::new("thead"));
                self.open(Element::new("tr"));
            }
            Tag::TableRow => {
                self.cell_index = 0;
                self.open(Element::new("tr"));
            }
            Tag::TableCell => {
                let mut cell = Element::new(if self.in_table_head { "th" } else { "td" });
                let align = self
                    .table_alignments
                    .get(self.cell_index)
                    .and_then(alignment_name);
                if let Some(align) = align {
                    cell.properties.set("align", align);
                }
                self.cell_index += 1;
                self.open(cell);
            }
            Tag::Emphasis => self.open(Element::new("em")),
            Tag::Strong => self.open(Element::new("strong")),
            Tag::Strikethrough => self.open(Element::new("del")),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = Element::new("a");
                link.properties.set("href", SmolStr::new(dest_url.as_ref()));
                if !title.is_empty() {
                    link.properties.set("title", SmolStr::new(title.as_ref()));
                }
                self.open(link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut image = Element::new("img");
                image.properties.set("src", SmolStr::new(dest_url.as_ref()));
                if !title.is_empty() {
                    image.properties.set("title", SmolStr::new(title.as_ref()));
                }
                self.image = Some(PendingImage {
                    element: image,
                    alt: String::new(),
                    depth: 1,
                });
            }
            Tag::HtmlBlock => {}
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => self.close_heading(),
            TagEnd::CodeBlock => {
                self.close(); // code
                self.close(); // pre
            }
            TagEnd::TableHead => {
                self.close(); // tr
                self.close(); // thead
                self.in_table_head = false;
                self.open(Element::new("tbody"));
            }
            TagEnd::Table => {
                self.close(); // tbody
                self.close(); // table
            }
            TagEnd::HtmlBlock => {}
            _ => self.close(),
        }
    }

    /// Inline events between `Start(Image)` and its matching end flatten
    /// into the pending alt text instead of the tree.
    fn handle_in_image(&mut self, event: Event<'_>) {
        let Some(mut image) = self.image.take() else {
            return;
        };
        match event {
            Event::Start(Tag::Image { .. }) => image.depth += 1,
            Event::End(TagEnd::Image) => {
                image.depth -= 1;
                if image.depth == 0 {
                    let mut element = image.element;
                    element.properties.set("alt", SmolStr::new(image.alt));
                    self.push_node(element.into());
                    return;
                }
            }
            Event::Text(text) => image.alt.push_str(&text),
            Event::Code(code) => image.alt.push_str(&code),
            Event::SoftBreak | Event::HardBreak => image.alt.push(' '),
            _ => {}
        }
        self.image = Some(image);
    }

    fn close_heading(&mut self) {
        let Some(mut element) = self.stack.pop() else {
            return;
        };
        let id = match self.heading_id.take() {
            Some(id) => {
                self.slugger.reserve(&id);
                Some(id)
            }
            None => self.slugger.slug(&element.text_content()),
        };
        if let Some(id) = id {
            element
                .properties
                .set("id", format_smolstr!("{CONTENT_ID_PREFIX}{id}"));
        }
        self.push_node(element.into());
    }

    fn open(&mut self, element: Element) {
        self.stack.push(element);
    }

    fn close(&mut self) {
        let Some(element) = self.stack.pop() else {
            return;
        };
        self.push_node(element.into());
    }

    fn push_node(&mut self, node: Node) {
        self.current_children().push(node);
    }

    /// Appends text, merging into a preceding text sibling.
    fn push_text(&mut self, text: &str) {
        let children = self.current_children();
        if let Some(Node::Text(last)) = children.last_mut() {
            last.value.push_str(text);
            return;
        }
        children.push(Node::text(text));
    }

    fn current_children(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(element) => &mut element.children,
            None => &mut self.root,
        }
    }

    fn finish(mut self) -> Tree {
        while !self.stack.is_empty() {
            self.close();
        }
        Tree::new(self.root)
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn alignment_name(alignment: &Alignment) -> Option<&'static str> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some("left"),
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
    }
}

/// GitHub-style heading slugs with collision counters.
struct Slugger {
    taken: HashSet<String>,
}

impl Slugger {
    fn new() -> Self {
        Self {
            taken: HashSet::new(),
        }
    }

    fn reserve(&mut self, id: &str) {
        self.taken.insert(id.to_owned());
    }

    /// Lowercase alphanumerics, spaces to dashes, dashes and underscores
    /// kept, everything else dropped. `None` when nothing is left.
    fn slug(&mut self, text: &str) -> Option<SmolStr> {
        let mut base = String::new();
        for c in text.chars() {
            if c.is_alphanumeric() {
                base.extend(c.to_lowercase());
            } else if c == ' ' {
                base.push('-');
            } else if c == '-' || c == '_' {
                base.push(c);
            }
        }
        if base.is_empty() {
            return None;
        }
        let mut candidate = base.clone();
        let mut n = 1;
        while !self.taken.insert(candidate.clone()) {
            candidate = format!("{base}-{n}");
            n += 1;
        }
        Some(SmolStr::new(candidate))
    }
}
