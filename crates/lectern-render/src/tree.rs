//! Document tree model: the structure the post-processing passes rewrite.
//!
//! The shape mirrors what an HTML-oriented markdown processor hands over:
//! a root with ordered children, elements with an ordered attribute map,
//! and plain text leaves. Child order is rendering order; passes must
//! preserve it except where they explicitly splice.

use smol_str::SmolStr;

/// Attribute value: a bare string or a list of strings.
///
/// Upstream processors store some attributes as lists (`class`) and most as
/// bare strings (`id`, `href`). Passes that rewrite a value must write back
/// the same form they found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyValue {
    Single(SmolStr),
    List(Vec<SmolStr>),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Single(SmolStr::new(value))
    }
}

impl From<SmolStr> for PropertyValue {
    fn from(value: SmolStr) -> Self {
        PropertyValue::Single(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Single(SmolStr::new(value))
    }
}

impl From<Vec<SmolStr>> for PropertyValue {
    fn from(values: Vec<SmolStr>) -> Self {
        PropertyValue::List(values)
    }
}

/// Ordered attribute map.
///
/// Elements carry a handful of attributes at most, so a vec of pairs beats
/// a hash map and keeps serialization order deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(SmolStr, PropertyValue)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PropertyValue> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Set an attribute, replacing an existing entry in place so the
    /// original position is kept.
    pub fn set(&mut self, name: impl Into<SmolStr>, value: impl Into<PropertyValue>) {
        let name = name.into();
        let value = value.into();
        match self.get_mut(&name) {
            Some(existing) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &PropertyValue)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }
}

/// One node of the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Text {
            value: value.into(),
        })
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            Node::Element(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

/// An element with a tag name, attributes, and ordered children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub tag_name: SmolStr,
    pub properties: Properties,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag_name: impl Into<SmolStr>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(tag_name: impl Into<SmolStr>, children: Vec<Node>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties: Properties::new(),
            children,
        }
    }

    /// Heading level for `h1`..`h6`, `None` for everything else.
    pub fn heading_depth(&self) -> Option<u8> {
        let rest = self.tag_name.strip_prefix('h')?;
        if rest.len() != 1 {
            return None;
        }
        match rest.as_bytes()[0] {
            digit @ b'1'..=b'6' => Some(digit - b'0'),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        self.heading_depth().is_some()
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text_content(&self) -> String {
        fn collect(nodes: &[Node], out: &mut String) {
            for node in nodes {
                match node {
                    Node::Text(text) => out.push_str(&text.value),
                    Node::Element(element) => collect(&element.children, out),
                }
            }
        }
        let mut out = String::new();
        collect(&self.children, &mut out);
        out
    }
}

/// A text leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    pub value: String,
}

/// A parsed document: the root's ordered children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    pub children: Vec<Node>,
}

impl Tree {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_depth() {
        assert_eq!(Element::new("h1").heading_depth(), Some(1));
        assert_eq!(Element::new("h6").heading_depth(), Some(6));
        assert_eq!(Element::new("h7").heading_depth(), None);
        assert_eq!(Element::new("h0").heading_depth(), None);
        assert_eq!(Element::new("hr").heading_depth(), None);
        assert_eq!(Element::new("header").heading_depth(), None);
        assert_eq!(Element::new("p").heading_depth(), None);
    }

    #[test]
    fn test_properties_set_replaces_in_place() {
        let mut props = Properties::new();
        props.set("id", "one");
        props.set("class", PropertyValue::List(vec!["a".into()]));
        props.set("id", "two");

        assert_eq!(props.len(), 2);
        assert_eq!(props.get("id"), Some(&PropertyValue::Single("two".into())));
        // replaced entry keeps its original position
        let names: Vec<&str> = props.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["id", "class"]);
    }

    #[test]
    fn test_properties_get_missing() {
        let props = Properties::new();
        assert_eq!(props.get("id"), None);
        assert!(props.is_empty());
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let element = Element::with_children(
            "h2",
            vec![
                Node::text("Hello "),
                Element::with_children("em", vec![Node::text("brave")]).into(),
                Node::text(" world"),
            ],
        );
        assert_eq!(element.text_content(), "Hello brave world");
    }

    #[test]
    fn test_node_accessors() {
        let node = Node::text("hi");
        assert!(node.as_text().is_some());
        assert!(node.as_element().is_none());

        let node = Node::from(Element::new("p"));
        assert!(node.as_element().is_some());
        assert!(node.as_text().is_none());
    }
}
