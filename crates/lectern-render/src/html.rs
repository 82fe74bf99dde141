//! HTML serialization of a post-processed tree.

use std::fmt::Write;

use crate::tree::{Element, Node, PropertyValue, Text, Tree};

/// Elements serialized without a closing tag.
const VOID_TAGS: [&str; 4] = ["br", "hr", "img", "input"];

pub struct HtmlWriter<W: Write> {
    writer: W,
}

impl<W: Write> HtmlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_tree(&mut self, tree: &Tree) -> Result<(), std::fmt::Error> {
        for child in &tree.children {
            self.write_node(child)?;
        }
        Ok(())
    }

    pub fn write_node(&mut self, node: &Node) -> Result<(), std::fmt::Error> {
        match node {
            Node::Element(element) => self.write_element(element),
            Node::Text(text) => self.write_text(text),
        }
    }

    fn write_element(&mut self, element: &Element) -> Result<(), std::fmt::Error> {
        write!(self.writer, "<{}", element.tag_name)?;
        for (name, value) in element.properties.iter() {
            write!(self.writer, " {}=\"", name)?;
            match value {
                PropertyValue::Single(value) => self.write_attribute(value)?,
                PropertyValue::List(items) => {
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            self.writer.write_char(' ')?;
                        }
                        self.write_attribute(item)?;
                    }
                }
            }
            self.writer.write_char('"')?;
        }
        if VOID_TAGS.contains(&element.tag_name.as_str()) {
            return self.writer.write_str(" />");
        }
        self.writer.write_char('>')?;
        for child in &element.children {
            self.write_node(child)?;
        }
        write!(self.writer, "</{}>", element.tag_name)
    }

    fn write_text(&mut self, text: &Text) -> Result<(), std::fmt::Error> {
        for c in text.value.chars() {
            match c {
                '&' => self.writer.write_str("&amp;")?,
                '<' => self.writer.write_str("&lt;")?,
                '>' => self.writer.write_str("&gt;")?,
                _ => self.writer.write_char(c)?,
            }
        }
        Ok(())
    }

    fn write_attribute(&mut self, value: &str) -> Result<(), std::fmt::Error> {
        for c in value.chars() {
            match c {
                '&' => self.writer.write_str("&amp;")?,
                '<' => self.writer.write_str("&lt;")?,
                '>' => self.writer.write_str("&gt;")?,
                '"' => self.writer.write_str("&quot;")?,
                _ => self.writer.write_char(c)?,
            }
        }
        Ok(())
    }
}

pub fn tree_to_html(tree: &Tree) -> Result<String, std::fmt::Error> {
    let mut output = HtmlWriter::new(String::new());
    output.write_tree(tree)?;
    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::tree::PropertyValue;

    fn render(tree: &Tree) -> String {
        tree_to_html(tree).unwrap()
    }

    #[test]
    fn test_simple_paragraph() {
        let tree = Tree::new(vec![
            Element::with_children("p", vec![Node::text("hello")]).into(),
        ]);
        assert_snapshot!(render(&tree), @"<p>hello</p>");
    }

    #[test]
    fn test_text_escaping() {
        let tree = Tree::new(vec![
            Element::with_children("p", vec![Node::text("a < b && b > c")]).into(),
        ]);
        assert_snapshot!(render(&tree), @"<p>a &lt; b &amp;&amp; b &gt; c</p>");
    }

    #[test]
    fn test_attribute_escaping() {
        let mut link = Element::with_children("a", vec![Node::text("here")]);
        link.properties.set("href", "/?q=\"x\"&y=<z>");
        let tree = Tree::new(vec![link.into()]);
        assert_snapshot!(
            render(&tree),
            @r#"<a href="/?q=&quot;x&quot;&amp;y=&lt;z&gt;">here</a>"#
        );
    }

    #[test]
    fn test_void_elements_self_close() {
        let tree = Tree::new(vec![
            Element::with_children(
                "p",
                vec![Node::text("a"), Element::new("br").into(), Node::text("b")],
            )
            .into(),
            Element::new("hr").into(),
        ]);
        assert_snapshot!(render(&tree), @"<p>a<br />b</p><hr />");
    }

    #[test]
    fn test_list_attribute_joined_with_spaces() {
        let mut heading = Element::with_children("h2", vec![Node::text("t")]);
        heading
            .properties
            .set("class", PropertyValue::List(vec!["a".into(), "b".into()]));
        let tree = Tree::new(vec![heading.into()]);
        assert_snapshot!(render(&tree), @r#"<h2 class="a b">t</h2>"#);
    }

    #[test]
    fn test_nested_structure() {
        let mut heading = Element::with_children("h1", vec![Node::text("Title")]);
        heading.properties.set("id", "user-content-title");
        let em = Element::with_children("em", vec![Node::text("fine")]);
        let tree = Tree::new(vec![
            heading.into(),
            Element::with_children("p", vec![Node::text("all "), em.into()]).into(),
        ]);
        assert_snapshot!(
            render(&tree),
            @r#"<h1 id="user-content-title">Title</h1><p>all <em>fine</em></p>"#
        );
    }
}
