//! Raw node tree produced by the XML parser.

use std::ops::Range;

/// Byte range into the parsed source.
pub type Span = Range<usize>;

/// A parsed XML document.
///
/// Holds the top-level nodes in document order: the root element plus any
/// text or comments around it.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// Top-level nodes, in document order.
    pub children: Vec<XmlNode>,

    /// Span of the entire document.
    pub span: Span,
}

/// A node in the raw tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// An element with attributes and children.
    Element(XmlElement),

    /// Character data (after unescaping entities; CDATA is merged in).
    Text(XmlText),

    /// A comment, with the text between `<!--` and `-->`.
    Comment(XmlText),

    /// A parse failure reported in-band.
    ///
    /// The built-in parser reports errors through [`crate::Error`] instead,
    /// but tree producers that recover from errors mark the failure with one
    /// of these, carrying the diagnostic text.
    Error(XmlText),
}

/// An XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// The local name of the element (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any (e.g., "svg" in `<svg:rect>`).
    pub prefix: Option<String>,

    /// Span of the element name.
    pub name_span: Span,

    /// Attributes, in source order.
    pub attributes: Vec<XmlAttribute>,

    /// Child nodes, in document order.
    pub children: Vec<XmlNode>,

    /// Span from the start tag's `<` to the end of the end tag.
    pub span: Span,
}

/// An XML attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    /// The local name of the attribute (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any.
    pub prefix: Option<String>,

    /// The attribute value (after unescaping entities).
    pub value: String,
}

/// Text content with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlText {
    pub content: String,
    pub span: Span,
}

impl XmlDocument {
    pub fn new(children: Vec<XmlNode>, span: Span) -> Self {
        Self { children, span }
    }

    /// The first top-level element.
    pub fn root(&self) -> Option<&XmlElement> {
        self.children.iter().find_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// The first top-level node of any kind.
    pub fn first_child(&self) -> Option<&XmlNode> {
        self.children.first()
    }
}

impl XmlNode {
    /// Create a text node.
    pub fn text(content: impl Into<String>, span: Span) -> Self {
        XmlNode::Text(XmlText {
            content: content.into(),
            span,
        })
    }

    /// Create an in-band error node.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        XmlNode::Error(XmlText {
            content: message.into(),
            span,
        })
    }

    /// The first child of an element node; other kinds have no children.
    pub fn first_child(&self) -> Option<&XmlNode> {
        match self {
            XmlNode::Element(e) => e.children.first(),
            _ => None,
        }
    }

    /// The diagnostic text of an error node.
    pub fn as_error(&self) -> Option<&XmlText> {
        match self {
            XmlNode::Error(text) => Some(text),
            _ => None,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            XmlNode::Element(e) => &e.span,
            XmlNode::Text(t) | XmlNode::Comment(t) | XmlNode::Error(t) => &t.span,
        }
    }
}

impl XmlElement {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            name_span: span.clone(),
            attributes: Vec::new(),
            children: Vec::new(),
            span,
        }
    }

    /// Get an attribute value by name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Child elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Text(t) => Some(t.content.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl XmlAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_get_attribute() {
        let mut element = XmlElement::new("test", 0..10);
        element.attributes.push(XmlAttribute::new("name", "value"));

        assert_eq!(element.get_attribute("name"), Some("value"));
        assert_eq!(element.get_attribute("missing"), None);
    }

    #[test]
    fn test_document_root_skips_leading_text() {
        let doc = XmlDocument::new(
            vec![
                XmlNode::text("\n", 0..1),
                XmlNode::Element(XmlElement::new("root", 1..8)),
            ],
            0..8,
        );

        assert_eq!(doc.root().map(|r| r.name.as_str()), Some("root"));
        assert!(matches!(doc.first_child(), Some(XmlNode::Text(_))));
    }

    #[test]
    fn test_node_first_child_and_error() {
        let mut wrapper = XmlElement::new("wrapper", 0..20);
        wrapper.children.push(XmlNode::error("bad markup", 9..10));
        let node = XmlNode::Element(wrapper);

        let error = node.first_child().and_then(XmlNode::as_error).unwrap();
        assert_eq!(error.content, "bad markup");
        assert_eq!(node.span(), &(0..20));
    }

    #[test]
    fn test_element_text_and_elements() {
        let mut element = XmlElement::new("p", 0..20);
        element.children.push(XmlNode::text("Hello ", 3..9));
        element
            .children
            .push(XmlNode::Element(XmlElement::new("b", 9..16)));
        element.children.push(XmlNode::text("!", 16..17));

        assert_eq!(element.text(), "Hello !");
        assert_eq!(element.elements().count(), 1);
    }
}
