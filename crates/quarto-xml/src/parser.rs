//! XML parser that builds [`XmlDocument`] trees.

use crate::{Error, Result, Span, XmlAttribute, XmlDocument, XmlElement, XmlNode, XmlText};
use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

/// Parse XML from a string, producing an [`XmlDocument`].
///
/// The document must contain exactly one root element. Text and comments
/// around it are kept as top-level nodes.
///
/// # Example
///
/// ```rust
/// use quarto_xml::parse;
///
/// let doc = parse("<root><child/></root>").unwrap();
/// assert_eq!(doc.root().unwrap().name, "root");
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed, empty, or has several roots.
pub fn parse(content: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(content);
    parser.parse()
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The source content being parsed.
    source: &'a str,

    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Stack of elements being built.
    stack: Vec<BuildNode>,

    /// Top-level nodes accumulated so far.
    top_level: Vec<XmlNode>,

    /// Whether a root element has been closed.
    has_root: bool,
}

/// An element being constructed during parsing.
struct BuildNode {
    name: String,
    prefix: Option<String>,
    name_span: Span,
    attributes: Vec<XmlAttribute>,

    /// Byte offset of the `<` that opened this element.
    start_offset: usize,

    children: Vec<XmlNode>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        // Markup templates need every whitespace run, including those
        // between elements.
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            source,
            reader,
            stack: Vec::new(),
            top_level: Vec::new(),
            has_root: false,
        }
    }

    fn parse(&mut self) -> Result<XmlDocument> {
        loop {
            // Capture position before reading the event
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => self.handle_start(&e, event_start)?,
                Ok(Event::End(e)) => {
                    let element = self.handle_end(&e)?;
                    self.push_element(element)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.handle_empty(&e, event_start)?;
                    self.push_element(element)?;
                }
                Ok(Event::Text(e)) => self.handle_text(&e, event_start)?,
                Ok(Event::CData(e)) => self.handle_cdata(&e, event_start),
                Ok(Event::Comment(e)) => self.handle_comment(&e, event_start),
                Ok(Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {
                    // Processing instructions and declarations carry no content
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position() as usize),
                    });
                }
            }
        }

        // Check for unclosed elements
        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", node.name),
                span: Some(node.name_span.clone()),
            });
        }

        if !self.has_root {
            return Err(Error::EmptyDocument);
        }

        Ok(XmlDocument::new(
            std::mem::take(&mut self.top_level),
            0..self.source.len(),
        ))
    }

    fn push_element(&mut self, element: XmlElement) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(XmlNode::Element(element)),
            None => {
                if self.has_root {
                    return Err(Error::MultipleRoots {
                        span: Some(element.span.clone()),
                    });
                }
                self.has_root = true;
                self.top_level.push(XmlNode::Element(element));
            }
        }
        Ok(())
    }

    /// Append text to the current container, merging with a preceding text node.
    fn push_text(&mut self, content: String, span: Span) {
        let children = match self.stack.last_mut() {
            Some(node) => &mut node.children,
            None => &mut self.top_level,
        };

        if let Some(XmlNode::Text(previous)) = children.last_mut() {
            previous.content.push_str(&content);
            previous.span.end = span.end;
            return;
        }

        children.push(XmlNode::Text(XmlText { content, span }));
    }

    fn handle_start(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<()> {
        let (name, prefix) = split_name(e.name().as_ref());
        let name_start = event_start + 1; // Skip '<'
        let name_span = name_start..name_start + e.name().as_ref().len();

        let attributes = self.parse_attributes(e, event_start)?;

        self.stack.push(BuildNode {
            name,
            prefix,
            name_span,
            attributes,
            start_offset: event_start,
            children: Vec::new(),
        });

        Ok(())
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>) -> Result<XmlElement> {
        let (end_local_name, _) = split_name(e.name().as_ref());

        let node = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!("Unexpected closing tag </{}>", end_local_name),
            span: None,
        })?;

        // quick-xml already checks end names; this guards prefix mismatches
        if node.name != end_local_name {
            return Err(Error::MismatchedEndTag {
                expected: node.name,
                found: end_local_name,
                span: Some(node.name_span),
            });
        }

        let end_offset = self.reader.buffer_position() as usize;

        Ok(XmlElement {
            name: node.name,
            prefix: node.prefix,
            name_span: node.name_span,
            attributes: node.attributes,
            children: node.children,
            span: node.start_offset..end_offset,
        })
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<XmlElement> {
        let (name, prefix) = split_name(e.name().as_ref());
        let name_start = event_start + 1;
        let name_span = name_start..name_start + e.name().as_ref().len();

        let attributes = self.parse_attributes(e, event_start)?;
        let end_offset = self.reader.buffer_position() as usize;

        Ok(XmlElement {
            name,
            prefix,
            name_span,
            attributes,
            children: Vec::new(),
            span: event_start..end_offset,
        })
    }

    fn handle_text(&mut self, e: &BytesText<'_>, event_start: usize) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(event_start),
        })?;

        let end_offset = self.reader.buffer_position() as usize;
        self.push_text(text.into_owned(), event_start..end_offset);
        Ok(())
    }

    fn handle_cdata(&mut self, e: &BytesCData<'_>, event_start: usize) {
        let text = String::from_utf8_lossy(e.as_ref()).into_owned();
        let end_offset = self.reader.buffer_position() as usize;
        self.push_text(text, event_start..end_offset);
    }

    fn handle_comment(&mut self, e: &BytesText<'_>, event_start: usize) {
        let content = String::from_utf8_lossy(e).into_owned();
        let end_offset = self.reader.buffer_position() as usize;
        let comment = XmlNode::Comment(XmlText {
            content,
            span: event_start..end_offset,
        });

        match self.stack.last_mut() {
            Some(node) => node.children.push(comment),
            None => self.top_level.push(comment),
        }
    }

    fn parse_attributes(&self, e: &BytesStart<'_>, tag_start: usize) -> Result<Vec<XmlAttribute>> {
        let mut attributes = Vec::new();

        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|err| Error::XmlSyntax {
                message: format!("Attribute error: {}", err),
                position: Some(tag_start),
            })?;

            let (name, prefix) = split_name(attr.key.as_ref());

            let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                position: Some(tag_start),
            })?;

            attributes.push(XmlAttribute {
                name,
                prefix,
                value: value.into_owned(),
            });
        }

        Ok(attributes)
    }
}

/// Split a qualified name into its local name and optional prefix.
fn split_name(raw: &[u8]) -> (String, Option<String>) {
    let full_name = String::from_utf8_lossy(raw);

    if let Some((prefix, local)) = full_name.split_once(':') {
        return (local.to_string(), Some(prefix.to_string()));
    }
    (full_name.into_owned(), None)
}
