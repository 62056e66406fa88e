//! Order-preserving XML parsing for Quarto markup templates.
//!
//! This crate wraps [`quick-xml`] to produce a raw node tree where every
//! node keeps its position in the original source. Unlike a data-oriented
//! XML reader, it keeps mixed content in document order, keeps
//! whitespace-only text, and records comments, because markup templates
//! care about all of them.
//!
//! # Overview
//!
//! The main types are:
//! - [`XmlDocument`]: the parsed document, holding the top-level nodes
//! - [`XmlNode`]: an element, text, comment, or embedded error node
//! - [`XmlElement`]: an element with name, attributes, and children
//! - [`XmlAttribute`]: an attribute with its unescaped value
//!
//! # Example
//!
//! ```rust
//! use quarto_xml::{parse, XmlNode};
//!
//! let doc = parse(r#"<p class="note">Hello <b>world</b>!</p>"#).unwrap();
//! let root = doc.root().unwrap();
//!
//! assert_eq!(root.name, "p");
//! assert_eq!(root.get_attribute("class"), Some("note"));
//! assert_eq!(root.children.len(), 3);
//! assert!(matches!(&root.children[1], XmlNode::Element(b) if b.name == "b"));
//! ```
//!
//! # Errors
//!
//! Malformed input produces an [`Error`] carrying a byte offset when one is
//! known. [`Error::to_report`] renders it as a source snippet.

pub mod error;
pub mod parser;
pub mod types;

pub use error::{Error, Result, source_report};
pub use parser::parse;
pub use types::{Span, XmlAttribute, XmlDocument, XmlElement, XmlNode, XmlText};
