/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The markup parser seam.
//!
//! The engine does not parse XML itself. It asks a [`MarkupParser`] for a
//! document tree and hands that tree to the node transformer. The default
//! implementation wraps [`quarto_xml::parse`].

use crate::ast::TemplateNode;
use crate::error::MarkupResult;
use crate::resolver::ComponentScope;
use crate::transform::transform_document;
use quarto_xml::XmlDocument;

/// Turns markup text into a document tree.
///
/// Implementations report malformed input either by returning an error or
/// by embedding an [`XmlNode::Error`](quarto_xml::XmlNode::Error) in the
/// document; the transformer checks for both.
pub trait MarkupParser {
    fn parse(&self, text: &str) -> MarkupResult<XmlDocument>;
}

/// The default parser, backed by `quarto-xml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlMarkupParser;

impl MarkupParser for XmlMarkupParser {
    fn parse(&self, text: &str) -> MarkupResult<XmlDocument> {
        Ok(quarto_xml::parse(text)?)
    }
}

/// Parse markup text and transform it into IR.
pub fn parse_markup(
    text: &str,
    scope: &ComponentScope,
    parser: &dyn MarkupParser,
) -> MarkupResult<TemplateNode> {
    let document = parser.parse(text)?;
    transform_document(&document, scope)
}
