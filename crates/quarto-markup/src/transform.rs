/*
 * transform.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Node transformer: document tree to template IR.
//!
//! Walks the parsed document once, collapsing whitespace at the edges of
//! text, splitting text and attribute values on marker tokens, and resolving
//! upper-case tag names to components.

use crate::ast::{Element, ElementName, Interpolated, Segment, TemplateNode};
use crate::error::{MarkupError, MarkupResult};
use crate::resolver::{ComponentResolver, ComponentScope};
use once_cell::sync::Lazy;
use quarto_xml::{XmlDocument, XmlElement, XmlNode, XmlText};
use regex::Regex;

static MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[\[(\d+)\]\]\]").unwrap());

static EDGE_WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+|\s+$").unwrap());

/// Replace the leading and trailing whitespace runs with a single space.
///
/// Interior whitespace is left alone, and text that is all whitespace
/// becomes `" "`.
pub fn collapse_whitespace(text: &str) -> String {
    EDGE_WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// Split text on marker tokens.
///
/// A marker whose index does not fit in `usize` is kept as literal text.
pub fn split_markers(text: &str) -> Interpolated {
    let mut segments: Vec<Segment> = Vec::new();
    let mut last = 0;
    let mut found_marker = false;

    for captures in MARKER_RE.captures_iter(text) {
        let (Some(whole), Some(digits)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let Ok(index) = digits.as_str().parse::<usize>() else {
            continue;
        };

        push_text(&mut segments, &text[last..whole.start()]);
        segments.push(Segment::Marker(index));
        last = whole.end();
        found_marker = true;
    }

    if !found_marker {
        return Interpolated::Text(text.to_string());
    }

    push_text(&mut segments, &text[last..]);

    match segments.as_slice() {
        [Segment::Marker(index)] => Interpolated::Marker(*index),
        _ => Interpolated::Mixed(segments),
    }
}

/// Append a text segment, skipping empty text and merging with a
/// preceding text segment.
fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Text(previous)) = segments.last_mut() {
        previous.push_str(text);
        return;
    }
    segments.push(Segment::Text(text.to_string()));
}

/// Transform a parsed document into template IR.
///
/// # Errors
///
/// - [`MarkupError::Syntax`] when the document carries an embedded error
///   node, has no root element, or has non-whitespace text outside the root
/// - [`MarkupError::NameResolution`] when an upper-case tag names no known
///   component
pub fn transform_document(
    document: &XmlDocument,
    scope: &ComponentScope,
) -> MarkupResult<TemplateNode> {
    check_embedded_error(document)?;

    for node in &document.children {
        match node {
            XmlNode::Text(text) if !text.content.trim().is_empty() => {
                return Err(MarkupError::Syntax {
                    message: "Text is not allowed outside the root element".to_string(),
                    span: Some(text.span.clone()),
                });
            }
            XmlNode::Error(error) => return Err(syntax_error(error)),
            _ => {}
        }
    }

    let root = document
        .root()
        .ok_or_else(|| MarkupError::syntax("Markup has no root element"))?;

    let transformer = Transformer { scope };
    let node = transformer.transform_element(root)?;

    tracing::debug!(
        root = %root.name,
        nodes = node.count_nodes(),
        "Transformed markup into template IR"
    );

    Ok(node)
}

/// Parsers that do not fail outright put their diagnostics in the first
/// child of the document or in that child's first child.
fn check_embedded_error(document: &XmlDocument) -> MarkupResult<()> {
    let Some(first) = document.first_child() else {
        return Ok(());
    };

    let embedded = first
        .as_error()
        .or_else(|| first.first_child().and_then(XmlNode::as_error));

    match embedded {
        Some(error) => Err(syntax_error(error)),
        None => Ok(()),
    }
}

fn syntax_error(error: &XmlText) -> MarkupError {
    MarkupError::Syntax {
        message: error.content.clone(),
        span: Some(error.span.clone()),
    }
}

struct Transformer<'a> {
    scope: &'a ComponentScope,
}

impl Transformer<'_> {
    fn transform_element(&self, element: &XmlElement) -> MarkupResult<TemplateNode> {
        let name = self.resolve_name(element)?;

        let attributes = element
            .attributes
            .iter()
            .map(|attribute| {
                let name = match &attribute.prefix {
                    Some(prefix) => format!("{}:{}", prefix, attribute.name),
                    None => attribute.name.clone(),
                };
                (name, split_markers(&attribute.value))
            })
            .collect();

        let mut children = Vec::new();
        for child in &element.children {
            match child {
                XmlNode::Element(child) => children.push(self.transform_element(child)?),
                XmlNode::Text(text) => {
                    children.extend(split_markers(&collapse_whitespace(&text.content)).into_nodes())
                }
                XmlNode::Comment(comment) => {
                    tracing::trace!(span = ?comment.span, "Dropping comment");
                }
                XmlNode::Error(error) => return Err(syntax_error(error)),
            }
        }

        Ok(TemplateNode::Element(Element {
            name,
            attributes,
            children,
        }))
    }

    fn resolve_name(&self, element: &XmlElement) -> MarkupResult<ElementName> {
        let is_component = element
            .name
            .chars()
            .next()
            .is_some_and(char::is_uppercase);

        if !is_component {
            return Ok(ElementName::Tag(element.name.clone()));
        }

        self.scope
            .resolve(&element.name)
            .map(ElementName::Component)
            .ok_or_else(|| MarkupError::NameResolution {
                name: element.name.clone(),
                span: Some(element.name_span.clone()),
            })
    }
}
