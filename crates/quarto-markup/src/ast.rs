/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template IR types.
//!
//! The IR is what parsing produces and what the cache stores. It does not
//! depend on substitution values: markers only record the index of the slot
//! they stand for, so a single IR can be rendered any number of times.
//!
//! The tree is strictly owned; every node's children belong to it alone.

use crate::error::RenderResult;
use crate::value::{Props, Value};
use std::fmt;
use std::rc::Rc;

/// A node in the template IR.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Literal text.
    Text(String),

    /// A substitution slot, by index into the substitution array.
    Marker(usize),

    /// An element or component invocation.
    Element(Element),
}

/// An element node.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name or resolved component.
    pub name: ElementName,

    /// Attributes in source order, each split into text and markers.
    pub attributes: Vec<(String, Interpolated)>,

    /// Child nodes; text parts are spliced in at this level.
    pub children: Vec<TemplateNode>,
}

/// What an element refers to, decided once at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementName {
    /// A literal tag name, used verbatim.
    Tag(String),

    /// A component resolved from an upper-case tag name.
    Component(Component),
}

/// One piece of interpolated content.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Marker(usize),
}

/// Text content split on marker tokens.
///
/// The collapsed shapes mirror what the splitter can find: plain text, a
/// lone marker (so a substitution can pass through untouched), or a mix.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpolated {
    /// No markers.
    Text(String),

    /// Exactly one marker and nothing else.
    Marker(usize),

    /// Text and markers interleaved; never contains empty text.
    Mixed(Vec<Segment>),
}

impl Interpolated {
    /// Splice into a children sequence, dropping empty text.
    pub fn into_nodes(self) -> Vec<TemplateNode> {
        match self {
            Interpolated::Text(text) if text.is_empty() => Vec::new(),
            Interpolated::Text(text) => vec![TemplateNode::Text(text)],
            Interpolated::Marker(index) => vec![TemplateNode::Marker(index)],
            Interpolated::Mixed(segments) => segments
                .into_iter()
                .map(|segment| match segment {
                    Segment::Text(text) => TemplateNode::Text(text),
                    Segment::Marker(index) => TemplateNode::Marker(index),
                })
                .collect(),
        }
    }
}

impl TemplateNode {
    /// Number of nodes in this subtree, including this one.
    pub fn count_nodes(&self) -> usize {
        match self {
            TemplateNode::Element(element) => {
                1 + element
                    .children
                    .iter()
                    .map(TemplateNode::count_nodes)
                    .sum::<usize>()
            }
            _ => 1,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            TemplateNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl Element {
    /// Create a literal-tag element with no attributes or children.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            name: ElementName::Tag(name.into()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Interpolated> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }
}

impl fmt::Display for ElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementName::Tag(tag) => f.write_str(tag),
            ElementName::Component(component) => f.write_str(component.name()),
        }
    }
}

type ComponentFn = dyn Fn(Props) -> RenderResult<Value>;

/// A callable that renders a component element.
///
/// Components receive the resolved attributes plus the composed children
/// and return the final value for their position. Returning a
/// [`Value::Pending`] makes the position pending.
#[derive(Clone)]
pub struct Component {
    name: Rc<str>,
    func: Rc<ComponentFn>,
}

impl Component {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Props) -> RenderResult<Value> + 'static,
    {
        let name: String = name.into();
        Self {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, props: Props) -> RenderResult<Value> {
        (self.func)(props)
    }
}

/// Components are equal when they share the same callable.
impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.name)
    }
}
