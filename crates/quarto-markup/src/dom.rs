/*
 * dom.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Live output tree.
//!
//! A small DOM-like node tree that the tree backend builds into. Nodes are
//! shared handles: cloning a [`Node`] clones the handle, not the subtree, so
//! a node produced by one render can be embedded as a substitution in
//! another. The embedded node is then aliased: it is a child of both trees,
//! and mutating it through either one changes both.
//!
//! Fragments are transparent grouping nodes. Appending a fragment to another
//! fragment moves its children across (the source fragment is left empty);
//! appending a fragment to an element keeps it as a single child.
//! Serialization renders fragments as their children.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// The kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Fragment,
}

#[derive(Debug)]
enum NodeData {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Node>,
    },
    Text(String),
    Fragment {
        children: Vec<Node>,
    },
}

/// A handle to a node in a live output tree.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

impl Node {
    fn from_data(data: NodeData) -> Self {
        Node(Rc::new(RefCell::new(data)))
    }

    /// Create an element with the given tag name.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::from_data(NodeData::Element {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        })
    }

    /// Create a leaf text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::from_data(NodeData::Text(content.into()))
    }

    /// Create an empty fragment.
    pub fn fragment() -> Self {
        Self::from_data(NodeData::Fragment {
            children: Vec::new(),
        })
    }

    pub fn kind(&self) -> NodeKind {
        match &*self.0.borrow() {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Fragment { .. } => NodeKind::Fragment,
        }
    }

    /// The tag name of an element node.
    pub fn tag_name(&self) -> Option<String> {
        match &*self.0.borrow() {
            NodeData::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        }
    }

    /// Set an attribute on an element node.
    ///
    /// An existing attribute keeps its position and gets the new value.
    /// Has no effect on text and fragment nodes.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        if let NodeData::Element { attributes, .. } = &mut *self.0.borrow_mut() {
            let name = name.into();
            let value = value.into();
            match attributes.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value,
                None => attributes.push((name, value)),
            }
        }
    }

    /// Get an attribute value of an element node.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match &*self.0.borrow() {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(existing, _)| existing == name)
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    /// All attributes of an element node, in insertion order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        match &*self.0.borrow() {
            NodeData::Element { attributes, .. } => attributes.clone(),
            _ => Vec::new(),
        }
    }

    /// Append a child.
    ///
    /// Appending a fragment to a fragment moves the source fragment's
    /// children. Text nodes cannot have children; appending to one, or
    /// appending a node to itself, has no effect.
    pub fn append_child(&self, child: Node) {
        if self.ptr_eq(&child) {
            return;
        }

        let merge = self.kind() == NodeKind::Fragment && child.kind() == NodeKind::Fragment;
        let incoming = if merge {
            match &mut *child.0.borrow_mut() {
                NodeData::Fragment { children } => std::mem::take(children),
                _ => Vec::new(),
            }
        } else {
            vec![child]
        };

        match &mut *self.0.borrow_mut() {
            NodeData::Element { children, .. } | NodeData::Fragment { children } => {
                children.extend(incoming)
            }
            NodeData::Text(_) => {}
        }
    }

    /// Child handles, in order.
    pub fn children(&self) -> Vec<Node> {
        match &*self.0.borrow() {
            NodeData::Element { children, .. } | NodeData::Fragment { children } => {
                children.clone()
            }
            NodeData::Text(_) => Vec::new(),
        }
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        match &*self.0.borrow() {
            NodeData::Text(content) => content.clone(),
            NodeData::Element { children, .. } | NodeData::Fragment { children } => {
                children.iter().map(Node::text_content).collect()
            }
        }
    }

    /// Serialize this node as markup.
    ///
    /// Attributes appear in insertion order; nothing is escaped.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        match &*self.0.borrow() {
            NodeData::Text(content) => out.push_str(content),
            NodeData::Fragment { children } => {
                for child in children {
                    child.write_markup(out);
                }
            }
            NodeData::Element {
                tag,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(value);
                    out.push('"');
                }
                out.push('>');
                for child in children {
                    child.write_markup(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind(), self.to_markup())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}
