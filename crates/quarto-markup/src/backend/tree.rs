/*
 * backend/tree.rs
 * Copyright (c) 2025 Posit, PBC
 */

use super::Backend;
use crate::dom::{Node, NodeKind};
use crate::value::{Attributes, Value};

/// Backend that builds a live node tree.
///
/// Node substitutions are inserted as-is, so a tree produced by one render
/// can be embedded in another. The inserted handle is shared, not copied:
/// an element substituted into two renders is a child of both trees, and
/// mutating it through one tree is visible in the other. A fragment
/// substitution is re-wrapped in a fresh fragment holding the same child
/// handles, so merging it into the surrounding children never empties the
/// caller's fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBackend;

impl Backend for TreeBackend {
    type Output = Node;

    fn render_text(&self, text: &str) -> Node {
        Node::text(text)
    }

    fn render_substitution(&self, value: Value) -> Node {
        match value {
            Value::Node(node) if node.kind() == NodeKind::Fragment => {
                let fragment = Node::fragment();
                for child in node.children() {
                    fragment.append_child(child);
                }
                fragment
            }
            Value::Node(node) => node,
            Value::List(items) => {
                let fragment = Node::fragment();
                for item in items {
                    fragment.append_child(self.render_substitution(item));
                }
                fragment
            }
            other => Node::text(other.to_text()),
        }
    }

    fn render_element(&self, tag: &str, attributes: &Attributes, children: Node) -> Node {
        let element = Node::element(tag);
        for (name, value) in attributes {
            element.set_attribute(name.as_str(), value.to_text());
        }
        element.append_child(children);
        element
    }

    fn finalize_children(&self, children: Vec<Node>) -> Node {
        let fragment = Node::fragment();
        for child in children {
            fragment.append_child(child);
        }
        fragment
    }

    fn output_to_value(&self, output: Node) -> Value {
        Value::Node(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_node_substitution_passes_through() {
        let node = Node::element("span");
        let out = TreeBackend.render_substitution(Value::from(node.clone()));
        assert!(out.ptr_eq(&node));
    }

    #[test]
    fn test_fragment_substitution_leaves_source_intact() {
        let source = Node::fragment();
        source.append_child(Node::text("a"));
        source.append_child(Node::text("b"));

        let first = TreeBackend.finalize_children(vec![
            TreeBackend.render_substitution(Value::from(source.clone())),
        ]);
        let second = TreeBackend.finalize_children(vec![
            TreeBackend.render_substitution(Value::from(source.clone())),
        ]);

        assert_eq!(source.children().len(), 2);
        assert_eq!(first.to_markup(), "ab");
        assert_eq!(second.to_markup(), "ab");
        assert!(first.children()[0].ptr_eq(&source.children()[0]));
    }

    #[test]
    fn test_element_substitution_is_shared_between_trees() {
        let badge = Node::element("b");
        let first = TreeBackend.render_element(
            "p",
            &Attributes::new(),
            TreeBackend.render_substitution(Value::from(badge.clone())),
        );
        let second = TreeBackend.render_element(
            "p",
            &Attributes::new(),
            TreeBackend.render_substitution(Value::from(badge.clone())),
        );

        badge.append_child(Node::text("new"));
        assert_eq!(first.to_markup(), "<p><b>new</b></p>");
        assert_eq!(second.to_markup(), "<p><b>new</b></p>");
    }

    #[test]
    fn test_list_substitution_becomes_fragment() {
        let out = TreeBackend.render_substitution(Value::from(vec![
            Value::from("a"),
            Value::from(Node::element("br")),
        ]));

        assert_eq!(out.kind(), NodeKind::Fragment);
        assert_eq!(out.children().len(), 2);
        assert_eq!(out.to_markup(), "a<br></br>");
    }

    #[test]
    fn test_scalar_substitution_becomes_text() {
        let out = TreeBackend.render_substitution(Value::from(2.5));
        assert_eq!(out.kind(), NodeKind::Text);
        assert_eq!(out.text_content(), "2.5");
    }

    #[test]
    fn test_render_element_sets_attributes_and_children() {
        let mut attributes = Attributes::new();
        attributes.insert("class".to_string(), Value::from("note"));
        attributes.insert("hidden".to_string(), Value::from(false));

        let children = TreeBackend.finalize_children(vec![Node::text("a"), Node::text("b")]);
        let el = TreeBackend.render_element("p", &attributes, children);

        assert_eq!(el.tag_name().as_deref(), Some("p"));
        assert_eq!(el.attribute("hidden").as_deref(), Some("false"));
        assert_eq!(el.to_markup(), r#"<p class="note" hidden="false">ab</p>"#);
    }

    #[test]
    fn test_finalize_merges_nested_fragments() {
        let inner = TreeBackend.finalize_children(vec![Node::text("x"), Node::text("y")]);
        let outer = TreeBackend.finalize_children(vec![Node::text("w"), inner]);

        assert_eq!(outer.children().len(), 3);
        assert_eq!(outer.text_content(), "wxy");
    }
}
