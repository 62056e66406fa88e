/*
 * backend/text.rs
 * Copyright (c) 2025 Posit, PBC
 */

use super::Backend;
use crate::value::{Attributes, Value};

/// Backend that renders to a markup string.
///
/// Attributes appear in map order. Nothing is escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend;

impl Backend for TextBackend {
    type Output = String;

    fn render_text(&self, text: &str) -> String {
        text.to_string()
    }

    fn render_substitution(&self, value: Value) -> String {
        value.to_text()
    }

    fn render_element(&self, tag: &str, attributes: &Attributes, children: String) -> String {
        let mut out = String::with_capacity(tag.len() * 2 + children.len() + 5);
        out.push('<');
        out.push_str(tag);
        for (name, value) in attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&value.to_text());
            out.push('"');
        }
        out.push('>');
        out.push_str(&children);
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
        out
    }

    fn finalize_children(&self, children: Vec<String>) -> String {
        children.concat()
    }

    fn output_to_value(&self, output: String) -> Value {
        Value::Text(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Pending;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_element() {
        let mut attributes = Attributes::new();
        attributes.insert("id".to_string(), Value::from("main"));
        attributes.insert("data-n".to_string(), Value::from(3));

        let out = TextBackend.render_element("div", &attributes, "hi".to_string());
        assert_eq!(out, r#"<div id="main" data-n="3">hi</div>"#);
    }

    #[test]
    fn test_empty_element_has_end_tag() {
        let out = TextBackend.render_element("br", &Attributes::new(), String::new());
        assert_eq!(out, "<br></br>");
    }

    #[test]
    fn test_substitutions_use_text_form() {
        assert_eq!(TextBackend.render_substitution(Value::Null), "");
        assert_eq!(TextBackend.render_substitution(Value::from(vec![1, 2])), "12");
        assert_eq!(
            TextBackend.render_substitution(Pending::resolved("x").into()),
            "[pending value]"
        );
    }

    #[test]
    fn test_finalize_concatenates() {
        let out = TextBackend.finalize_children(vec!["a".to_string(), "<b></b>".to_string()]);
        assert_eq!(out, "a<b></b>");
        assert_eq!(TextBackend.output_to_value(out), Value::from("a<b></b>"));
    }
}
