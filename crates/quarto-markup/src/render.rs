/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Render engine: template IR plus substitutions to backend output.
//!
//! The walk is synchronous until a pending value appears in a child
//! position. From there only the enclosing sibling groups become pending;
//! everything else is still composed eagerly.
//!
//! Attributes are always resolved synchronously through the
//! [`TextBackend`]. A pending value in an attribute is never awaited and
//! renders as its placeholder text.

use crate::ast::{Element, ElementName, Interpolated, Segment, TemplateNode};
use crate::backend::{Backend, TextBackend};
use crate::error::{RenderError, RenderResult};
use crate::rendered::Rendered;
use crate::value::{Attributes, Props, Value};
use futures::future::FutureExt;

/// Render a template node with the given substitutions.
///
/// # Errors
///
/// Returns [`RenderError::SubstitutionOutOfRange`] if a marker refers past
/// the end of `values`, or the error of a failing component. Failures of
/// pending values surface when the returned [`Rendered`] is resolved.
pub fn render<B: Backend>(
    node: &TemplateNode,
    values: &[Value],
    backend: &B,
) -> RenderResult<Rendered<B::Output>> {
    match node {
        TemplateNode::Text(text) => Ok(Rendered::Ready(backend.render_text(text))),
        TemplateNode::Marker(index) => {
            let value = substitution(values, *index)?.clone();
            Ok(render_value(value, backend))
        }
        TemplateNode::Element(element) => render_element(element, values, backend),
    }
}

/// Render a substitution value, waiting for it first if it is pending.
pub fn render_value<B: Backend>(value: Value, backend: &B) -> Rendered<B::Output> {
    if !value.has_pending() {
        return Rendered::Ready(backend.render_substitution(value));
    }

    let backend = backend.clone();
    Rendered::Pending(
        async move {
            let value = value.settle().await?;
            Ok(backend.render_substitution(value))
        }
        .boxed_local(),
    )
}

fn render_element<B: Backend>(
    element: &Element,
    values: &[Value],
    backend: &B,
) -> RenderResult<Rendered<B::Output>> {
    let attributes = resolve_attributes(&element.attributes, values)?;

    let children = element
        .children
        .iter()
        .map(|child| render(child, values, backend))
        .collect::<RenderResult<Vec<_>>>()?;

    tracing::trace!(
        element = %element.name,
        attributes = attributes.len(),
        children = children.len(),
        "Rendering element"
    );

    let name = element.name.clone();
    let backend = backend.clone();

    Rendered::join_all(children).and_then(move |outputs| {
        let composed = backend.finalize_children(outputs);
        match name {
            ElementName::Tag(tag) => Ok(Rendered::Ready(backend.render_element(
                &tag,
                &attributes,
                composed,
            ))),
            ElementName::Component(component) => {
                let props = Props {
                    attributes,
                    children: backend.output_to_value(composed),
                };
                let value = component.call(props)?;
                Ok(render_value(value, &backend))
            }
        }
    })
}

/// Resolve an element's attributes against the substitutions.
///
/// - Plain text stays text.
/// - A lone marker passes its value through unchanged, so components can
///   receive structured values. Pending values become placeholder text.
/// - Mixed text and markers concatenate the text forms.
pub fn resolve_attributes(
    attributes: &[(String, Interpolated)],
    values: &[Value],
) -> RenderResult<Attributes> {
    let mut resolved = Attributes::new();

    for (name, value) in attributes {
        let value = match value {
            Interpolated::Text(text) => Value::Text(text.clone()),
            Interpolated::Marker(index) => match substitution(values, *index)? {
                pending @ Value::Pending(_) => {
                    Value::Text(TextBackend.render_substitution(pending.clone()))
                }
                other => other.clone(),
            },
            Interpolated::Mixed(segments) => Value::Text(
                segments
                    .iter()
                    .map(|segment| match segment {
                        Segment::Text(text) => Ok(TextBackend.render_text(text)),
                        Segment::Marker(index) => Ok(TextBackend
                            .render_substitution(substitution(values, *index)?.clone())),
                    })
                    .collect::<RenderResult<String>>()?,
            ),
        };
        resolved.insert(name.clone(), value);
    }

    Ok(resolved)
}

fn substitution(values: &[Value], index: usize) -> RenderResult<&Value> {
    values
        .get(index)
        .ok_or(RenderError::SubstitutionOutOfRange {
            index,
            len: values.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Component;
    use crate::backend::TreeBackend;
    use crate::dom::Node;
    use crate::value::{PENDING_TEXT, Pending};
    use pretty_assertions::assert_eq;

    fn element(name: &str, children: Vec<TemplateNode>) -> TemplateNode {
        let mut element = Element::tag(name);
        element.children = children;
        TemplateNode::Element(element)
    }

    fn text(s: &str) -> TemplateNode {
        TemplateNode::Text(s.to_string())
    }

    fn render_text_ready(node: &TemplateNode, values: &[Value]) -> String {
        render(node, values, &TextBackend)
            .unwrap()
            .into_ready()
            .expect("render should be synchronous")
    }

    #[test]
    fn test_text_and_markers() {
        let node = element("p", vec![text("Hi "), TemplateNode::Marker(0), text("!")]);
        assert_eq!(render_text_ready(&node, &[Value::from("Ada")]), "<p>Hi Ada!</p>");
    }

    #[test]
    fn test_out_of_range_marker() {
        let node = element("p", vec![TemplateNode::Marker(2)]);
        let err = render(&node, &[Value::Null], &TextBackend).unwrap_err();
        assert_eq!(err, RenderError::SubstitutionOutOfRange { index: 2, len: 1 });
    }

    #[test]
    fn test_pending_child_makes_result_pending() {
        let node = element(
            "p",
            vec![text("a"), TemplateNode::Marker(0), TemplateNode::Marker(1)],
        );
        let values = [Value::from(Pending::resolved("b")), Value::from("c")];

        let rendered = render(&node, &values, &TextBackend).unwrap();
        assert!(rendered.is_pending());
        assert_eq!(pollster::block_on(rendered.resolve()).unwrap(), "<p>abc</p>");
    }

    #[test]
    fn test_pending_items_in_list_are_settled() {
        let node = element("p", vec![TemplateNode::Marker(0)]);
        let values = [Value::List(vec![Value::from("x"), Value::from(Pending::resolved("y"))])];

        let rendered = render(&node, &values, &TextBackend).unwrap();
        assert_eq!(pollster::block_on(rendered.resolve()).unwrap(), "<p>xy</p>");
    }

    #[test]
    fn test_rejected_child_fails_the_group() {
        let node = element("p", vec![TemplateNode::Marker(0), TemplateNode::Marker(1)]);
        let values = [Value::from("ok"), Pending::rejected("lost").into()];

        let rendered = render(&node, &values, &TextBackend).unwrap();
        assert_eq!(
            pollster::block_on(rendered.resolve()),
            Err(RenderError::rejected("lost"))
        );
    }

    #[test]
    fn test_attribute_resolution() {
        let attributes = vec![
            ("id".to_string(), Interpolated::Text("main".to_string())),
            ("data".to_string(), Interpolated::Marker(0)),
            ("later".to_string(), Interpolated::Marker(1)),
            (
                "class".to_string(),
                Interpolated::Mixed(vec![
                    Segment::Text("btn-".to_string()),
                    Segment::Marker(2),
                ]),
            ),
        ];
        let values = [
            Value::from(vec![1, 2]),
            Value::from(Pending::resolved("never")),
            Value::from(true),
        ];

        let resolved = resolve_attributes(&attributes, &values).unwrap();

        assert_eq!(resolved.get("id"), Some(&Value::from("main")));
        assert_eq!(resolved.get("data"), Some(&Value::from(vec![1, 2])));
        assert_eq!(resolved.get("later"), Some(&Value::from(PENDING_TEXT)));
        assert_eq!(resolved.get("class"), Some(&Value::from("btn-true")));
        assert_eq!(
            resolved.keys().cloned().collect::<Vec<_>>(),
            vec!["id", "data", "later", "class"]
        );
    }

    #[test]
    fn test_pending_attribute_does_not_suspend() {
        let mut el = Element::tag("a");
        el.attributes
            .push(("href".to_string(), Interpolated::Marker(0)));
        let node = TemplateNode::Element(el);

        let out = render_text_ready(&node, &[Value::from(Pending::resolved("/x"))]);
        assert_eq!(out, r#"<a href="[pending value]"></a>"#);
    }

    #[test]
    fn test_component_receives_attributes_and_children() {
        let card = Component::new("Card", |props: Props| {
            Ok(Value::from(format!(
                "[{}|{}]",
                props.text("title"),
                props.children.to_text()
            )))
        });

        let mut el = Element {
            name: ElementName::Component(card),
            attributes: vec![("title".to_string(), Interpolated::Marker(0))],
            children: vec![text("body "), TemplateNode::Marker(1)],
        };
        el.children.push(element("b", vec![text("!")]));
        let node = element("div", vec![TemplateNode::Element(el)]);

        let values = [Value::from("T"), Value::from(7)];
        assert_eq!(
            render_text_ready(&node, &values),
            "<div>[T|body 7<b>!</b>]</div>"
        );
    }

    #[test]
    fn test_component_node_result_passes_through_tree_backend() {
        let made = Node::element("section");
        let returned = made.clone();
        let component = Component::new("Section", move |_| Ok(Value::from(returned.clone())));

        let node = TemplateNode::Element(Element {
            name: ElementName::Component(component),
            attributes: Vec::new(),
            children: Vec::new(),
        });

        let out = render(&node, &[], &TreeBackend).unwrap().into_ready().unwrap();
        assert!(out.ptr_eq(&made));
    }

    #[test]
    fn test_component_pending_result() {
        let component = Component::new("Later", |_| Ok(Pending::resolved("done").into()));
        let node = element(
            "p",
            vec![TemplateNode::Element(Element {
                name: ElementName::Component(component),
                attributes: Vec::new(),
                children: Vec::new(),
            })],
        );

        let rendered = render(&node, &[], &TextBackend).unwrap();
        assert!(rendered.is_pending());
        assert_eq!(pollster::block_on(rendered.resolve()).unwrap(), "<p>done</p>");
    }

    #[test]
    fn test_component_failure_propagates() {
        let component = Component::new("Broken", |_| {
            Err(RenderError::component("Broken", "missing title"))
        });
        let node = TemplateNode::Element(Element {
            name: ElementName::Component(component),
            attributes: Vec::new(),
            children: Vec::new(),
        });

        let err = render(&node, &[], &TextBackend).unwrap_err();
        assert_eq!(err, RenderError::component("Broken", "missing title"));
    }
}
