/*
 * async_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Tests for pending substitutions: where rendering suspends, ordering of
 * settled children, failure propagation and attribute coercion.
 */

use futures::channel::oneshot;
use quarto_markup::{
    ComponentMap, Pending, RenderError, Value, fragments, render_markup_to_text,
    render_markup_to_text_with, render_markup_to_tree,
};
use std::cell::RefCell;
use std::rc::Rc;

fn from_channel(rx: oneshot::Receiver<&'static str>) -> Value {
    Value::from(Pending::new(async move {
        rx.await
            .map(Value::from)
            .map_err(|_| RenderError::rejected("sender dropped"))
    }))
}

#[test]
fn test_ready_values_render_synchronously() {
    let rendered = render_markup_to_text(fragments!("<p>", "</p>"), &[Value::from("now")]).unwrap();
    assert!(!rendered.is_pending());
}

#[test]
fn test_children_keep_document_order_when_settled_out_of_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (tx, rx) = oneshot::channel::<&'static str>();

    // The first slot can only settle after the second one has.
    let first = {
        let log = Rc::clone(&log);
        Value::from(Pending::new(async move {
            let text = rx.await.map_err(|_| RenderError::rejected("sender dropped"))?;
            log.borrow_mut().push("first");
            Ok::<_, RenderError>(Value::from(text))
        }))
    };
    let second = {
        let log = Rc::clone(&log);
        Value::from(Pending::new(async move {
            log.borrow_mut().push("second");
            let _ = tx.send("first");
            Ok(Value::from("second"))
        }))
    };

    let rendered = render_markup_to_text(
        fragments!("<ol><li>", "</li><li>", "</li></ol>"),
        &[first, second],
    )
    .unwrap();
    assert!(rendered.is_pending());

    let out = pollster::block_on(rendered.resolve()).unwrap();
    assert_eq!(out, "<ol><li>first</li><li>second</li></ol>");
    assert_eq!(*log.borrow(), vec!["second", "first"]);
}

#[test]
fn test_channel_values_in_tree() {
    let (tx_a, rx_a) = oneshot::channel();
    let (tx_b, rx_b) = oneshot::channel();

    let rendered = render_markup_to_tree(
        fragments!("<p>", " and ", "</p>"),
        &[from_channel(rx_a), from_channel(rx_b)],
    )
    .unwrap();

    tx_b.send("b").unwrap();
    tx_a.send("a").unwrap();

    let tree = pollster::block_on(rendered.resolve()).unwrap();
    assert_eq!(tree.to_markup(), "<p>a and b</p>");
}

#[test]
fn test_pending_nested_deep_only_suspends_its_ancestors() {
    let rendered = render_markup_to_text(
        fragments!("<div><header>static</header><main><p>", "</p></main></div>"),
        &[Value::from(Pending::resolved("late"))],
    )
    .unwrap();

    assert!(rendered.is_pending());
    assert_eq!(
        pollster::block_on(rendered.resolve()).unwrap(),
        "<div><header>static</header><main><p>late</p></main></div>"
    );
}

#[test]
fn test_first_failure_wins() {
    let rendered = render_markup_to_text(
        fragments!("<p>", "", "</p>"),
        &[
            Value::from(Pending::rejected("first failure")),
            Value::from(Pending::rejected("second failure")),
        ],
    )
    .unwrap();

    assert_eq!(
        pollster::block_on(rendered.resolve()),
        Err(RenderError::rejected("first failure"))
    );
}

#[test]
fn test_dropped_sender_rejects() {
    let (tx, rx) = oneshot::channel();
    drop(tx);

    let rendered = render_markup_to_text(fragments!("<p>", "</p>"), &[from_channel(rx)]).unwrap();
    assert_eq!(
        pollster::block_on(rendered.resolve()),
        Err(RenderError::rejected("sender dropped"))
    );
}

#[test]
fn test_pending_attribute_is_not_awaited() {
    let rendered = render_markup_to_text(
        fragments!("<a href=\"", "\" title=\"see ", "\">link</a>"),
        &[
            Value::from(Pending::resolved("/docs")),
            Value::from(Pending::resolved("docs")),
        ],
    )
    .unwrap();

    assert!(!rendered.is_pending());
    assert_eq!(
        rendered.into_ready().unwrap(),
        r#"<a href="[pending value]" title="see [pending value]">link</a>"#
    );
}

#[test]
fn test_pending_list_items_settle_in_order() {
    let items = Value::List(vec![
        Value::from(Pending::resolved("x")),
        Value::from("y"),
        Value::from(Pending::resolved(Pending::resolved("z"))),
    ]);

    let rendered = render_markup_to_text(fragments!("<p>", "</p>"), &[items]).unwrap();
    assert_eq!(pollster::block_on(rendered.resolve()).unwrap(), "<p>xyz</p>");
}

#[test]
fn test_component_can_return_pending_value() {
    let components = ComponentMap::new().with("Lazy", |props| {
        let label = props.text("label");
        Ok(Value::from(Pending::new(async move {
            Ok(Value::from(format!("<i>{}</i>", label)))
        })))
    });

    let renderer = render_markup_to_text_with(components);
    let rendered = renderer
        .render(fragments!("<p>before <Lazy label=\"", "\"/> after</p>"), &[Value::from("x")])
        .unwrap();

    assert!(rendered.is_pending());
    assert_eq!(
        pollster::block_on(rendered.resolve()).unwrap(),
        "<p>before <i>x</i> after</p>"
    );
}

#[test]
fn test_pending_children_reach_component_settled() {
    let components = ComponentMap::new().with("Upper", |props| {
        Ok(Value::from(props.children.to_text().to_uppercase()))
    });

    let renderer = render_markup_to_text_with(components);
    let rendered = renderer
        .render(
            fragments!("<p><Upper>hello ", "</Upper></p>"),
            &[Value::from(Pending::resolved("world"))],
        )
        .unwrap();

    assert_eq!(
        pollster::block_on(rendered.resolve()).unwrap(),
        "<p>HELLO WORLD</p>"
    );
}
