/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Substitution values.
//!
//! A [`Value`] is what fills a substitution slot at render time. Values are
//! supplied independently of the IR, so the same parsed template can be
//! rendered any number of times with different arrays of values.
//!
//! Values can be asynchronous: a [`Pending`] wraps a future that settles to
//! another value. Rendering only suspends when such a value is actually
//! present in a child position.

use crate::dom::Node;
use crate::error::{RenderError, RenderResult};
use futures::future::{FutureExt, LocalBoxFuture, Shared, try_join_all};
use hashlink::LinkedHashMap;
use std::fmt;
use std::future::Future;

/// Text form of a pending value when it is used where it cannot be awaited.
pub const PENDING_TEXT: &str = "[pending value]";

/// A value for a substitution slot.
#[derive(Clone, Default)]
pub enum Value {
    /// An absent value; renders as empty text.
    #[default]
    Null,

    Bool(bool),

    Number(f64),

    Text(String),

    /// A live tree node; passed through unchanged by the tree backend.
    Node(Node),

    /// A group of values rendered one after another.
    ///
    /// This is how several rendered fragments are embedded in one slot.
    List(Vec<Value>),

    /// A value that is not available yet.
    Pending(Pending),
}

impl Value {
    pub fn is_pending(&self) -> bool {
        matches!(self, Value::Pending(_))
    }

    /// Whether this value, or any value nested in a list, is pending.
    pub fn has_pending(&self) -> bool {
        match self {
            Value::Pending(_) => true,
            Value::List(items) => items.iter().any(Value::has_pending),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The synchronous text form of this value.
    ///
    /// - `Null`: empty
    /// - `Bool`: `true` / `false`
    /// - `Number`: shortest decimal form (`3`, `1.5`); non-finite values
    ///   are `Infinity`, `-Infinity` and `NaN`, and negative zero is `0`
    /// - `Node`: serialized markup
    /// - `List`: concatenated text forms of the items
    /// - `Pending`: [`PENDING_TEXT`], the value is never awaited
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_text(*n),
            Value::Text(s) => s.clone(),
            Value::Node(node) => node.to_markup(),
            Value::List(items) => items.iter().map(Value::to_text).collect(),
            Value::Pending(_) => PENDING_TEXT.to_string(),
        }
    }

    /// Settle every pending value in this value, including list items.
    pub fn settle(self) -> LocalBoxFuture<'static, RenderResult<Value>> {
        async move {
            match self {
                Value::Pending(pending) => pending.resolve().await?.settle().await,
                Value::List(items) => {
                    let items = try_join_all(items.into_iter().map(Value::settle)).await?;
                    Ok(Value::List(items))
                }
                other => Ok(other),
            }
        }
        .boxed_local()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn number_text(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() && n.is_sign_positive() {
        "Infinity".to_string()
    } else if n.is_infinite() {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Pending(_) => write!(f, "Pending(..)"),
        }
    }
}

/// Nodes compare by identity; pending values never compare equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a.ptr_eq(b),
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(node)
    }
}

impl From<Pending> for Value {
    fn from(pending: Pending) -> Self {
        Value::Pending(pending)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// JSON objects have no natural rendering; they become their JSON text.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            object @ serde_json::Value::Object(_) => Value::Text(object.to_string()),
        }
    }
}

type SharedValue = Shared<LocalBoxFuture<'static, RenderResult<Value>>>;

/// An asynchronous value.
///
/// Cloning shares the underlying future: it runs once, and every clone
/// observes the same outcome.
#[derive(Clone)]
pub struct Pending(SharedValue);

impl Pending {
    /// Wrap a future that settles to a value.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = RenderResult<Value>> + 'static,
    {
        Pending(future.boxed_local().shared())
    }

    /// A pending value that settles immediately to `value`.
    pub fn resolved(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(async move { Ok(value) })
    }

    /// A pending value that fails with [`RenderError::Rejected`].
    pub fn rejected(message: impl Into<String>) -> Self {
        let error = RenderError::rejected(message);
        Self::new(async move { Err(error) })
    }

    /// Wait for the value, following chains of pending values.
    pub async fn resolve(self) -> RenderResult<Value> {
        let mut value = self.0.await?;
        while let Value::Pending(next) = value {
            value = next.0.await?;
        }
        Ok(value)
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pending(..)")
    }
}

/// Attribute mapping handed to backends and components, in source order.
pub type Attributes = LinkedHashMap<String, Value>;

/// The single argument a component is called with.
#[derive(Debug, Clone, Default)]
pub struct Props {
    /// Resolved attributes of the component element.
    pub attributes: Attributes,

    /// The composed child content, as produced by the active backend.
    pub children: Value,
}

impl Props {
    /// Get an attribute by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Text form of an attribute; empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.get(name).map(Value::to_text).unwrap_or_default()
    }
}
