/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Runtime markup template engine for Quarto.
//!
//! Templates are written as interpolated XML: literal fragments with
//! substitution slots between them. This crate turns such a template into a
//! live node tree or into markup text:
//!
//! - Fragments are joined with `[[[N]]]` marker tokens and parsed as XML
//! - The parsed document becomes a value-independent IR, cached per
//!   template occurrence
//! - Upper-case tags resolve to components at parse time
//! - Rendering fills the slots and stays synchronous unless a pending value
//!   shows up in a child position
//!
//! # Architecture
//!
//! The engine does not parse XML itself or know what it renders to. The
//! parser is reached through [`MarkupParser`] (backed by `quarto-xml` by
//! default), and output is produced by a [`Backend`]: [`TreeBackend`] for
//! live trees, [`TextBackend`] for strings.
//!
//! # Example
//!
//! ```rust
//! use quarto_markup::{ComponentMap, Value, fragments, render_markup_to_text_with};
//!
//! let components = ComponentMap::new().with("Badge", |props| {
//!     Ok(Value::from(format!("<span>{}</span>", props.text("label"))))
//! });
//! let renderer = render_markup_to_text_with(components);
//!
//! let out = renderer
//!     .render(fragments!("<p><Badge label=\"", "\"/></p>"), &[Value::from("new")])
//!     .unwrap()
//!     .into_ready()
//!     .unwrap();
//! assert_eq!(out, "<p><span>new</span></p>");
//! ```

pub mod ast;
pub mod backend;
pub mod cache;
pub mod dom;
pub mod error;
pub mod fragments;
pub mod parser;
pub mod render;
pub mod rendered;
pub mod resolver;
pub mod template;
pub mod transform;
pub mod value;

// Re-export main types at crate root
pub use ast::{Component, Element, ElementName, Interpolated, Segment, TemplateNode};
pub use backend::{Backend, TextBackend, TreeBackend};
pub use cache::{CacheConfig, TemplateCache};
pub use dom::{Node, NodeKind};
pub use error::{MarkupError, RenderError, TemplateError};
pub use fragments::{Fragments, FragmentsKey, join_fragments, marker};
pub use parser::{MarkupParser, XmlMarkupParser};
pub use render::render;
pub use rendered::Rendered;
pub use resolver::{ComponentMap, ComponentResolver, ComponentScope, NullResolver};
pub use template::{
    TemplateRenderer, default_scope, parse_cached, parse_markup_text, parse_markup_text_with,
    parse_template, parse_template_with, render_ir_to_text, render_ir_to_tree,
    render_markup_to_text, render_markup_to_text_with, render_markup_to_tree,
    render_markup_to_tree_with, reset_default_resolver, set_default_resolver,
};
pub use value::{Attributes, Pending, Props, Value};
