/*
 * backend/mod.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Output backends.
//!
//! The render engine is generic over a [`Backend`], which decides what text,
//! substitutions and elements turn into. Two backends ship with the crate:
//!
//! - [`TreeBackend`] builds a live [`Node`](crate::dom::Node) tree
//! - [`TextBackend`] builds a markup string

mod text;
mod tree;

pub use text::TextBackend;
pub use tree::TreeBackend;

use crate::value::{Attributes, Value};

/// The primitive operations the render engine composes output with.
pub trait Backend: Clone + 'static {
    /// What one render produces.
    type Output: 'static;

    /// Output for a literal text part.
    fn render_text(&self, text: &str) -> Self::Output;

    /// Output for a settled substitution value.
    ///
    /// Values that are already native output for this backend pass through
    /// unchanged.
    fn render_substitution(&self, value: Value) -> Self::Output;

    /// Output for a tag element with resolved attributes and composed
    /// children.
    fn render_element(
        &self,
        tag: &str,
        attributes: &Attributes,
        children: Self::Output,
    ) -> Self::Output;

    /// Compose the rendered children of one element into a single output.
    fn finalize_children(&self, children: Vec<Self::Output>) -> Self::Output;

    /// Hand composed output to a component as a value.
    fn output_to_value(&self, output: Self::Output) -> Value;
}
