/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Entry points.
//!
//! The plain `render_markup_to_*` functions use a thread-local default
//! cache with no components of their own. A [`TemplateRenderer`] binds a
//! backend, a component scope and a private cache; build one with
//! [`render_markup_to_tree_with`] or [`render_markup_to_text_with`].
//!
//! Components missing from a component map are looked up in the thread's
//! default resolver, installed with [`set_default_resolver`]. It applies to
//! the default entry points, to [`parse_template`] and [`parse_markup_text`],
//! and to renderers created after it is installed. A renderer built with
//! [`TemplateRenderer::with_resolver`] uses its own fallback instead.

use crate::ast::TemplateNode;
use crate::backend::{Backend, TextBackend, TreeBackend};
use crate::cache::{CacheConfig, TemplateCache};
use crate::dom::Node;
use crate::error::{MarkupResult, RenderResult, TemplateResult};
use crate::fragments::{Fragments, join_fragments};
use crate::parser::{MarkupParser, XmlMarkupParser, parse_markup};
use crate::render::render;
use crate::rendered::Rendered;
use crate::resolver::{ComponentMap, ComponentResolver, ComponentScope, NullResolver};
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    static DEFAULT_CACHE: TemplateCache = TemplateCache::new();
    static DEFAULT_RESOLVER: RefCell<Rc<dyn ComponentResolver>> = RefCell::new(Rc::new(NullResolver));
}

/// Install the fallback resolver consulted on this thread's default paths.
///
/// The default cache is cleared, so templates parsed before the change are
/// resolved again against the new resolver.
pub fn set_default_resolver(resolver: impl ComponentResolver + 'static) {
    DEFAULT_RESOLVER.with(|current| *current.borrow_mut() = Rc::new(resolver));
    DEFAULT_CACHE.with(TemplateCache::clear);
    tracing::debug!("Installed default component resolver");
}

/// Restore the [`NullResolver`] as this thread's default fallback.
pub fn reset_default_resolver() {
    set_default_resolver(NullResolver);
}

/// A scope over `components` that falls back to the thread's default resolver.
pub fn default_scope(components: ComponentMap) -> ComponentScope {
    let fallback = DEFAULT_RESOLVER.with(|current| Rc::clone(&current.borrow()));
    ComponentScope::new(components).with_shared_fallback(fallback)
}

/// Render a template occurrence to a live tree, using the default cache.
///
/// ```rust
/// use quarto_markup::{Value, fragments, render_markup_to_tree};
///
/// let greeting = fragments!("<div>Hello ", "!</div>");
/// let tree = render_markup_to_tree(greeting, &[Value::from("world")])
///     .unwrap()
///     .into_ready()
///     .unwrap();
/// assert_eq!(tree.to_markup(), "<div>Hello world!</div>");
/// ```
pub fn render_markup_to_tree(
    fragments: Fragments,
    values: &[Value],
) -> TemplateResult<Rendered<Node>> {
    render_with_default_cache(fragments, values, &TreeBackend)
}

/// Render a template occurrence to markup text, using the default cache.
pub fn render_markup_to_text(
    fragments: Fragments,
    values: &[Value],
) -> TemplateResult<Rendered<String>> {
    render_with_default_cache(fragments, values, &TextBackend)
}

/// Parse a template occurrence through the default cache.
pub fn parse_cached(fragments: Fragments) -> MarkupResult<Rc<TemplateNode>> {
    let scope = default_scope(ComponentMap::new());
    DEFAULT_CACHE.with(|cache| cache.get_or_parse(fragments, &scope))
}

fn render_with_default_cache<B: Backend>(
    fragments: Fragments,
    values: &[Value],
    backend: &B,
) -> TemplateResult<Rendered<B::Output>> {
    let node = parse_cached(fragments)?;
    Ok(render(&node, values, backend)?)
}

/// A renderer for one backend and one component scope, with its own cache.
#[derive(Debug)]
pub struct TemplateRenderer<B: Backend> {
    backend: B,
    scope: ComponentScope,
    cache: TemplateCache,
}

impl<B: Backend> TemplateRenderer<B> {
    pub fn new(backend: B, components: ComponentMap) -> Self {
        Self {
            backend,
            scope: default_scope(components),
            cache: TemplateCache::new(),
        }
    }

    /// Consult `resolver` for components missing from the component map.
    pub fn with_resolver(mut self, resolver: impl ComponentResolver + 'static) -> Self {
        self.scope = self.scope.with_fallback(resolver);
        self.cache.clear();
        self
    }

    pub fn with_config(mut self, config: CacheConfig) -> Self {
        let parser = self.cache.parser();
        self.cache = TemplateCache::with_config(config).with_shared_parser(parser);
        self
    }

    /// Use a different markup parser.
    pub fn with_parser(mut self, parser: impl MarkupParser + 'static) -> Self {
        self.cache = TemplateCache::with_config(self.cache.config()).with_parser(parser);
        self
    }

    /// Render a template occurrence.
    pub fn render(
        &self,
        fragments: Fragments,
        values: &[Value],
    ) -> TemplateResult<Rendered<B::Output>> {
        let node = self.parse(fragments)?;
        Ok(render(&node, values, &self.backend)?)
    }

    /// Render markup supplied as text, caching it by content.
    pub fn render_text(
        &self,
        markup: &str,
        values: &[Value],
    ) -> TemplateResult<Rendered<B::Output>> {
        let node = self.cache.get_or_parse_text(markup, &self.scope)?;
        Ok(render(&node, values, &self.backend)?)
    }

    /// Parse a template occurrence through this renderer's cache.
    pub fn parse(&self, fragments: Fragments) -> MarkupResult<Rc<TemplateNode>> {
        self.cache.get_or_parse(fragments, &self.scope)
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    pub fn components(&self) -> &ComponentMap {
        self.scope.components()
    }
}

/// A tree renderer that resolves components from `components`.
pub fn render_markup_to_tree_with(components: ComponentMap) -> TemplateRenderer<TreeBackend> {
    TemplateRenderer::new(TreeBackend, components)
}

/// A text renderer that resolves components from `components`.
pub fn render_markup_to_text_with(components: ComponentMap) -> TemplateRenderer<TextBackend> {
    TemplateRenderer::new(TextBackend, components)
}

/// Join and parse fragments into IR, without caching.
pub fn parse_template<S: AsRef<str>>(
    fragments: &[S],
    components: &ComponentMap,
) -> MarkupResult<TemplateNode> {
    parse_template_with(fragments, &default_scope(components.clone()))
}

/// Join and parse fragments into IR against an explicit scope.
pub fn parse_template_with<S: AsRef<str>>(
    fragments: &[S],
    scope: &ComponentScope,
) -> MarkupResult<TemplateNode> {
    parse_markup_text_with(&join_fragments(fragments), scope)
}

/// Parse markup text into IR, without joining or caching.
pub fn parse_markup_text(markup: &str, components: &ComponentMap) -> MarkupResult<TemplateNode> {
    parse_markup_text_with(markup, &default_scope(components.clone()))
}

/// Parse markup text into IR against an explicit scope.
pub fn parse_markup_text_with(markup: &str, scope: &ComponentScope) -> MarkupResult<TemplateNode> {
    parse_markup(markup, scope, &XmlMarkupParser)
}

/// Render previously parsed IR to a live tree.
pub fn render_ir_to_tree(node: &TemplateNode, values: &[Value]) -> RenderResult<Rendered<Node>> {
    render(node, values, &TreeBackend)
}

/// Render previously parsed IR to markup text.
pub fn render_ir_to_text(node: &TemplateNode, values: &[Value]) -> RenderResult<Rendered<String>> {
    render(node, values, &TextBackend)
}
