/*
 * cache.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template cache.
//!
//! Parsed templates are cached by the identity of their fragments, so each
//! source-level template occurrence is parsed at most once. Markup supplied
//! as owned text has no such identity; it goes through a bounded LRU keyed
//! by the text itself.

use crate::ast::TemplateNode;
use crate::error::MarkupResult;
use crate::fragments::{Fragments, FragmentsKey};
use crate::parser::{MarkupParser, XmlMarkupParser, parse_markup};
use crate::resolver::ComponentScope;
use hashlink::LruCache;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Default number of entries in the content cache.
pub const DEFAULT_CONTENT_CAPACITY: usize = 256;

/// Cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of templates cached by markup text. Zero disables the
    /// content cache.
    pub content_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            content_capacity: DEFAULT_CONTENT_CAPACITY,
        }
    }
}

/// Parsed-template store for one component scope.
///
/// Cached IR depends on the scope's components, so a cache must only be
/// used with the scope it was first filled from.
pub struct TemplateCache {
    templates: RefCell<HashMap<FragmentsKey, Rc<TemplateNode>>>,
    content: RefCell<LruCache<String, Rc<TemplateNode>>>,
    config: CacheConfig,
    parser: Rc<dyn MarkupParser>,
}

impl TemplateCache {
    /// Create a cache with the default configuration and parser.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            templates: RefCell::new(HashMap::new()),
            content: RefCell::new(LruCache::new(config.content_capacity)),
            config,
            parser: Rc::new(XmlMarkupParser),
        }
    }

    /// Replace the markup parser. Cached entries are dropped.
    pub fn with_parser(self, parser: impl MarkupParser + 'static) -> Self {
        self.with_shared_parser(Rc::new(parser))
    }

    pub fn with_shared_parser(mut self, parser: Rc<dyn MarkupParser>) -> Self {
        self.parser = parser;
        self.clear();
        self
    }

    pub fn parser(&self) -> Rc<dyn MarkupParser> {
        Rc::clone(&self.parser)
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Get the IR for a template occurrence, parsing it on first use.
    ///
    /// Every call with the same [`Fragments`] identity returns the same
    /// `Rc`. Failed parses are not cached.
    pub fn get_or_parse(
        &self,
        fragments: Fragments,
        scope: &ComponentScope,
    ) -> MarkupResult<Rc<TemplateNode>> {
        let key = fragments.key();

        if let Some(node) = self.templates.borrow().get(&key) {
            tracing::trace!(?key, "Template cache hit");
            return Ok(Rc::clone(node));
        }

        tracing::trace!(?key, slots = fragments.slot_count(), "Template cache miss");

        // No borrow is held while parsing; components may render templates
        // of their own through this cache.
        let node = Rc::new(parse_markup(&fragments.join(), scope, self.parser.as_ref())?);

        let mut templates = self.templates.borrow_mut();
        Ok(Rc::clone(templates.entry(key).or_insert(node)))
    }

    /// Get the IR for markup text, parsing it unless it is still in the
    /// content cache.
    pub fn get_or_parse_text(
        &self,
        text: &str,
        scope: &ComponentScope,
    ) -> MarkupResult<Rc<TemplateNode>> {
        let cached = self.content.borrow_mut().get(text).cloned();
        if let Some(node) = cached {
            tracing::trace!(len = text.len(), "Content cache hit");
            return Ok(node);
        }

        tracing::trace!(len = text.len(), "Content cache miss");

        let node = Rc::new(parse_markup(text, scope, self.parser.as_ref())?);
        if self.config.content_capacity > 0 {
            self.content
                .borrow_mut()
                .insert(text.to_string(), Rc::clone(&node));
        }
        Ok(node)
    }

    /// Number of cached templates, across both stores.
    pub fn len(&self) -> usize {
        self.templates.borrow().len() + self.content.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.templates.borrow_mut().clear();
        self.content.borrow_mut().clear();
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateCache")
            .field("templates", &self.templates.borrow().len())
            .field("content", &self.content.borrow().len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
