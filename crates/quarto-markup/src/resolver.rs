/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Component name resolution.
//!
//! Upper-case tag names refer to components. They are looked up first in
//! the caller's [`ComponentMap`], then in a fallback [`ComponentResolver`]
//! the caller injects. Without an explicit fallback the thread's default
//! resolver is used (see [`crate::template::set_default_resolver`]), which
//! is the [`NullResolver`] until replaced. Resolution happens once, at
//! parse time.

use crate::ast::Component;
use crate::error::RenderResult;
use crate::value::{Props, Value};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Trait for looking up components by name.
pub trait ComponentResolver {
    /// Find the component for an upper-case tag name, or `None`.
    fn resolve(&self, name: &str) -> Option<Component>;
}

/// Resolver that knows no components.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl ComponentResolver for NullResolver {
    fn resolve(&self, _name: &str) -> Option<Component> {
        None
    }
}

/// Caller-supplied mapping from tag names to components.
#[derive(Debug, Clone, Default)]
pub struct ComponentMap {
    components: HashMap<String, Component>,
}

impl ComponentMap {
    /// Create a new empty component map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under `name`.
    pub fn add<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(Props) -> RenderResult<Value> + 'static,
    {
        let name = name.into();
        let component = Component::new(name.clone(), func);
        self.components.insert(name, component);
        self
    }

    /// Builder form of [`ComponentMap::add`].
    pub fn with<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Props) -> RenderResult<Value> + 'static,
    {
        self.add(name, func);
        self
    }

    /// Register an existing component under its own name.
    pub fn insert(&mut self, component: Component) -> &mut Self {
        self.components
            .insert(component.name().to_string(), component);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ComponentResolver for ComponentMap {
    fn resolve(&self, name: &str) -> Option<Component> {
        self.get(name).cloned()
    }
}

/// The name-resolution scope for one cache: a component map plus a
/// fallback resolver.
#[derive(Clone)]
pub struct ComponentScope {
    components: ComponentMap,
    fallback: Rc<dyn ComponentResolver>,
}

impl ComponentScope {
    /// A scope over `components` with no fallback.
    pub fn new(components: ComponentMap) -> Self {
        Self {
            components,
            fallback: Rc::new(NullResolver),
        }
    }

    /// Replace the fallback resolver.
    pub fn with_fallback(mut self, resolver: impl ComponentResolver + 'static) -> Self {
        self.fallback = Rc::new(resolver);
        self
    }

    /// Replace the fallback resolver with an already shared one.
    pub fn with_shared_fallback(mut self, resolver: Rc<dyn ComponentResolver>) -> Self {
        self.fallback = resolver;
        self
    }

    pub fn components(&self) -> &ComponentMap {
        &self.components
    }
}

impl Default for ComponentScope {
    fn default() -> Self {
        Self::new(ComponentMap::new())
    }
}

impl ComponentResolver for ComponentScope {
    fn resolve(&self, name: &str) -> Option<Component> {
        self.components
            .resolve(name)
            .or_else(|| self.fallback.resolve(name))
    }
}

impl fmt::Debug for ComponentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentScope")
            .field("components", &self.components)
            .finish_non_exhaustive()
    }
}
