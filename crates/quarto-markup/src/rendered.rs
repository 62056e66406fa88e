/*
 * rendered.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The bimodal render result.
//!
//! Rendering stays synchronous until a pending value actually shows up in a
//! child position. [`Rendered`] makes that explicit: callers either get the
//! output right away or a future that produces it.

use crate::error::RenderResult;
use futures::future::{FutureExt, LocalBoxFuture, try_join_all};
use std::fmt;

/// A render result that is either available now or later.
pub enum Rendered<T> {
    /// The output is complete.
    Ready(T),

    /// The output depends on values that have not settled yet.
    Pending(LocalBoxFuture<'static, RenderResult<T>>),
}

impl<T: 'static> Rendered<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Rendered::Pending(_))
    }

    /// The output, if it is available without waiting.
    pub fn into_ready(self) -> Option<T> {
        match self {
            Rendered::Ready(value) => Some(value),
            Rendered::Pending(_) => None,
        }
    }

    /// Transform the output once it is available.
    pub fn map<U, F>(self, f: F) -> Rendered<U>
    where
        U: 'static,
        F: FnOnce(T) -> U + 'static,
    {
        match self {
            Rendered::Ready(value) => Rendered::Ready(f(value)),
            Rendered::Pending(future) => {
                Rendered::Pending(future.map(|result| result.map(f)).boxed_local())
            }
        }
    }

    /// Continue with a step that may itself fail or become pending.
    ///
    /// When `self` is ready the step runs immediately, so a ready chain never
    /// allocates a future.
    pub fn and_then<U, F>(self, f: F) -> RenderResult<Rendered<U>>
    where
        U: 'static,
        F: FnOnce(T) -> RenderResult<Rendered<U>> + 'static,
    {
        match self {
            Rendered::Ready(value) => f(value),
            Rendered::Pending(future) => Ok(Rendered::Pending(
                async move {
                    let value = future.await?;
                    f(value)?.resolve().await
                }
                .boxed_local(),
            )),
        }
    }

    /// Wait for the output.
    pub async fn resolve(self) -> RenderResult<T> {
        match self {
            Rendered::Ready(value) => Ok(value),
            Rendered::Pending(future) => future.await,
        }
    }

    /// Join a sequence of results, keeping their order.
    ///
    /// If every entry is ready the join is ready. Otherwise the join is one
    /// pending result that settles all entries and fails with the first
    /// error encountered.
    pub fn join_all(items: Vec<Rendered<T>>) -> Rendered<Vec<T>> {
        if !items.iter().any(Rendered::is_pending) {
            return Rendered::Ready(items.into_iter().filter_map(Rendered::into_ready).collect());
        }

        Rendered::Pending(try_join_all(items.into_iter().map(Rendered::resolve)).boxed_local())
    }
}

impl<T: fmt::Debug> fmt::Debug for Rendered<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Rendered::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
