/*
 * fragments.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template fragments and the fragment joiner.
//!
//! A template occurrence is a list of literal fragments with one
//! substitution slot between each pair. Joining puts a marker token in each
//! slot, producing markup text a plain XML parser accepts.

use std::fmt;

/// Opening delimiter of a marker token.
pub const MARKER_OPEN: &str = "[[[";

/// Closing delimiter of a marker token.
pub const MARKER_CLOSE: &str = "]]]";

/// The marker token for slot `index`: `[[[index]]]`.
///
/// Valid both as element text and inside a quoted attribute value.
pub fn marker(index: usize) -> String {
    format!("{}{}{}", MARKER_OPEN, index, MARKER_CLOSE)
}

/// Join fragments with marker tokens between them.
///
/// `["a", "b", "c"]` becomes `a[[[0]]]b[[[1]]]c`; there is no marker after
/// the last fragment.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    let mut joined = String::new();
    for (index, fragment) in fragments.iter().enumerate() {
        if index > 0 {
            joined.push_str(&marker(index - 1));
        }
        joined.push_str(fragment.as_ref());
    }
    joined
}

/// The fragments of one source-level template occurrence.
///
/// Identity, not content, is what the template cache keys on: two
/// `Fragments` are the same template when they point at the same static
/// slice. The [`fragments!`](crate::fragments!) macro declares one static
/// per call site, so every evaluation of the same occurrence yields the
/// same identity.
#[derive(Clone, Copy)]
pub struct Fragments(&'static [&'static str]);

/// Identity of a [`Fragments`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentsKey {
    addr: usize,
    len: usize,
}

impl Fragments {
    pub const fn new(fragments: &'static [&'static str]) -> Self {
        Fragments(fragments)
    }

    pub fn as_slice(&self) -> &'static [&'static str] {
        self.0
    }

    /// Number of substitution slots (one less than the fragment count).
    pub fn slot_count(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Markup text with marker tokens in every slot.
    pub fn join(&self) -> String {
        join_fragments(self.0)
    }

    /// Identity of the backing slice.
    pub fn key(&self) -> FragmentsKey {
        FragmentsKey {
            addr: self.0.as_ptr() as usize,
            len: self.0.len(),
        }
    }
}

impl fmt::Debug for Fragments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fragments").field(&self.0).finish()
    }
}

/// Declare the fragments of a template occurrence.
///
/// Each expansion owns a distinct `static`, which gives the call site a
/// stable identity for the template cache.
///
/// ```rust
/// use quarto_markup::fragments;
///
/// let greeting = fragments!("<p>Hello ", "!</p>");
/// assert_eq!(greeting.slot_count(), 1);
/// assert_eq!(greeting.join(), "<p>Hello [[[0]]]!</p>");
/// ```
#[macro_export]
macro_rules! fragments {
    ($($fragment:literal),+ $(,)?) => {{
        static FRAGMENTS: [&str; [$($fragment),+].len()] = [$($fragment),+];
        $crate::Fragments::new(&FRAGMENTS)
    }};
}
