/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template parsing and rendering.

use std::ops::Range;
use thiserror::Error;

/// Errors raised while turning markup into IR.
///
/// These are always reported at parse time, before any rendering happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarkupError {
    /// The markup is not well-formed.
    #[error("Markup syntax error: {message}")]
    Syntax {
        /// Diagnostic text from the markup parser.
        message: String,
        /// Location of the problem in the joined markup text, when known.
        span: Option<Range<usize>>,
    },

    /// An upper-case tag names no known component.
    #[error("Unresolved component: <{name}> is not in the component map or the fallback resolver")]
    NameResolution {
        name: String,
        span: Option<Range<usize>>,
    },
}

impl MarkupError {
    /// Create a syntax error without location information.
    pub fn syntax(message: impl Into<String>) -> Self {
        MarkupError::Syntax {
            message: message.into(),
            span: None,
        }
    }

    /// Byte offset of the problem in the markup text, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            MarkupError::Syntax { span, .. } | MarkupError::NameResolution { span, .. } => {
                span.as_ref().map(|s| s.start)
            }
        }
    }

    /// Render this error as a plain-text source report against `source`.
    pub fn to_report(&self, source: &str, name: &str) -> String {
        let (label, span) = match self {
            MarkupError::Syntax { message, span } => (message.clone(), span.clone()),
            MarkupError::NameResolution { name, span } => {
                (format!("`{}` is not defined", name), span.clone())
            }
        };
        let span = span.unwrap_or(0..source.len());
        quarto_xml::source_report(source, name, &self.to_string(), &label, span)
    }
}

impl From<quarto_xml::Error> for MarkupError {
    fn from(err: quarto_xml::Error) -> Self {
        MarkupError::Syntax {
            message: err.to_string(),
            span: err.offset().map(|offset| offset..offset + 1),
        }
    }
}

/// Errors raised while rendering IR.
///
/// `Clone` so a failure can be observed by every holder of a shared
/// pending value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// A marker refers past the end of the substitution array.
    #[error("Substitution index {index} is out of range ({len} substitutions supplied)")]
    SubstitutionOutOfRange { index: usize, len: usize },

    /// A component reported a failure.
    #[error("Component <{name}> failed: {message}")]
    Component { name: String, message: String },

    /// A pending value settled with a failure.
    #[error("Pending value failed: {message}")]
    Rejected { message: String },
}

impl RenderError {
    /// Create a failure for a pending value.
    pub fn rejected(message: impl Into<String>) -> Self {
        RenderError::Rejected {
            message: message.into(),
        }
    }

    /// Create a failure reported by the named component.
    pub fn component(name: impl Into<String>, message: impl Into<String>) -> Self {
        RenderError::Component {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Either kind of failure, for the one-shot entry points that parse and
/// render in a single call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for parse-time operations.
pub type MarkupResult<T> = Result<T, MarkupError>;

/// Result type for render-time operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type for combined parse-and-render operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
