//! Error types for XML parsing.

use crate::Span;
use ariadne::{Config, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Result type alias for quarto-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during XML parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}")]
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<usize>,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected when EOF was encountered.
        expected: String,
        span: Option<Span>,
    },

    /// Mismatched end tag.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        expected: String,
        found: String,
        span: Option<Span>,
    },

    /// Invalid XML structure.
    #[error("Invalid XML structure: {message}")]
    InvalidStructure { message: String, span: Option<Span> },

    /// Empty document (no root element).
    #[error("Empty XML document: no root element found")]
    EmptyDocument,

    /// Multiple root elements.
    #[error("Invalid XML: multiple root elements")]
    MultipleRoots { span: Option<Span> },
}

impl Error {
    /// Byte offset of the problem, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::XmlSyntax { position, .. } => *position,
            Error::UnexpectedEof { span, .. }
            | Error::MismatchedEndTag { span, .. }
            | Error::InvalidStructure { span, .. }
            | Error::MultipleRoots { span } => span.as_ref().map(|s| s.start),
            Error::EmptyDocument => None,
        }
    }

    fn label_span(&self, source_len: usize) -> Span {
        let span = match self {
            Error::UnexpectedEof { span, .. }
            | Error::MismatchedEndTag { span, .. }
            | Error::InvalidStructure { span, .. }
            | Error::MultipleRoots { span } => span.clone(),
            Error::XmlSyntax { position, .. } => position.map(|p| p..p + 1),
            Error::EmptyDocument => None,
        };
        let span = span.unwrap_or(0..source_len);
        let start = span.start.min(source_len);
        let end = span.end.clamp(start, source_len);
        start..end
    }

    /// Render this error as a plain-text source report.
    ///
    /// `name` is the label used for the source (usually a file name).
    pub fn to_report(&self, source: &str, name: &str) -> String {
        let span = self.label_span(source.len());
        source_report(source, name, &self.to_string(), &self.label_message(), span)
    }

    fn label_message(&self) -> String {
        match self {
            Error::XmlSyntax { message, .. } => message.clone(),
            Error::UnexpectedEof { expected, .. } => format!("expected {} here", expected),
            Error::MismatchedEndTag { expected, .. } => {
                format!("this element needs a matching </{}>", expected)
            }
            Error::InvalidStructure { message, .. } => message.clone(),
            Error::EmptyDocument => "no root element".to_string(),
            Error::MultipleRoots { .. } => {
                "wrap multiple elements in a single container element".to_string()
            }
        }
    }
}

/// Render a plain-text source report pointing at `span` in `source`.
///
/// The span is clamped to the source bounds.
pub fn source_report(source: &str, name: &str, message: &str, label: &str, span: Span) -> String {
    let start = span.start.min(source.len());
    let end = span.end.clamp(start, source.len());
    let id = name.to_string();

    let report = Report::build(ReportKind::Error, id.clone(), start)
        .with_config(Config::default().with_color(false))
        .with_message(message)
        .with_label(Label::new((id.clone(), start..end)).with_message(label))
        .finish();

    let mut output = Vec::new();
    match report.write((id, Source::from(source)), &mut output) {
        Ok(()) => String::from_utf8_lossy(&output).into_owned(),
        Err(_) => message.to_string(),
    }
}
