//! Error types for parsing and tree construction.

use crate::config::SqlFeature;
use crate::lexer::{Span, TokenKind};

/// Errors raised by the parser, the node factory and node lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SqlError {
    /// Malformed token or production sequence.
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset of the offending token.
        offset: usize,
        /// Error message.
        message: String,
    },

    /// Well-formed input that needs a grammar feature which is not enabled.
    #[error("Feature {feature} is not enabled (at offset {offset})")]
    FeatureDisabled {
        /// The feature the production requires.
        feature: SqlFeature,
        /// Byte offset of the gated token.
        offset: usize,
    },

    /// A node was constructed with arguments that violate its contract.
    #[error("Invalid node arguments: {0}")]
    InvalidArguments(String),

    /// An index column list already carries a function application.
    #[error(
        "Cannot use multiple functions in one index definition: '{existing}' already applied, \
         '{attempted}' rejected"
    )]
    AmbiguousIndexFunction {
        /// Function already applied to the list.
        existing: String,
        /// Function whose application was rejected.
        attempted: String,
    },

    /// Malformed parser configuration or feature list.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SqlError {
    /// Creates a syntax error at the start of `span`.
    #[must_use]
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::Syntax {
            offset: span.start,
            message: message.into(),
        }
    }

    /// Creates an "unexpected token" error.
    ///
    /// Lexer errors are reported with their own message.
    #[must_use]
    pub fn unexpected(expected: impl AsRef<str>, found: &TokenKind, span: Span) -> Self {
        let message = match found {
            TokenKind::Error(message) => message.clone(),
            TokenKind::Eof => format!("Unexpected end of input: expected {}", expected.as_ref()),
            other => format!(
                "Unexpected token: expected {}, found {other:?}",
                expected.as_ref()
            ),
        };
        Self::syntax(message, span)
    }

    /// Creates an invalid-arguments error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }

    /// Returns the source offset for errors that point into statement text.
    #[must_use]
    pub const fn offset(&self) -> Option<usize> {
        match self {
            Self::Syntax { offset, .. } | Self::FeatureDisabled { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Result type for parsing and tree operations.
pub type Result<T> = std::result::Result<T, SqlError>;
