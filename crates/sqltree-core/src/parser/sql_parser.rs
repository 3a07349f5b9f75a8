//! Public entry points for statement parsing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parser::Parser;
use crate::ast::Node;
use crate::config::{Features, ParserConfig};
use crate::error::Result;
use crate::lexer::Position;

/// A dynamic parameter found while parsing.
///
/// Offsets are byte offsets into the statement text; `end_offset` is the
/// offset of the parameter's last byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Zero-based parameter number.
    pub number: usize,
    /// Offset of the first byte of the placeholder.
    pub begin_offset: usize,
    /// Offset of the last byte of the placeholder.
    pub end_offset: usize,
}

impl ParameterInfo {
    /// Returns the placeholder's source position.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.begin_offset, self.end_offset)
    }
}

/// A statement tree together with the parameters it contains.
#[derive(Debug)]
pub struct ParsedStatement {
    /// Root statement node.
    pub root: Node,
    /// Parameters in the order they appear in the text.
    pub parameters: Vec<ParameterInfo>,
}

/// Parses one statement with the given features and default limits.
///
/// # Errors
///
/// Returns `SqlError::Syntax` for malformed input and
/// `SqlError::FeatureDisabled` for constructs gated behind a feature that
/// is not enabled.
pub fn parse_statement(sql: &str, features: &Features) -> Result<ParsedStatement> {
    parse_with_config(sql, &ParserConfig::with_features(features.clone()))
}

/// Parses one statement with a full parser configuration.
///
/// # Errors
///
/// See [`parse_statement`].
pub fn parse_with_config(sql: &str, config: &ParserConfig) -> Result<ParsedStatement> {
    debug!(length = sql.len(), "parsing statement");
    match Parser::new(sql, config).parse() {
        Ok((root, parameters)) => {
            debug!(
                statement = root.statement_to_string(),
                parameters = parameters.len(),
                "parsed statement"
            );
            Ok(ParsedStatement { root, parameters })
        }
        Err(err) => {
            debug!(error = %err, "statement rejected");
            Err(err)
        }
    }
}

/// A reusable statement parser.
///
/// Keeps its configuration across statements and remembers the parameters
/// of the most recent successful parse.
#[derive(Debug, Clone, Default)]
pub struct SqlParser {
    config: ParserConfig,
    parameters: Vec<ParameterInfo>,
}

impl SqlParser {
    /// Creates a parser with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser with the given configuration.
    #[must_use]
    pub const fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            parameters: Vec::new(),
        }
    }

    /// Returns the parser configuration.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the enabled features.
    #[must_use]
    pub const fn features(&self) -> &Features {
        &self.config.features
    }

    /// Returns the enabled features for modification.
    pub fn features_mut(&mut self) -> &mut Features {
        &mut self.config.features
    }

    /// Parses one statement and returns its root node.
    ///
    /// The parameter list is cleared first, so after a failed parse it is
    /// empty.
    ///
    /// # Errors
    ///
    /// See [`parse_statement`].
    pub fn parse_statement(&mut self, sql: &str) -> Result<Node> {
        self.parameters.clear();
        let parsed = parse_with_config(sql, &self.config)?;
        self.parameters = parsed.parameters;
        Ok(parsed.root)
    }

    /// Parameters of the most recently parsed statement.
    #[must_use]
    pub fn parameter_list(&self) -> &[ParameterInfo] {
        &self.parameters
    }
}
