//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Every node it builds goes through the node factory and carries the byte
//! range of the text it was parsed from.

#[allow(clippy::module_inception)]
mod parser;
mod pratt;
mod sql_parser;

pub use sql_parser::{parse_statement, parse_with_config, ParameterInfo, ParsedStatement, SqlParser};
