//! # sqltree-core
//!
//! A SQL statement parser that produces a typed syntax tree.
//!
//! This crate provides:
//! - A hand-written recursive descent parser with Pratt expression parsing
//! - Optional grammar features that can be switched on per parser
//! - A tree whose nodes are built and copied only through a validating
//!   [`NodeFactory`], and which records the byte range of every node
//! - An in-place rewriting [`Visitor`] and a deterministic tree printer
//!
//! ## Parsing
//!
//! ```rust
//! use sqltree_core::{NodeKind, SqlParser};
//!
//! let mut parser = SqlParser::new();
//! let root = parser
//!     .parse_statement("SELECT name FROM users WHERE id = ?")
//!     .unwrap();
//!
//! assert!(matches!(root.kind(), NodeKind::Cursor(_)));
//! assert_eq!(root.statement_to_string(), Some("SELECT"));
//! assert_eq!(parser.parameter_list()[0].begin_offset, 34);
//! ```
//!
//! ## Features
//!
//! ```rust
//! use sqltree_core::{parse_statement, Features, SqlError, SqlFeature};
//!
//! let sql = "SELECT a % 2 FROM t";
//! assert!(matches!(
//!     parse_statement(sql, &Features::default()),
//!     Err(SqlError::FeatureDisabled { .. })
//! ));
//! assert!(parse_statement(sql, &Features::default().with(SqlFeature::InfixMod)).is_ok());
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod factory;
pub mod lexer;
pub mod parser;
mod print;
pub mod visitor;

pub use ast::{ListKind, Node, NodeCategory, NodeKind, NodeList};
pub use config::{Features, ParserConfig, SqlFeature};
pub use error::{Result, SqlError};
pub use factory::NodeFactory;
pub use lexer::{Lexer, Position, Span, Token, TokenKind};
pub use parser::{parse_statement, parse_with_config, ParameterInfo, ParsedStatement, SqlParser};
pub use visitor::{
    walk_phase, walk_phases, CompilationPhase, PhaseVisitor, TraceVisitor, Visitor,
};
