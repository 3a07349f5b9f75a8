//! SQL Lexer/Tokenizer
//!
//! A hand-written lexer that produces a stream of tokens with byte spans.

mod span;
mod token;
mod tokenizer;

pub use span::{Position, Span};
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
