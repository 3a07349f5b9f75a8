//! Token types for the SQL lexer.

use super::Span;

macro_rules! keywords {
    ($($variant:ident => $text:literal, $reserved:literal;)*) => {
        /// SQL keywords.
        ///
        /// Non-reserved keywords may also be used as identifiers.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Attempts to parse a keyword from a string (case-insensitive).
            #[must_use]
            #[allow(clippy::should_implement_trait)]
            pub fn from_str(s: &str) -> Option<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the keyword as a string.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }

            /// Returns true if the keyword can never be used as an identifier.
            #[must_use]
            pub const fn is_reserved(&self) -> bool {
                match self {
                    $(Self::$variant => $reserved,)*
                }
            }
        }
    };
}

keywords! {
    // Queries
    Select => "SELECT", true;
    From => "FROM", true;
    Where => "WHERE", true;
    Group => "GROUP", true;
    Having => "HAVING", true;
    Order => "ORDER", true;
    By => "BY", true;
    Union => "UNION", true;
    Intersect => "INTERSECT", true;
    Except => "EXCEPT", true;
    All => "ALL", true;
    Distinct => "DISTINCT", true;
    As => "AS", true;
    Offset => "OFFSET", true;
    Fetch => "FETCH", true;
    Limit => "LIMIT", true;
    Asc => "ASC", true;
    Desc => "DESC", true;
    Nulls => "NULLS", false;
    First => "FIRST", false;
    Last => "LAST", false;
    Next => "NEXT", false;
    Row => "ROW", false;
    Rows => "ROWS", false;
    Only => "ONLY", false;

    // Joins
    Join => "JOIN", true;
    Inner => "INNER", true;
    Left => "LEFT", true;
    Right => "RIGHT", true;
    Full => "FULL", true;
    Outer => "OUTER", true;
    Cross => "CROSS", true;
    On => "ON", true;
    Using => "USING", true;

    // Data manipulation
    Insert => "INSERT", true;
    Into => "INTO", true;
    Values => "VALUES", true;
    Update => "UPDATE", true;
    Set => "SET", true;
    Delete => "DELETE", true;

    // Data definition
    Create => "CREATE", true;
    Drop => "DROP", true;
    Alter => "ALTER", true;
    Add => "ADD", true;
    Column => "COLUMN", true;
    Table => "TABLE", true;
    Index => "INDEX", true;
    Schema => "SCHEMA", true;
    Truncate => "TRUNCATE", true;
    If => "IF", false;
    Cascade => "CASCADE", false;
    Restrict => "RESTRICT", false;
    Statistics => "STATISTICS", false;
    Data => "DATA", false;
    Type => "TYPE", false;
    Autoincrement => "AUTOINCREMENT", false;

    // Constraints
    Constraint => "CONSTRAINT", true;
    Constraints => "CONSTRAINTS", false;
    Primary => "PRIMARY", true;
    Key => "KEY", true;
    Foreign => "FOREIGN", true;
    References => "REFERENCES", true;
    Unique => "UNIQUE", true;
    Check => "CHECK", true;
    Default => "DEFAULT", true;
    Action => "ACTION", false;
    No => "NO", false;
    Deferred => "DEFERRED", false;
    Immediate => "IMMEDIATE", false;

    // Predicates and logic
    And => "AND", true;
    Or => "OR", true;
    Not => "NOT", true;
    In => "IN", true;
    Between => "BETWEEN", true;
    Like => "LIKE", true;
    Escape => "ESCAPE", true;
    Is => "IS", true;
    Null => "NULL", true;
    True => "TRUE", true;
    False => "FALSE", true;
    Exists => "EXISTS", true;
    Div => "DIV", false;

    // Expressions
    Case => "CASE", true;
    When => "WHEN", true;
    Then => "THEN", true;
    Else => "ELSE", true;
    End => "END", true;
    Cast => "CAST", true;
    Extract => "EXTRACT", true;
    Substring => "SUBSTRING", true;
    For => "FOR", true;
    To => "TO", false;
    CurrentDate => "CURRENT_DATE", true;
    CurrentTime => "CURRENT_TIME", true;
    CurrentTimestamp => "CURRENT_TIMESTAMP", true;
    Year => "YEAR", false;
    Month => "MONTH", false;
    Day => "DAY", false;
    Hour => "HOUR", false;
    Minute => "MINUTE", false;
    Second => "SECOND", false;

    // Aggregates
    Count => "COUNT", false;
    Sum => "SUM", false;
    Avg => "AVG", false;
    Min => "MIN", false;
    Max => "MAX", false;

    // Data types
    Int => "INT", false;
    Integer => "INTEGER", false;
    Smallint => "SMALLINT", false;
    Bigint => "BIGINT", false;
    Real => "REAL", false;
    Double => "DOUBLE", false;
    Precision => "PRECISION", false;
    Float => "FLOAT", false;
    Decimal => "DECIMAL", false;
    Numeric => "NUMERIC", false;
    Char => "CHAR", false;
    Character => "CHARACTER", false;
    Varchar => "VARCHAR", false;
    Varying => "VARYING", false;
    Text => "TEXT", false;
    Blob => "BLOB", false;
    Boolean => "BOOLEAN", false;
    Date => "DATE", false;
    Time => "TIME", false;
    Timestamp => "TIMESTAMP", false;

    // Transactions
    Begin => "BEGIN", false;
    Start => "START", false;
    Transaction => "TRANSACTION", false;
    Work => "WORK", false;
    Commit => "COMMIT", false;
    Rollback => "ROLLBACK", false;
}

/// Token kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    /// Integer literal (e.g., 42)
    Integer(i64),
    /// Exact numeric literal with a decimal point, or an integer too large
    /// for 64 bits (e.g., 3.14)
    Decimal(String),
    /// Approximate numeric literal with an exponent (e.g., 1e10)
    Float(f64),
    /// String literal (e.g., 'hello')
    String(String),
    /// Blob literal (e.g., X'1234')
    Blob(Vec<u8>),

    // Identifiers and keywords
    /// Identifier (e.g., column_name), quoted or not
    Identifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ^
    BitXor,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,

    // Placeholders
    /// ?
    Question,
    /// $1, $2, ...
    DollarParameter(u32),

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}
