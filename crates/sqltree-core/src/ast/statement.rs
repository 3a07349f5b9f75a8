//! Data manipulation and session statements.

use super::{Node, NodeList, TableName};

/// A query statement: a result set with its ordering and row limits.
#[derive(Debug, PartialEq)]
pub struct CursorNode {
    /// Cursor name, when declared.
    pub name: Option<String>,
    pub result_set: Box<Node>,
    pub order_by_list: Option<NodeList>,
    /// Rows to skip.
    pub offset: Option<Box<Node>>,
    /// Rows to return.
    pub fetch_first: Option<Box<Node>>,
}

/// `INSERT INTO target [(columns)] query`.
#[derive(Debug, PartialEq)]
pub struct InsertNode {
    pub target_table: TableName,
    /// Explicit target columns.
    pub target_columns: Option<NodeList>,
    /// VALUES or query supplying the rows.
    pub result_set: Box<Node>,
}

/// `UPDATE target SET column = value, ... [WHERE ...]`.
#[derive(Debug, PartialEq)]
pub struct UpdateNode {
    pub target_table: TableName,
    pub correlation_name: Option<String>,
    /// Assignments as named result columns.
    pub set_clause: NodeList,
    pub where_clause: Option<Box<Node>>,
}

/// `DELETE FROM target [WHERE ...]`.
#[derive(Debug, PartialEq)]
pub struct DeleteNode {
    pub target_table: TableName,
    pub correlation_name: Option<String>,
    pub where_clause: Option<Box<Node>>,
}

/// `SET SCHEMA name`.
#[derive(Debug, PartialEq)]
pub struct SetSchemaNode {
    pub schema_name: String,
}

/// `SET CONSTRAINTS {ALL | name, ...} {DEFERRED | IMMEDIATE}`.
#[derive(Debug, PartialEq)]
pub struct SetConstraintsNode {
    /// Whether ALL was specified.
    pub all: bool,
    /// Named constraints; `None` exactly when `all` is set.
    pub constraints: Option<NodeList>,
    /// DEFERRED rather than IMMEDIATE.
    pub deferred: bool,
}

/// `SET variable {= | TO} value`.
#[derive(Debug, PartialEq)]
pub struct SetConfigurationNode {
    pub variable: String,
    pub value: String,
}

/// Transaction control operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionOperation {
    Begin,
    Commit,
    Rollback,
}

impl TransactionOperation {
    /// Returns the SQL keyword for the operation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
        }
    }
}

/// BEGIN, COMMIT or ROLLBACK.
#[derive(Debug, PartialEq)]
pub struct TransactionControlNode {
    pub operation: TransactionOperation,
}
