//! Query and result set nodes.

use core::fmt;

use super::{Node, NodeList};

/// A possibly schema-qualified object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName {
    /// Schema, if written.
    pub schema_name: Option<String>,
    /// Object name, as written.
    pub table_name: String,
}

impl TableName {
    /// Creates an unqualified name.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            schema_name: None,
            table_name: table_name.into(),
        }
    }

    /// Creates a schema-qualified name.
    #[must_use]
    pub fn qualified(schema_name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            schema_name: Some(schema_name.into()),
            table_name: table_name.into(),
        }
    }

    /// Returns `schema.name`, or just the name when unqualified.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema_name {
            write!(f, "{schema}.")?;
        }
        f.write_str(&self.table_name)
    }
}

/// A SELECT block.
#[derive(Debug, PartialEq)]
pub struct SelectNode {
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// The select list.
    pub result_columns: NodeList,
    /// FROM clause; empty when absent.
    pub from_list: NodeList,
    pub where_clause: Option<Box<Node>>,
    pub group_by_list: Option<NodeList>,
    pub having_clause: Option<Box<Node>>,
}

/// A VALUES clause. Every row has the same width.
#[derive(Debug, PartialEq)]
pub struct ValuesNode {
    pub rows: NodeList,
}

/// One row of a VALUES clause.
#[derive(Debug, PartialEq)]
pub struct RowResultSetNode {
    pub values: NodeList,
}

/// Set operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl SetOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// `left UNION [ALL] right` and friends.
#[derive(Debug, PartialEq)]
pub struct SetOperationNode {
    pub operator: SetOperator,
    /// Whether ALL was specified.
    pub all: bool,
    pub left_result_set: Box<Node>,
    pub right_result_set: Box<Node>,
}

/// One select list entry, or one `column = value` of an UPDATE.
#[derive(Debug, PartialEq)]
pub struct ResultColumnNode {
    /// Alias, or the assigned column for UPDATE.
    pub name: Option<String>,
    pub expression: Box<Node>,
}

/// `*` or `t.*` in a select list.
#[derive(Debug, PartialEq)]
pub struct AllResultColumnNode {
    pub table_name: Option<TableName>,
}

/// A table in a FROM clause.
#[derive(Debug, PartialEq)]
pub struct FromBaseTableNode {
    pub table_name: TableName,
    pub correlation_name: Option<String>,
}

/// A derived table: `(SELECT ...) AS alias`.
#[derive(Debug, PartialEq)]
pub struct FromSubqueryNode {
    pub subquery: Box<Node>,
    pub correlation_name: String,
}

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
}

impl JoinType {
    /// Returns the SQL representation of the join type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::LeftOuter => "LEFT JOIN",
            Self::RightOuter => "RIGHT JOIN",
            Self::FullOuter => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A join of two FROM entries.
#[derive(Debug, PartialEq)]
pub struct JoinNode {
    pub join_type: JoinType,
    pub left_result_set: Box<Node>,
    pub right_result_set: Box<Node>,
    /// ON condition.
    pub join_clause: Option<Box<Node>>,
    /// USING column list.
    pub using_clause: Option<NodeList>,
}

/// Where NULLs sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    First,
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY entry.
#[derive(Debug, PartialEq)]
pub struct OrderByColumnNode {
    pub expression: Box<Node>,
    pub ascending: bool,
    pub nulls: Option<NullOrdering>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_display() {
        assert_eq!(TableName::new("users").to_string(), "users");
        assert_eq!(
            TableName::qualified("app", "users").full_name(),
            "app.users"
        );
    }
}
