//! Homogeneous node lists.

use std::fmt;

use super::{Node, NodeCategory};
use crate::error::{Result, SqlError};

/// What a [`NodeList`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Value expressions (IN lists, GROUP BY, VALUES rows).
    Values,
    /// Rows of a VALUES clause.
    Rows,
    /// Select list or SET clause.
    ResultColumns,
    /// FROM clause entries.
    FromTables,
    /// Columns and constraints of a table definition.
    TableElements,
    /// ORDER BY entries.
    OrderBy,
    /// Table or constraint names.
    TableNames,
    /// Plain column references (constraint and insert column lists).
    ColumnReferences,
    /// Columns of an index definition.
    IndexColumns,
    /// Arguments of a routine call.
    MethodParameters,
}

impl ListKind {
    /// Returns the printed name of a list of this kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Values => "ValueNodeList",
            Self::Rows => "RowNodeList",
            Self::ResultColumns => "ResultColumnList",
            Self::FromTables => "FromList",
            Self::TableElements => "TableElementList",
            Self::OrderBy => "OrderByList",
            Self::TableNames => "TableNameList",
            Self::ColumnReferences => "ColumnReferenceList",
            Self::IndexColumns => "IndexColumnList",
            Self::MethodParameters => "MethodParameterList",
        }
    }

    /// Returns true if `node` may be an element of a list of this kind.
    #[must_use]
    pub fn accepts(&self, node: &Node) -> bool {
        match self {
            Self::Values => node.category() == NodeCategory::Value,
            Self::Rows => node.category() == NodeCategory::Row,
            Self::ResultColumns => node.category() == NodeCategory::ResultColumn,
            Self::FromTables => node.category() == NodeCategory::FromTable,
            Self::TableElements => node.category() == NodeCategory::TableElement,
            Self::OrderBy => node.category() == NodeCategory::OrderBy,
            Self::TableNames => node.category() == NodeCategory::TableName,
            Self::ColumnReferences => {
                matches!(node.kind(), super::NodeKind::ColumnReference(_))
            }
            Self::IndexColumns => node.category() == NodeCategory::IndexColumn,
            Self::MethodParameters => node.category() == NodeCategory::HostValue,
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A function applied to a contiguous run of index columns, as in
/// `CREATE INDEX i ON t(z_order(x, y), w)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionApplication {
    /// Function name, trimmed.
    pub function_name: String,
    /// Position of the first argument column in the list.
    pub first_argument: usize,
    /// Position of the last argument column in the list.
    pub last_argument: usize,
    /// Number of argument columns.
    pub argument_count: usize,
}

/// An ordered list of nodes of one category.
///
/// Lists are containers, not nodes: they have no position and are never
/// offered to [`Visitor::visit`](crate::Visitor::visit), although visitors see
/// them through [`Visitor::visit_list`](crate::Visitor::visit_list).
#[derive(Debug, PartialEq)]
pub struct NodeList {
    kind: ListKind,
    nodes: Vec<Node>,
    function_application: Option<FunctionApplication>,
}

impl NodeList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new(kind: ListKind) -> Self {
        Self {
            kind,
            nodes: Vec::new(),
            function_application: None,
        }
    }

    /// Creates a list from `nodes`, checking every element.
    ///
    /// # Errors
    ///
    /// Returns `SqlError::InvalidArguments` if an element does not belong in
    /// a list of this kind.
    pub fn from_nodes(kind: ListKind, nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
        let mut list = Self::new(kind);
        for node in nodes {
            list.push(node)?;
        }
        Ok(list)
    }

    pub(crate) const fn from_parts(
        kind: ListKind,
        nodes: Vec<Node>,
        function_application: Option<FunctionApplication>,
    ) -> Self {
        Self {
            kind,
            nodes,
            function_application,
        }
    }

    /// Returns the list kind.
    #[must_use]
    pub const fn kind(&self) -> ListKind {
        self.kind
    }

    /// Appends a node.
    ///
    /// # Errors
    ///
    /// Returns `SqlError::InvalidArguments` if the node does not belong in a
    /// list of this kind.
    pub fn push(&mut self, node: Node) -> Result<()> {
        if !self.kind.accepts(&node) {
            return Err(SqlError::invalid(format!(
                "{} cannot hold {}",
                self.kind,
                node.node_name()
            )));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Removes and returns the node at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<Node> {
        (index < self.nodes.len()).then(|| self.nodes.remove(index))
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Returns the element at `index` mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Iterates mutably over the elements in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.nodes.iter_mut()
    }

    /// Returns the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    /// Consumes the list and returns its elements.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Returns true if both lists have the same kind and function
    /// application and their elements are pairwise equivalent.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self == other
    }

    /// Returns true if every element is a constant expression.
    #[must_use]
    pub fn is_constant_expression(&self) -> bool {
        self.nodes.iter().all(Node::is_constant_expression)
    }

    /// Returns the function applied to this index column list, if any.
    #[must_use]
    pub const fn function_application(&self) -> Option<&FunctionApplication> {
        self.function_application.as_ref()
    }

    /// Records that `function_name` is applied to `argument_count` columns
    /// starting at `first_argument`.
    ///
    /// # Errors
    ///
    /// Returns `SqlError::AmbiguousIndexFunction` if a function was already
    /// applied, and `SqlError::InvalidArguments` if this is not an index
    /// column list or the argument range falls outside it.
    pub fn apply_function(
        &mut self,
        function_name: &str,
        first_argument: usize,
        argument_count: usize,
    ) -> Result<()> {
        let function_name = function_name.trim();
        if let Some(existing) = &self.function_application {
            return Err(SqlError::AmbiguousIndexFunction {
                existing: existing.function_name.clone(),
                attempted: function_name.to_string(),
            });
        }
        if self.kind != ListKind::IndexColumns {
            return Err(SqlError::invalid(format!(
                "functions can only be applied to index columns, not {}",
                self.kind
            )));
        }
        if argument_count == 0 {
            return Err(SqlError::invalid(format!(
                "index function {function_name} needs at least one column"
            )));
        }
        let Some(last_argument) = first_argument
            .checked_add(argument_count)
            .and_then(|end| end.checked_sub(1))
        else {
            return Err(SqlError::invalid(format!(
                "index function {function_name} argument range overflows"
            )));
        };
        if last_argument >= self.nodes.len() {
            return Err(SqlError::invalid(format!(
                "index function {function_name} covers columns {first_argument}..={last_argument} \
                 of a list with {} columns",
                self.nodes.len()
            )));
        }
        self.function_application = Some(FunctionApplication {
            function_name: function_name.to_string(),
            first_argument,
            last_argument,
            argument_count,
        });
        Ok(())
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<'a> IntoIterator for &'a mut NodeList {
    type Item = &'a mut Node;
    type IntoIter = std::slice::IterMut<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ConstantNode, ConstantValue, IndexColumnNode, NodeKind};
    use crate::NodeFactory;

    fn index_column(name: &str) -> Node {
        NodeFactory::new()
            .construct(NodeKind::IndexColumn(IndexColumnNode {
                table_name: None,
                column_name: name.to_string(),
                ascending: true,
            }))
            .unwrap()
    }

    fn index_columns(names: &[&str]) -> NodeList {
        NodeList::from_nodes(
            ListKind::IndexColumns,
            names.iter().map(|name| index_column(name)),
        )
        .unwrap()
    }

    #[test]
    fn test_push_checks_category() {
        let mut list = NodeList::new(ListKind::IndexColumns);
        let constant = NodeFactory::new()
            .construct(NodeKind::Constant(ConstantNode {
                value: ConstantValue::Integer(1),
            }))
            .unwrap();
        assert!(matches!(
            list.push(constant),
            Err(SqlError::InvalidArguments(_))
        ));
        assert!(list.push(index_column("a")).is_ok());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_apply_function() {
        let mut list = index_columns(&["x", "y", "w"]);
        list.apply_function("  z_order ", 0, 2).unwrap();
        assert_eq!(
            list.function_application(),
            Some(&FunctionApplication {
                function_name: String::from("z_order"),
                first_argument: 0,
                last_argument: 1,
                argument_count: 2,
            })
        );
    }

    #[test]
    fn test_apply_function_twice() {
        let mut list = index_columns(&["x", "y"]);
        list.apply_function("f", 0, 1).unwrap();
        let err = list.apply_function("g", 1, 1).unwrap_err();
        assert_eq!(
            err,
            SqlError::AmbiguousIndexFunction {
                existing: String::from("f"),
                attempted: String::from("g"),
            }
        );
        assert!(err
            .to_string()
            .contains("Cannot use multiple functions in one index definition"));
    }

    #[test]
    fn test_apply_function_out_of_range() {
        let mut list = index_columns(&["x"]);
        assert!(matches!(
            list.apply_function("f", 0, 2),
            Err(SqlError::InvalidArguments(_))
        ));
        assert!(list.function_application().is_none());
    }

    #[test]
    fn test_apply_function_range_overflow() {
        let mut list = index_columns(&["x", "y"]);
        assert!(matches!(
            list.apply_function("f", usize::MAX, 2),
            Err(SqlError::InvalidArguments(_))
        ));
        assert!(list.function_application().is_none());
    }

    #[test]
    fn test_list_equivalence() {
        let factory = NodeFactory::new();
        let mut list = index_columns(&["x", "y", "w"]);
        list.apply_function("f", 0, 2).unwrap();

        let copy = factory.copy_list(&list);
        assert!(list.is_equivalent(&copy));
        assert_eq!(copy.len(), list.len());
        for (original, copied) in list.iter().zip(&copy) {
            assert!(original.is_equivalent(copied));
        }

        let plain = index_columns(&["x", "y", "w"]);
        assert!(!list.is_equivalent(&plain));
        assert!(!list.is_equivalent(&index_columns(&["x", "y"])));
    }
}
