//! Abstract Syntax Tree (AST) definitions.
//!
//! Every construct is a [`Node`]: a [`NodeKind`] payload plus the source
//! position and resolved data type the tree carries for it. Nodes are built
//! through [`NodeFactory`](crate::NodeFactory), which checks each payload
//! against its contract, so a tree reachable from a parse is always
//! well-formed.

mod ddl;
mod expression;
mod list;
mod query;
mod statement;
mod types;

pub use ddl::{
    AlterTableAction, AlterTableNode, ChangeType, ColumnDefinitionNode, ConstraintDefinitionNode,
    ConstraintType, CreateIndexNode, CreateSchemaNode, CreateTableNode, DdlStatement,
    DropBehavior, DropIndexNode, DropSchemaNode, DropTableNode, ExistenceCheck,
    ForeignKeyReference, IndexColumnNode, IndexDefinitionNode, ModifyColumnAction,
    ModifyColumnNode, ReferentialAction,
};
pub use expression::{
    AggregateNode, BinaryListOperator, BinaryListOperatorNode, BinaryOperator,
    BinaryOperatorNode, CastNode, ColumnReferenceNode, ConditionalNode, ConstantNode,
    ConstantValue, CurrentDatetimeNode, DatetimeField, ExtractField, ExtractOperatorNode,
    HostToSqlNode, MethodCallNode, ParameterNode, SqlToHostNode, SubqueryKind, SubqueryNode,
    TernaryOperator, TernaryOperatorNode, UnaryOperator, UnaryOperatorNode,
};
pub use list::{FunctionApplication, ListKind, NodeList};
pub use query::{
    AllResultColumnNode, FromBaseTableNode, FromSubqueryNode, JoinNode, JoinType, NullOrdering,
    OrderByColumnNode, ResultColumnNode, RowResultSetNode, SelectNode, SetOperationNode,
    SetOperator, TableName, ValuesNode,
};
pub use statement::{
    CursorNode, DeleteNode, InsertNode, SetConfigurationNode, SetConstraintsNode, SetSchemaNode,
    TransactionControlNode, TransactionOperation, UpdateNode,
};
pub use types::{DataType, DataTypeDescriptor};

use crate::error::{Result, SqlError};
use crate::lexer::Position;

/// Broad classes of nodes, used to check what may appear where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// A complete statement.
    Statement,
    /// Column, constraint or index in a table definition.
    TableElement,
    /// Column of an index definition.
    IndexColumn,
    /// An expression producing a SQL value.
    Value,
    /// A value on the host side of a routine call.
    HostValue,
    /// A query producing rows.
    ResultSet,
    /// One row of a VALUES clause.
    Row,
    /// An entry of a FROM clause.
    FromTable,
    /// A select list entry.
    ResultColumn,
    /// An ORDER BY entry.
    OrderBy,
    /// A bare object name.
    TableName,
}

/// The payload of a node.
#[derive(Debug, PartialEq)]
pub enum NodeKind {
    // Statements
    Cursor(CursorNode),
    Insert(InsertNode),
    Update(UpdateNode),
    Delete(DeleteNode),
    CreateTable(CreateTableNode),
    DropTable(DropTableNode),
    AlterTable(AlterTableNode),
    CreateIndex(CreateIndexNode),
    DropIndex(DropIndexNode),
    CreateSchema(CreateSchemaNode),
    DropSchema(DropSchemaNode),
    SetSchema(SetSchemaNode),
    SetConstraints(SetConstraintsNode),
    SetConfiguration(SetConfigurationNode),
    TransactionControl(TransactionControlNode),

    // Table elements
    ColumnDefinition(ColumnDefinitionNode),
    ConstraintDefinition(ConstraintDefinitionNode),
    IndexDefinition(IndexDefinitionNode),
    ModifyColumn(ModifyColumnNode),
    IndexColumn(IndexColumnNode),

    // Values
    Constant(ConstantNode),
    ColumnReference(ColumnReferenceNode),
    Parameter(ParameterNode),
    UnaryOperator(UnaryOperatorNode),
    ExtractOperator(ExtractOperatorNode),
    BinaryOperator(BinaryOperatorNode),
    BinaryListOperator(BinaryListOperatorNode),
    TernaryOperator(TernaryOperatorNode),
    Conditional(ConditionalNode),
    Cast(CastNode),
    Subquery(SubqueryNode),
    CurrentDatetime(CurrentDatetimeNode),
    Aggregate(AggregateNode),
    HostToSql(HostToSqlNode),
    SqlToHost(SqlToHostNode),
    MethodCall(MethodCallNode),

    // Result sets
    Select(SelectNode),
    Values(ValuesNode),
    RowResultSet(RowResultSetNode),
    SetOperation(SetOperationNode),
    ResultColumn(ResultColumnNode),
    AllResultColumn(AllResultColumnNode),
    FromBaseTable(FromBaseTableNode),
    FromSubquery(FromSubqueryNode),
    Join(JoinNode),
    OrderByColumn(OrderByColumnNode),
    TableName(TableName),
}

impl NodeKind {
    /// Returns the printed name of the node type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cursor(_) => "CursorNode",
            Self::Insert(_) => "InsertNode",
            Self::Update(_) => "UpdateNode",
            Self::Delete(_) => "DeleteNode",
            Self::CreateTable(_) => "CreateTableNode",
            Self::DropTable(_) => "DropTableNode",
            Self::AlterTable(_) => "AlterTableNode",
            Self::CreateIndex(_) => "CreateIndexNode",
            Self::DropIndex(_) => "DropIndexNode",
            Self::CreateSchema(_) => "CreateSchemaNode",
            Self::DropSchema(_) => "DropSchemaNode",
            Self::SetSchema(_) => "SetSchemaNode",
            Self::SetConstraints(_) => "SetConstraintsNode",
            Self::SetConfiguration(_) => "SetConfigurationNode",
            Self::TransactionControl(_) => "TransactionControlNode",
            Self::ColumnDefinition(_) => "ColumnDefinitionNode",
            Self::ConstraintDefinition(_) => "ConstraintDefinitionNode",
            Self::IndexDefinition(_) => "IndexDefinitionNode",
            Self::ModifyColumn(_) => "ModifyColumnNode",
            Self::IndexColumn(_) => "IndexColumnNode",
            Self::Constant(_) => "ConstantNode",
            Self::ColumnReference(_) => "ColumnReferenceNode",
            Self::Parameter(_) => "ParameterNode",
            Self::UnaryOperator(_) => "UnaryOperatorNode",
            Self::ExtractOperator(_) => "ExtractOperatorNode",
            Self::BinaryOperator(_) => "BinaryOperatorNode",
            Self::BinaryListOperator(_) => "BinaryListOperatorNode",
            Self::TernaryOperator(_) => "TernaryOperatorNode",
            Self::Conditional(_) => "ConditionalNode",
            Self::Cast(_) => "CastNode",
            Self::Subquery(_) => "SubqueryNode",
            Self::CurrentDatetime(_) => "CurrentDatetimeNode",
            Self::Aggregate(_) => "AggregateNode",
            Self::HostToSql(_) => "HostToSqlNode",
            Self::SqlToHost(_) => "SqlToHostNode",
            Self::MethodCall(_) => "MethodCallNode",
            Self::Select(_) => "SelectNode",
            Self::Values(_) => "ValuesNode",
            Self::RowResultSet(_) => "RowResultSetNode",
            Self::SetOperation(_) => "SetOperationNode",
            Self::ResultColumn(_) => "ResultColumnNode",
            Self::AllResultColumn(_) => "AllResultColumnNode",
            Self::FromBaseTable(_) => "FromBaseTableNode",
            Self::FromSubquery(_) => "FromSubqueryNode",
            Self::Join(_) => "JoinNode",
            Self::OrderByColumn(_) => "OrderByColumnNode",
            Self::TableName(_) => "TableNameNode",
        }
    }

    /// Returns the category of the node type.
    #[must_use]
    pub const fn category(&self) -> NodeCategory {
        match self {
            Self::Cursor(_)
            | Self::Insert(_)
            | Self::Update(_)
            | Self::Delete(_)
            | Self::CreateTable(_)
            | Self::DropTable(_)
            | Self::AlterTable(_)
            | Self::CreateIndex(_)
            | Self::DropIndex(_)
            | Self::CreateSchema(_)
            | Self::DropSchema(_)
            | Self::SetSchema(_)
            | Self::SetConstraints(_)
            | Self::SetConfiguration(_)
            | Self::TransactionControl(_) => NodeCategory::Statement,
            Self::ColumnDefinition(_)
            | Self::ConstraintDefinition(_)
            | Self::IndexDefinition(_)
            | Self::ModifyColumn(_) => NodeCategory::TableElement,
            Self::IndexColumn(_) => NodeCategory::IndexColumn,
            Self::Constant(_)
            | Self::ColumnReference(_)
            | Self::Parameter(_)
            | Self::UnaryOperator(_)
            | Self::ExtractOperator(_)
            | Self::BinaryOperator(_)
            | Self::BinaryListOperator(_)
            | Self::TernaryOperator(_)
            | Self::Conditional(_)
            | Self::Cast(_)
            | Self::Subquery(_)
            | Self::CurrentDatetime(_)
            | Self::Aggregate(_)
            | Self::HostToSql(_) => NodeCategory::Value,
            Self::SqlToHost(_) | Self::MethodCall(_) => NodeCategory::HostValue,
            Self::Select(_) | Self::Values(_) | Self::SetOperation(_) => NodeCategory::ResultSet,
            Self::RowResultSet(_) => NodeCategory::Row,
            Self::FromBaseTable(_) | Self::FromSubquery(_) | Self::Join(_) => {
                NodeCategory::FromTable
            }
            Self::ResultColumn(_) | Self::AllResultColumn(_) => NodeCategory::ResultColumn,
            Self::OrderByColumn(_) => NodeCategory::OrderBy,
            Self::TableName(_) => NodeCategory::TableName,
        }
    }

    /// Returns the DDL header of a DDL statement.
    #[must_use]
    pub const fn ddl(&self) -> Option<&DdlStatement> {
        match self {
            Self::CreateTable(n) => Some(&n.ddl),
            Self::DropTable(n) => Some(&n.ddl),
            Self::AlterTable(n) => Some(&n.ddl),
            Self::CreateIndex(n) => Some(&n.ddl),
            Self::DropIndex(n) => Some(&n.ddl),
            Self::CreateSchema(n) => Some(&n.ddl),
            Self::DropSchema(n) => Some(&n.ddl),
            _ => None,
        }
    }

    /// Returns the owned children with their field labels, in source order.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn children(&self) -> Vec<(&'static str, Child<'_>)> {
        let c = Children::default();
        let c = match self {
            Self::Cursor(n) => c
                .node("result_set", &n.result_set)
                .opt_list("order_by_list", n.order_by_list.as_ref())
                .opt("offset", n.offset.as_deref())
                .opt("fetch_first", n.fetch_first.as_deref()),
            Self::Insert(n) => c
                .opt_list("target_columns", n.target_columns.as_ref())
                .node("result_set", &n.result_set),
            Self::Update(n) => c
                .list("set_clause", &n.set_clause)
                .opt("where_clause", n.where_clause.as_deref()),
            Self::Delete(n) => c.opt("where_clause", n.where_clause.as_deref()),
            Self::CreateTable(n) => c.list("elements", &n.elements),
            Self::AlterTable(n) => match &n.action {
                AlterTableAction::Elements { elements, .. } => c.list("elements", elements),
                AlterTableAction::Truncate { .. } | AlterTableAction::UpdateStatistics { .. } => c,
            },
            Self::CreateIndex(n) => c.list("columns", &n.columns),
            Self::SetConstraints(n) => c.opt_list("constraints", n.constraints.as_ref()),
            Self::ColumnDefinition(n) => c.opt("default_value", n.default_value.as_deref()),
            Self::ConstraintDefinition(n) => c
                .opt_list("column_list", n.column_list.as_ref())
                .opt("check_condition", n.check_condition.as_deref())
                .opt_list(
                    "referenced_columns",
                    n.references.as_ref().and_then(|r| r.columns.as_ref()),
                ),
            Self::IndexDefinition(n) => c.list("columns", &n.columns),
            Self::ModifyColumn(n) => match &n.action {
                ModifyColumnAction::SetDefault(value) => c.node("default_value", value),
                _ => c,
            },
            Self::UnaryOperator(n) => c.node("operand", &n.operand),
            Self::ExtractOperator(n) => c.node("operand", &n.operand),
            Self::BinaryOperator(n) => c
                .node("left_operand", &n.left_operand)
                .node("right_operand", &n.right_operand),
            Self::BinaryListOperator(n) => c
                .node("left_operand", &n.left_operand)
                .list("right_operand_list", &n.right_operand_list),
            Self::TernaryOperator(n) => c
                .node("receiver", &n.receiver)
                .node("left_operand", &n.left_operand)
                .opt("right_operand", n.right_operand.as_deref()),
            Self::Conditional(n) => c
                .node("test_condition", &n.test_condition)
                .node("then_node", &n.then_node)
                .node("else_node", &n.else_node),
            Self::Cast(n) => c.node("operand", &n.operand),
            Self::Subquery(n) => c
                .opt("left_operand", n.left_operand.as_deref())
                .node("result_set", &n.result_set),
            Self::Aggregate(n) => c.opt("operand", n.operand.as_deref()),
            Self::HostToSql(n) => c.node("method_call", &n.method_call),
            Self::SqlToHost(n) => c.node("value", &n.value),
            Self::MethodCall(n) => c.list("parameters", &n.parameters),
            Self::Select(n) => c
                .list("result_columns", &n.result_columns)
                .list("from_list", &n.from_list)
                .opt("where_clause", n.where_clause.as_deref())
                .opt_list("group_by_list", n.group_by_list.as_ref())
                .opt("having_clause", n.having_clause.as_deref()),
            Self::Values(n) => c.list("rows", &n.rows),
            Self::RowResultSet(n) => c.list("values", &n.values),
            Self::SetOperation(n) => c
                .node("left_result_set", &n.left_result_set)
                .node("right_result_set", &n.right_result_set),
            Self::ResultColumn(n) => c.node("expression", &n.expression),
            Self::FromSubquery(n) => c.node("subquery", &n.subquery),
            Self::Join(n) => c
                .node("left_result_set", &n.left_result_set)
                .node("right_result_set", &n.right_result_set)
                .opt("join_clause", n.join_clause.as_deref())
                .opt_list("using_clause", n.using_clause.as_ref()),
            Self::OrderByColumn(n) => c.node("expression", &n.expression),
            Self::DropTable(_)
            | Self::DropIndex(_)
            | Self::CreateSchema(_)
            | Self::DropSchema(_)
            | Self::SetSchema(_)
            | Self::SetConfiguration(_)
            | Self::TransactionControl(_)
            | Self::IndexColumn(_)
            | Self::Constant(_)
            | Self::ColumnReference(_)
            | Self::Parameter(_)
            | Self::CurrentDatetime(_)
            | Self::AllResultColumn(_)
            | Self::FromBaseTable(_)
            | Self::TableName(_) => c,
        };
        c.0
    }

    /// Returns the owned children mutably, in source order.
    #[allow(clippy::too_many_lines)]
    pub fn children_mut(&mut self) -> Vec<ChildMut<'_>> {
        let c = ChildrenMut::default();
        let c = match self {
            Self::Cursor(CursorNode {
                result_set,
                order_by_list,
                offset,
                fetch_first,
                ..
            }) => c
                .node(result_set)
                .opt_list(order_by_list.as_mut())
                .opt(offset.as_deref_mut())
                .opt(fetch_first.as_deref_mut()),
            Self::Insert(InsertNode {
                target_columns,
                result_set,
                ..
            }) => c.opt_list(target_columns.as_mut()).node(result_set),
            Self::Update(UpdateNode {
                set_clause,
                where_clause,
                ..
            }) => c.list(set_clause).opt(where_clause.as_deref_mut()),
            Self::Delete(n) => c.opt(n.where_clause.as_deref_mut()),
            Self::CreateTable(n) => c.list(&mut n.elements),
            Self::AlterTable(n) => match &mut n.action {
                AlterTableAction::Elements { elements, .. } => c.list(elements),
                AlterTableAction::Truncate { .. } | AlterTableAction::UpdateStatistics { .. } => c,
            },
            Self::CreateIndex(n) => c.list(&mut n.columns),
            Self::SetConstraints(n) => c.opt_list(n.constraints.as_mut()),
            Self::ColumnDefinition(n) => c.opt(n.default_value.as_deref_mut()),
            Self::ConstraintDefinition(ConstraintDefinitionNode {
                column_list,
                check_condition,
                references,
                ..
            }) => c
                .opt_list(column_list.as_mut())
                .opt(check_condition.as_deref_mut())
                .opt_list(references.as_mut().and_then(|r| r.columns.as_mut())),
            Self::IndexDefinition(n) => c.list(&mut n.columns),
            Self::ModifyColumn(n) => match &mut n.action {
                ModifyColumnAction::SetDefault(value) => c.node(value),
                _ => c,
            },
            Self::UnaryOperator(n) => c.node(&mut n.operand),
            Self::ExtractOperator(n) => c.node(&mut n.operand),
            Self::BinaryOperator(BinaryOperatorNode {
                left_operand,
                right_operand,
                ..
            }) => c.node(left_operand).node(right_operand),
            Self::BinaryListOperator(BinaryListOperatorNode {
                left_operand,
                right_operand_list,
                ..
            }) => c.node(left_operand).list(right_operand_list),
            Self::TernaryOperator(TernaryOperatorNode {
                receiver,
                left_operand,
                right_operand,
                ..
            }) => c
                .node(receiver)
                .node(left_operand)
                .opt(right_operand.as_deref_mut()),
            Self::Conditional(ConditionalNode {
                test_condition,
                then_node,
                else_node,
            }) => c.node(test_condition).node(then_node).node(else_node),
            Self::Cast(n) => c.node(&mut n.operand),
            Self::Subquery(SubqueryNode {
                result_set,
                left_operand,
                ..
            }) => c.opt(left_operand.as_deref_mut()).node(result_set),
            Self::Aggregate(n) => c.opt(n.operand.as_deref_mut()),
            Self::HostToSql(n) => c.node(&mut n.method_call),
            Self::SqlToHost(n) => c.node(&mut n.value),
            Self::MethodCall(n) => c.list(&mut n.parameters),
            Self::Select(SelectNode {
                result_columns,
                from_list,
                where_clause,
                group_by_list,
                having_clause,
                ..
            }) => c
                .list(result_columns)
                .list(from_list)
                .opt(where_clause.as_deref_mut())
                .opt_list(group_by_list.as_mut())
                .opt(having_clause.as_deref_mut()),
            Self::Values(n) => c.list(&mut n.rows),
            Self::RowResultSet(n) => c.list(&mut n.values),
            Self::SetOperation(SetOperationNode {
                left_result_set,
                right_result_set,
                ..
            }) => c.node(left_result_set).node(right_result_set),
            Self::ResultColumn(n) => c.node(&mut n.expression),
            Self::FromSubquery(n) => c.node(&mut n.subquery),
            Self::Join(JoinNode {
                left_result_set,
                right_result_set,
                join_clause,
                using_clause,
                ..
            }) => c
                .node(left_result_set)
                .node(right_result_set)
                .opt(join_clause.as_deref_mut())
                .opt_list(using_clause.as_mut()),
            Self::OrderByColumn(n) => c.node(&mut n.expression),
            Self::DropTable(_)
            | Self::DropIndex(_)
            | Self::CreateSchema(_)
            | Self::DropSchema(_)
            | Self::SetSchema(_)
            | Self::SetConfiguration(_)
            | Self::TransactionControl(_)
            | Self::IndexColumn(_)
            | Self::Constant(_)
            | Self::ColumnReference(_)
            | Self::Parameter(_)
            | Self::CurrentDatetime(_)
            | Self::AllResultColumn(_)
            | Self::FromBaseTable(_)
            | Self::TableName(_) => c,
        };
        c.0
    }
}

/// A borrowed child of a node.
#[derive(Debug, Clone, Copy)]
pub enum Child<'a> {
    Node(&'a Node),
    List(&'a NodeList),
}

/// A mutably borrowed child of a node.
#[derive(Debug)]
pub enum ChildMut<'a> {
    Node(&'a mut Node),
    List(&'a mut NodeList),
}

#[derive(Default)]
struct Children<'a>(Vec<(&'static str, Child<'a>)>);

impl<'a> Children<'a> {
    fn node(mut self, label: &'static str, node: &'a Node) -> Self {
        self.0.push((label, Child::Node(node)));
        self
    }

    fn opt(self, label: &'static str, node: Option<&'a Node>) -> Self {
        match node {
            Some(node) => self.node(label, node),
            None => self,
        }
    }

    fn list(mut self, label: &'static str, list: &'a NodeList) -> Self {
        self.0.push((label, Child::List(list)));
        self
    }

    fn opt_list(self, label: &'static str, list: Option<&'a NodeList>) -> Self {
        match list {
            Some(list) => self.list(label, list),
            None => self,
        }
    }
}

#[derive(Default)]
struct ChildrenMut<'a>(Vec<ChildMut<'a>>);

impl<'a> ChildrenMut<'a> {
    fn node(mut self, node: &'a mut Node) -> Self {
        self.0.push(ChildMut::Node(node));
        self
    }

    fn opt(self, node: Option<&'a mut Node>) -> Self {
        match node {
            Some(node) => self.node(node),
            None => self,
        }
    }

    fn list(mut self, list: &'a mut NodeList) -> Self {
        self.0.push(ChildMut::List(list));
        self
    }

    fn opt_list(self, list: Option<&'a mut NodeList>) -> Self {
        match list {
            Some(list) => self.list(list),
            None => self,
        }
    }
}

/// A node of the statement tree.
///
/// Equality compares structure only: positions and resolved types are
/// ignored, so a copy is equal to its original.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    position: Option<Position>,
    data_type: Option<DataTypeDescriptor>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Node {
    pub(crate) const fn from_parts(
        kind: NodeKind,
        position: Option<Position>,
        data_type: Option<DataTypeDescriptor>,
    ) -> Self {
        Self {
            kind,
            position,
            data_type,
        }
    }

    /// Returns the payload.
    #[must_use]
    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the payload mutably, for rewriting passes.
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Consumes the node and returns its payload.
    #[must_use]
    pub fn into_kind(self) -> NodeKind {
        self.kind
    }

    /// Source position, when the node came from statement text.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    #[must_use]
    pub fn begin_offset(&self) -> Option<usize> {
        self.position.map(|p| p.begin_offset)
    }

    #[must_use]
    pub fn end_offset(&self) -> Option<usize> {
        self.position.map(|p| p.end_offset)
    }

    pub fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    /// Returns the printed name of the node type.
    #[must_use]
    pub const fn node_name(&self) -> &'static str {
        self.kind.name()
    }

    #[must_use]
    pub const fn category(&self) -> NodeCategory {
        self.kind.category()
    }

    #[must_use]
    pub fn is_statement(&self) -> bool {
        self.category() == NodeCategory::Statement
    }

    #[must_use]
    pub fn is_value(&self) -> bool {
        self.category() == NodeCategory::Value
    }

    #[must_use]
    pub fn is_result_set(&self) -> bool {
        self.category() == NodeCategory::ResultSet
    }

    /// Resolved data type of a value.
    ///
    /// Host values report the type of the SQL value they wrap.
    #[must_use]
    pub fn data_type(&self) -> Option<&DataTypeDescriptor> {
        match &self.kind {
            NodeKind::SqlToHost(n) => n.value.data_type(),
            _ => self.data_type.as_ref(),
        }
    }

    /// Records the resolved data type of a value.
    ///
    /// # Errors
    ///
    /// Returns `SqlError::InvalidArguments` if the node is not a value.
    pub fn set_data_type(&mut self, data_type: DataTypeDescriptor) -> Result<()> {
        if !self.is_value() {
            return Err(SqlError::invalid(format!(
                "{} does not carry a data type",
                self.node_name()
            )));
        }
        self.data_type = Some(data_type);
        Ok(())
    }

    pub(crate) const fn own_data_type(&self) -> Option<&DataTypeDescriptor> {
        self.data_type.as_ref()
    }

    /// Returns true if the value can be computed without reading any row or
    /// parameter.
    #[must_use]
    pub fn is_constant_expression(&self) -> bool {
        match &self.kind {
            NodeKind::Constant(_) => true,
            NodeKind::UnaryOperator(n) => n.operand.is_constant_expression(),
            NodeKind::ExtractOperator(n) => n.operand.is_constant_expression(),
            NodeKind::Cast(n) => n.operand.is_constant_expression(),
            NodeKind::BinaryOperator(n) => {
                n.left_operand.is_constant_expression() && n.right_operand.is_constant_expression()
            }
            NodeKind::BinaryListOperator(n) => {
                n.left_operand.is_constant_expression()
                    && n.right_operand_list.is_constant_expression()
            }
            NodeKind::TernaryOperator(n) => {
                n.receiver.is_constant_expression()
                    && n.left_operand.is_constant_expression()
                    && n
                        .right_operand
                        .as_ref()
                        .map_or(true, |r| r.is_constant_expression())
            }
            NodeKind::Conditional(n) => {
                n.test_condition.is_constant_expression()
                    && n.then_node.is_constant_expression()
                    && n.else_node.is_constant_expression()
            }
            NodeKind::SqlToHost(n) => n.value.is_constant_expression(),
            _ => false,
        }
    }

    /// Returns the literal value of a constant, looking through host value
    /// wrappers.
    #[must_use]
    pub fn constant_value(&self) -> Option<&ConstantValue> {
        match &self.kind {
            NodeKind::Constant(n) => Some(&n.value),
            NodeKind::SqlToHost(n) => n.value.constant_value(),
            _ => None,
        }
    }

    /// Returns true if the statement must run as a single atomic unit.
    #[must_use]
    pub const fn is_atomic(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Insert(_)
                | NodeKind::Update(_)
                | NodeKind::Delete(_)
                | NodeKind::CreateTable(_)
                | NodeKind::DropTable(_)
                | NodeKind::AlterTable(_)
                | NodeKind::CreateIndex(_)
                | NodeKind::DropIndex(_)
                | NodeKind::CreateSchema(_)
                | NodeKind::DropSchema(_)
        )
    }

    /// Returns the statement type name, e.g. `CREATE TABLE`.
    #[must_use]
    pub const fn statement_to_string(&self) -> Option<&'static str> {
        let name = match &self.kind {
            NodeKind::Cursor(_) => "SELECT",
            NodeKind::Insert(_) => "INSERT",
            NodeKind::Update(_) => "UPDATE",
            NodeKind::Delete(_) => "DELETE",
            NodeKind::CreateTable(_) => "CREATE TABLE",
            NodeKind::DropTable(_) => "DROP TABLE",
            NodeKind::AlterTable(AlterTableNode {
                action: AlterTableAction::Truncate { .. },
                ..
            }) => "TRUNCATE TABLE",
            NodeKind::AlterTable(_) => "ALTER TABLE",
            NodeKind::CreateIndex(_) => "CREATE INDEX",
            NodeKind::DropIndex(_) => "DROP INDEX",
            NodeKind::CreateSchema(_) => "CREATE SCHEMA",
            NodeKind::DropSchema(_) => "DROP SCHEMA",
            NodeKind::SetSchema(_) => "SET SCHEMA",
            NodeKind::SetConstraints(_) => "SET CONSTRAINTS",
            NodeKind::SetConfiguration(_) => "SET CONFIGURATION",
            NodeKind::TransactionControl(n) => n.operation.as_str(),
            _ => return None,
        };
        Some(name)
    }

    /// Returns true if both trees have the same structure and values,
    /// regardless of positions and resolved types.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self == other
    }
}
