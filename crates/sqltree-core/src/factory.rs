//! Node construction and copying.
//!
//! [`NodeFactory`] is the only way to create a [`Node`]. Construction checks
//! the payload against the contract of its node type, so every tree built by
//! the parser, or by a pass that goes through the factory, is well-formed.

use tracing::trace;

use crate::ast::{
    AggregateNode, AllResultColumnNode, AlterTableAction, AlterTableNode, BinaryListOperator,
    BinaryListOperatorNode, BinaryOperatorNode, CastNode, ColumnDefinitionNode,
    ColumnReferenceNode, ConditionalNode, ConstantNode, ConstraintDefinitionNode, ConstraintType,
    CreateIndexNode, CreateSchemaNode, CreateTableNode, CurrentDatetimeNode, CursorNode,
    DeleteNode, DropIndexNode, DropSchemaNode, DropTableNode, ExtractOperatorNode,
    ForeignKeyReference, FromBaseTableNode, FromSubqueryNode, HostToSqlNode, IndexColumnNode,
    IndexDefinitionNode, InsertNode, JoinNode, JoinType, ListKind, MethodCallNode,
    ModifyColumnAction, ModifyColumnNode, Node, NodeCategory, NodeKind, NodeList,
    OrderByColumnNode, ParameterNode, ResultColumnNode, RowResultSetNode, SelectNode,
    SetConfigurationNode, SetConstraintsNode, SetOperationNode, SetSchemaNode, SqlToHostNode,
    SubqueryNode, TableName, TernaryOperatorNode, TransactionControlNode, UnaryOperatorNode,
    UpdateNode, ValuesNode,
};
use crate::error::{Result, SqlError};
use crate::lexer::Position;

/// Creates and copies nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeFactory;

impl NodeFactory {
    /// Creates a factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates a node with no source position.
    ///
    /// # Errors
    ///
    /// Returns `SqlError::InvalidArguments` if the payload breaks the
    /// contract of its node type.
    pub fn construct(&self, kind: NodeKind) -> Result<Node> {
        self.build(kind, None)
    }

    /// Creates a node covering `position` in the statement text.
    ///
    /// # Errors
    ///
    /// Returns `SqlError::InvalidArguments` if the payload breaks the
    /// contract of its node type.
    pub fn construct_at(&self, kind: NodeKind, position: Position) -> Result<Node> {
        self.build(kind, Some(position))
    }

    fn build(&self, kind: NodeKind, position: Option<Position>) -> Result<Node> {
        validate(&kind)?;
        let data_type = match &kind {
            NodeKind::Cast(cast) => Some(cast.target_type.clone()),
            _ => None,
        };
        trace!(node = kind.name(), ?position, "constructed node");
        Ok(Node::from_parts(kind, position, data_type))
    }

    /// Deep-copies a tree.
    ///
    /// The copy is equivalent to the original and shares nothing with it.
    /// Resolved data types are kept; source positions are not.
    #[must_use]
    pub fn copy(&self, node: &Node) -> Node {
        Node::from_parts(
            self.copy_kind(node.kind()),
            None,
            node.own_data_type().cloned(),
        )
    }

    /// Deep-copies a list, including its function application.
    #[must_use]
    pub fn copy_list(&self, list: &NodeList) -> NodeList {
        // Elements are copied as they are; a visitor may have placed nodes the
        // list would not accept through `push`.
        NodeList::from_parts(
            list.kind(),
            list.iter().map(|node| self.copy(node)).collect(),
            list.function_application().cloned(),
        )
    }

    fn copy_box(&self, node: &Node) -> Box<Node> {
        Box::new(self.copy(node))
    }

    fn copy_opt(&self, node: Option<&Node>) -> Option<Box<Node>> {
        node.map(|node| self.copy_box(node))
    }

    fn copy_opt_list(&self, list: Option<&NodeList>) -> Option<NodeList> {
        list.map(|list| self.copy_list(list))
    }

    #[allow(clippy::too_many_lines)]
    fn copy_kind(&self, kind: &NodeKind) -> NodeKind {
        match kind {
            NodeKind::Cursor(n) => NodeKind::Cursor(CursorNode {
                name: n.name.clone(),
                result_set: self.copy_box(&n.result_set),
                order_by_list: self.copy_opt_list(n.order_by_list.as_ref()),
                offset: self.copy_opt(n.offset.as_deref()),
                fetch_first: self.copy_opt(n.fetch_first.as_deref()),
            }),
            NodeKind::Insert(n) => NodeKind::Insert(InsertNode {
                target_table: n.target_table.clone(),
                target_columns: self.copy_opt_list(n.target_columns.as_ref()),
                result_set: self.copy_box(&n.result_set),
            }),
            NodeKind::Update(n) => NodeKind::Update(UpdateNode {
                target_table: n.target_table.clone(),
                correlation_name: n.correlation_name.clone(),
                set_clause: self.copy_list(&n.set_clause),
                where_clause: self.copy_opt(n.where_clause.as_deref()),
            }),
            NodeKind::Delete(n) => NodeKind::Delete(DeleteNode {
                target_table: n.target_table.clone(),
                correlation_name: n.correlation_name.clone(),
                where_clause: self.copy_opt(n.where_clause.as_deref()),
            }),
            NodeKind::CreateTable(n) => NodeKind::CreateTable(CreateTableNode {
                ddl: n.ddl.clone(),
                elements: self.copy_list(&n.elements),
                existence_check: n.existence_check,
            }),
            NodeKind::DropTable(n) => NodeKind::DropTable(DropTableNode {
                ddl: n.ddl.clone(),
                behavior: n.behavior,
                existence_check: n.existence_check,
            }),
            NodeKind::AlterTable(n) => NodeKind::AlterTable(AlterTableNode {
                ddl: n.ddl.clone(),
                action: match &n.action {
                    AlterTableAction::Elements {
                        change_type,
                        elements,
                        behavior,
                    } => AlterTableAction::Elements {
                        change_type: *change_type,
                        elements: self.copy_list(elements),
                        behavior: *behavior,
                    },
                    AlterTableAction::Truncate { behavior } => AlterTableAction::Truncate {
                        behavior: *behavior,
                    },
                    AlterTableAction::UpdateStatistics { all, index_name } => {
                        AlterTableAction::UpdateStatistics {
                            all: *all,
                            index_name: index_name.clone(),
                        }
                    }
                },
                existence_check: n.existence_check,
            }),
            NodeKind::CreateIndex(n) => NodeKind::CreateIndex(CreateIndexNode {
                ddl: n.ddl.clone(),
                table_name: n.table_name.clone(),
                unique: n.unique,
                columns: self.copy_list(&n.columns),
                join_type: n.join_type,
                existence_check: n.existence_check,
            }),
            NodeKind::DropIndex(n) => NodeKind::DropIndex(DropIndexNode {
                ddl: n.ddl.clone(),
                table_name: n.table_name.clone(),
                existence_check: n.existence_check,
            }),
            NodeKind::CreateSchema(n) => NodeKind::CreateSchema(CreateSchemaNode {
                ddl: n.ddl.clone(),
                existence_check: n.existence_check,
            }),
            NodeKind::DropSchema(n) => NodeKind::DropSchema(DropSchemaNode {
                ddl: n.ddl.clone(),
                behavior: n.behavior,
                existence_check: n.existence_check,
            }),
            NodeKind::SetSchema(n) => NodeKind::SetSchema(SetSchemaNode {
                schema_name: n.schema_name.clone(),
            }),
            NodeKind::SetConstraints(n) => NodeKind::SetConstraints(SetConstraintsNode {
                all: n.all,
                constraints: self.copy_opt_list(n.constraints.as_ref()),
                deferred: n.deferred,
            }),
            NodeKind::SetConfiguration(n) => NodeKind::SetConfiguration(SetConfigurationNode {
                variable: n.variable.clone(),
                value: n.value.clone(),
            }),
            NodeKind::TransactionControl(n) => {
                NodeKind::TransactionControl(TransactionControlNode {
                    operation: n.operation,
                })
            }
            NodeKind::ColumnDefinition(n) => NodeKind::ColumnDefinition(ColumnDefinitionNode {
                name: n.name.clone(),
                data_type: n.data_type.clone(),
                default_value: self.copy_opt(n.default_value.as_deref()),
                auto_increment: n.auto_increment,
            }),
            NodeKind::ConstraintDefinition(n) => {
                NodeKind::ConstraintDefinition(ConstraintDefinitionNode {
                    name: n.name.clone(),
                    constraint_type: n.constraint_type,
                    properties: n.properties.clone(),
                    column_list: self.copy_opt_list(n.column_list.as_ref()),
                    constraint_text: n.constraint_text.clone(),
                    check_condition: self.copy_opt(n.check_condition.as_deref()),
                    references: n.references.as_ref().map(|r| ForeignKeyReference {
                        table_name: r.table_name.clone(),
                        columns: self.copy_opt_list(r.columns.as_ref()),
                        on_delete: r.on_delete,
                        on_update: r.on_update,
                    }),
                    behavior: n.behavior,
                    verify_type: n.verify_type,
                })
            }
            NodeKind::IndexDefinition(n) => NodeKind::IndexDefinition(IndexDefinitionNode {
                name: n.name.clone(),
                unique: n.unique,
                columns: self.copy_list(&n.columns),
                join_type: n.join_type,
            }),
            NodeKind::ModifyColumn(n) => NodeKind::ModifyColumn(ModifyColumnNode {
                column_name: n.column_name.clone(),
                action: match &n.action {
                    ModifyColumnAction::Drop { behavior } => ModifyColumnAction::Drop {
                        behavior: *behavior,
                    },
                    ModifyColumnAction::SetDefault(value) => {
                        ModifyColumnAction::SetDefault(self.copy_box(value))
                    }
                    ModifyColumnAction::DropDefault => ModifyColumnAction::DropDefault,
                    ModifyColumnAction::SetNotNull => ModifyColumnAction::SetNotNull,
                    ModifyColumnAction::SetNull => ModifyColumnAction::SetNull,
                    ModifyColumnAction::SetDataType(ty) => {
                        ModifyColumnAction::SetDataType(ty.clone())
                    }
                },
            }),
            NodeKind::IndexColumn(n) => NodeKind::IndexColumn(IndexColumnNode {
                table_name: n.table_name.clone(),
                column_name: n.column_name.clone(),
                ascending: n.ascending,
            }),
            NodeKind::Constant(n) => NodeKind::Constant(ConstantNode {
                value: n.value.clone(),
            }),
            NodeKind::ColumnReference(n) => NodeKind::ColumnReference(ColumnReferenceNode {
                table_name: n.table_name.clone(),
                column_name: n.column_name.clone(),
            }),
            NodeKind::Parameter(n) => NodeKind::Parameter(ParameterNode { number: n.number }),
            NodeKind::UnaryOperator(n) => NodeKind::UnaryOperator(UnaryOperatorNode {
                operator: n.operator,
                operand: self.copy_box(&n.operand),
            }),
            NodeKind::ExtractOperator(n) => NodeKind::ExtractOperator(ExtractOperatorNode {
                field: n.field,
                operand: self.copy_box(&n.operand),
            }),
            NodeKind::BinaryOperator(n) => NodeKind::BinaryOperator(BinaryOperatorNode {
                operator: n.operator,
                left_operand: self.copy_box(&n.left_operand),
                right_operand: self.copy_box(&n.right_operand),
            }),
            NodeKind::BinaryListOperator(n) => {
                NodeKind::BinaryListOperator(BinaryListOperatorNode {
                    operator: n.operator,
                    left_operand: self.copy_box(&n.left_operand),
                    right_operand_list: self.copy_list(&n.right_operand_list),
                })
            }
            NodeKind::TernaryOperator(n) => NodeKind::TernaryOperator(TernaryOperatorNode {
                operator: n.operator,
                receiver: self.copy_box(&n.receiver),
                left_operand: self.copy_box(&n.left_operand),
                right_operand: self.copy_opt(n.right_operand.as_deref()),
            }),
            NodeKind::Conditional(n) => NodeKind::Conditional(ConditionalNode {
                test_condition: self.copy_box(&n.test_condition),
                then_node: self.copy_box(&n.then_node),
                else_node: self.copy_box(&n.else_node),
            }),
            NodeKind::Cast(n) => NodeKind::Cast(CastNode {
                operand: self.copy_box(&n.operand),
                target_type: n.target_type.clone(),
            }),
            NodeKind::Subquery(n) => NodeKind::Subquery(SubqueryNode {
                kind: n.kind,
                result_set: self.copy_box(&n.result_set),
                left_operand: self.copy_opt(n.left_operand.as_deref()),
            }),
            NodeKind::CurrentDatetime(n) => {
                NodeKind::CurrentDatetime(CurrentDatetimeNode { field: n.field })
            }
            NodeKind::Aggregate(n) => NodeKind::Aggregate(AggregateNode {
                name: n.name.clone(),
                operand: self.copy_opt(n.operand.as_deref()),
                distinct: n.distinct,
            }),
            NodeKind::HostToSql(n) => NodeKind::HostToSql(HostToSqlNode {
                method_call: self.copy_box(&n.method_call),
            }),
            NodeKind::SqlToHost(n) => NodeKind::SqlToHost(SqlToHostNode {
                value: self.copy_box(&n.value),
            }),
            NodeKind::MethodCall(n) => NodeKind::MethodCall(MethodCallNode {
                schema_name: n.schema_name.clone(),
                method_name: n.method_name.clone(),
                parameters: self.copy_list(&n.parameters),
            }),
            NodeKind::Select(n) => NodeKind::Select(SelectNode {
                distinct: n.distinct,
                result_columns: self.copy_list(&n.result_columns),
                from_list: self.copy_list(&n.from_list),
                where_clause: self.copy_opt(n.where_clause.as_deref()),
                group_by_list: self.copy_opt_list(n.group_by_list.as_ref()),
                having_clause: self.copy_opt(n.having_clause.as_deref()),
            }),
            NodeKind::Values(n) => NodeKind::Values(ValuesNode {
                rows: self.copy_list(&n.rows),
            }),
            NodeKind::RowResultSet(n) => NodeKind::RowResultSet(RowResultSetNode {
                values: self.copy_list(&n.values),
            }),
            NodeKind::SetOperation(n) => NodeKind::SetOperation(SetOperationNode {
                operator: n.operator,
                all: n.all,
                left_result_set: self.copy_box(&n.left_result_set),
                right_result_set: self.copy_box(&n.right_result_set),
            }),
            NodeKind::ResultColumn(n) => NodeKind::ResultColumn(ResultColumnNode {
                name: n.name.clone(),
                expression: self.copy_box(&n.expression),
            }),
            NodeKind::AllResultColumn(n) => NodeKind::AllResultColumn(AllResultColumnNode {
                table_name: n.table_name.clone(),
            }),
            NodeKind::FromBaseTable(n) => NodeKind::FromBaseTable(FromBaseTableNode {
                table_name: n.table_name.clone(),
                correlation_name: n.correlation_name.clone(),
            }),
            NodeKind::FromSubquery(n) => NodeKind::FromSubquery(FromSubqueryNode {
                subquery: self.copy_box(&n.subquery),
                correlation_name: n.correlation_name.clone(),
            }),
            NodeKind::Join(n) => NodeKind::Join(JoinNode {
                join_type: n.join_type,
                left_result_set: self.copy_box(&n.left_result_set),
                right_result_set: self.copy_box(&n.right_result_set),
                join_clause: self.copy_opt(n.join_clause.as_deref()),
                using_clause: self.copy_opt_list(n.using_clause.as_ref()),
            }),
            NodeKind::OrderByColumn(n) => NodeKind::OrderByColumn(OrderByColumnNode {
                expression: self.copy_box(&n.expression),
                ascending: n.ascending,
                nulls: n.nulls,
            }),
            NodeKind::TableName(n) => NodeKind::TableName(n.clone()),
        }
    }
}

fn invalid<T>(message: impl Into<String>) -> Result<T> {
    Err(SqlError::invalid(message))
}

fn require_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return invalid(format!("{what} must not be empty"));
    }
    Ok(())
}

fn require_table_name(name: &TableName, what: &str) -> Result<()> {
    require_name(&name.table_name, what)?;
    if let Some(schema) = &name.schema_name {
        require_name(schema, "schema name")?;
    }
    Ok(())
}

fn require_category(node: &Node, category: NodeCategory, what: &str) -> Result<()> {
    if node.category() != category {
        return invalid(format!(
            "{what} must be a {category:?} node, not {}",
            node.node_name()
        ));
    }
    Ok(())
}

fn require_value(node: &Node, what: &str) -> Result<()> {
    require_category(node, NodeCategory::Value, what)
}

fn require_opt_value(node: Option<&Node>, what: &str) -> Result<()> {
    node.map_or(Ok(()), |node| require_value(node, what))
}

fn require_list(list: &NodeList, kind: ListKind, what: &str) -> Result<()> {
    if list.kind() != kind {
        return invalid(format!("{what} must be a {kind}, not a {}", list.kind()));
    }
    Ok(())
}

fn require_non_empty_list(list: &NodeList, kind: ListKind, what: &str) -> Result<()> {
    require_list(list, kind, what)?;
    if list.is_empty() {
        return invalid(format!("{what} must not be empty"));
    }
    Ok(())
}

fn require_opt_list(list: Option<&NodeList>, kind: ListKind, what: &str) -> Result<()> {
    list.map_or(Ok(()), |list| require_non_empty_list(list, kind, what))
}

/// Checks a payload against the contract of its node type.
#[allow(clippy::too_many_lines)]
fn validate(kind: &NodeKind) -> Result<()> {
    match kind {
        NodeKind::Cursor(n) => {
            require_category(&n.result_set, NodeCategory::ResultSet, "cursor query")?;
            require_opt_list(n.order_by_list.as_ref(), ListKind::OrderBy, "ORDER BY list")?;
            require_opt_value(n.offset.as_deref(), "OFFSET")?;
            require_opt_value(n.fetch_first.as_deref(), "FETCH FIRST")
        }
        NodeKind::Insert(n) => {
            require_table_name(&n.target_table, "insert target")?;
            require_opt_list(
                n.target_columns.as_ref(),
                ListKind::ColumnReferences,
                "insert column list",
            )?;
            require_category(&n.result_set, NodeCategory::ResultSet, "insert source")
        }
        NodeKind::Update(n) => {
            require_table_name(&n.target_table, "update target")?;
            require_non_empty_list(&n.set_clause, ListKind::ResultColumns, "SET clause")?;
            for assignment in &n.set_clause {
                match assignment.kind() {
                    NodeKind::ResultColumn(ResultColumnNode { name: Some(_), .. }) => {}
                    _ => return invalid("SET clause entries must name their column"),
                }
            }
            require_opt_value(n.where_clause.as_deref(), "WHERE clause")
        }
        NodeKind::Delete(n) => {
            require_table_name(&n.target_table, "delete target")?;
            require_opt_value(n.where_clause.as_deref(), "WHERE clause")
        }
        NodeKind::CreateTable(n) => {
            require_table_name(&n.ddl.object_name, "table name")?;
            require_non_empty_list(&n.elements, ListKind::TableElements, "table element list")
        }
        NodeKind::DropTable(n) => require_table_name(&n.ddl.object_name, "table name"),
        NodeKind::AlterTable(n) => {
            require_table_name(&n.ddl.object_name, "table name")?;
            match &n.action {
                AlterTableAction::Elements { elements, .. } => {
                    require_non_empty_list(elements, ListKind::TableElements, "table element list")
                }
                AlterTableAction::Truncate { .. } => Ok(()),
                AlterTableAction::UpdateStatistics { all, index_name } => {
                    match (all, index_name) {
                        (true, None) => Ok(()),
                        (false, Some(name)) => require_name(name, "index name"),
                        (true, Some(_)) => {
                            invalid("statistics update names an index and ALL at once")
                        }
                        (false, None) => invalid("statistics update needs an index or ALL"),
                    }
                }
            }
        }
        NodeKind::CreateIndex(n) => {
            require_table_name(&n.ddl.object_name, "index name")?;
            require_table_name(&n.table_name, "indexed table")?;
            require_index_columns(&n.columns, n.join_type)
        }
        NodeKind::DropIndex(n) => {
            require_table_name(&n.ddl.object_name, "index name")?;
            n.table_name
                .as_ref()
                .map_or(Ok(()), |t| require_table_name(t, "table name"))
        }
        NodeKind::CreateSchema(n) => require_table_name(&n.ddl.object_name, "schema name"),
        NodeKind::DropSchema(n) => require_table_name(&n.ddl.object_name, "schema name"),
        NodeKind::SetSchema(n) => require_name(&n.schema_name, "schema name"),
        NodeKind::SetConstraints(n) => match (n.all, &n.constraints) {
            (true, None) => Ok(()),
            (false, Some(names)) => {
                require_non_empty_list(names, ListKind::TableNames, "constraint list")
            }
            (true, Some(_)) => invalid("SET CONSTRAINTS ALL cannot also name constraints"),
            (false, None) => invalid("SET CONSTRAINTS needs ALL or a constraint list"),
        },
        NodeKind::SetConfiguration(n) => require_name(&n.variable, "configuration variable"),
        NodeKind::TransactionControl(_)
        | NodeKind::Constant(_)
        | NodeKind::Parameter(_)
        | NodeKind::CurrentDatetime(_) => Ok(()),
        NodeKind::ColumnDefinition(n) => {
            require_name(&n.name, "column name")?;
            require_opt_value(n.default_value.as_deref(), "column default")
        }
        NodeKind::ConstraintDefinition(n) => validate_constraint(n),
        NodeKind::IndexDefinition(n) => require_index_columns(&n.columns, n.join_type),
        NodeKind::ModifyColumn(n) => {
            require_name(&n.column_name, "column name")?;
            match &n.action {
                ModifyColumnAction::SetDefault(value) => require_value(value, "column default"),
                _ => Ok(()),
            }
        }
        NodeKind::IndexColumn(n) => require_name(&n.column_name, "index column name"),
        NodeKind::ColumnReference(n) => require_name(&n.column_name, "column name"),
        NodeKind::UnaryOperator(n) => require_value(&n.operand, n.operator.as_str()),
        NodeKind::ExtractOperator(n) => require_value(&n.operand, n.field.operator()),
        NodeKind::BinaryOperator(n) => {
            require_value(&n.left_operand, "left operand")?;
            require_value(&n.right_operand, "right operand")
        }
        NodeKind::BinaryListOperator(n) => {
            require_value(&n.left_operand, "left operand")?;
            require_non_empty_list(
                &n.right_operand_list,
                ListKind::Values,
                n.operator.as_str(),
            )?;
            let between = matches!(
                n.operator,
                BinaryListOperator::Between | BinaryListOperator::NotBetween
            );
            if between && n.right_operand_list.len() != 2 {
                return invalid(format!(
                    "{} needs exactly two bounds, got {}",
                    n.operator.as_str(),
                    n.right_operand_list.len()
                ));
            }
            Ok(())
        }
        NodeKind::TernaryOperator(n) => {
            require_value(&n.receiver, "receiver")?;
            require_value(&n.left_operand, "left operand")?;
            require_opt_value(n.right_operand.as_deref(), "right operand")
        }
        NodeKind::Conditional(n) => {
            require_value(&n.test_condition, "WHEN condition")?;
            require_value(&n.then_node, "THEN result")?;
            require_value(&n.else_node, "ELSE result")
        }
        NodeKind::Cast(n) => require_value(&n.operand, "CAST operand"),
        NodeKind::Subquery(n) => {
            require_category(&n.result_set, NodeCategory::ResultSet, "subquery")?;
            match (n.kind.has_left_operand(), n.left_operand.as_deref()) {
                (true, Some(left)) => require_value(left, "subquery left operand"),
                (false, None) => Ok(()),
                (true, None) => invalid(format!("{} subquery needs a left operand", n.kind.as_str())),
                (false, Some(_)) => invalid(format!(
                    "{} subquery takes no left operand",
                    n.kind.as_str()
                )),
            }
        }
        NodeKind::Aggregate(n) => {
            require_name(&n.name, "aggregate name")?;
            match n.operand.as_deref() {
                Some(operand) => require_value(operand, "aggregate operand"),
                None if n.name == "COUNT" && !n.distinct => Ok(()),
                None => invalid(format!("{} needs an operand", n.name)),
            }
        }
        NodeKind::HostToSql(n) => match n.method_call.kind() {
            NodeKind::MethodCall(_) => Ok(()),
            _ => invalid(format!(
                "host value must be a method call, not {}",
                n.method_call.node_name()
            )),
        },
        NodeKind::SqlToHost(n) => require_value(&n.value, "host argument"),
        NodeKind::MethodCall(n) => {
            require_name(&n.method_name, "method name")?;
            require_list(&n.parameters, ListKind::MethodParameters, "method parameters")
        }
        NodeKind::Select(n) => {
            require_non_empty_list(&n.result_columns, ListKind::ResultColumns, "select list")?;
            require_list(&n.from_list, ListKind::FromTables, "FROM list")?;
            require_opt_value(n.where_clause.as_deref(), "WHERE clause")?;
            require_opt_list(n.group_by_list.as_ref(), ListKind::Values, "GROUP BY list")?;
            require_opt_value(n.having_clause.as_deref(), "HAVING clause")
        }
        NodeKind::Values(n) => {
            require_non_empty_list(&n.rows, ListKind::Rows, "VALUES rows")?;
            let mut widths = n.rows.iter().map(|row| match row.kind() {
                NodeKind::RowResultSet(r) => r.values.len(),
                _ => 0,
            });
            let first = widths.next().unwrap_or(0);
            if widths.any(|width| width != first) {
                return invalid("VALUES rows must all have the same number of columns");
            }
            Ok(())
        }
        NodeKind::RowResultSet(n) => require_non_empty_list(&n.values, ListKind::Values, "row"),
        NodeKind::SetOperation(n) => {
            require_category(&n.left_result_set, NodeCategory::ResultSet, "left query")?;
            require_category(&n.right_result_set, NodeCategory::ResultSet, "right query")
        }
        NodeKind::ResultColumn(n) => require_value(&n.expression, "result column"),
        NodeKind::AllResultColumn(n) => n
            .table_name
            .as_ref()
            .map_or(Ok(()), |t| require_table_name(t, "table name")),
        NodeKind::FromBaseTable(n) => require_table_name(&n.table_name, "table name"),
        NodeKind::FromSubquery(n) => {
            require_category(&n.subquery, NodeCategory::ResultSet, "derived table")?;
            require_name(&n.correlation_name, "derived table alias")
        }
        NodeKind::Join(n) => {
            require_category(&n.left_result_set, NodeCategory::FromTable, "join operand")?;
            require_category(&n.right_result_set, NodeCategory::FromTable, "join operand")?;
            require_opt_value(n.join_clause.as_deref(), "join condition")?;
            require_opt_list(
                n.using_clause.as_ref(),
                ListKind::ColumnReferences,
                "USING list",
            )?;
            let has_condition = n.join_clause.is_some() || n.using_clause.is_some();
            if n.join_type == JoinType::Cross && has_condition {
                return invalid("CROSS JOIN takes no join condition");
            }
            if n.join_clause.is_some() && n.using_clause.is_some() {
                return invalid("join has both ON and USING");
            }
            Ok(())
        }
        NodeKind::OrderByColumn(n) => require_value(&n.expression, "ORDER BY expression"),
        NodeKind::TableName(n) => require_table_name(n, "name"),
    }
}

fn require_index_columns(columns: &NodeList, join_type: Option<JoinType>) -> Result<()> {
    require_non_empty_list(columns, ListKind::IndexColumns, "index column list")?;
    if matches!(join_type, Some(JoinType::Cross | JoinType::FullOuter)) {
        return invalid("group indexes use LEFT or RIGHT joins");
    }
    Ok(())
}

fn validate_constraint(n: &ConstraintDefinitionNode) -> Result<()> {
    if let Some(name) = &n.name {
        require_table_name(name, "constraint name")?;
    }
    require_opt_list(
        n.column_list.as_ref(),
        ListKind::ColumnReferences,
        "constraint column list",
    )?;
    require_opt_value(n.check_condition.as_deref(), "CHECK condition")?;
    match n.constraint_type {
        ConstraintType::Check => {
            if n.check_condition.is_none() {
                return invalid("CHECK constraint needs a condition");
            }
        }
        ConstraintType::PrimaryKey | ConstraintType::Unique | ConstraintType::NotNull => {
            if n.column_list.is_none() {
                return invalid(format!(
                    "{} constraint needs a column list",
                    n.constraint_type.as_str()
                ));
            }
        }
        ConstraintType::ForeignKey => {
            if n.column_list.is_none() || n.references.is_none() {
                return invalid("FOREIGN KEY constraint needs columns and a referenced table");
            }
        }
        ConstraintType::Drop => {
            if n.name.is_none() && n.verify_type != ConstraintType::PrimaryKey {
                return invalid("dropping a constraint needs its name");
            }
        }
    }
    if n.constraint_type != ConstraintType::Drop && n.verify_type != ConstraintType::Drop {
        return invalid("only a constraint drop can verify a constraint type");
    }
    if let Some(references) = &n.references {
        require_table_name(&references.table_name, "referenced table")?;
        require_opt_list(
            references.columns.as_ref(),
            ListKind::ColumnReferences,
            "referenced column list",
        )?;
    }
    Ok(())
}
