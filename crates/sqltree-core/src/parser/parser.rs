//! SQL Parser implementation.

use tracing::trace;

use super::pratt::{
    binary_op_feature, infix_binding_power, prefix_binding_power, token_to_binary_op,
    token_to_unary_op, unary_op_feature,
};
use super::sql_parser::ParameterInfo;
use crate::ast::{
    AggregateNode, AllResultColumnNode, AlterTableAction, AlterTableNode, BinaryListOperator,
    BinaryListOperatorNode, BinaryOperator, BinaryOperatorNode, CastNode, ChangeType,
    ColumnDefinitionNode, ColumnReferenceNode, ConditionalNode, ConstantNode, ConstantValue,
    ConstraintDefinitionNode, ConstraintType, CreateIndexNode, CreateSchemaNode,
    CreateTableNode, CurrentDatetimeNode, CursorNode, DataType, DataTypeDescriptor, DatetimeField,
    DdlStatement, DeleteNode, DropBehavior, DropIndexNode, DropSchemaNode, DropTableNode,
    ExistenceCheck, ExtractField, ExtractOperatorNode, ForeignKeyReference, FromBaseTableNode,
    FromSubqueryNode, HostToSqlNode, IndexColumnNode, IndexDefinitionNode, InsertNode, JoinNode,
    JoinType, ListKind, MethodCallNode, ModifyColumnAction, ModifyColumnNode, Node, NodeKind,
    NodeList, NullOrdering, OrderByColumnNode, ParameterNode, ReferentialAction,
    ResultColumnNode, RowResultSetNode, SelectNode, SetConfigurationNode, SetConstraintsNode,
    SetOperationNode, SetOperator, SetSchemaNode, SqlToHostNode, SubqueryKind, SubqueryNode,
    TableName, TernaryOperator, TernaryOperatorNode, TransactionControlNode,
    TransactionOperation, UnaryOperator, UnaryOperatorNode, UpdateNode, ValuesNode,
};
use crate::config::{ParserConfig, SqlFeature};
use crate::error::{Result, SqlError};
use crate::factory::NodeFactory;
use crate::lexer::{Keyword, Lexer, Position, Span, Token, TokenKind};

/// State shared by every production of one parse.
struct ParserContext<'a> {
    factory: NodeFactory,
    config: &'a ParserConfig,
    parameters: Vec<ParameterInfo>,
    depth: usize,
}

/// Recursive-descent parser for a single statement.
///
/// Expressions use Pratt parsing; see [`super::pratt`].
pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
    ctx: ParserContext<'a>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    pub(crate) fn new(input: &'a str, config: &'a ParserConfig) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
            ctx: ParserContext {
                factory: NodeFactory::new(),
                config,
                parameters: Vec::new(),
                depth: 0,
            },
        }
    }

    /// Parses one statement, an optional `;`, and the end of input.
    pub(crate) fn parse(mut self) -> Result<(Node, Vec<ParameterInfo>)> {
        let statement = self.parse_statement()?;
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }
        if !self.current.is_eof() {
            return Err(self.unexpected("end of statement"));
        }
        Ok((statement, self.ctx.parameters))
    }

    fn parse_statement(&mut self) -> Result<Node> {
        trace!(token = ?self.current.kind, "statement");
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Select | Keyword::Values) | TokenKind::LeftParen => {
                self.parse_cursor()
            }
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert(),
            TokenKind::Keyword(Keyword::Update) => self.parse_update(),
            TokenKind::Keyword(Keyword::Delete) => self.parse_delete(),
            TokenKind::Keyword(Keyword::Create) => self.parse_create(),
            TokenKind::Keyword(Keyword::Drop) => self.parse_drop(),
            TokenKind::Keyword(Keyword::Alter) => self.parse_alter_table(),
            TokenKind::Keyword(Keyword::Truncate) => self.parse_truncate(),
            TokenKind::Keyword(Keyword::Set) => self.parse_set(),
            TokenKind::Keyword(
                Keyword::Begin | Keyword::Start | Keyword::Commit | Keyword::Rollback,
            ) => self.parse_transaction(),
            _ => Err(self.unexpected("statement")),
        }
    }

    // --- Queries ---

    /// Parses a query with its ORDER BY, OFFSET and FETCH clauses.
    fn parse_cursor(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        let result_set = self.parse_query_expression()?;

        let order_by_list = if self.check_keyword(Keyword::Order) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            Some(self.parse_order_by_list()?)
        } else {
            None
        };

        let mut offset = None;
        let mut fetch_first = None;

        if self.check_keyword(Keyword::Offset) {
            self.advance();
            offset = Some(Box::new(self.parse_expression(0)?));
            self.consume_row_keyword();
        }

        if self.check_keyword(Keyword::Fetch) {
            self.advance();
            if !self.consume_keyword(Keyword::First) && !self.consume_keyword(Keyword::Next) {
                return Err(self.unexpected("FIRST or NEXT"));
            }
            let count = if self.check_keyword(Keyword::Row) || self.check_keyword(Keyword::Rows) {
                self.ctx.factory.construct(NodeKind::Constant(ConstantNode {
                    value: ConstantValue::Integer(1),
                }))?
            } else {
                self.parse_expression(0)?
            };
            if !self.consume_row_keyword() {
                return Err(self.unexpected("ROW or ROWS"));
            }
            self.expect_keyword(Keyword::Only)?;
            fetch_first = Some(Box::new(count));
        } else if self.check_keyword(Keyword::Limit) {
            self.advance();
            fetch_first = Some(Box::new(self.parse_expression(0)?));
            if self.check_keyword(Keyword::Offset) {
                if offset.is_some() {
                    return Err(SqlError::syntax(
                        "OFFSET given twice",
                        self.current.span,
                    ));
                }
                self.advance();
                offset = Some(Box::new(self.parse_expression(0)?));
            }
        }

        self.node_at(
            NodeKind::Cursor(CursorNode {
                name: None,
                result_set: Box::new(result_set),
                order_by_list,
                offset,
                fetch_first,
            }),
            start,
        )
    }

    /// Runs `parse` one nesting level deeper.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let limit = self.ctx.config.max_nesting_depth;
        if self.ctx.depth >= limit {
            return Err(SqlError::syntax(
                format!("Statement is nested more than {limit} levels deep"),
                self.current.span,
            ));
        }
        self.ctx.depth += 1;
        let result = parse(self);
        self.ctx.depth -= 1;
        result
    }

    /// Parses UNION and EXCEPT chains.
    fn parse_query_expression(&mut self) -> Result<Node> {
        self.nested(Self::parse_set_operations)
    }

    fn parse_set_operations(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        let mut left = self.parse_query_term()?;
        loop {
            let operator = match self.current.kind {
                TokenKind::Keyword(Keyword::Union) => SetOperator::Union,
                TokenKind::Keyword(Keyword::Except) => SetOperator::Except,
                _ => break,
            };
            self.advance();
            let all = self.parse_set_quantifier();
            let right = self.parse_query_term()?;
            left = self.node_at(
                NodeKind::SetOperation(SetOperationNode {
                    operator,
                    all,
                    left_result_set: Box::new(left),
                    right_result_set: Box::new(right),
                }),
                start,
            )?;
        }
        Ok(left)
    }

    /// Parses INTERSECT chains, which bind tighter than UNION and EXCEPT.
    fn parse_query_term(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        let mut left = self.parse_query_primary()?;
        while self.check_keyword(Keyword::Intersect) {
            self.advance();
            let all = self.parse_set_quantifier();
            let right = self.parse_query_primary()?;
            left = self.node_at(
                NodeKind::SetOperation(SetOperationNode {
                    operator: SetOperator::Intersect,
                    all,
                    left_result_set: Box::new(left),
                    right_result_set: Box::new(right),
                }),
                start,
            )?;
        }
        Ok(left)
    }

    fn parse_query_primary(&mut self) -> Result<Node> {
        match self.current.kind {
            TokenKind::Keyword(Keyword::Select) => self.parse_select(),
            TokenKind::Keyword(Keyword::Values) => self.parse_values(),
            TokenKind::LeftParen => {
                self.advance();
                let query = self.parse_query_expression()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(query)
            }
            _ => Err(self.unexpected("SELECT, VALUES or a parenthesized query")),
        }
    }

    /// `ALL` keeps duplicates; `DISTINCT` and nothing remove them.
    fn parse_set_quantifier(&mut self) -> bool {
        if self.consume_keyword(Keyword::All) {
            return true;
        }
        self.consume_keyword(Keyword::Distinct);
        false
    }

    /// Parses a SELECT query specification.
    fn parse_select(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Select)?;

        // DISTINCT or ALL
        let distinct = if self.check_keyword(Keyword::Distinct) {
            self.advance();
            true
        } else {
            self.consume_keyword(Keyword::All);
            false
        };

        let result_columns = self.parse_result_columns()?;

        // FROM clause (optional for expressions like SELECT 1+1)
        let from_list = if self.check_keyword(Keyword::From) {
            self.advance();
            self.parse_from_list()?
        } else {
            NodeList::new(ListKind::FromTables)
        };

        let where_clause = self.parse_optional_where()?;

        let group_by_list = if self.check_keyword(Keyword::Group) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            Some(self.parse_value_list()?)
        } else {
            None
        };

        let having_clause = if self.check_keyword(Keyword::Having) {
            self.advance();
            Some(Box::new(self.parse_expression(0)?))
        } else {
            None
        };

        self.node_at(
            NodeKind::Select(SelectNode {
                distinct,
                result_columns,
                from_list,
                where_clause,
                group_by_list,
                having_clause,
            }),
            start,
        )
    }

    /// Parses the select list.
    fn parse_result_columns(&mut self) -> Result<NodeList> {
        let mut columns = NodeList::new(ListKind::ResultColumns);
        loop {
            columns.push(self.parse_result_column()?)?;
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        Ok(columns)
    }

    fn parse_result_column(&mut self) -> Result<Node> {
        let start = self.current.span.start;

        if self.check(&TokenKind::Star) {
            self.advance();
            return self.node_at(
                NodeKind::AllResultColumn(AllResultColumnNode { table_name: None }),
                start,
            );
        }

        // t.* and s.t.*
        if self.at_identifier() && self.peek_is(0, &TokenKind::Dot) {
            let single = self.peek_is(1, &TokenKind::Star);
            let qualified = self.peek_is(2, &TokenKind::Dot) && self.peek_is(3, &TokenKind::Star);
            if single || qualified {
                let first = self.expect_identifier()?;
                self.expect(&TokenKind::Dot)?;
                let table_name = if qualified {
                    let table = self.expect_identifier()?;
                    self.expect(&TokenKind::Dot)?;
                    TableName::qualified(first, table)
                } else {
                    TableName::new(first)
                };
                self.expect(&TokenKind::Star)?;
                return self.node_at(
                    NodeKind::AllResultColumn(AllResultColumnNode {
                        table_name: Some(table_name),
                    }),
                    start,
                );
            }
        }

        let expression = self.parse_expression(0)?;
        let name = self.parse_optional_alias()?;
        self.node_at(
            NodeKind::ResultColumn(ResultColumnNode {
                name,
                expression: Box::new(expression),
            }),
            start,
        )
    }

    /// Parses a VALUES list. Each row is either a parenthesized list or a
    /// single expression.
    fn parse_values(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Values)?;
        let mut rows = NodeList::new(ListKind::Rows);
        loop {
            let row_start = self.current.span.start;
            let values = if self.check(&TokenKind::LeftParen) {
                self.advance();
                let values = self.parse_value_list()?;
                self.expect(&TokenKind::RightParen)?;
                values
            } else {
                NodeList::from_nodes(ListKind::Values, [self.parse_expression(0)?])?
            };
            rows.push(self.node_at(
                NodeKind::RowResultSet(RowResultSetNode { values }),
                row_start,
            )?)?;
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        self.node_at(NodeKind::Values(ValuesNode { rows }), start)
    }

    // --- FROM clause ---

    fn parse_from_list(&mut self) -> Result<NodeList> {
        let mut tables = NodeList::new(ListKind::FromTables);
        loop {
            tables.push(self.parse_table_reference()?)?;
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        Ok(tables)
    }

    /// Parses a table reference with any joins that follow it.
    fn parse_table_reference(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        let mut left = self.parse_table_primary()?;

        while self.is_join_keyword() {
            let join_type = self.parse_join_type()?;
            let right = self.parse_table_primary()?;

            let (join_clause, using_clause) = if join_type == JoinType::Cross {
                (None, None)
            } else if self.check_keyword(Keyword::On) {
                self.advance();
                (Some(Box::new(self.parse_expression(0)?)), None)
            } else if self.check_keyword(Keyword::Using) {
                self.advance();
                (None, Some(self.parse_column_reference_list()?))
            } else {
                return Err(self.unexpected("ON or USING"));
            };

            left = self.node_at(
                NodeKind::Join(JoinNode {
                    join_type,
                    left_result_set: Box::new(left),
                    right_result_set: Box::new(right),
                    join_clause,
                    using_clause,
                }),
                start,
            )?;
        }

        Ok(left)
    }

    /// Parses a base table, a derived table, or a parenthesized join.
    fn parse_table_primary(&mut self) -> Result<Node> {
        self.nested(Self::parse_table_operand)
    }

    fn parse_table_operand(&mut self) -> Result<Node> {
        let start = self.current.span.start;

        if self.check(&TokenKind::LeftParen) {
            self.advance();
            if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::Values) {
                let subquery = self.parse_query_expression()?;
                self.expect(&TokenKind::RightParen)?;
                let Some(correlation_name) = self.parse_optional_alias()? else {
                    return Err(SqlError::syntax(
                        "A derived table needs a correlation name",
                        self.current.span,
                    ));
                };
                return self.node_at(
                    NodeKind::FromSubquery(FromSubqueryNode {
                        subquery: Box::new(subquery),
                        correlation_name,
                    }),
                    start,
                );
            }
            let joined = self.parse_table_reference()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(joined);
        }

        let table_name = self.parse_table_name()?;
        let correlation_name = self.parse_optional_alias()?;
        self.node_at(
            NodeKind::FromBaseTable(FromBaseTableNode {
                table_name,
                correlation_name,
            }),
            start,
        )
    }

    /// Checks if current token starts a JOIN clause.
    fn is_join_keyword(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Keyword(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Cross
            )
        )
    }

    /// Parses the join type keywords through `JOIN`.
    fn parse_join_type(&mut self) -> Result<JoinType> {
        let join_type = match self.current.kind {
            TokenKind::Keyword(Keyword::Join) => JoinType::Inner,
            TokenKind::Keyword(Keyword::Inner) => {
                self.advance();
                JoinType::Inner
            }
            TokenKind::Keyword(Keyword::Left) => {
                self.advance();
                self.consume_keyword(Keyword::Outer);
                JoinType::LeftOuter
            }
            TokenKind::Keyword(Keyword::Right) => {
                self.advance();
                self.consume_keyword(Keyword::Outer);
                JoinType::RightOuter
            }
            TokenKind::Keyword(Keyword::Full) => {
                self.advance();
                self.consume_keyword(Keyword::Outer);
                JoinType::FullOuter
            }
            TokenKind::Keyword(Keyword::Cross) => {
                self.advance();
                JoinType::Cross
            }
            _ => return Err(self.unexpected("JOIN")),
        };
        self.expect_keyword(Keyword::Join)?;
        Ok(join_type)
    }

    /// Parses `AS name` or a bare identifier following a table or column.
    fn parse_optional_alias(&mut self) -> Result<Option<String>> {
        if self.check_keyword(Keyword::As) {
            self.advance();
            return Ok(Some(self.expect_identifier()?));
        }
        if self.at_identifier() {
            return Ok(Some(self.expect_identifier()?));
        }
        Ok(None)
    }

    fn parse_optional_where(&mut self) -> Result<Option<Box<Node>>> {
        if self.check_keyword(Keyword::Where) {
            self.advance();
            Ok(Some(Box::new(self.parse_expression(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Parses ORDER BY entries.
    fn parse_order_by_list(&mut self) -> Result<NodeList> {
        let mut list = NodeList::new(ListKind::OrderBy);
        loop {
            let start = self.current.span.start;
            let expression = self.parse_expression(0)?;

            let ascending = if self.check_keyword(Keyword::Desc) {
                self.advance();
                false
            } else {
                self.consume_keyword(Keyword::Asc);
                true
            };

            let nulls = if self.check_keyword(Keyword::Nulls) {
                self.advance();
                if self.consume_keyword(Keyword::First) {
                    Some(NullOrdering::First)
                } else if self.consume_keyword(Keyword::Last) {
                    Some(NullOrdering::Last)
                } else {
                    return Err(self.unexpected("FIRST or LAST"));
                }
            } else {
                None
            };

            list.push(self.node_at(
                NodeKind::OrderByColumn(OrderByColumnNode {
                    expression: Box::new(expression),
                    ascending,
                    nulls,
                }),
                start,
            )?)?;

            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        Ok(list)
    }

    // --- Data manipulation ---

    /// Parses an INSERT statement.
    fn parse_insert(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let target_table = self.parse_table_name()?;

        let starts_query = self.peek_is(0, &TokenKind::Keyword(Keyword::Select))
            || self.peek_is(0, &TokenKind::Keyword(Keyword::Values));
        let target_columns = if self.check(&TokenKind::LeftParen) && !starts_query {
            Some(self.parse_column_reference_list()?)
        } else {
            None
        };

        let result_set = self.parse_query_expression()?;

        self.node_at(
            NodeKind::Insert(InsertNode {
                target_table,
                target_columns,
                result_set: Box::new(result_set),
            }),
            start,
        )
    }

    /// Parses an UPDATE statement.
    fn parse_update(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Update)?;
        let target_table = self.parse_table_name()?;
        let correlation_name = self.parse_optional_alias()?;
        self.expect_keyword(Keyword::Set)?;

        let mut set_clause = NodeList::new(ListKind::ResultColumns);
        loop {
            let assignment_start = self.current.span.start;
            let column = self.expect_identifier()?;
            self.expect(&TokenKind::Eq)?;
            let value = self.parse_expression(0)?;
            set_clause.push(self.node_at(
                NodeKind::ResultColumn(ResultColumnNode {
                    name: Some(column),
                    expression: Box::new(value),
                }),
                assignment_start,
            )?)?;
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }

        let where_clause = self.parse_optional_where()?;

        self.node_at(
            NodeKind::Update(UpdateNode {
                target_table,
                correlation_name,
                set_clause,
                where_clause,
            }),
            start,
        )
    }

    /// Parses a DELETE statement.
    fn parse_delete(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let target_table = self.parse_table_name()?;
        let correlation_name = self.parse_optional_alias()?;
        let where_clause = self.parse_optional_where()?;

        self.node_at(
            NodeKind::Delete(DeleteNode {
                target_table,
                correlation_name,
                where_clause,
            }),
            start,
        )
    }

    // --- Data definition ---

    fn parse_create(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Create)?;
        match self.current.kind {
            TokenKind::Keyword(Keyword::Table) => self.parse_create_table(start),
            TokenKind::Keyword(Keyword::Schema) => self.parse_create_schema(start),
            TokenKind::Keyword(Keyword::Unique) => {
                self.advance();
                self.expect_keyword(Keyword::Index)?;
                self.parse_create_index(start, true)
            }
            TokenKind::Keyword(Keyword::Index) => {
                self.advance();
                self.parse_create_index(start, false)
            }
            _ => Err(self.unexpected("TABLE, INDEX or SCHEMA")),
        }
    }

    fn parse_create_table(&mut self, start: usize) -> Result<Node> {
        self.expect_keyword(Keyword::Table)?;
        let existence_check = self.parse_if_not_exists()?;
        let name = self.parse_table_name()?;

        self.expect(&TokenKind::LeftParen)?;
        let mut elements = NodeList::new(ListKind::TableElements);
        loop {
            self.parse_table_element(&mut elements)?;
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;

        self.node_at(
            NodeKind::CreateTable(CreateTableNode {
                ddl: DdlStatement::new(name),
                elements,
                existence_check,
            }),
            start,
        )
    }

    /// Parses one element of a table definition into `elements`.
    ///
    /// A column definition adds the column followed by one constraint
    /// element per column constraint.
    fn parse_table_element(&mut self, elements: &mut NodeList) -> Result<()> {
        match self.current.kind {
            TokenKind::Keyword(Keyword::Unique)
                if self.peek_is(0, &TokenKind::Keyword(Keyword::Index)) =>
            {
                elements.push(self.parse_index_definition()?)
            }
            TokenKind::Keyword(Keyword::Index) => elements.push(self.parse_index_definition()?),
            TokenKind::Keyword(
                Keyword::Constraint
                | Keyword::Primary
                | Keyword::Unique
                | Keyword::Check
                | Keyword::Foreign,
            ) => elements.push(self.parse_table_constraint()?),
            _ => self.parse_column_definition(elements),
        }
    }

    /// Parses a table-level constraint.
    fn parse_table_constraint(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        let name = if self.consume_keyword(Keyword::Constraint) {
            Some(self.parse_table_name()?)
        } else {
            None
        };

        let mut constraint = match self.current.kind {
            TokenKind::Keyword(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                ConstraintDefinitionNode::new(ConstraintType::PrimaryKey)
                    .with_columns(self.parse_column_reference_list()?)
            }
            TokenKind::Keyword(Keyword::Unique) => {
                self.advance();
                ConstraintDefinitionNode::new(ConstraintType::Unique)
                    .with_columns(self.parse_column_reference_list()?)
            }
            TokenKind::Keyword(Keyword::Check) => {
                self.advance();
                let (condition, text) = self.parse_check_condition()?;
                ConstraintDefinitionNode::new(ConstraintType::Check).with_check(condition, text)
            }
            TokenKind::Keyword(Keyword::Foreign) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let columns = self.parse_column_reference_list()?;
                ConstraintDefinitionNode::new(ConstraintType::ForeignKey)
                    .with_columns(columns)
                    .with_references(self.parse_references()?)
            }
            _ => return Err(self.unexpected("PRIMARY KEY, UNIQUE, CHECK or FOREIGN KEY")),
        };
        if let Some(name) = name {
            constraint = constraint.with_name(name);
        }

        self.node_at(NodeKind::ConstraintDefinition(constraint), start)
    }

    /// Parses `( condition )` and returns the condition with its source text.
    fn parse_check_condition(&mut self) -> Result<(Node, String)> {
        self.expect(&TokenKind::LeftParen)?;
        let text_start = self.current.span.start;
        let condition = self.parse_expression(0)?;
        let text = self
            .lexer
            .slice(Span::new(text_start, self.previous.span.end))
            .to_string();
        self.expect(&TokenKind::RightParen)?;
        Ok((condition, text))
    }

    /// Parses `REFERENCES table [(columns)] [ON DELETE action] [ON UPDATE action]`.
    fn parse_references(&mut self) -> Result<ForeignKeyReference> {
        self.expect_keyword(Keyword::References)?;
        let table_name = self.parse_table_name()?;
        let columns = if self.check(&TokenKind::LeftParen) {
            Some(self.parse_column_reference_list()?)
        } else {
            None
        };

        let mut reference = ForeignKeyReference {
            table_name,
            columns,
            on_delete: ReferentialAction::default(),
            on_update: ReferentialAction::default(),
        };
        while self.check_keyword(Keyword::On) {
            self.advance();
            if self.consume_keyword(Keyword::Delete) {
                reference.on_delete = self.parse_referential_action()?;
            } else if self.consume_keyword(Keyword::Update) {
                reference.on_update = self.parse_referential_action()?;
            } else {
                return Err(self.unexpected("DELETE or UPDATE"));
            }
        }
        Ok(reference)
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction> {
        let action = match self.current.kind {
            TokenKind::Keyword(Keyword::Cascade) => {
                self.advance();
                ReferentialAction::Cascade
            }
            TokenKind::Keyword(Keyword::Restrict) => {
                self.advance();
                ReferentialAction::Restrict
            }
            TokenKind::Keyword(Keyword::No) => {
                self.advance();
                self.expect_keyword(Keyword::Action)?;
                ReferentialAction::NoAction
            }
            TokenKind::Keyword(Keyword::Set) => {
                self.advance();
                if self.consume_keyword(Keyword::Null) {
                    ReferentialAction::SetNull
                } else if self.consume_keyword(Keyword::Default) {
                    ReferentialAction::SetDefault
                } else {
                    return Err(self.unexpected("NULL or DEFAULT"));
                }
            }
            _ => return Err(self.unexpected("referential action")),
        };
        Ok(action)
    }

    /// Parses a column definition, appending the column and then its column
    /// constraints to `elements`.
    fn parse_column_definition(&mut self, elements: &mut NodeList) -> Result<()> {
        let start = self.current.span.start;
        let name = self.expect_identifier()?;
        let name_position = Position::from(self.previous.span);
        let data_type = self.parse_data_type()?;

        let mut nullable = true;
        let mut default_value = None;
        let mut auto_increment = false;
        let mut constraints = Vec::new();

        loop {
            let constraint_start = self.current.span.start;
            let constraint_name = if self.consume_keyword(Keyword::Constraint) {
                Some(self.parse_table_name()?)
            } else {
                None
            };

            let constraint = match self.current.kind {
                TokenKind::Keyword(Keyword::Not) => {
                    self.advance();
                    self.expect_keyword(Keyword::Null)?;
                    nullable = false;
                    constraint_name
                        .is_some()
                        .then(|| ConstraintDefinitionNode::new(ConstraintType::NotNull))
                }
                TokenKind::Keyword(Keyword::Null) => {
                    self.advance();
                    None
                }
                TokenKind::Keyword(Keyword::Default) => {
                    self.advance();
                    default_value = Some(Box::new(self.parse_expression(0)?));
                    None
                }
                TokenKind::Keyword(Keyword::Autoincrement) => {
                    self.advance();
                    auto_increment = true;
                    None
                }
                TokenKind::Keyword(Keyword::Primary) => {
                    self.advance();
                    self.expect_keyword(Keyword::Key)?;
                    Some(ConstraintDefinitionNode::new(ConstraintType::PrimaryKey))
                }
                TokenKind::Keyword(Keyword::Unique) => {
                    self.advance();
                    Some(ConstraintDefinitionNode::new(ConstraintType::Unique))
                }
                TokenKind::Keyword(Keyword::Check) => {
                    self.advance();
                    let (condition, text) = self.parse_check_condition()?;
                    Some(
                        ConstraintDefinitionNode::new(ConstraintType::Check)
                            .with_check(condition, text),
                    )
                }
                TokenKind::Keyword(Keyword::References) => Some(
                    ConstraintDefinitionNode::new(ConstraintType::ForeignKey)
                        .with_references(self.parse_references()?),
                ),
                _ if constraint_name.is_some() => {
                    return Err(self.unexpected("column constraint"));
                }
                _ => break,
            };

            if let Some(mut constraint) = constraint {
                let column = self.ctx.factory.construct_at(
                    NodeKind::ColumnReference(ColumnReferenceNode {
                        table_name: None,
                        column_name: name.clone(),
                    }),
                    name_position,
                )?;
                constraint = constraint
                    .with_columns(NodeList::from_nodes(ListKind::ColumnReferences, [column])?);
                if let Some(constraint_name) = constraint_name {
                    constraint = constraint.with_name(constraint_name);
                }
                constraints.push(
                    self.node_at(NodeKind::ConstraintDefinition(constraint), constraint_start)?,
                );
            }
        }

        elements.push(self.node_at(
            NodeKind::ColumnDefinition(ColumnDefinitionNode {
                name,
                data_type: data_type.with_nullable(nullable),
                default_value,
                auto_increment,
            }),
            start,
        )?)?;
        for constraint in constraints {
            elements.push(constraint)?;
        }
        Ok(())
    }

    /// Parses `[UNIQUE] INDEX [name] (columns) [USING LEFT|RIGHT JOIN]`
    /// inside a table definition.
    fn parse_index_definition(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        let unique = self.consume_keyword(Keyword::Unique);
        self.expect_keyword(Keyword::Index)?;
        let name = if self.at_identifier() {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let columns = self.parse_index_column_list()?;
        let join_type = self.parse_index_join_type()?;

        self.node_at(
            NodeKind::IndexDefinition(IndexDefinitionNode {
                name,
                unique,
                columns,
                join_type,
            }),
            start,
        )
    }

    /// Parses the rest of `CREATE [UNIQUE] INDEX`, after `INDEX`.
    fn parse_create_index(&mut self, start: usize, unique: bool) -> Result<Node> {
        let existence_check = self.parse_if_not_exists()?;
        let name = self.parse_table_name()?;
        self.expect_keyword(Keyword::On)?;
        let table_name = self.parse_table_name()?;
        let columns = self.parse_index_column_list()?;
        let join_type = self.parse_index_join_type()?;

        self.node_at(
            NodeKind::CreateIndex(CreateIndexNode {
                ddl: DdlStatement::new(name),
                table_name,
                unique,
                columns,
                join_type,
                existence_check,
            }),
            start,
        )
    }

    /// Parses a parenthesized index column list.
    ///
    /// `func(a, b)` flattens its arguments into the list and records the
    /// function application on it.
    fn parse_index_column_list(&mut self) -> Result<NodeList> {
        self.expect(&TokenKind::LeftParen)?;
        let mut columns = NodeList::new(ListKind::IndexColumns);
        loop {
            if self.at_identifier() && self.peek_is(0, &TokenKind::LeftParen) {
                let function_span = self.current.span;
                self.require_feature(SqlFeature::IndexFunctions, function_span)?;
                let function_name = self.expect_identifier()?;
                self.expect(&TokenKind::LeftParen)?;
                let first_argument = columns.len();
                loop {
                    columns.push(self.parse_index_column()?)?;
                    if !self.consume(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RightParen)?;
                let argument_count = columns.len() - first_argument;
                columns.apply_function(&function_name, first_argument, argument_count)?;
            } else {
                columns.push(self.parse_index_column()?)?;
            }
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(columns)
    }

    fn parse_index_column(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        let first = self.expect_identifier()?;
        let (table_name, column_name) = if self.consume(&TokenKind::Dot) {
            (Some(TableName::new(first)), self.expect_identifier()?)
        } else {
            (None, first)
        };
        let ascending = if self.check_keyword(Keyword::Desc) {
            self.advance();
            false
        } else {
            self.consume_keyword(Keyword::Asc);
            true
        };
        self.node_at(
            NodeKind::IndexColumn(IndexColumnNode {
                table_name,
                column_name,
                ascending,
            }),
            start,
        )
    }

    /// Parses the optional `USING LEFT JOIN` / `USING RIGHT JOIN` suffix.
    fn parse_index_join_type(&mut self) -> Result<Option<JoinType>> {
        if !self.consume_keyword(Keyword::Using) {
            return Ok(None);
        }
        let join_type = if self.consume_keyword(Keyword::Left) {
            JoinType::LeftOuter
        } else if self.consume_keyword(Keyword::Right) {
            JoinType::RightOuter
        } else {
            return Err(self.unexpected("LEFT or RIGHT"));
        };
        self.expect_keyword(Keyword::Join)?;
        Ok(Some(join_type))
    }

    fn parse_create_schema(&mut self, start: usize) -> Result<Node> {
        self.expect_keyword(Keyword::Schema)?;
        let existence_check = self.parse_if_not_exists()?;
        let name = self.expect_identifier()?;
        self.node_at(
            NodeKind::CreateSchema(CreateSchemaNode {
                ddl: DdlStatement::new(TableName::new(name)),
                existence_check,
            }),
            start,
        )
    }

    fn parse_drop(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Drop)?;
        match self.current.kind {
            TokenKind::Keyword(Keyword::Table) => {
                self.advance();
                let existence_check = self.parse_if_exists()?;
                let name = self.parse_table_name()?;
                let behavior = self.parse_drop_behavior();
                self.node_at(
                    NodeKind::DropTable(DropTableNode {
                        ddl: DdlStatement::new(name),
                        behavior,
                        existence_check,
                    }),
                    start,
                )
            }
            TokenKind::Keyword(Keyword::Index) => {
                self.advance();
                let existence_check = self.parse_if_exists()?;
                let name = self.parse_table_name()?;
                let table_name = if self.consume_keyword(Keyword::On) {
                    Some(self.parse_table_name()?)
                } else {
                    None
                };
                self.node_at(
                    NodeKind::DropIndex(DropIndexNode {
                        ddl: DdlStatement::new(name),
                        table_name,
                        existence_check,
                    }),
                    start,
                )
            }
            TokenKind::Keyword(Keyword::Schema) => {
                self.advance();
                let existence_check = self.parse_if_exists()?;
                let name = self.expect_identifier()?;
                let behavior = self.parse_drop_behavior();
                self.node_at(
                    NodeKind::DropSchema(DropSchemaNode {
                        ddl: DdlStatement::new(TableName::new(name)),
                        behavior,
                        existence_check,
                    }),
                    start,
                )
            }
            _ => Err(self.unexpected("TABLE, INDEX or SCHEMA")),
        }
    }

    fn parse_alter_table(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Alter)?;
        self.expect_keyword(Keyword::Table)?;
        let existence_check = self.parse_if_exists()?;
        let name = self.parse_table_name()?;

        let action = match self.current.kind {
            TokenKind::Keyword(Keyword::Add) => {
                self.advance();
                let mut elements = NodeList::new(ListKind::TableElements);
                if self.at_table_constraint() {
                    elements.push(self.parse_table_constraint()?)?;
                } else {
                    self.consume_keyword(Keyword::Column);
                    self.parse_column_definition(&mut elements)?;
                }
                AlterTableAction::Elements {
                    change_type: ChangeType::Add,
                    elements,
                    behavior: DropBehavior::Default,
                }
            }
            TokenKind::Keyword(Keyword::Drop) => {
                self.advance();
                self.parse_alter_drop()?
            }
            TokenKind::Keyword(Keyword::Alter) => {
                self.advance();
                self.consume_keyword(Keyword::Column);
                let element_start = self.current.span.start;
                let column_name = self.expect_identifier()?;
                let action = self.parse_modify_column_action()?;
                let element = self.node_at(
                    NodeKind::ModifyColumn(ModifyColumnNode {
                        column_name,
                        action,
                    }),
                    element_start,
                )?;
                AlterTableAction::Elements {
                    change_type: ChangeType::Modify,
                    elements: NodeList::from_nodes(ListKind::TableElements, [element])?,
                    behavior: DropBehavior::Default,
                }
            }
            TokenKind::Keyword(Keyword::All) => {
                self.advance();
                self.expect_keyword(Keyword::Update)?;
                self.expect_keyword(Keyword::Statistics)?;
                AlterTableAction::UpdateStatistics {
                    all: true,
                    index_name: None,
                }
            }
            TokenKind::Keyword(Keyword::Update) => {
                self.advance();
                self.expect_keyword(Keyword::Statistics)?;
                AlterTableAction::UpdateStatistics {
                    all: false,
                    index_name: Some(self.expect_identifier()?),
                }
            }
            _ => return Err(self.unexpected("ADD, DROP, ALTER or UPDATE STATISTICS")),
        };

        self.node_at(
            NodeKind::AlterTable(AlterTableNode {
                ddl: DdlStatement::new(name),
                action,
                existence_check,
            }),
            start,
        )
    }

    /// Parses what follows `ALTER TABLE t DROP`.
    fn parse_alter_drop(&mut self) -> Result<AlterTableAction> {
        let element_start = self.current.span.start;

        let verify_type = match self.current.kind {
            TokenKind::Keyword(Keyword::Constraint) => Some(ConstraintType::Drop),
            TokenKind::Keyword(Keyword::Primary) => Some(ConstraintType::PrimaryKey),
            TokenKind::Keyword(Keyword::Unique) => Some(ConstraintType::Unique),
            TokenKind::Keyword(Keyword::Check) => Some(ConstraintType::Check),
            TokenKind::Keyword(Keyword::Foreign) => Some(ConstraintType::ForeignKey),
            _ => None,
        };

        let Some(verify_type) = verify_type else {
            self.consume_keyword(Keyword::Column);
            let column_name = self.expect_identifier()?;
            let behavior = self.parse_drop_behavior();
            let element = self.node_at(
                NodeKind::ModifyColumn(ModifyColumnNode {
                    column_name,
                    action: ModifyColumnAction::Drop { behavior },
                }),
                element_start,
            )?;
            return Ok(AlterTableAction::Elements {
                change_type: ChangeType::Drop,
                elements: NodeList::from_nodes(ListKind::TableElements, [element])?,
                behavior,
            });
        };

        self.advance();
        if matches!(
            verify_type,
            ConstraintType::PrimaryKey | ConstraintType::ForeignKey
        ) {
            self.expect_keyword(Keyword::Key)?;
        }
        let name = if verify_type == ConstraintType::PrimaryKey {
            None
        } else {
            Some(self.parse_table_name()?)
        };
        let behavior = self.parse_drop_behavior();

        let mut constraint = ConstraintDefinitionNode::new(ConstraintType::Drop)
            .with_verify_type(verify_type)
            .with_behavior(behavior);
        if let Some(name) = name {
            constraint = constraint.with_name(name);
        }
        let element = self.node_at(NodeKind::ConstraintDefinition(constraint), element_start)?;

        Ok(AlterTableAction::Elements {
            change_type: ChangeType::Drop,
            elements: NodeList::from_nodes(ListKind::TableElements, [element])?,
            behavior,
        })
    }

    /// Parses what follows `ALTER TABLE t ALTER [COLUMN] c`.
    fn parse_modify_column_action(&mut self) -> Result<ModifyColumnAction> {
        let action = match self.current.kind {
            TokenKind::Keyword(Keyword::Set) => {
                self.advance();
                match self.current.kind {
                    TokenKind::Keyword(Keyword::Default) => {
                        self.advance();
                        ModifyColumnAction::SetDefault(Box::new(self.parse_expression(0)?))
                    }
                    TokenKind::Keyword(Keyword::Data) => {
                        self.advance();
                        self.expect_keyword(Keyword::Type)?;
                        ModifyColumnAction::SetDataType(self.parse_data_type()?)
                    }
                    TokenKind::Keyword(Keyword::Not) => {
                        self.advance();
                        self.expect_keyword(Keyword::Null)?;
                        ModifyColumnAction::SetNotNull
                    }
                    _ => return Err(self.unexpected("DEFAULT, DATA TYPE or NOT NULL")),
                }
            }
            TokenKind::Keyword(Keyword::Drop) => {
                self.advance();
                if self.consume_keyword(Keyword::Default) {
                    ModifyColumnAction::DropDefault
                } else if self.consume_keyword(Keyword::Not) {
                    self.expect_keyword(Keyword::Null)?;
                    ModifyColumnAction::SetNull
                } else {
                    return Err(self.unexpected("DEFAULT or NOT NULL"));
                }
            }
            TokenKind::Keyword(Keyword::Default) => {
                self.advance();
                ModifyColumnAction::SetDefault(Box::new(self.parse_expression(0)?))
            }
            TokenKind::Keyword(Keyword::Not) => {
                self.advance();
                self.expect_keyword(Keyword::Null)?;
                ModifyColumnAction::SetNotNull
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                ModifyColumnAction::SetNull
            }
            _ => return Err(self.unexpected("SET, DROP, DEFAULT, NOT NULL or NULL")),
        };
        Ok(action)
    }

    /// Parses `TRUNCATE TABLE t`, which is represented as an ALTER TABLE.
    fn parse_truncate(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Truncate)?;
        self.expect_keyword(Keyword::Table)?;
        let existence_check = self.parse_if_exists()?;
        let name = self.parse_table_name()?;
        let behavior = self.parse_drop_behavior();
        self.node_at(
            NodeKind::AlterTable(AlterTableNode {
                ddl: DdlStatement::new(name),
                action: AlterTableAction::Truncate { behavior },
                existence_check,
            }),
            start,
        )
    }

    fn at_table_constraint(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Keyword(
                Keyword::Constraint
                    | Keyword::Primary
                    | Keyword::Unique
                    | Keyword::Check
                    | Keyword::Foreign
            )
        )
    }

    fn parse_if_not_exists(&mut self) -> Result<ExistenceCheck> {
        if !self.check_keyword(Keyword::If) {
            return Ok(ExistenceCheck::NoCondition);
        }
        self.advance();
        self.expect_keyword(Keyword::Not)?;
        self.expect_keyword(Keyword::Exists)?;
        Ok(ExistenceCheck::IfNotExists)
    }

    fn parse_if_exists(&mut self) -> Result<ExistenceCheck> {
        if !self.check_keyword(Keyword::If) {
            return Ok(ExistenceCheck::NoCondition);
        }
        self.advance();
        self.expect_keyword(Keyword::Exists)?;
        Ok(ExistenceCheck::IfExists)
    }

    fn parse_drop_behavior(&mut self) -> DropBehavior {
        if self.consume_keyword(Keyword::Cascade) {
            DropBehavior::Cascade
        } else if self.consume_keyword(Keyword::Restrict) {
            DropBehavior::Restrict
        } else {
            DropBehavior::Default
        }
    }

    // --- Session statements ---

    fn parse_set(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Set)?;

        if self.check_keyword(Keyword::Schema) {
            self.advance();
            let schema_name = self.expect_identifier()?;
            return self.node_at(NodeKind::SetSchema(SetSchemaNode { schema_name }), start);
        }

        if self.check_keyword(Keyword::Constraints) {
            self.advance();
            let (all, constraints) = if self.consume_keyword(Keyword::All) {
                (true, None)
            } else {
                let mut names = NodeList::new(ListKind::TableNames);
                loop {
                    let name_start = self.current.span.start;
                    let name = self.parse_table_name()?;
                    names.push(self.node_at(NodeKind::TableName(name), name_start)?)?;
                    if !self.consume(&TokenKind::Comma) {
                        break;
                    }
                }
                (false, Some(names))
            };
            let deferred = if self.consume_keyword(Keyword::Deferred) {
                true
            } else if self.consume_keyword(Keyword::Immediate) {
                false
            } else {
                return Err(self.unexpected("DEFERRED or IMMEDIATE"));
            };
            return self.node_at(
                NodeKind::SetConstraints(SetConstraintsNode {
                    all,
                    constraints,
                    deferred,
                }),
                start,
            );
        }

        let variable = self.expect_identifier()?;
        if !self.consume(&TokenKind::Eq) && !self.consume_keyword(Keyword::To) {
            return Err(self.unexpected("= or TO"));
        }
        let value = match &self.current.kind {
            TokenKind::String(value) | TokenKind::Identifier(value) | TokenKind::Decimal(value) => {
                value.clone()
            }
            TokenKind::Integer(value) => value.to_string(),
            TokenKind::Keyword(_) => self.lexer.slice(self.current.span).to_string(),
            _ => return Err(self.unexpected("configuration value")),
        };
        self.advance();

        self.node_at(
            NodeKind::SetConfiguration(SetConfigurationNode { variable, value }),
            start,
        )
    }

    fn parse_transaction(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        let operation = match self.current.kind {
            TokenKind::Keyword(Keyword::Begin) => {
                self.advance();
                if !self.consume_keyword(Keyword::Transaction) {
                    self.consume_keyword(Keyword::Work);
                }
                TransactionOperation::Begin
            }
            TokenKind::Keyword(Keyword::Start) => {
                self.advance();
                self.expect_keyword(Keyword::Transaction)?;
                TransactionOperation::Begin
            }
            TokenKind::Keyword(Keyword::Commit) => {
                self.advance();
                if !self.consume_keyword(Keyword::Work) {
                    self.consume_keyword(Keyword::Transaction);
                }
                TransactionOperation::Commit
            }
            TokenKind::Keyword(Keyword::Rollback) => {
                self.advance();
                if !self.consume_keyword(Keyword::Work) {
                    self.consume_keyword(Keyword::Transaction);
                }
                TransactionOperation::Rollback
            }
            _ => return Err(self.unexpected("BEGIN, START, COMMIT or ROLLBACK")),
        };
        self.node_at(
            NodeKind::TransactionControl(TransactionControlNode { operation }),
            start,
        )
    }

    // --- Expression parsing (Pratt parser) ---

    /// Parses an expression with the given minimum binding power.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Node> {
        self.nested(|parser| parser.parse_binding(min_bp))
    }

    #[allow(clippy::too_many_lines)]
    fn parse_binding(&mut self, min_bp: u8) -> Result<Node> {
        let start = self.current.span.start;
        let mut lhs = self.parse_prefix()?;

        loop {
            // NOT IN, NOT BETWEEN and NOT LIKE bind like their positive forms
            let negated = self.check_keyword(Keyword::Not)
                && matches!(
                    self.peek_kind(0),
                    TokenKind::Keyword(Keyword::In | Keyword::Between | Keyword::Like)
                );
            let operator = if negated {
                self.peek_kind(0)
            } else {
                self.current.kind.clone()
            };

            let Some((l_bp, r_bp)) = infix_binding_power(&operator) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            lhs = match operator {
                TokenKind::Keyword(Keyword::Is) => {
                    self.advance();
                    let operator = if self.consume_keyword(Keyword::Not) {
                        UnaryOperator::IsNotNull
                    } else {
                        UnaryOperator::IsNull
                    };
                    self.expect_keyword(Keyword::Null)?;
                    self.node_at(
                        NodeKind::UnaryOperator(UnaryOperatorNode {
                            operator,
                            operand: Box::new(lhs),
                        }),
                        start,
                    )?
                }
                TokenKind::Keyword(Keyword::In) => {
                    self.advance_past_negation(negated);
                    self.parse_in_predicate(lhs, negated, start)?
                }
                TokenKind::Keyword(Keyword::Between) => {
                    self.advance_past_negation(negated);
                    let low = self.parse_expression(r_bp)?;
                    self.expect_keyword(Keyword::And)?;
                    let high = self.parse_expression(r_bp)?;
                    let operator = if negated {
                        BinaryListOperator::NotBetween
                    } else {
                        BinaryListOperator::Between
                    };
                    self.node_at(
                        NodeKind::BinaryListOperator(BinaryListOperatorNode {
                            operator,
                            left_operand: Box::new(lhs),
                            right_operand_list: NodeList::from_nodes(
                                ListKind::Values,
                                [low, high],
                            )?,
                        }),
                        start,
                    )?
                }
                TokenKind::Keyword(Keyword::Like) => {
                    self.advance_past_negation(negated);
                    let pattern = self.parse_expression(r_bp)?;
                    let escape = if self.consume_keyword(Keyword::Escape) {
                        Some(Box::new(self.parse_expression(r_bp)?))
                    } else {
                        None
                    };
                    let operator = if negated {
                        TernaryOperator::NotLike
                    } else {
                        TernaryOperator::Like
                    };
                    self.node_at(
                        NodeKind::TernaryOperator(TernaryOperatorNode {
                            operator,
                            receiver: Box::new(lhs),
                            left_operand: Box::new(pattern),
                            right_operand: escape,
                        }),
                        start,
                    )?
                }
                _ => {
                    let Some(op) = token_to_binary_op(&operator) else {
                        break;
                    };
                    if let Some(feature) = binary_op_feature(op) {
                        if !self.ctx.config.features.contains(feature) {
                            // A disabled DIV is an ordinary word, e.g. an alias
                            if op == BinaryOperator::Div {
                                break;
                            }
                            return Err(SqlError::FeatureDisabled {
                                feature,
                                offset: self.current.span.start,
                            });
                        }
                    }
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    self.node_at(
                        NodeKind::BinaryOperator(BinaryOperatorNode {
                            operator: op,
                            left_operand: Box::new(lhs),
                            right_operand: Box::new(rhs),
                        }),
                        start,
                    )?
                }
            };
        }

        Ok(lhs)
    }

    /// Consumes the operator keyword, and the `NOT` before it if negated.
    fn advance_past_negation(&mut self, negated: bool) {
        if negated {
            self.advance();
        }
        self.advance();
    }

    /// Parses the parenthesized part of `[NOT] IN`.
    fn parse_in_predicate(&mut self, lhs: Node, negated: bool, start: usize) -> Result<Node> {
        self.expect(&TokenKind::LeftParen)?;

        if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::Values) {
            let query = self.parse_query_expression()?;
            self.expect(&TokenKind::RightParen)?;
            let kind = if negated {
                SubqueryKind::NotIn
            } else {
                SubqueryKind::In
            };
            return self.node_at(
                NodeKind::Subquery(SubqueryNode {
                    kind,
                    result_set: Box::new(query),
                    left_operand: Some(Box::new(lhs)),
                }),
                start,
            );
        }

        let values = self.parse_value_list()?;
        self.expect(&TokenKind::RightParen)?;
        let operator = if negated {
            BinaryListOperator::NotIn
        } else {
            BinaryListOperator::In
        };
        self.node_at(
            NodeKind::BinaryListOperator(BinaryListOperatorNode {
                operator,
                left_operand: Box::new(lhs),
                right_operand_list: values,
            }),
            start,
        )
    }

    /// Parses a prefix expression (unary operators or primary).
    fn parse_prefix(&mut self) -> Result<Node> {
        let start = self.current.span.start;

        if self.check_keyword(Keyword::Not) && self.peek_is(0, &TokenKind::Keyword(Keyword::Exists))
        {
            self.advance();
            return self.parse_exists(start, true);
        }

        if let (Some(op), Some(bp)) = (
            token_to_unary_op(&self.current.kind),
            prefix_binding_power(&self.current.kind),
        ) {
            if let Some(feature) = unary_op_feature(op) {
                self.require_feature(feature, self.current.span)?;
            }
            self.advance();
            let operand = self.parse_expression(bp)?;
            return self.node_at(
                NodeKind::UnaryOperator(UnaryOperatorNode {
                    operator: op,
                    operand: Box::new(operand),
                }),
                start,
            );
        }

        self.parse_primary()
    }

    /// Parses a primary expression.
    #[allow(clippy::too_many_lines)]
    fn parse_primary(&mut self) -> Result<Node> {
        let token = self.current.clone();
        let start = token.span.start;

        let value = match token.kind {
            TokenKind::Integer(n) => ConstantValue::Integer(n),
            TokenKind::Decimal(digits) => ConstantValue::Decimal(digits),
            TokenKind::Float(f) => ConstantValue::Double(f),
            TokenKind::String(s) => ConstantValue::Char(s),
            TokenKind::Blob(b) => ConstantValue::Blob(b),
            TokenKind::Keyword(Keyword::Null) => ConstantValue::Null,
            TokenKind::Keyword(Keyword::True) => ConstantValue::Boolean(true),
            TokenKind::Keyword(Keyword::False) => ConstantValue::Boolean(false),
            TokenKind::Question => {
                self.advance();
                let number = self.ctx.parameters.len();
                return self.parameter(number, token.span);
            }
            TokenKind::DollarParameter(n) => {
                self.require_feature(SqlFeature::DollarParameters, token.span)?;
                let number = usize::try_from(n)
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .ok_or_else(|| {
                        SqlError::syntax("Parameter numbers start at $1", token.span)
                    })?;
                self.advance();
                return self.parameter(number, token.span);
            }
            TokenKind::LeftParen => {
                self.advance();
                if self.check_keyword(Keyword::Select) || self.check_keyword(Keyword::Values) {
                    let query = self.parse_query_expression()?;
                    self.expect(&TokenKind::RightParen)?;
                    return self.node_at(
                        NodeKind::Subquery(SubqueryNode {
                            kind: SubqueryKind::Expression,
                            result_set: Box::new(query),
                            left_operand: None,
                        }),
                        start,
                    );
                }
                let expr = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(expr);
            }
            TokenKind::Keyword(Keyword::Exists) => return self.parse_exists(start, false),
            TokenKind::Keyword(Keyword::Case) => return self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) => return self.parse_cast_expression(),
            TokenKind::Keyword(Keyword::Extract) => return self.parse_extract_expression(),
            TokenKind::Keyword(Keyword::Substring) => return self.parse_substring_expression(),
            TokenKind::Keyword(
                kw @ (Keyword::CurrentDate | Keyword::CurrentTime | Keyword::CurrentTimestamp),
            ) => {
                self.advance();
                let field = match kw {
                    Keyword::CurrentDate => DatetimeField::Date,
                    Keyword::CurrentTime => DatetimeField::Time,
                    _ => DatetimeField::Timestamp,
                };
                return self.node_at(
                    NodeKind::CurrentDatetime(CurrentDatetimeNode { field }),
                    start,
                );
            }
            TokenKind::Keyword(
                kw @ (Keyword::Count | Keyword::Sum | Keyword::Avg | Keyword::Min | Keyword::Max),
            ) if self.peek_is(0, &TokenKind::LeftParen) => {
                return self.parse_aggregate(kw);
            }
            _ if self.at_identifier() => return self.parse_column_or_function(),
            _ => return Err(self.unexpected("expression")),
        };

        self.advance();
        self.node_at(NodeKind::Constant(ConstantNode { value }), start)
    }

    /// Records a parameter and builds its node.
    fn parameter(&mut self, number: usize, span: Span) -> Result<Node> {
        let position = Position::from(span);
        self.ctx.parameters.push(ParameterInfo {
            number,
            begin_offset: position.begin_offset,
            end_offset: position.end_offset,
        });
        self.ctx
            .factory
            .construct_at(NodeKind::Parameter(ParameterNode { number }), position)
    }

    /// Parses a column reference (`c`, `t.c`, `s.t.c`) or a routine call
    /// (`f(...)`, `s.f(...)`).
    fn parse_column_or_function(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        let first = self.expect_identifier()?;

        if self.check(&TokenKind::LeftParen) {
            return self.parse_function_call(start, None, first);
        }
        if !self.consume(&TokenKind::Dot) {
            return self.column_reference(start, None, first);
        }

        let second = self.expect_identifier()?;
        if self.check(&TokenKind::LeftParen) {
            return self.parse_function_call(start, Some(first), second);
        }
        if !self.consume(&TokenKind::Dot) {
            return self.column_reference(start, Some(TableName::new(first)), second);
        }

        let third = self.expect_identifier()?;
        self.column_reference(start, Some(TableName::qualified(first, second)), third)
    }

    fn column_reference(
        &mut self,
        start: usize,
        table_name: Option<TableName>,
        column_name: String,
    ) -> Result<Node> {
        self.node_at(
            NodeKind::ColumnReference(ColumnReferenceNode {
                table_name,
                column_name,
            }),
            start,
        )
    }

    /// Parses a routine call into a host-to-SQL conversion of a method call
    /// whose arguments are SQL-to-host conversions.
    fn parse_function_call(
        &mut self,
        start: usize,
        schema_name: Option<String>,
        method_name: String,
    ) -> Result<Node> {
        self.expect(&TokenKind::LeftParen)?;

        let mut parameters = NodeList::new(ListKind::MethodParameters);
        if !self.check(&TokenKind::RightParen) {
            loop {
                let argument_start = self.current.span.start;
                let argument = self.parse_expression(0)?;
                parameters.push(self.node_at(
                    NodeKind::SqlToHost(SqlToHostNode {
                        value: Box::new(argument),
                    }),
                    argument_start,
                )?)?;
                if !self.consume(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RightParen)?;

        let method_call = self.node_at(
            NodeKind::MethodCall(MethodCallNode {
                schema_name,
                method_name,
                parameters,
            }),
            start,
        )?;
        self.node_at(
            NodeKind::HostToSql(HostToSqlNode {
                method_call: Box::new(method_call),
            }),
            start,
        )
    }

    /// Parses COUNT, SUM, AVG, MIN or MAX.
    fn parse_aggregate(&mut self, keyword: Keyword) -> Result<Node> {
        let start = self.current.span.start;
        self.advance();
        self.expect(&TokenKind::LeftParen)?;

        let (operand, distinct) = if self.check(&TokenKind::Star) {
            if keyword != Keyword::Count {
                return Err(SqlError::syntax(
                    format!("{}(*) is not allowed", keyword.as_str()),
                    self.current.span,
                ));
            }
            self.advance();
            (None, false)
        } else {
            let distinct = if self.check_keyword(Keyword::Distinct) {
                self.advance();
                true
            } else {
                self.consume_keyword(Keyword::All);
                false
            };
            (Some(Box::new(self.parse_expression(0)?)), distinct)
        };
        self.expect(&TokenKind::RightParen)?;

        self.node_at(
            NodeKind::Aggregate(AggregateNode {
                name: keyword.as_str().to_string(),
                operand,
                distinct,
            }),
            start,
        )
    }

    /// Parses `EXISTS (query)`; `start` covers a preceding `NOT`.
    fn parse_exists(&mut self, start: usize, negated: bool) -> Result<Node> {
        self.expect_keyword(Keyword::Exists)?;
        self.expect(&TokenKind::LeftParen)?;
        let query = self.parse_query_expression()?;
        self.expect(&TokenKind::RightParen)?;
        let kind = if negated {
            SubqueryKind::NotExists
        } else {
            SubqueryKind::Exists
        };
        self.node_at(
            NodeKind::Subquery(SubqueryNode {
                kind,
                result_set: Box::new(query),
                left_operand: None,
            }),
            start,
        )
    }

    /// Parses CAST expression.
    fn parse_cast_expression(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let operand = self.parse_expression(0)?;
        self.expect_keyword(Keyword::As)?;
        let target_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;

        self.node_at(
            NodeKind::Cast(CastNode {
                operand: Box::new(operand),
                target_type,
            }),
            start,
        )
    }

    /// Parses CASE expression into nested conditionals.
    ///
    /// The operand of a simple CASE is compared against each WHEN value
    /// through its own copy. A missing ELSE yields NULL.
    fn parse_case_expression(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Case)?;

        // Check for simple CASE (CASE expr WHEN ...)
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(self.parse_expression(0)?)
        };

        let mut branches = vec![];
        while self.check_keyword(Keyword::When) {
            let when_start = self.current.span.start;
            self.advance();
            let condition = self.parse_expression(0)?;
            let condition = match &operand {
                Some(operand) => self.node_at(
                    NodeKind::BinaryOperator(BinaryOperatorNode {
                        operator: BinaryOperator::Equals,
                        left_operand: Box::new(self.ctx.factory.copy(operand)),
                        right_operand: Box::new(condition),
                    }),
                    when_start,
                )?,
                None => condition,
            };
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression(0)?;
            branches.push((when_start, condition, result));
        }

        if branches.is_empty() {
            return Err(self.unexpected("WHEN"));
        }

        let mut else_node = if self.check_keyword(Keyword::Else) {
            self.advance();
            self.parse_expression(0)?
        } else {
            self.ctx.factory.construct(NodeKind::Constant(ConstantNode {
                value: ConstantValue::Null,
            }))?
        };

        self.expect_keyword(Keyword::End)?;

        // Fold from the last WHEN outwards; the outermost covers the whole CASE
        for (index, (when_start, condition, result)) in branches.into_iter().enumerate().rev() {
            let begin = if index == 0 { start } else { when_start };
            else_node = self.node_at(
                NodeKind::Conditional(ConditionalNode {
                    test_condition: Box::new(condition),
                    then_node: Box::new(result),
                    else_node: Box::new(else_node),
                }),
                begin,
            )?;
        }

        Ok(else_node)
    }

    /// Parses `EXTRACT(field FROM expr)`.
    fn parse_extract_expression(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Extract)?;
        self.expect(&TokenKind::LeftParen)?;

        let field = match self.current.kind {
            TokenKind::Keyword(Keyword::Year) => ExtractField::Year,
            TokenKind::Keyword(Keyword::Month) => ExtractField::Month,
            TokenKind::Keyword(Keyword::Day) => ExtractField::Day,
            TokenKind::Keyword(Keyword::Hour) => ExtractField::Hour,
            TokenKind::Keyword(Keyword::Minute) => ExtractField::Minute,
            TokenKind::Keyword(Keyword::Second) => ExtractField::Second,
            _ => return Err(self.unexpected("datetime field")),
        };
        self.advance();
        self.expect_keyword(Keyword::From)?;
        let operand = self.parse_expression(0)?;
        self.expect(&TokenKind::RightParen)?;

        self.node_at(
            NodeKind::ExtractOperator(ExtractOperatorNode {
                field,
                operand: Box::new(operand),
            }),
            start,
        )
    }

    /// Parses `SUBSTRING(s FROM a [FOR b])` or `SUBSTRING(s, a [, b])`.
    fn parse_substring_expression(&mut self) -> Result<Node> {
        let start = self.current.span.start;
        self.expect_keyword(Keyword::Substring)?;
        self.expect(&TokenKind::LeftParen)?;

        let receiver = self.parse_expression(0)?;
        let (from, length) = if self.consume_keyword(Keyword::From) {
            let from = self.parse_expression(0)?;
            let length = if self.consume_keyword(Keyword::For) {
                Some(Box::new(self.parse_expression(0)?))
            } else {
                None
            };
            (from, length)
        } else {
            self.expect(&TokenKind::Comma)?;
            let from = self.parse_expression(0)?;
            let length = if self.consume(&TokenKind::Comma) {
                Some(Box::new(self.parse_expression(0)?))
            } else {
                None
            };
            (from, length)
        };
        self.expect(&TokenKind::RightParen)?;

        self.node_at(
            NodeKind::TernaryOperator(TernaryOperatorNode {
                operator: TernaryOperator::Substring,
                receiver: Box::new(receiver),
                left_operand: Box::new(from),
                right_operand: length,
            }),
            start,
        )
    }

    /// Parses a data type.
    fn parse_data_type(&mut self) -> Result<DataTypeDescriptor> {
        let data_type = match &self.current.kind {
            TokenKind::Keyword(Keyword::Int | Keyword::Integer) => {
                self.advance();
                DataType::Integer
            }
            TokenKind::Keyword(Keyword::Smallint) => {
                self.advance();
                DataType::Smallint
            }
            TokenKind::Keyword(Keyword::Bigint) => {
                self.advance();
                DataType::Bigint
            }
            TokenKind::Keyword(Keyword::Real) => {
                self.advance();
                DataType::Real
            }
            TokenKind::Keyword(Keyword::Double) => {
                self.advance();
                self.consume_keyword(Keyword::Precision);
                DataType::Double
            }
            TokenKind::Keyword(Keyword::Float) => {
                self.advance();
                DataType::Double
            }
            TokenKind::Keyword(Keyword::Decimal) => {
                self.advance();
                let (precision, scale) = self.parse_optional_precision_scale()?;
                DataType::Decimal { precision, scale }
            }
            TokenKind::Keyword(Keyword::Numeric) => {
                self.advance();
                let (precision, scale) = self.parse_optional_precision_scale()?;
                DataType::Numeric { precision, scale }
            }
            TokenKind::Keyword(Keyword::Char | Keyword::Character) => {
                self.advance();
                let varying = self.consume_keyword(Keyword::Varying);
                let len = self.parse_optional_length()?;
                if varying {
                    DataType::Varchar(len)
                } else {
                    DataType::Char(len)
                }
            }
            TokenKind::Keyword(Keyword::Varchar) => {
                self.advance();
                let len = self.parse_optional_length()?;
                DataType::Varchar(len)
            }
            TokenKind::Keyword(Keyword::Text) => {
                self.advance();
                DataType::Text
            }
            TokenKind::Keyword(Keyword::Blob) => {
                self.advance();
                DataType::Blob
            }
            TokenKind::Keyword(Keyword::Boolean) => {
                self.advance();
                DataType::Boolean
            }
            TokenKind::Keyword(Keyword::Date) => {
                self.advance();
                DataType::Date
            }
            TokenKind::Keyword(Keyword::Time) => {
                self.advance();
                DataType::Time
            }
            TokenKind::Keyword(Keyword::Timestamp) => {
                self.advance();
                DataType::Timestamp
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                DataType::Custom(name)
            }
            _ => return Err(self.unexpected("data type")),
        };

        Ok(DataTypeDescriptor::new(data_type))
    }

    /// Parses optional precision and scale (for DECIMAL/NUMERIC).
    fn parse_optional_precision_scale(&mut self) -> Result<(Option<u16>, Option<u16>)> {
        if !self.check(&TokenKind::LeftParen) {
            return Ok((None, None));
        }
        self.advance();

        let precision = self.parse_type_argument("Precision too large")?;
        let scale = if self.consume(&TokenKind::Comma) {
            Some(self.parse_type_argument("Scale too large")?)
        } else {
            None
        };

        self.expect(&TokenKind::RightParen)?;
        Ok((Some(precision), scale))
    }

    /// Parses optional length (for CHAR/VARCHAR).
    fn parse_optional_length(&mut self) -> Result<Option<u32>> {
        if !self.check(&TokenKind::LeftParen) {
            return Ok(None);
        }
        self.advance();
        let length = self.parse_type_argument("Length too large")?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Some(length))
    }

    fn parse_type_argument<T: TryFrom<i64>>(&mut self, too_large: &str) -> Result<T> {
        let TokenKind::Integer(n) = self.current.kind else {
            return Err(self.unexpected("integer"));
        };
        let value = T::try_from(n).map_err(|_| SqlError::syntax(too_large, self.current.span))?;
        self.advance();
        Ok(value)
    }

    /// Parses a comma-separated list of expressions.
    fn parse_value_list(&mut self) -> Result<NodeList> {
        let mut values = NodeList::new(ListKind::Values);
        loop {
            values.push(self.parse_expression(0)?)?;
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        Ok(values)
    }

    /// Parses a parenthesized, comma-separated list of column names.
    fn parse_column_reference_list(&mut self) -> Result<NodeList> {
        self.expect(&TokenKind::LeftParen)?;
        let mut columns = NodeList::new(ListKind::ColumnReferences);
        loop {
            let start = self.current.span.start;
            let column_name = self.expect_identifier()?;
            columns.push(self.column_reference(start, None, column_name)?)?;
            if !self.consume(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(columns)
    }

    /// Parses `name` or `schema.name`.
    fn parse_table_name(&mut self) -> Result<TableName> {
        let first = self.expect_identifier()?;
        if self.consume(&TokenKind::Dot) {
            Ok(TableName::qualified(first, self.expect_identifier()?))
        } else {
            Ok(TableName::new(first))
        }
    }

    // --- Helper methods ---

    /// Advances to the next token.
    fn advance(&mut self) {
        self.previous = core::mem::replace(&mut self.current, self.lexer.next_token());
    }

    /// Returns the kind of the token `n` places after the current one.
    fn peek_kind(&self, n: usize) -> TokenKind {
        let mut lexer = self.lexer.clone();
        let mut token = lexer.next_token();
        for _ in 0..n {
            if token.is_eof() {
                break;
            }
            token = lexer.next_token();
        }
        token.kind
    }

    fn peek_is(&self, n: usize, kind: &TokenKind) -> bool {
        self.peek_kind(n) == *kind
    }

    /// Checks if the current token matches the given kind.
    fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Consumes the current token if it matches the given kind.
    fn consume(&mut self, kind: &TokenKind) -> bool {
        let matched = self.check(kind);
        if matched {
            self.advance();
        }
        matched
    }

    /// Consumes the current token if it is the given keyword.
    fn consume_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.check_keyword(keyword);
        if matched {
            self.advance();
        }
        matched
    }

    fn consume_row_keyword(&mut self) -> bool {
        self.consume_keyword(Keyword::Row) || self.consume_keyword(Keyword::Rows)
    }

    /// Expects the current token to be the given kind.
    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(format!("{kind:?}")))
        }
    }

    /// Expects the current token to be the given keyword.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Returns true if the current token can be read as an identifier.
    fn at_identifier(&self) -> bool {
        match &self.current.kind {
            TokenKind::Identifier(_) => true,
            TokenKind::Keyword(kw) => !kw.is_reserved(),
            _ => false,
        }
    }

    /// Expects and returns an identifier. Non-reserved keywords are taken
    /// as written.
    fn expect_identifier(&mut self) -> Result<String> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Keyword(kw) if !kw.is_reserved() => {
                self.lexer.slice(self.current.span).to_string()
            }
            _ => return Err(self.unexpected("identifier")),
        };
        let limit = self.ctx.config.max_identifier_length;
        if name.chars().count() > limit {
            return Err(SqlError::syntax(
                format!("Identifier '{name}' is longer than {limit} characters"),
                self.current.span,
            ));
        }
        self.advance();
        Ok(name)
    }

    fn require_feature(&self, feature: SqlFeature, span: Span) -> Result<()> {
        if self.ctx.config.features.contains(feature) {
            Ok(())
        } else {
            Err(SqlError::FeatureDisabled {
                feature,
                offset: span.start,
            })
        }
    }

    fn unexpected(&self, expected: impl AsRef<str>) -> SqlError {
        SqlError::unexpected(expected, &self.current.kind, self.current.span)
    }

    /// Position from `start` through the end of the last consumed token.
    fn position_from(&self, start: usize) -> Position {
        Position::new(start, self.previous.span.end.saturating_sub(1).max(start))
    }

    /// Builds a node spanning from `start` to the last consumed token.
    fn node_at(&self, kind: NodeKind, start: usize) -> Result<Node> {
        self.ctx
            .factory
            .construct_at(kind, self.position_from(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Features;

    fn parse(sql: &str) -> Result<Node> {
        let config = ParserConfig::default();
        Parser::new(sql, &config).parse().map(|(node, _)| node)
    }

    fn parse_with(sql: &str, features: Features) -> Result<Node> {
        let config = ParserConfig::with_features(features);
        Parser::new(sql, &config).parse().map(|(node, _)| node)
    }

    fn cursor_query(node: &Node) -> &Node {
        match node.kind() {
            NodeKind::Cursor(cursor) => &cursor.result_set,
            other => panic!("Expected cursor, got {}", other.name()),
        }
    }

    fn select(node: &Node) -> &SelectNode {
        match cursor_query(node).kind() {
            NodeKind::Select(select) => select,
            other => panic!("Expected SELECT, got {}", other.name()),
        }
    }

    fn first_expression(node: &Node) -> &Node {
        match select(node).result_columns.get(0).map(Node::kind) {
            Some(NodeKind::ResultColumn(column)) => &column.expression,
            other => panic!("Expected result column, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_select() {
        let node = parse("SELECT id, name FROM users").unwrap();
        let select = select(&node);
        assert_eq!(select.result_columns.len(), 2);
        assert_eq!(select.from_list.len(), 1);
        assert_eq!(node.position(), Some(Position::new(0, 25)));
    }

    #[test]
    fn test_expression_precedence() {
        let node = parse("SELECT 1 + 2 * 3").unwrap();
        match first_expression(&node).kind() {
            NodeKind::BinaryOperator(add) => {
                assert_eq!(add.operator, BinaryOperator::Plus);
                match add.right_operand.kind() {
                    NodeKind::BinaryOperator(mul) => {
                        assert_eq!(mul.operator, BinaryOperator::Times);
                    }
                    other => panic!("Expected multiplication, got {}", other.name()),
                }
            }
            other => panic!("Expected addition, got {}", other.name()),
        }
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        let node = parse("SELECT NOT a = 1").unwrap();
        match first_expression(&node).kind() {
            NodeKind::UnaryOperator(not) => {
                assert_eq!(not.operator, UnaryOperator::Not);
                assert!(matches!(not.operand.kind(), NodeKind::BinaryOperator(_)));
            }
            other => panic!("Expected NOT, got {}", other.name()),
        }
    }

    #[test]
    fn test_not_between() {
        let node = parse("SELECT a NOT BETWEEN 1 AND 2 FROM t").unwrap();
        match first_expression(&node).kind() {
            NodeKind::BinaryListOperator(between) => {
                assert_eq!(between.operator, BinaryListOperator::NotBetween);
                assert_eq!(between.right_operand_list.len(), 2);
            }
            other => panic!("Expected BETWEEN, got {}", other.name()),
        }
    }

    #[test]
    fn test_is_not_null() {
        let node = parse("SELECT a IS NOT NULL FROM t").unwrap();
        assert!(matches!(
            first_expression(&node).kind(),
            NodeKind::UnaryOperator(UnaryOperatorNode {
                operator: UnaryOperator::IsNotNull,
                ..
            })
        ));
    }

    #[test]
    fn test_non_reserved_keyword_as_column() {
        let node = parse("SELECT year FROM t").unwrap();
        match first_expression(&node).kind() {
            NodeKind::ColumnReference(column) => assert_eq!(column.column_name, "year"),
            other => panic!("Expected column, got {}", other.name()),
        }
    }

    #[test]
    fn test_identifier_length_limit() {
        let config = ParserConfig {
            max_identifier_length: 4,
            ..ParserConfig::default()
        };
        assert!(Parser::new("SELECT abcd FROM t", &config).parse().is_ok());
        let err = Parser::new("SELECT abcde FROM t", &config)
            .parse()
            .unwrap_err();
        assert_eq!(err.offset(), Some(7));
    }

    #[test]
    fn test_nesting_depth_limit() {
        let config = ParserConfig::default();
        let nested = |depth: usize| {
            format!("SELECT {}1{} FROM t", "(".repeat(depth), ")".repeat(depth))
        };
        assert!(Parser::new(&nested(20), &config).parse().is_ok());

        let err = Parser::new(&nested(20_000), &config).parse().unwrap_err();
        assert!(matches!(err, SqlError::Syntax { .. }));
        assert!(err.to_string().contains("nested more than 32 levels"));
    }

    #[test]
    fn test_nesting_depth_is_configurable() {
        let config = ParserConfig {
            max_nesting_depth: 4,
            ..ParserConfig::default()
        };
        assert!(Parser::new("SELECT (1) FROM t", &config).parse().is_ok());
        assert!(Parser::new("SELECT ((((1)))) FROM t", &config).parse().is_err());
        assert!(Parser::new("SELECT a FROM ((((t))))", &config).parse().is_err());
    }

    #[test]
    fn test_div_without_feature_is_alias() {
        let node = parse("SELECT a div FROM t").unwrap();
        match select(&node).result_columns.get(0).map(Node::kind) {
            Some(NodeKind::ResultColumn(column)) => {
                assert_eq!(column.name.as_deref(), Some("div"));
            }
            other => panic!("Expected result column, got {other:?}"),
        }

        let node = parse_with("SELECT a DIV 2 FROM t", Features::all()).unwrap();
        assert!(matches!(
            first_expression(&node).kind(),
            NodeKind::BinaryOperator(BinaryOperatorNode {
                operator: BinaryOperator::Div,
                ..
            })
        ));
    }

    #[test]
    fn test_trailing_semicolon() {
        assert!(parse("SELECT 1;").is_ok());
        assert!(parse("SELECT 1; SELECT 2").is_err());
    }

    #[test]
    fn test_empty_input() {
        let err = parse("").unwrap_err();
        assert!(err.to_string().contains("Unexpected end of input"));
    }
}
