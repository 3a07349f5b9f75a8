#![allow(dead_code)]

use sqltree_core::ast::{ResultColumnNode, SelectNode};
use sqltree_core::{Features, Node, NodeKind, SqlError, SqlFeature, SqlParser};

pub fn parse(sql: &str) -> Node {
    SqlParser::new()
        .parse_statement(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_with(sql: &str, features: &[SqlFeature]) -> Node {
    let mut parser = SqlParser::new();
    for feature in features {
        parser.features_mut().enable(*feature);
    }
    parser
        .parse_statement(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_all(sql: &str) -> Node {
    sqltree_core::parse_statement(sql, &Features::all())
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
        .root
}

pub fn parse_err(sql: &str) -> SqlError {
    SqlParser::new()
        .parse_statement(sql)
        .expect_err(&format!("Expected parse error for: {sql}"))
}

/// Returns the query of a cursor statement.
pub fn query(node: &Node) -> &Node {
    match node.kind() {
        NodeKind::Cursor(cursor) => &cursor.result_set,
        other => panic!("Expected cursor, got {}", other.name()),
    }
}

pub fn select(node: &Node) -> &SelectNode {
    match query(node).kind() {
        NodeKind::Select(select) => select,
        other => panic!("Expected SELECT, got {}", other.name()),
    }
}

pub fn result_column(node: &Node, index: usize) -> &ResultColumnNode {
    match select(node).result_columns.get(index).map(Node::kind) {
        Some(NodeKind::ResultColumn(column)) => column,
        other => panic!("Expected result column {index}, got {other:?}"),
    }
}

/// Returns the expression of the first select list entry.
pub fn expr(node: &Node) -> &Node {
    &result_column(node, 0).expression
}

pub fn where_clause(node: &Node) -> &Node {
    select(node)
        .where_clause
        .as_deref()
        .unwrap_or_else(|| panic!("Expected a WHERE clause"))
}

/// Parses `SELECT <expression> FROM t` and returns a fresh tree.
pub fn parse_expr(expression: &str) -> Node {
    parse(&format!("SELECT {expression} FROM t"))
}
