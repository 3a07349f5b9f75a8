//! Tests for INSERT, UPDATE, DELETE and the session statements.

mod common;
use common::*;

use sqltree_core::ast::{ConstantValue, TableName, TransactionOperation};
use sqltree_core::{ListKind, Node, NodeKind};

fn row_widths(values: &Node) -> Vec<usize> {
    match values.kind() {
        NodeKind::Values(v) => v
            .rows
            .iter()
            .map(|row| match row.kind() {
                NodeKind::RowResultSet(r) => r.values.len(),
                other => panic!("Expected row, got {}", other.name()),
            })
            .collect(),
        other => panic!("Expected VALUES, got {}", other.name()),
    }
}

// ===================================================================
// INSERT
// ===================================================================

#[test]
fn insert_values_with_columns() {
    let node = parse("INSERT INTO app.t (a, b) VALUES (1, 'x'), (2, 'y')");
    match node.kind() {
        NodeKind::Insert(insert) => {
            assert_eq!(insert.target_table, TableName::qualified("app", "t"));
            let columns = insert.target_columns.as_ref().unwrap();
            assert_eq!(columns.kind(), ListKind::ColumnReferences);
            assert_eq!(columns.len(), 2);
            assert_eq!(row_widths(&insert.result_set), vec![2, 2]);
        }
        other => panic!("Expected INSERT, got {}", other.name()),
    }
    assert!(node.is_atomic());
    assert_eq!(node.statement_to_string(), Some("INSERT"));
}

#[test]
fn insert_select() {
    let node = parse("INSERT INTO t SELECT a FROM u");
    match node.kind() {
        NodeKind::Insert(insert) => {
            assert!(insert.target_columns.is_none());
            assert!(matches!(insert.result_set.kind(), NodeKind::Select(_)));
        }
        other => panic!("Expected INSERT, got {}", other.name()),
    }
}

#[test]
fn insert_parenthesized_query() {
    let node = parse("INSERT INTO t (SELECT a FROM u)");
    assert!(matches!(
        node.kind(),
        NodeKind::Insert(i) if i.target_columns.is_none()
    ));
}

#[test]
fn insert_rows_must_match() {
    let _ = parse_err("INSERT INTO t VALUES (1, 2), (3)");
}

// ===================================================================
// UPDATE and DELETE
// ===================================================================

#[test]
fn update_set_clause() {
    let node = parse("UPDATE t AS x SET a = 1, b = b + 1 WHERE id = ?");
    match node.kind() {
        NodeKind::Update(update) => {
            assert_eq!(update.target_table, TableName::new("t"));
            assert_eq!(update.correlation_name.as_deref(), Some("x"));
            let names: Vec<_> = update
                .set_clause
                .iter()
                .map(|c| match c.kind() {
                    NodeKind::ResultColumn(c) => c.name.clone(),
                    other => panic!("Expected result column, got {}", other.name()),
                })
                .collect();
            assert_eq!(names, vec![Some(String::from("a")), Some(String::from("b"))]);
            assert!(update.where_clause.is_some());
        }
        other => panic!("Expected UPDATE, got {}", other.name()),
    }
}

#[test]
fn update_without_where() {
    let node = parse("UPDATE t SET a = NULL");
    assert!(matches!(
        node.kind(),
        NodeKind::Update(u) if u.where_clause.is_none() && u.correlation_name.is_none()
    ));
}

#[test]
fn update_requires_assignment() {
    let _ = parse_err("UPDATE t SET");
    let _ = parse_err("UPDATE t SET a 1");
}

#[test]
fn delete_statement() {
    let node = parse("DELETE FROM t x WHERE x.a IN (1, 2)");
    match node.kind() {
        NodeKind::Delete(delete) => {
            assert_eq!(delete.target_table, TableName::new("t"));
            assert_eq!(delete.correlation_name.as_deref(), Some("x"));
            assert!(matches!(
                delete.where_clause.as_deref().map(Node::kind),
                Some(NodeKind::BinaryListOperator(_))
            ));
        }
        other => panic!("Expected DELETE, got {}", other.name()),
    }

    let node = parse("DELETE FROM t");
    assert!(matches!(node.kind(), NodeKind::Delete(d) if d.where_clause.is_none()));
}

// ===================================================================
// Session statements
// ===================================================================

#[test]
fn set_schema() {
    let node = parse("SET SCHEMA app");
    assert!(matches!(
        node.kind(),
        NodeKind::SetSchema(s) if s.schema_name == "app"
    ));
    assert_eq!(node.statement_to_string(), Some("SET SCHEMA"));
    assert!(!node.is_atomic());
}

#[test]
fn set_constraints() {
    let node = parse("SET CONSTRAINTS ALL DEFERRED");
    assert!(matches!(
        node.kind(),
        NodeKind::SetConstraints(s) if s.all && s.deferred && s.constraints.is_none()
    ));

    let node = parse("SET CONSTRAINTS app.c1, c2 IMMEDIATE");
    match node.kind() {
        NodeKind::SetConstraints(s) => {
            assert!(!s.all);
            assert!(!s.deferred);
            let names: Vec<_> = s
                .constraints
                .as_ref()
                .unwrap()
                .iter()
                .map(|n| match n.kind() {
                    NodeKind::TableName(name) => name.full_name(),
                    other => panic!("Expected table name, got {}", other.name()),
                })
                .collect();
            assert_eq!(names, vec!["app.c1", "c2"]);
        }
        other => panic!("Expected SET CONSTRAINTS, got {}", other.name()),
    }
}

#[test]
fn set_constraints_needs_mode() {
    let _ = parse_err("SET CONSTRAINTS ALL");
}

#[test]
fn set_configuration() {
    let cases = [
        ("SET search_path = 'app'", "search_path", "app"),
        ("SET timeout TO 30", "timeout", "30"),
        ("SET mode = fast", "mode", "fast"),
    ];
    for (sql, variable, value) in cases {
        match parse(sql).kind() {
            NodeKind::SetConfiguration(s) => {
                assert_eq!(s.variable, variable, "{sql}");
                assert_eq!(s.value, value, "{sql}");
            }
            other => panic!("Expected configuration, got {}", other.name()),
        }
    }
}

#[test]
fn transaction_control() {
    let cases = [
        ("BEGIN", TransactionOperation::Begin),
        ("BEGIN TRANSACTION", TransactionOperation::Begin),
        ("START TRANSACTION", TransactionOperation::Begin),
        ("COMMIT", TransactionOperation::Commit),
        ("COMMIT WORK", TransactionOperation::Commit),
        ("ROLLBACK", TransactionOperation::Rollback),
    ];
    for (sql, expected) in cases {
        let node = parse(sql);
        assert!(
            matches!(node.kind(), NodeKind::TransactionControl(t) if t.operation == expected),
            "{sql}"
        );
        assert_eq!(node.statement_to_string(), Some(expected.as_str()));
    }
}

#[test]
fn negative_literal_in_insert_row() {
    let node = parse("INSERT INTO t VALUES (-1)");
    let NodeKind::Insert(insert) = node.kind() else {
        panic!("Expected INSERT");
    };
    let NodeKind::Values(values) = insert.result_set.kind() else {
        panic!("Expected VALUES");
    };
    let NodeKind::RowResultSet(row) = values.rows.get(0).unwrap().kind() else {
        panic!("Expected row");
    };
    let value = row.values.get(0).unwrap();
    assert!(value.is_constant_expression());
    assert!(value.constant_value().is_none());
    assert!(matches!(
        value.kind(),
        NodeKind::UnaryOperator(u) if u.operand.constant_value() == Some(&ConstantValue::Integer(1))
    ));
}
