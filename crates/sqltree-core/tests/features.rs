//! Tests for optional grammar features.

mod common;
use common::*;

use sqltree_core::ast::{BinaryOperator, UnaryOperator};
use sqltree_core::{parse_statement, Features, NodeKind, SqlError, SqlFeature};

fn disabled(sql: &str) -> (SqlFeature, usize) {
    match parse_statement(sql, &Features::none()) {
        Err(SqlError::FeatureDisabled { feature, offset }) => (feature, offset),
        other => panic!("Expected a disabled feature for {sql}, got {other:?}"),
    }
}

#[test]
fn gated_infix_operators() {
    let cases = [
        ("SELECT a % 2 FROM t", SqlFeature::InfixMod),
        ("SELECT a & 2 FROM t", SqlFeature::InfixBitOperators),
        ("SELECT a | 2 FROM t", SqlFeature::InfixBitOperators),
        ("SELECT a ^ 2 FROM t", SqlFeature::InfixBitOperators),
        ("SELECT a << 2 FROM t", SqlFeature::InfixBitOperators),
        ("SELECT a >> 2 FROM t", SqlFeature::InfixBitOperators),
    ];
    for (sql, feature) in cases {
        assert_eq!(disabled(sql), (feature, 9), "{sql}");
    }
}

#[test]
fn gated_prefix_operator() {
    assert_eq!(
        disabled("SELECT ~a FROM t"),
        (SqlFeature::InfixBitOperators, 7)
    );
}

#[test]
fn enabled_operators_build_nodes() {
    let node = parse_with("SELECT a % 2 FROM t", &[SqlFeature::InfixMod]);
    assert!(matches!(
        expr(&node).kind(),
        NodeKind::BinaryOperator(op) if op.operator == BinaryOperator::Mod
    ));

    let node = parse_with("SELECT ~a FROM t", &[SqlFeature::InfixBitOperators]);
    assert!(matches!(
        expr(&node).kind(),
        NodeKind::UnaryOperator(op) if op.operator == UnaryOperator::BitNot
    ));
}

#[test]
fn mod_binds_like_multiplication() {
    let node = parse_with("SELECT a + b % 2 FROM t", &[SqlFeature::InfixMod]);
    match expr(&node).kind() {
        NodeKind::BinaryOperator(op) => {
            assert_eq!(op.operator, BinaryOperator::Plus);
            assert!(matches!(
                op.right_operand.kind(),
                NodeKind::BinaryOperator(r) if r.operator == BinaryOperator::Mod
            ));
        }
        other => panic!("Expected binary operator, got {}", other.name()),
    }
}

#[test]
fn div_operator() {
    let node = parse_with("SELECT a DIV 2 FROM t", &[SqlFeature::DivOperator]);
    assert!(matches!(
        expr(&node).kind(),
        NodeKind::BinaryOperator(op) if op.operator == BinaryOperator::Div
    ));

    // Without the feature DIV is an ordinary word
    let node = parse("SELECT a div FROM t");
    assert_eq!(result_column(&node, 0).name.as_deref(), Some("div"));
    let err = parse_err("SELECT a DIV 2 FROM t");
    assert!(matches!(err, SqlError::Syntax { .. }));
}

#[test]
fn enabling_features_keeps_tree_shape() {
    let sql = "SELECT a + 1 FROM t WHERE b = ?";
    let core = parse_statement(sql, &Features::none()).unwrap().root;
    let full = parse_statement(sql, &Features::all()).unwrap().root;
    assert!(core.is_equivalent(&full));
    assert_eq!(core.tree_print(), full.tree_print());
}

#[test]
fn feature_directives() {
    let mut features = Features::none();
    features.apply("+INFIX_MOD").unwrap();
    assert!(parse_statement("SELECT 5 % 2", &features).is_ok());
    features.apply("-infix_mod").unwrap();
    assert!(parse_statement("SELECT 5 % 2", &features).is_err());
}
