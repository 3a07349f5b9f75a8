//! Tests for dynamic parameter numbering and offsets.

mod common;
use common::*;

use sqltree_core::{
    parse_statement, Features, NodeKind, ParameterInfo, SqlError, SqlFeature, SqlParser,
};

fn parameters(sql: &str) -> Vec<ParameterInfo> {
    let mut parser = SqlParser::new();
    parser
        .parse_statement(sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));
    parser.parameter_list().to_vec()
}

fn info(number: usize, begin_offset: usize, end_offset: usize) -> ParameterInfo {
    ParameterInfo {
        number,
        begin_offset,
        end_offset,
    }
}

#[test]
fn single_question_mark() {
    assert_eq!(
        parameters("SELECT * FROM foo WHERE X = ?"),
        vec![info(0, 28, 28)]
    );
}

#[test]
fn question_marks_in_source_order() {
    assert_eq!(
        parameters("SELECT * FROM foo WHERE X = ? and Y = ?"),
        vec![info(0, 28, 28), info(1, 38, 38)]
    );
}

#[test]
fn no_parameters() {
    assert!(parameters("SELECT * FROM foo").is_empty());
}

#[test]
fn parameters_everywhere() {
    let params = parameters("INSERT INTO t VALUES (?, ?), (?, 4)");
    let numbers: Vec<_> = params.iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![0, 1, 2]);
    assert_eq!(params[0].begin_offset, 22);
    assert_eq!(params[2].begin_offset, 30);
}

#[test]
fn parameter_node_matches_info() {
    let node = parse("SELECT a FROM t WHERE a = ?");
    let (_, _, right) = match where_clause(&node).kind() {
        NodeKind::BinaryOperator(op) => (op.operator, &op.left_operand, &op.right_operand),
        other => panic!("Expected binary operator, got {}", other.name()),
    };
    assert!(matches!(right.kind(), NodeKind::Parameter(p) if p.number == 0));
    assert_eq!(right.begin_offset(), Some(26));
    assert_eq!(right.end_offset(), Some(26));
}

#[test]
fn dollar_parameter_is_one_based_in_text() {
    let params = parameters("SELECT a FROM t WHERE a = $1 AND b = $12");
    assert_eq!(params, vec![info(0, 26, 27), info(11, 37, 39)]);
}

#[test]
fn mixed_placeholders() {
    assert_eq!(
        parameters("SELECT * FROM foo WHERE X = $1 and Y = ?"),
        vec![info(0, 28, 29), info(1, 39, 39)]
    );
}

#[test]
fn dollar_parameter_needs_feature() {
    let err = parse_statement("SELECT a FROM t WHERE a = $1", &Features::none()).unwrap_err();
    assert_eq!(
        err,
        SqlError::FeatureDisabled {
            feature: SqlFeature::DollarParameters,
            offset: 26,
        }
    );
}

#[test]
fn dollar_zero_rejected() {
    let err = parse_err("SELECT $0");
    assert!(matches!(err, SqlError::Syntax { offset: 7, .. }));
}

#[test]
fn parsed_statement_carries_parameters() {
    let parsed = parse_statement("UPDATE t SET a = ? WHERE b = ?", &Features::default()).unwrap();
    assert_eq!(parsed.parameters.len(), 2);
    assert_eq!(parsed.parameters[1].position().begin_offset, 29);
}

#[test]
fn parameters_serialize_to_json() {
    let params = parameters("SELECT ?");
    let json = serde_json::to_string(&params).unwrap();
    assert_eq!(json, r#"[{"number":0,"begin_offset":7,"end_offset":7}]"#);
}
