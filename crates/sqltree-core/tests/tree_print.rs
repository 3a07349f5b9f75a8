//! Golden tests for the indented tree rendering.

mod common;
use common::*;

#[test]
fn select_with_where() {
    let expected = "\
CursorNode
result_set:
  SelectNode
  distinct: false
  result_columns:
    ResultColumnList
    [0]:
      ResultColumnNode
      expression:
        ColumnReferenceNode
        column_name: a
  from_list:
    FromList
    [0]:
      FromBaseTableNode
      table_name: t
  where_clause:
    BinaryOperatorNode
    operator: =
    method_name: equals
    left_operand:
      ColumnReferenceNode
      column_name: b
    right_operand:
      ConstantNode
      value: 1
";
    assert_eq!(parse("SELECT a FROM t WHERE b = 1").tree_print(), expected);
}

#[test]
fn values_rows() {
    let expected = "\
CursorNode
result_set:
  ValuesNode
  rows:
    RowNodeList
    [0]:
      RowResultSetNode
      values:
        ValueNodeList
        [0]:
          ConstantNode
          value: 1
        [1]:
          ConstantNode
          value: 'x'
";
    assert_eq!(parse("VALUES (1, 'x')").tree_print(), expected);
}

#[test]
fn aliases_and_parameters() {
    let expected = "\
CursorNode
result_set:
  SelectNode
  distinct: true
  result_columns:
    ResultColumnList
    [0]:
      ResultColumnNode
      name: total
      expression:
        ParameterNode
        number: 0
  from_list:
    FromList
";
    assert_eq!(parse("SELECT DISTINCT ? AS total").tree_print(), expected);
}

#[test]
fn create_table() {
    let expected = "\
CreateTableNode
object_name: t
elements:
  TableElementList
  [0]:
    ColumnDefinitionNode
    name: id
    data_type: INTEGER NOT NULL
  [1]:
    ConstraintDefinitionNode
    constraint_type: PRIMARY KEY
    behavior: DEFAULT
    column_list:
      ColumnReferenceList
      [0]:
        ColumnReferenceNode
        column_name: id
";
    assert_eq!(
        parse("CREATE TABLE t (id INT NOT NULL PRIMARY KEY)").tree_print(),
        expected
    );
}

#[test]
fn index_function_application() {
    let expected = "\
CreateIndexNode
object_name: i
table_name: t
unique: false
columns:
  IndexColumnList
  function_name: f
  first_argument: 0
  last_argument: 1
  [0]:
    IndexColumnNode
    column_name: a
    ascending: true
  [1]:
    IndexColumnNode
    column_name: b
    ascending: true
";
    assert_eq!(parse("CREATE INDEX i ON t (f(a, b))").tree_print(), expected);
}

#[test]
fn print_is_stable_across_copies_and_spacing() {
    let a = parse("SELECT a FROM t WHERE b = 1");
    let b = parse("select a\n  from t\n where b = 1");
    assert_eq!(a.tree_print(), b.tree_print());
}
