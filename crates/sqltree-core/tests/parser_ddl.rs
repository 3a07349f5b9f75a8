//! Tests for CREATE, DROP, ALTER and TRUNCATE.

mod common;
use common::*;

use sqltree_core::ast::{
    AlterTableAction, ChangeType, ConstraintDefinitionNode, ConstraintType, CreateTableNode,
    DataType, DropBehavior, ExistenceCheck, JoinType, ModifyColumnAction, ReferentialAction,
    TableName,
};
use sqltree_core::{Features, ListKind, Node, NodeFactory, NodeKind, SqlError, SqlFeature};

fn create_table(node: &Node) -> &CreateTableNode {
    match node.kind() {
        NodeKind::CreateTable(n) => n,
        other => panic!("Expected CREATE TABLE, got {}", other.name()),
    }
}

fn constraint(node: &Node) -> &ConstraintDefinitionNode {
    match node.kind() {
        NodeKind::ConstraintDefinition(n) => n,
        other => panic!("Expected constraint, got {}", other.name()),
    }
}

fn column_names(node: &ConstraintDefinitionNode) -> Vec<String> {
    node.column_list
        .as_ref()
        .map(|list| {
            list.iter()
                .map(|c| match c.kind() {
                    NodeKind::ColumnReference(c) => c.column_name.clone(),
                    other => panic!("Expected column reference, got {}", other.name()),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn alter_elements(node: &Node) -> (ChangeType, &Node) {
    match node.kind() {
        NodeKind::AlterTable(n) => match &n.action {
            AlterTableAction::Elements {
                change_type,
                elements,
                ..
            } => (
                *change_type,
                elements
                    .get(0)
                    .unwrap_or_else(|| panic!("Expected one element")),
            ),
            other => panic!("Expected element change, got {other:?}"),
        },
        other => panic!("Expected ALTER TABLE, got {}", other.name()),
    }
}

// ===================================================================
// CREATE TABLE
// ===================================================================

#[test]
fn create_table_columns() {
    let node = parse(
        "CREATE TABLE app.items (id BIGINT, name VARCHAR(40) NOT NULL, \
         price DECIMAL(10, 2) DEFAULT 0, seq INTEGER AUTOINCREMENT)",
    );
    let table = create_table(&node);
    assert_eq!(table.ddl.object_name, TableName::qualified("app", "items"));
    assert_eq!(table.ddl.full_name(), "app.items");
    assert_eq!(table.ddl.relative_name(), "items");
    assert_eq!(table.existence_check, ExistenceCheck::NoCondition);
    assert_eq!(table.elements.kind(), ListKind::TableElements);
    assert_eq!(table.elements.len(), 4);

    let columns: Vec<_> = table
        .elements
        .iter()
        .map(|e| match e.kind() {
            NodeKind::ColumnDefinition(c) => c,
            other => panic!("Expected column, got {}", other.name()),
        })
        .collect();
    assert_eq!(columns[0].name, "id");
    assert_eq!(columns[0].data_type.data_type, DataType::Bigint);
    assert!(columns[0].data_type.nullable);
    assert!(!columns[1].data_type.nullable);
    assert!(columns[2].default_value.is_some());
    assert!(columns[3].auto_increment);
}

#[test]
fn create_table_if_not_exists() {
    let node = parse("CREATE TABLE IF NOT EXISTS t (a INT)");
    assert_eq!(
        create_table(&node).existence_check,
        ExistenceCheck::IfNotExists
    );
}

#[test]
fn column_constraints_follow_their_column() {
    let node = parse("CREATE TABLE t (id INT PRIMARY KEY, code CHAR(3) UNIQUE NOT NULL)");
    let elements = &create_table(&node).elements;
    let names: Vec<_> = elements.iter().map(Node::node_name).collect();
    assert_eq!(
        names,
        vec![
            "ColumnDefinitionNode",
            "ConstraintDefinitionNode",
            "ColumnDefinitionNode",
            "ConstraintDefinitionNode",
        ]
    );

    let pk = constraint(elements.get(1).unwrap());
    assert_eq!(pk.constraint_type, ConstraintType::PrimaryKey);
    assert_eq!(column_names(pk), vec!["id"]);

    let unique = constraint(elements.get(3).unwrap());
    assert_eq!(unique.constraint_type, ConstraintType::Unique);
    assert_eq!(column_names(unique), vec!["code"]);
}

#[test]
fn named_not_null_becomes_constraint() {
    let node = parse("CREATE TABLE t (a INT CONSTRAINT a_nn NOT NULL)");
    let elements = &create_table(&node).elements;
    assert_eq!(elements.len(), 2);
    let not_null = constraint(elements.get(1).unwrap());
    assert_eq!(not_null.constraint_type, ConstraintType::NotNull);
    assert_eq!(not_null.name, Some(TableName::new("a_nn")));
}

#[test]
fn table_constraints() {
    let node = parse(
        "CREATE TABLE orders (id INT, item INT, qty INT, \
         CONSTRAINT orders_pk PRIMARY KEY (id), \
         UNIQUE (item, qty), \
         CHECK (qty > 0), \
         FOREIGN KEY (item) REFERENCES items (id) ON DELETE CASCADE ON UPDATE SET NULL)",
    );
    let elements = &create_table(&node).elements;
    assert_eq!(elements.len(), 7);

    let pk = constraint(elements.get(3).unwrap());
    assert_eq!(pk.name, Some(TableName::new("orders_pk")));
    assert_eq!(column_names(pk), vec!["id"]);

    let unique = constraint(elements.get(4).unwrap());
    assert_eq!(column_names(unique), vec!["item", "qty"]);

    let check = constraint(elements.get(5).unwrap());
    assert_eq!(check.constraint_type, ConstraintType::Check);
    assert_eq!(check.constraint_text.as_deref(), Some("qty > 0"));
    assert!(check.check_condition.is_some());

    let fk = constraint(elements.get(6).unwrap());
    assert_eq!(fk.constraint_type, ConstraintType::ForeignKey);
    let references = fk.references.as_ref().unwrap();
    assert_eq!(references.table_name, TableName::new("items"));
    assert_eq!(references.columns.as_ref().map(|c| c.len()), Some(1));
    assert_eq!(references.on_delete, ReferentialAction::Cascade);
    assert_eq!(references.on_update, ReferentialAction::SetNull);
}

#[test]
fn column_references_constraint() {
    let node = parse("CREATE TABLE t (owner INT REFERENCES people)");
    let fk = constraint(create_table(&node).elements.get(1).unwrap());
    assert_eq!(fk.constraint_type, ConstraintType::ForeignKey);
    assert_eq!(column_names(fk), vec!["owner"]);
    let references = fk.references.as_ref().unwrap();
    assert!(references.columns.is_none());
    assert_eq!(references.on_delete, ReferentialAction::NoAction);
}

#[test]
fn empty_table_rejected() {
    let _ = parse_err("CREATE TABLE t ()");
}

// ===================================================================
// Indexes
// ===================================================================

#[test]
fn index_definition_in_table() {
    let node = parse("CREATE TABLE t (a INT, b INT, UNIQUE INDEX t_ab (a, b DESC))");
    match create_table(&node).elements.get(2).map(Node::kind) {
        Some(NodeKind::IndexDefinition(index)) => {
            assert_eq!(index.name.as_deref(), Some("t_ab"));
            assert!(index.unique);
            assert_eq!(index.columns.len(), 2);
            assert!(matches!(
                index.columns.get(1).map(Node::kind),
                Some(NodeKind::IndexColumn(c)) if c.column_name == "b" && !c.ascending
            ));
        }
        other => panic!("Expected index definition, got {other:?}"),
    }
}

#[test]
fn create_index() {
    let node = parse("CREATE UNIQUE INDEX IF NOT EXISTS idx ON app.t (a, t.b ASC)");
    match node.kind() {
        NodeKind::CreateIndex(index) => {
            assert_eq!(index.ddl.object_name, TableName::new("idx"));
            assert_eq!(index.table_name, TableName::qualified("app", "t"));
            assert!(index.unique);
            assert_eq!(index.existence_check, ExistenceCheck::IfNotExists);
            assert!(index.join_type.is_none());
            assert!(matches!(
                index.columns.get(1).map(Node::kind),
                Some(NodeKind::IndexColumn(c))
                    if c.table_name == Some(TableName::new("t")) && c.ascending
            ));
        }
        other => panic!("Expected CREATE INDEX, got {}", other.name()),
    }
}

#[test]
fn group_index_join_type() {
    let node = parse("CREATE INDEX g ON orders (orders.id, items.name) USING LEFT JOIN");
    assert!(matches!(
        node.kind(),
        NodeKind::CreateIndex(index) if index.join_type == Some(JoinType::LeftOuter)
    ));
}

#[test]
fn index_function_flattens_arguments() {
    let node = parse("CREATE INDEX z ON t (w, z_order(x, y), v)");
    match node.kind() {
        NodeKind::CreateIndex(index) => {
            assert_eq!(index.columns.len(), 4);
            let application = index.columns.function_application().unwrap();
            assert_eq!(application.function_name, "z_order");
            assert_eq!(application.first_argument, 1);
            assert_eq!(application.last_argument, 2);
            assert_eq!(application.argument_count, 2);
        }
        other => panic!("Expected CREATE INDEX, got {}", other.name()),
    }
}

#[test]
fn second_index_function_is_ambiguous() {
    let err = parse_err("CREATE INDEX z ON t (f(a), g(b))");
    match err {
        SqlError::AmbiguousIndexFunction {
            existing,
            attempted,
        } => {
            assert_eq!(existing, "f");
            assert_eq!(attempted, "g");
        }
        other => panic!("Expected ambiguous index function, got {other:?}"),
    }
}

#[test]
fn index_function_requires_feature() {
    let err = sqltree_core::parse_statement("CREATE INDEX z ON t (f(a))", &Features::none())
        .unwrap_err();
    assert!(matches!(
        err,
        SqlError::FeatureDisabled {
            feature: SqlFeature::IndexFunctions,
            offset: 21,
        }
    ));
}

// ===================================================================
// Schemas and drops
// ===================================================================

#[test]
fn create_and_drop_schema() {
    let node = parse("CREATE SCHEMA IF NOT EXISTS app");
    assert!(matches!(
        node.kind(),
        NodeKind::CreateSchema(s)
            if s.ddl.object_name == TableName::new("app")
                && s.existence_check == ExistenceCheck::IfNotExists
    ));

    let node = parse("DROP SCHEMA app RESTRICT");
    assert!(matches!(
        node.kind(),
        NodeKind::DropSchema(s) if s.behavior == DropBehavior::Restrict
    ));
}

#[test]
fn drop_table() {
    let node = parse("DROP TABLE IF EXISTS app.t CASCADE");
    match node.kind() {
        NodeKind::DropTable(drop) => {
            assert_eq!(drop.ddl.full_name(), "app.t");
            assert_eq!(drop.behavior, DropBehavior::Cascade);
            assert_eq!(drop.existence_check, ExistenceCheck::IfExists);
        }
        other => panic!("Expected DROP TABLE, got {}", other.name()),
    }
}

#[test]
fn drop_index() {
    let node = parse("DROP INDEX idx ON t");
    assert!(matches!(
        node.kind(),
        NodeKind::DropIndex(d) if d.table_name == Some(TableName::new("t"))
    ));
}

// ===================================================================
// ALTER TABLE and TRUNCATE
// ===================================================================

#[test]
fn alter_add_column() {
    let node = parse("ALTER TABLE t ADD COLUMN c VARCHAR(10) NOT NULL");
    let (change, element) = alter_elements(&node);
    assert_eq!(change, ChangeType::Add);
    assert!(matches!(
        element.kind(),
        NodeKind::ColumnDefinition(c) if c.name == "c" && !c.data_type.nullable
    ));
}

#[test]
fn alter_add_constraint() {
    let node = parse("ALTER TABLE t ADD CONSTRAINT t_u UNIQUE (a)");
    let (change, element) = alter_elements(&node);
    assert_eq!(change, ChangeType::Add);
    assert_eq!(constraint(element).constraint_type, ConstraintType::Unique);
}

#[test]
fn alter_drop_column() {
    let node = parse("ALTER TABLE t DROP COLUMN c CASCADE");
    let (change, element) = alter_elements(&node);
    assert_eq!(change, ChangeType::Drop);
    assert!(matches!(
        element.kind(),
        NodeKind::ModifyColumn(m)
            if m.column_name == "c"
                && m.action == ModifyColumnAction::Drop { behavior: DropBehavior::Cascade }
    ));
}

#[test]
fn alter_drop_constraints() {
    let node = parse("ALTER TABLE t DROP CONSTRAINT t_u");
    let drop = constraint(alter_elements(&node).1);
    assert_eq!(drop.constraint_type, ConstraintType::Drop);
    assert_eq!(drop.verify_type, ConstraintType::Drop);
    assert_eq!(drop.name, Some(TableName::new("t_u")));

    let node = parse("ALTER TABLE t DROP PRIMARY KEY");
    let drop = constraint(alter_elements(&node).1);
    assert_eq!(drop.verify_type, ConstraintType::PrimaryKey);
    assert!(drop.name.is_none());

    let node = parse("ALTER TABLE t DROP FOREIGN KEY t_fk RESTRICT");
    let drop = constraint(alter_elements(&node).1);
    assert_eq!(drop.verify_type, ConstraintType::ForeignKey);
    assert_eq!(drop.behavior, DropBehavior::Restrict);
}

#[test]
fn alter_column_actions() {
    let cases = [
        ("SET DEFAULT 1", "SET DEFAULT"),
        ("DROP DEFAULT", "DROP DEFAULT"),
        ("SET NOT NULL", "NOT NULL"),
        ("DROP NOT NULL", "NULL"),
        ("NULL", "NULL"),
    ];
    for (text, _) in cases {
        let node = parse(&format!("ALTER TABLE t ALTER COLUMN c {text}"));
        let (change, element) = alter_elements(&node);
        assert_eq!(change, ChangeType::Modify, "{text}");
        assert!(matches!(element.kind(), NodeKind::ModifyColumn(_)), "{text}");
    }

    let node = parse("ALTER TABLE t ALTER c SET DATA TYPE BIGINT");
    assert!(matches!(
        alter_elements(&node).1.kind(),
        NodeKind::ModifyColumn(m)
            if matches!(&m.action, ModifyColumnAction::SetDataType(t) if t.data_type == DataType::Bigint)
    ));
}

#[test]
fn update_statistics() {
    let node = parse("ALTER TABLE t ALL UPDATE STATISTICS");
    assert!(matches!(
        node.kind(),
        NodeKind::AlterTable(a)
            if a.action == AlterTableAction::UpdateStatistics { all: true, index_name: None }
    ));

    let node = parse("ALTER TABLE t UPDATE STATISTICS idx");
    assert!(matches!(
        node.kind(),
        NodeKind::AlterTable(a)
            if matches!(&a.action, AlterTableAction::UpdateStatistics { all: false, index_name: Some(i) } if i == "idx")
    ));
}

#[test]
fn truncate_is_alter_table() {
    let node = parse("TRUNCATE TABLE t");
    assert!(matches!(
        node.kind(),
        NodeKind::AlterTable(a)
            if a.action == AlterTableAction::Truncate { behavior: DropBehavior::Default }
    ));
    assert_eq!(node.statement_to_string(), Some("TRUNCATE TABLE"));
    assert!(node.is_atomic());
}

#[test]
fn alter_and_truncate_if_exists() {
    for sql in [
        "ALTER TABLE IF EXISTS app.t ADD COLUMN c INT",
        "ALTER TABLE IF EXISTS app.t ALL UPDATE STATISTICS",
        "TRUNCATE TABLE IF EXISTS app.t",
    ] {
        let node = parse(sql);
        match node.kind() {
            NodeKind::AlterTable(alter) => {
                assert_eq!(alter.existence_check, ExistenceCheck::IfExists, "{sql}");
                assert_eq!(alter.ddl.full_name(), "app.t", "{sql}");
            }
            other => panic!("Expected ALTER TABLE, got {}", other.name()),
        }
        assert!(node.tree_print().contains("existence_check: IF EXISTS"), "{sql}");

        let copy = NodeFactory::new().copy(&node);
        assert!(copy.is_equivalent(&node), "{sql}");
    }

    let plain = parse("TRUNCATE TABLE app.t");
    assert!(matches!(
        plain.kind(),
        NodeKind::AlterTable(a) if a.existence_check == ExistenceCheck::NoCondition
    ));
    assert!(!plain.is_equivalent(&parse("TRUNCATE TABLE IF EXISTS app.t")));
}

#[test]
fn statement_names() {
    let cases = [
        ("CREATE TABLE t (a INT)", "CREATE TABLE"),
        ("DROP TABLE t", "DROP TABLE"),
        ("ALTER TABLE t DROP a", "ALTER TABLE"),
        ("CREATE INDEX i ON t (a)", "CREATE INDEX"),
        ("DROP INDEX i", "DROP INDEX"),
        ("CREATE SCHEMA s", "CREATE SCHEMA"),
        ("DROP SCHEMA s", "DROP SCHEMA"),
    ];
    for (sql, expected) in cases {
        assert_eq!(parse(sql).statement_to_string(), Some(expected), "{sql}");
    }
}
