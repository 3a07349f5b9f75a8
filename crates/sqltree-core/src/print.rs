//! Deterministic indented rendering of a tree.
//!
//! Every node prints its type name, then its scalar fields, then each child
//! under a `label:` line, one level deeper. Lists print their kind and then
//! each element under an `[i]:` line. Two spaces per level. Positions are
//! not printed, so a copy prints the same as its original.

use std::fmt::Write;

use crate::ast::{
    AlterTableAction, Child, ConstraintType, DdlStatement, ExistenceCheck, ModifyColumnAction,
    Node, NodeKind, NodeList,
};

impl Node {
    /// Renders this tree as indented text.
    #[must_use]
    pub fn tree_print(&self) -> String {
        let mut printer = TreePrinter::default();
        printer.node(self, 0);
        printer.out
    }
}

impl NodeList {
    /// Renders this list and its elements as indented text.
    #[must_use]
    pub fn tree_print(&self) -> String {
        let mut printer = TreePrinter::default();
        printer.list(self, 0);
        printer.out
    }
}

#[derive(Default)]
struct TreePrinter {
    out: String,
}

impl TreePrinter {
    fn line(&mut self, depth: usize, text: &str) {
        let _ = writeln!(self.out, "{:width$}{text}", "", width = depth * 2);
    }

    fn node(&mut self, node: &Node, depth: usize) {
        self.line(depth, node.node_name());
        for (label, value) in fields(node.kind()) {
            self.line(depth, &format!("{label}: {value}"));
        }
        if let Some(data_type) = node.data_type() {
            self.line(depth, &format!("type: {data_type}"));
        }
        for (label, child) in node.kind().children() {
            self.line(depth, &format!("{label}:"));
            match child {
                Child::Node(child) => self.node(child, depth + 1),
                Child::List(list) => self.list(list, depth + 1),
            }
        }
    }

    fn list(&mut self, list: &NodeList, depth: usize) {
        self.line(depth, list.kind().name());
        if let Some(application) = list.function_application() {
            self.line(
                depth,
                &format!("function_name: {}", application.function_name),
            );
            self.line(
                depth,
                &format!("first_argument: {}", application.first_argument),
            );
            self.line(
                depth,
                &format!("last_argument: {}", application.last_argument),
            );
        }
        for (i, node) in list.iter().enumerate() {
            self.line(depth, &format!("[{i}]:"));
            self.node(node, depth + 1);
        }
    }
}

#[derive(Default)]
struct Fields(Vec<(&'static str, String)>);

impl Fields {
    fn add(mut self, label: &'static str, value: impl ToString) -> Self {
        self.0.push((label, value.to_string()));
        self
    }

    fn opt(self, label: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.add(label, value),
            None => self,
        }
    }

    fn ddl(self, ddl: &DdlStatement) -> Self {
        let f = self.add("object_name", &ddl.object_name);
        if ddl.implicit_create_schema {
            f.add("implicit_create_schema", true)
        } else {
            f
        }
    }

    fn existence(self, check: ExistenceCheck) -> Self {
        match check {
            ExistenceCheck::NoCondition => self,
            check => self.add("existence_check", check.as_str()),
        }
    }
}

/// Scalar fields of a node, in print order.
#[allow(clippy::too_many_lines)]
fn fields(kind: &NodeKind) -> Vec<(&'static str, String)> {
    let f = Fields::default();
    let f = match kind {
        NodeKind::Cursor(n) => f.opt("name", n.name.as_ref()),
        NodeKind::Insert(n) => f.add("target_table", &n.target_table),
        NodeKind::Update(n) => f
            .add("target_table", &n.target_table)
            .opt("correlation_name", n.correlation_name.as_ref()),
        NodeKind::Delete(n) => f
            .add("target_table", &n.target_table)
            .opt("correlation_name", n.correlation_name.as_ref()),
        NodeKind::CreateTable(n) => f
            .ddl(&n.ddl)
            .existence(n.existence_check),
        NodeKind::DropTable(n) => f
            .ddl(&n.ddl)
            .add("behavior", n.behavior.as_str())
            .existence(n.existence_check),
        NodeKind::AlterTable(n) => {
            let f = f
                .ddl(&n.ddl)
                .existence(n.existence_check);
            match &n.action {
                AlterTableAction::Elements {
                    change_type,
                    behavior,
                    ..
                } => f
                    .add("change_type", change_type.as_str())
                    .add("behavior", behavior.as_str()),
                AlterTableAction::Truncate { behavior } => f
                    .add("truncate", true)
                    .add("behavior", behavior.as_str()),
                AlterTableAction::UpdateStatistics { all, index_name } => f
                    .add("update_statistics", if *all { "ALL" } else { "INDEX" })
                    .opt("index_name", index_name.as_ref()),
            }
        }
        NodeKind::CreateIndex(n) => f
            .ddl(&n.ddl)
            .add("table_name", &n.table_name)
            .add("unique", n.unique)
            .opt("join_type", n.join_type.map(|j| j.as_str()))
            .existence(n.existence_check),
        NodeKind::DropIndex(n) => f
            .ddl(&n.ddl)
            .opt("table_name", n.table_name.as_ref())
            .existence(n.existence_check),
        NodeKind::CreateSchema(n) => f
            .ddl(&n.ddl)
            .existence(n.existence_check),
        NodeKind::DropSchema(n) => f
            .ddl(&n.ddl)
            .add("behavior", n.behavior.as_str())
            .existence(n.existence_check),
        NodeKind::SetSchema(n) => f.add("schema_name", &n.schema_name),
        NodeKind::SetConstraints(n) => f.add("all", n.all).add("deferred", n.deferred),
        NodeKind::SetConfiguration(n) => f.add("variable", &n.variable).add("value", &n.value),
        NodeKind::TransactionControl(n) => f.add("operation", n.operation.as_str()),
        NodeKind::ColumnDefinition(n) => {
            let f = f.add("name", &n.name).add("data_type", &n.data_type);
            if n.auto_increment {
                f.add("auto_increment", true)
            } else {
                f
            }
        }
        NodeKind::ConstraintDefinition(n) => {
            let mut f = f
                .opt("name", n.name.as_ref())
                .add("constraint_type", n.constraint_type.as_str())
                .opt("constraint_text", n.constraint_text.as_ref());
            if let Some(properties) = &n.properties {
                let joined = properties
                    .iter()
                    .map(|(key, value)| format!("{key}={value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                f = f.add("properties", joined);
            }
            if let Some(references) = &n.references {
                f = f
                    .add("references", &references.table_name)
                    .add("on_delete", references.on_delete.as_str())
                    .add("on_update", references.on_update.as_str());
            }
            let f = f.add("behavior", n.behavior.as_str());
            if n.constraint_type == ConstraintType::Drop {
                f.add("verify_type", n.verify_type.as_str())
            } else {
                f
            }
        }
        NodeKind::IndexDefinition(n) => f
            .opt("name", n.name.as_ref())
            .add("unique", n.unique)
            .opt("join_type", n.join_type.map(|j| j.as_str())),
        NodeKind::ModifyColumn(n) => {
            let action = match &n.action {
                ModifyColumnAction::Drop { behavior } => format!("DROP {}", behavior.as_str()),
                ModifyColumnAction::SetDefault(_) => String::from("SET DEFAULT"),
                ModifyColumnAction::DropDefault => String::from("DROP DEFAULT"),
                ModifyColumnAction::SetNotNull => String::from("NOT NULL"),
                ModifyColumnAction::SetNull => String::from("NULL"),
                ModifyColumnAction::SetDataType(ty) => format!("SET DATA TYPE {ty}"),
            };
            f.add("column_name", &n.column_name).add("action", action)
        }
        NodeKind::IndexColumn(n) => f
            .opt("table_name", n.table_name.as_ref())
            .add("column_name", &n.column_name)
            .add("ascending", n.ascending),
        NodeKind::Constant(n) => f.add("value", &n.value),
        NodeKind::ColumnReference(n) => f
            .opt("table_name", n.table_name.as_ref())
            .add("column_name", &n.column_name),
        NodeKind::Parameter(n) => f.add("number", n.number),
        NodeKind::UnaryOperator(n) => f
            .add("operator", n.operator.as_str())
            .add("method_name", n.operator.method_name()),
        NodeKind::ExtractOperator(n) => f
            .add("operator", n.field.operator())
            .add("method_name", n.field.method_name()),
        NodeKind::BinaryOperator(n) => f
            .add("operator", n.operator.as_str())
            .add("method_name", n.operator.method_name()),
        NodeKind::BinaryListOperator(n) => f
            .add("operator", n.operator.as_str())
            .add("method_name", n.operator.method_name()),
        NodeKind::TernaryOperator(n) => f
            .add("operator", n.operator.as_str())
            .add("method_name", n.operator.method_name()),
        NodeKind::Subquery(n) => f.add("kind", n.kind.as_str()),
        NodeKind::CurrentDatetime(n) => f.add("field", n.field.as_str()),
        NodeKind::Aggregate(n) => f.add("name", &n.name).add("distinct", n.distinct),
        NodeKind::MethodCall(n) => f
            .opt("schema_name", n.schema_name.as_ref())
            .add("method_name", &n.method_name),
        NodeKind::Select(n) => f.add("distinct", n.distinct),
        NodeKind::SetOperation(n) => f.add("operator", n.operator.as_str()).add("all", n.all),
        NodeKind::ResultColumn(n) => f.opt("name", n.name.as_ref()),
        NodeKind::AllResultColumn(n) => f.opt("table_name", n.table_name.as_ref()),
        NodeKind::FromBaseTable(n) => f
            .add("table_name", &n.table_name)
            .opt("correlation_name", n.correlation_name.as_ref()),
        NodeKind::FromSubquery(n) => f.add("correlation_name", &n.correlation_name),
        NodeKind::Join(n) => f.add("join_type", n.join_type.as_str()),
        NodeKind::OrderByColumn(n) => f
            .add("ascending", n.ascending)
            .opt("nulls", n.nulls.map(|o| o.as_str())),
        NodeKind::TableName(n) => f.add("name", n),
        NodeKind::Conditional(_)
        | NodeKind::Cast(_)
        | NodeKind::HostToSql(_)
        | NodeKind::SqlToHost(_)
        | NodeKind::Values(_)
        | NodeKind::RowResultSet(_) => f,
    };
    f.0
}
