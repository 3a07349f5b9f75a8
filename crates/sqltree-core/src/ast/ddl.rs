//! Data definition statements and table elements.

use std::collections::BTreeMap;

use super::{DataTypeDescriptor, JoinType, Node, NodeList, TableName};

/// The part every DDL statement shares: the name of the object it acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdlStatement {
    /// Name of the created, altered or dropped object.
    pub object_name: TableName,
    /// Whether the schema of `object_name` should be created if missing.
    pub implicit_create_schema: bool,
}

impl DdlStatement {
    /// Creates a header for `object_name`.
    #[must_use]
    pub const fn new(object_name: TableName) -> Self {
        Self {
            object_name,
            implicit_create_schema: false,
        }
    }

    /// Object name without its schema.
    #[must_use]
    pub fn relative_name(&self) -> &str {
        &self.object_name.table_name
    }

    /// Object name with its schema, when one was written.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.object_name.full_name()
    }
}

/// IF EXISTS / IF NOT EXISTS guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistenceCheck {
    #[default]
    NoCondition,
    IfExists,
    IfNotExists,
}

impl ExistenceCheck {
    /// Returns the SQL spelling, empty for no condition.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoCondition => "",
            Self::IfExists => "IF EXISTS",
            Self::IfNotExists => "IF NOT EXISTS",
        }
    }
}

/// CASCADE / RESTRICT on drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropBehavior {
    #[default]
    Default,
    Cascade,
    Restrict,
}

impl DropBehavior {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
        }
    }
}

/// `CREATE TABLE name (elements)`.
#[derive(Debug, PartialEq)]
pub struct CreateTableNode {
    pub ddl: DdlStatement,
    /// Columns, constraints and indexes.
    pub elements: NodeList,
    pub existence_check: ExistenceCheck,
}

#[derive(Debug, PartialEq)]
pub struct DropTableNode {
    pub ddl: DdlStatement,
    pub behavior: DropBehavior,
    pub existence_check: ExistenceCheck,
}

/// How ALTER TABLE changes its element list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Add,
    Drop,
    Modify,
}

impl ChangeType {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Drop => "DROP",
            Self::Modify => "MODIFY",
        }
    }
}

/// What an ALTER TABLE statement does.
#[derive(Debug, PartialEq)]
pub enum AlterTableAction {
    /// Adds, drops or modifies table elements.
    Elements {
        change_type: ChangeType,
        elements: NodeList,
        behavior: DropBehavior,
    },
    /// `TRUNCATE TABLE`.
    Truncate { behavior: DropBehavior },
    /// Statistics refresh for one index or all of them.
    UpdateStatistics {
        all: bool,
        index_name: Option<String>,
    },
}

/// ALTER TABLE, and TRUNCATE TABLE.
#[derive(Debug, PartialEq)]
pub struct AlterTableNode {
    pub ddl: DdlStatement,
    pub action: AlterTableAction,
    /// `IF EXISTS` after `TABLE`.
    pub existence_check: ExistenceCheck,
}

/// `CREATE [UNIQUE] INDEX name ON table (columns)`.
#[derive(Debug, PartialEq)]
pub struct CreateIndexNode {
    pub ddl: DdlStatement,
    /// Indexed table.
    pub table_name: TableName,
    pub unique: bool,
    pub columns: NodeList,
    /// Join type of a group index, `USING LEFT JOIN`.
    pub join_type: Option<JoinType>,
    pub existence_check: ExistenceCheck,
}

#[derive(Debug, PartialEq)]
pub struct DropIndexNode {
    pub ddl: DdlStatement,
    /// Table named by `ON table`, if written.
    pub table_name: Option<TableName>,
    pub existence_check: ExistenceCheck,
}

/// `CREATE SCHEMA name`. The schema name is the object name.
#[derive(Debug, PartialEq)]
pub struct CreateSchemaNode {
    pub ddl: DdlStatement,
    pub existence_check: ExistenceCheck,
}

#[derive(Debug, PartialEq)]
pub struct DropSchemaNode {
    pub ddl: DdlStatement,
    pub behavior: DropBehavior,
    pub existence_check: ExistenceCheck,
}

/// A column in a table definition.
#[derive(Debug, PartialEq)]
pub struct ColumnDefinitionNode {
    pub name: String,
    /// Declared type; NOT NULL clears its nullability.
    pub data_type: DataTypeDescriptor,
    pub default_value: Option<Box<Node>>,
    pub auto_increment: bool,
}

/// Constraint kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    NotNull,
    PrimaryKey,
    Unique,
    Check,
    ForeignKey,
    /// Removes a constraint.
    Drop,
}

impl ConstraintType {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotNull => "NOT NULL",
            Self::PrimaryKey => "PRIMARY KEY",
            Self::Unique => "UNIQUE",
            Self::Check => "CHECK",
            Self::ForeignKey => "FOREIGN KEY",
            Self::Drop => "DROP",
        }
    }
}

/// Foreign key actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// The referenced side of a foreign key.
#[derive(Debug, PartialEq)]
pub struct ForeignKeyReference {
    pub table_name: TableName,
    /// Referenced columns; the primary key when absent.
    pub columns: Option<NodeList>,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

/// A column or table constraint, or the removal of one.
#[derive(Debug, PartialEq)]
pub struct ConstraintDefinitionNode {
    /// Constraint name, if written.
    pub name: Option<TableName>,
    pub constraint_type: ConstraintType,
    /// Storage properties.
    pub properties: Option<BTreeMap<String, String>>,
    /// Constrained columns.
    pub column_list: Option<NodeList>,
    /// Source text of a CHECK condition.
    pub constraint_text: Option<String>,
    pub check_condition: Option<Box<Node>>,
    pub references: Option<ForeignKeyReference>,
    pub behavior: DropBehavior,
    /// For a drop, the kind of constraint expected to be dropped.
    pub verify_type: ConstraintType,
}

impl ConstraintDefinitionNode {
    /// Creates an unnamed constraint of the given type with nothing attached.
    #[must_use]
    pub const fn new(constraint_type: ConstraintType) -> Self {
        Self {
            name: None,
            constraint_type,
            properties: None,
            column_list: None,
            constraint_text: None,
            check_condition: None,
            references: None,
            behavior: DropBehavior::Default,
            verify_type: ConstraintType::Drop,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: TableName) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: NodeList) -> Self {
        self.column_list = Some(columns);
        self
    }

    /// Attaches a CHECK condition and its source text.
    #[must_use]
    pub fn with_check(mut self, condition: Node, text: impl Into<String>) -> Self {
        self.check_condition = Some(Box::new(condition));
        self.constraint_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_references(mut self, references: ForeignKeyReference) -> Self {
        self.references = Some(references);
        self
    }

    #[must_use]
    pub const fn with_behavior(mut self, behavior: DropBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub const fn with_verify_type(mut self, verify_type: ConstraintType) -> Self {
        self.verify_type = verify_type;
        self
    }
}

/// An `INDEX [name] (columns)` element of CREATE TABLE.
#[derive(Debug, PartialEq)]
pub struct IndexDefinitionNode {
    pub name: Option<String>,
    pub unique: bool,
    pub columns: NodeList,
    pub join_type: Option<JoinType>,
}

/// One column of an index definition.
#[derive(Debug, PartialEq)]
pub struct IndexColumnNode {
    pub table_name: Option<TableName>,
    pub column_name: String,
    pub ascending: bool,
}

/// What ALTER COLUMN or DROP COLUMN does to a column.
#[derive(Debug, PartialEq)]
pub enum ModifyColumnAction {
    Drop { behavior: DropBehavior },
    SetDefault(Box<Node>),
    DropDefault,
    SetNotNull,
    SetNull,
    SetDataType(DataTypeDescriptor),
}

/// A column change inside ALTER TABLE.
#[derive(Debug, PartialEq)]
pub struct ModifyColumnNode {
    pub column_name: String,
    pub action: ModifyColumnAction,
}
