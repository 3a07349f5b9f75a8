//! Value expression nodes.

use core::fmt;

use super::{DataTypeDescriptor, Node, NodeList, TableName};

/// A literal value.
#[derive(Debug, Clone)]
pub enum ConstantValue {
    /// NULL literal.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// Integer literal.
    Integer(i64),
    /// Exact numeric literal, kept as written.
    Decimal(String),
    /// Approximate numeric literal.
    Double(f64),
    /// Character string literal.
    Char(String),
    /// Binary string literal.
    Blob(Vec<u8>),
}

impl PartialEq for ConstantValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) | (Self::Char(a), Self::Char(b)) => a == b,
            // Bitwise, so that a NaN literal is equivalent to itself.
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Blob(a), Self::Blob(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) => f.write_str(d),
            Self::Double(d) => write!(f, "{d:e}"),
            Self::Char(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Blob(bytes) => {
                f.write_str("X'")?;
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'")
            }
        }
    }
}

/// A literal.
#[derive(Debug, PartialEq)]
pub struct ConstantNode {
    /// The literal value.
    pub value: ConstantValue,
}

/// A reference to a column, optionally qualified by its table.
#[derive(Debug, PartialEq)]
pub struct ColumnReferenceNode {
    /// Qualifying table, if written.
    pub table_name: Option<TableName>,
    /// Column name, as written.
    pub column_name: String,
}

/// A `?` or `$n` placeholder.
#[derive(Debug, PartialEq)]
pub struct ParameterNode {
    /// Zero-based parameter number.
    pub number: usize,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Negation (-)
    Minus,
    /// Unary plus (+)
    Plus,
    /// Logical NOT
    Not,
    /// IS NULL
    IsNull,
    /// IS NOT NULL
    IsNotNull,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Plus => "+",
            Self::Not => "NOT",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::BitNot => "~",
        }
    }

    /// Returns the name of the routine that evaluates the operator.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::Minus => "minus",
            Self::Plus => "plus",
            Self::Not => "not",
            Self::IsNull => "isNull",
            Self::IsNotNull => "isNotNull",
            Self::BitNot => "bitNot",
        }
    }
}

/// A unary operator applied to one operand.
#[derive(Debug, PartialEq)]
pub struct UnaryOperatorNode {
    /// The operator.
    pub operator: UnaryOperator,
    /// The operand.
    pub operand: Box<Node>,
}

/// Fields that EXTRACT can take out of a datetime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl ExtractField {
    /// Returns the SQL name of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Minute => "MINUTE",
            Self::Second => "SECOND",
        }
    }

    /// Returns the operator name, e.g. `EXTRACT YEAR`.
    #[must_use]
    pub const fn operator(&self) -> &'static str {
        match self {
            Self::Year => "EXTRACT YEAR",
            Self::Month => "EXTRACT MONTH",
            Self::Day => "EXTRACT DAY",
            Self::Hour => "EXTRACT HOUR",
            Self::Minute => "EXTRACT MINUTE",
            Self::Second => "EXTRACT SECOND",
        }
    }

    /// Returns the name of the routine that evaluates the extraction.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
        }
    }
}

/// `EXTRACT(field FROM operand)`.
#[derive(Debug, PartialEq)]
pub struct ExtractOperatorNode {
    /// Extracted field.
    pub field: ExtractField,
    /// Datetime operand.
    pub operand: Box<Node>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
    Div,

    /// String concatenation (||)
    Concatenate,

    // Comparison
    Equals,
    NotEquals,
    LessThan,
    LessEquals,
    GreaterThan,
    GreaterEquals,

    // Logical
    And,
    Or,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
}

impl BinaryOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Times => "*",
            Self::Divide => "/",
            Self::Mod => "%",
            Self::Div => "DIV",
            Self::Concatenate => "||",
            Self::Equals => "=",
            Self::NotEquals => "<>",
            Self::LessThan => "<",
            Self::LessEquals => "<=",
            Self::GreaterThan => ">",
            Self::GreaterEquals => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Returns the name of the routine that evaluates the operator.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Times => "times",
            Self::Divide => "divide",
            Self::Mod => "mod",
            Self::Div => "div",
            Self::Concatenate => "concatenate",
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::LessThan => "lessThan",
            Self::LessEquals => "lessOrEquals",
            Self::GreaterThan => "greaterThan",
            Self::GreaterEquals => "greaterOrEquals",
            Self::And => "and",
            Self::Or => "or",
            Self::BitAnd => "bitAnd",
            Self::BitOr => "bitOr",
            Self::BitXor => "bitXor",
            Self::LeftShift => "leftShift",
            Self::RightShift => "rightShift",
        }
    }

    /// Returns true for the six comparison operators.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equals
                | Self::NotEquals
                | Self::LessThan
                | Self::LessEquals
                | Self::GreaterThan
                | Self::GreaterEquals
        )
    }
}

/// A binary operator applied to two operands.
#[derive(Debug, PartialEq)]
pub struct BinaryOperatorNode {
    /// The operator.
    pub operator: BinaryOperator,
    /// Left operand.
    pub left_operand: Box<Node>,
    /// Right operand.
    pub right_operand: Box<Node>,
}

/// Operators whose right side is a list of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryListOperator {
    In,
    NotIn,
    Between,
    NotBetween,
}

impl BinaryListOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
        }
    }

    /// Returns the name of the routine that evaluates the operator.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Between => "between",
            Self::NotBetween => "notBetween",
        }
    }
}

/// `left IN (a, b, ...)` or `left BETWEEN low AND high`.
///
/// For BETWEEN the list holds exactly the two bounds, low first.
#[derive(Debug, PartialEq)]
pub struct BinaryListOperatorNode {
    /// The operator.
    pub operator: BinaryListOperator,
    /// Tested value.
    pub left_operand: Box<Node>,
    /// Candidate values, or the BETWEEN bounds.
    pub right_operand_list: NodeList,
}

/// Operators with three operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TernaryOperator {
    Like,
    NotLike,
    Substring,
}

impl TernaryOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Substring => "SUBSTRING",
        }
    }

    /// Returns the name of the routine that evaluates the operator.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::NotLike => "notLike",
            Self::Substring => "substring",
        }
    }
}

/// `receiver LIKE pattern [ESCAPE escape]` or
/// `SUBSTRING(receiver FROM start [FOR length])`.
#[derive(Debug, PartialEq)]
pub struct TernaryOperatorNode {
    /// The operator.
    pub operator: TernaryOperator,
    /// The string operated on.
    pub receiver: Box<Node>,
    /// Pattern or start position.
    pub left_operand: Box<Node>,
    /// Escape character or length, when written.
    pub right_operand: Option<Box<Node>>,
}

/// One level of a CASE expression: `WHEN test THEN then ELSE else`.
///
/// Several WHEN branches nest in the else position.
#[derive(Debug, PartialEq)]
pub struct ConditionalNode {
    pub test_condition: Box<Node>,
    pub then_node: Box<Node>,
    pub else_node: Box<Node>,
}

/// `CAST(operand AS target_type)`.
#[derive(Debug, PartialEq)]
pub struct CastNode {
    pub operand: Box<Node>,
    pub target_type: DataTypeDescriptor,
}

/// How a subquery is used by its enclosing expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubqueryKind {
    /// Scalar subquery.
    Expression,
    Exists,
    NotExists,
    In,
    NotIn,
}

impl SubqueryKind {
    /// Returns the SQL representation of the subquery use.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Expression => "EXPRESSION",
            Self::Exists => "EXISTS",
            Self::NotExists => "NOT EXISTS",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
        }
    }

    /// Returns true if the subquery is compared against a left operand.
    #[must_use]
    pub const fn has_left_operand(&self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

/// A subquery used as a value.
#[derive(Debug, PartialEq)]
pub struct SubqueryNode {
    /// How the subquery is used.
    pub kind: SubqueryKind,
    /// The query.
    pub result_set: Box<Node>,
    /// Tested value for IN and NOT IN.
    pub left_operand: Option<Box<Node>>,
}

/// CURRENT_DATE, CURRENT_TIME or CURRENT_TIMESTAMP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatetimeField {
    Date,
    Time,
    Timestamp,
}

impl DatetimeField {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "CURRENT_DATE",
            Self::Time => "CURRENT_TIME",
            Self::Timestamp => "CURRENT_TIMESTAMP",
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct CurrentDatetimeNode {
    pub field: DatetimeField,
}

/// An aggregate call. `COUNT(*)` has no operand.
#[derive(Debug, PartialEq)]
pub struct AggregateNode {
    /// Upper-case aggregate name.
    pub name: String,
    pub operand: Option<Box<Node>>,
    pub distinct: bool,
}

/// Marks a SQL value passed into a host routine.
#[derive(Debug, PartialEq)]
pub struct SqlToHostNode {
    pub value: Box<Node>,
}

/// Marks a host routine result used as a SQL value.
///
/// The wrapped node is always a [`MethodCallNode`].
#[derive(Debug, PartialEq)]
pub struct HostToSqlNode {
    pub method_call: Box<Node>,
}

/// A call to a user routine. Arguments are [`SqlToHostNode`]s.
#[derive(Debug, PartialEq)]
pub struct MethodCallNode {
    /// Schema qualifying the routine name, if written.
    pub schema_name: Option<String>,
    /// Routine name, as written.
    pub method_name: String,
    /// Wrapped arguments.
    pub parameters: NodeList,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_constants_are_equal() {
        assert_eq!(
            ConstantValue::Double(f64::NAN),
            ConstantValue::Double(f64::NAN)
        );
        assert_ne!(ConstantValue::Integer(1), ConstantValue::Double(1.0));
    }

    #[test]
    fn test_constant_display() {
        assert_eq!(ConstantValue::Char(String::from("it's")).to_string(), "'it''s'");
        assert_eq!(ConstantValue::Blob(vec![0x48, 0x69]).to_string(), "X'4869'");
        assert_eq!(ConstantValue::Double(1e10).to_string(), "1e10");
        assert_eq!(ConstantValue::Null.to_string(), "NULL");
    }

    #[test]
    fn test_extract_field_names() {
        assert_eq!(ExtractField::Year.operator(), "EXTRACT YEAR");
        assert_eq!(ExtractField::Second.method_name(), "second");
    }

    #[test]
    fn test_comparison_operators() {
        assert!(BinaryOperator::LessEquals.is_comparison());
        assert!(!BinaryOperator::Concatenate.is_comparison());
        assert_eq!(BinaryOperator::NotEquals.method_name(), "notEquals");
    }
}
