//! Pratt expression parser for operator precedence.

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::config::SqlFeature;
use crate::lexer::{Keyword, TokenKind};

/// Binding power of NOT: looser than comparisons, tighter than AND.
pub const NOT_BINDING_POWER: u8 = 5;

/// Binding power of the arithmetic prefix operators.
pub const UNARY_BINDING_POWER: u8 = 21;

/// Returns the prefix binding power for a unary operator token.
///
/// Returns `None` if the token is not a prefix operator.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Minus | TokenKind::Plus | TokenKind::BitNot => Some(UNARY_BINDING_POWER),
        TokenKind::Keyword(Keyword::Not) => Some(NOT_BINDING_POWER),
        _ => None,
    }
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        // Logical OR (lowest precedence)
        TokenKind::Keyword(Keyword::Or) => Some((1, 2)),

        // Logical AND
        TokenKind::Keyword(Keyword::And) => Some((3, 4)),

        // Comparison operators and predicates
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq
        | TokenKind::Keyword(Keyword::Is | Keyword::In | Keyword::Between | Keyword::Like) => {
            Some((7, 8))
        }

        // Bitwise OR, XOR, AND
        TokenKind::BitOr => Some((9, 10)),
        TokenKind::BitXor => Some((11, 12)),
        TokenKind::BitAnd => Some((13, 14)),

        // Bit shifts
        TokenKind::LeftShift | TokenKind::RightShift => Some((15, 16)),

        // Additive (string concat has same precedence as addition)
        TokenKind::Plus | TokenKind::Minus | TokenKind::Concat => Some((17, 18)),

        // Multiplicative
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent | TokenKind::Keyword(Keyword::Div) => {
            Some((19, 20))
        }

        _ => None,
    }
}

/// Converts a token to a binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Plus),
        TokenKind::Minus => Some(BinaryOperator::Minus),
        TokenKind::Star => Some(BinaryOperator::Times),
        TokenKind::Slash => Some(BinaryOperator::Divide),
        TokenKind::Percent => Some(BinaryOperator::Mod),
        TokenKind::Keyword(Keyword::Div) => Some(BinaryOperator::Div),
        TokenKind::Concat => Some(BinaryOperator::Concatenate),
        TokenKind::Eq => Some(BinaryOperator::Equals),
        TokenKind::NotEq => Some(BinaryOperator::NotEquals),
        TokenKind::Lt => Some(BinaryOperator::LessThan),
        TokenKind::LtEq => Some(BinaryOperator::LessEquals),
        TokenKind::Gt => Some(BinaryOperator::GreaterThan),
        TokenKind::GtEq => Some(BinaryOperator::GreaterEquals),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOperator::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOperator::Or),
        TokenKind::BitAnd => Some(BinaryOperator::BitAnd),
        TokenKind::BitOr => Some(BinaryOperator::BitOr),
        TokenKind::BitXor => Some(BinaryOperator::BitXor),
        TokenKind::LeftShift => Some(BinaryOperator::LeftShift),
        TokenKind::RightShift => Some(BinaryOperator::RightShift),
        _ => None,
    }
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOperator> {
    match kind {
        TokenKind::Minus => Some(UnaryOperator::Minus),
        TokenKind::Plus => Some(UnaryOperator::Plus),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOperator::Not),
        TokenKind::BitNot => Some(UnaryOperator::BitNot),
        _ => None,
    }
}

/// Returns the feature an infix operator is gated behind, if any.
#[must_use]
pub const fn binary_op_feature(op: BinaryOperator) -> Option<SqlFeature> {
    match op {
        BinaryOperator::Mod => Some(SqlFeature::InfixMod),
        BinaryOperator::Div => Some(SqlFeature::DivOperator),
        BinaryOperator::BitAnd
        | BinaryOperator::BitOr
        | BinaryOperator::BitXor
        | BinaryOperator::LeftShift
        | BinaryOperator::RightShift => Some(SqlFeature::InfixBitOperators),
        _ => None,
    }
}

/// Returns the feature a prefix operator is gated behind, if any.
#[must_use]
pub const fn unary_op_feature(op: UnaryOperator) -> Option<SqlFeature> {
    match op {
        UnaryOperator::BitNot => Some(SqlFeature::InfixBitOperators),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        // Multiplication should bind tighter than addition
        let add_bp = infix_binding_power(&TokenKind::Plus).unwrap();
        let mul_bp = infix_binding_power(&TokenKind::Star).unwrap();
        assert!(mul_bp.0 > add_bp.0);

        // AND should bind tighter than OR
        let and_bp = infix_binding_power(&TokenKind::Keyword(Keyword::And)).unwrap();
        let or_bp = infix_binding_power(&TokenKind::Keyword(Keyword::Or)).unwrap();
        assert!(and_bp.0 > or_bp.0);

        // NOT sits between AND and the comparisons
        let eq_bp = infix_binding_power(&TokenKind::Eq).unwrap();
        assert!(NOT_BINDING_POWER > and_bp.1);
        assert!(NOT_BINDING_POWER < eq_bp.0);
    }

    #[test]
    fn test_left_associativity() {
        let (left, right) = infix_binding_power(&TokenKind::Minus).unwrap();
        assert!(left < right);
    }

    #[test]
    fn test_token_to_binary_op() {
        assert_eq!(
            token_to_binary_op(&TokenKind::Plus),
            Some(BinaryOperator::Plus)
        );
        assert_eq!(
            token_to_binary_op(&TokenKind::Keyword(Keyword::Div)),
            Some(BinaryOperator::Div)
        );
        assert_eq!(token_to_binary_op(&TokenKind::LeftParen), None);
    }

    #[test]
    fn test_token_to_unary_op() {
        assert_eq!(
            token_to_unary_op(&TokenKind::Minus),
            Some(UnaryOperator::Minus)
        );
        assert_eq!(
            token_to_unary_op(&TokenKind::Keyword(Keyword::Not)),
            Some(UnaryOperator::Not)
        );
        assert_eq!(token_to_unary_op(&TokenKind::Star), None);
    }

    #[test]
    fn test_gated_operators() {
        assert_eq!(
            binary_op_feature(BinaryOperator::Mod),
            Some(SqlFeature::InfixMod)
        );
        assert_eq!(
            binary_op_feature(BinaryOperator::BitXor),
            Some(SqlFeature::InfixBitOperators)
        );
        assert_eq!(binary_op_feature(BinaryOperator::Plus), None);
        assert_eq!(
            unary_op_feature(UnaryOperator::BitNot),
            Some(SqlFeature::InfixBitOperators)
        );
    }
}
