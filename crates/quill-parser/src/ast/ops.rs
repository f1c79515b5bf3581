//! Binary operators and the precedence table used by the expression parser.

use crate::lexer::TokenKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Binding strength of operators, weakest first.
///
/// `Lowest` is the starting level for a full expression; `Prefix` binds
/// tighter than any infix operator and is used for the operand of unary minus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Lowest,
    Sum,
    Product,
    Prefix,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            _ => None,
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOp::Add | BinaryOp::Sub => Precedence::Sum,
            BinaryOp::Mul | BinaryOp::Div => Precedence::Product,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operators_from_tokens() {
        assert_eq!(BinaryOp::from_token(TokenKind::Slash), Some(BinaryOp::Div));
        assert_eq!(BinaryOp::from_token(TokenKind::Equal), None);
        assert_eq!(BinaryOp::from_token(TokenKind::LeftParen), None);
    }

    #[test]
    fn product_binds_tighter_than_sum() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert_eq!(BinaryOp::Div.precedence(), BinaryOp::Mul.precedence());
        assert_eq!(BinaryOp::Sub.precedence(), BinaryOp::Add.precedence());
        assert!(Precedence::Lowest < Precedence::Sum);
        assert!(Precedence::Prefix > Precedence::Product);
    }
}
