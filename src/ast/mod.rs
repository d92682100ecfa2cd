use crate::error::FormulaError;

mod evaluator;
mod lexer;
mod parser;

pub use evaluator::{format_result, Interpreter, ParamValue};
pub use lexer::{tokenize, Token};
pub use parser::FormulaParser;

/// Default cap on parenthesis nesting depth.
pub const DEFAULT_DEPTH_LIMIT: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    Identifier {
        name: String,
        negated: bool,
    },
    BinaryOperation {
        left: Box<ASTNode>,
        operator: Operator,
        right: Box<ASTNode>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Applies the operator to two operands. Division checks the right
    /// operand for exact zero before dividing rather than letting an
    /// infinity propagate.
    pub fn apply(&self, left: f64, right: f64) -> Result<f64, FormulaError> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide => {
                if right == 0.0 {
                    Err(FormulaError::DivisionByZero)
                } else {
                    Ok(left / right)
                }
            }
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

impl TryFrom<char> for Operator {
    type Error = FormulaError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Subtract),
            '*' => Ok(Operator::Multiply),
            '/' => Ok(Operator::Divide),
            _ => Err(FormulaError::InvalidCharacter(value)),
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
