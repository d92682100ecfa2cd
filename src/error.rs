use thiserror::Error;

/// Every way a formula evaluation can fail.
///
/// All failures are detected synchronously and carry enough context
/// (offending character, lexeme, or parameter name) for a caller to build
/// its own diagnostic message. The engine itself renders no markup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// The input contains no binary operator, so it is not a formula.
    /// A bare number or parameter name is rejected with this.
    #[error("input is not a formula: no arithmetic operator found")]
    NotAFormula,

    /// A character outside the supported alphabet (digits, `.`, letters,
    /// `_`, `+ - * /`, parentheses, whitespace).
    #[error("invalid character '{0}' in formula")]
    InvalidCharacter(char),

    /// A parameter value that cannot be interpreted as a real number.
    #[error("parameter '{0}' has a non-numeric value")]
    NonNumericParameter(String),

    /// The formula references a parameter that was not supplied.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// A numeric literal that fails to parse, e.g. `1.2.3`.
    #[error("malformed number '{0}'")]
    MalformedNumber(String),

    /// A structural problem: unbalanced parentheses, a dangling operator,
    /// an empty group, or trailing tokens after a complete expression.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// A division whose right operand evaluates to exactly zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Parenthesis nesting exceeded the configured limit.
    #[error("expression nested deeper than {limit} levels")]
    TooDeeplyNested { limit: usize },
}
