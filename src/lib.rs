//! Arithmetic formula interpreter.
//!
//! Evaluates formula strings over numeric literals, named parameters, the
//! four basic operators, unary negation, and parentheses:
//!
//! ```
//! use formulix_rs::{evaluate, ParamValue};
//! use std::collections::HashMap;
//!
//! let parameters = HashMap::from([
//!     ("price".to_string(), ParamValue::from(19.99)),
//!     ("quantity".to_string(), ParamValue::from(3)),
//! ]);
//!
//! let total = evaluate("price * quantity", &parameters, 2).unwrap();
//! assert_eq!(total, "59.97");
//! ```
//!
//! Pipeline: parameter validation → tokenizer → recursive-descent parser →
//! evaluator → precision formatting. Every failure comes back as a typed
//! [`FormulaError`]; rendering it is the caller's business.

pub mod ast;
pub mod error;

pub use ast::{format_result, tokenize, ASTNode, FormulaParser, Interpreter, Operator, ParamValue, Token};
pub use error::FormulaError;

use std::collections::HashMap;

/// Evaluates a formula with a default-configured [`Interpreter`].
///
/// `formula` is case-insensitive, `parameters` keys are matched
/// case-insensitively against identifiers in it, and `precision` is the
/// number of fractional digits in the output (0 leaves the default numeric
/// text form).
pub fn evaluate(
    formula: &str,
    parameters: &HashMap<String, ParamValue>,
    precision: usize,
) -> Result<String, FormulaError> {
    Interpreter::new().evaluate(formula, parameters, precision)
}
