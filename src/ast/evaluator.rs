use crate::ast::{tokenize, ASTNode, FormulaParser, DEFAULT_DEPTH_LIMIT};
use crate::error::FormulaError;
use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;

/// A parameter value as supplied by the caller: already numeric, or text
/// that must parse as a real number.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value as f64)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl ParamValue {
    /// The numeric reading of this value, if it has one. Non-finite
    /// readings (`inf`, `NaN`) do not count as numeric.
    fn as_number(&self) -> Option<f64> {
        let value = match self {
            ParamValue::Number(n) => *n,
            ParamValue::Text(s) => s.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Checks that every parameter value is numeric and rebuilds the mapping
/// with lowercased keys, the shape identifier lookup works against.
/// The first non-numeric value aborts the whole request; parsing is never
/// attempted after a failure here.
fn validate_parameters(
    parameters: &HashMap<String, ParamValue>,
) -> Result<HashMap<String, f64>, FormulaError> {
    let mut context = HashMap::with_capacity(parameters.len());
    for (key, value) in parameters {
        let number = value
            .as_number()
            .ok_or_else(|| FormulaError::NonNumericParameter(key.clone()))?;
        context.insert(key.to_lowercase(), number);
    }
    Ok(context)
}

/// Formats a successful result for the caller.
///
/// With `precision == 0` the value keeps Rust's default `f64` text form
/// (shortest representation that round-trips, no forced fraction digits).
/// With `precision > 0` the value is printed with exactly that many
/// fractional digits, rounded to nearest by the standard library's float
/// formatter.
pub fn format_result(value: f64, precision: usize) -> String {
    if precision > 0 {
        format!("{value:.precision$}")
    } else {
        format!("{value}")
    }
}

/// The formula interpretation engine.
///
/// Stateless apart from configuration: every call allocates its own token
/// stream and AST and discards them on return, so one `Interpreter` can be
/// shared freely across threads.
#[derive(Debug, Clone)]
pub struct Interpreter {
    depth_limit: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }

    /// An interpreter with a custom cap on parenthesis nesting.
    pub fn with_depth_limit(depth_limit: usize) -> Self {
        Self { depth_limit }
    }

    /// Evaluates a formula against a parameter mapping and formats the
    /// result with the requested precision.
    ///
    /// # Arguments
    ///
    /// * `formula` - The arithmetic expression text, case-insensitive.
    /// * `parameters` - Parameter names to values; names are matched
    ///   case-insensitively against identifiers in the formula.
    /// * `precision` - Fractional digits in the output; 0 disables
    ///   fixed-point formatting.
    pub fn evaluate(
        &self,
        formula: &str,
        parameters: &HashMap<String, ParamValue>,
        precision: usize,
    ) -> Result<String, FormulaError> {
        let value = self.evaluate_raw(formula, parameters)?;
        Ok(format_result(value, precision))
    }

    /// Like [`Interpreter::evaluate`] but returns the unformatted number.
    pub fn evaluate_raw(
        &self,
        formula: &str,
        parameters: &HashMap<String, ParamValue>,
    ) -> Result<f64, FormulaError> {
        // Gate order per the original engine: reject non-numeric
        // parameters before any tokenizing or parsing work.
        let context = validate_parameters(parameters)?;
        let tokens = tokenize(formula)?;
        let ast = FormulaParser::parse_with_depth_limit(&tokens, self.depth_limit)?;
        self.evaluate_ast(&ast, &context)
    }

    /// Evaluates a single AST node against a lowercase-keyed context.
    pub fn evaluate_ast(
        &self,
        ast: &ASTNode,
        context: &HashMap<String, f64>,
    ) -> Result<f64, FormulaError> {
        match ast {
            ASTNode::Number(n) => Ok(*n),

            ASTNode::Identifier { name, negated } => {
                let value = context
                    .get(name)
                    .copied()
                    .ok_or_else(|| FormulaError::UnknownParameter(name.clone()))?;
                Ok(if *negated { -value } else { value })
            }

            ASTNode::BinaryOperation {
                left,
                operator,
                right,
            } => {
                let left_value = self.evaluate_ast(left, context)?;
                let right_value = self.evaluate_ast(right, context)?;
                debug!(
                    "Applying {} to {} and {}",
                    operator, left_value, right_value
                );
                operator.apply(left_value, right_value)
            }
        }
    }

    /// Evaluates one formula over many parameter sets in parallel.
    ///
    /// The formula is tokenized and parsed once; each parameter set is then
    /// validated and evaluated independently. Results come back in input
    /// order. A formula-level failure is reported once per set.
    pub fn evaluate_batch(
        &self,
        formula: &str,
        parameter_sets: &[HashMap<String, ParamValue>],
        precision: usize,
    ) -> Vec<Result<String, FormulaError>> {
        let parsed = tokenize(formula)
            .and_then(|tokens| FormulaParser::parse_with_depth_limit(&tokens, self.depth_limit));

        match parsed {
            Ok(ast) => parameter_sets
                .par_iter()
                .map(|parameters| {
                    let context = validate_parameters(parameters)?;
                    let value = self.evaluate_ast(&ast, &context)?;
                    Ok(format_result(value, precision))
                })
                .collect(),
            Err(err) => parameter_sets.iter().map(|_| Err(err.clone())).collect(),
        }
    }
}
