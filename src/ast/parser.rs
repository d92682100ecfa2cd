use crate::ast::{ASTNode, Operator, Token, DEFAULT_DEPTH_LIMIT};
use crate::error::FormulaError;
use log::debug;

/// Recursive-descent parser over a token stream.
///
/// Grammar, lowest precedence first, every binary operator left-associative:
///
/// ```text
/// expression := term   (('+' | '-') term)*
/// term       := factor (('*' | '/') factor)*
/// factor     := Number | Identifier | '(' expression ')'
/// ```
///
/// Unary negation never reaches the parser: the lexer folds it into the
/// number or identifier token it precedes.
pub struct FormulaParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth_limit: usize,
}

impl<'a> FormulaParser<'a> {
    pub fn parse(tokens: &'a [Token]) -> Result<ASTNode, FormulaError> {
        Self::parse_with_depth_limit(tokens, DEFAULT_DEPTH_LIMIT)
    }

    /// Parses with a caller-chosen cap on parenthesis nesting. The cap
    /// bounds recursion on adversarial input; past it parsing fails with
    /// [`FormulaError::TooDeeplyNested`].
    pub fn parse_with_depth_limit(
        tokens: &'a [Token],
        depth_limit: usize,
    ) -> Result<ASTNode, FormulaError> {
        let mut parser = FormulaParser {
            tokens,
            pos: 0,
            depth_limit,
        };
        let node = parser.build_expression(0)?;
        if parser.pos != parser.tokens.len() {
            return Err(FormulaError::MalformedExpression(format!(
                "unexpected {} after a complete expression",
                parser.describe_current()
            )));
        }
        debug!("Parsed AST: {:?}", node);
        Ok(node)
    }

    fn build_expression(&mut self, depth: usize) -> Result<ASTNode, FormulaError> {
        debug!("Building expression at token {}", self.pos);
        let mut node = self.build_term(depth)?;

        while let Some(Token::Operator(op @ (Operator::Add | Operator::Subtract))) = self.peek() {
            let operator = *op;
            self.pos += 1;
            let right = self.build_term(depth)?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn build_term(&mut self, depth: usize) -> Result<ASTNode, FormulaError> {
        debug!("Building term at token {}", self.pos);
        let mut node = self.build_factor(depth)?;

        while let Some(Token::Operator(op @ (Operator::Multiply | Operator::Divide))) = self.peek()
        {
            let operator = *op;
            self.pos += 1;
            let right = self.build_factor(depth)?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn build_factor(&mut self, depth: usize) -> Result<ASTNode, FormulaError> {
        debug!("Building factor at token {}", self.pos);
        match self.advance() {
            Some(Token::Number(value)) => Ok(ASTNode::Number(*value)),
            Some(Token::Identifier { name, negated }) => Ok(ASTNode::Identifier {
                name: name.clone(),
                negated: *negated,
            }),
            Some(Token::LeftParen) => {
                if depth + 1 > self.depth_limit {
                    return Err(FormulaError::TooDeeplyNested {
                        limit: self.depth_limit,
                    });
                }
                let node = self.build_expression(depth + 1)?;
                match self.advance() {
                    Some(Token::RightParen) => Ok(node),
                    _ => Err(FormulaError::MalformedExpression(
                        "unbalanced parentheses: missing ')'".to_string(),
                    )),
                }
            }
            Some(Token::RightParen) => Err(FormulaError::MalformedExpression(
                "empty group or stray ')'".to_string(),
            )),
            Some(Token::Operator(op)) => Err(FormulaError::MalformedExpression(format!(
                "operator '{}' is missing an operand",
                op
            ))),
            None => Err(FormulaError::MalformedExpression(
                "formula ends where an operand was expected".to_string(),
            )),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn describe_current(&self) -> String {
        match self.peek() {
            Some(token) => format!("token {:?}", token),
            None => "end of input".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::tokenize;

    fn parse(input: &str) -> Result<ASTNode, FormulaError> {
        FormulaParser::parse(&tokenize(input)?)
    }

    fn num(value: f64) -> Box<ASTNode> {
        Box::new(ASTNode::Number(value))
    }

    #[test]
    fn test_simple_binary_expression() {
        let ast = parse("2+3").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: num(2.0),
            operator: Operator::Add,
            right: num(3.0),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let ast = parse("2+3*4").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: num(2.0),
            operator: Operator::Add,
            right: Box::new(ASTNode::BinaryOperation {
                left: num(3.0),
                operator: Operator::Multiply,
                right: num(4.0),
            }),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let ast = parse("(2+3)*4").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: Box::new(ASTNode::BinaryOperation {
                left: num(2.0),
                operator: Operator::Add,
                right: num(3.0),
            }),
            operator: Operator::Multiply,
            right: num(4.0),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let ast = parse("10-2-3").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: Box::new(ASTNode::BinaryOperation {
                left: num(10.0),
                operator: Operator::Subtract,
                right: num(2.0),
            }),
            operator: Operator::Subtract,
            right: num(3.0),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_division_is_left_associative() {
        let ast = parse("20/2/5").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: Box::new(ASTNode::BinaryOperation {
                left: num(20.0),
                operator: Operator::Divide,
                right: num(2.0),
            }),
            operator: Operator::Divide,
            right: num(5.0),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_negated_identifier_factor() {
        let ast = parse("-x+5").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: Box::new(ASTNode::Identifier {
                name: "x".to_string(),
                negated: true,
            }),
            operator: Operator::Add,
            right: num(5.0),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_nested_groups() {
        let ast = parse("((1+2)*(3+4))/7").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: Box::new(ASTNode::BinaryOperation {
                left: Box::new(ASTNode::BinaryOperation {
                    left: num(1.0),
                    operator: Operator::Add,
                    right: num(2.0),
                }),
                operator: Operator::Multiply,
                right: Box::new(ASTNode::BinaryOperation {
                    left: num(3.0),
                    operator: Operator::Add,
                    right: num(4.0),
                }),
            }),
            operator: Operator::Divide,
            right: num(7.0),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_malformed_expressions_rejected() {
        let inputs = vec![
            "a++",
            "(1+2",
            "1+2)",
            "()+1",
            "1+*2",
            "*2+1",
            "1+2 3",
            "-(2+3)",
        ];

        for input in inputs {
            assert!(
                matches!(parse(input), Err(FormulaError::MalformedExpression(_))),
                "input '{}' should be a malformed expression",
                input
            );
        }
    }

    #[test]
    fn test_trailing_operator_rejected() {
        assert!(matches!(
            parse("1+2-"),
            Err(FormulaError::MalformedExpression(_))
        ));
    }

    #[test]
    fn test_nesting_over_limit_rejected() {
        let input = format!("{}1+1{}", "(".repeat(5), ")".repeat(5));
        let tokens = tokenize(&input).unwrap();
        assert!(FormulaParser::parse_with_depth_limit(&tokens, 5).is_ok());
        assert_eq!(
            FormulaParser::parse_with_depth_limit(&tokens, 4),
            Err(FormulaError::TooDeeplyNested { limit: 4 })
        );
    }

    #[test]
    fn test_default_limit_allows_reasonable_nesting() {
        let input = format!("{}1+1{}", "(".repeat(60), ")".repeat(60));
        let tokens = tokenize(&input).unwrap();
        assert!(FormulaParser::parse(&tokens).is_ok());
    }

    #[test]
    fn test_long_chain() {
        let input = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join("+");
        let ast = parse(&input).unwrap();

        let mut expected_ast = ASTNode::Number(0.0);
        for i in 1..100 {
            expected_ast = ASTNode::BinaryOperation {
                left: Box::new(expected_ast),
                operator: Operator::Add,
                right: num(i as f64),
            };
        }
        assert_eq!(ast, expected_ast);
    }
}
