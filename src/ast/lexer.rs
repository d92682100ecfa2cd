use crate::ast::Operator;
use crate::error::FormulaError;
use log::debug;
use std::iter::Peekable;
use std::str::Chars;

/// A lexical unit of a formula.
///
/// A `-` in operand position (start of input, after an operator, or after
/// `(`) is folded into the operand that follows it: the number's value is
/// negated directly, an identifier carries `negated: true` and the resolved
/// parameter value is negated at evaluation time. Everywhere else `-` is a
/// binary operator token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier { name: String, negated: bool },
    Operator(Operator),
    LeftParen,
    RightParen,
}

/// Splits a formula into tokens, left to right.
///
/// The input is lowercased first; formulas are case-insensitive. Whitespace
/// separates tokens and is discarded. A stream with no binary operator at
/// all (including the empty stream) is rejected with
/// [`FormulaError::NotAFormula`]: a lone literal or parameter name is not a
/// formula.
pub fn tokenize(text: &str) -> Result<Vec<Token>, FormulaError> {
    debug!("Tokenizing formula: {}", text);
    let text = text.to_lowercase();
    let mut chars = text.chars().peekable();
    let mut tokens = Vec::new();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => tokens.push(lex_number(&mut chars, false)?),
            'a'..='z' | '_' => tokens.push(lex_identifier(&mut chars, false)),
            '(' => {
                chars.next();
                tokens.push(Token::LeftParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RightParen);
            }
            '-' if operand_position(&tokens) => {
                chars.next();
                // Only a directly adjacent operand absorbs the sign.
                match chars.peek() {
                    Some(&d) if d.is_ascii_digit() || d == '.' => {
                        tokens.push(lex_number(&mut chars, true)?)
                    }
                    Some(&a) if a.is_ascii_lowercase() || a == '_' => {
                        tokens.push(lex_identifier(&mut chars, true))
                    }
                    _ => tokens.push(Token::Operator(Operator::Subtract)),
                }
            }
            '+' | '-' | '*' | '/' => {
                chars.next();
                tokens.push(Token::Operator(Operator::try_from(c)?));
            }
            other => return Err(FormulaError::InvalidCharacter(other)),
        }
    }

    if !tokens.iter().any(|t| matches!(t, Token::Operator(_))) {
        return Err(FormulaError::NotAFormula);
    }

    debug!("Tokens: {:?}", tokens);
    Ok(tokens)
}

/// True when the next `-` cannot be a binary operator because there is no
/// completed operand to its left.
fn operand_position(tokens: &[Token]) -> bool {
    matches!(
        tokens.last(),
        None | Some(Token::Operator(_)) | Some(Token::LeftParen)
    )
}

fn lex_number(chars: &mut Peekable<Chars>, negated: bool) -> Result<Token, FormulaError> {
    let mut lexeme = String::new();
    let mut dots = 0;
    while let Some(&c) = chars.peek() {
        match c {
            '0'..='9' => lexeme.push(c),
            '.' => {
                dots += 1;
                lexeme.push(c);
            }
            _ => break,
        }
        chars.next();
    }
    if dots > 1 {
        return Err(FormulaError::MalformedNumber(lexeme));
    }
    let value: f64 = lexeme
        .parse()
        .map_err(|_| FormulaError::MalformedNumber(lexeme))?;
    Ok(Token::Number(if negated { -value } else { value }))
}

fn lex_identifier(chars: &mut Peekable<Chars>, negated: bool) -> Token {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_lowercase() || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    Token::Identifier { name, negated }
}
