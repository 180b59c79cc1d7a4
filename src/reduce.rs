//! Precedence-based reduction of a flat token sequence.
//!
//! Three passes, one per priority level: `^` first (right-associative),
//! then `*` and `/` (left-associative), then `+` and `-`. A pass runs only
//! when its operator is present; after the last pass the sequence must be a
//! strict alternation `num (op num)*`, otherwise the input was malformed.

use tracing::trace;

use crate::errors::CalcError;
use crate::parse::{Op, Token};

/// Collapses a parenthesis-free token sequence into a scalar.
pub fn reduce(tokens: &[Token]) -> Result<f64, CalcError> {
    let mut tokens = tokens.to_vec();

    if tokens.iter().any(|t| *t == Token::Op(Op::Pow)) {
        tokens = fold_pow(tokens)?;
        trace!("power pass left {} tokens", tokens.len());
    }

    if tokens
        .iter()
        .any(|t| *t == Token::Op(Op::Mul) || *t == Token::Op(Op::Div))
    {
        tokens = fold_mul_div(tokens)?;
        trace!("multiply/divide pass left {} tokens", tokens.len());
    }

    fold_add_sub(&tokens)
}

// pass 1: power chains, scanned right to left so `a^b^c` groups as a^(b^c)
fn fold_pow(tokens: Vec<Token>) -> Result<Vec<Token>, CalcError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = tokens.len();

    while i > 0 {
        i -= 1;
        match tokens[i] {
            Token::Num(n) => {
                let mut value = n;
                while i >= 2 && tokens[i - 1] == Token::Op(Op::Pow) {
                    let base = match tokens[i - 2] {
                        Token::Num(b) => b,
                        Token::Op(..) => {
                            return Err(CalcError::MalformedExpression(
                                "'^' without a base".to_string(),
                            ))
                        }
                    };
                    value = Op::Pow.apply(base, value)?;
                    i -= 2;
                }
                out.push(Token::Num(value));
            }
            tok => out.push(tok),
        }
    }

    out.reverse();
    Ok(out)
}

// pass 2: multiplication and division chains, folded in encounter order
fn fold_mul_div(tokens: Vec<Token>) -> Result<Vec<Token>, CalcError> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            Token::Num(n) => {
                let mut value = n;
                loop {
                    let op = match tokens.get(i + 1) {
                        Some(&Token::Op(op)) if op == Op::Mul || op == Op::Div => op,
                        _ => break,
                    };
                    let rhs = match tokens.get(i + 2) {
                        Some(&Token::Num(r)) => r,
                        _ => {
                            return Err(CalcError::MalformedExpression(format!(
                                "'{}' without a right operand",
                                op
                            )))
                        }
                    };
                    value = op.apply(value, rhs)?;
                    i += 2;
                }
                out.push(Token::Num(value));
            }
            tok => out.push(tok),
        }
        i += 1;
    }

    Ok(out)
}

// pass 3: what remains must alternate strictly between numerals and
// operators; anything else is reported instead of being silently skipped
fn fold_add_sub(tokens: &[Token]) -> Result<f64, CalcError> {
    let mut acc = match tokens.first() {
        Some(&Token::Num(n)) => n,
        Some(&Token::Op(op)) => {
            return Err(CalcError::MalformedExpression(format!(
                "expression starts with '{}'",
                op
            )))
        }
        None => return Err(CalcError::MalformedExpression("empty expression".to_string())),
    };

    let mut i = 1;
    while i < tokens.len() {
        let op = match tokens[i] {
            Token::Op(op) => op,
            Token::Num(..) => {
                return Err(CalcError::MalformedExpression(
                    "two numbers in a row".to_string(),
                ))
            }
        };
        let rhs = match tokens.get(i + 1) {
            Some(&Token::Num(n)) => n,
            _ => {
                return Err(CalcError::MalformedExpression(format!(
                    "'{}' without a right operand",
                    op
                )))
            }
        };
        acc = op.apply(acc, rhs)?;
        i += 2;
    }

    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tokenize;

    fn run(expr: &str) -> Result<f64, CalcError> {
        reduce(&tokenize(expr)?)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(run("2+3*4"), Ok(14.0));
        assert_eq!(run("2*3+4"), Ok(10.0));
        assert_eq!(run("10-2/4"), Ok(9.5));
        assert_eq!(run("2*3^2"), Ok(18.0));
    }

    #[test]
    fn test_power_is_right_associative() {
        // 2^(3^2), not (2^3)^2
        assert_eq!(run("2^3^2"), Ok(512.0));
        assert_eq!(run("7+5^2"), Ok(32.0));
        assert_eq!(run("2^-2"), Ok(0.25));
    }

    #[test]
    fn test_left_associative_chains() {
        assert_eq!(run("6/2/3"), Ok(1.0));
        assert_eq!(run("10-3-4"), Ok(3.0));
        assert_eq!(run("2*3*4/6"), Ok(4.0));
    }

    #[test]
    fn test_signed_numerals() {
        assert_eq!(run("-5+3"), Ok(-2.0));
        assert_eq!(run("2*-3"), Ok(-6.0));
        assert_eq!(run("5--3"), Ok(8.0));
    }

    #[test]
    fn test_division_by_near_zero() {
        assert_eq!(run("5/0"), Err(CalcError::DividedByZero));
        assert_eq!(run("5/0.0000000000000001"), Err(CalcError::DividedByZero));
    }

    #[test]
    fn test_malformed_sequences() {
        assert!(matches!(run(""), Err(CalcError::MalformedExpression(..))));
        assert!(matches!(run("+5"), Err(CalcError::MalformedExpression(..))));
        assert!(matches!(run("2+"), Err(CalcError::MalformedExpression(..))));
        assert!(matches!(run("2*"), Err(CalcError::MalformedExpression(..))));
        assert!(matches!(run("2^"), Err(CalcError::MalformedExpression(..))));
        assert!(matches!(run("^2"), Err(CalcError::MalformedExpression(..))));
        assert!(matches!(run("2 3"), Err(CalcError::MalformedExpression(..))));
    }
}
