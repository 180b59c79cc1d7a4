use std::fmt;

use pest::Parser;

use crate::errors::CalcError;

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

/// Divisors below this magnitude are treated as zero.
pub const DIV_EPSILON: f64 = 1e-15;

/// The five supported operators.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Op {
    /// Applies the operator to its operands. The dispatch is a fixed match,
    /// never a runtime-mutable table.
    pub(crate) fn apply(self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Op::Add => Ok(a + b),
            Op::Sub => Ok(a - b),
            Op::Mul => Ok(a * b),
            Op::Div => {
                if b.abs() < DIV_EPSILON {
                    Err(CalcError::DividedByZero)
                } else {
                    Ok(a / b)
                }
            }
            Op::Pow => Ok(a.powf(b)),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Op::Add => write!(f, "+"),
            Op::Sub => write!(f, "-"),
            Op::Mul => write!(f, "*"),
            Op::Div => write!(f, "/"),
            Op::Pow => write!(f, "^"),
        }
    }
}

/// A numeral or operator of a flat expression segment.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Token {
    Num(f64),
    Op(Op),
}

/// Splits a flat segment into tokens, left to right. Characters that are
/// neither numerals nor operators are dropped by the grammar; the caller
/// strips parentheses before this point. Unary minus is folded into the
/// numeral it signs, so the reducer only ever sees binary operators.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, CalcError> {
    let pairs = match CalcParser::parse(Rule::expr, expr) {
        Ok(p) => p,
        Err(..) => return Err(CalcError::MalformedExpression("invalid expression".to_string())),
    };

    let mut raw = Vec::new();
    for pair in pairs {
        match pair.as_rule() {
            Rule::num => {
                let s = pair.as_span().as_str();
                let n = s
                    .parse::<f64>()
                    .map_err(|_| CalcError::MalformedExpression(format!("bad numeral '{}'", s)))?;
                raw.push(Token::Num(n));
            }
            Rule::op => {
                let op = match pair.as_span().as_str() {
                    "+" => Op::Add,
                    "-" => Op::Sub,
                    "*" => Op::Mul,
                    "/" => Op::Div,
                    "^" => Op::Pow,
                    s => return Err(CalcError::MalformedExpression(format!("invalid operator '{}'", s))),
                };
                raw.push(Token::Op(op));
            }
            _ => {}
        }
    }

    fold_unary_minus(&raw)
}

// a leading "- num" and any "op - num" collapse into a signed numeral;
// every other '-' stays a binary operator
fn fold_unary_minus(raw: &[Token]) -> Result<Vec<Token>, CalcError> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    if let Some(Token::Op(Op::Sub)) = raw.first() {
        match raw.get(1) {
            Some(&Token::Num(n)) => {
                out.push(Token::Num(-n));
                i = 2;
            }
            _ => return Err(CalcError::MalformedExpression("'-' without an operand".to_string())),
        }
    }

    while i < raw.len() {
        match (raw[i], raw.get(i + 1), raw.get(i + 2)) {
            (Token::Op(op), Some(Token::Op(Op::Sub)), Some(&Token::Num(n))) => {
                out.push(Token::Op(op));
                out.push(Token::Num(-n));
                i += 3;
            }
            (tok, ..) => {
                out.push(tok);
                i += 1;
            }
        }
    }

    Ok(out)
}
