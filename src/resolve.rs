//! Flattening of parenthesized expressions.
//!
//! The resolver substitutes `ans`, then repeatedly finds the first group
//! that closes, evaluates its contents through the tokenizer and reducer,
//! and splices the scalar back into the string by byte range. The loop
//! ends when no `(` remains and the string is ready for final tokenization.

use tracing::trace;

use crate::errors::CalcError;
use crate::history::History;
use crate::parse::tokenize;
use crate::reduce::reduce;

const ANS: &str = "ans";

/// Returns a parenthesis-free rendition of `expr`.
///
/// Unmatched opening parentheses are auto-closed at the end of the string;
/// an unmatched closing parenthesis is an error. An empty group `()` is
/// deleted without being evaluated.
pub fn resolve(expr: &str, history: &History) -> Result<String, CalcError> {
    let mut expr = substitute_ans(expr, history)?;

    let opens = expr.matches('(').count();
    let closes = expr.matches(')').count();
    if opens > closes {
        expr.push_str(&")".repeat(opens - closes));
    }

    while expr.contains('(') {
        if !resolve_innermost(&mut expr)? {
            return Err(CalcError::MalformedExpression(
                "unbalanced parentheses".to_string(),
            ));
        }
    }

    Ok(expr)
}

// `ans` stands for the last recorded result; without one the substitution
// is refused rather than silently left in place
fn substitute_ans(expr: &str, history: &History) -> Result<String, CalcError> {
    if !expr.contains(ANS) {
        return Ok(expr.to_string());
    }
    match history.last_answer() {
        Some(ans) => Ok(expr.replace(ANS, ans)),
        None => Err(CalcError::NoPriorAnswer),
    }
}

// evaluate the group behind the first `)`, splice the value back, and
// report whether anything changed
fn resolve_innermost(expr: &mut String) -> Result<bool, CalcError> {
    let (start, end) = match find_first_group(expr)? {
        Some(span) => span,
        None => return Ok(false),
    };

    let inner = &expr[start + 1..end];
    if inner.trim().is_empty() {
        expr.replace_range(start..=end, "");
        return Ok(true);
    }

    let value = reduce(&tokenize(inner)?)?;
    if !value.is_finite() {
        return Err(CalcError::Overflow);
    }
    trace!("group '{}' reduced to {}", inner, value);

    splice_group(expr, start, end, value);
    Ok(true)
}

// scan with an explicit stack of opening positions; the first `)` closes
// the innermost group
fn find_first_group(expr: &str) -> Result<Option<(usize, usize)>, CalcError> {
    let mut opens: Vec<usize> = Vec::new();

    for (i, c) in expr.char_indices() {
        match c {
            '(' => opens.push(i),
            ')' => {
                return match opens.pop() {
                    Some(start) => Ok(Some((start, i))),
                    None => Err(CalcError::MalformedExpression("unmatched ')'".to_string())),
                }
            }
            _ => {}
        }
    }

    Ok(None)
}

// replace `(...)` at start..=end with the value's textual form; a `-`
// immediately before the group is folded into the value's sign
fn splice_group(expr: &mut String, start: usize, end: usize, value: f64) {
    // a negative zero would lose its '-' in the splices below
    let value = if value == 0.0 { 0.0 } else { value };

    let minus_before = start > 0 && expr.as_bytes()[start - 1] == b'-';
    if !minus_before {
        expr.replace_range(start..=end, &literal(value));
        return;
    }

    // the minus is unary when it starts the string or follows another
    // operator or an opening parenthesis; otherwise it is a binary minus
    // whose right operand happened to be parenthesized
    let unary = start == 1
        || matches!(
            expr.as_bytes()[start - 2],
            b'+' | b'-' | b'*' | b'/' | b'^' | b'('
        );

    if !unary && value < 0.0 {
        // "a-(negative)" turns into "a+positive"
        let text = format!("+{}", literal(-value));
        expr.replace_range(start - 1..=end, &text);
    } else {
        expr.replace_range(start - 1..=end, &literal(-value));
    }
}

// plain positional notation; `Display` for f64 never switches to exponent
// form, so the spliced text always re-tokenizes
fn literal(value: f64) -> String {
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(expr: &str) -> Result<String, CalcError> {
        resolve(expr, &History::new())
    }

    #[test]
    fn test_no_parentheses() {
        assert_eq!(flat("2+3*4"), Ok("2+3*4".to_string()));
    }

    #[test]
    fn test_single_group() {
        assert_eq!(flat("2*(3+4)"), Ok("2*7".to_string()));
    }

    #[test]
    fn test_nested_groups() {
        assert_eq!(flat("((1+2)*(3+4))"), Ok("21".to_string()));
        assert_eq!(flat("2^(1+(1+1))"), Ok("2^3".to_string()));
    }

    #[test]
    fn test_unary_minus_before_group() {
        assert_eq!(flat("-(2+3)"), Ok("-5".to_string()));
        assert_eq!(flat("2*-(3+4)"), Ok("2*-7".to_string()));
        assert_eq!(flat("(-(2+3))"), Ok("-5".to_string()));
    }

    #[test]
    fn test_binary_minus_before_group() {
        assert_eq!(flat("10-(2+3)"), Ok("10-5".to_string()));
        // a negative inner value flips the minus to a plus
        assert_eq!(flat("10-(2-3)"), Ok("10+1".to_string()));
        assert_eq!(flat("10-(0)"), Ok("10-0".to_string()));
    }

    #[test]
    fn test_empty_group_removed() {
        assert_eq!(flat("3+()"), Ok("3+".to_string()));
        assert_eq!(flat("3+( )*2"), Ok("3+*2".to_string()));
    }

    #[test]
    fn test_auto_balancing() {
        assert_eq!(flat("2*(3+4"), Ok("2*7".to_string()));
        assert_eq!(flat("((1+2"), Ok("3".to_string()));
    }

    #[test]
    fn test_unmatched_closing() {
        assert!(matches!(
            flat("2+3)"),
            Err(CalcError::MalformedExpression(..))
        ));
    }

    #[test]
    fn test_error_inside_group_propagates() {
        assert_eq!(flat("2+(5/0)"), Err(CalcError::DividedByZero));
    }

    #[test]
    fn test_ans_substitution() {
        let mut history = History::new();
        history.record("2+2", "4");
        assert_eq!(resolve("ans*3", &history), Ok("4*3".to_string()));
        assert_eq!(resolve("(ans+1)*2", &history), Ok("5*2".to_string()));
    }

    #[test]
    fn test_ans_without_history() {
        assert_eq!(flat("ans*3"), Err(CalcError::NoPriorAnswer));
    }
}
