//! The end-to-end evaluation pipeline.

use tracing::debug;

use crate::errors::CalcError;
use crate::history::History;
use crate::parse::tokenize;
use crate::reduce::reduce;
use crate::resolve::resolve;
use crate::value::{Limits, Value};

/// Evaluates one expression under the default limits.
pub fn evaluate(expr: &str, history: &mut History) -> Result<String, CalcError> {
    evaluate_with(expr, history, &Limits::default())
}

/// Runs the full pipeline: resolver, tokenizer, reducer, classification.
/// The expression/result pair is recorded only when every stage succeeds;
/// a failed evaluation leaves the ledger untouched.
pub fn evaluate_with(
    expr: &str,
    history: &mut History,
    limits: &Limits,
) -> Result<String, CalcError> {
    let flat = resolve(expr, history)?;
    let tokens = tokenize(&flat)?;
    let scalar = reduce(&tokens)?;
    let value = Value::classify(scalar, limits)?;

    let rendered = value.to_string();
    debug!("'{}' evaluated to {}", expr, rendered);
    history.record(expr, &rendered);
    Ok(rendered)
}

/// What the calculator display shows: the rendered result, or the error in
/// its user-visible form.
pub fn evaluate_display(expr: &str, history: &mut History) -> String {
    match evaluate(expr, history) {
        Ok(rendered) => rendered,
        Err(e) => format!("Error: {}", e),
    }
}
