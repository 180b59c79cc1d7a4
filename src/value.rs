use std::fmt;
use std::str;

use crate::errors::CalcError;

/// Expression evaluation result: either a renderable value or an error.
pub type CalcResult = Result<Value, CalcError>;

/// Magnitude limits applied when the final scalar is classified.
#[derive(Clone, Debug)]
pub struct Limits {
    /// results above this magnitude fail with `Overflow`
    pub max_magnitude: f64,
    /// results above this magnitude render in scientific notation
    pub sci_threshold: f64,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_magnitude: 1e25,
            sci_threshold: 1e9,
        }
    }
}

/// How the final scalar is rendered. The representation is decided once,
/// here, instead of re-checking "is this an integer" at every display site.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Value {
    /// mathematically integral result, rendered without a decimal point
    Integer(i64),
    /// plain decimal number
    Decimal(f64),
    /// large magnitude, rendered with 6 fractional digits of mantissa
    Scientific(f64),
}

impl Value {
    /// Classifies a reduced scalar against the limits. Non-finite scalars
    /// count as overflow: they have already escaped any ceiling.
    pub fn classify(v: f64, limits: &Limits) -> CalcResult {
        if !v.is_finite() || v.abs() > limits.max_magnitude {
            return Err(CalcError::Overflow);
        }
        if v.abs() > limits.sci_threshold {
            return Ok(Value::Scientific(v));
        }
        if v.fract() == 0.0 {
            // magnitude is capped by sci_threshold, far below i64::MAX
            return Ok(Value::Integer(v as i64));
        }
        Ok(Value::Decimal(v))
    }
}

const F64_BUF_LEN: usize = 48;
fn format_f64(g: f64) -> String {
    let mut buf = [b'\0'; F64_BUF_LEN];
    match dtoa::write(&mut buf[..], g) {
        Ok(len) => match str::from_utf8(&buf[..len]) {
            Ok(s) => s.to_string(),
            Err(..) => format!("{}", g),
        },
        Err(..) => format!("{}", g),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Value::Integer(ref i) => write!(f, "{}", i),
            Value::Decimal(ref g) => write!(f, "{}", format_f64(*g)),
            Value::Scientific(ref g) => write!(f, "{:.6e}", g),
        }
    }
}
