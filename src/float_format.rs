//! Numeric coercion and fixed-point float formatting.

use crate::value::{Value, Kind};

// Beyond 1074 fractional digits an f64 has nothing left to show.
const MAX_PRECISION: usize = 1100;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CoercionError {
    #[error("can't convert {0} value to a float")]
    WrongKind(Kind),
    #[error("can't convert {0:?} to a float: invalid number syntax")]
    Syntax(String),
}

/// Coerce numbers and numeric strings to `f64`. Strings are parsed as
/// they are, surrounding whitespace is an error.
pub fn to_f64(v: &Value) -> Result<f64, CoercionError> {
    match v {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(x) => Ok(*x),
        Value::String(s) => s.parse::<f64>().map_err(
            |_| CoercionError::Syntax(s.to_string())),
        _ => Err(CoercionError::WrongKind(v.kind()))
    }
}

/// Fixed-point with `precision` fractional digits; a negative
/// `precision` gives the shortest representation that reads back as
/// the same number.
pub fn format_f64(x: f64, precision: i64) -> String {
    if precision < 0 {
        format!("{x}")
    } else {
        let prec = usize::try_from(precision).unwrap_or(MAX_PRECISION).min(MAX_PRECISION);
        format!("{x:.prec$}")
    }
}

/// The `format_float` builtin: failing coercion results in the error
/// message instead of a number, warned about if `log`.
pub fn format_float(v: &Value, precision: i64, log: bool) -> String {
    match to_f64(v) {
        Ok(x) => format_f64(x, precision),
        Err(e) => {
            crate::warn_if!(log, "format_float: {e}");
            e.to_string()
        }
    }
}
