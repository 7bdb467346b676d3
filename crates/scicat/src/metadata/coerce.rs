//! Normalization of raw values into JSON-compatible scalars.

use serde_json::{Number, Value};
use thiserror::Error;

use super::value::RawValue;

/// Marker returned for values that carry no valid numeric data.
pub const INVALID_SENTINEL: &str = "-";

/// Raised when a value has no scalar summary.
///
/// Numeric problems never produce this error; they map to
/// [`INVALID_SENTINEL`]. Only multi-element text arrays, which have no
/// mean, end up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    #[error("cannot reduce a text array of {len} elements to a scalar")]
    NonNumericArray { len: usize },
}

/// Maps raw values to JSON scalars (or arrays when asked to keep them).
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCoercer {
    leave_as_array: bool,
}

impl ValueCoercer {
    /// Coercer that reduces arrays to a single summary value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Coercer that keeps arrays as JSON arrays.
    pub fn preserving_arrays() -> Self {
        Self {
            leave_as_array: true,
        }
    }

    pub fn leaves_arrays(&self) -> bool {
        self.leave_as_array
    }

    /// Coerce one raw value.
    pub fn coerce(&self, raw: &RawValue) -> Result<Value, CoercionError> {
        if raw.is_array() {
            if self.leave_as_array {
                return Ok(array_to_json(raw));
            }
            return reduce_array(raw);
        }
        Ok(coerce_scalar(raw))
    }
}

/// Shorthand for `ValueCoercer` with the given array policy.
pub fn coerce(raw: &RawValue, leave_as_array: bool) -> Result<Value, CoercionError> {
    let coercer = if leave_as_array {
        ValueCoercer::preserving_arrays()
    } else {
        ValueCoercer::new()
    };
    coercer.coerce(raw)
}

fn coerce_scalar(raw: &RawValue) -> Value {
    match raw {
        RawValue::Bool(b) => Value::Bool(*b),
        RawValue::Int(i) => Value::from(*i),
        RawValue::UInt(u) => Value::from(*u),
        RawValue::Float(f) => float_or_sentinel(*f),
        RawValue::Bytes(bytes) => text_value(&String::from_utf8_lossy(bytes)),
        RawValue::Text(s) => text_value(s),
        // arrays are handled before reaching here
        RawValue::IntArray(_) | RawValue::FloatArray(_) | RawValue::TextArray(_) => {
            array_to_json(raw)
        }
    }
}

fn reduce_array(raw: &RawValue) -> Result<Value, CoercionError> {
    match raw {
        RawValue::IntArray(values) => Ok(match values.as_slice() {
            [single] => Value::from(*single),
            // an empty array has no valid element
            [] => sentinel(),
            _ => {
                let floats: Vec<f64> = values.iter().map(|&v| v as f64).collect();
                float_or_sentinel(mean(&floats))
            }
        }),
        RawValue::FloatArray(values) => Ok(match values.as_slice() {
            [single] => float_or_sentinel(*single),
            _ => float_or_sentinel(reduce_floats(values)),
        }),
        RawValue::TextArray(values) => match values.as_slice() {
            [single] => Ok(text_value(single)),
            _ => Err(CoercionError::NonNumericArray { len: values.len() }),
        },
        other => Ok(coerce_scalar(other)),
    }
}

/// Mean of the array, masking non-finite elements when they poison it.
///
/// Returns NaN when no element is finite so that the caller maps it to the
/// sentinel.
fn reduce_floats(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    let full = mean(values);
    if full.is_finite() { full } else { mean(&finite) }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn float_or_sentinel(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or_else(sentinel)
}

fn sentinel() -> Value {
    Value::String(INVALID_SENTINEL.to_string())
}

/// Strips a leftover `b'...'` wrapper from stringified bytes.
fn text_value(s: &str) -> Value {
    match s.strip_prefix("b'") {
        Some(rest) => {
            let mut inner = rest.to_string();
            inner.pop();
            Value::String(inner)
        }
        None => Value::String(s.to_string()),
    }
}

fn array_to_json(raw: &RawValue) -> Value {
    match raw {
        RawValue::IntArray(v) => Value::Array(v.iter().map(|&i| Value::from(i)).collect()),
        RawValue::FloatArray(v) => {
            Value::Array(v.iter().map(|&f| float_or_sentinel(f)).collect())
        }
        RawValue::TextArray(v) => Value::Array(v.iter().map(|s| text_value(s)).collect()),
        other => coerce_scalar(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reduce(raw: RawValue) -> Value {
        coerce(&raw, false).unwrap()
    }

    #[test]
    fn test_all_nan_array_is_sentinel() {
        assert_eq!(reduce(vec![f64::NAN, f64::NAN, f64::NAN].into()), json!("-"));
        assert_eq!(reduce(vec![f64::INFINITY, f64::NAN].into()), json!("-"));
    }

    #[test]
    fn test_mixed_array_masks_invalid() {
        let value = reduce(vec![1.0, f64::NAN, 3.0, f64::NEG_INFINITY].into());
        assert_eq!(value, json!(2.0));
    }

    #[test]
    fn test_plain_mean() {
        assert_eq!(reduce(vec![1.0, 2.0, 3.0, 6.0].into()), json!(3.0));
        assert_eq!(reduce(vec![1i64, 2, 3].into()), json!(2.0));
    }

    #[test]
    fn test_single_element_unwraps() {
        assert_eq!(reduce(vec![5.0].into()), json!(5.0));
        assert_eq!(reduce(vec![7i64].into()), json!(7));
        assert_eq!(reduce(vec![f64::NAN].into()), json!("-"));
        assert_eq!(reduce(vec!["only".to_string()].into()), json!("only"));
    }

    #[test]
    fn test_empty_array_is_sentinel() {
        assert_eq!(reduce(RawValue::FloatArray(vec![])), json!("-"));
        assert_eq!(reduce(RawValue::IntArray(vec![])), json!("-"));
    }

    #[test]
    fn test_overflowing_mean_is_sentinel() {
        assert_eq!(reduce(vec![f64::MAX, f64::MAX].into()), json!("-"));
    }

    #[test]
    fn test_scalar_nan_and_inf() {
        assert_eq!(reduce(f64::NAN.into()), json!("-"));
        assert_eq!(reduce(f64::INFINITY.into()), json!("-"));
        assert_eq!(reduce(2.5.into()), json!(2.5));
    }

    #[test]
    fn test_bytes_decode() {
        assert_eq!(reduce(RawValue::from(&b"amps"[..])), json!("amps"));
    }

    #[test]
    fn test_stringified_bytes_marker() {
        assert_eq!(reduce("b'counts'".into()), json!("counts"));
        assert_eq!(reduce("b'".into()), json!(""));
        assert_eq!(reduce(RawValue::from(&b"b'mm'"[..])), json!("mm"));
        assert_eq!(reduce("bytes".into()), json!("bytes"));
    }

    #[test]
    fn test_text_array_not_reducible() {
        let raw: RawValue = vec!["a".to_string(), "b".to_string()].into();
        assert_eq!(
            coerce(&raw, false),
            Err(CoercionError::NonNumericArray { len: 2 })
        );
        assert_eq!(coerce(&raw, true).unwrap(), json!(["a", "b"]));
    }

    #[test]
    fn test_leave_as_array() {
        let coercer = ValueCoercer::preserving_arrays();
        assert_eq!(coercer.coerce(&vec![5.0].into()).unwrap(), json!([5.0]));
        assert_eq!(
            coercer.coerce(&vec![1.0, f64::NAN].into()).unwrap(),
            json!([1.0, "-"])
        );
        // scalar rules still apply
        assert_eq!(coercer.coerce(&f64::NAN.into()).unwrap(), json!("-"));
        assert_eq!(coercer.coerce(&"b'x'".into()).unwrap(), json!("x"));
    }

    #[test]
    fn test_native_scalars() {
        assert_eq!(reduce(RawValue::UInt(u64::MAX)), json!(u64::MAX));
        assert_eq!(reduce(RawValue::Int(-4)), json!(-4));
        assert_eq!(reduce(RawValue::Bool(true)), json!(true));
    }
}
