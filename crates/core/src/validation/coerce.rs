//! Numeric coercion shared by validation and schema projection.

use super::errors::ValidationError;
use crate::value::Value;

/// Read a value as a 64-bit float. Accepts integers, floats and
/// decimal-looking strings. NaN and infinities are rejected.
pub fn to_f64(field: &str, value: &Value) -> Result<f64, ValidationError> {
    let number = match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite()).ok_or_else(|| not_a_number(field, value))
}

/// Read a value as a non-negative length bound. Floats are truncated.
pub fn to_usize(field: &str, value: &Value) -> Result<usize, ValidationError> {
    match value {
        Value::Integer(i) => usize::try_from(*i).map_err(|_| not_a_number(field, value)),
        Value::Float(f) if f.is_finite() && *f >= 0.0 => Ok(f.trunc() as usize),
        Value::String(s) => s.trim().parse::<usize>().map_err(|_| not_a_number(field, value)),
        _ => Err(not_a_number(field, value)),
    }
}

fn not_a_number(field: &str, value: &Value) -> ValidationError {
    ValidationError::NotANumber { field: field.to_string(), actual: value.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Value::Integer(150), 150.0)]
    #[case(Value::Float(1.5), 1.5)]
    #[case(Value::from("150"), 150.0)]
    #[case(Value::from(" -2.25 "), -2.25)]
    fn test_to_f64_accepts(#[case] value: Value, #[case] expected: f64) {
        assert_eq!(to_f64("f", &value).unwrap(), expected);
    }

    #[rstest]
    #[case(Value::from("abc"))]
    #[case(Value::Bool(true))]
    #[case(Value::Null)]
    #[case(Value::List(vec![]))]
    #[case(Value::from("NaN"))]
    #[case(Value::from("nan"))]
    #[case(Value::from("inf"))]
    #[case(Value::from("-infinity"))]
    #[case(Value::Float(f64::NAN))]
    fn test_to_f64_rejects(#[case] value: Value) {
        let err = to_f64("age", &value).unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { ref field, .. } if field == "age"));
    }

    #[test]
    fn test_to_usize() {
        assert_eq!(to_usize("f", &Value::Integer(5)).unwrap(), 5);
        assert_eq!(to_usize("f", &Value::Float(5.9)).unwrap(), 5);
        assert_eq!(to_usize("f", &Value::from("12")).unwrap(), 12);
        assert!(to_usize("f", &Value::Integer(-1)).is_err());
        assert!(to_usize("f", &Value::from("1.5")).is_err());
    }
}
