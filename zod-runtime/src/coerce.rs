//! Coercing constructors and the conversions behind them.
//!
//! ```rust
//! use zod_runtime::prelude::*;
//! use serde_json::json;
//!
//! assert_eq!(coerce::string().parse(&json!(42)).unwrap(), "42");
//! assert_eq!(coerce::number().parse(&json!(" 3.5 ")).unwrap(), 3.5);
//! assert_eq!(coerce::boolean().parse(&json!("")).unwrap(), false);
//! ```

use serde_json::{Number, Value};

use crate::kinds::boolean::ZodBool;
use crate::kinds::number::{ZodInt, ZodNumber};
use crate::kinds::string::ZodString;
use crate::traits::ZodTypeExt;

/// String schema that stringifies numbers and booleans.
pub fn string() -> ZodString {
    crate::string().coerce()
}

/// Number schema that parses numeric strings and maps booleans to 0/1.
pub fn number() -> ZodNumber {
    crate::number().coerce()
}

/// Integer schema with number coercion.
pub fn int() -> ZodInt {
    crate::int().coerce()
}

/// Boolean schema using truthiness.
pub fn boolean() -> ZodBool {
    crate::boolean().coerce()
}

/// Time schema that accepts epoch milliseconds.
#[cfg(feature = "chrono")]
pub fn time() -> crate::kinds::time::ZodTime {
    crate::time().coerce()
}

pub(crate) fn to_string_value(input: &Value) -> Option<Value> {
    match input {
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

pub(crate) fn to_number_value(input: &Value) -> Option<Value> {
    match input {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Some(Value::Number(Number::from(0)));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        }
        Value::Bool(b) => Some(Value::Number(Number::from(u8::from(*b)))),
        _ => None,
    }
}

/// Null never reaches coercion: the pipeline resolves it first.
pub(crate) fn to_bool_value(input: &Value) -> Option<Value> {
    let truthy = match input {
        Value::Bool(_) | Value::Null => return None,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };
    Some(Value::Bool(truthy))
}

#[cfg(feature = "chrono")]
pub(crate) fn to_time_value(input: &Value) -> Option<Value> {
    let millis = input.as_i64()?;
    chrono::DateTime::from_timestamp_millis(millis).map(|time| Value::String(time.to_rfc3339()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ZodType;
    use serde_json::json;

    #[test]
    fn test_number_coercion() {
        assert_eq!(to_number_value(&json!("12")), Some(json!(12.0)));
        assert_eq!(to_number_value(&json!("")), Some(json!(0)));
        assert_eq!(to_number_value(&json!(true)), Some(json!(1)));
        assert_eq!(to_number_value(&json!("abc")), None);
        assert_eq!(to_number_value(&json!(5)), None);
    }

    #[test]
    fn test_bool_coercion_is_truthiness() {
        assert_eq!(to_bool_value(&json!(0)), Some(json!(false)));
        assert_eq!(to_bool_value(&json!("no")), Some(json!(true)));
        assert_eq!(to_bool_value(&json!([])), Some(json!(true)));
        assert_eq!(to_bool_value(&json!(true)), None);
        assert_eq!(to_bool_value(&json!(null)), None);
    }

    #[test]
    fn test_coerced_boolean_leaves_null_to_modifiers() {
        assert!(boolean().parse(&json!(null)).is_err());
        assert_eq!(boolean().nilable().parse(&json!(null)).unwrap(), None);
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(to_string_value(&json!(1.5)), Some(json!("1.5")));
        assert_eq!(to_string_value(&json!(false)), Some(json!("false")));
        assert_eq!(to_string_value(&json!([1])), None);
    }

    #[test]
    fn test_coerced_constructors() {
        assert_eq!(string().parse(&json!(7)).unwrap(), "7");
        assert_eq!(int().parse(&json!("42")).unwrap(), 42);
        assert!(int().parse(&json!("4.2")).is_err());
        assert!(boolean().parse(&json!(1)).unwrap());
    }
}
