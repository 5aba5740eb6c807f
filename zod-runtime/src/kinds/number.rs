//! Number and integer schemas.

use serde_json::Value;
use std::ops::RangeInclusive;

use crate::check::Check;
use crate::coerce::to_number_value;
use crate::constraint::{Constraint, Required};
use crate::error::{create_invalid_type_issue, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::traits::ZodTypeExt;
use crate::types::TypeCode;

const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;
const SAFE_INTEGERS: RangeInclusive<i64> = -MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER;

/// Finite floating-point numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberKind;

impl SchemaKind for NumberKind {
    type Base = f64;
    const TYPE_CODE: TypeCode = TypeCode::Number;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<f64>,
        _ctx: &ParseContext,
    ) -> Result<f64, Vec<RawIssue>> {
        match input.as_f64() {
            Some(n) if n.is_finite() => Ok(n),
            _ => Err(vec![create_invalid_type_issue(TypeCode::Number, input)]),
        }
    }

    fn coerce(&self, input: &Value) -> Option<Value> {
        to_number_value(input)
    }
}

/// Safe integers. Floats without a fractional part are accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntKind;

impl SchemaKind for IntKind {
    type Base = i64;
    const TYPE_CODE: TypeCode = TypeCode::Int;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<i64>,
        _ctx: &ParseContext,
    ) -> Result<i64, Vec<RawIssue>> {
        let Value::Number(n) = input else {
            return Err(vec![create_invalid_type_issue(TypeCode::Int, input)]);
        };
        let integer = match n.as_i64() {
            Some(i) => Some(i),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER as f64)
                .map(|f| f as i64),
        };
        match integer {
            Some(i) if SAFE_INTEGERS.contains(&i) => Ok(i),
            _ => Err(vec![create_invalid_type_issue(TypeCode::Int, input)]),
        }
    }

    fn coerce(&self, input: &Value) -> Option<Value> {
        to_number_value(input)
    }
}

pub type ZodNumber<C = Required> = Schema<NumberKind, C>;
pub type ZodInt<C = Required> = Schema<IntKind, C>;

pub fn number() -> ZodNumber {
    Schema::new(NumberKind)
}

pub fn number_with(params: impl Into<SchemaParams>) -> ZodNumber {
    Schema::with_params(NumberKind, params)
}

pub fn int() -> ZodInt {
    Schema::new(IntKind)
}

pub fn int_with(params: impl Into<SchemaParams>) -> ZodInt {
    Schema::with_params(IntKind, params)
}

impl<C: Constraint> Schema<NumberKind, C> {
    /// Alias of `gte`.
    pub fn min(&self, minimum: f64, params: impl Into<SchemaParams>) -> Self {
        self.gte(minimum, params)
    }

    /// Alias of `lte`.
    pub fn max(&self, maximum: f64, params: impl Into<SchemaParams>) -> Self {
        self.lte(maximum, params)
    }

    /// Reject numbers with a fractional part.
    pub fn int(&self, params: impl Into<SchemaParams>) -> Self {
        self.add_check(Check::integer(params))
    }
}

impl<C: Constraint> Schema<IntKind, C> {
    pub fn min(&self, minimum: i64, params: impl Into<SchemaParams>) -> Self {
        self.gte(minimum, params)
    }

    pub fn max(&self, maximum: i64, params: impl Into<SchemaParams>) -> Self {
        self.lte(maximum, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IssueCode, IssueKind};
    use crate::traits::ZodType;
    use serde_json::json;

    #[test]
    fn test_number_accepts_ints_and_floats() {
        assert_eq!(number().parse(&json!(3)).unwrap(), 3.0);
        assert_eq!(number().parse(&json!(-0.5)).unwrap(), -0.5);
        assert!(number().parse(&json!("3")).is_err());
    }

    #[test]
    fn test_number_range_messages() {
        let schema = number().gt(0.0, ()).lte(10.0, ());
        let err = schema.parse(&json!(0)).unwrap_err();
        assert_eq!(err.issues()[0].message, "Too small: expected number to be >0");
        let err = schema.parse(&json!(11)).unwrap_err();
        assert_eq!(err.issues()[0].message, "Too big: expected number to be <=10");
    }

    #[test]
    fn test_sign_helpers() {
        assert!(number().positive(()).parse(&json!(0)).is_err());
        assert!(number().nonnegative(()).parse(&json!(0)).is_ok());
        assert!(int().negative(()).parse(&json!(-1)).is_ok());
        assert!(int().nonpositive(()).parse(&json!(1)).is_err());
    }

    #[test]
    fn test_int_accepts_integral_floats() {
        assert_eq!(int().parse(&json!(4.0)).unwrap(), 4);
        let err = int().parse(&json!(4.5)).unwrap_err();
        match &err.issues()[0].kind {
            IssueKind::InvalidType { expected, .. } => assert_eq!(*expected, TypeCode::Int),
            other => panic!("unexpected kind {:?}", other),
        }
        assert!(int().parse(&json!(9_007_199_254_740_993_i64)).is_err());
    }

    #[test]
    fn test_int_rejects_extreme_integers() {
        for extreme in ["-9223372036854775808", "9223372036854775807", "18446744073709551615"] {
            let input: Value = serde_json::from_str(extreme).unwrap();
            let err = int().parse(&input).unwrap_err();
            assert_eq!(err.issues()[0].code(), IssueCode::InvalidType);
        }
        assert_eq!(int().parse(&json!(-9_007_199_254_740_991_i64)).unwrap(), -9_007_199_254_740_991);
    }

    #[test]
    fn test_multiple_of() {
        let schema = int().multiple_of(5, ());
        assert!(schema.parse(&json!(15)).is_ok());
        let err = schema.parse(&json!(7)).unwrap_err();
        assert_eq!(err.issues()[0].code(), IssueCode::NotMultipleOf);
        assert_eq!(err.issues()[0].message, "Invalid number: must be a multiple of 5");
    }

    #[test]
    fn test_number_int_check() {
        let schema = number().int(());
        assert!(schema.parse(&json!(2.0)).is_ok());
        assert_eq!(
            schema.parse(&json!(2.5)).unwrap_err().issues()[0].message,
            "Invalid input: expected int, received number"
        );
    }
}
