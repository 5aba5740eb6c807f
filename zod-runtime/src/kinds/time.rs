//! Time schemas over `chrono::DateTime<FixedOffset>`.
//!
//! Input is an RFC 3339 string. With coercion enabled, integers are read as
//! milliseconds since the Unix epoch.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::coerce::to_time_value;
use crate::constraint::{Constraint, Required};
use crate::error::{create_invalid_type_issue, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::kinds::{Schema, SchemaKind};
use crate::params::SchemaParams;
use crate::parse::ParseContext;
use crate::types::TypeCode;

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeKind;

impl SchemaKind for TimeKind {
    type Base = DateTime<FixedOffset>;
    const TYPE_CODE: TypeCode = TypeCode::Time;

    fn extract(
        &self,
        input: &Value,
        _internals: &ZodTypeInternals<DateTime<FixedOffset>>,
        _ctx: &ParseContext,
    ) -> Result<DateTime<FixedOffset>, Vec<RawIssue>> {
        input
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .ok_or_else(|| vec![create_invalid_type_issue(TypeCode::Time, input)])
    }

    fn coerce(&self, input: &Value) -> Option<Value> {
        to_time_value(input)
    }
}

pub type ZodTime<C = Required> = Schema<TimeKind, C>;

pub fn time() -> ZodTime {
    Schema::new(TimeKind)
}

pub fn time_with(params: impl Into<SchemaParams>) -> ZodTime {
    Schema::with_params(TimeKind, params)
}

impl<C: Constraint> Schema<TimeKind, C> {
    /// Not before `minimum`.
    pub fn min(&self, minimum: DateTime<FixedOffset>, params: impl Into<SchemaParams>) -> Self {
        self.gte(minimum, params)
    }

    /// Not after `maximum`.
    pub fn max(&self, maximum: DateTime<FixedOffset>, params: impl Into<SchemaParams>) -> Self {
        self.lte(maximum, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueCode;
    use crate::traits::{ZodType, ZodTypeExt};
    use serde_json::json;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_parses_rfc3339() {
        let parsed = time().parse(&json!("2024-03-01T12:00:00+02:00")).unwrap();
        assert_eq!(parsed, at("2024-03-01T10:00:00Z"));
        assert_eq!(parsed.offset().local_minus_utc(), 7200);
        assert!(time().parse(&json!("yesterday")).is_err());
        assert_eq!(
            time().parse(&json!(1)).unwrap_err().issues()[0].message,
            "Invalid input: expected date, received number"
        );
    }

    #[test]
    fn test_range() {
        let schema = time()
            .min(at("2024-01-01T00:00:00Z"), ())
            .max(at("2024-12-31T23:59:59Z"), ());
        assert!(schema.parse(&json!("2024-06-01T00:00:00Z")).is_ok());
        let err = schema.parse(&json!("2023-06-01T00:00:00Z")).unwrap_err();
        assert_eq!(err.issues()[0].code(), IssueCode::TooSmall);
    }

    #[test]
    fn test_coerce_from_millis() {
        let parsed = time().coerce().parse(&json!(0)).unwrap();
        assert_eq!(parsed, at("1970-01-01T00:00:00Z"));
    }
}
