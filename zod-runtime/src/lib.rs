//! # zod-runtime
//!
//! Runtime schema validation and parsing with the feature surface of
//! [Zod](https://zod.dev/) v4.
//!
//! Build a schema from constructors and modifiers, then parse untrusted
//! [`serde_json::Value`] input into typed output or a [`ZodError`] listing
//! every issue with its path.
//!
//! ## Quick Start
//!
//! ```rust
//! use zod_runtime::prelude::*;
//! use serde_json::json;
//!
//! let signup = object([
//!     ("email", string().email(()).into_dyn()),
//!     ("password", string().min(8, "Use at least 8 characters").into_dyn()),
//!     ("newsletter", string_bool().default(false).into_dyn()),
//! ]);
//!
//! let parsed = signup
//!     .parse(&json!({"email": "ada@example.com", "password": "correct horse"}))
//!     .unwrap();
//! assert_eq!(parsed["newsletter"], json!(false));
//!
//! let err = signup
//!     .parse(&json!({"email": "ada", "password": "short"}))
//!     .unwrap_err();
//! assert_eq!(err.issues().len(), 2);
//! assert_eq!(err.issues()[1].message, "Use at least 8 characters");
//! ```
//!
//! ## Features
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `chrono` | `time()` schemas over `chrono::DateTime` | ✅ |
//! | `uuid` | `uuid()` format check backed by the `uuid` parser | ✅ |
//!
//! ## Schemas
//!
//! | Constructor | Output |
//! |-------------|--------|
//! | [`string()`] | `String` |
//! | [`number()`] | `f64` |
//! | [`int()`] | `i64` |
//! | [`boolean()`] | `bool` |
//! | `time()` | `DateTime<FixedOffset>` |
//! | [`literal()`], [`literals()`] | `Value` |
//! | [`enumeration()`] | `String` |
//! | [`string_bool()`] | `bool` |
//! | [`never()`], [`unknown()`] | `Value` |
//! | [`object()`] | `Map<String, Value>` |
//! | [`array()`] | `Vec<Output<S>>` |
//! | [`tuple()`] | `Vec<Value>` |
//! | [`union()`], [`discriminated_union()`], [`intersection()`] | `Value` |
//!
//! `optional()`, `nilable()`, and `nullish()` switch the output to
//! `Option<T>`; `non_optional()` switches it back.
//!
//! ## Errors
//!
//! Messages resolve through a chain of mappers: the check or schema that
//! raised the issue, the [`ParseContext`], the global config installed with
//! [`config()`], and finally built-in English messages.
//!
//! ```rust
//! use zod_runtime::prelude::*;
//! use serde_json::json;
//!
//! let ctx = ParseContext::new().with_error(|issue| match issue.code() {
//!     IssueCode::TooSmall => Some("Too short".to_string()),
//!     _ => None,
//! });
//! let err = string().min(3, ()).parse_with(&json!("ab"), &ctx).unwrap_err();
//! assert_eq!(err.to_string(), "✖ Too short");
//! ```

pub mod check;
pub mod coerce;
pub mod compose;
pub mod config;
pub mod constraint;
pub mod error;
pub mod internals;
pub mod kinds;
pub mod locale;
pub mod params;
pub mod parse;
pub mod registry;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

pub use check::{apply_checks, Check, CheckDef, ParsePayload};
pub use compose::{
    discriminated_union, discriminated_union_with, intersection, intersection_with, pipe, union,
    union_with, RefinementCtx, ZodIntersection, ZodPipe, ZodTransform, ZodUnion,
};
pub use config::{
    config, error_map, global_config, message_map, replace_config, reset_config, ChainedMapper,
    CodeMessages, ErrorMap, ErrorMapper, ZodConfig,
};
pub use constraint::{BaseValue, Constraint, Nullable, Required};
pub use error::{
    create_invalid_type_issue, create_invalid_value_issue, create_missing_issue, finalize, is_error,
    FlattenedError, Issue, IssueCode, IssueKind, PathSegment, RawIssue, ZodError,
};
pub use internals::{SchemaId, ValueSet, ZodTypeInternals};
pub use kinds::array::{array, array_with, ZodArray};
pub use kinds::boolean::{boolean, boolean_with, ZodBool};
pub use kinds::enumeration::{enumeration, enumeration_with, ZodEnum};
pub use kinds::literal::{literal, literals, literals_with, ZodLiteral};
pub use kinds::never::{never, never_with, ZodNever};
pub use kinds::number::{int, int_with, number, number_with, ZodInt, ZodNumber};
pub use kinds::object::{
    loose_object, object, object_with, strict_object, UnknownKeys, ZodObject,
};
pub use kinds::string::{string, string_with, ZodString};
pub use kinds::string_bool::{string_bool, string_bool_with, Case, StringBoolOptions, ZodStringBool};
#[cfg(feature = "chrono")]
pub use kinds::time::{time, time_with, ZodTime};
pub use kinds::tuple::{tuple, tuple_with, ZodTuple};
pub use kinds::unknown::{unknown, ZodUnknown};
pub use kinds::{Schema, SchemaKind};
pub use params::{normalize_params, NormalizedParams, Params, SchemaParams};
pub use parse::ParseContext;
pub use registry::{global_registry, Registry};
pub use traits::{DynSchema, Output, ZodType, ZodTypeExt};
pub use types::{GlobalMeta, TypeCode};

/// Everything needed to build and parse schemas.
///
/// ```rust
/// use zod_runtime::prelude::*;
/// ```
pub mod prelude {
    pub use crate::coerce;
    pub use crate::{
        array, boolean, discriminated_union, enumeration, int, intersection, literal, literals,
        loose_object, never, number, object, pipe, strict_object, string, string_bool,
        string_bool_with, string_with, tuple, union, unknown,
    };
    pub use crate::{
        config, global_registry, reset_config, Case, DynSchema, GlobalMeta, Issue, IssueCode,
        IssueKind, Output, Params, ParseContext, PathSegment, RawIssue, SchemaParams,
        StringBoolOptions, TypeCode, ZodConfig, ZodError, ZodType, ZodTypeExt,
    };

    #[cfg(feature = "chrono")]
    pub use crate::time;
}
