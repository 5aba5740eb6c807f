//! Output constraints.
//!
//! Every schema has a base type (what extraction produces) and a constraint
//! that decides the shape of its output. [`Required`] outputs the base value
//! itself, [`Nullable`] outputs `Option<T>` so that null and absent inputs
//! have a representation. Modifiers such as `optional()` or `non_optional()`
//! switch the constraint by rebuilding the schema with a new type parameter.

use serde::Serialize;
use serde_json::Value;

/// Values a schema can produce.
pub trait BaseValue: Clone + Serialize + Send + Sync + 'static {}

impl<T> BaseValue for T where T: Clone + Serialize + Send + Sync + 'static {}

/// Maps a base type to a schema's output type.
pub trait Constraint: Copy + Default + Send + Sync + 'static {
    /// The output type for base `T`.
    type Output<T: BaseValue>: BaseValue;

    /// Whether the output can represent null.
    const NULLABLE: bool;

    /// Wrap a parsed base value.
    fn adapt<T: BaseValue>(base: T) -> Self::Output<T>;

    /// The null output, if this constraint has one.
    fn null<T: BaseValue>() -> Option<Self::Output<T>>;

    /// Unwrap an output back into its base value. `None` for a null output.
    fn into_base<T: BaseValue>(output: Self::Output<T>) -> Option<T>;
}

/// Output is the base value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Required;

/// Output is `Option` of the base value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nullable;

impl Constraint for Required {
    type Output<T: BaseValue> = T;
    const NULLABLE: bool = false;

    fn adapt<T: BaseValue>(base: T) -> T {
        base
    }

    fn null<T: BaseValue>() -> Option<T> {
        None
    }

    fn into_base<T: BaseValue>(output: T) -> Option<T> {
        Some(output)
    }
}

impl Constraint for Nullable {
    type Output<T: BaseValue> = Option<T>;
    const NULLABLE: bool = true;

    fn adapt<T: BaseValue>(base: T) -> Option<T> {
        Some(base)
    }

    fn null<T: BaseValue>() -> Option<Option<T>> {
        Some(None)
    }

    fn into_base<T: BaseValue>(output: Option<T>) -> Option<T> {
        output
    }
}

/// JSON form of a value. Serialization failures map to null.
pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_is_identity() {
        assert_eq!(Required::adapt(5_i64), 5);
        assert_eq!(Required::null::<i64>(), None);
        assert_eq!(Required::into_base(5_i64), Some(5));
    }

    #[test]
    fn test_nullable_wraps() {
        assert_eq!(Nullable::adapt("x".to_string()), Some("x".to_string()));
        assert_eq!(Nullable::null::<bool>(), Some(None));
        assert_eq!(Nullable::into_base::<bool>(None), None);
    }
}
