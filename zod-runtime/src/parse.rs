//! The parse pipeline.
//!
//! [`parse_schema`] is the driver every schema goes through, whether it is
//! parsed at the top level or as a child of an object, array, union, or
//! transform. For one input it:
//!
//! 1. handles null and absent input (default, nilable, prefault, optional,
//!    exact-optional, null forwarding);
//! 2. coerces the input when the schema asks for it;
//! 3. extracts the base value, failing with the extractor's issues;
//! 4. runs the schema's checks;
//! 5. wraps the value in the schema's output constraint.
//!
//! Issues leave the driver with paths relative to the schema. Parents
//! prefix their own segment, and the top-level entry points finalize
//! messages into a [`ZodError`].

use serde_json::Value;
use std::fmt;
use tracing::{debug, trace};

use crate::check::{run_checks, ParsePayload};
use crate::config::{global_config, ErrorMap, ErrorMapper};
use crate::constraint::Constraint;
use crate::error::{
    create_invalid_type_issue, create_missing_issue, dotted_path, RawIssue, ZodError,
};
use crate::traits::{Output, ZodType};

/// Per-call parse options.
#[derive(Clone, Default)]
pub struct ParseContext {
    /// Mapper consulted after issue and schema mappers.
    pub error: Option<ErrorMap>,
}

impl fmt::Debug for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseContext")
            .field("error", &self.error.is_some())
            .finish()
    }
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a closure as the context mapper.
    pub fn with_error<F>(mut self, mapper: F) -> Self
    where
        F: Fn(&RawIssue) -> Option<String> + Send + Sync + 'static,
    {
        self.error = Some(std::sync::Arc::new(mapper));
        self
    }

    /// Use any [`ErrorMapper`] as the context mapper.
    pub fn with_error_mapper<M: ErrorMapper + 'static>(mut self, mapper: M) -> Self {
        self.error = Some(std::sync::Arc::new(mapper));
        self
    }
}

static NULL: Value = Value::Null;

/// Parse one input through a schema.
///
/// `input` is `None` when the value is absent (a missing object key or
/// tuple slot). `Ok(None)` means the value should be omitted from the
/// parent; it is only returned for absent input.
pub fn parse_schema<S: ZodType>(
    schema: &S,
    input: Option<&Value>,
    ctx: &ParseContext,
) -> Result<Option<Output<S>>, Vec<RawIssue>> {
    let internals = schema.internals();
    let flags = internals.flags;
    let type_code = internals.type_code;

    let substituted: Value;
    let mut current: &Value = match input {
        Some(value) if !value.is_null() => value,
        other => {
            let absent = other.is_none();

            if let Some(default) = internals.default_value() {
                trace!(%type_code, absent, "Using default value");
                return Ok(Some(<S::Constraint as Constraint>::adapt(default.resolve())));
            }

            if !absent && flags.nilable {
                if let Some(null) = <S::Constraint as Constraint>::null::<S::Base>() {
                    return Ok(Some(null));
                }
            }

            if let Some(prefault) = internals.prefault_value() {
                trace!(%type_code, absent, "Substituting prefault value");
                substituted = prefault.resolve();
                &substituted
            } else {
                if absent && (flags.optional || flags.exact_optional) {
                    return Ok(None);
                }
                if flags.optional || flags.nilable {
                    if let Some(null) = <S::Constraint as Constraint>::null::<S::Base>() {
                        return Ok(Some(null));
                    }
                }
                if !schema.forwards_null() {
                    let issue = if absent {
                        create_missing_issue(type_code)
                    } else {
                        create_invalid_type_issue(type_code, &NULL)
                    };
                    return Err(vec![issue.claim(internals.error(), true)]);
                }
                if absent {
                    let extracted = schema
                        .extract_absent(ctx)
                        .map_err(|issues| claim_extracted(issues, internals.error()))?;
                    return match extracted {
                        Some(base) => finish(schema, base),
                        None => Ok(None),
                    };
                }
                &NULL
            }
        }
    };

    let coerced: Value;
    if flags.coerce {
        if let Some(value) = schema.coerce_input(current) {
            trace!(%type_code, "Coerced input");
            coerced = value;
            current = &coerced;
        }
    }

    let base = schema
        .extract(current, ctx)
        .map_err(|issues| claim_extracted(issues, internals.error()))?;
    finish(schema, base)
}

/// Extractor issues are fatal and fall back to the schema's mapper.
fn claim_extracted(issues: Vec<RawIssue>, schema_error: Option<&ErrorMap>) -> Vec<RawIssue> {
    issues
        .into_iter()
        .map(|issue| issue.claim(schema_error, true))
        .collect()
}

/// Run the checks on an extracted value and adapt it to the output constraint.
fn finish<S: ZodType>(schema: &S, base: S::Base) -> Result<Option<Output<S>>, Vec<RawIssue>> {
    let checks = schema.internals().checks();
    if checks.is_empty() {
        return Ok(Some(<S::Constraint as Constraint>::adapt(base)));
    }

    let mut payload = ParsePayload::new(base);
    run_checks(&mut payload, checks);
    let (value, issues) = payload.into_parts();
    if !issues.is_empty() {
        trace!(type_code = %schema.type_code(), issue_count = issues.len(), "Checks failed");
        return Err(issues
            .into_iter()
            .map(|issue| issue.claim(None, false))
            .collect());
    }

    Ok(Some(<S::Constraint as Constraint>::adapt(value)))
}

/// Top-level parse: finalize issues into a [`ZodError`].
pub fn parse_value<S: ZodType>(
    schema: &S,
    input: &Value,
    ctx: &ParseContext,
) -> Result<Output<S>, ZodError> {
    trace!(type_code = %schema.type_code(), "Parsing input");
    match parse_schema(schema, Some(input), ctx) {
        Ok(Some(output)) => Ok(output),
        Ok(None) => Err(fail(
            vec![create_invalid_type_issue(schema.type_code(), input)],
            ctx,
        )),
        Err(issues) => Err(fail(issues, ctx)),
    }
}

/// Run only the checks of a schema against an already typed value.
///
/// A null output of a nullable schema is re-parsed as explicit null so that
/// nilable and default handling still apply.
pub fn strict_parse<S: ZodType>(
    schema: &S,
    input: Output<S>,
    ctx: &ParseContext,
) -> Result<Output<S>, ZodError> {
    let Some(base) = <S::Constraint as Constraint>::into_base(input) else {
        return parse_value(schema, &NULL, ctx);
    };

    let mut payload = ParsePayload::new(base);
    run_checks(&mut payload, schema.internals().checks());
    let (value, issues) = payload.into_parts();
    if issues.is_empty() {
        Ok(<S::Constraint as Constraint>::adapt(value))
    } else {
        Err(fail(issues, ctx))
    }
}

fn fail(issues: Vec<RawIssue>, ctx: &ParseContext) -> ZodError {
    let error = ZodError::from_raw(issues, ctx, &global_config());
    let paths: Vec<String> = error
        .issues()
        .iter()
        .map(|issue| dotted_path(&issue.path))
        .collect();
    debug!(issue_count = error.issues().len(), paths = ?paths, "Parse failed");
    error
}
