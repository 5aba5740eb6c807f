//! Pipes: the output of one schema parsed by another.

use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

use crate::constraint::{to_json, Constraint, Required};
use crate::error::{create_invalid_type_issue, RawIssue};
use crate::internals::ZodTypeInternals;
use crate::parse::{parse_schema, ParseContext};
use crate::traits::{Output, ZodType};
use crate::types::TypeCode;

/// Schema that parses with `A`, then parses `A`'s output (as JSON) with `B`.
pub struct ZodPipe<A: ZodType, B: ZodType, C: Constraint = Required> {
    source: A,
    target: B,
    internals: ZodTypeInternals<Output<B>>,
    _constraint: PhantomData<C>,
}

impl<A: ZodType, B: ZodType> ZodPipe<A, B> {
    pub fn new(source: A, target: B) -> Self {
        Self {
            source,
            target,
            internals: ZodTypeInternals::new(TypeCode::Pipe),
            _constraint: PhantomData,
        }
    }
}

/// Pipe `source` into `target`.
pub fn pipe<A: ZodType, B: ZodType>(source: A, target: B) -> ZodPipe<A, B> {
    ZodPipe::new(source, target)
}

impl<A: ZodType, B: ZodType, C: Constraint> ZodPipe<A, B, C> {
    pub fn source(&self) -> &A {
        &self.source
    }

    pub fn target(&self) -> &B {
        &self.target
    }
}

impl<A: ZodType, B: ZodType, C: Constraint> Clone for ZodPipe<A, B, C> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            target: self.target.clone(),
            internals: self.internals.clone(),
            _constraint: PhantomData,
        }
    }
}

impl<A: ZodType, B: ZodType, C: Constraint> fmt::Debug for ZodPipe<A, B, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZodPipe")
            .field("source", &self.source.type_code())
            .field("target", &self.target.type_code())
            .field("internals", &self.internals)
            .finish()
    }
}

impl<A: ZodType, B: ZodType, C: Constraint> ZodType for ZodPipe<A, B, C> {
    type Base = Output<B>;
    type Constraint = C;
    type Retyped<C2: Constraint> = ZodPipe<A, B, C2>;

    fn internals(&self) -> &ZodTypeInternals<Output<B>> {
        &self.internals
    }

    fn with_internals(&self, internals: ZodTypeInternals<Output<B>>) -> Self {
        self.rebuild::<C>(internals)
    }

    fn rebuild<C2: Constraint>(&self, internals: ZodTypeInternals<Output<B>>) -> ZodPipe<A, B, C2> {
        ZodPipe {
            source: self.source.clone(),
            target: self.target.clone(),
            internals,
            _constraint: PhantomData,
        }
    }

    fn extract(&self, input: &Value, ctx: &ParseContext) -> Result<Output<B>, Vec<RawIssue>> {
        let Some(intermediate) = parse_schema(&self.source, Some(input), ctx)? else {
            return Err(vec![create_invalid_type_issue(self.source.type_code(), input)]);
        };
        let intermediate = to_json(&intermediate);
        match parse_schema(&self.target, Some(&intermediate), ctx)? {
            Some(output) => Ok(output),
            None => Err(vec![create_invalid_type_issue(
                self.target.type_code(),
                &intermediate,
            )]),
        }
    }

    fn forwards_null(&self) -> bool {
        true
    }
}
