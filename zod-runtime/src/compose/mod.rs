//! Schemas built from other schemas: transforms, pipes, unions, and
//! intersections.

pub mod intersection;
pub mod pipe;
pub mod transform;
pub mod union;

pub use intersection::{intersection, intersection_with, IntersectionKind, ZodIntersection};
pub use pipe::{pipe, ZodPipe};
pub use transform::{RefinementCtx, ZodTransform};
pub use union::{
    discriminated_union, discriminated_union_with, union, union_with, UnionKind, ZodUnion,
};
