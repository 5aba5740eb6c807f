//! Test module for zod-runtime
//!
//! This module contains property-based tests using proptest
//! to validate correctness properties of the parse pipeline.

#[cfg(test)]
pub mod pipeline_tests;

#[cfg(test)]
pub mod path_tests;

#[cfg(test)]
pub mod composition_tests;
