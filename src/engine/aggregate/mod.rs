//! Folds flat join results into nested parent/child records.
//!
//! A [`FieldSpecMap`] says which row columns stay on the parent and which
//! move into named nested groups. [`aggregate`] (or a [`Reducer`] holding
//! a grouping key and a spec) applies it to a row slice. Both are pure and
//! hold no shared state.

pub mod errors;
pub mod reducer;
pub mod spec;

pub use errors::AggregateError;
pub use reducer::{Reducer, aggregate};
pub use spec::{FieldSpec, FieldSpecMap, GroupShape, Identity, NestedGroup, Passthrough};

#[cfg(test)]
mod reducer_test;
