//! tsp-serialization - schema-driven normalization of raw wire payloads.
//!
//! The trace server speaks JSON, and JSON alone cannot carry everything the
//! protocol needs: 64-bit timestamps arrive as decimal strings or as plain
//! numbers, and value arrays arrive untyped. This crate turns a decoded
//! [`serde_json::Value`] into an invariant-checked object, field by field,
//! according to a declarative per-model [`Schema`].
//!
//! The building blocks are [`Coercer`] values: [`assert_number`],
//! [`to_big_int`], [`array`], and [`record`]. A [`Normalizer`] binds a schema
//! to an object transform and is itself usable as a coercer, so one model's
//! schema can embed another model's normalizer.

mod coerce;
mod error;
mod normalize;
mod path;

pub use coerce::{array, assert_number, record, to_big_int, Coercer};
pub use error::ValidationError;
pub use normalize::{Normalizer, Schema};
pub use path::{Path, PathSegment};
