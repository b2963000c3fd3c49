//! tsp-models - typed domain models for trace server responses.
//!
//! Each model ships with a normalizer built from the coercion primitives in
//! [`tsp_serialization`]: the raw decoded payload goes through the normalizer
//! first, then reads cleanly as a typed struct.

mod xy;

pub use xy::{xy_model_normalizer, xy_series_normalizer, XyAxis, XyModel, XySeries};
