//! Field-level coercion primitives.
//!
//! A [`Coercer`] validates one raw value and produces its typed form. The
//! primitives here are the building blocks every model schema is written in:
//! [`assert_number`] for values that must already be numeric, [`to_big_int`]
//! for 64-bit wire integers, and the higher-order [`array`] and [`record`]
//! for sequences and string-keyed maps of coerced values.

use crate::error::ValidationError;
use crate::path::Path;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Largest f64 magnitude whose integer neighbours are all exactly
/// representable (2^53 - 1). Integer-valued floats beyond this cannot be
/// trusted to name one specific integer.
const MAX_SAFE_FLOAT_INT: f64 = 9_007_199_254_740_991.0;

type CoerceFn =
    dyn Fn(Option<&Value>, &Path) -> Result<Option<Value>, ValidationError> + Send + Sync;

/// A field-level coercion: validates one raw value and produces its typed
/// form, failing on mismatch.
///
/// `None` input means the field is absent from the payload; `Ok(None)` output
/// keeps it absent. Coercers are plain closure values, cheap to clone, and a
/// [`crate::Normalizer`] can be wrapped into one for recursive composition.
#[derive(Clone)]
pub struct Coercer(Arc<CoerceFn>);

impl Coercer {
    pub fn new(
        f: impl Fn(Option<&Value>, &Path) -> Result<Option<Value>, ValidationError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self(Arc::new(f))
    }

    /// Applies the coercion to one raw value at the given path.
    pub fn apply(
        &self,
        value: Option<&Value>,
        path: &Path,
    ) -> Result<Option<Value>, ValidationError> {
        (self.0)(value, path)
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Coercer(..)")
    }
}

/// Strict numeric assertion: the raw value must already be a JSON number.
///
/// Numeric-looking strings are rejected; string-to-number parsing is the
/// wire decoder's job, not this layer's. Absent input is an error.
pub fn assert_number() -> Coercer {
    Coercer::new(|value, path| match value {
        Some(v @ Value::Number(_)) => Ok(Some(v.clone())),
        Some(other) => Err(ValidationError::mismatch(path, "number", other)),
        None => Err(ValidationError::missing(path, "number")),
    })
}

/// Exact integer coercion for 64-bit wire values.
///
/// The server serializes nanosecond timestamps either as plain numbers or as
/// decimal strings; both forms must come out as an exact JSON integer, never
/// rounded through `f64`. Absent input is an error.
pub fn to_big_int() -> Coercer {
    Coercer::new(|value, path| match value {
        Some(v) => big_int_value(v, path).map(Some),
        None => Err(ValidationError::missing(path, "integer")),
    })
}

fn big_int_value(value: &Value, path: &Path) -> Result<Value, ValidationError> {
    let wide: i128 = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i128::from(i)
            } else if let Some(u) = n.as_u64() {
                i128::from(u)
            } else {
                // Stored as f64. Accept only exact integer values within the
                // safe range.
                let f = n.as_f64().unwrap_or(f64::NAN);
                if !f.is_finite() || f.fract() != 0.0 || f.abs() > MAX_SAFE_FLOAT_INT {
                    return Err(ValidationError::mismatch(path, "integer", value));
                }
                f as i128
            }
        }
        Value::String(s) => s
            .parse::<i128>()
            .map_err(|_| ValidationError::mismatch(path, "integer string", value))?,
        other => return Err(ValidationError::mismatch(path, "integer", other)),
    };
    exact_integer(wide, path, value)
}

/// Re-encodes a checked integer as a JSON number, which holds the full
/// i64/u64 range exactly.
fn exact_integer(wide: i128, path: &Path, raw: &Value) -> Result<Value, ValidationError> {
    if let Ok(i) = i64::try_from(wide) {
        Ok(Value::from(i))
    } else if let Ok(u) = u64::try_from(wide) {
        Ok(Value::from(u))
    } else {
        Err(ValidationError::mismatch(path, "64-bit integer", raw))
    }
}

/// Sequence coercion: applies `element` to every member, in order, failing
/// fast on the first element error. Produces a new array; the input is not
/// mutated.
///
/// Absent input stays absent, which is how optional array fields are
/// expressed without a separate combinator.
pub fn array(element: Coercer) -> Coercer {
    Coercer::new(move |value, path| match value {
        None => Ok(None),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_path = path.push_index(index);
                match element.apply(Some(item), &item_path)? {
                    Some(coerced) => out.push(coerced),
                    // A present element may not vanish.
                    None => {
                        return Err(ValidationError::mismatch(&item_path, "present element", item))
                    }
                }
            }
            Ok(Some(Value::Array(out)))
        }
        Some(other) => Err(ValidationError::mismatch(path, "array", other)),
    })
}

/// Map counterpart of [`array`] for string-keyed JSON objects: coerces every
/// member value with the key appended to the path, fail-fast, preserving
/// member order. Absent input stays absent.
pub fn record(element: Coercer) -> Coercer {
    Coercer::new(move |value, path| match value {
        None => Ok(None),
        Some(Value::Object(members)) => {
            let mut out = Map::with_capacity(members.len());
            for (key, member) in members {
                let member_path = path.push_key(key);
                match element.apply(Some(member), &member_path)? {
                    Some(coerced) => {
                        out.insert(key.clone(), coerced);
                    }
                    None => {
                        return Err(ValidationError::mismatch(
                            &member_path,
                            "present member",
                            member,
                        ))
                    }
                }
            }
            Ok(Some(Value::Object(out)))
        }
        Some(other) => Err(ValidationError::mismatch(path, "object", other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSegment;
    use serde_json::json;

    fn apply(coercer: &Coercer, value: Value) -> Result<Option<Value>, ValidationError> {
        coercer.apply(Some(&value), &Path::root())
    }

    // -- assert_number --

    #[test]
    fn assert_number_passes_numbers_through_unchanged() {
        assert_eq!(apply(&assert_number(), json!(5)), Ok(Some(json!(5))));
        assert_eq!(apply(&assert_number(), json!(1.5)), Ok(Some(json!(1.5))));
        assert_eq!(apply(&assert_number(), json!(-0.0)), Ok(Some(json!(-0.0))));
    }

    #[test]
    fn assert_number_rejects_numeric_strings() {
        let err = apply(&assert_number(), json!("5")).unwrap_err();
        assert_eq!(err.expected, "number");
        assert_eq!(err.actual, "string \"5\"");
    }

    #[test]
    fn assert_number_rejects_null_bool_array_object() {
        for raw in [json!(null), json!(true), json!([1]), json!({})] {
            assert!(apply(&assert_number(), raw).is_err());
        }
    }

    #[test]
    fn assert_number_requires_presence() {
        let err = assert_number().apply(None, &Path::root()).unwrap_err();
        assert_eq!(err.actual, "absent");
    }

    // -- to_big_int --

    #[test]
    fn to_big_int_accepts_integer_numbers() {
        assert_eq!(apply(&to_big_int(), json!(10)), Ok(Some(json!(10))));
        assert_eq!(apply(&to_big_int(), json!(-3)), Ok(Some(json!(-3))));
        assert_eq!(apply(&to_big_int(), json!(0)), Ok(Some(json!(0))));
    }

    #[test]
    fn to_big_int_parses_decimal_strings_exactly() {
        // Above 2^53: an f64 round trip would land on ...992.
        assert_eq!(
            apply(&to_big_int(), json!("9007199254740993")),
            Ok(Some(json!(9007199254740993i64)))
        );
        assert_eq!(
            apply(&to_big_int(), json!("-1500000000000000000")),
            Ok(Some(json!(-1500000000000000000i64)))
        );
    }

    #[test]
    fn to_big_int_accepts_full_u64_range() {
        assert_eq!(
            apply(&to_big_int(), json!(u64::MAX)),
            Ok(Some(json!(u64::MAX)))
        );
        assert_eq!(
            apply(&to_big_int(), json!(u64::MAX.to_string())),
            Ok(Some(json!(u64::MAX)))
        );
    }

    #[test]
    fn to_big_int_accepts_integer_valued_floats_in_safe_range() {
        assert_eq!(apply(&to_big_int(), json!(10.0)), Ok(Some(json!(10))));
    }

    #[test]
    fn to_big_int_rejects_fractional_numbers() {
        assert!(apply(&to_big_int(), json!(1.5)).is_err());
    }

    #[test]
    fn to_big_int_rejects_unsafe_floats() {
        // 2^53 + something, stored as f64: integer-valued but ambiguous.
        assert!(apply(&to_big_int(), json!(1.0e16)).is_err());
    }

    #[test]
    fn to_big_int_rejects_malformed_strings() {
        for raw in ["", "abc", "1.5", "10n", "0x10", " 10 ", "10 "] {
            assert!(apply(&to_big_int(), json!(raw)).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn to_big_int_rejects_out_of_range_magnitudes() {
        assert!(apply(&to_big_int(), json!("18446744073709551616")).is_err());
        assert!(apply(&to_big_int(), json!("-9223372036854775809")).is_err());
    }

    #[test]
    fn to_big_int_rejects_other_types_and_absence() {
        assert!(apply(&to_big_int(), json!(null)).is_err());
        assert!(apply(&to_big_int(), json!([10])).is_err());
        assert!(to_big_int().apply(None, &Path::root()).is_err());
    }

    #[test]
    fn to_big_int_is_idempotent_on_coerced_output() {
        let once = apply(&to_big_int(), json!("42")).unwrap().unwrap();
        let twice = apply(&to_big_int(), once.clone()).unwrap().unwrap();
        assert_eq!(once, twice);
    }

    // -- array --

    #[test]
    fn array_coerces_elements_in_order() {
        let coerced = apply(&array(to_big_int()), json!(["10", 20, "30"]))
            .unwrap()
            .unwrap();
        assert_eq!(coerced, json!([10, 20, 30]));
    }

    #[test]
    fn array_fails_fast_with_element_index() {
        let err = apply(&array(assert_number()), json!([1, 2, "x"])).unwrap_err();
        assert_eq!(err.path.last(), Some(&PathSegment::Index(2)));
        assert_eq!(err.path.to_string(), "$[2]");
    }

    #[test]
    fn array_rejects_non_arrays() {
        let err = apply(&array(assert_number()), json!(5)).unwrap_err();
        assert_eq!(err.expected, "array");
    }

    #[test]
    fn array_stays_absent_on_absent_input() {
        assert_eq!(array(assert_number()).apply(None, &Path::root()), Ok(None));
    }

    #[test]
    fn empty_array_is_valid() {
        assert_eq!(
            apply(&array(assert_number()), json!([])),
            Ok(Some(json!([])))
        );
    }

    // -- record --

    #[test]
    fn record_coerces_member_values_preserving_keys() {
        let coerced = apply(&record(to_big_int()), json!({"a": "1", "b": 2}))
            .unwrap()
            .unwrap();
        assert_eq!(coerced, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn record_reports_the_offending_key() {
        let err = apply(&record(assert_number()), json!({"ok": 1, "bad": "x"})).unwrap_err();
        assert_eq!(err.path.to_string(), "$.bad");
    }

    #[test]
    fn record_rejects_non_objects_and_stays_absent_when_absent() {
        assert!(apply(&record(assert_number()), json!([1])).is_err());
        assert_eq!(record(assert_number()).apply(None, &Path::root()), Ok(None));
    }
}
