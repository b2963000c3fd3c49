//! The normalizer engine: schema-driven object transformation.

use crate::coerce::Coercer;
use crate::error::ValidationError;
use crate::path::Path;
use serde_json::Value;
use std::sync::Arc;

/// Ordered mapping from field name to [`Coercer`], declared once per model
/// type and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Coercer)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares one coerced field.
    pub fn field(mut self, name: &str, coercer: Coercer) -> Self {
        self.fields.push((name.to_owned(), coercer));
        self
    }
}

/// Schema-bound transform from raw wire objects to typed objects.
///
/// Cheap to clone and safe to share across threads: each call reads the
/// schema, allocates a fresh output, and leaves the input untouched.
#[derive(Debug, Clone)]
pub struct Normalizer {
    schema: Arc<Schema>,
}

impl Normalizer {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    /// Normalizes a raw payload object.
    ///
    /// Declared fields are coerced in declaration order; undeclared fields
    /// are copied through unchanged, in their original order. The first
    /// coercion failure aborts the call, so callers see either a fully
    /// normalized object or an error, never a partial one.
    pub fn normalize(&self, value: &Value) -> Result<Value, ValidationError> {
        self.normalize_at(value, &Path::root())
    }

    fn normalize_at(&self, value: &Value, path: &Path) -> Result<Value, ValidationError> {
        let raw = match value {
            Value::Object(members) => members,
            other => return Err(ValidationError::mismatch(path, "object", other)),
        };
        let mut out = raw.clone();
        for (name, coercer) in &self.schema.fields {
            let field_path = path.push_key(name);
            match coercer.apply(raw.get(name), &field_path)? {
                Some(coerced) => {
                    out.insert(name.clone(), coerced);
                }
                None => {
                    out.remove(name);
                }
            }
        }
        Ok(Value::Object(out))
    }

    /// Wraps the normalizer as a [`Coercer`], so one model's schema can embed
    /// another model wherever a field holds a nested object of that type.
    /// Absent input stays absent.
    pub fn coercer(&self) -> Coercer {
        let normalizer = self.clone();
        Coercer::new(move |value, path| match value {
            None => Ok(None),
            Some(v) => normalizer.normalize_at(v, path).map(Some),
        })
    }
}
