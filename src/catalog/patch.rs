//! Sparse field updates.
//!
//! A patch never touches the stored entity directly. The caller takes a
//! snapshot of the current scalar fields, [`materialize`] applies the
//! operations to that snapshot and validates the outcome, and only a snapshot
//! that passed is merged back and persisted.

use super::validation::FieldViolation;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A JSON Patch style operation. Only `replace` and `add` are understood, both
/// meaning "set this field".
#[derive(Debug, Clone, Deserialize)]
pub struct PatchOperation {
    pub op: String,
    pub path: String,
    #[serde(default)]
    pub value: Value,
}

impl PatchOperation {
    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: "replace".to_string(),
            path: path.into(),
            value,
        }
    }

    fn field(&self) -> &str {
        self.path.trim_start_matches('/')
    }
}

/// A projection of an entity that patch operations can be applied to.
pub trait Patchable {
    /// Sets one named field from a JSON value.
    fn set_field(&mut self, field: &str, value: Value) -> Result<(), FieldViolation>;

    /// Constraint check for the snapshot as a whole.
    fn validate(&self) -> Vec<FieldViolation>;
}

/// Decodes a JSON value into a field's type, reporting a violation on mismatch.
pub fn decode_field<T: DeserializeOwned>(field: &str, value: Value) -> Result<T, FieldViolation> {
    serde_json::from_value(value)
        .map_err(|e| FieldViolation::new(field, format!("invalid value for {field}: {e}")))
}

/// Unknown field helper for [`Patchable::set_field`] implementations.
#[must_use]
pub fn unknown_field(field: &str) -> FieldViolation {
    FieldViolation::new(field, format!("'{field}' cannot be patched"))
}

/// Applies `operations` to `snapshot` and validates the result.
///
/// # Errors
///
/// Returns every violation found: empty document, unsupported operations,
/// unknown or mistyped fields, and failed constraints on the final snapshot.
pub fn materialize<T: Patchable>(
    mut snapshot: T,
    operations: &[PatchOperation],
) -> Result<T, Vec<FieldViolation>> {
    if operations.is_empty() {
        return Err(vec![FieldViolation::new(
            "operations",
            "patch document contains no operations",
        )]);
    }

    let mut violations = Vec::new();
    for operation in operations {
        match operation.op.as_str() {
            "replace" | "add" => {
                if let Err(violation) =
                    snapshot.set_field(operation.field(), operation.value.clone())
                {
                    violations.push(violation);
                }
            }
            other => violations.push(FieldViolation::new(
                operation.field(),
                format!("unsupported patch operation '{other}'"),
            )),
        }
    }

    if !violations.is_empty() {
        return Err(violations);
    }

    let violations = snapshot.validate();
    if violations.is_empty() {
        Ok(snapshot)
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq)]
    struct Sample {
        name: String,
        count: i32,
    }

    impl Patchable for Sample {
        fn set_field(&mut self, field: &str, value: Value) -> Result<(), FieldViolation> {
            match field {
                "name" => self.name = decode_field(field, value)?,
                "count" => self.count = decode_field(field, value)?,
                _ => return Err(unknown_field(field)),
            }
            Ok(())
        }

        fn validate(&self) -> Vec<FieldViolation> {
            if self.name.is_empty() {
                vec![FieldViolation::new("name", "name is required")]
            } else {
                Vec::new()
            }
        }
    }

    fn sample() -> Sample {
        Sample {
            name: "before".to_string(),
            count: 1,
        }
    }

    #[test]
    fn applies_named_fields_only() {
        let patched = materialize(sample(), &[PatchOperation::replace("/count", json!(5))]).unwrap();
        assert_eq!(patched.count, 5);
        assert_eq!(patched.name, "before");
    }

    #[test]
    fn later_operations_win() {
        let ops = [
            PatchOperation::replace("/name", json!("first")),
            PatchOperation::replace("/name", json!("second")),
        ];
        assert_eq!(materialize(sample(), &ops).unwrap().name, "second");
    }

    #[test]
    fn rejects_empty_unknown_and_mistyped() {
        assert!(materialize(sample(), &[]).is_err());

        let errors = materialize(
            sample(),
            &[
                PatchOperation::replace("/id", json!(3)),
                PatchOperation::replace("/count", json!("many")),
            ],
        )
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "id");
        assert_eq!(errors[1].field, "count");
    }

    #[test]
    fn rejects_unsupported_operation() {
        let op = PatchOperation {
            op: "remove".to_string(),
            path: "/name".to_string(),
            value: Value::Null,
        };
        let errors = materialize(sample(), &[op]).unwrap_err();
        assert!(errors[0].message.contains("remove"));
    }

    #[test]
    fn validation_runs_on_the_snapshot() {
        let errors =
            materialize(sample(), &[PatchOperation::replace("/name", json!(""))]).unwrap_err();
        assert_eq!(errors[0].message, "name is required");
    }
}
