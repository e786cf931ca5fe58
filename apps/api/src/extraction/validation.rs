//! Shape checks for extracted model output.
//!
//! Violations are advisory: callers log them and still return the extracted
//! value as-is.

use serde::Serialize;
use serde_json::{Map, Value};

/// One mismatch between an extracted value and its expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeViolation {
    /// Location in the value, e.g. `traits[2].confidence`. `$` is the root.
    pub path: String,
    pub expected: &'static str,
}

/// Implemented by the report types a handler expects the model to return.
pub trait ExpectedShape {
    const NAME: &'static str;

    fn violations(value: &Value) -> Vec<ShapeViolation>;
}

/// Collects violations for the fields of one JSON object.
pub struct ShapeCheck<'a> {
    object: Option<&'a Map<String, Value>>,
    prefix: String,
    violations: Vec<ShapeViolation>,
}

impl<'a> ShapeCheck<'a> {
    /// Starts a check at the root of `value`.
    pub fn root(value: &'a Value) -> Self {
        Self::at(value, String::new())
    }

    fn at(value: &'a Value, prefix: String) -> Self {
        let mut violations = Vec::new();
        let object = value.as_object();
        if object.is_none() {
            violations.push(ShapeViolation {
                path: if prefix.is_empty() {
                    "$".to_string()
                } else {
                    prefix.clone()
                },
                expected: "object",
            });
        }
        Self {
            object,
            prefix,
            violations,
        }
    }

    fn path(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.prefix)
        }
    }

    fn field(&mut self, field: &str, expected: &'static str, ok: impl Fn(&Value) -> bool) {
        let Some(object) = self.object else {
            return;
        };
        let valid = object.get(field).is_some_and(ok);
        if !valid {
            let path = self.path(field);
            self.violations.push(ShapeViolation { path, expected });
        }
    }

    pub fn string(mut self, field: &str) -> Self {
        self.field(field, "string", Value::is_string);
        self
    }

    pub fn string_array(mut self, field: &str) -> Self {
        self.field(field, "array of strings", |v| {
            v.as_array()
                .is_some_and(|items| items.iter().all(Value::is_string))
        });
        self
    }

    /// A number in `0..=100`.
    pub fn percentage(mut self, field: &str) -> Self {
        self.field(field, "number between 0 and 100", |v| {
            v.as_f64().is_some_and(|n| (0.0..=100.0).contains(&n))
        });
        self
    }

    /// Requires `field` to be an array and checks each element with `each`.
    pub fn object_array(
        mut self,
        field: &str,
        each: impl Fn(ShapeCheck<'a>) -> ShapeCheck<'a>,
    ) -> Self {
        let Some(object) = self.object else {
            return self;
        };
        let path = self.path(field);
        match object.get(field).and_then(Value::as_array) {
            Some(items) => {
                for (i, item) in items.iter().enumerate() {
                    let nested = each(ShapeCheck::at(item, format!("{path}[{i}]")));
                    self.violations.extend(nested.violations);
                }
            }
            None => self.violations.push(ShapeViolation {
                path,
                expected: "array of objects",
            }),
        }
        self
    }

    pub fn finish(self) -> Vec<ShapeViolation> {
        self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(value: &Value) -> Vec<ShapeViolation> {
        ShapeCheck::root(value)
            .string("summary")
            .string_array("tags")
            .percentage("score")
            .object_array("items", |item| item.string("name"))
            .finish()
    }

    fn paths(violations: &[ShapeViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_conformant_value_has_no_violations() {
        let value = json!({
            "summary": "ok",
            "tags": ["a", "b"],
            "score": 55,
            "items": [{"name": "x"}]
        });
        assert!(check(&value).is_empty());
    }

    #[test]
    fn test_non_object_root_reports_single_violation() {
        let violations = check(&json!([1, 2]));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "$");
        assert_eq!(violations[0].expected, "object");
    }

    #[test]
    fn test_missing_and_mistyped_fields_are_reported() {
        let value = json!({
            "tags": ["a", 3],
            "score": "high",
            "items": "none"
        });
        assert_eq!(paths(&check(&value)), vec!["summary", "tags", "score", "items"]);
    }

    #[test]
    fn test_out_of_range_number_is_reported() {
        let value = json!({"summary": "", "tags": [], "score": 130, "items": []});
        assert_eq!(paths(&check(&value)), vec!["score"]);
    }

    #[test]
    fn test_nested_element_paths_are_indexed() {
        let value = json!({
            "summary": "s",
            "tags": [],
            "score": 0,
            "items": [{"name": "ok"}, {"name": 7}, "oops"]
        });
        assert_eq!(paths(&check(&value)), vec!["items[1].name", "items[2]"]);
    }
}
