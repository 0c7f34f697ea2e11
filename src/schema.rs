//! Declarative object shapes for frontmatter records.
//!
//! A schema is a list of fields checked in declaration order. The first
//! mismatch ends validation. On success the record comes back normalized:
//! dates in canonical form, absent optional fields left out, and keys the
//! schema does not know handled by the [`UnknownKeys`] policy.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::date::{format_date, parse_date};
use crate::error::{FieldPath, ValidationError};

/// Untyped key/value metadata decoded from a content entry.
pub type Record = Mapping;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "items", rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Boolean,
    Date,
    Array(Box<FieldKind>),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Array(_) => "array",
        }
    }

    fn check(&self, value: &Value, path: &FieldPath) -> Result<Value, ValidationError> {
        match (self, value) {
            (FieldKind::String, Value::String(_)) | (FieldKind::Boolean, Value::Bool(_)) => {
                Ok(value.clone())
            }
            (FieldKind::Date, Value::String(s)) => match parse_date(s) {
                Some(date) => Ok(Value::String(format_date(&date))),
                None => Err(ValidationError::InvalidDate {
                    path: path.clone(),
                    input: s.clone(),
                }),
            },
            (FieldKind::Array(items), Value::Sequence(elements)) => elements
                .iter()
                .enumerate()
                .map(|(i, element)| items.check(element, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            _ => Err(ValidationError::InvalidType {
                path: path.clone(),
                expected: self.name().to_string(),
                received: value_kind(value).to_string(),
            }),
        }
    }
}

/// Type name of an untyped value, as reported in mismatch errors.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub fn required(name: &str, kind: FieldKind) -> Self {
        Field {
            name: name.to_string(),
            kind,
            required: true,
        }
    }

    pub fn optional(name: &str, kind: FieldKind) -> Self {
        Field {
            name: name.to_string(),
            kind,
            required: false,
        }
    }
}

/// What to do with record keys the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeys {
    #[default]
    Strip,
    Passthrough,
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectSchema {
    pub fields: Vec<Field>,
    pub unknown_keys: UnknownKeys,
}

impl ObjectSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        ObjectSchema {
            fields,
            unknown_keys: UnknownKeys::default(),
        }
    }

    pub fn with_unknown_keys(mut self, unknown_keys: UnknownKeys) -> Self {
        self.unknown_keys = unknown_keys;
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn check(&self, record: &Record) -> Result<Record, ValidationError> {
        let mut normalized = Mapping::new();

        for field in &self.fields {
            let path = FieldPath::field(&field.name);
            match record.get(field.name.as_str()) {
                Some(value) => {
                    let value = field.kind.check(value, &path)?;
                    normalized.insert(Value::String(field.name.clone()), value);
                }
                None if field.required => return Err(ValidationError::Required { path }),
                None => {}
            }
        }

        let unknown: Vec<(&Value, &Value)> = record
            .iter()
            .filter(|(key, _)| match key.as_str() {
                Some(name) => self.field(name).is_none(),
                None => true,
            })
            .collect();

        if unknown.is_empty() {
            return Ok(normalized);
        }

        match self.unknown_keys {
            UnknownKeys::Strip => {
                debug!(count = unknown.len(), "dropping unknown frontmatter keys");
            }
            UnknownKeys::Passthrough => {
                for (key, value) in unknown {
                    normalized.insert(key.clone(), value.clone());
                }
            }
            UnknownKeys::Strict => {
                return Err(ValidationError::UnrecognizedKeys {
                    keys: unknown.iter().map(|(key, _)| key_name(key)).collect(),
                });
            }
        }

        Ok(normalized)
    }
}

fn key_name(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => value_kind(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(yaml: &str) -> Record {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn schema() -> ObjectSchema {
        ObjectSchema::new(vec![
            Field::required("name", FieldKind::String),
            Field::optional("when", FieldKind::Date),
            Field::optional("labels", FieldKind::Array(Box::new(FieldKind::String))),
        ])
    }

    #[test]
    fn normalizes_dates_and_keeps_field_order() {
        let checked = schema()
            .check(&record("labels: [x]\nwhen: 2023-07-04\nname: n"))
            .unwrap();
        let keys: Vec<&str> = checked.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["name", "when", "labels"]);
        assert_eq!(checked.get("when"), Some(&Value::String("2023-07-04".into())));
    }

    #[test]
    fn null_is_a_type_mismatch_not_absence() {
        let err = schema().check(&record("name: n\nwhen: null")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidType {
                path: FieldPath::field("when"),
                expected: "date".to_string(),
                received: "null".to_string(),
            }
        );

        let err = schema().check(&record("name: ~")).unwrap_err();
        assert_eq!(err.reason(), "expected string, received null");
    }

    #[test]
    fn array_errors_name_the_element() {
        let err = schema()
            .check(&record("name: n\nlabels: [a, 2, c]"))
            .unwrap_err();
        assert_eq!(err.path().to_string(), "labels[1]");
        assert_eq!(err.field(), "labels");
    }

    #[test]
    fn unknown_keys_follow_policy() {
        let input = record("name: n\nextra: 1\n7: seven");

        let stripped = schema().check(&input).unwrap();
        assert_eq!(stripped.len(), 1);

        let kept = schema()
            .with_unknown_keys(UnknownKeys::Passthrough)
            .check(&input)
            .unwrap();
        assert_eq!(kept.get("extra"), Some(&Value::Number(1.into())));
        assert_eq!(kept.len(), 3);

        let err = schema()
            .with_unknown_keys(UnknownKeys::Strict)
            .check(&input)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnrecognizedKeys {
                keys: vec!["extra".to_string(), "7".to_string()],
            }
        );
    }

    #[test]
    fn schema_serializes_for_inspection() {
        let json = serde_json::to_value(schema()).unwrap();
        assert_eq!(json["fields"][2]["type"], "array");
        assert_eq!(json["fields"][2]["items"]["type"], "string");
        assert_eq!(json["unknown_keys"], "strip");
    }
}
