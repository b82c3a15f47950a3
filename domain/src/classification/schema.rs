//! Enum-constrained structured-output schema.
//!
//! A [`StructuredSchema`] describes a flat JSON object whose fields each take
//! one string from a fixed set. It is rendered to JSON Schema for the
//! provider, and used again to check whatever comes back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

/// Ways a model answer can fail to conform to a [`StructuredSchema`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(String),

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("unexpected field '{0}'")]
    UnexpectedField(String),

    #[error("field '{field}' must be a string")]
    NotAString { field: String },

    #[error("field '{field}' has value '{value}', expected one of [{allowed}]")]
    OutsideEnum {
        field: String,
        value: String,
        allowed: String,
    },
}

/// One enum-valued field of a structured answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumField {
    pub name: String,
    pub description: String,
    pub values: Vec<String>,
}

impl EnumField {
    pub fn new<'a>(
        name: impl Into<String>,
        description: impl Into<String>,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            values: values.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Schema for a flat object of enum-constrained string fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSchema {
    name: String,
    fields: Vec<EnumField>,
}

impl StructuredSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: EnumField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[EnumField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&EnumField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render as a strict JSON Schema object.
    ///
    /// All fields are required and no additional properties are allowed,
    /// which is what strict structured-output modes demand.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(
                field.name.clone(),
                json!({
                    "type": "string",
                    "description": field.description,
                    "enum": field.values,
                }),
            );
        }
        let required: Vec<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }

    /// Check that `value` is an object with exactly the schema's fields,
    /// each holding one of its allowed strings.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        let Value::Object(map) = value else {
            return Err(SchemaViolation::NotAnObject(json_kind(value).to_string()));
        };

        for field in &self.fields {
            let Some(raw) = map.get(&field.name) else {
                return Err(SchemaViolation::MissingField(field.name.clone()));
            };
            let Some(s) = raw.as_str() else {
                return Err(SchemaViolation::NotAString {
                    field: field.name.clone(),
                });
            };
            if !field.allows(s) {
                return Err(SchemaViolation::OutsideEnum {
                    field: field.name.clone(),
                    value: s.to_string(),
                    allowed: field.values.join(", "),
                });
            }
        }

        if let Some(extra) = map.keys().find(|k| self.field(k).is_none()) {
            return Err(SchemaViolation::UnexpectedField(extra.clone()));
        }

        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
