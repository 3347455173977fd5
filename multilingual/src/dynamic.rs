//! Schema-described JSON records
//!
//! Payloads that arrive as JSON (CLI input, HTTP bodies) have no Rust type to
//! register. A [`SchemaRegistry`] supplies the same metadata at runtime: each
//! [`RecordSchema`] names a type, an optional scope override, and its
//! translatable fields. A record picks its schema through a discriminator
//! property (`"@type"` by default) or the registry's default type.
//!
//! ```json
//! {
//!   "typeField": "@type",
//!   "defaultType": "User",
//!   "schemas": [
//!     { "typeName": "User", "fields": ["status", "nickname"] },
//!     { "typeName": "UserVO", "scope": "User", "fields": ["status"] }
//!   ]
//! }
//! ```

use crate::error::{FieldAccessError, LoadError};
use crate::metadata::{SourceValue, TranslatableEntity, resolve_scope};
use crate::payload::TranslationPayload;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());
static DOTTED_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap()
});

fn default_type_field() -> String {
    "@type".to_string()
}

/// Translation metadata for one record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSchema {
    pub type_name: String,
    /// Overrides the type name as scope when non-empty; used verbatim
    #[serde(default)]
    pub scope: Option<String>,
    /// Translatable fields, in lookup order
    pub fields: Vec<String>,
}

impl RecordSchema {
    pub fn new(type_name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            type_name: type_name.into(),
            scope: None,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// The scope this schema's records are looked up under
    pub fn resolved_scope(&self) -> String {
        resolve_scope(self.scope.as_deref(), &self.type_name)
    }

    fn validate(&self) -> Result<(), LoadError> {
        let invalid = |message: String| LoadError::InvalidSchema {
            type_name: self.type_name.clone(),
            message,
        };

        if !IDENTIFIER.is_match(&self.type_name) {
            return Err(invalid("type name is not an identifier".to_string()));
        }
        let scope = self.resolved_scope();
        if !DOTTED_IDENTIFIER.is_match(&scope) {
            return Err(invalid(format!("scope '{}' is not a dotted identifier", scope)));
        }
        if self.fields.is_empty() {
            return Err(invalid("no translatable fields".to_string()));
        }
        for (position, field) in self.fields.iter().enumerate() {
            if !IDENTIFIER.is_match(field) {
                return Err(invalid(format!("field '{}' is not an identifier", field)));
            }
            if self.fields[..position].contains(field) {
                return Err(invalid(format!("field '{}' is listed twice", field)));
            }
        }
        Ok(())
    }
}

/// On-disk shape of a schema registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default = "default_type_field")]
    pub type_field: String,
    #[serde(default)]
    pub default_type: Option<String>,
    pub schemas: Vec<RecordSchema>,
}

/// Validated record schemas keyed by type name
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    type_field: String,
    default_type: Option<String>,
    schemas: HashMap<String, Arc<RecordSchema>>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self {
            type_field: default_type_field(),
            default_type: None,
            schemas: HashMap::new(),
        }
    }
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register every schema in the document
    pub fn from_document(document: SchemaDocument) -> Result<Self, LoadError> {
        let mut registry = Self::new().with_type_field(document.type_field);
        registry.default_type = document.default_type;
        registry.register_all(document.schemas)?;
        Ok(registry)
    }

    pub fn with_type_field(mut self, type_field: impl Into<String>) -> Self {
        self.type_field = type_field.into();
        self
    }

    pub fn with_default_type(mut self, type_name: impl Into<String>) -> Self {
        self.default_type = Some(type_name.into());
        self
    }

    pub fn with_schema(mut self, schema: RecordSchema) -> Result<Self, LoadError> {
        self.register_all([schema])?;
        Ok(self)
    }

    pub fn register_all(
        &mut self,
        schemas: impl IntoIterator<Item = RecordSchema>,
    ) -> Result<(), LoadError> {
        for schema in schemas {
            schema.validate()?;
            if self.schemas.contains_key(&schema.type_name) {
                return Err(LoadError::InvalidSchema {
                    type_name: schema.type_name,
                    message: "registered twice".to_string(),
                });
            }
            self.schemas
                .insert(schema.type_name.clone(), Arc::new(schema));
        }
        Ok(())
    }

    pub fn get(&self, type_name: &str) -> Option<&Arc<RecordSchema>> {
        self.schemas.get(type_name)
    }

    pub fn type_field(&self) -> &str {
        &self.type_field
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Schema for a JSON value: its discriminator, else the default type
    pub fn schema_for(&self, value: &Value) -> Option<Arc<RecordSchema>> {
        let object = value.as_object()?;
        let type_name = object
            .get(&self.type_field)
            .and_then(Value::as_str)
            .or(self.default_type.as_deref())?;
        self.schemas.get(type_name).cloned()
    }

    /// Wrap one JSON value as a record; unknown types become untagged records
    pub fn record(&self, value: Value) -> DynamicRecord {
        let schema = self.schema_for(&value);
        DynamicRecord::new(schema, value)
    }

    /// Wrap a JSON document: arrays become collections, anything else a single record
    pub fn payload(&self, value: Value) -> DynamicPayload {
        match value {
            Value::Array(items) => {
                DynamicPayload::Many(items.into_iter().map(|item| self.record(item)).collect())
            }
            other => DynamicPayload::Single(self.record(other)),
        }
    }
}

/// A JSON value seen through its schema
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicRecord {
    schema: Option<Arc<RecordSchema>>,
    scope: Option<String>,
    value: Value,
}

impl DynamicRecord {
    /// `schema: None` makes an untagged record that is never translated
    pub fn new(schema: Option<Arc<RecordSchema>>, value: Value) -> Self {
        let scope = schema.as_ref().map(|schema| schema.resolved_scope());
        Self {
            schema,
            scope,
            value,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    fn declared(&self, field: &str) -> Result<(), FieldAccessError> {
        let declared = self
            .schema
            .as_ref()
            .is_some_and(|schema| schema.fields.iter().any(|f| f == field));
        if declared {
            Ok(())
        } else {
            Err(FieldAccessError::UnknownField {
                scope: self.scope.clone().unwrap_or_default(),
                field: field.to_string(),
            })
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TranslatableEntity for DynamicRecord {
    fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    fn translatable_fields(&self) -> Vec<&str> {
        self.schema
            .as_ref()
            .map(|schema| schema.fields.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn read_field(&self, field: &str) -> Result<Option<SourceValue>, FieldAccessError> {
        self.declared(field)?;
        match self.value.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(SourceValue::Text(text.clone()))),
            Some(value @ (Value::Number(_) | Value::Bool(_))) => {
                Ok(Some(SourceValue::Other(value.to_string())))
            }
            Some(other) => Err(FieldAccessError::Unreadable {
                field: field.to_string(),
                reason: format!("{} values have no source form", kind_of(other)),
            }),
        }
    }

    fn write_field(&mut self, field: &str, translated: &str) -> Result<(), FieldAccessError> {
        self.declared(field)?;
        match self.value.get_mut(field) {
            Some(Value::String(text)) => {
                *text = translated.to_string();
                Ok(())
            }
            other => Err(FieldAccessError::TypeMismatch {
                field: field.to_string(),
                found: other.map_or("null", |value| kind_of(value)).to_string(),
            }),
        }
    }
}

/// A JSON document split into records
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicPayload {
    Single(DynamicRecord),
    Many(Vec<DynamicRecord>),
}

impl DynamicPayload {
    /// Reassemble the (possibly translated) JSON document
    pub fn into_value(self) -> Value {
        match self {
            DynamicPayload::Single(record) => record.into_value(),
            DynamicPayload::Many(records) => {
                Value::Array(records.into_iter().map(DynamicRecord::into_value).collect())
            }
        }
    }
}

impl TranslationPayload for DynamicRecord {
    fn entities(&self) -> Vec<&dyn TranslatableEntity> {
        vec![self as &dyn TranslatableEntity]
    }

    fn entities_mut(&mut self) -> Vec<&mut dyn TranslatableEntity> {
        vec![self as &mut dyn TranslatableEntity]
    }
}

impl TranslationPayload for DynamicPayload {
    fn entities(&self) -> Vec<&dyn TranslatableEntity> {
        match self {
            DynamicPayload::Single(record) => record.entities(),
            DynamicPayload::Many(records) => records.entities(),
        }
    }

    fn entities_mut(&mut self) -> Vec<&mut dyn TranslatableEntity> {
        match self {
            DynamicPayload::Single(record) => record.entities_mut(),
            DynamicPayload::Many(records) => records.entities_mut(),
        }
    }
}
