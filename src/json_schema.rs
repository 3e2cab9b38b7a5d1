//! Emit a JSON Schema document from a built schema.
//!
//! Pure transform over field metadata. A `default` keyword is written only when
//! the field declared one, so `field:string?=null` gets `"default": null` while
//! `field:string?` gets none.

use crate::ast::{Constraint, FieldSpec, ScalarType, SchemaSpec, TypeSpec};
use serde_json::{json, Map, Value};

pub fn to_json_schema(schema: &SchemaSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in schema {
        properties.insert(field.name.clone(), field_schema(field));
        if !field.optional {
            required.push(Value::String(field.name.clone()));
        }
    }
    let mut out = Map::new();
    out.insert("type".into(), json!("object"));
    out.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        out.insert("required".into(), Value::Array(required));
    }
    Value::Object(out)
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut out = match type_schema(&field.ty) {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    if let Some(d) = field.default_value() {
        out.insert("default".into(), d.to_json());
    }
    if let Some(desc) = &field.description {
        out.insert("description".into(), Value::String(desc.clone()));
    }
    Value::Object(out)
}

fn type_schema(ty: &TypeSpec) -> Value {
    let mut out = Map::new();
    match ty {
        TypeSpec::Scalar { ty: scalar, .. } => {
            let json_type = match scalar {
                ScalarType::Boolean => "boolean",
                ScalarType::Integer => "integer",
                ScalarType::Number => "number",
                _ => "string",
            };
            out.insert("type".into(), json!(json_type));
            let format = match scalar {
                ScalarType::Email => Some("email"),
                ScalarType::Url => Some("uri"),
                ScalarType::Uuid => Some("uuid"),
                ScalarType::DateTime => Some("date-time"),
                ScalarType::Date => Some("date"),
                _ => None,
            };
            if let Some(f) = format {
                out.insert("format".into(), json!(f));
            }
        }
        TypeSpec::Object(schema) => return to_json_schema(schema),
        TypeSpec::Array { items, .. } => {
            out.insert("type".into(), json!("array"));
            out.insert("items".into(), type_schema(items));
        }
        TypeSpec::Enum(values) => {
            let values: Vec<Value> = values.iter().map(|v| v.to_json()).collect();
            out.insert("enum".into(), Value::Array(values));
        }
        TypeSpec::Union { variants, nullable } => {
            let mut any_of: Vec<Value> = variants.iter().map(type_schema).collect();
            if *nullable {
                any_of.push(json!({"type": "null"}));
            }
            out.insert("anyOf".into(), Value::Array(any_of));
        }
    }
    for c in ty.constraints() {
        let key = match c {
            Constraint::Min(_) => "minimum",
            Constraint::Max(_) => "maximum",
            Constraint::MinLength(_) => "minLength",
            Constraint::MaxLength(_) => "maxLength",
            Constraint::Pattern(_) => "pattern",
            Constraint::MinItems(_) => "minItems",
            Constraint::MaxItems(_) => "maxItems",
        };
        out.insert(key.into(), c.bound());
    }
    Value::Object(out)
}
