//! # string-schema: One-line Schema Language and Validator
//!
//! A compact text syntax for declaring record schemas, plus a validator/coercer
//! that checks JSON documents against them and a JSON Schema emitter.
//!
//! ## Syntax
//!
//! A schema is a comma-separated list of fields:
//!
//! ```text
//! name:type(constraints)?=default | description
//! ```
//!
//! - **Scalars**: `string`, `int`, `number`, `bool`, `email`, `url`, `uuid`,
//!   `datetime`, `date`, `phone` (plus aliases such as `str`, `integer`, `float`)
//! - **Objects**: `{field, field}` or `object{...}`
//! - **Arrays**: `[T]` or `array[T]` / `list[T]`, item bounds after the bracket
//! - **Enums**: `enum(a, b, c)` (also `choice(...)`, `select(...)`)
//! - **Unions**: `string|int|null`
//! - **Constraints**: positional `(min, max)` or named `(min=1, pattern="^x")`
//! - `?` marks a field optional, `=value` sets a default, `| text` describes it
//!
//! ## Example
//!
//! ```text
//! name:string(1,100) | Display name,
//! age:int(0,120)=18 | Age in years,
//! email:email? | Contact address,
//! tags:[string](max_items=5)?,
//! addr:{city:string, zip:string?} | Postal address
//! ```
//!
//! ## Usage
//!
//! ```
//! use serde_json::json;
//! use string_schema::parse_schema;
//!
//! let schema = parse_schema("age:int(0,120)=18 | Age, name:string").unwrap();
//! let out = schema.validate_value(&json!({"name": "Ada"})).unwrap();
//! assert_eq!(out["age"], 18);
//! ```
//!
//! See `tests/integration.rs` for fuller examples.

pub mod ast;
pub mod error;
pub mod json_schema;
pub mod lint;
pub mod literal;
pub mod parser;
pub mod split;
pub mod validate;

pub use ast::{Constraint, DefaultValue, FieldSpec, Literal, ScalarType, Schema, SchemaSpec, TypeSpec};
pub use error::{BuildError, ParseError, SchemaError};
pub use json_schema::to_json_schema;
pub use lint::{lint_schema, LintMessage, LintRule, Severity};
pub use literal::parse_literal;
pub use parser::{parse_field, parse_schema};
pub use validate::{
    Outcome, UnknownFields, ValidateOptions, ValidationError, ValidationErrorKind, ValidationErrors,
    Validator,
};

use serde_json::{Map, Value};
use std::str::FromStr;

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_schema(s)
    }
}

impl SchemaSpec {
    pub fn to_json_schema(&self) -> Value {
        json_schema::to_json_schema(self)
    }

    pub fn lint(&self) -> Vec<LintMessage> {
        lint::lint_schema(self)
    }
}

/// Parse `text` and validate `input` against it in one call, with default options.
///
/// Parse, build and validation failures all come back as [`SchemaError`].
pub fn validate_to_dict(input: &Value, text: &str) -> Result<Map<String, Value>, SchemaError> {
    let schema = parse_schema(text)?;
    Ok(schema.validate_value(input)?)
}
