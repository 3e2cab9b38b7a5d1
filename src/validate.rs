//! Validate and coerce input documents against a built schema.
//!
//! One pass visits every field in declaration order and collects every problem
//! instead of stopping at the first one. Per field:
//!
//! 1. a supplied value is coerced to the declared type,
//! 2. otherwise a declared default is used (a `null` default included),
//! 3. otherwise an optional field becomes `null`,
//! 4. otherwise a missing-required error is recorded.
//!
//! Non-null values then go through the type's constraints in declaration order
//! (string subtypes get an implicit `format` check first), and object/array
//! values recurse. The schema is only read; all working state lives in the pass.

use crate::ast::{Constraint, DefaultValue, FieldSpec, Literal, ScalarType, SchemaSpec, TypeSpec};
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::fmt;
use tracing::debug;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern")
});
static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s/?#]+[^\s]*$").expect("url pattern"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ().\-]{5,18}[0-9]$").expect("phone pattern"));

/// What to do with input keys the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    /// Drop them from the output.
    #[default]
    Ignore,
    /// Report each one as an error.
    Reject,
    /// Copy them to the output after the declared fields.
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Convert compatible values (`"10"` to `10`, `"yes"` to `true`). When false
    /// only exact JSON types are accepted.
    pub coerce: bool,
    pub unknown_fields: UnknownFields,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        ValidateOptions {
            coerce: true,
            unknown_fields: UnknownFields::Ignore,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    MissingRequired,
    TypeMismatch {
        expected: String,
        found: &'static str,
    },
    ConstraintViolation {
        constraint: String,
        bound: Value,
        value: Value,
    },
    UnknownField,
}

/// One problem, attributed to a field path such as `addr.city` or `tags[2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: String,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn constraint(&self) -> Option<&str> {
        match &self.kind {
            ValidationErrorKind::ConstraintViolation { constraint, .. } => Some(constraint),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::MissingRequired => {
                write!(f, "{}: missing required field", self.path)
            }
            ValidationErrorKind::TypeMismatch { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.path, expected, found)
            }
            ValidationErrorKind::ConstraintViolation {
                constraint,
                bound,
                value,
            } => write!(
                f,
                "{}: value {} violates {} (bound {})",
                self.path, value, constraint, bound
            ),
            ValidationErrorKind::UnknownField => write!(f, "{}: unknown field", self.path),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every error from one validation pass, in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Errors attributed to exactly `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.0.iter().filter(move |e| e.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Output of one pass: the (possibly partial) document plus every error found.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outcome {
    pub output: Map<String, Value>,
    pub errors: Vec<ValidationError>,
}

impl Outcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Map<String, Value>, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.output)
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// Validates documents against one schema. Borrowing the schema keeps the
/// validator cheap to create per call.
pub struct Validator<'s> {
    schema: &'s SchemaSpec,
    options: ValidateOptions,
}

impl<'s> Validator<'s> {
    pub fn new(schema: &'s SchemaSpec, options: ValidateOptions) -> Self {
        Validator { schema, options }
    }

    /// Run one pass over an input mapping.
    pub fn run(&self, input: &Map<String, Value>) -> Outcome {
        let mut pass = Pass::new(self.options);
        let output = pass.object(self.schema, input, "");
        debug!(
            fields = self.schema.len(),
            errors = pass.errors.len(),
            "validated input"
        );
        Outcome {
            output,
            errors: pass.errors,
        }
    }

    /// Like [`run`](Self::run) for an arbitrary JSON value; non-objects fail at `$`.
    pub fn run_value(&self, input: &Value) -> Outcome {
        match input.as_object() {
            Some(map) => self.run(map),
            None => Outcome {
                output: Map::new(),
                errors: vec![ValidationError {
                    path: "$".to_string(),
                    kind: ValidationErrorKind::TypeMismatch {
                        expected: "object".to_string(),
                        found: json_type_name(input),
                    },
                }],
            },
        }
    }

    pub fn validate(&self, input: &Map<String, Value>) -> Result<Map<String, Value>, ValidationErrors> {
        self.run(input).into_result()
    }

    pub fn validate_value(&self, input: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        self.run_value(input).into_result()
    }
}

impl SchemaSpec {
    /// Validate with default options.
    pub fn validate(&self, input: &Map<String, Value>) -> Result<Map<String, Value>, ValidationErrors> {
        Validator::new(self, ValidateOptions::default()).validate(input)
    }

    pub fn validate_value(&self, input: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        Validator::new(self, ValidateOptions::default()).validate_value(input)
    }
}

/// Check a single value against a type; errors are reported under `path`.
pub(crate) fn check_value(
    ty: &TypeSpec,
    value: &Value,
    path: &str,
    options: ValidateOptions,
) -> Vec<ValidationError> {
    let mut pass = Pass::new(options);
    if !value.is_null() {
        pass.value(ty, value, path);
    }
    pass.errors
}

pub fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

struct Pass {
    options: ValidateOptions,
    errors: Vec<ValidationError>,
}

impl Pass {
    fn new(options: ValidateOptions) -> Self {
        Pass {
            options,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, path: &str, kind: ValidationErrorKind) {
        self.errors.push(ValidationError {
            path: path.to_string(),
            kind,
        });
    }

    fn mismatch(&mut self, path: &str, ty: &TypeSpec, found: &Value) {
        self.push(
            path,
            ValidationErrorKind::TypeMismatch {
                expected: ty.to_string(),
                found: json_type_name(found),
            },
        );
    }

    fn object(&mut self, schema: &SchemaSpec, input: &Map<String, Value>, path: &str) -> Map<String, Value> {
        let mut out = Map::new();
        for field in schema {
            let field_path = join(path, &field.name);
            if let Some(v) = self.field(field, input.get(&field.name), &field_path) {
                out.insert(field.name.clone(), v);
            }
        }

        if self.options.unknown_fields != UnknownFields::Ignore {
            for (key, v) in input {
                if schema.get(key).is_some() {
                    continue;
                }
                match self.options.unknown_fields {
                    UnknownFields::Reject => {
                        self.push(&join(path, key), ValidationErrorKind::UnknownField)
                    }
                    UnknownFields::Keep => {
                        out.insert(key.clone(), v.clone());
                    }
                    UnknownFields::Ignore => {}
                }
            }
        }
        out
    }

    fn field(&mut self, field: &FieldSpec, supplied: Option<&Value>, path: &str) -> Option<Value> {
        match supplied {
            Some(Value::Null) if field.accepts_null() => Some(Value::Null),
            Some(v) => self.value(&field.ty, v, path),
            None => match &field.default {
                DefaultValue::Value(lit) => {
                    // Defaults are used as written, so they must already have the type.
                    let v = lit.to_json();
                    let strict = ValidateOptions {
                        coerce: false,
                        ..self.options
                    };
                    self.errors.extend(check_value(&field.ty, &v, path, strict));
                    Some(v)
                }
                DefaultValue::None if field.optional => Some(Value::Null),
                DefaultValue::None => {
                    self.push(path, ValidationErrorKind::MissingRequired);
                    None
                }
            },
        }
    }

    /// Coerce `v` to `ty`, check constraints and recurse. `None` when the value
    /// could not be given the declared type.
    fn value(&mut self, ty: &TypeSpec, v: &Value, path: &str) -> Option<Value> {
        match ty {
            TypeSpec::Scalar { ty: scalar, .. } => match coerce_scalar(*scalar, v, self.options.coerce) {
                Some(c) => {
                    self.constraints(ty, &c, path);
                    Some(c)
                }
                None => {
                    self.mismatch(path, ty, v);
                    None
                }
            },
            TypeSpec::Enum(allowed) => match match_enum(allowed, v, self.options.coerce) {
                Some(m) => Some(m),
                None => {
                    self.push(
                        path,
                        ValidationErrorKind::ConstraintViolation {
                            constraint: "enum".to_string(),
                            bound: Value::Array(allowed.iter().map(Literal::to_json).collect()),
                            value: v.clone(),
                        },
                    );
                    None
                }
            },
            TypeSpec::Object(schema) => match v.as_object() {
                Some(map) => Some(Value::Object(self.object(schema, map, path))),
                None => {
                    self.mismatch(path, ty, v);
                    None
                }
            },
            TypeSpec::Array { items, .. } => match v.as_array() {
                Some(elements) => {
                    self.constraints(ty, v, path);
                    let mut out = Vec::with_capacity(elements.len());
                    for (i, e) in elements.iter().enumerate() {
                        let element_path = format!("{}[{}]", path, i);
                        if let Some(c) = self.value(items, e, &element_path) {
                            out.push(c);
                        }
                    }
                    Some(Value::Array(out))
                }
                None => {
                    self.mismatch(path, ty, v);
                    None
                }
            },
            TypeSpec::Union { variants, nullable } => {
                if v.is_null() && *nullable {
                    return Some(Value::Null);
                }
                // Exact matches win over coercions, so `int|string` keeps "5" a string
                // only when no variant takes it as-is.
                let mut rounds = vec![false];
                if self.options.coerce {
                    rounds.push(true);
                }
                // Errors of the first variant that took the type but failed a constraint.
                let mut closest: Option<Vec<ValidationError>> = None;
                for coerce in rounds {
                    for variant in variants {
                        let mut trial = Pass::new(ValidateOptions {
                            coerce,
                            ..self.options
                        });
                        if let Some(c) = trial.value(variant, v, path) {
                            if trial.errors.is_empty() {
                                return Some(c);
                            }
                            closest.get_or_insert(trial.errors);
                        }
                    }
                }
                match closest {
                    Some(errors) => self.errors.extend(errors),
                    None => self.mismatch(path, ty, v),
                }
                None
            }
        }
    }

    /// Implicit format check, then declared constraints in order.
    fn constraints(&mut self, ty: &TypeSpec, v: &Value, path: &str) {
        if let TypeSpec::Scalar { ty: scalar, .. } = ty {
            if let Some(s) = v.as_str() {
                if !format_matches(*scalar, s) {
                    self.push(
                        path,
                        ValidationErrorKind::ConstraintViolation {
                            constraint: "format".to_string(),
                            bound: Value::String(scalar.name().to_string()),
                            value: v.clone(),
                        },
                    );
                }
            }
        }
        for c in ty.constraints() {
            if !constraint_holds(c, v) {
                self.push(
                    path,
                    ValidationErrorKind::ConstraintViolation {
                        constraint: c.name().to_string(),
                        bound: c.bound(),
                        value: v.clone(),
                    },
                );
            }
        }
    }
}

fn coerce_scalar(ty: ScalarType, v: &Value, coerce: bool) -> Option<Value> {
    match ty {
        ScalarType::Boolean => match v {
            Value::Bool(_) => Some(v.clone()),
            Value::String(s) if coerce => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            Value::Number(n) if coerce => match n.as_f64() {
                Some(x) if x == 1.0 => Some(Value::Bool(true)),
                Some(x) if x == 0.0 => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        ScalarType::Integer => match v {
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(v.clone()),
            Value::Number(n) if coerce => n.as_f64().and_then(integral).map(Value::from),
            Value::String(s) if coerce => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
                    .map(Value::from)
            }
            _ => None,
        },
        ScalarType::Number => match v {
            Value::Number(_) => Some(v.clone()),
            Value::String(s) if coerce => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Some(Value::from(i));
                }
                s.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
            }
            _ => None,
        },
        _ => match v {
            Value::String(_) => Some(v.clone()),
            _ => None,
        },
    }
}

/// `x` as an i64 when it has no fractional part and fits.
fn integral(x: f64) -> Option<i64> {
    if x.is_finite() && x.fract() == 0.0 && x >= i64::MIN as f64 && x <= i64::MAX as f64 {
        Some(x as i64)
    } else {
        None
    }
}

fn match_enum(allowed: &[Literal], v: &Value, coerce: bool) -> Option<Value> {
    let exact = allowed.iter().map(Literal::to_json).find(|a| a == v);
    if exact.is_some() || !coerce {
        return exact;
    }
    let as_text = match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    allowed
        .iter()
        .find(|a| a.to_string() == as_text)
        .map(Literal::to_json)
}

fn format_matches(ty: ScalarType, s: &str) -> bool {
    match ty {
        ScalarType::Email => EMAIL.is_match(s),
        ScalarType::Url => URL.is_match(s),
        ScalarType::Phone => PHONE.is_match(s),
        ScalarType::Uuid => uuid::Uuid::parse_str(s).is_ok(),
        ScalarType::DateTime => DateTime::parse_from_rfc3339(s).is_ok(),
        ScalarType::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        _ => true,
    }
}

fn constraint_holds(c: &Constraint, v: &Value) -> bool {
    match c {
        Constraint::Min(bound) => match (v.as_f64(), bound.as_f64()) {
            (Some(x), Some(b)) => x >= b,
            _ => true,
        },
        Constraint::Max(bound) => match (v.as_f64(), bound.as_f64()) {
            (Some(x), Some(b)) => x <= b,
            _ => true,
        },
        Constraint::MinLength(n) => v.as_str().map_or(true, |s| s.chars().count() as u64 >= *n),
        Constraint::MaxLength(n) => v.as_str().map_or(true, |s| s.chars().count() as u64 <= *n),
        Constraint::Pattern(p) => v.as_str().map_or(true, |s| p.is_match(s)),
        Constraint::MinItems(n) => v.as_array().map_or(true, |a| a.len() as u64 >= *n),
        Constraint::MaxItems(n) => v.as_array().map_or(true, |a| a.len() as u64 <= *n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;
    use serde_json::json;

    fn run(schema: &str, input: Value) -> Outcome {
        let schema = parse_schema(schema).expect("parse");
        Validator::new(&schema, ValidateOptions::default()).run_value(&input)
    }

    #[test]
    fn boolean_coercion() {
        let out = run("a:bool, b:bool, c:bool", json!({"a": "yes", "b": 0, "c": "OFF"}));
        assert!(out.is_valid(), "{:?}", out.errors);
        assert_eq!(Value::Object(out.output), json!({"a": true, "b": false, "c": false}));
    }

    #[test]
    fn integer_coercion() {
        let out = run("a:int, b:int, c:int", json!({"a": "10", "b": 4.0, "c": " 7 "}));
        assert!(out.is_valid(), "{:?}", out.errors);
        assert_eq!(Value::Object(out.output), json!({"a": 10, "b": 4, "c": 7}));
    }

    #[test]
    fn fractional_value_is_not_an_integer() {
        let out = run("a:int", json!({"a": 4.5}));
        assert_eq!(
            out.errors[0].kind,
            ValidationErrorKind::TypeMismatch {
                expected: "integer".to_string(),
                found: "number"
            }
        );
    }

    #[test]
    fn strict_mode_rejects_coercion() {
        let schema = parse_schema("a:int").unwrap();
        let opts = ValidateOptions {
            coerce: false,
            ..Default::default()
        };
        let out = Validator::new(&schema, opts).run_value(&json!({"a": "10"}));
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].path, "a");
    }

    #[test]
    fn strings_are_not_built_from_numbers() {
        let out = run("name:string", json!({"name": 5}));
        assert_eq!(out.errors.len(), 1);
        assert!(out.output.is_empty());
    }

    #[test]
    fn explicit_null_needs_nullable_field() {
        let out = run("a:string?, b:string=null, c:string", json!({"a": null, "b": null, "c": null}));
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].path, "c");
        assert_eq!(out.output.get("a"), Some(&Value::Null));
        assert_eq!(out.output.get("b"), Some(&Value::Null));
    }

    #[test]
    fn formats() {
        let out = run(
            "e:email, u:url, id:uuid, at:datetime, d:date, p:phone",
            json!({
                "e": "a@example.com",
                "u": "https://example.com/x?y=1",
                "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
                "at": "2024-05-01T12:30:00Z",
                "d": "2024-05-01",
                "p": "+1 (555) 123-4567"
            }),
        );
        assert!(out.is_valid(), "{:?}", out.errors);

        let out = run("e:email, d:date", json!({"e": "nope", "d": "2024-13-01"}));
        let constraints: Vec<_> = out.errors.iter().filter_map(|e| e.constraint()).collect();
        assert_eq!(constraints, vec!["format", "format"]);
    }

    #[test]
    fn pattern_and_length() {
        let out = run(r#"code:string(2,4,pattern="^[A-Z]+$")"#, json!({"code": "abcdef"}));
        let constraints: Vec<_> = out.errors.iter().filter_map(|e| e.constraint()).collect();
        assert_eq!(constraints, vec!["max_length", "pattern"]);
    }

    #[test]
    fn enum_matches_by_string_form() {
        let out = run("level:enum(1,2,3)", json!({"level": "2"}));
        assert!(out.is_valid());
        assert_eq!(out.output.get("level"), Some(&json!(2)));

        let out = run("level:enum(1,2,3)", json!({"level": 5}));
        assert_eq!(out.errors[0].constraint(), Some("enum"));
    }

    #[test]
    fn union_prefers_exact_type() {
        let out = run("v:int|string", json!({"v": "5"}));
        assert_eq!(out.output.get("v"), Some(&json!("5")));
        let out = run("v:int|bool", json!({"v": "5"}));
        assert_eq!(out.output.get("v"), Some(&json!(5)));
        let out = run("v:int|bool", json!({"v": [1]}));
        assert_eq!(
            out.errors[0].kind,
            ValidationErrorKind::TypeMismatch {
                expected: "integer|boolean".to_string(),
                found: "array"
            }
        );
    }

    #[test]
    fn union_reports_bounds_of_matching_variant() {
        let out = run("v:int(0,10)|string(max=2)", json!({"v": 50}));
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].constraint(), Some("max"));
        assert_eq!(out.output.get("v"), None);
    }

    #[test]
    fn defaults_are_checked_strictly() {
        let out = run("count:int=many, level:enum(1,2)=3, n:int(0,5)=2", json!({}));
        let paths: Vec<_> = out.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["count", "level"]);
        assert_eq!(
            out.errors[0].kind,
            ValidationErrorKind::TypeMismatch {
                expected: "integer".to_string(),
                found: "string"
            }
        );
        assert_eq!(out.errors[1].constraint(), Some("enum"));
        assert_eq!(out.output.get("n"), Some(&json!(2)));
    }

    #[test]
    fn array_elements_get_indexed_paths() {
        let out = run("ids:[int(0,)](max=3)", json!({"ids": [1, "x", -1, 4]}));
        let paths: Vec<_> = out.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["ids", "ids[1]", "ids[2]"]);
    }

    #[test]
    fn array_of_objects() {
        let out = run("items:[{id:int, tag:string?}]", json!({"items": [{"id": 1}, {}]}));
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].path, "items[1].id");
        assert_eq!(out.errors[0].kind, ValidationErrorKind::MissingRequired);
    }

    #[test]
    fn unknown_fields_policy() {
        let schema = parse_schema("a:int").unwrap();
        let input = json!({"a": 1, "b": 2});

        let out = Validator::new(&schema, ValidateOptions::default()).run_value(&input);
        assert_eq!(Value::Object(out.output), json!({"a": 1}));

        let keep = ValidateOptions {
            unknown_fields: UnknownFields::Keep,
            ..Default::default()
        };
        let out = Validator::new(&schema, keep).run_value(&input);
        assert_eq!(Value::Object(out.output), json!({"a": 1, "b": 2}));

        let reject = ValidateOptions {
            unknown_fields: UnknownFields::Reject,
            ..Default::default()
        };
        let out = Validator::new(&schema, reject).run_value(&input);
        assert_eq!(out.errors[0].path, "b");
        assert_eq!(out.errors[0].kind, ValidationErrorKind::UnknownField);
    }

    #[test]
    fn non_object_root() {
        let out = run("a:int", json!([1, 2]));
        assert_eq!(out.errors[0].path, "$");
    }

    #[test]
    fn default_is_checked_against_constraints() {
        let out = run("n:int(1,10)=50", json!({}));
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].constraint(), Some("max"));
        assert_eq!(out.output.get("n"), Some(&json!(50)));
    }

    #[test]
    fn error_display() {
        let out = run("age:int(0,120)", json!({"age": 200}));
        let errors = out.into_result().unwrap_err();
        assert_eq!(errors.to_string(), "age: value 200 violates max (bound 120)");
    }
}
