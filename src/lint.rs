//! Linter for built schemas: catches declarations that parse but cannot behave
//! as written.
//!
//! ## Rules
//!
//! - **Default must validate**: a declared default has to satisfy its own field's
//!   type and constraints (it is used as-is when the input omits the field).
//! - **Bounds in order**: `min <= max` for numeric, length and item bounds.
//! - **Described fields**: every field should carry a `| description`.

use crate::ast::{Constraint, FieldSpec, SchemaSpec, TypeSpec};
use crate::validate::{check_value, ValidateOptions};

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Identifies which rule produced the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintRule {
    /// The declared default fails the field's type or constraints.
    DefaultInvalid,
    /// A lower bound is greater than its upper bound.
    InvertedBounds,
    /// The field has no description.
    MissingDescription,
}

/// A single lint message, attributed to a field path.
#[derive(Debug, Clone)]
pub struct LintMessage {
    pub path: String,
    pub rule: LintRule,
    pub severity: Severity,
    pub message: String,
}

/// Run all lint rules. Messages follow field declaration order.
pub fn lint_schema(schema: &SchemaSpec) -> Vec<LintMessage> {
    let mut out = Vec::new();
    lint_level(schema, "", &mut out);
    out
}

fn lint_level(schema: &SchemaSpec, prefix: &str, out: &mut Vec<LintMessage>) {
    for field in schema {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        lint_field(field, &path, out);
    }
}

fn lint_field(field: &FieldSpec, path: &str, out: &mut Vec<LintMessage>) {
    if field.description.is_none() {
        out.push(LintMessage {
            path: path.to_string(),
            rule: LintRule::MissingDescription,
            severity: Severity::Warning,
            message: "field has no description".to_string(),
        });
    }

    if let Some(default) = field.default_value() {
        // Defaults are stored typed, so they are checked without coercion.
        let strict = ValidateOptions {
            coerce: false,
            ..Default::default()
        };
        for e in check_value(&field.ty, &default.to_json(), path, strict) {
            out.push(LintMessage {
                path: path.to_string(),
                rule: LintRule::DefaultInvalid,
                severity: Severity::Error,
                message: format!("default `{}` is invalid: {}", default, e),
            });
        }
    }

    lint_type(&field.ty, path, out);
}

fn lint_type(ty: &TypeSpec, path: &str, out: &mut Vec<LintMessage>) {
    check_bounds(ty.constraints(), path, out);
    match ty {
        TypeSpec::Object(schema) => lint_level(schema, path, out),
        TypeSpec::Array { items, .. } => lint_type(items, &format!("{}[]", path), out),
        TypeSpec::Union { variants, .. } => {
            for v in variants {
                lint_type(v, path, out);
            }
        }
        TypeSpec::Scalar { .. } | TypeSpec::Enum(_) => {}
    }
}

fn check_bounds(constraints: &[Constraint], path: &str, out: &mut Vec<LintMessage>) {
    let mut lower: Vec<(&'static str, f64)> = Vec::new();
    let mut upper: Vec<(&'static str, f64)> = Vec::new();
    for c in constraints {
        match c {
            Constraint::Min(l) => lower.extend(l.as_f64().map(|x| ("value", x))),
            Constraint::Max(l) => upper.extend(l.as_f64().map(|x| ("value", x))),
            Constraint::MinLength(n) => lower.push(("length", *n as f64)),
            Constraint::MaxLength(n) => upper.push(("length", *n as f64)),
            Constraint::MinItems(n) => lower.push(("items", *n as f64)),
            Constraint::MaxItems(n) => upper.push(("items", *n as f64)),
            Constraint::Pattern(_) => {}
        }
    }
    for (kind, lo) in &lower {
        for (_, hi) in upper.iter().filter(|(k, _)| k == kind) {
            if lo > hi {
                out.push(LintMessage {
                    path: path.to_string(),
                    rule: LintRule::InvertedBounds,
                    severity: Severity::Error,
                    message: format!("{} bounds are inverted: min {} > max {}", kind, lo, hi),
                });
            }
        }
    }
}
