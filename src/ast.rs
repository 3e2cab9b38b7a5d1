//! Schema model produced by the parser.
//!
//! A [`SchemaSpec`] is an ordered list of [`FieldSpec`]s. Object fields hold a
//! nested `SchemaSpec`, so one tree describes the whole document. Nothing here is
//! mutated after construction; [`Schema`] shares a built tree behind an [`Arc`].

use crate::error::BuildError;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A literal as written in schema text.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    pub fn to_json(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::from(*i),
            Literal::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::String(s) => Value::String(s.clone()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(i) => Some(*i as f64),
            Literal::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::String(s) => write!(f, "{}", s),
        }
    }
}

/// Whether a field declared a default. `Value(Literal::Null)` is an explicit
/// null default and is distinct from `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DefaultValue {
    #[default]
    None,
    Value(Literal),
}

/// Leaf types. The string subtypes are validated as strings plus a format check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Boolean,
    Integer,
    Number,
    String,
    Email,
    Url,
    Uuid,
    DateTime,
    Date,
    Phone,
}

impl ScalarType {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "bool" | "boolean" => Some(ScalarType::Boolean),
            "int" | "integer" => Some(ScalarType::Integer),
            "number" | "float" | "num" => Some(ScalarType::Number),
            "string" | "str" | "text" => Some(ScalarType::String),
            "email" => Some(ScalarType::Email),
            "url" | "uri" => Some(ScalarType::Url),
            "uuid" => Some(ScalarType::Uuid),
            "datetime" => Some(ScalarType::DateTime),
            "date" => Some(ScalarType::Date),
            "phone" => Some(ScalarType::Phone),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Boolean => "boolean",
            ScalarType::Integer => "integer",
            ScalarType::Number => "number",
            ScalarType::String => "string",
            ScalarType::Email => "email",
            ScalarType::Url => "url",
            ScalarType::Uuid => "uuid",
            ScalarType::DateTime => "datetime",
            ScalarType::Date => "date",
            ScalarType::Phone => "phone",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ScalarType::Integer | ScalarType::Number)
    }

    /// String-valued types (plain string and every semantic subtype).
    pub fn is_text(self) -> bool {
        !matches!(
            self,
            ScalarType::Boolean | ScalarType::Integer | ScalarType::Number
        )
    }
}

pub(crate) const OBJECT_TAGS: &[&str] = &["object"];
pub(crate) const ARRAY_TAGS: &[&str] = &["array", "list"];
pub(crate) const ENUM_TAGS: &[&str] = &["enum", "choice", "select"];

/// Words that may start a type expression (used to tell union bars from descriptions).
pub fn is_type_keyword(word: &str) -> bool {
    word == "null"
        || ScalarType::from_tag(word).is_some()
        || OBJECT_TAGS.contains(&word)
        || ARRAY_TAGS.contains(&word)
        || ENUM_TAGS.contains(&word)
}

/// A compiled `pattern` constraint. Equality compares the source text.
#[derive(Clone)]
pub struct Pattern(regex::Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(source).map(Pattern)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, s: &str) -> bool {
        self.0.is_match(s)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.as_str())
    }
}

/// One declared rule narrowing a type. Numeric bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Min(Literal),
    Max(Literal),
    MinLength(u64),
    MaxLength(u64),
    Pattern(Pattern),
    MinItems(u64),
    MaxItems(u64),
}

impl Constraint {
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Min(_) => "min",
            Constraint::Max(_) => "max",
            Constraint::MinLength(_) => "min_length",
            Constraint::MaxLength(_) => "max_length",
            Constraint::Pattern(_) => "pattern",
            Constraint::MinItems(_) => "min_items",
            Constraint::MaxItems(_) => "max_items",
        }
    }

    pub fn bound(&self) -> Value {
        match self {
            Constraint::Min(l) | Constraint::Max(l) => l.to_json(),
            Constraint::MinLength(n)
            | Constraint::MaxLength(n)
            | Constraint::MinItems(n)
            | Constraint::MaxItems(n) => Value::from(*n),
            Constraint::Pattern(p) => Value::String(p.as_str().to_string()),
        }
    }
}

/// Type of a field (or of an array element / union alternative).
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Scalar {
        ty: ScalarType,
        constraints: Vec<Constraint>,
    },
    Object(SchemaSpec),
    Array {
        items: Box<TypeSpec>,
        constraints: Vec<Constraint>,
    },
    Enum(Vec<Literal>),
    Union {
        variants: Vec<TypeSpec>,
        nullable: bool,
    },
}

impl TypeSpec {
    pub fn scalar(ty: ScalarType) -> Self {
        TypeSpec::Scalar {
            ty,
            constraints: Vec::new(),
        }
    }

    /// Type tag: a scalar name, or `object` / `array` / `enum` / `union`.
    pub fn tag(&self) -> &'static str {
        match self {
            TypeSpec::Scalar { ty, .. } => ty.name(),
            TypeSpec::Object(_) => "object",
            TypeSpec::Array { .. } => "array",
            TypeSpec::Enum(_) => "enum",
            TypeSpec::Union { .. } => "union",
        }
    }

    /// Constraints declared directly on this type, in declaration order.
    pub fn constraints(&self) -> &[Constraint] {
        match self {
            TypeSpec::Scalar { constraints, .. } | TypeSpec::Array { constraints, .. } => {
                constraints
            }
            _ => &[],
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, TypeSpec::Object(_) | TypeSpec::Array { .. })
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeSpec::Union { nullable: true, .. })
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Scalar { ty, .. } => write!(f, "{}", ty.name()),
            TypeSpec::Object(_) => write!(f, "object"),
            TypeSpec::Array { items, .. } => write!(f, "array[{}]", items),
            TypeSpec::Enum(values) => {
                let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "enum({})", values.join(","))
            }
            TypeSpec::Union { variants, nullable } => {
                let mut parts: Vec<String> = variants.iter().map(|v| v.to_string()).collect();
                if *nullable {
                    parts.push("null".to_string());
                }
                write!(f, "{}", parts.join("|"))
            }
        }
    }
}

/// One parsed field: `name:type(constraints)?=default | description`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeSpec,
    pub optional: bool,
    pub default: DefaultValue,
    pub description: Option<String>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: TypeSpec) -> Self {
        FieldSpec {
            name: name.into(),
            ty,
            optional: false,
            default: DefaultValue::None,
            description: None,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        self.ty.tag()
    }

    pub fn constraints(&self) -> &[Constraint] {
        self.ty.constraints()
    }

    pub fn has_default(&self) -> bool {
        !matches!(self.default, DefaultValue::None)
    }

    /// The declared default; only meaningful when [`has_default`](Self::has_default) is true.
    pub fn default_value(&self) -> Option<&Literal> {
        match &self.default {
            DefaultValue::Value(v) => Some(v),
            DefaultValue::None => None,
        }
    }

    /// Whether an explicit `null` input is acceptable for this field.
    pub fn accepts_null(&self) -> bool {
        self.optional
            || self.default_value().map_or(false, Literal::is_null)
            || self.ty.is_nullable()
    }
}

/// Ordered fields of one object level.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaSpec {
    fields: Vec<FieldSpec>,
}

impl SchemaSpec {
    /// Assemble one object level. Field names must be unique among siblings;
    /// nested object levels were already checked when they were built.
    pub fn build(fields: Vec<FieldSpec>) -> Result<Self, BuildError> {
        let mut seen = HashSet::new();
        for f in &fields {
            if !seen.insert(f.name.as_str()) {
                return Err(BuildError::DuplicateField {
                    path: f.name.clone(),
                });
            }
        }
        Ok(SchemaSpec { fields })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldSpec> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a SchemaSpec {
    type Item = &'a FieldSpec;
    type IntoIter = std::slice::Iter<'a, FieldSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A built schema, cheap to clone and safe to share between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    spec: Arc<SchemaSpec>,
}

impl Schema {
    pub fn new(spec: SchemaSpec) -> Self {
        Schema {
            spec: Arc::new(spec),
        }
    }

    pub fn spec(&self) -> &SchemaSpec {
        &self.spec
    }
}

impl Deref for Schema {
    type Target = SchemaSpec;

    fn deref(&self) -> &SchemaSpec {
        &self.spec
    }
}

impl From<SchemaSpec> for Schema {
    fn from(spec: SchemaSpec) -> Self {
        Schema::new(spec)
    }
}
