//! Parse schema text into a [`SchemaSpec`].
//!
//! A schema is a comma-separated list of fields:
//!
//! ```text
//! name:type(constraints)?=default | description
//! ```
//!
//! Each field is first cut into slots with the delimiter-aware searches in
//! [`crate::split`] (description, then default, then name), and the remaining
//! type expression is read by a small recursive-descent parser over a
//! [`Cursor`]. Object bodies recurse back into the field-list parser.

use crate::ast::*;
use crate::error::{ParseError, SchemaError};
use crate::literal::parse_literal;
use crate::split::{find_closing, find_description, find_unnested, split_fields, split_unnested};
use tracing::{debug, trace};

/// Position in a type expression. `base` is the offset of `src` within the full
/// schema text so errors point at the right place.
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str, base: usize) -> Self {
        Cursor { src, pos: 0, base }
    }

    /// Absolute offset of the cursor in the schema text.
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn skip_ws(&mut self) {
        let rest = self.remaining();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Identifier at the cursor, without consuming it.
    pub fn peek_word(&self) -> &'a str {
        let rest = self.remaining();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        &rest[..len]
    }

    pub fn word(&mut self) -> &'a str {
        let w = self.peek_word();
        self.pos += w.len();
        w
    }

    /// Consume a bracketed group starting at the cursor; returns the inner text
    /// and its absolute offset.
    pub fn group(&mut self, open: char) -> Result<(&'a str, usize), ParseError> {
        if self.peek() != Some(open) {
            return Err(self.error(format!("expected `{}`", open)));
        }
        let close = find_closing(self.src, self.pos).map_err(|e| e.rebase(self.base))?;
        let inner = &self.src[self.pos + 1..close];
        let offset = self.base + self.pos + 1;
        self.pos = close + 1;
        Ok((inner, offset))
    }

    pub fn error(&self, reason: impl Into<String>) -> ParseError {
        ParseError::new(self.src, self.position(), reason)
    }
}

/// Parse a whole schema text into a shareable [`Schema`].
pub fn parse_schema(text: &str) -> Result<Schema, SchemaError> {
    let spec = parse_fields(text, 0)?;
    debug!(fields = spec.len(), "parsed schema");
    Ok(Schema::new(spec))
}

/// Parse one object level: a comma-separated field list.
pub fn parse_fields(text: &str, base: usize) -> Result<SchemaSpec, SchemaError> {
    let spans = split_fields(text).map_err(|e| e.rebase(base))?;
    let fields = spans
        .into_iter()
        .map(|(offset, raw)| parse_field_at(raw, base + offset))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SchemaSpec::build(fields)?)
}

/// Parse a single field definition such as `age:int(0,120)=18 | Age in years`.
pub fn parse_field(raw: &str) -> Result<FieldSpec, SchemaError> {
    parse_field_at(raw, 0)
}

fn parse_field_at(raw: &str, base: usize) -> Result<FieldSpec, SchemaError> {
    let base = base + (raw.len() - raw.trim_start().len());
    let raw = raw.trim();
    let err = |at: usize, reason: String| ParseError::new(raw, base + at, reason);

    let (definition, description) = match find_description(raw).map_err(|e| e.rebase(base))? {
        Some(bar) => (&raw[..bar], description_text(&raw[bar + 1..])),
        None => (raw, None),
    };

    let (decl, default) = match find_unnested(definition, '=').map_err(|e| e.rebase(base))? {
        Some(eq) => {
            let text = definition[eq + 1..].trim();
            if text.is_empty() {
                return Err(err(eq, "missing default value after `=`".to_string()).into());
            }
            (&definition[..eq], DefaultValue::Value(parse_literal(text)))
        }
        None => (definition, DefaultValue::None),
    };

    let colon = decl
        .find(':')
        .ok_or_else(|| err(0, "missing `:` between field name and type".to_string()))?;
    let name = decl[..colon].trim();
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(err(0, format!("invalid field name `{}`", name)).into());
    }

    let type_text = decl[colon + 1..].trim_end();
    let (type_text, optional) = match type_text.strip_suffix('?') {
        Some(t) => (t, true),
        None => (type_text, false),
    };
    let mut cursor = Cursor::new(type_text, base + colon + 1);
    let ty = parse_type(&mut cursor).map_err(|e| match e {
        SchemaError::Build(b) => SchemaError::Build(b.nested(name)),
        other => other,
    })?;
    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(cursor.error("unexpected trailing input").into());
    }

    if ty.is_composite() {
        if let DefaultValue::Value(lit) = &default {
            if !lit.is_null() {
                return Err(err(
                    colon + 1,
                    format!("{} fields only accept a `null` default", ty.tag()),
                )
                .into());
            }
        }
    }

    let field = FieldSpec {
        name: name.to_string(),
        ty,
        optional,
        default,
        description,
    };
    trace!(
        field = %field.name,
        ty = %field.ty,
        optional = field.optional,
        has_default = field.has_default(),
        "parsed field"
    );
    Ok(field)
}

/// Description text: verbatim, minus one space on each side of the separator.
fn description_text(s: &str) -> Option<String> {
    let s = s.strip_prefix(' ').unwrap_or(s);
    let s = s.strip_suffix(' ').unwrap_or(s);
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// `type ("|" type)*`, where a `null` alternative marks the union nullable.
fn parse_type(c: &mut Cursor<'_>) -> Result<TypeSpec, SchemaError> {
    c.skip_ws();
    let start = c.position();
    let mut variants = Vec::new();
    let mut nullable = false;
    loop {
        if c.peek_word() == "null" {
            c.word();
            nullable = true;
        } else {
            variants.push(parse_single_type(c)?);
        }
        if !c.eat('|') {
            break;
        }
    }
    if variants.is_empty() {
        return Err(ParseError::new(c.src, start, "`null` is not a type on its own").into());
    }
    if variants.len() == 1 && !nullable {
        return Ok(variants.remove(0));
    }
    Ok(TypeSpec::Union { variants, nullable })
}

fn parse_single_type(c: &mut Cursor<'_>) -> Result<TypeSpec, SchemaError> {
    match c.peek() {
        Some('[') => return parse_array_body(c),
        Some('{') => return parse_object_body(c),
        _ => {}
    }

    let start = c.position();
    let word = c.word();
    if word.is_empty() {
        return Err(c.error("expected a type").into());
    }
    if OBJECT_TAGS.contains(&word) {
        return parse_object_body(c);
    }
    if ARRAY_TAGS.contains(&word) {
        return parse_array_body(c);
    }
    if ENUM_TAGS.contains(&word) {
        let (body, offset) = c.group('(')?;
        return Ok(TypeSpec::Enum(parse_enum_values(body, offset)?));
    }
    let ty = ScalarType::from_tag(word)
        .ok_or_else(|| ParseError::new(c.src, start, format!("unknown type `{}`", word)))?;
    let constraints = parse_trailing_constraints(c, BoundKind::for_scalar(ty), ty.name())?;
    Ok(TypeSpec::Scalar { ty, constraints })
}

fn parse_object_body(c: &mut Cursor<'_>) -> Result<TypeSpec, SchemaError> {
    let (body, offset) = c.group('{')?;
    Ok(TypeSpec::Object(parse_fields(body, offset)?))
}

fn parse_array_body(c: &mut Cursor<'_>) -> Result<TypeSpec, SchemaError> {
    let (body, offset) = c.group('[')?;
    let mut inner = Cursor::new(body, offset);
    let items = parse_type(&mut inner).map_err(|e| match e {
        SchemaError::Build(b) => SchemaError::Build(b.in_element()),
        other => other,
    })?;
    inner.skip_ws();
    if !inner.at_end() {
        return Err(inner.error("unexpected trailing input in array element type").into());
    }
    let constraints = parse_trailing_constraints(c, BoundKind::Items, "array")?;
    Ok(TypeSpec::Array {
        items: Box::new(items),
        constraints,
    })
}

fn parse_enum_values(body: &str, offset: usize) -> Result<Vec<Literal>, ParseError> {
    let mut values = Vec::new();
    let mut at = 0;
    for token in split_unnested(body, ',').map_err(|e| e.rebase(offset))? {
        let token_at = offset + at;
        at += token.len() + 1;
        let token = token.trim();
        if token.is_empty() {
            return Err(ParseError::new(body, token_at, "empty enum value"));
        }
        values.push(parse_literal(token));
    }
    Ok(values)
}

/// Which constraint family a type accepts, and so how positional arguments map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundKind {
    /// `(min, max)`
    Numeric,
    /// `(min_length, max_length)` plus `pattern=`
    Text,
    /// `(min_items, max_items)`
    Items,
    Unconstrained,
}

impl BoundKind {
    fn for_scalar(ty: ScalarType) -> Self {
        if ty.is_numeric() {
            BoundKind::Numeric
        } else if ty.is_text() {
            BoundKind::Text
        } else {
            BoundKind::Unconstrained
        }
    }
}

fn parse_trailing_constraints(
    c: &mut Cursor<'_>,
    kind: BoundKind,
    owner: &str,
) -> Result<Vec<Constraint>, ParseError> {
    if c.peek() != Some('(') {
        return Ok(Vec::new());
    }
    let (args, offset) = c.group('(')?;
    parse_constraints(kind, owner, args, offset)
}

fn parse_constraints(
    kind: BoundKind,
    owner: &str,
    args: &str,
    offset: usize,
) -> Result<Vec<Constraint>, ParseError> {
    if args.trim().is_empty() {
        return Ok(Vec::new());
    }
    if kind == BoundKind::Unconstrained {
        return Err(ParseError::new(
            args,
            offset,
            format!("`{}` takes no constraints", owner),
        ));
    }

    let mut out: Vec<Constraint> = Vec::new();
    let mut slot = 0;
    let mut at = 0;
    for token in split_unnested(args, ',').map_err(|e| e.rebase(offset))? {
        let token_at = offset + at + (token.len() - token.trim_start().len());
        at += token.len() + 1;
        let token = token.trim();
        let err = |reason: String| ParseError::new(token, token_at, reason);

        let (key, value) = match find_unnested(token, '=').map_err(|e| e.rebase(token_at))? {
            Some(eq) => (Some(token[..eq].trim()), token[eq + 1..].trim()),
            None => (None, token),
        };
        let key = match key {
            Some(k) => {
                if value.is_empty() {
                    return Err(err(format!("missing value for `{}`", k)));
                }
                k
            }
            None => {
                let position = slot;
                slot += 1;
                if value.is_empty() {
                    continue;
                }
                match position {
                    0 => "min",
                    1 => "max",
                    _ => {
                        return Err(err(format!(
                            "`{}` takes at most two positional constraints",
                            owner
                        )))
                    }
                }
            }
        };

        let constraint = match (kind, key) {
            (BoundKind::Numeric, "min") => Constraint::Min(numeric_bound(key, value).map_err(err)?),
            (BoundKind::Numeric, "max") => Constraint::Max(numeric_bound(key, value).map_err(err)?),
            (BoundKind::Text, "min" | "min_length") => {
                Constraint::MinLength(count_bound(key, value).map_err(err)?)
            }
            (BoundKind::Text, "max" | "max_length") => {
                Constraint::MaxLength(count_bound(key, value).map_err(err)?)
            }
            (BoundKind::Text, "pattern") => {
                let source = match parse_literal(value) {
                    Literal::String(s) => s,
                    other => other.to_string(),
                };
                Constraint::Pattern(
                    Pattern::new(&source).map_err(|e| err(format!("invalid pattern: {}", e)))?,
                )
            }
            (BoundKind::Items, "min" | "min_items") => {
                Constraint::MinItems(count_bound(key, value).map_err(err)?)
            }
            (BoundKind::Items, "max" | "max_items") => {
                Constraint::MaxItems(count_bound(key, value).map_err(err)?)
            }
            _ => {
                return Err(err(format!(
                    "unknown constraint `{}` for `{}`",
                    key, owner
                )))
            }
        };
        if out.iter().any(|c| c.name() == constraint.name()) {
            return Err(err(format!("duplicate constraint `{}`", constraint.name())));
        }
        out.push(constraint);
    }
    Ok(out)
}

fn numeric_bound(key: &str, value: &str) -> Result<Literal, String> {
    let lit = parse_literal(value);
    match lit {
        Literal::Int(_) | Literal::Float(_) => Ok(lit),
        _ => Err(format!("`{}` must be a number, got `{}`", key, value)),
    }
}

fn count_bound(key: &str, value: &str) -> Result<u64, String> {
    match parse_literal(value) {
        Literal::Int(n) if n >= 0 => Ok(n as u64),
        _ => Err(format!(
            "`{}` must be a non-negative integer, got `{}`",
            key, value
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;

    fn field(raw: &str) -> FieldSpec {
        parse_field(raw).expect("parse field")
    }

    fn parse_err(raw: &str) -> ParseError {
        match parse_field(raw) {
            Err(SchemaError::Parse(e)) => e,
            other => panic!("expected parse error for {:?}, got {:?}", raw, other),
        }
    }

    #[test]
    fn plain_field() {
        let f = field("id:int");
        assert_eq!(f.name, "id");
        assert_eq!(f.ty, TypeSpec::scalar(ScalarType::Integer));
        assert!(!f.optional);
        assert!(!f.has_default());
        assert_eq!(f.description, None);
    }

    #[test]
    fn optional_with_null_default() {
        let f = field("email:string?=null");
        assert!(f.optional);
        assert!(f.has_default());
        assert_eq!(f.default_value(), Some(&Literal::Null));
    }

    #[test]
    fn optional_without_default() {
        let f = field("email:string?");
        assert!(f.optional);
        assert!(!f.has_default());
    }

    #[test]
    fn positional_numeric_bounds_and_default() {
        let f = field("age:int(0,120)=18");
        assert_eq!(
            f.constraints(),
            &[Constraint::Min(Literal::Int(0)), Constraint::Max(Literal::Int(120))]
        );
        assert_eq!(f.default_value(), Some(&Literal::Int(18)));
    }

    #[test]
    fn named_string_bounds() {
        let f = field("name:string(min=1,max=100)");
        assert_eq!(
            f.constraints(),
            &[Constraint::MinLength(1), Constraint::MaxLength(100)]
        );
    }

    #[test]
    fn empty_positional_slot_skips_bound() {
        let f = field("n:number(,9.5)");
        assert_eq!(f.constraints(), &[Constraint::Max(Literal::Float(9.5))]);
    }

    #[test]
    fn pattern_with_commas_and_equals() {
        let f = field(r#"code:string(pattern="^[A-Z]{2,3}=\d+$")"#);
        match &f.constraints()[0] {
            Constraint::Pattern(p) => assert_eq!(p.as_str(), r"^[A-Z]{2,3}=\d+$"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!f.has_default());
    }

    #[test]
    fn description_and_default_with_equals() {
        let f = field("count:int(1,100)=1 | Number of items (a=b)");
        assert_eq!(f.default_value(), Some(&Literal::Int(1)));
        assert_eq!(f.description.as_deref(), Some("Number of items (a=b)"));
    }

    #[test]
    fn default_keeps_everything_after_first_equals() {
        let f = field("s:string=a=b");
        assert_eq!(f.default_value(), Some(&Literal::String("a=b".into())));
    }

    #[test]
    fn enum_values_and_default() {
        let f = field("status:enum(draft,published,archived)=draft");
        assert_eq!(
            f.ty,
            TypeSpec::Enum(vec![
                Literal::String("draft".into()),
                Literal::String("published".into()),
                Literal::String("archived".into()),
            ])
        );
        assert_eq!(f.default_value(), Some(&Literal::String("draft".into())));
    }

    #[test]
    fn array_shorthand_and_keyword() {
        let a = field("tags:[string]");
        let b = field("tags:array[string]");
        assert_eq!(a, b);
        let c = field("ids:[int(1,)](1,10)");
        match &c.ty {
            TypeSpec::Array { items, constraints } => {
                assert_eq!(items.constraints(), &[Constraint::Min(Literal::Int(1))]);
                assert_eq!(
                    constraints,
                    &vec![Constraint::MinItems(1), Constraint::MaxItems(10)]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn object_shorthand_and_keyword() {
        let a = field("user:{id:int, name:string}");
        let b = field("user:object{id:int, name:string}");
        assert_eq!(a, b);
        match &a.ty {
            TypeSpec::Object(spec) => {
                assert_eq!(spec.len(), 2);
                assert_eq!(spec.fields()[1].name, "name");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn union_with_null() {
        let f = field("value:string|int|null");
        assert_eq!(
            f.ty,
            TypeSpec::Union {
                variants: vec![
                    TypeSpec::scalar(ScalarType::String),
                    TypeSpec::scalar(ScalarType::Integer)
                ],
                nullable: true,
            }
        );
        assert!(f.accepts_null());
    }

    #[test]
    fn unknown_type_is_named() {
        let e = parse_err("x:strng");
        assert_eq!(e.reason, "unknown type `strng`");
        assert_eq!(e.offset, 2);
    }

    #[test]
    fn missing_colon() {
        let e = parse_err("just_a_name");
        assert!(e.reason.contains("missing `:`"));
    }

    #[test]
    fn unknown_constraint_key() {
        let e = parse_err("age:int(minimum=3)");
        assert!(e.reason.contains("unknown constraint `minimum`"), "{}", e);
    }

    #[test]
    fn bool_takes_no_constraints() {
        let e = parse_err("flag:bool(1,2)");
        assert!(e.reason.contains("takes no constraints"));
    }

    #[test]
    fn three_positional_arguments_rejected() {
        let e = parse_err("n:int(1,2,3)");
        assert!(e.reason.contains("at most two"));
    }

    #[test]
    fn duplicate_constraint_rejected() {
        let e = parse_err("n:int(1,min=2)");
        assert!(e.reason.contains("duplicate constraint `min`"));
    }

    #[test]
    fn composite_defaults_rejected() {
        let e = parse_err("tags:[string]=[]");
        assert!(e.reason.contains("only accept a `null` default"));
        assert!(parse_field("tags:[string]?=null").is_ok());
    }

    #[test]
    fn trailing_garbage_rejected() {
        let e = parse_err("n:int x");
        assert_eq!(e.reason, "unexpected trailing input");
    }

    #[test]
    fn nested_duplicate_reports_path() {
        match parse_schema("addr:{city:string, city:string}") {
            Err(SchemaError::Build(BuildError::DuplicateField { path })) => {
                assert_eq!(path, "addr.city")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn duplicate_inside_array_element_reports_brackets() {
        let path = |text: &str| match parse_schema(text) {
            Err(SchemaError::Build(BuildError::DuplicateField { path })) => path,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(path("items:[{a:int,a:int}]"), "items[].a");
        assert_eq!(path("grid:[[{a:int,a:int}]]"), "grid[][].a");
        assert_eq!(path("o:{rows:[{k:{x:int,x:int}}]}"), "o.rows[].k.x");
    }

    #[test]
    fn infinite_bound_rejected() {
        let e = parse_err("x:int(0,1e999)");
        assert!(e.reason.contains("must be a number"), "{}", e);
    }

    #[test]
    fn error_offsets_are_absolute() {
        match parse_schema("a:int, b:int(1,2") {
            Err(SchemaError::Parse(e)) => assert_eq!(e.offset, 12),
            other => panic!("unexpected {:?}", other),
        }
    }
}
