//! Literal values used for defaults, constraint arguments and enum members.

use crate::ast::Literal;
use once_cell::sync::Lazy;
use regex::Regex;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?[0-9]+$").expect("integer pattern"));
static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").expect("decimal pattern")
});

/// Convert a raw literal into a typed [`Literal`]. Never fails: anything that is
/// not `null`, a boolean, a quoted string or a number is kept as a bare string.
///
/// ```
/// use string_schema::{parse_literal, Literal};
/// assert_eq!(parse_literal("9.99"), Literal::Float(9.99));
/// assert_eq!(parse_literal("pending"), Literal::String("pending".into()));
/// assert_eq!(parse_literal("null"), Literal::Null);
/// ```
pub fn parse_literal(s: &str) -> Literal {
    let s = s.trim();
    if s == "null" {
        return Literal::Null;
    }
    if s.eq_ignore_ascii_case("true") {
        return Literal::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Literal::Bool(false);
    }
    if let Some(inner) = unquote(s) {
        return Literal::String(inner);
    }
    if INTEGER.is_match(s) {
        if let Ok(n) = s.parse::<i64>() {
            return Literal::Int(n);
        }
    }
    if DECIMAL.is_match(s) {
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return Literal::Float(f);
            }
        }
    }
    Literal::String(s.to_string())
}

fn unquote(s: &str) -> Option<String> {
    let q = s.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    if s.len() < 2 || !s.ends_with(q) {
        return None;
    }
    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(e) if e == q => out.push(q),
            // Unknown escapes are kept verbatim.
            Some(e) => {
                out.push('\\');
                out.push(e);
            }
            None => out.push('\\'),
        }
    }
    Some(out)
}
