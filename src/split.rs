//! Delimiter-aware scanning of schema text.
//!
//! Every search in this module skips separators that sit inside `(...)`, `[...]`,
//! `{...}` or a quoted span. Quotes (`"` or `'`, backslash escapes honoured) hide
//! everything, including brackets, until they close.
//!
//! ## Descriptions
//!
//! A field's description (the text after its `|`) is prose: it may contain
//! apostrophes and unbalanced parentheses. Once a description separator is seen
//! at field-list level (the top level of a schema, or directly inside an object
//! body `{...}`), the scanner switches to description mode: quotes are ignored,
//! parentheses are only counted locally, and the description ends at the next
//! `,` outside those parentheses (or at the `}` closing the object body).
//!
//! ## Union bars
//!
//! `string|int|null` joins union alternatives. A `|` is a union bar when the
//! character before it is not whitespace and the text after it starts with a
//! type keyword; such bars belong to the type and are never reported as
//! separators.

use crate::ast::is_type_keyword;
use crate::error::ParseError;
use std::ops::ControlFlow;

enum Frame {
    Group { open: char, at: usize },
    Description { parens: u32 },
}

fn closer_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// True when the `|` at byte index `at` joins two union alternatives.
pub(crate) fn is_union_bar(text: &str, at: usize) -> bool {
    let before = text[..at].chars().next_back();
    if before.map_or(true, char::is_whitespace) {
        return false;
    }
    let after = &text[at + 1..];
    if after.starts_with('[') || after.starts_with('{') {
        return true;
    }
    let word_len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(after.len());
    word_len > 0 && is_type_keyword(&after[..word_len])
}

/// Walk `text`, calling `visit` for every character at nesting depth zero that
/// is outside quotes and descriptions. Closers that bring the depth back to zero
/// are visited too (that is how [`find_closing`] finds its match).
///
/// `field_list` enables description mode at the top level; inside object bodies
/// it is always enabled.
fn walk<F>(text: &str, field_list: bool, mut visit: F) -> Result<(), ParseError>
where
    F: FnMut(usize, char) -> ControlFlow<()>,
{
    let mut stack: Vec<Frame> = Vec::new();
    let mut quote: Option<(char, usize)> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some((q, _)) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if let Some(Frame::Description { parens }) = stack.last_mut() {
            match c {
                '(' => *parens += 1,
                ')' if *parens > 0 => *parens -= 1,
                ',' if *parens == 0 => {
                    stack.pop();
                    if stack.is_empty() && visit(i, c).is_break() {
                        return Ok(());
                    }
                }
                '}' if *parens == 0 && stack.len() > 1 => {
                    stack.pop();
                    match stack.pop() {
                        Some(Frame::Group { open: '{', .. }) => {}
                        _ => return Err(ParseError::new(text, i, "unbalanced `}`")),
                    }
                    if stack.is_empty() && visit(i, c).is_break() {
                        return Ok(());
                    }
                }
                _ => {}
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some((c, i)),
            '(' | '[' | '{' => stack.push(Frame::Group { open: c, at: i }),
            ')' | ']' | '}' => {
                match stack.pop() {
                    Some(Frame::Group { open, .. }) if closer_for(open) == c => {}
                    Some(Frame::Group { open, at }) => {
                        return Err(ParseError::new(
                            text,
                            i,
                            format!("`{}` at offset {} closed by `{}`", open, at, c),
                        ))
                    }
                    _ => return Err(ParseError::new(text, i, format!("unbalanced `{}`", c))),
                }
                if stack.is_empty() && visit(i, c).is_break() {
                    return Ok(());
                }
            }
            '|' if is_union_bar(text, i) => {}
            '|' if (stack.is_empty() && field_list)
                || matches!(stack.last(), Some(Frame::Group { open: '{', .. })) =>
            {
                let top = stack.is_empty();
                stack.push(Frame::Description { parens: 0 });
                if top && visit(i, c).is_break() {
                    return Ok(());
                }
            }
            _ => {
                if stack.is_empty() && visit(i, c).is_break() {
                    return Ok(());
                }
            }
        }
    }

    if let Some((q, at)) = quote {
        return Err(ParseError::new(text, at, format!("unterminated {} quote", q)));
    }
    for frame in stack.iter().rev() {
        if let Frame::Group { open, at } = frame {
            return Err(ParseError::new(text, *at, format!("unclosed `{}`", open)));
        }
    }
    Ok(())
}

/// Split `text` at every unnested, unquoted `sep`.
///
/// ```
/// use string_schema::split::split_unnested;
/// let parts = split_unnested("min=1,pattern=\"a,b\",max=(3)", ',').unwrap();
/// assert_eq!(parts, vec!["min=1", "pattern=\"a,b\"", "max=(3)"]);
/// ```
pub fn split_unnested(text: &str, sep: char) -> Result<Vec<&str>, ParseError> {
    let mut parts = Vec::new();
    let mut start = 0;
    walk(text, false, |i, c| {
        if c == sep {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
        ControlFlow::Continue(())
    })?;
    parts.push(&text[start..]);
    Ok(parts)
}

/// Byte index of the first unnested, unquoted `sep`, if any.
pub fn find_unnested(text: &str, sep: char) -> Result<Option<usize>, ParseError> {
    let mut found = None;
    walk(text, false, |i, c| {
        if c == sep {
            found = Some(i);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    })?;
    Ok(found)
}

/// Byte index of the `|` separating a field definition from its description.
pub fn find_description(text: &str) -> Result<Option<usize>, ParseError> {
    let mut found = None;
    walk(text, true, |i, c| {
        if c == '|' {
            found = Some(i);
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    })?;
    Ok(found)
}

/// Index of the closer matching the opener at byte index `open`.
pub fn find_closing(text: &str, open: usize) -> Result<usize, ParseError> {
    let sub = &text[open..];
    let mut found = None;
    walk(sub, false, |i, c| {
        if matches!(c, ')' | ']' | '}') {
            found = Some(i);
        }
        ControlFlow::Break(())
    })
    .map_err(|e| e.rebase(open))?;
    found
        .map(|i| open + i)
        .ok_or_else(|| ParseError::new(text, open, "expected an opening delimiter"))
}

/// Split a field list into field spans: `(byte offset, trimmed text)` pairs.
/// Blank entries (e.g. after a trailing comma) are skipped.
pub fn split_fields(text: &str) -> Result<Vec<(usize, &str)>, ParseError> {
    let mut bounds = Vec::new();
    let mut start = 0;
    walk(text, true, |i, c| {
        if c == ',' {
            bounds.push((start, i));
            start = i + 1;
        }
        ControlFlow::Continue(())
    })?;
    bounds.push((start, text.len()));

    Ok(bounds
        .into_iter()
        .filter_map(|(s, e)| {
            let raw = &text[s..e];
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                let lead = raw.len() - raw.trim_start().len();
                Some((s + lead, trimmed))
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_nesting_and_quotes() {
        let parts = split_unnested("a(1,2),b[c,d],'x,y',{e,f}", ',').unwrap();
        assert_eq!(parts, vec!["a(1,2)", "b[c,d]", "'x,y'", "{e,f}"]);
    }

    #[test]
    fn split_without_separator_returns_whole_text() {
        assert_eq!(split_unnested("string", '=').unwrap(), vec!["string"]);
    }

    #[test]
    fn find_unnested_skips_constraint_equals() {
        assert_eq!(find_unnested("string(min=1)=a=b", '=').unwrap(), Some(13));
        assert_eq!(find_unnested("int(1,100)=5", '=').unwrap(), Some(10));
        assert_eq!(find_unnested("string", '=').unwrap(), None);
    }

    #[test]
    fn unbalanced_closer_is_an_error() {
        let err = split_unnested("int(1,2))", ',').unwrap_err();
        assert_eq!(err.offset, 8);
        assert!(err.reason.contains("unbalanced"));
    }

    #[test]
    fn mismatched_closer_is_an_error() {
        let err = split_unnested("array[int)", ',').unwrap_err();
        assert!(err.reason.contains("closed by"), "{}", err);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = split_unnested("string=\"abc", ',').unwrap_err();
        assert!(err.reason.contains("unterminated"));
        assert_eq!(err.offset, 7);
    }

    #[test]
    fn unclosed_opener_is_an_error() {
        let err = split_unnested("int(1,2", ',').unwrap_err();
        assert_eq!(err.reason, "unclosed `(`");
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn description_may_hold_apostrophes_and_parens() {
        let fields = split_fields("name:string | User's name (full), age:int").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].1, "name:string | User's name (full)");
        assert_eq!(fields[1], (34, "age:int"));
    }

    #[test]
    fn description_commas_inside_parens_stay_in_description() {
        let fields = split_fields("model:string? | LLM model (empty, for default), n:int").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].1, "n:int");
    }

    #[test]
    fn description_inside_object_body_ends_at_brace() {
        let text = "addr:object{city:string|City's name,zip:string? | Zip (5)}, id:int";
        let fields = split_fields(text).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].1, "id:int");
    }

    #[test]
    fn find_description_ignores_union_bars() {
        assert_eq!(find_description("value:string|int|null").unwrap(), None);
        assert_eq!(find_description("value:string|int | Either").unwrap(), Some(17));
        assert_eq!(find_description("name:string|User name").unwrap(), Some(11));
    }

    #[test]
    fn quoted_default_hides_bar() {
        assert_eq!(find_description("sep:string=\"|\" | Separator").unwrap(), Some(15));
    }

    #[test]
    fn find_closing_matches_nested_opener() {
        let text = "object{a:[int],b:{c:int}}";
        assert_eq!(find_closing(text, 6).unwrap(), text.len() - 1);
        assert_eq!(find_closing("[int(0,1)]x", 0).unwrap(), 9);
    }

    #[test]
    fn trailing_comma_is_skipped() {
        let fields = split_fields("a:int,\n  b:int,\n").unwrap();
        assert_eq!(fields.iter().map(|f| f.1).collect::<Vec<_>>(), vec!["a:int", "b:int"]);
    }
}
