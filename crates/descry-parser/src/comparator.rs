//! Comparator leaf parsing
//!
//! A leaf run is `<field path> <comparator phrase>`, the phrase being a
//! suffix of the run. The comparator's arity decides how many parameters
//! are bound, each of which must have the field's type.

use descry_ast::{Comparator, Condition};
use descry_lexer::{render, Word};

use crate::resolve::resolve_path;
use crate::{MethodContext, MethodSyntaxError, ParamCursor};

/// Recognize the comparator phrase ending `words` and its length in words
pub fn match_suffix(words: &[Word]) -> Option<(Comparator, usize)> {
    let texts: Vec<&str> = words.iter().map(Word::as_str).collect();

    let matched = match texts.as_slice() {
        [.., "Less", "Than", "Equal"] => (Comparator::LessThanEqual, 3),
        [.., "Greater", "Than", "Equal"] => (Comparator::GreaterThanEqual, 3),
        [.., "Than", "Equal"] => return None,
        [.., "Not", "Equal"] => (Comparator::NotEqual, 2),
        [.., "Equal"] => (Comparator::Equal, 1),
        [.., "Less", "Than"] => (Comparator::LessThan, 2),
        [.., "Greater", "Than"] => (Comparator::GreaterThan, 2),
        [.., "Not", "Between"] => (Comparator::NotBetween, 2),
        [.., "Between"] => (Comparator::Between, 1),
        [.., "Not", "In"] => (Comparator::NotIn, 2),
        [.., "In"] => (Comparator::In, 1),
        [.., "True"] => (Comparator::True, 1),
        [.., "False"] => (Comparator::False, 1),
        [.., "Not", "Exists"] => (Comparator::NotExists, 2),
        [.., "Exists"] => (Comparator::Exists, 1),
        _ => return None,
    };
    Some(matched)
}

/// Parse one `<field> <comparator>` run, binding its parameters
pub fn parse_condition<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<Condition, MethodSyntaxError> {
    if words.len() < 2 {
        return Err(cx.grammar_at(format!("there are grammar errors in {}", render(words)), words));
    }

    let Some((comparator, phrase_len)) = match_suffix(words) else {
        return Err(cx.grammar_at(
            format!(
                "there are grammar errors in {}, not ending with Equal, NotEqual, LessThan, \
                 LessThanEqual, GreaterThan, GreaterThanEqual, Between, NotBetween, In, NotIn, \
                 True, False, Exists, NotExists",
                render(words)
            ),
            words,
        ));
    };

    let field_words = &words[..words.len() - phrase_len];
    if field_words.is_empty() {
        return Err(cx.grammar_at(
            format!("there are grammar errors in {}, no field before {}", render(words), comparator),
            words,
        ));
    }

    let path = resolve_path(cx.schema, field_words).map_err(|e| cx.resolution(e))?;
    let params = cx.bind(cursor, &path.ty, comparator.arity(), words)?;

    Ok(Condition {
        comparator,
        field: path.key,
        params,
    })
}
