//! Query expression parsing
//!
//! `By <expr>` builds a binary And/Or tree over comparator leaves, `All`
//! means no predicate. Which connective splits a run is decided by the
//! configured [`SplitStrategy`]; brackets (`Lb`/`Rb`) are balance-checked
//! over the whole run before any split.

use descry_ast::{Connective, Query, QueryExpr};
use descry_lexer::{render, Keyword, Word};

use crate::comparator::parse_condition;
use crate::{MethodContext, MethodSyntaxError, ParamCursor, SplitError, SplitStrategy};

/// One step of query decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split<'w> {
    /// No eligible connective: the run is a comparator leaf
    Leaf(&'w [Word]),
    Connective {
        connective: Connective,
        left: &'w [Word],
        right: &'w [Word],
    },
}

impl SplitStrategy {
    /// Pick the top-level connective of `words`, if any
    pub fn split(self, words: &[Word]) -> Result<Split<'_>, SplitError> {
        match self {
            SplitStrategy::Legacy => split_legacy(words),
            SplitStrategy::Nested => split_nested(words),
        }
    }
}

fn connective(word: &Word) -> Option<Connective> {
    match word.keyword()? {
        Keyword::And => Some(Connective::And),
        Keyword::Or => Some(Connective::Or),
        _ => None,
    }
}

/// First connective at depth 0 or 1; at depth 1 the enclosing bracket
/// tokens are assumed to sit at both ends of the run and are dropped
pub fn split_legacy(words: &[Word]) -> Result<Split<'_>, SplitError> {
    let mut depth = 0usize;

    for (index, word) in words.iter().enumerate() {
        if word.is(Keyword::Lb) {
            depth += 1;
        }
        if word.is(Keyword::Rb) {
            depth = depth
                .checked_sub(1)
                .ok_or(SplitError::Unbalanced { span: word.span })?;
        }

        let Some(connective) = connective(word) else {
            continue;
        };
        if depth > 1 {
            continue;
        }
        if index == words.len() - 1 {
            return Err(SplitError::DanglingConnective { span: word.span });
        }

        let (left, right) = if depth == 1 {
            (&words[1..index], &words[index + 1..words.len() - 1])
        } else {
            (&words[..index], &words[index + 1..])
        };
        return Ok(Split::Connective {
            connective,
            left,
            right,
        });
    }

    Ok(Split::Leaf(words))
}

/// Standard nesting: strip brackets that wrap the whole run, then split at
/// the first connective outside every bracket
pub fn split_nested(words: &[Word]) -> Result<Split<'_>, SplitError> {
    let mut run = words;
    while is_wrapped(run) {
        run = &run[1..run.len() - 1];
    }

    let mut depth = 0usize;
    for (index, word) in run.iter().enumerate() {
        if word.is(Keyword::Lb) {
            depth += 1;
        } else if word.is(Keyword::Rb) {
            depth = depth
                .checked_sub(1)
                .ok_or(SplitError::Unbalanced { span: word.span })?;
        } else if let Some(connective) = connective(word) {
            if depth > 0 {
                continue;
            }
            if index == run.len() - 1 {
                return Err(SplitError::DanglingConnective { span: word.span });
            }
            return Ok(Split::Connective {
                connective,
                left: &run[..index],
                right: &run[index + 1..],
            });
        }
    }

    Ok(Split::Leaf(run))
}

/// Whether `Lb` at the start is closed exactly by the last word
fn is_wrapped(words: &[Word]) -> bool {
    if words.len() < 2 || !words[0].is(Keyword::Lb) || !words[words.len() - 1].is(Keyword::Rb) {
        return false;
    }

    let mut depth = 0usize;
    for (index, word) in words.iter().enumerate() {
        if word.is(Keyword::Lb) {
            depth += 1;
        } else if word.is(Keyword::Rb) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return index == words.len() - 1;
            }
        }
    }
    false
}

/// Fail on any `Rb` without an open `Lb`, or an `Lb` never closed
pub fn check_balance(words: &[Word]) -> Result<(), SplitError> {
    let mut open: Vec<&Word> = Vec::new();
    for word in words {
        if word.is(Keyword::Lb) {
            open.push(word);
        } else if word.is(Keyword::Rb) && open.pop().is_none() {
            return Err(SplitError::Unbalanced { span: word.span });
        }
    }

    match open.last() {
        Some(unclosed) => Err(SplitError::Unbalanced { span: unclosed.span }),
        None => Ok(()),
    }
}

/// Parse `By <expr>` or a lone `All`
pub fn parse_query<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<Query, MethodSyntaxError> {
    let Some((first, body)) = words.split_first() else {
        return Err(cx.grammar("no By or All specified"));
    };

    match first.keyword() {
        Some(Keyword::All) if body.is_empty() => Ok(Query::All),
        Some(Keyword::All) => Err(cx.grammar_at(
            "there's no need to follow any tokens behind All",
            body,
        )),
        Some(Keyword::By) if body.is_empty() => Err(cx.grammar_at(
            "By needs to be followed by query tokens",
            std::slice::from_ref(first),
        )),
        Some(Keyword::By) => {
            check_balance(body).map_err(|e| cx.split(e))?;
            build_expr(cx, body, cursor).map(Query::By)
        }
        _ => Err(cx.grammar_at("no By or All specified", words)),
    }
}

fn build_expr<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<QueryExpr, MethodSyntaxError> {
    match cx.config.split_strategy.split(words).map_err(|e| cx.split(e))? {
        Split::Leaf(run) => parse_condition(cx, run, cursor).map(QueryExpr::Leaf),
        Split::Connective {
            connective,
            left,
            right,
        } => {
            tracing::trace!(
                method = %cx.method.name,
                connective = connective.as_str(),
                left = %render(left),
                right = %render(right),
                "split query"
            );
            // Left side first so parameters bind in descriptor order
            let left = build_expr(cx, left, cursor)?;
            let right = build_expr(cx, right, cursor)?;
            Ok(QueryExpr::node(connective, left, right))
        }
    }
}
