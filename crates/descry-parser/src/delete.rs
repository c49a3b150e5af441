//! `Delete By|All`

use descry_ast::DeleteOp;
use descry_lexer::{Keyword, Word};

use crate::query::parse_query;
use crate::signature::check_delete;
use crate::{Invocation, MethodContext, MethodSyntaxError, ParamCursor};

/// Parse the words following `Delete`
pub fn parse_delete<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
    invocation: Invocation,
) -> Result<DeleteOp, MethodSyntaxError> {
    let (mode, ctx_param, body) = match invocation {
        Invocation::Standalone => {
            let mode = check_delete(cx)?;
            let ctx = cx.take_context(cursor)?;
            (mode, Some(ctx), words)
        }
        Invocation::Nested => {
            let (mode, rest) = cx.nested_mode(words, Keyword::Delete)?;
            if rest.is_empty() {
                return Err(cx.grammar_at(
                    format!("there is no content after Delete {}", mode.as_str()),
                    words,
                ));
            }
            (mode, None, rest)
        }
    };

    let query_at = cx.query_index(body)?;
    if query_at > 0 {
        return Err(cx.unexpected(&body[..query_at], "before By or All"));
    }
    let query = parse_query(cx, body, cursor)?;

    if invocation == Invocation::Standalone {
        cx.ensure_exhausted(cursor)?;
    }

    Ok(DeleteOp {
        method: cx.method.name.clone(),
        mode,
        ctx_param,
        query,
    })
}
