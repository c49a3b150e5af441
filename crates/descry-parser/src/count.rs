//! `Count By|All`

use descry_ast::CountOp;
use descry_lexer::Word;

use crate::query::parse_query;
use crate::signature::check_count;
use crate::{MethodContext, MethodSyntaxError, ParamCursor};

/// Parse the words following `Count`; only ever standalone
pub fn parse_count<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<CountOp, MethodSyntaxError> {
    check_count(cx)?;
    let ctx = cx.take_context(cursor)?;

    let query_at = cx.query_index(words)?;
    if query_at > 0 {
        return Err(cx.unexpected(&words[..query_at], "before By or All"));
    }
    let query = parse_query(cx, words, cursor)?;
    cx.ensure_exhausted(cursor)?;

    Ok(CountOp {
        method: cx.method.name.clone(),
        ctx_param: ctx,
        query,
    })
}
