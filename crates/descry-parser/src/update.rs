//! `Update [Upsert] [fields...] By|All`

use descry_ast::{FieldBinding, TypeRef, UpdateOp, UpdatePayload};
use descry_lexer::{Keyword, Word};

use crate::query::parse_query;
use crate::resolve::resolve_paths;
use crate::signature::check_update;
use crate::{Invocation, MethodContext, MethodSyntaxError, ParamCursor};

/// Parse the words following `Update`
///
/// Standalone, the mode comes from the return type and the context is
/// consumed first. Nested, the words start with `One` or `Many`.
pub fn parse_update<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
    invocation: Invocation,
) -> Result<UpdateOp, MethodSyntaxError> {
    let (mode, ctx_param, body) = match invocation {
        Invocation::Standalone => {
            let mode = check_update(cx)?;
            let ctx = cx.take_context(cursor)?;
            (mode, Some(ctx), words)
        }
        Invocation::Nested => {
            let (mode, rest) = cx.nested_mode(words, Keyword::Update)?;
            if rest.is_empty() {
                return Err(cx.grammar_at(
                    format!("there is no content after Update {}", mode.as_str()),
                    words,
                ));
            }
            (mode, None, rest)
        }
    };

    let query_at = cx.query_index(body)?;
    let (upsert, fields) = match body[..query_at].split_first() {
        Some((first, rest)) if first.is(Keyword::Upsert) => (true, rest),
        _ => (false, &body[..query_at]),
    };

    let payload = if fields.is_empty() {
        whole_entity(cx, body, cursor)?
    } else {
        field_bindings(cx, fields, cursor)?
    };

    let query = parse_query(cx, &body[query_at..], cursor)?;
    if invocation == Invocation::Standalone {
        cx.ensure_exhausted(cursor)?;
    }

    tracing::trace!(method = %cx.method.name, mode = mode.as_str(), upsert, "parsed update");
    Ok(UpdateOp {
        method: cx.method.name.clone(),
        mode,
        ctx_param,
        upsert,
        payload,
        query,
    })
}

/// No field words: the next parameter must be `*pkg.<Entity>`
fn whole_entity<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<UpdatePayload, MethodSyntaxError> {
    let param = cx.take_param(cursor, words)?;

    let TypeRef::Pointer(inner) = &param.ty else {
        return Err(cx.type_error_at(
            format!(
                "the input when updating the whole structure is not a structure pointer: {} ({})",
                param.ty, param.name
            ),
            words,
        ));
    };
    match inner.as_ref() {
        TypeRef::Selector { name, .. } if *name == cx.schema.name => {
            Ok(UpdatePayload::Document(param.name.clone()))
        }
        _ => Err(cx.type_error_at(
            format!(
                "the input when updating the whole structure is not in the form of *Package.{}: {} ({})",
                cx.schema.name, param.ty, param.name
            ),
            words,
        )),
    }
}

/// One parameter per resolved field, each of the field's type
fn field_bindings<'a>(
    cx: &MethodContext<'a>,
    fields: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<UpdatePayload, MethodSyntaxError> {
    let paths = resolve_paths(cx.schema, fields).map_err(|e| cx.resolution(e))?;

    let mut bindings = Vec::with_capacity(paths.len());
    for path in paths {
        let mut bound = cx.bind(cursor, &path.ty, 1, fields)?;
        bindings.push(FieldBinding {
            field: path.key,
            param: bound.remove(0),
        });
    }
    Ok(UpdatePayload::Fields(bindings))
}
