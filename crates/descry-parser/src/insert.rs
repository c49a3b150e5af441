//! `Insert [One|Many]`

use descry_ast::{InsertOp, OperateMode};
use descry_lexer::{Keyword, Word};

use crate::signature::check_insert;
use crate::{Invocation, MethodContext, MethodSyntaxError, ParamCursor};

/// Parse the words following `Insert`
pub fn parse_insert<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
    invocation: Invocation,
) -> Result<InsertOp, MethodSyntaxError> {
    match invocation {
        Invocation::Standalone => parse_standalone(cx, words, cursor),
        Invocation::Nested => parse_nested(cx, words, cursor),
    }
}

fn parse_standalone<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<InsertOp, MethodSyntaxError> {
    let mode = check_insert(cx)?;

    // The mode word is optional; if written it must match the payload
    let written = match words {
        [] => None,
        [word] if word.is(Keyword::One) => Some(OperateMode::One),
        [word] if word.is(Keyword::Many) => Some(OperateMode::Many),
        _ => return Err(cx.unexpected(words, "after Insert, expected One or Many")),
    };
    if let Some(written) = written {
        if written != mode {
            return Err(cx.type_error_at(
                format!(
                    "Insert {} does not match the type of the inserted parameter {}",
                    written.as_str(),
                    cx.method.params[1].ty
                ),
                words,
            ));
        }
    }

    let ctx = cx.take_context(cursor)?;
    let document = cx.take_param(cursor, words)?;
    cx.ensure_exhausted(cursor)?;

    Ok(InsertOp {
        method: cx.method.name.clone(),
        mode,
        ctx_param: Some(ctx),
        document_param: document.name.clone(),
    })
}

fn parse_nested<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<InsertOp, MethodSyntaxError> {
    let (mode, rest) = cx.nested_mode(words, Keyword::Insert)?;
    if !rest.is_empty() {
        return Err(cx.unexpected(rest, "after Insert"));
    }

    let document = cx.take_param(cursor, words)?;
    let shape_ok = match mode {
        OperateMode::One => document.ty.is_pointer(),
        OperateMode::Many => document.ty.is_slice(),
    };
    if !shape_ok {
        let shape = match mode {
            OperateMode::One => "a pointer",
            OperateMode::Many => "a slice",
        };
        return Err(cx.type_error_at(
            format!(
                "Insert {} requires {}, but {} is {}",
                mode.as_str(),
                shape,
                document.name,
                document.ty
            ),
            words,
        ));
    }

    Ok(InsertOp {
        method: cx.method.name.clone(),
        mode,
        ctx_param: None,
        document_param: document.name.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, TargetConfig};
    use descry_ast::{MethodContract, StructSchema, TypeRef};
    use descry_lexer::tokenize;

    fn ty(source: &str) -> TypeRef {
        TypeRef::parse(source).unwrap()
    }

    fn insert_one() -> MethodContract {
        MethodContract::new("InsertOne")
            .param("ctx", ty("context.Context"))
            .param("user", ty("*model.User"))
            .returns(ty("interface{}"))
            .returns(ty("error"))
    }

    #[test]
    fn test_standalone_consumes_both_params() {
        let method = insert_one();
        let schema = StructSchema::new("User");
        let config = TargetConfig::default();
        let cx = MethodContext::new(&method, &schema, &config);
        let mut cursor = ParamCursor::new(&method.params);

        let op = parse_insert(&cx, &tokenize("One"), &mut cursor, Invocation::Standalone).unwrap();
        assert_eq!(op.mode, OperateMode::One);
        assert_eq!(op.ctx_param.as_deref(), Some("ctx"));
        assert_eq!(op.document_param, "user");
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_standalone_written_mode_must_agree() {
        let method = insert_one();
        let schema = StructSchema::new("User");
        let config = TargetConfig::default();
        let cx = MethodContext::new(&method, &schema, &config);

        let mut cursor = ParamCursor::new(&method.params);
        let err = parse_insert(&cx, &tokenize("Many"), &mut cursor, Invocation::Standalone).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);

        let mut cursor = ParamCursor::new(&method.params);
        let err =
            parse_insert(&cx, &tokenize("OneByName"), &mut cursor, Invocation::Standalone).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Grammar);
    }

    #[test]
    fn test_nested_checks_shape() {
        let method = MethodContract::new("BulkInsertOneInsertMany")
            .param("ctx", ty("context.Context"))
            .param("user", ty("*model.User"))
            .param("users", ty("[]*model.User"));
        let schema = StructSchema::new("User");
        let config = TargetConfig::default();
        let cx = MethodContext::new(&method, &schema, &config);

        let mut cursor = ParamCursor::at(&method.params, 1);
        let op = parse_insert(&cx, &tokenize("One"), &mut cursor, Invocation::Nested).unwrap();
        assert_eq!(op.ctx_param, None);
        let op = parse_insert(&cx, &tokenize("Many"), &mut cursor, Invocation::Nested).unwrap();
        assert_eq!(op.document_param, "users");

        let mut cursor = ParamCursor::at(&method.params, 2);
        let err = parse_insert(&cx, &tokenize("One"), &mut cursor, Invocation::Nested).unwrap_err();
        assert!(err.message.contains("requires a pointer"));

        let err = parse_insert(&cx, &[], &mut cursor, Invocation::Nested).unwrap_err();
        assert_eq!(err.message, "'Insert' should be followed by One or Many");
    }
}
