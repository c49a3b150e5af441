//! `Bulk {Insert One | Update One|Many ... | Delete One|Many ...}+`

use descry_ast::{BulkOp, BulkOperation};
use descry_lexer::{Keyword, Word};

use crate::delete::parse_delete;
use crate::insert::parse_insert;
use crate::signature::check_bulk;
use crate::update::parse_update;
use crate::{Invocation, MethodContext, MethodSyntaxError, ParamCursor};

const UNSUPPORTED: &str =
    "the Bulk operation does not support Find, Count, Bulk, Transaction, only supports Insert, Update, Delete";

/// Index of the first operation keyword or `Collection` at or after `from`
pub(crate) fn next_operation_index(words: &[Word], from: usize) -> usize {
    words
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, w)| {
            w.keyword()
                .map(|k| k.is_operation() || k == Keyword::Collection)
                .unwrap_or(false)
        })
        .map(|(index, _)| index)
        .unwrap_or(words.len())
}

/// Parse the words following `Bulk`
///
/// Nested inside a Transaction, no context parameter is consumed and the
/// caller is responsible for leftover parameters.
pub fn parse_bulk<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
    invocation: Invocation,
) -> Result<BulkOp, MethodSyntaxError> {
    let ctx_param = match invocation {
        Invocation::Standalone => {
            check_bulk(cx)?;
            Some(cx.take_context(cursor)?)
        }
        Invocation::Nested => None,
    };

    let mut operations = Vec::new();
    let mut index = 0;
    while index < words.len() {
        let word = &words[index];
        match word.keyword() {
            Some(Keyword::Insert) => {
                match words.get(index + 1) {
                    Some(mode) if mode.is(Keyword::One) => {}
                    Some(mode) if mode.is(Keyword::Many) => {
                        return Err(cx.grammar_at(
                            "the Bulk operation does not support Insert Many, only supports Insert One",
                            &words[index..index + 2],
                        ));
                    }
                    _ => {
                        return Err(cx.grammar_at(
                            "Insert should be followed by One",
                            &words[index..=index],
                        ));
                    }
                }
                let op = parse_insert(cx, &words[index + 1..index + 2], cursor, Invocation::Nested)?;
                operations.push(BulkOperation::Insert(op));
                index += 2;
            }
            Some(Keyword::Update) => {
                let end = next_operation_index(words, index + 1);
                let op = parse_update(cx, &words[index + 1..end], cursor, Invocation::Nested)?;
                operations.push(BulkOperation::Update(op));
                index = end;
            }
            Some(Keyword::Delete) => {
                let end = next_operation_index(words, index + 1);
                let op = parse_delete(cx, &words[index + 1..end], cursor, Invocation::Nested)?;
                operations.push(BulkOperation::Delete(op));
                index = end;
            }
            Some(Keyword::Find | Keyword::Count | Keyword::Bulk | Keyword::Transaction) => {
                return Err(cx.grammar_at(UNSUPPORTED, &words[index..=index]));
            }
            _ => {
                let end = next_operation_index(words, index + 1);
                return Err(cx.unexpected(&words[index..end], "in Bulk, expected Insert, Update or Delete"));
            }
        }
    }

    if operations.is_empty() {
        return Err(cx.grammar_at(
            "the Bulk operation contains no Insert, Update or Delete",
            words,
        ));
    }
    if invocation == Invocation::Standalone {
        cx.ensure_exhausted(cursor)?;
    }

    tracing::trace!(method = %cx.method.name, operations = operations.len(), "parsed bulk");
    Ok(BulkOp {
        method: cx.method.name.clone(),
        ctx_param,
        operations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, TargetConfig};
    use descry_ast::{Field, MethodContract, OperateMode, OperationKind, StructSchema, TypeRef};
    use descry_lexer::tokenize;

    fn ty(source: &str) -> TypeRef {
        TypeRef::parse(source).unwrap()
    }

    fn run(method: &MethodContract) -> Result<BulkOp, MethodSyntaxError> {
        let schema = StructSchema::new("User")
            .with_field(Field::new("Name", "name", ty("string")))
            .with_field(Field::new("Age", "age", ty("int")));
        let config = TargetConfig::default();
        let cx = MethodContext::new(method, &schema, &config);
        let words = tokenize(&method.descriptor);
        let mut cursor = ParamCursor::new(&method.params);
        parse_bulk(&cx, &words[1..], &mut cursor, Invocation::Standalone)
    }

    fn bulk(descriptor: &str) -> MethodContract {
        MethodContract::new(descriptor)
            .param("ctx", ty("context.Context"))
            .returns(ty("*mongo.BulkWriteResult"))
            .returns(ty("error"))
    }

    #[test]
    fn test_sequence_in_order() {
        let method = bulk("BulkInsertOneUpdateManyAgeByNameEqualDeleteOneAll")
            .param("user", ty("*model.User"))
            .param("age", ty("int"))
            .param("name", ty("string"));
        let op = run(&method).unwrap();

        let shape: Vec<_> = op.operations.iter().map(|o| (o.kind(), o.mode())).collect();
        assert_eq!(
            shape,
            vec![
                (OperationKind::Insert, OperateMode::One),
                (OperationKind::Update, OperateMode::Many),
                (OperationKind::Delete, OperateMode::One),
            ]
        );
        assert_eq!(op.ctx_param.as_deref(), Some("ctx"));
    }

    #[test]
    fn test_find_rejected() {
        let method = bulk("BulkInsertOneFindByNameEqual")
            .param("user", ty("*model.User"))
            .param("name", ty("string"));
        let err = run(&method).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Grammar);
        assert_eq!(err.method, "BulkInsertOneFindByNameEqual");
        assert_eq!(err.message, UNSUPPORTED);
    }

    #[test]
    fn test_insert_many_rejected() {
        let method = bulk("BulkInsertMany").param("users", ty("[]*model.User"));
        let err = run(&method).unwrap_err();
        assert!(err.message.contains("does not support Insert Many"));

        let err = run(&bulk("BulkInsert")).unwrap_err();
        assert_eq!(err.message, "Insert should be followed by One");
    }

    #[test]
    fn test_empty_and_stray() {
        let err = run(&bulk("Bulk")).unwrap_err();
        assert!(err.message.contains("contains no Insert, Update or Delete"));

        let err = run(&bulk("BulkNameInsertOne")).unwrap_err();
        assert!(err.message.starts_with("unexpected tokens [Name]"));
    }

    #[test]
    fn test_next_operation_index() {
        let words = tokenize("UpdateOneNameAllCollectionXDeleteOne");
        assert_eq!(next_operation_index(&words, 1), 4);
        assert_eq!(next_operation_index(&words, 5), 6);
        assert_eq!(next_operation_index(&words, 7), words.len());
    }
}
