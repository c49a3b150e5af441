//! `Transaction {[Collection <Alias>] Insert|Update|Delete|Bulk Lb ... Rb}+`
//!
//! Parameters after the client handle that have the collection type are
//! extra resources. Each is addressable as `Collection <Alias>`, the alias
//! being the parameter name with separators dropped and each segment's
//! first letter upper-cased.

use descry_ast::{CollectionParam, Resource, TransactionOp, TransactionOperation, TransactionStep};
use descry_lexer::{Keyword, Word};

use crate::bulk::{next_operation_index, parse_bulk};
use crate::delete::parse_delete;
use crate::insert::parse_insert;
use crate::signature::check_transaction;
use crate::update::parse_update;
use crate::{ErrorKind, Invocation, MethodContext, MethodSyntaxError, ParamCursor};

type Result<T> = std::result::Result<T, MethodSyntaxError>;

const UNSUPPORTED: &str =
    "the Transaction operation does not support Find, Count, Transaction, only supports Insert, Update, Delete, Bulk";

/// Descriptor spelling of a collection parameter: separators are dropped
/// and each remaining segment starts upper-case (`audit_log` is `AuditLog`)
fn alias(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .flat_map(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .map(|first| first.to_ascii_uppercase())
                .into_iter()
                .chain(chars)
        })
        .collect()
}

/// Parse the words following `Transaction`
pub fn parse_transaction<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<TransactionOp> {
    check_transaction(cx)?;
    let ctx = cx.take_context(cursor)?;
    let client = cx.take_param(cursor, words)?.name.clone();

    let mut collections = Vec::new();
    while let Some(param) = cursor.peek() {
        if param.ty != cx.config.collection_type {
            break;
        }
        cursor.take_one();
        collections.push(CollectionParam {
            alias: alias(&param.name),
            param: param.name.clone(),
        });
    }

    let mut steps = Vec::new();
    let mut index = 0;
    while index < words.len() {
        let word = &words[index];
        let (step, next) = match word.keyword() {
            Some(Keyword::Insert | Keyword::Update | Keyword::Delete | Keyword::Bulk) => {
                parse_step(cx, words, index, cursor, Resource::Primary)?
            }
            Some(Keyword::Collection) => {
                let (resource, op_at) = collection_prefix(cx, words, index, &collections)?;
                parse_step(cx, words, op_at, cursor, resource)?
            }
            Some(Keyword::Find | Keyword::Count | Keyword::Transaction) => {
                return Err(cx.grammar_at(UNSUPPORTED, &words[index..=index]));
            }
            _ => {
                let end = next_operation_index(words, index + 1);
                return Err(cx.unexpected(
                    &words[index..end],
                    "in Transaction, expected Insert, Update, Delete, Bulk or Collection",
                ));
            }
        };
        steps.push(step);
        index = next;
    }

    if steps.is_empty() {
        return Err(cx.grammar_at(
            "the Transaction operation contains no Insert, Update, Delete or Bulk",
            words,
        ));
    }
    cx.ensure_exhausted(cursor)?;

    tracing::trace!(method = %cx.method.name, steps = steps.len(), "parsed transaction");
    Ok(TransactionOp {
        method: cx.method.name.clone(),
        ctx_param: ctx,
        client_param: client,
        collections,
        steps,
    })
}

/// Resolve `Collection <Alias words>` at `index`; returns the resource and
/// the index of the operation keyword that follows the alias
fn collection_prefix(
    cx: &MethodContext<'_>,
    words: &[Word],
    index: usize,
    collections: &[CollectionParam],
) -> Result<(Resource, usize)> {
    if index + 1 == words.len() {
        return Err(cx.grammar_at("no tokens specified after Collection", &words[index..]));
    }

    let op_at = next_operation_index(words, index + 1);
    match words.get(op_at).and_then(Word::keyword) {
        Some(Keyword::Insert | Keyword::Update | Keyword::Delete | Keyword::Bulk) => {}
        Some(Keyword::Find | Keyword::Count | Keyword::Transaction) => {
            return Err(cx.grammar_at(UNSUPPORTED, &words[op_at..=op_at]));
        }
        _ => {
            return Err(cx.grammar_at(
                "there is no Insert, Update, Delete, Bulk tokens after the Collection",
                &words[index..op_at],
            ));
        }
    }
    if op_at == index + 1 {
        return Err(cx.grammar_at(
            "no collection name specified after Collection",
            &words[index..=index],
        ));
    }

    let name_words = &words[index + 1..op_at];
    let name: String = name_words.iter().map(Word::as_str).collect();
    let Some(collection) = collections.iter().find(|c| c.alias == name) else {
        return Err(cx
            .error(
                ErrorKind::Resolution,
                format!(
                    "the collection name {} specified in tokens was not found in the method parameters",
                    name
                ),
            )
            .with_span(descry_lexer::span_of(name_words)));
    };

    Ok((Resource::Param(collection.param.clone()), op_at))
}

/// Parse one operation starting at `at`; returns the step and the index
/// just past it
fn parse_step<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    at: usize,
    cursor: &mut ParamCursor<'a>,
    resource: Resource,
) -> Result<(TransactionStep, usize)> {
    let (operation, next) = match words[at].keyword() {
        Some(Keyword::Insert) => {
            let end = (at + 2).min(words.len());
            let op = parse_insert(cx, &words[at + 1..end], cursor, Invocation::Nested)?;
            (TransactionOperation::Insert(op), end)
        }
        Some(Keyword::Update) => {
            let end = next_operation_index(words, at + 1);
            let op = parse_update(cx, &words[at + 1..end], cursor, Invocation::Nested)?;
            (TransactionOperation::Update(op), end)
        }
        Some(Keyword::Delete) => {
            let end = next_operation_index(words, at + 1);
            let op = parse_delete(cx, &words[at + 1..end], cursor, Invocation::Nested)?;
            (TransactionOperation::Delete(op), end)
        }
        _ => {
            let close = bulk_block(cx, words, at)?;
            let op = parse_bulk(cx, &words[at + 2..close], cursor, Invocation::Nested)?;
            (TransactionOperation::Bulk(op), close + 1)
        }
    };

    Ok((TransactionStep { resource, operation }, next))
}

/// `Bulk Lb ... Rb`: index of the `Rb` matching the `Lb` after `Bulk`
fn bulk_block(cx: &MethodContext<'_>, words: &[Word], at: usize) -> Result<usize> {
    if !words.get(at + 1).is_some_and(|w| w.is(Keyword::Lb)) {
        return Err(cx.grammar_at(
            "parentheses need to be specified after Transaction Bulk operation",
            &words[at..=at],
        ));
    }

    let mut depth = 0usize;
    for (index, word) in words.iter().enumerate().skip(at + 1) {
        if word.is(Keyword::Lb) {
            depth += 1;
        } else if word.is(Keyword::Rb) {
            depth -= 1;
            if depth == 0 {
                return Ok(index);
            }
        }
    }

    Err(cx.grammar_at(
        "the Transaction Bulk operation did not specify a right parenthesis",
        &words[at..],
    ))
}
