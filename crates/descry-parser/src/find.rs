//! `Find [projection] {Order ... | Skip | Limit | By ... | All}`
//!
//! The projection runs up to the first clause keyword. Clauses are
//! delimited by `Order`, `Skip`, `Limit`, `By` and `All`, may come in any
//! order, and are processed left to right so parameters bind in the order
//! the descriptor mentions them.

use descry_ast::{FindOp, OperateMode, Query, SortDirection, SortField};
use descry_lexer::{Keyword, Word};

use crate::query::parse_query;
use crate::resolve::resolve_paths;
use crate::signature::check_find;
use crate::{MethodContext, MethodSyntaxError, ParamCursor};

type Result<T> = std::result::Result<T, MethodSyntaxError>;

fn starts_clause(word: &Word) -> bool {
    matches!(
        word.keyword(),
        Some(Keyword::Order | Keyword::Skip | Keyword::Limit | Keyword::By | Keyword::All)
    )
}

/// Split `words` into runs each beginning with a clause keyword
fn clauses(words: &[Word]) -> Vec<&[Word]> {
    let mut out = Vec::new();
    let mut start = 0;
    for (index, word) in words.iter().enumerate().skip(1) {
        if starts_clause(word) {
            out.push(&words[start..index]);
            start = index;
        }
    }
    if start < words.len() {
        out.push(&words[start..]);
    }
    out
}

/// Parse the words following `Find`
pub fn parse_find<'a>(
    cx: &MethodContext<'a>,
    words: &[Word],
    cursor: &mut ParamCursor<'a>,
) -> Result<FindOp> {
    let mode = check_find(cx)?;
    let ctx = cx.take_context(cursor)?;
    cx.query_index(words)?;

    let projection_end = words.iter().position(starts_clause).unwrap_or(words.len());
    let projection = if projection_end == 0 {
        Vec::new()
    } else {
        resolve_paths(cx.schema, &words[..projection_end])
            .map_err(|e| cx.resolution(e))?
            .into_iter()
            .map(|p| p.key)
            .collect()
    };

    let mut sort: Option<Vec<SortField>> = None;
    let mut skip_param = None;
    let mut limit_param = None;
    let mut query: Option<Query> = None;

    for clause in clauses(&words[projection_end..]) {
        let (head, body) = match clause.split_first() {
            Some(split) => split,
            None => continue,
        };

        match head.keyword() {
            Some(Keyword::Order) => {
                if sort.is_some() {
                    return Err(cx.grammar_at("Order can only be used once", clause));
                }
                if body.is_empty() {
                    return Err(cx.grammar_at("there are no sorted fields after the Order", clause));
                }
                sort = Some(parse_sort(cx, body)?);
            }
            Some(Keyword::Skip) => {
                if skip_param.is_some() {
                    return Err(cx.grammar_at("Skip can only be used once", clause));
                }
                skip_param = Some(paging_param(cx, clause, cursor, "Skip")?);
            }
            Some(Keyword::Limit) => {
                if mode == OperateMode::One {
                    return Err(cx.grammar_at(
                        "Limit operation is not supported in Find One mode",
                        clause,
                    ));
                }
                if limit_param.is_some() {
                    return Err(cx.grammar_at("Limit can only be used once", clause));
                }
                limit_param = Some(paging_param(cx, clause, cursor, "Limit")?);
            }
            _ => {
                if query.is_some() {
                    return Err(cx.grammar_at("By or All can only be used once", clause));
                }
                query = Some(parse_query(cx, clause, cursor)?);
            }
        }
    }

    // query_index above guarantees a query clause
    let query = query.ok_or_else(|| cx.grammar("no By or All specified"))?;
    cx.ensure_exhausted(cursor)?;

    Ok(FindOp {
        method: cx.method.name.clone(),
        mode,
        ctx_param: ctx,
        return_type: cx.method.returns[0].clone(),
        projection,
        sort: sort.unwrap_or_default(),
        skip_param,
        limit_param,
        query,
    })
}

/// `Skip`/`Limit` stand alone and bind one paging parameter
fn paging_param<'a>(
    cx: &MethodContext<'a>,
    clause: &[Word],
    cursor: &mut ParamCursor<'a>,
    option: &str,
) -> Result<String> {
    if clause.len() > 1 {
        return Err(cx.unexpected(&clause[1..], &format!("after {}", option)));
    }

    let param = cx.take_param(cursor, clause)?;
    if param.ty != cx.config.paging_type {
        return Err(cx.type_error_at(
            format!(
                "{} requires passing in a value of type {}, but {} is {}",
                option, cx.config.paging_type, param.name, param.ty
            ),
            clause,
        ));
    }
    Ok(param.name.clone())
}

/// Sort fields of an `Order` clause
///
/// Each `Desc` marks the path just before it descending; every other path
/// is ascending. Clause order is preserved.
fn parse_sort(cx: &MethodContext<'_>, words: &[Word]) -> Result<Vec<SortField>> {
    let mut fields = Vec::new();
    let mut start = 0;

    for (index, word) in words.iter().enumerate() {
        if !word.is(Keyword::Desc) {
            continue;
        }
        let segment = &words[start..index];
        if segment.is_empty() {
            return Err(cx.grammar_at("no field to be specified before Desc", &words[index..=index]));
        }

        let paths = resolve_paths(cx.schema, segment).map_err(|e| cx.resolution(e))?;
        let last = paths.len() - 1;
        fields.extend(paths.into_iter().enumerate().map(|(i, path)| SortField {
            key: path.key,
            direction: if i == last {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        }));
        start = index + 1;
    }

    if start < words.len() {
        let paths = resolve_paths(cx.schema, &words[start..]).map_err(|e| cx.resolution(e))?;
        fields.extend(paths.into_iter().map(|path| SortField {
            key: path.key,
            direction: SortDirection::Asc,
        }));
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, TargetConfig};
    use descry_ast::{Comparator, Field, MethodContract, StructSchema, TypeRef};
    use descry_lexer::tokenize;

    fn ty(source: &str) -> TypeRef {
        TypeRef::parse(source).unwrap()
    }

    fn schema() -> StructSchema {
        StructSchema::new("User")
            .with_field(Field::new("Name", "name", ty("string")))
            .with_field(Field::new("NameHello", "name_hello", ty("string")))
            .with_field(Field::new("Age", "age", ty("int")))
            .with_field(Field::new("ID", "_id", ty("string")))
    }

    fn run(method: &MethodContract) -> Result<FindOp> {
        let schema = schema();
        let config = TargetConfig::default();
        let cx = MethodContext::new(method, &schema, &config);
        let words = tokenize(&method.descriptor);
        let mut cursor = ParamCursor::new(&method.params);
        // Skip the leading `Find`
        parse_find(&cx, &words[1..], &mut cursor)
    }

    #[test]
    fn test_options_after_query() {
        let method = MethodContract::new("FindByAgeGreaterThanEqualOrderNameDescSkipLimit")
            .param("ctx", ty("context.Context"))
            .param("age", ty("int"))
            .param("skip", ty("int64"))
            .param("limit", ty("int64"))
            .returns(ty("[]*model.User"))
            .returns(ty("error"));
        let op = run(&method).unwrap();

        assert_eq!(op.mode, OperateMode::Many);
        assert_eq!(op.descending().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(op.skip_param.as_deref(), Some("skip"));
        assert_eq!(op.limit_param.as_deref(), Some("limit"));
        let condition = op.query.expr().unwrap().conditions()[0].clone();
        assert_eq!(condition.comparator, Comparator::GreaterThanEqual);
        assert_eq!(condition.params, vec!["age"]);
    }

    #[test]
    fn test_projection_and_sort_directions() {
        let method = MethodContract::new("FindNameAgeOrderAgeNameHelloDescIDAll")
            .param("ctx", ty("context.Context"))
            .returns(ty("[]*model.User"))
            .returns(ty("error"));
        let op = run(&method).unwrap();

        assert_eq!(op.projection, vec!["name", "age"]);
        assert_eq!(
            op.sort,
            vec![
                SortField { key: "age".into(), direction: SortDirection::Asc },
                SortField { key: "name_hello".into(), direction: SortDirection::Desc },
                SortField { key: "_id".into(), direction: SortDirection::Asc },
            ]
        );
        assert_eq!(op.query, Query::All);
    }

    #[test]
    fn test_limit_forbidden_in_one_mode() {
        let method = MethodContract::new("FindLimitAll")
            .param("ctx", ty("context.Context"))
            .param("limit", ty("int64"))
            .returns(ty("*model.User"))
            .returns(ty("error"));
        let err = run(&method).unwrap_err();
        assert_eq!(err.message, "Limit operation is not supported in Find One mode");
    }

    #[test]
    fn test_clause_errors() {
        let base = |descriptor: &str| {
            MethodContract::new(descriptor)
                .param("ctx", ty("context.Context"))
                .param("skip", ty("int"))
                .returns(ty("[]*model.User"))
                .returns(ty("error"))
        };

        let err = run(&base("FindSkipAll")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.starts_with("Skip requires passing in a value of type int64"));

        let err = run(&base("FindOrderNameOrderAgeAll")).unwrap_err();
        assert_eq!(err.message, "Order can only be used once");

        let err = run(&base("FindOrderDescAll")).unwrap_err();
        assert_eq!(err.message, "no field to be specified before Desc");

        let err = run(&base("FindOrderAll")).unwrap_err();
        assert_eq!(err.message, "there are no sorted fields after the Order");

        let err = run(&base("FindName")).unwrap_err();
        assert_eq!(err.message, "no By or All specified");

        let paging = |descriptor: &str| {
            MethodContract::new(descriptor)
                .param("ctx", ty("context.Context"))
                .param("page", ty("int64"))
                .returns(ty("[]*model.User"))
                .returns(ty("error"))
        };

        let err = run(&paging("FindSkipSkipAll")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Grammar);
        assert_eq!(err.message, "Skip can only be used once");

        let err = run(&paging("FindLimitLimitAll")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Grammar);
        assert_eq!(err.message, "Limit can only be used once");

        let err = run(&paging("FindSkipNameAll")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Grammar);
        assert!(err.message.starts_with("unexpected tokens [Name] after Skip"));

        let bare = MethodContract::new("FindSkipAll")
            .param("ctx", ty("context.Context"))
            .returns(ty("[]*model.User"))
            .returns(ty("error"));
        let err = run(&bare).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Signature);
        assert_eq!(err.message, "insufficient number of input parameters");
    }

    #[test]
    fn test_leftover_params_rejected() {
        let method = MethodContract::new("FindByNameEqual")
            .param("ctx", ty("context.Context"))
            .param("name", ty("string"))
            .param("extra", ty("string"))
            .returns(ty("*model.User"))
            .returns(ty("error"));
        let err = run(&method).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Grammar);
        assert!(err.message.starts_with("too many method parameters written, extra"));
    }
}
