//! descry Parser - Method descriptor compiler
//!
//! Compiles one method at a time: the descriptor is tokenized, its first
//! word selects the operation kind, the kind's signature contract is
//! checked, and the remaining words are parsed by that kind's grammar while
//! a [`ParamCursor`] binds method parameters strictly left to right.
//!
//! Methods are independent of each other, so an interface's methods are
//! compiled in parallel; results keep method order.

mod error;
mod config;
mod cursor;
mod context;
mod resolve;
mod signature;
mod comparator;
mod query;
mod insert;
mod find;
mod update;
mod delete;
mod count;
mod bulk;
mod transaction;

pub use error::*;
pub use config::*;
pub use cursor::*;
pub use context::*;
pub use resolve::{resolve_path, resolve_paths, FieldPath};
pub use comparator::{match_suffix, parse_condition};
pub use query::{check_balance, parse_query, split_legacy, split_nested, Split};
pub use insert::parse_insert;
pub use find::parse_find;
pub use update::parse_update;
pub use delete::parse_delete;
pub use count::parse_count;
pub use bulk::parse_bulk;
pub use transaction::parse_transaction;

use descry_ast::{Interface, InterfaceFile, MethodContract, Operation, OperationKind, StructSchema};
use descry_lexer::tokenize;
use rayon::prelude::*;
use serde::Serialize;

/// Compile one method against its entity schema
pub fn compile_method(
    method: &MethodContract,
    schema: &StructSchema,
    config: &TargetConfig,
) -> Result<Operation, MethodSyntaxError> {
    let cx = MethodContext::new(method, schema, config);
    let words = tokenize(&method.descriptor);

    let Some((first, rest)) = words.split_first() else {
        return Err(cx.grammar("the method descriptor is empty"));
    };
    let Some(kind) = OperationKind::from_keyword(first.as_str()) else {
        return Err(cx.grammar_at(
            "wrong operation name, should be Insert, Find, Update, Delete, Count, Transaction, Bulk",
            std::slice::from_ref(first),
        ));
    };

    tracing::debug!(method = %method.name, kind = %kind, "compiling method");

    let mut cursor = ParamCursor::new(&method.params);
    let standalone = Invocation::Standalone;
    let operation = match kind {
        OperationKind::Insert => Operation::Insert(parse_insert(&cx, rest, &mut cursor, standalone)?),
        OperationKind::Find => Operation::Find(parse_find(&cx, rest, &mut cursor)?),
        OperationKind::Update => Operation::Update(parse_update(&cx, rest, &mut cursor, standalone)?),
        OperationKind::Delete => Operation::Delete(parse_delete(&cx, rest, &mut cursor, standalone)?),
        OperationKind::Count => Operation::Count(parse_count(&cx, rest, &mut cursor)?),
        OperationKind::Transaction => Operation::Transaction(parse_transaction(&cx, rest, &mut cursor)?),
        OperationKind::Bulk => Operation::Bulk(parse_bulk(&cx, rest, &mut cursor, standalone)?),
    };

    Ok(operation)
}

/// Results for one interface, one per method in declaration order
#[derive(Debug, Clone, Serialize)]
pub struct CompiledInterface {
    pub name: String,
    pub results: Vec<Result<Operation, MethodSyntaxError>>,
}

impl CompiledInterface {
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = &MethodSyntaxError> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    pub fn is_ok(&self) -> bool {
        self.results.iter().all(Result::is_ok)
    }
}

/// Compile every method of an interface; a failing method does not affect
/// the others
pub fn compile_interface(interface: &Interface, config: &TargetConfig) -> CompiledInterface {
    let results = interface
        .methods
        .par_iter()
        .map(|method| compile_method(method, &interface.schema, config))
        .collect();

    CompiledInterface {
        name: interface.name.clone(),
        results,
    }
}

/// Compile every interface of an input file
pub fn compile_interfaces(file: &InterfaceFile, config: &TargetConfig) -> Vec<CompiledInterface> {
    file.interfaces
        .iter()
        .map(|interface| compile_interface(interface, config))
        .collect()
}
