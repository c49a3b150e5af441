//! Operation records produced for each compiled method

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Query, TypeRef};

/// Whether an operation targets a single document or many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperateMode {
    One,
    Many,
}

impl OperateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            OperateMode::One => "One",
            OperateMode::Many => "Many",
        }
    }
}

/// Closed set of operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Insert,
    Find,
    Update,
    Delete,
    Count,
    Transaction,
    Bulk,
}

impl OperationKind {
    pub const ALL: [OperationKind; 7] = [
        OperationKind::Insert,
        OperationKind::Find,
        OperationKind::Update,
        OperationKind::Delete,
        OperationKind::Count,
        OperationKind::Transaction,
        OperationKind::Bulk,
    ];

    /// Descriptor keyword introducing this kind
    pub fn keyword(self) -> &'static str {
        match self {
            OperationKind::Insert => "Insert",
            OperationKind::Find => "Find",
            OperationKind::Update => "Update",
            OperationKind::Delete => "Delete",
            OperationKind::Count => "Count",
            OperationKind::Transaction => "Transaction",
            OperationKind::Bulk => "Bulk",
        }
    }

    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == word)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The compiled form of one method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Insert(InsertOp),
    Find(FindOp),
    Update(UpdateOp),
    Delete(DeleteOp),
    Count(CountOp),
    Transaction(TransactionOp),
    Bulk(BulkOp),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Insert(_) => OperationKind::Insert,
            Operation::Find(_) => OperationKind::Find,
            Operation::Update(_) => OperationKind::Update,
            Operation::Delete(_) => OperationKind::Delete,
            Operation::Count(_) => OperationKind::Count,
            Operation::Transaction(_) => OperationKind::Transaction,
            Operation::Bulk(_) => OperationKind::Bulk,
        }
    }

    /// Name of the method this operation was compiled from
    pub fn method(&self) -> &str {
        match self {
            Operation::Insert(op) => &op.method,
            Operation::Find(op) => &op.method,
            Operation::Update(op) => &op.method,
            Operation::Delete(op) => &op.method,
            Operation::Count(op) => &op.method,
            Operation::Transaction(op) => &op.method,
            Operation::Bulk(op) => &op.method,
        }
    }
}

/// `Insert One|Many`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertOp {
    pub method: String,
    pub mode: OperateMode,
    /// Context parameter; absent when nested in a Bulk or Transaction
    pub ctx_param: Option<String>,
    /// Parameter holding the document(s) to insert
    pub document_param: String,
}

/// `Find [projection] [Order ...] [Skip] [Limit] By|All`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindOp {
    pub method: String,
    pub mode: OperateMode,
    pub ctx_param: String,
    /// First return type, the shape codegen decodes into
    pub return_type: TypeRef,
    /// Storage keys of projected fields; empty means the whole document
    pub projection: Vec<String>,
    /// Sort keys in clause order
    pub sort: Vec<SortField>,
    pub skip_param: Option<String>,
    pub limit_param: Option<String>,
    pub query: Query,
}

impl FindOp {
    pub fn ascending(&self) -> impl Iterator<Item = &str> {
        self.sort_keys(SortDirection::Asc)
    }

    pub fn descending(&self) -> impl Iterator<Item = &str> {
        self.sort_keys(SortDirection::Desc)
    }

    fn sort_keys(&self, direction: SortDirection) -> impl Iterator<Item = &str> {
        self.sort
            .iter()
            .filter(move |s| s.direction == direction)
            .map(|s| s.key.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub key: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// `Update [Upsert] [fields...] By|All`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOp {
    pub method: String,
    pub mode: OperateMode,
    pub ctx_param: Option<String>,
    pub upsert: bool,
    pub payload: UpdatePayload,
    pub query: Query,
}

/// What an update writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdatePayload {
    /// Replace with the whole entity held by this parameter
    Document(String),
    /// Set individual fields from individual parameters
    Fields(Vec<FieldBinding>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    /// Dotted storage key path
    pub field: String,
    pub param: String,
}

/// `Delete By|All`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOp {
    pub method: String,
    pub mode: OperateMode,
    pub ctx_param: Option<String>,
    pub query: Query,
}

/// `Count By|All`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountOp {
    pub method: String,
    pub ctx_param: String,
    pub query: Query,
}

/// Ordered batch of writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOp {
    pub method: String,
    /// Context parameter; absent when nested in a Transaction
    pub ctx_param: Option<String>,
    pub operations: Vec<BulkOperation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulkOperation {
    Insert(InsertOp),
    Update(UpdateOp),
    Delete(DeleteOp),
}

impl BulkOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            BulkOperation::Insert(_) => OperationKind::Insert,
            BulkOperation::Update(_) => OperationKind::Update,
            BulkOperation::Delete(_) => OperationKind::Delete,
        }
    }

    pub fn mode(&self) -> OperateMode {
        match self {
            BulkOperation::Insert(op) => op.mode,
            BulkOperation::Update(op) => op.mode,
            BulkOperation::Delete(op) => op.mode,
        }
    }
}

/// Writes executed inside one session transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOp {
    pub method: String,
    pub ctx_param: String,
    /// Client/session handle parameter
    pub client_param: String,
    /// Extra collection handles, addressable through `Collection <Alias>`
    pub collections: Vec<CollectionParam>,
    pub steps: Vec<TransactionStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionParam {
    /// Upper-cased alias used in descriptors (`UserColl`)
    pub alias: String,
    /// Parameter name (`userColl`)
    pub param: String,
}

/// Which collection a transaction step writes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resource {
    /// The repository's own collection
    Primary,
    /// A collection handle passed as this parameter
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStep {
    pub resource: Resource,
    pub operation: TransactionOperation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionOperation {
    Insert(InsertOp),
    Update(UpdateOp),
    Delete(DeleteOp),
    Bulk(BulkOp),
}

impl TransactionOperation {
    pub fn kind(&self) -> OperationKind {
        match self {
            TransactionOperation::Insert(_) => OperationKind::Insert,
            TransactionOperation::Update(_) => OperationKind::Update,
            TransactionOperation::Delete(_) => OperationKind::Delete,
            TransactionOperation::Bulk(_) => OperationKind::Bulk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_roundtrip() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(OperationKind::from_keyword("Upsert"), None);
    }

    #[test]
    fn test_sort_views_keep_clause_order() {
        let find = FindOp {
            method: "FindAll".into(),
            mode: OperateMode::Many,
            ctx_param: "ctx".into(),
            return_type: TypeRef::parse("[]*model.User").unwrap(),
            projection: vec![],
            sort: vec![
                SortField { key: "age".into(), direction: SortDirection::Desc },
                SortField { key: "name".into(), direction: SortDirection::Asc },
                SortField { key: "id".into(), direction: SortDirection::Desc },
            ],
            skip_param: None,
            limit_param: None,
            query: Query::All,
        };
        assert_eq!(find.descending().collect::<Vec<_>>(), vec!["age", "id"]);
        assert_eq!(find.ascending().collect::<Vec<_>>(), vec!["name"]);
    }
}
