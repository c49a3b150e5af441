//! Target driver configuration
//!
//! Signature contracts compare parameter and return types against these
//! surface types. The defaults describe the official Go MongoDB driver.

use descry_ast::TypeRef;
use serde::{Deserialize, Serialize};

/// Surface types and grammar switches for one compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// First parameter of every method
    pub context_type: TypeRef,
    pub error_type: TypeRef,
    /// Second parameter of a Transaction
    pub client_type: TypeRef,
    /// Extra collection handles accepted by a Transaction
    pub collection_type: TypeRef,
    pub bulk_result_type: TypeRef,
    pub insert_one_result: TypeRef,
    pub insert_many_result: TypeRef,
    /// Update/Delete result selecting One mode
    pub one_result: TypeRef,
    /// Update/Delete result selecting Many mode
    pub many_result: TypeRef,
    pub count_result: TypeRef,
    /// Type of Skip and Limit parameters
    pub paging_type: TypeRef,
    pub split_strategy: SplitStrategy,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            context_type: TypeRef::selector("context", "Context"),
            error_type: TypeRef::ident("error"),
            client_type: TypeRef::pointer(TypeRef::selector("mongo", "Client")),
            collection_type: TypeRef::pointer(TypeRef::selector("mongo", "Collection")),
            bulk_result_type: TypeRef::pointer(TypeRef::selector("mongo", "BulkWriteResult")),
            insert_one_result: TypeRef::Interface,
            insert_many_result: TypeRef::slice(TypeRef::Interface),
            one_result: TypeRef::ident("bool"),
            many_result: TypeRef::ident("int"),
            count_result: TypeRef::ident("int"),
            paging_type: TypeRef::ident("int64"),
            split_strategy: SplitStrategy::default(),
        }
    }
}

impl TargetConfig {
    pub fn with_split_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.split_strategy = strategy;
        self
    }
}

/// How a query run picks its top-level `And`/`Or`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// First connective at bracket depth 0 or 1, trimming one token on
    /// each side at depth 1
    #[default]
    Legacy,
    /// Unwrap a fully bracketed run, then split at the first depth-0 connective
    Nested,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: TargetConfig =
            serde_json::from_str(r#"{ "client_type": "*mongo.Session", "split_strategy": "nested" }"#)
                .unwrap();
        assert_eq!(config.client_type.to_string(), "*mongo.Session");
        assert_eq!(config.context_type.to_string(), "context.Context");
        assert_eq!(config.split_strategy, SplitStrategy::Nested);
    }

    #[test]
    fn test_default_strategy_is_legacy() {
        assert_eq!(TargetConfig::default().split_strategy, SplitStrategy::Legacy);
    }
}
