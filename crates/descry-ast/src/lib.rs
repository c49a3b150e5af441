//! descry AST - Core types shared by every compiler phase
//!
//! This crate defines the inbound model (entity schemas and method
//! contracts), the outbound operation records, and descriptor spans.

mod span;
mod types;
mod schema;
mod method;
mod query;
mod operation;

pub use span::*;
pub use types::*;
pub use schema::*;
pub use method::*;
pub use query::*;
pub use operation::*;
