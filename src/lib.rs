//! descry - Method descriptor compiler for MongoDB repository interfaces
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

pub use descry_ast as ast;
pub use descry_lexer as lexer;
pub use descry_parser as parser;
