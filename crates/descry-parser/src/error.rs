//! Compiler error types

use descry_ast::Span;
use serde::Serialize;
use thiserror::Error;

/// Error taxonomy for a failed method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Wrong parameter/return count or type at the method boundary
    Signature,
    /// Unrecognized token sequence, missing keyword, unmatched bracket, leftover parameters
    Grammar,
    /// A word run names no schema field
    Resolution,
    /// A bound parameter's type differs from the field's
    Type,
}

impl ErrorKind {
    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Signature => "E-SIGNATURE",
            ErrorKind::Grammar => "E-GRAMMAR",
            ErrorKind::Resolution => "E-RESOLVE",
            ErrorKind::Type => "E-TYPE",
        }
    }
}

/// The single error a method compilation can produce
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("method {method} has syntax errors, specific reasons: {message}")]
pub struct MethodSyntaxError {
    pub method: String,
    pub kind: ErrorKind,
    pub message: String,
    /// Offending word run inside the descriptor, when there is one
    pub span: Option<Span>,
}

impl MethodSyntaxError {
    pub fn new(method: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            kind,
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Field path resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("the length of the field name requested for parsing is empty")]
    Empty,

    #[error("no field name corresponding to {run} found")]
    NoMatch { run: String, span: Option<Span> },

    #[error("only one field name can be included in {run}")]
    NotSingle { run: String, span: Option<Span> },
}

impl ResolveError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ResolveError::Empty => None,
            ResolveError::NoMatch { span, .. } => *span,
            ResolveError::NotSingle { span, .. } => *span,
        }
    }
}

/// Bracket and connective structure failures in a query run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("mismatched parentheses")]
    Unbalanced { span: Span },

    #[error("And or Or needs to be followed by query tokens")]
    DanglingConnective { span: Span },
}

impl SplitError {
    pub fn span(&self) -> Span {
        match self {
            SplitError::Unbalanced { span } => *span,
            SplitError::DanglingConnective { span } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_method() {
        let err = MethodSyntaxError::new("FindX", ErrorKind::Grammar, "no By or All specified");
        assert_eq!(
            err.to_string(),
            "method FindX has syntax errors, specific reasons: no By or All specified"
        );
        assert_eq!(err.code(), "E-GRAMMAR");
    }
}
