//! Per-method parse context and shared grammar helpers

use descry_ast::{MethodContract, OperateMode, StructSchema, TypeRef};
use descry_lexer::{render, span_of, Keyword, Word};

use crate::{ErrorKind, MethodSyntaxError, ParamCursor, ResolveError, SplitError, TargetConfig};

/// How a simple operation parser is being invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// The method's own operation: the signature contract applies and every
    /// parameter must be consumed
    Standalone,
    /// A step of a Bulk or Transaction: the mode comes from a `One`/`Many`
    /// word and only operation-local parameters are consumed
    Nested,
}

/// Read-only inputs shared by every parser for one method
#[derive(Debug, Clone, Copy)]
pub struct MethodContext<'a> {
    pub method: &'a MethodContract,
    pub schema: &'a StructSchema,
    pub config: &'a TargetConfig,
}

impl<'a> MethodContext<'a> {
    pub fn new(method: &'a MethodContract, schema: &'a StructSchema, config: &'a TargetConfig) -> Self {
        Self {
            method,
            schema,
            config,
        }
    }

    // === Errors ===

    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> MethodSyntaxError {
        MethodSyntaxError::new(&self.method.name, kind, message)
    }

    pub fn signature(&self, message: impl Into<String>) -> MethodSyntaxError {
        self.error(ErrorKind::Signature, message)
    }

    pub fn grammar(&self, message: impl Into<String>) -> MethodSyntaxError {
        self.error(ErrorKind::Grammar, message)
    }

    pub fn grammar_at(&self, message: impl Into<String>, words: &[Word]) -> MethodSyntaxError {
        self.grammar(message).with_span(span_of(words))
    }

    pub fn type_error_at(&self, message: impl Into<String>, words: &[Word]) -> MethodSyntaxError {
        self.error(ErrorKind::Type, message).with_span(span_of(words))
    }

    pub fn resolution(&self, err: ResolveError) -> MethodSyntaxError {
        let span = err.span();
        self.error(ErrorKind::Resolution, err.to_string()).with_span(span)
    }

    pub fn split(&self, err: SplitError) -> MethodSyntaxError {
        let span = err.span();
        self.grammar(err.to_string()).with_span(Some(span))
    }

    // === Parameters ===

    /// Consume the context parameter already vetted by the signature check
    pub fn take_context(&self, cursor: &mut ParamCursor<'a>) -> Result<String, MethodSyntaxError> {
        cursor
            .take_one()
            .map(|p| p.name.clone())
            .ok_or_else(|| self.signature("less than one input parameters"))
    }

    /// Consume one parameter on behalf of `words`
    pub fn take_param(
        &self,
        cursor: &mut ParamCursor<'a>,
        words: &[Word],
    ) -> Result<&'a descry_ast::Param, MethodSyntaxError> {
        cursor.take_one().ok_or_else(|| {
            self.signature("insufficient number of input parameters")
                .with_span(span_of(words))
        })
    }

    /// Consume `count` parameters that must all have type `expected`
    pub fn bind(
        &self,
        cursor: &mut ParamCursor<'a>,
        expected: &TypeRef,
        count: usize,
        words: &[Word],
    ) -> Result<Vec<String>, MethodSyntaxError> {
        let params = cursor.take(count).ok_or_else(|| {
            self.signature("insufficient number of input parameters")
                .with_span(span_of(words))
        })?;

        let mut names = Vec::with_capacity(params.len());
        for param in params {
            if param.ty != *expected {
                return Err(self.type_error_at(
                    format!(
                        "the field type in the parameter transfer: {} ({}), the actual required field type: {}",
                        param.ty, param.name, expected
                    ),
                    words,
                ));
            }
            tracing::trace!(method = %self.method.name, param = %param.name, ty = %param.ty, "bound parameter");
            names.push(param.name.clone());
        }
        Ok(names)
    }

    /// Fail if a standalone parse left parameters unconsumed
    pub fn ensure_exhausted(&self, cursor: &ParamCursor<'a>) -> Result<(), MethodSyntaxError> {
        match cursor.peek() {
            None => Ok(()),
            Some(param) => Err(self.grammar(format!(
                "too many method parameters written, {} and subsequent parameters are useless",
                param.name
            ))),
        }
    }

    // === Words ===

    /// Split the leading `One`/`Many` off a nested operation
    pub fn nested_mode<'w>(
        &self,
        words: &'w [Word],
        operation: Keyword,
    ) -> Result<(OperateMode, &'w [Word]), MethodSyntaxError> {
        match words.split_first() {
            Some((word, rest)) if word.is(Keyword::One) => Ok((OperateMode::One, rest)),
            Some((word, rest)) if word.is(Keyword::Many) => Ok((OperateMode::Many, rest)),
            _ => Err(self.grammar_at(
                format!("{} should be followed by One or Many", operation.describe()),
                words,
            )),
        }
    }

    /// Index of the first `By` or `All`
    pub fn query_index(&self, words: &[Word]) -> Result<usize, MethodSyntaxError> {
        query_index(words).ok_or_else(|| self.grammar_at("no By or All specified", words))
    }

    /// Reject words that have no place in the grammar
    pub fn unexpected(&self, words: &[Word], context: &str) -> MethodSyntaxError {
        self.grammar_at(format!("unexpected tokens {} {}", render(words), context), words)
    }
}

pub(crate) fn query_index(words: &[Word]) -> Option<usize> {
    words
        .iter()
        .position(|w| w.is(Keyword::By) || w.is(Keyword::All))
}
