//! Per-kind method signature contracts
//!
//! Each standalone operation checks parameter/return counts and the types at
//! fixed positions before its grammar is parsed. Where a kind's mode is
//! encoded in the signature, the check also yields it.

use descry_ast::{OperateMode, TypeRef};

use crate::{MethodContext, MethodSyntaxError};

type Result<T> = std::result::Result<T, MethodSyntaxError>;

const ORDINALS: [&str; 3] = ["first", "second", "third"];

fn ordinal(index: usize) -> &'static str {
    ORDINALS.get(index).copied().unwrap_or("next")
}

impl MethodContext<'_> {
    fn params_at_least(&self, min: usize) -> Result<()> {
        if self.method.params.len() < min {
            let count = match min {
                1 => "one",
                2 => "two",
                _ => "the required number of",
            };
            return Err(self.signature(format!("less than {} input parameters", count)));
        }
        Ok(())
    }

    fn params_exactly(&self, count: usize) -> Result<()> {
        if self.method.params.len() != count {
            return Err(self.signature(format!("input parameter not equal to {}", count)));
        }
        Ok(())
    }

    fn returns_exactly(&self, count: usize) -> Result<()> {
        if self.method.returns.len() != count {
            return Err(self.signature(format!("return parameter not equal to {}", count)));
        }
        Ok(())
    }

    fn param_is(&self, index: usize, expected: &TypeRef) -> Result<()> {
        match self.method.params.get(index) {
            Some(param) if param.ty == *expected => Ok(()),
            _ => Err(self.signature(format!(
                "the {} parameter in the input parameters should be {}",
                ordinal(index),
                expected
            ))),
        }
    }

    fn return_is(&self, index: usize, expected: &TypeRef) -> Result<()> {
        match self.method.returns.get(index) {
            Some(ty) if ty == expected => Ok(()),
            _ => Err(self.signature(format!(
                "the {} parameter in the return parameters should be {}",
                ordinal(index),
                expected
            ))),
        }
    }

    /// Shared prefix: minimum params, two returns, context first, error last
    fn two_return_contract(&self, min_params: usize) -> Result<()> {
        self.params_at_least(min_params)?;
        self.returns_exactly(2)?;
        self.param_is(0, &self.config.context_type)?;
        self.return_is(1, &self.config.error_type)
    }

    /// Update/Delete: `bool` result selects One, `int` selects Many
    fn write_mode(&self) -> Result<OperateMode> {
        let first = &self.method.returns[0];
        if *first == self.config.one_result {
            Ok(OperateMode::One)
        } else if *first == self.config.many_result {
            Ok(OperateMode::Many)
        } else {
            Err(self.signature(format!(
                "the first parameter in the return parameters should be {} or {}",
                self.config.one_result, self.config.many_result
            )))
        }
    }
}

pub(crate) fn check_insert(cx: &MethodContext<'_>) -> Result<OperateMode> {
    cx.params_exactly(2)?;
    cx.returns_exactly(2)?;
    cx.param_is(0, &cx.config.context_type)?;
    cx.return_is(1, &cx.config.error_type)?;

    let document = &cx.method.params[1].ty;
    if document.is_pointer() {
        if cx.method.returns[0] != cx.config.insert_one_result {
            return Err(cx.signature(format!(
                "inconsistent types, the first parameter in the return parameters should be {}",
                cx.config.insert_one_result
            )));
        }
        Ok(OperateMode::One)
    } else if document.is_slice() {
        if cx.method.returns[0] != cx.config.insert_many_result {
            return Err(cx.signature(format!(
                "inconsistent types, the first parameter in the return parameters should be {}",
                cx.config.insert_many_result
            )));
        }
        Ok(OperateMode::Many)
    } else {
        Err(cx.signature(
            "the second parameter in the input parameters should be a pointer or a slice",
        ))
    }
}

pub(crate) fn check_find(cx: &MethodContext<'_>) -> Result<OperateMode> {
    cx.two_return_contract(1)?;

    let first = &cx.method.returns[0];
    if first.is_pointer() {
        Ok(OperateMode::One)
    } else if first.is_slice() {
        Ok(OperateMode::Many)
    } else {
        Err(cx.signature(
            "the first parameter in the return parameters should be a pointer or a slice",
        ))
    }
}

pub(crate) fn check_update(cx: &MethodContext<'_>) -> Result<OperateMode> {
    cx.two_return_contract(2)?;
    cx.write_mode()
}

pub(crate) fn check_delete(cx: &MethodContext<'_>) -> Result<OperateMode> {
    cx.two_return_contract(1)?;
    cx.write_mode()
}

pub(crate) fn check_count(cx: &MethodContext<'_>) -> Result<()> {
    cx.two_return_contract(1)?;
    cx.return_is(0, &cx.config.count_result)
}

pub(crate) fn check_bulk(cx: &MethodContext<'_>) -> Result<()> {
    cx.two_return_contract(1)?;
    cx.return_is(0, &cx.config.bulk_result_type)
}

pub(crate) fn check_transaction(cx: &MethodContext<'_>) -> Result<()> {
    cx.params_at_least(2)?;
    cx.returns_exactly(1)?;
    cx.param_is(0, &cx.config.context_type)?;
    cx.param_is(1, &cx.config.client_type)?;
    if cx.method.returns[0] != cx.config.error_type {
        return Err(cx.signature(format!(
            "the only parameter in the return parameters should be {}",
            cx.config.error_type
        )));
    }
    Ok(())
}
