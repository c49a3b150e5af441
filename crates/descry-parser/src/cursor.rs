//! Left-to-right pointer into a method's parameter list

use descry_ast::Param;

/// Shared parameter position for one method's parse
///
/// Every sub-parser takes it by `&mut`, so parameters are consumed strictly
/// in declaration order.
#[derive(Debug, Clone)]
pub struct ParamCursor<'a> {
    params: &'a [Param],
    pos: usize,
}

impl<'a> ParamCursor<'a> {
    pub fn new(params: &'a [Param]) -> Self {
        Self { params, pos: 0 }
    }

    /// Start at an arbitrary position
    pub fn at(params: &'a [Param], pos: usize) -> Self {
        Self {
            params,
            pos: pos.min(params.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<&'a Param> {
        self.params.get(self.pos)
    }

    /// Consume one parameter
    pub fn take_one(&mut self) -> Option<&'a Param> {
        let param = self.params.get(self.pos)?;
        self.pos += 1;
        Some(param)
    }

    /// Consume `count` parameters, or none if fewer remain
    pub fn take(&mut self, count: usize) -> Option<&'a [Param]> {
        let end = self.pos.checked_add(count)?;
        let params = self.params.get(self.pos..end)?;
        self.pos = end;
        Some(params)
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.params.len()
    }
}
