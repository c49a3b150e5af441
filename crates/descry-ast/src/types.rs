//! Surface type representations
//!
//! Parameter, return and field types arrive from the extraction stage as
//! source-level type expressions such as `*mongo.Client` or `[]*model.User`.
//! They are kept structurally so that shape checks (pointer vs slice) and
//! equality checks do not depend on string matching.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A type expression as written in the source interface
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeRef {
    /// Builtin or local identifier: `int`, `string`, `error`
    Ident(String),

    /// Package-qualified name: `context.Context`
    Selector { package: String, name: String },

    /// Pointer type: `*T`
    Pointer(Box<TypeRef>),

    /// Slice type: `[]T`
    Slice(Box<TypeRef>),

    /// Map type: `map[K]V`
    Map { key: Box<TypeRef>, value: Box<TypeRef> },

    /// The empty interface: `interface{}`
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeParseError {
    #[error("empty type expression")]
    Empty,

    #[error("unterminated map key in `{0}`")]
    UnterminatedMap(String),

    #[error("invalid type expression `{0}`")]
    Invalid(String),
}

impl TypeRef {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeRef::Ident(name.into())
    }

    pub fn selector(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef::Selector {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn pointer(inner: TypeRef) -> Self {
        TypeRef::Pointer(Box::new(inner))
    }

    pub fn slice(inner: TypeRef) -> Self {
        TypeRef::Slice(Box::new(inner))
    }

    /// Parse a textual type expression
    pub fn parse(source: &str) -> Result<Self, TypeParseError> {
        let text = source.trim();
        if text.is_empty() {
            return Err(TypeParseError::Empty);
        }

        if text == "interface{}" {
            return Ok(TypeRef::Interface);
        }
        if let Some(rest) = text.strip_prefix('*') {
            return Ok(TypeRef::pointer(Self::parse(rest)?));
        }
        if let Some(rest) = text.strip_prefix("[]") {
            return Ok(TypeRef::slice(Self::parse(rest)?));
        }
        if let Some(rest) = text.strip_prefix("map[") {
            let close = matching_bracket(rest)
                .ok_or_else(|| TypeParseError::UnterminatedMap(text.to_string()))?;
            let key = Self::parse(&rest[..close])?;
            let value = Self::parse(&rest[close + 1..])?;
            return Ok(TypeRef::Map {
                key: Box::new(key),
                value: Box::new(value),
            });
        }

        match text.split_once('.') {
            Some((package, name)) if is_identifier(package) && is_identifier(name) => {
                Ok(TypeRef::selector(package, name))
            }
            None if is_identifier(text) => Ok(TypeRef::ident(text)),
            _ => Err(TypeParseError::Invalid(text.to_string())),
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeRef::Pointer(_))
    }

    pub fn is_slice(&self) -> bool {
        matches!(self, TypeRef::Slice(_))
    }
}

/// Index of the `]` closing an already-opened `[`
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Ident(name) => write!(f, "{}", name),
            TypeRef::Selector { package, name } => write!(f, "{}.{}", package, name),
            TypeRef::Pointer(inner) => write!(f, "*{}", inner),
            TypeRef::Slice(inner) => write!(f, "[]{}", inner),
            TypeRef::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeRef::Interface => write!(f, "interface{{}}"),
        }
    }
}

impl TryFrom<String> for TypeRef {
    type Error = TypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(ty: TypeRef) -> Self {
        ty.to_string()
    }
}

impl std::str::FromStr for TypeRef {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeRef::parse(s)
    }
}
