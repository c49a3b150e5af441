//! Interface method contracts

use serde::{Deserialize, Serialize};

use crate::{StructSchema, TypeRef};

/// A named, typed method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One annotated repository method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodContract {
    pub name: String,
    /// Descriptor such as `FindByNameEqual`
    pub descriptor: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub returns: Vec<TypeRef>,
}

impl MethodContract {
    /// A contract whose descriptor is its own name, the common case
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            descriptor: name.clone(),
            name,
            params: Vec::new(),
            returns: Vec::new(),
        }
    }

    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = descriptor.into();
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.returns.push(ty);
        self
    }
}

/// A repository interface: the entity it stores and its methods
///
/// Every method resolves field references against `schema`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub schema: StructSchema,
    #[serde(default)]
    pub methods: Vec<MethodContract>,
}

/// Top-level input document handed over by the extraction stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceFile {
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}
