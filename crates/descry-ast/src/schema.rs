//! Entity struct schemas

use serde::{Deserialize, Serialize};

use crate::TypeRef;

/// Field metadata for one entity struct
///
/// Nested schemas are owned by the field that references them, so a schema
/// is always a finite tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// A single struct field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as it appears in descriptors (`UserName`)
    pub name: String,
    /// Key the field is stored under (`user_name`)
    pub storage_key: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Schema of the struct this field holds, if it is struct-valued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Box<StructSchema>>,
}

impl StructSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field append
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl Field {
    pub fn new(name: impl Into<String>, storage_key: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            storage_key: storage_key.into(),
            ty,
            nested: None,
        }
    }

    pub fn with_nested(mut self, schema: StructSchema) -> Self {
        self.nested = Some(Box::new(schema));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_nested_schema() {
        let json = r#"{
            "name": "User",
            "fields": [
                { "name": "Name", "storage_key": "name", "type": "string" },
                { "name": "Address", "storage_key": "address", "type": "*model.Address",
                  "nested": { "name": "Address", "fields": [
                      { "name": "City", "storage_key": "city", "type": "string" }
                  ] } }
            ]
        }"#;
        let schema: StructSchema = serde_json::from_str(json).unwrap();
        let address = schema.field("Address").unwrap();
        assert!(address.ty.is_pointer());
        let nested = address.nested.as_ref().unwrap();
        assert_eq!(nested.field("City").unwrap().storage_key, "city");
        assert!(schema.field("City").is_none());
    }
}
