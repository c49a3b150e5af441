use std::fs;
use std::path::{Path, PathBuf};

use descry_ast::{Field, InterfaceFile, MethodContract, StructSchema, TypeRef};
use walkdir::WalkDir;

/// Root of the JSON interface fixtures
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Load an interface file from tests/fixtures/
pub fn load_fixture(name: &str) -> InterfaceFile {
    load_interfaces(&fixtures_dir().join(name))
}

/// Load and parse an interface file at any path
pub fn load_interfaces(path: &Path) -> InterfaceFile {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Invalid interface file {}: {}", path.display(), e))
}

/// Every `*.json` fixture below `subdir`, sorted
pub fn discover_fixtures(subdir: &str) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkDir::new(fixtures_dir().join(subdir))
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    found.sort();
    found
}

pub fn ty(source: &str) -> TypeRef {
    TypeRef::parse(source).unwrap_or_else(|e| panic!("bad type {}: {}", source, e))
}

/// The `User` entity used across the integration tests
pub fn user_schema() -> StructSchema {
    let address = StructSchema::new("Address")
        .with_field(Field::new("City", "city", ty("string")))
        .with_field(Field::new("Zip", "zip", ty("string")));

    StructSchema::new("User")
        .with_field(Field::new("Name", "name", ty("string")))
        .with_field(Field::new("Age", "age", ty("int")))
        .with_field(Field::new("UserName", "user_name", ty("string")))
        .with_field(Field::new("Deleted", "deleted", ty("bool")))
        .with_field(Field::new("Address", "address", ty("*model.Address")).with_nested(address))
}

/// A method whose first parameter is the context
pub fn method(descriptor: &str) -> MethodContract {
    MethodContract::new(descriptor).param("ctx", ty("context.Context"))
}
