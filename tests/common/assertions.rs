use descry_ast::{MethodContract, Operation};
use descry_parser::{compile_method, ErrorKind, MethodSyntaxError, TargetConfig};

use super::fixtures::user_schema;

/// Compile against the `User` schema with the default target
pub fn compile(method: &MethodContract) -> Result<Operation, MethodSyntaxError> {
    compile_method(method, &user_schema(), &TargetConfig::default())
}

/// Assert that compilation succeeds
pub fn assert_compiles(method: &MethodContract) -> Operation {
    compile(method).unwrap_or_else(|e| panic!("Expected {} to compile: {}", method.name, e))
}

/// Assert that compilation fails with the given kind and a message
/// containing `needle`
pub fn assert_fails_with(method: &MethodContract, kind: ErrorKind, needle: &str) -> MethodSyntaxError {
    let err = match compile(method) {
        Ok(op) => panic!("Expected {} to fail, got {:?}", method.name, op),
        Err(err) => err,
    };
    assert_eq!(err.kind, kind, "unexpected error kind: {}", err);
    assert_eq!(err.method, method.name);
    assert!(
        err.message.contains(needle),
        "expected message containing {:?}, got {:?}",
        needle,
        err.message
    );
    err
}
