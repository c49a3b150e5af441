mod common;

use common::*;
use descry_parser::{compile_interfaces, ErrorKind, TargetConfig};

#[test]
fn test_all_valid_fixtures_compile() {
    let fixtures = discover_fixtures("valid");
    assert!(!fixtures.is_empty(), "No fixtures found under tests/fixtures/valid");

    let config = TargetConfig::default();
    let mut failures = Vec::new();
    for path in &fixtures {
        for compiled in compile_interfaces(&load_interfaces(path), &config) {
            for err in compiled.errors() {
                failures.push(format!("{}: {}", path.display(), err));
            }
        }
    }

    if !failures.is_empty() {
        panic!("{} methods failed:\n{}", failures.len(), failures.join("\n"));
    }
}

#[test]
fn test_every_invalid_method_fails() {
    let fixtures = discover_fixtures("invalid");
    assert!(!fixtures.is_empty(), "No fixtures found under tests/fixtures/invalid");

    let config = TargetConfig::default();
    for path in &fixtures {
        for compiled in compile_interfaces(&load_interfaces(path), &config) {
            for (index, result) in compiled.results.iter().enumerate() {
                assert!(
                    result.is_err(),
                    "{}: method {} of {} unexpectedly compiled",
                    path.display(),
                    index,
                    compiled.name
                );
            }
        }
    }
}

#[test]
fn test_invalid_fixture_error_kinds() {
    let file = load_fixture("invalid/user_repository.json");
    let compiled = compile_interfaces(&file, &TargetConfig::default());
    let kinds: Vec<_> = compiled[0].errors().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![ErrorKind::Grammar, ErrorKind::Resolution, ErrorKind::Grammar, ErrorKind::Type]
    );
}

#[test]
fn test_results_serialize_per_method() {
    let file = load_fixture("valid/user_repository.json");
    let compiled = compile_interfaces(&file, &TargetConfig::default());
    let json = serde_json::to_value(&compiled).unwrap();

    let results = json[0]["results"].as_array().unwrap();
    assert_eq!(results.len(), file.interfaces[0].methods.len());
    assert_eq!(results[0]["Ok"]["Insert"]["document_param"], "user");
    assert_eq!(results[2]["Ok"]["Find"]["mode"], "One");
}
