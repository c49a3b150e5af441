//! Field path resolution
//!
//! Matches runs of descriptor words against schema field names. A field
//! name may span several words (`UserName` is `User Name`), one field's name
//! may be a prefix of another's (`Name` and `NameHello`), and struct-valued
//! fields continue into their nested schema (`Address City` becomes
//! `address.city`). Candidates are tried longest first, falling back to
//! shorter ones when the rest of the run cannot be covered.

use descry_ast::{StructSchema, TypeRef};
use descry_lexer::{render, span_of, Word};

use crate::ResolveError;

/// A resolved, possibly nested, field reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// Dotted storage key path
    pub key: String,
    /// Type of the innermost field
    pub ty: TypeRef,
    /// Number of words the path consumed
    pub consumed: usize,
}

/// Resolve a run that must name exactly one field path
pub fn resolve_path(schema: &StructSchema, words: &[Word]) -> Result<FieldPath, ResolveError> {
    if words.is_empty() {
        return Err(ResolveError::Empty);
    }

    if let Some(path) = candidates(schema, words)
        .into_iter()
        .find(|c| c.consumed == words.len())
    {
        return Ok(path);
    }

    // Distinguish "several fields" from "no field" for the diagnostic
    resolve_paths(schema, words)?;
    Err(ResolveError::NotSingle {
        run: render(words),
        span: span_of(words),
    })
}

/// Resolve a run into a sequence of field paths covering every word
pub fn resolve_paths(schema: &StructSchema, words: &[Word]) -> Result<Vec<FieldPath>, ResolveError> {
    if words.is_empty() {
        return Err(ResolveError::Empty);
    }

    let mut failed = vec![None; words.len()];
    cover(schema, words, 0, &mut failed).map_err(|failed_at| {
        let rest = &words[failed_at..];
        ResolveError::NoMatch {
            run: render(rest),
            span: span_of(rest),
        }
    })
}

/// Cover `words[at..]`; on failure, the furthest position no field matched
///
/// `failed[at]` remembers that a position cannot be covered, and how far
/// the attempt got, so each suffix is explored at most once.
fn cover(
    schema: &StructSchema,
    words: &[Word],
    at: usize,
    failed: &mut [Option<usize>],
) -> Result<Vec<FieldPath>, usize> {
    if at == words.len() {
        return Ok(Vec::new());
    }
    if let Some(furthest) = failed[at] {
        return Err(furthest);
    }

    let mut furthest = at;
    for candidate in candidates(schema, &words[at..]) {
        match cover(schema, words, at + candidate.consumed, failed) {
            Ok(mut rest) => {
                rest.insert(0, candidate);
                return Ok(rest);
            }
            Err(failed_at) => furthest = furthest.max(failed_at),
        }
    }
    failed[at] = Some(furthest);
    Err(furthest)
}

/// Every field path matching a prefix of `words`, longest first
fn candidates(schema: &StructSchema, words: &[Word]) -> Vec<FieldPath> {
    let mut found = Vec::new();

    for field in &schema.fields {
        let Some(consumed) = name_match(&field.name, words) else {
            continue;
        };

        if let Some(nested) = &field.nested {
            for inner in candidates(nested, &words[consumed..]) {
                found.push(FieldPath {
                    key: format!("{}.{}", field.storage_key, inner.key),
                    ty: inner.ty,
                    consumed: consumed + inner.consumed,
                });
            }
        }

        found.push(FieldPath {
            key: field.storage_key.clone(),
            ty: field.ty.clone(),
            consumed,
        });
    }

    // Stable: among equal lengths, schema order wins
    found.sort_by(|a, b| b.consumed.cmp(&a.consumed));
    found
}

/// Number of leading words whose concatenation is exactly `name`
fn name_match(name: &str, words: &[Word]) -> Option<usize> {
    let mut rest = name;
    for (i, word) in words.iter().enumerate() {
        rest = rest.strip_prefix(word.as_str())?;
        if rest.is_empty() {
            return Some(i + 1);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use descry_ast::Field;
    use descry_lexer::tokenize;

    fn schema() -> StructSchema {
        let address = StructSchema::new("Address")
            .with_field(Field::new("City", "city", TypeRef::ident("string")))
            .with_field(Field::new("ZipCode", "zip_code", TypeRef::ident("int")));

        StructSchema::new("User")
            .with_field(Field::new("Name", "name", TypeRef::ident("string")))
            .with_field(Field::new("NameHello", "name_hello", TypeRef::ident("string")))
            .with_field(Field::new("Age", "age", TypeRef::ident("int")))
            .with_field(Field::new("UserID", "user_id", TypeRef::ident("int64")))
            .with_field(
                Field::new("Address", "address", TypeRef::pointer(TypeRef::selector("model", "Address")))
                    .with_nested(address),
            )
    }

    #[test]
    fn test_single_and_multi_word_names() {
        let schema = schema();
        assert_eq!(resolve_path(&schema, &tokenize("Age")).unwrap().key, "age");
        let id = resolve_path(&schema, &tokenize("UserID")).unwrap();
        assert_eq!(id.key, "user_id");
        assert_eq!(id.consumed, 2);
        assert_eq!(id.ty, TypeRef::ident("int64"));
    }

    #[test]
    fn test_prefix_prefers_exact_match() {
        let schema = schema();
        assert_eq!(resolve_path(&schema, &tokenize("NameHello")).unwrap().key, "name_hello");
        assert_eq!(resolve_path(&schema, &tokenize("Name")).unwrap().key, "name");
    }

    #[test]
    fn test_nested_path() {
        let schema = schema();
        let path = resolve_path(&schema, &tokenize("AddressZipCode")).unwrap();
        assert_eq!(path.key, "address.zip_code");
        assert_eq!(path.ty, TypeRef::ident("int"));

        // The struct field itself is also addressable
        let whole = resolve_path(&schema, &tokenize("Address")).unwrap();
        assert_eq!(whole.key, "address");
        assert!(whole.ty.is_pointer());
    }

    #[test]
    fn test_paths_backtrack() {
        let schema = schema();
        let keys: Vec<String> = resolve_paths(&schema, &tokenize("NameHelloAgeAddressCity"))
            .unwrap()
            .into_iter()
            .map(|p| p.key)
            .collect();
        assert_eq!(keys, vec!["name_hello", "age", "address.city"]);

        let keys: Vec<String> = resolve_paths(&schema, &tokenize("NameAge"))
            .unwrap()
            .into_iter()
            .map(|p| p.key)
            .collect();
        assert_eq!(keys, vec!["name", "age"]);
    }

    #[test]
    fn test_errors_name_offending_run() {
        let schema = schema();
        let words = tokenize("AgeColor");
        match resolve_paths(&schema, &words) {
            Err(ResolveError::NoMatch { run, span }) => {
                assert_eq!(run, "[Color]");
                assert_eq!(span, Some(words[1].span));
            }
            other => panic!("expected NoMatch, got {:?}", other),
        }

        assert!(matches!(
            resolve_path(&schema, &tokenize("NameAge")),
            Err(ResolveError::NotSingle { .. })
        ));
        assert!(matches!(
            resolve_path(&schema, &tokenize("Nam")),
            Err(ResolveError::NoMatch { .. })
        ));
        assert_eq!(resolve_paths(&schema, &[]), Err(ResolveError::Empty));
    }

    #[test]
    fn test_unresolvable_run_fails_fast() {
        let schema = StructSchema::new("Pair")
            .with_field(Field::new("Ab", "ab", TypeRef::ident("string")))
            .with_field(Field::new("AbAb", "ab_ab", TypeRef::ident("string")));
        let descriptor = format!("{}Zz", "Ab".repeat(40));
        let words = tokenize(&descriptor);
        assert_eq!(words.len(), 41);

        let started = std::time::Instant::now();
        match resolve_paths(&schema, &words) {
            Err(ResolveError::NoMatch { run, .. }) => assert_eq!(run, "[Zz]"),
            other => panic!("expected NoMatch, got {:?}", other),
        }
        assert!(matches!(
            resolve_path(&schema, &words),
            Err(ResolveError::NoMatch { .. })
        ));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }
}
