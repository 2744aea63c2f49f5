//! Property-based checks of reference qualification and alias counting.
//!
//! Generates namespaces, import tables and written names, and checks the
//! qualification rules hold for all of them:
//!
//! - fully-qualified names never touch the import table
//! - alias-prefixed names expand to `target + rest` and count exactly one use
//! - everything else is prefixed with the current namespace
#![cfg(feature = "proptest")]

use bugfree::QualifiedName;
use bugfree::hir::{ImportTable, Origin, ResolveResult, qualify, resolve_reference};
use bugfree::syntax::{Name, NameKind};
use proptest::prelude::*;

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

/// Strategy for a single identifier segment.
fn arb_segment() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9_]{0,8}"
}

fn arb_segments(min: usize, max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_segment(), min..=max)
}

fn arb_namespace() -> impl Strategy<Value = QualifiedName> {
    arb_segments(0, 3).prop_map(QualifiedName::from_segments)
}

/// Aliases are lowercase so they never collide with generated segments.
fn arb_imports() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec(("[a-z]{1,6}", arb_segments(1, 3)), 0..4)
}

fn table(imports: &[(String, Vec<String>)]) -> ImportTable {
    let mut table = ImportTable::new();
    for (alias, target) in imports {
        table.register(alias.as_str(), QualifiedName::from_segments(target.iter().cloned()));
    }
    table
}

fn uses(table: &ImportTable) -> Vec<u32> {
    table.iter().map(|entry| entry.uses()).collect()
}

proptest! {
    #[test]
    fn fully_qualified_never_consults_imports(
        ns in arb_namespace(),
        imports in arb_imports(),
        segments in arb_segments(1, 4),
    ) {
        let mut table = table(&imports);
        let before = uses(&table);
        let written = Name::new(segments.clone(), true).unwrap();

        let result = resolve_reference(&written, &ns, &mut table, &|_: &str| true);

        prop_assert_eq!(result.name(), &QualifiedName::from_segments(segments));
        prop_assert_eq!(uses(&table), before);
    }

    #[test]
    fn alias_prefix_expands_and_counts_once(
        ns in arb_namespace(),
        imports in arb_imports(),
        rest in arb_segments(0, 3),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!imports.is_empty());
        let mut table = table(&imports);
        let entry = table.iter().nth(pick.index(table.len())).unwrap().clone();

        let mut segments = vec![entry.alias().to_string()];
        segments.extend(rest.iter().cloned());
        let written = Name::new(segments, false).unwrap();

        let q = qualify(&written, &ns, &table);
        prop_assert_eq!(&q.origin, &Origin::Import(entry.alias().into()));
        prop_assert_eq!(&q.name, &QualifiedName::from_segments(
            entry.target().segments().iter().map(ToString::to_string).chain(rest.iter().cloned())
        ));

        let result = resolve_reference(&written, &ns, &mut table, &|_: &str| false);
        prop_assert!(matches!(result, ResolveResult::NotFound(_)));
        prop_assert_eq!(table.get(entry.alias()).unwrap().uses(), entry.uses() + 1);
    }

    #[test]
    fn unaliased_relative_names_join_namespace(
        ns in arb_namespace(),
        imports in arb_imports(),
        segments in arb_segments(1, 4),
    ) {
        let mut table = table(&imports);
        let before = uses(&table);
        let written = Name::new(segments.clone(), false).unwrap();
        prop_assert_ne!(written.kind(), NameKind::FullyQualified);

        let q = qualify(&written, &ns, &table);
        prop_assert_eq!(q.origin, Origin::Namespace);

        let result = resolve_reference(&written, &ns, &mut table, &|_: &str| true);
        let expected = QualifiedName::from_segments(
            ns.segments().iter().map(ToString::to_string).chain(segments)
        );
        prop_assert_eq!(result, ResolveResult::Found(expected));
        prop_assert_eq!(uses(&table), before);
    }
}
