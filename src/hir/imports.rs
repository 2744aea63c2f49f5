//! Import table: the aliases a unit's `use` statements bring into scope.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::QualifiedName;

/// One registered alias and how often it was used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportEntry {
    alias: SmolStr,
    target: QualifiedName,
    uses: u32,
}

impl ImportEntry {
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The fully-qualified name the alias stands for.
    pub fn target(&self) -> &QualifiedName {
        &self.target
    }

    /// Number of reference sites that resolved through this alias.
    pub fn uses(&self) -> u32 {
        self.uses
    }

    pub fn is_unused(&self) -> bool {
        self.uses == 0
    }
}

/// Alias → target registry for one analyzer run.
///
/// Iteration follows registration order so unused-import reports are stable.
/// Re-registering an alias replaces its target and resets its counter but
/// keeps its original position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportTable {
    entries: IndexMap<SmolStr, ImportEntry>,
}

impl ImportTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or overwrite) an alias with a zero use count.
    pub fn register(&mut self, alias: impl Into<SmolStr>, target: QualifiedName) {
        let alias = alias.into();
        self.entries.insert(
            alias.clone(),
            ImportEntry {
                alias,
                target,
                uses: 0,
            },
        );
    }

    pub fn get(&self, alias: &str) -> Option<&ImportEntry> {
        self.entries.get(alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.contains_key(alias)
    }

    /// Count one use of an alias. Returns `false` if the alias is unknown.
    pub fn mark_used(&mut self, alias: &str) -> bool {
        match self.entries.get_mut(alias) {
            Some(entry) => {
                entry.uses += 1;
                true
            }
            None => false,
        }
    }

    /// Entries nothing referred to, in registration order.
    pub fn unused(&self) -> impl Iterator<Item = &ImportEntry> + '_ {
        self.entries.values().filter(|entry| entry.is_unused())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImportEntry> + '_ {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_mark_used() {
        let mut table = ImportTable::new();
        table.register("Bar", QualifiedName::parse("\\Foo\\Bar"));

        assert!(table.mark_used("Bar"));
        assert!(table.mark_used("Bar"));
        assert!(!table.mark_used("Baz"));

        let entry = table.get("Bar").unwrap();
        assert_eq!(entry.uses(), 2);
        assert_eq!(entry.target().to_string(), "\\Foo\\Bar");
    }

    #[test]
    fn test_unused_in_registration_order() {
        let mut table = ImportTable::new();
        table.register("C", QualifiedName::parse("\\X\\C"));
        table.register("A", QualifiedName::parse("\\X\\A"));
        table.register("B", QualifiedName::parse("\\X\\B"));
        table.mark_used("A");

        let unused: Vec<&str> = table.unused().map(ImportEntry::alias).collect();
        assert_eq!(unused, vec!["C", "B"]);
    }

    #[test]
    fn test_reregister_resets_count() {
        let mut table = ImportTable::new();
        table.register("Bar", QualifiedName::parse("\\Foo\\Bar"));
        table.mark_used("Bar");
        table.register("Bar", QualifiedName::parse("\\Other\\Bar"));

        let entry = table.get("Bar").unwrap();
        assert_eq!(table.len(), 1);
        assert!(entry.is_unused());
        assert_eq!(entry.target().to_string(), "\\Other\\Bar");
    }
}
