//! Input types: the source units handed to the checker.

use std::sync::Arc;

use indexmap::IndexMap;
use rayon::iter::IndexedParallelIterator;

use crate::syntax::Stmt;

/// One parsed source file.
///
/// Immutable once built; the checker only reads it.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceUnit {
    /// Path or label used in diagnostics.
    name: Arc<str>,
    /// Top-level statements, in source order.
    stmts: Vec<Stmt>,
}

impl SourceUnit {
    pub fn new(name: impl Into<Arc<str>>, stmts: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            stmts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the name, for diagnostics.
    pub fn name_arc(&self) -> Arc<str> {
        self.name.clone()
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }
}

/// An ordered set of source units, keyed by name.
///
/// Batch checks report results in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceSet {
    units: IndexMap<Arc<str>, SourceUnit>,
}

impl SourceSet {
    /// Create a new empty source set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit, replacing any unit with the same name in place.
    pub fn insert(&mut self, unit: SourceUnit) {
        self.units.insert(unit.name_arc(), unit);
    }

    /// Remove a unit by name.
    pub fn remove(&mut self, name: &str) -> Option<SourceUnit> {
        self.units.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&SourceUnit> {
        self.units.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Iterate over all units in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceUnit> + '_ {
        self.units.values()
    }

    /// Parallel iterator over all units; collecting keeps insertion order.
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item = &SourceUnit> + '_ {
        self.units.par_values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl FromIterator<SourceUnit> for SourceSet {
    fn from_iter<I: IntoIterator<Item = SourceUnit>>(iter: I) -> Self {
        let mut set = Self::new();
        for unit in iter {
            set.insert(unit);
        }
        set
    }
}
