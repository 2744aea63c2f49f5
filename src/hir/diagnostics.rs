//! Diagnostics: finding categories, the severity policy and per-unit results.
//!
//! Every raw finding has a [`Category`]. The [`SeverityPolicy`] decides whether
//! a category is reported as an error, a warning, or dropped. The
//! [`DiagnosticCollector`] applies the policy while the analyzer walks a unit
//! and produces the [`AnalysisResult`].

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::base::{Locator, QualifiedName};

// ============================================================================
// CATEGORIES & LEVELS
// ============================================================================

/// The kind of a raw finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// The unit is not one namespace declaration wrapping everything else.
    MissingNamespace,
    /// An import directive node the checker could not read.
    MalformedImport,
    /// An import target that does not exist.
    UnresolvedUse,
    /// More than one binding in a single import directive.
    MultipleUsesInStatement,
    /// An import alias that nothing refers to.
    UnusedUse,
    /// A relative multi-segment type reference.
    QualifiedNameDiscouraged,
    /// A type reference that does not exist.
    UnresolvedType,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::MissingNamespace,
        Category::MalformedImport,
        Category::UnresolvedUse,
        Category::MultipleUsesInStatement,
        Category::UnusedUse,
        Category::QualifiedNameDiscouraged,
        Category::UnresolvedType,
    ];

    /// The configuration key for this category.
    pub fn key(self) -> &'static str {
        match self {
            Category::MissingNamespace => "missing_namespace",
            Category::MalformedImport => "malformed_import",
            Category::UnresolvedUse => "unresolved_use",
            Category::MultipleUsesInStatement => "multiple_uses_in_statement",
            Category::UnusedUse => "unused_use",
            Category::QualifiedNameDiscouraged => "qualified_name_discouraged",
            Category::UnresolvedType => "unresolved_type",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }

    /// The level used when no configuration overrides it.
    pub fn default_level(self) -> Level {
        match self {
            Category::MissingNamespace
            | Category::MalformedImport
            | Category::UnresolvedUse
            | Category::UnresolvedType => Level::Error,
            Category::MultipleUsesInStatement
            | Category::UnusedUse
            | Category::QualifiedNameDiscouraged => Level::Warning,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How the policy treats a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    Suppress,
}

impl Level {
    /// The severity a finding at this level is reported with, if any.
    pub fn severity(self) -> Option<Severity> {
        match self {
            Level::Error => Some(Severity::Error),
            Level::Warning => Some(Severity::Warning),
            Level::Suppress => None,
        }
    }
}

/// Severity of a reported diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

// ============================================================================
// SEVERITY POLICY
// ============================================================================

/// The policy had no level for a category it was asked about.
///
/// This is a configuration defect, not a lint finding: the run that hit it
/// must be treated as failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("no emit level configured for diagnostic category `{0}`")]
    Unconfigured(Category),
}

/// Maps each category to the level it is emitted at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeverityPolicy {
    levels: FxHashMap<Category, Level>,
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self {
            levels: Category::ALL
                .into_iter()
                .map(|category| (category, category.default_level()))
                .collect(),
        }
    }
}

impl SeverityPolicy {
    /// A policy with no levels at all. Every lookup fails until set.
    pub fn empty() -> Self {
        Self {
            levels: FxHashMap::default(),
        }
    }

    /// Set the level for a category.
    pub fn with(mut self, category: Category, level: Level) -> Self {
        self.set(category, level);
        self
    }

    pub fn set(&mut self, category: Category, level: Level) {
        self.levels.insert(category, level);
    }

    /// Look up the level for a category.
    pub fn level_for(&self, category: Category) -> Result<Level, PolicyError> {
        self.levels
            .get(&category)
            .copied()
            .ok_or(PolicyError::Unconfigured(category))
    }

    /// Does every category have a level?
    pub fn is_complete(&self) -> bool {
        Category::ALL.iter().all(|c| self.levels.contains_key(c))
    }
}

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// A reported finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: Category,
    pub severity: Severity,
    pub locator: Locator,
    pub message: Arc<str>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.locator, self.message)
    }
}

/// The outcome of checking one source unit.
///
/// `errors` and `warnings` hold rendered diagnostics (`<unit>[:<line>] <message>`)
/// in the order they were found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisResult {
    unit: Arc<str>,
    errors: Vec<String>,
    warnings: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl AnalysisResult {
    /// An empty result for a unit.
    pub fn new(unit: impl Into<Arc<str>>) -> Self {
        Self {
            unit: unit.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        let rendered = diagnostic.to_string();
        match diagnostic.severity {
            Severity::Error => self.errors.push(rendered),
            Severity::Warning => self.warnings.push(rendered),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Every reported diagnostic, errors and warnings interleaved in the order
    /// they were found.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Reported diagnostics of one category.
    pub fn of_category(&self, category: Category) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics.iter().filter(move |d| d.category == category)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// No errors and no warnings.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Routes raw findings through the policy into an [`AnalysisResult`].
#[derive(Debug)]
pub struct DiagnosticCollector<'p> {
    policy: &'p SeverityPolicy,
    result: AnalysisResult,
}

impl<'p> DiagnosticCollector<'p> {
    pub fn new(unit: impl Into<Arc<str>>, policy: &'p SeverityPolicy) -> Self {
        Self {
            policy,
            result: AnalysisResult::new(unit),
        }
    }

    /// Report a finding. Suppressed categories are dropped without a trace.
    pub fn add(
        &mut self,
        category: Category,
        line: Option<u32>,
        message: impl Into<Arc<str>>,
    ) -> Result<(), PolicyError> {
        let Some(severity) = self.policy.level_for(category)?.severity() else {
            return Ok(());
        };
        let locator = Locator::at(self.result.unit.clone(), line);
        self.result.push(Diagnostic {
            category,
            severity,
            locator,
            message: message.into(),
        });
        Ok(())
    }

    pub fn missing_namespace(&mut self) -> Result<(), PolicyError> {
        self.add(
            Category::MissingNamespace,
            None,
            "Every source file should have a namespace",
        )
    }

    /// A `use` node the front end could not shape into bindings.
    ///
    /// Goes through the policy like every category; the analyzer also logs a
    /// `tracing` warning, so a suppressed level still leaves a trace.
    pub fn malformed_import(&mut self, line: Option<u32>) -> Result<(), PolicyError> {
        self.add(Category::MalformedImport, line, "Malformed use statement")
    }

    pub fn unresolved_use(
        &mut self,
        line: Option<u32>,
        target: &QualifiedName,
    ) -> Result<(), PolicyError> {
        self.add(
            Category::UnresolvedUse,
            line,
            format!("Use '{target}' could not be resolved"),
        )
    }

    pub fn multiple_uses(&mut self, line: Option<u32>) -> Result<(), PolicyError> {
        self.add(
            Category::MultipleUsesInStatement,
            line,
            "Multiple uses in one statement is discouraged",
        )
    }

    pub fn unused_use(&mut self, alias: &str) -> Result<(), PolicyError> {
        self.add(
            Category::UnusedUse,
            None,
            format!("Use '{alias}' is not being used"),
        )
    }

    pub fn qualified_name(&mut self, line: Option<u32>) -> Result<(), PolicyError> {
        self.add(
            Category::QualifiedNameDiscouraged,
            line,
            "Use of qualified type names is discouraged.",
        )
    }

    pub fn unresolved_type(
        &mut self,
        line: Option<u32>,
        name: &QualifiedName,
    ) -> Result<(), PolicyError> {
        self.add(
            Category::UnresolvedType,
            line,
            format!("Type '{name}' could not be resolved."),
        )
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn finish(self) -> AnalysisResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_key(category.key()), Some(category));
        }
        assert_eq!(Category::from_key("no_such_category"), None);
    }

    #[test]
    fn test_default_policy_is_complete() {
        let policy = SeverityPolicy::default();
        assert!(policy.is_complete());
        assert_eq!(policy.level_for(Category::UnresolvedType), Ok(Level::Error));
        assert_eq!(policy.level_for(Category::UnusedUse), Ok(Level::Warning));
    }

    #[test]
    fn test_empty_policy_fails_loudly() {
        let policy = SeverityPolicy::empty().with(Category::UnusedUse, Level::Warning);
        assert!(!policy.is_complete());
        assert_eq!(
            policy.level_for(Category::UnresolvedType),
            Err(PolicyError::Unconfigured(Category::UnresolvedType))
        );
    }

    #[test]
    fn test_collector_routes_by_level() {
        let policy = SeverityPolicy::default()
            .with(Category::QualifiedNameDiscouraged, Level::Suppress)
            .with(Category::UnusedUse, Level::Error);
        let mut collector = DiagnosticCollector::new("a.php", &policy);

        collector.qualified_name(Some(3)).unwrap();
        collector.unused_use("Bar").unwrap();
        collector.multiple_uses(Some(2)).unwrap();

        let result = collector.finish();
        assert_eq!(result.errors(), ["a.php Use 'Bar' is not being used"]);
        assert_eq!(
            result.warnings(),
            ["a.php:2 Multiple uses in one statement is discouraged"]
        );
        assert_eq!(result.diagnostics().len(), 2);
        assert_eq!(result.of_category(Category::QualifiedNameDiscouraged).count(), 0);
    }

    #[test]
    fn test_collector_unconfigured_category() {
        let policy = SeverityPolicy::empty();
        let mut collector = DiagnosticCollector::new("a.php", &policy);

        let err = collector.missing_namespace().unwrap_err();
        assert_eq!(err, PolicyError::Unconfigured(Category::MissingNamespace));
        assert_eq!(
            err.to_string(),
            "no emit level configured for diagnostic category `missing_namespace`"
        );
        assert!(collector.result().is_clean());
    }

    #[test]
    fn test_result_counts() {
        let policy = SeverityPolicy::default();
        let mut collector = DiagnosticCollector::new("a.php", &policy);
        collector
            .unresolved_type(Some(9), &QualifiedName::parse("\\App\\Foo"))
            .unwrap();
        collector.unused_use("Foo").unwrap();

        let result = collector.finish();
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
        assert!(result.has_errors());
        assert!(!result.is_clean());
        assert_eq!(result.errors()[0], "a.php:9 Type '\\App\\Foo' could not be resolved.");
        assert_eq!(result.diagnostics()[0].severity, Severity::Error);
    }
}
