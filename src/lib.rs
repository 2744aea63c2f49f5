//! # bugfree-base
//!
//! Core library for checking the names a PHP source file references.
//!
//! For one parsed file it verifies that every `use` import and every type
//! reference resolves to something that exists, discourages multi-binding
//! `use` statements and relative qualified names, and reports imports that
//! are never used.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! config  → JSON configuration (emit levels)
//!   ↓
//! hir     → Analyzer, name resolution, imports, diagnostics
//!   ↓
//! syntax  → The consumed syntax tree (parsing is external)
//!   ↓
//! base    → Primitives (QualifiedName, Locator)
//! ```
//!
//! ## Usage
//!
//! ```
//! use bugfree::hir::{KnownNames, SeverityPolicy, SourceUnit, check_unit};
//! use bugfree::syntax::{Expr, Name, Stmt, UseItem};
//!
//! let name = |text: &str| Name::parse(text).unwrap();
//! let unit = SourceUnit::new(
//!     "src/App.php",
//!     vec![Stmt::namespace(
//!         name("App"),
//!         vec![
//!             Stmt::uses(vec![UseItem::alias(name("Foo\\Bar"), None)]),
//!             Stmt::expr(Expr::static_call(name("Bar"), "baz", vec![])),
//!         ],
//!     )],
//! );
//! let resolver: KnownNames = ["\\Foo\\Bar"].into_iter().collect();
//!
//! let result = check_unit(&unit, &resolver, &SeverityPolicy::default()).unwrap();
//! assert!(result.is_clean());
//! ```

/// Foundation types: QualifiedName, Locator
pub mod base;

/// Checker configuration
pub mod config;

/// Semantic checking: the analyzer and its collaborators
pub mod hir;

/// Syntax tree consumed by the analyzer
pub mod syntax;

pub use base::{Locator, QualifiedName};
pub use config::{Config, ConfigError};
pub use hir::{AnalysisResult, Analyzer, NameResolver, SeverityPolicy, SourceUnit, check_unit};
