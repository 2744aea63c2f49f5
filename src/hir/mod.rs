//! Semantic checking: name resolution, import tracking and diagnostics.
//!
//! ## Module Structure
//!
//! ```text
//! analyzer    → walks a SourceUnit, drives everything below
//!   ↓
//! resolve     → qualification + the NameResolver oracle
//! imports     → alias table with use counters
//! diagnostics → categories, severity policy, results
//!   ↓
//! input       → SourceUnit / SourceSet
//! ```

mod analyzer;
mod diagnostics;
mod imports;
mod input;
mod resolve;

pub use analyzer::{Analyzer, check_unit, check_units};
pub use diagnostics::{
    AnalysisResult, Category, Diagnostic, DiagnosticCollector, Level, PolicyError, Severity,
    SeverityPolicy,
};
pub use imports::{ImportEntry, ImportTable};
pub use input::{SourceSet, SourceUnit};
pub use resolve::{
    CachingResolver, KnownNames, NameResolver, Origin, Qualified, ResolveResult, qualify,
    resolve_reference,
};
