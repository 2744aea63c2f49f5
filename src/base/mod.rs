//! Foundation types for the bugfree checker.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`QualifiedName`] - Absolute namespace paths
//! - [`Locator`] - Unit name plus optional line, for diagnostics
//!
//! This module has NO dependencies on other bugfree modules.

mod locator;
mod qualified;

pub use locator::Locator;
pub use qualified::{QualifiedName, SEPARATOR};
