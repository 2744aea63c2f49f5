//! Source locations for diagnostics.

use std::fmt;
use std::sync::Arc;

/// Where a diagnostic points: a source unit and, optionally, a 1-based line.
///
/// Displayed as `name` for file-level findings and `name:line` otherwise.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Locator {
    /// The source unit's name (usually its path).
    pub unit: Arc<str>,
    /// 1-indexed line number, if known.
    pub line: Option<u32>,
}

impl Locator {
    /// A file-level locator.
    pub fn file(unit: impl Into<Arc<str>>) -> Self {
        Self {
            unit: unit.into(),
            line: None,
        }
    }

    /// A locator for a line within a unit.
    pub fn at(unit: impl Into<Arc<str>>, line: Option<u32>) -> Self {
        Self {
            unit: unit.into(),
            line,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.unit, line),
            None => write!(f, "{}", self.unit),
        }
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locator({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display() {
        assert_eq!(Locator::file("src/App.php").to_string(), "src/App.php");
        assert_eq!(Locator::at("src/App.php", Some(12)).to_string(), "src/App.php:12");
        assert_eq!(Locator::at("src/App.php", None).to_string(), "src/App.php");
    }
}
