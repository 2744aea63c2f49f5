//! Absolute namespace paths.

use smol_str::SmolStr;
use std::fmt;

/// The namespace separator.
pub const SEPARATOR: char = '\\';

/// An absolute, fully-qualified name anchored at the root namespace.
///
/// The root namespace has no segments and renders as a lone `\`.
/// Every other name renders with a leading separator, e.g. `\Foo\Bar`.
#[derive(Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct QualifiedName {
    segments: Vec<SmolStr>,
}

impl QualifiedName {
    /// The root namespace.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a name from its segments, outermost first.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a rendered name. Leading and doubled separators are ignored,
    /// so `\Foo\Bar` and `Foo\Bar` give the same result.
    pub fn parse(text: &str) -> Self {
        Self::from_segments(text.split(SEPARATOR).filter(|s| !s.is_empty()))
    }

    /// Is this the root namespace?
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    /// The innermost segment, `None` for the root.
    pub fn last(&self) -> Option<&SmolStr> {
        self.segments.last()
    }

    /// The enclosing namespace, `None` for the root.
    pub fn parent(&self) -> Option<QualifiedName> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    /// Append relative segments to this name.
    pub fn join<'s, I>(&self, rest: I) -> QualifiedName
    where
        I: IntoIterator<Item = &'s SmolStr>,
    {
        let mut segments = self.segments.clone();
        segments.extend(rest.into_iter().cloned());
        Self { segments }
    }

    /// Iterate over this name and all of its enclosing namespaces,
    /// innermost first, excluding the root.
    pub fn ancestors(&self) -> impl Iterator<Item = QualifiedName> + '_ {
        (1..=self.segments.len())
            .rev()
            .map(|len| Self::from_segments(self.segments[..len].iter().cloned()))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{SEPARATOR}");
        }
        for segment in &self.segments {
            write!(f, "{SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedName({self})")
    }
}
