//! Names as written in source: the type-reference sites of the tree.

use smol_str::SmolStr;

use crate::base::{QualifiedName, SEPARATOR};

/// The shape of a written name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// A single bare segment, e.g. `Foo`.
    Unqualified,
    /// Two or more segments relative to the current namespace, e.g. `Foo\Bar`.
    Qualified,
    /// An absolute path with a leading separator, e.g. `\Foo\Bar`.
    FullyQualified,
}

/// A name as it appears in source.
///
/// Always has at least one segment. The [`NameKind`] is derived from the
/// shape rather than stored, so it can never disagree with the segments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Name {
    segments: Vec<SmolStr>,
    absolute: bool,
    /// 1-indexed line, absent for synthetic names.
    pub line: Option<u32>,
}

impl Name {
    /// Build a name from segments. Returns `None` if there are no segments
    /// or any segment is empty.
    pub fn new<I, S>(segments: I, absolute: bool) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let segments: Vec<SmolStr> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(Self {
            segments,
            absolute,
            line: None,
        })
    }

    /// Parse a name from its source text: `\Foo\Bar`, `Foo\Bar` or `Foo`.
    pub fn parse(text: &str) -> Option<Self> {
        let (absolute, rest) = match text.strip_prefix(SEPARATOR) {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        Self::new(rest.split(SEPARATOR), absolute)
    }

    /// Attach a source line.
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn kind(&self) -> NameKind {
        if self.absolute {
            NameKind::FullyQualified
        } else if self.segments.len() == 1 {
            NameKind::Unqualified
        } else {
            NameKind::Qualified
        }
    }

    pub fn segments(&self) -> &[SmolStr] {
        &self.segments
    }

    /// The first segment; the one looked up in the import table.
    pub fn first(&self) -> &SmolStr {
        &self.segments[0]
    }

    /// The last segment; the default alias of an import.
    pub fn last(&self) -> &SmolStr {
        &self.segments[self.segments.len() - 1]
    }

    /// Is this one of the class keywords `self`, `static` or `parent`?
    ///
    /// These name the enclosing class hierarchy rather than a type.
    pub fn is_special_class(&self) -> bool {
        self.kind() == NameKind::Unqualified
            && ["self", "static", "parent"]
                .iter()
                .any(|kw| self.segments[0].eq_ignore_ascii_case(kw))
    }

    /// Read this name as an absolute path, ignoring whether it was written
    /// with a leading separator. Import targets are always read this way.
    pub fn to_absolute(&self) -> QualifiedName {
        QualifiedName::from_segments(self.segments.iter().cloned())
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.absolute {
            write!(f, "{SEPARATOR}")?;
        }
        let sep = SEPARATOR.to_string();
        write!(f, "{}", self.segments.join(sep.as_str()))
    }
}
