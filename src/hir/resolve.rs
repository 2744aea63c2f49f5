//! Name resolution: turning written type references into fully-qualified names.
//!
//! Resolution happens in two steps:
//!
//! 1. **Qualification** ([`qualify`]) - a pure function of the written [`Name`],
//!    the current namespace and the [`ImportTable`]:
//!    - `\A\B` (fully qualified) is taken as written, imports are not consulted
//!    - `A\B` / `A` whose first segment is an imported alias has that segment
//!      replaced by the alias target
//!    - anything else is prefixed with the current namespace
//! 2. **Existence** - the computed name is checked against a [`NameResolver`],
//!    the oracle that knows which classes and namespaces exist.
//!
//! [`resolve_reference`] runs both steps and records the alias use.

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::imports::ImportTable;
use crate::base::QualifiedName;
use crate::syntax::{Name, NameKind};

// ============================================================================
// RESOLVER CAPABILITY
// ============================================================================

/// Answers whether a fully-qualified name denotes something that exists.
///
/// Implementations wrap whatever symbol source backs the check: the project
/// tree, library stubs, built-in classes. Queries never mutate observable
/// state, so a resolver shared between threads only needs to be `Sync`.
pub trait NameResolver {
    /// `name` is absolute and rendered with a leading separator, e.g. `\Foo\Bar`.
    fn is_valid(&self, name: &str) -> bool;
}

impl<F> NameResolver for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid(&self, name: &str) -> bool {
        self(name)
    }
}

/// A resolver backed by a set of known names.
///
/// Registering a name also registers every namespace that encloses it, so
/// importing a namespace (`use Foo;` for `\Foo\Bar`) resolves. Lookups are
/// ASCII case-insensitive, like PHP class and namespace names.
#[derive(Clone, Debug, Default)]
pub struct KnownNames {
    names: FxHashSet<SmolStr>,
}

impl KnownNames {
    /// Create a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fully-qualified name and its enclosing namespaces.
    pub fn insert(&mut self, name: &str) {
        let name = QualifiedName::parse(name);
        for ancestor in name.ancestors() {
            self.names.insert(Self::key(&ancestor));
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&Self::key(&QualifiedName::parse(name)))
    }

    /// Number of registered names, namespaces included.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn key(name: &QualifiedName) -> SmolStr {
        SmolStr::new(name.to_string().to_ascii_lowercase())
    }
}

impl NameResolver for KnownNames {
    fn is_valid(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<S: AsRef<str>> FromIterator<S> for KnownNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut known = Self::new();
        for name in iter {
            known.insert(name.as_ref());
        }
        known
    }
}

/// Memoizes the answers of a slower resolver.
///
/// Thread-safe via internal locking; one cache can serve a whole batch run.
#[derive(Debug)]
pub struct CachingResolver<R> {
    inner: R,
    cache: RwLock<FxHashMap<SmolStr, bool>>,
}

impl<R: NameResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RwLock::new(FxHashMap::default()),
        }
    }

    /// Number of distinct names answered so far.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: NameResolver> NameResolver for CachingResolver<R> {
    fn is_valid(&self, name: &str) -> bool {
        // Fast path: read lock
        if let Some(&known) = self.cache.read().get(name) {
            return known;
        }

        // Ask outside the lock; the inner resolver may be slow.
        let answer = self.inner.is_valid(name);
        self.cache.write().entry(SmolStr::new(name)).or_insert(answer);
        answer
    }
}

// ============================================================================
// QUALIFICATION
// ============================================================================

/// Where the first segment of a qualified name came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Written fully qualified.
    Absolute,
    /// Substituted from the named import alias.
    Import(SmolStr),
    /// Prefixed with the current namespace.
    Namespace,
}

/// A written name expanded to its fully-qualified form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qualified {
    pub name: QualifiedName,
    pub origin: Origin,
}

/// Compute the fully-qualified form of a written name.
///
/// Pure: the import table is only read. Recording the alias use is the
/// caller's job (see [`resolve_reference`]).
pub fn qualify(name: &Name, namespace: &QualifiedName, imports: &ImportTable) -> Qualified {
    if name.kind() == NameKind::FullyQualified {
        return Qualified {
            name: QualifiedName::from_segments(name.segments().iter().cloned()),
            origin: Origin::Absolute,
        };
    }

    let (first, rest) = (name.first(), &name.segments()[1..]);
    match imports.get(first) {
        Some(entry) => Qualified {
            name: entry.target().join(rest),
            origin: Origin::Import(first.clone()),
        },
        None => Qualified {
            name: namespace.join(name.segments()),
            origin: Origin::Namespace,
        },
    }
}

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

/// Result of resolving a reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// The computed name exists.
    Found(QualifiedName),
    /// The computed name is unknown to the resolver.
    NotFound(QualifiedName),
}

impl ResolveResult {
    /// The computed fully-qualified name, found or not.
    pub fn name(&self) -> &QualifiedName {
        match self {
            ResolveResult::Found(name) | ResolveResult::NotFound(name) => name,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ResolveResult::Found(_))
    }
}

/// Qualify a reference, count the alias use, and check the result exists.
pub fn resolve_reference<R>(
    name: &Name,
    namespace: &QualifiedName,
    imports: &mut ImportTable,
    resolver: &R,
) -> ResolveResult
where
    R: NameResolver + ?Sized,
{
    let qualified = qualify(name, namespace, imports);
    if let Origin::Import(alias) = &qualified.origin {
        imports.mark_used(alias);
    }

    tracing::trace!(
        "[RESOLVE] '{}' -> {} ({:?})",
        name,
        qualified.name,
        qualified.origin
    );

    if resolver.is_valid(&qualified.name.to_string()) {
        ResolveResult::Found(qualified.name)
    } else {
        ResolveResult::NotFound(qualified.name)
    }
}
