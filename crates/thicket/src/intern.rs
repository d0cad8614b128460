//! String interning for sort names.
//!
//! Sort names are interned once during grammar construction and resolved
//! read-only afterwards. Freezing the interner turns it into a reader that is
//! `Send + Sync`, so a built [`crate::grammar::Grammar`] can be shared across
//! threads running independent parses.

use lasso::{Rodeo, RodeoReader, Spur};
use std::fmt;

/// A lightweight handle to an interned string.
///
/// Handles are cheap to copy and compare; resolving the text requires the
/// interner that produced them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InternedStr(Spur);

impl fmt::Debug for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternedStr({:?})", self.0)
    }
}

/// Mutable interner used while a grammar is being built.
#[derive(Debug, Default)]
pub struct Interner {
    rodeo: Rodeo,
}

impl Interner {
    /// Create an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning the existing handle if it was seen before.
    pub fn intern(&mut self, text: &str) -> InternedStr {
        InternedStr(self.rodeo.get_or_intern(text))
    }

    /// Look up a string without interning it.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<InternedStr> {
        self.rodeo.get(text).map(InternedStr)
    }

    /// Resolve a handle back to its text.
    #[must_use]
    pub fn resolve(&self, key: InternedStr) -> &str {
        self.rodeo.resolve(&key.0)
    }

    /// Freeze the interner into a read-only, thread-shareable form.
    #[must_use]
    pub fn freeze(self) -> FrozenInterner {
        FrozenInterner {
            reader: self.rodeo.into_reader(),
        }
    }
}

/// Read-only interner owned by a built grammar.
pub struct FrozenInterner {
    reader: RodeoReader,
}

impl FrozenInterner {
    /// Resolve a handle back to its text.
    #[must_use]
    pub fn resolve(&self, key: InternedStr) -> &str {
        self.reader.resolve(&key.0)
    }

    /// Look up a previously interned string.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<InternedStr> {
        self.reader.get(text).map(InternedStr)
    }

    /// Number of interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reader.len()
    }

    /// Whether the interner is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reader.is_empty()
    }
}

impl fmt::Debug for FrozenInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrozenInterner")
            .field("len", &self.len())
            .finish()
    }
}
