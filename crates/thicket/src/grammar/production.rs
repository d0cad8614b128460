//! Productions: one right-hand-side alternative for a symbol.

use crate::grammar::symbol::{write_comma_separated, Attributes, Symbol};
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// An ordered sequence of symbols yielding one left-hand symbol.
///
/// Identity is structural: two occurrences of the same alternative compare
/// equal regardless of where they were allocated, which is what the engine's
/// memoization and ambiguity merging rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Production {
    rhs: Vec<Symbol>,
    lhs: Symbol,
    attributes: Attributes,
}

impl Production {
    /// A production without attributes.
    #[must_use]
    pub fn new(rhs: Vec<Symbol>, lhs: Symbol) -> Self {
        Self {
            rhs,
            lhs,
            attributes: Attributes::NoAttrs,
        }
    }

    /// A production carrying attributes.
    #[must_use]
    pub fn with_attributes(rhs: Vec<Symbol>, lhs: Symbol, attributes: Attributes) -> Self {
        Self {
            rhs,
            lhs,
            attributes,
        }
    }

    /// The right-hand-side symbols, in order.
    #[must_use]
    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    /// The symbol this production yields.
    #[must_use]
    pub const fn lhs(&self) -> &Symbol {
        &self.lhs
    }

    /// The attribute set.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Whether the right-hand side is empty.
    #[must_use]
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prod([")?;
        write_comma_separated(f, &self.rhs)?;
        write!(f, "],{},{})", self.lhs, self.attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(p: &Production) -> u64 {
        let mut hasher = DefaultHasher::new();
        p.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn structural_identity() {
        let a = Production::new(
            vec![Symbol::sort("A"), Symbol::sort("B")],
            Symbol::sort("S"),
        );
        let b = Production::new(
            vec![Symbol::sort("A"), Symbol::sort("B")],
            Symbol::sort("S"),
        );
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn canonical_rendering() {
        let p = Production::new(
            vec![Symbol::sort("A"), Symbol::sort("B")],
            Symbol::sort("S"),
        );
        assert_eq!(
            p.to_string(),
            "prod([sort(\"A\"),sort(\"B\")],sort(\"S\"),\\no-attrs())",
        );
        let eps = Production::new(vec![], Symbol::sort("E"));
        assert_eq!(eps.to_string(), "prod([],sort(\"E\"),\\no-attrs())");
        assert!(eps.is_epsilon());
    }
}
