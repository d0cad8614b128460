//! Grammar symbols and production attributes.
//!
//! Symbols are immutable value types with structural equality. They serve
//! both as grammar vocabulary and as parse-tree labels, and their `Display`
//! implementations produce the canonical textual form used by the parse-tree
//! serialization (`sort("S")`, `lit("a")`, `\char-class([single(97)])`, ...).

use compact_str::CompactString;
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A grammar symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Symbol {
    /// A named nonterminal.
    Sort(CompactString),
    /// A fixed character sequence.
    Literal(CompactString),
    /// A single character drawn from a set of codepoint ranges.
    CharClass(Vec<CharRange>),
    /// Zero or one occurrence of the inner symbol.
    Optional(Box<Symbol>),
    /// One or more occurrences of the element, optionally separated.
    Iteration {
        element: Box<Symbol>,
        separator: Option<Box<Symbol>>,
    },
    /// A fixed sequence of symbols usable where a single symbol is expected.
    Sequence(Vec<Symbol>),
}

impl Symbol {
    /// A named sort.
    #[must_use]
    pub fn sort(name: &str) -> Self {
        Self::Sort(name.into())
    }

    /// A literal string.
    #[must_use]
    pub fn lit(text: &str) -> Self {
        Self::Literal(text.into())
    }

    /// A character class over the given ranges.
    #[must_use]
    pub fn char_class(ranges: impl Into<Vec<CharRange>>) -> Self {
        Self::CharClass(ranges.into())
    }

    /// An optional occurrence of `inner`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// One or more occurrences of `element`.
    #[must_use]
    pub fn iter(element: Self) -> Self {
        Self::Iteration {
            element: Box::new(element),
            separator: None,
        }
    }

    /// One or more occurrences of `element`, separated by `separator`.
    #[must_use]
    pub fn iter_sep(element: Self, separator: Self) -> Self {
        Self::Iteration {
            element: Box::new(element),
            separator: Some(Box::new(separator)),
        }
    }

    /// A sequence of symbols.
    #[must_use]
    pub fn seq(parts: impl Into<Vec<Self>>) -> Self {
        Self::Sequence(parts.into())
    }

    /// The sort name, if this is a named sort.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Sort(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this symbol is an iteration (with or without separator).
    #[must_use]
    pub const fn is_iteration(&self) -> bool {
        matches!(self, Self::Iteration { .. })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sort(name) => write!(f, "sort(\"{}\")", escape(name)),
            Self::Literal(text) => write!(f, "lit(\"{}\")", escape(text)),
            Self::CharClass(ranges) => {
                write!(f, "\\char-class([")?;
                write_comma_separated(f, ranges)?;
                write!(f, "])")
            }
            Self::Optional(inner) => write!(f, "opt({inner})"),
            Self::Iteration {
                element,
                separator: None,
            } => write!(f, "iter({element})"),
            Self::Iteration {
                element,
                separator: Some(sep),
            } => write!(f, "\\iter-seps({element},[{sep}])"),
            Self::Sequence(parts) => {
                write!(f, "seq([")?;
                write_comma_separated(f, parts)?;
                write!(f, "])")
            }
        }
    }
}

/// A codepoint range inside a character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum CharRange {
    /// Exactly one codepoint.
    Single(u32),
    /// An inclusive codepoint range.
    Range(u32, u32),
}

impl CharRange {
    /// A range matching exactly `c`.
    #[must_use]
    pub const fn single(c: char) -> Self {
        Self::Single(c as u32)
    }

    /// An inclusive range from `lo` to `hi`.
    #[must_use]
    pub const fn range(lo: char, hi: char) -> Self {
        Self::Range(lo as u32, hi as u32)
    }

    /// Whether `cp` falls inside this range.
    #[must_use]
    pub const fn contains(self, cp: u32) -> bool {
        match self {
            Self::Single(c) => cp == c,
            Self::Range(lo, hi) => lo <= cp && cp <= hi,
        }
    }
}

impl fmt::Display for CharRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(c) => write!(f, "single({c})"),
            Self::Range(lo, hi) => write!(f, "range({lo},{hi})"),
        }
    }
}

/// Production attributes, carried but not interpreted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Attributes {
    /// No attributes.
    #[default]
    NoAttrs,
    /// A non-empty attribute list.
    Attrs(Vec<Attribute>),
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAttrs => write!(f, "\\no-attrs()"),
            Self::Attrs(attrs) => {
                write!(f, "attrs([")?;
                write_comma_separated(f, attrs)?;
                write!(f, "])")
            }
        }
    }
}

/// A single production attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Attribute {
    /// Associativity metadata.
    Assoc(Associativity),
    /// Marks a bracketing production.
    Bracket,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assoc(Associativity::Left) => write!(f, "assoc(left())"),
            Self::Assoc(Associativity::Right) => write!(f, "assoc(right())"),
            Self::Assoc(Associativity::NonAssoc) => write!(f, "assoc(\\non-assoc())"),
            Self::Bracket => write!(f, "bracket()"),
        }
    }
}

/// Associativity of a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Associativity {
    Left,
    Right,
    NonAssoc,
}

fn escape(text: &str) -> CompactString {
    let mut out = CompactString::default();
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

pub(crate) fn write_comma_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_compare_structurally() {
        assert_eq!(Symbol::sort("A"), Symbol::sort("A"));
        assert_ne!(Symbol::sort("A"), Symbol::lit("A"));
        assert_eq!(
            Symbol::iter_sep(Symbol::sort("E"), Symbol::lit(",")),
            Symbol::iter_sep(Symbol::sort("E"), Symbol::lit(",")),
        );
    }

    #[test]
    fn canonical_rendering() {
        assert_eq!(Symbol::sort("S").to_string(), "sort(\"S\")");
        assert_eq!(Symbol::lit("a").to_string(), "lit(\"a\")");
        assert_eq!(
            Symbol::char_class(vec![CharRange::single('a'), CharRange::range('0', '9')])
                .to_string(),
            "\\char-class([single(97),range(48,57)])",
        );
        assert_eq!(
            Symbol::optional(Symbol::sort("A")).to_string(),
            "opt(sort(\"A\"))",
        );
        assert_eq!(
            Symbol::iter_sep(Symbol::sort("A"), Symbol::lit(",")).to_string(),
            "\\iter-seps(sort(\"A\"),[lit(\",\")])",
        );
        assert_eq!(Attributes::NoAttrs.to_string(), "\\no-attrs()");
        assert_eq!(
            Attributes::Attrs(vec![Attribute::Assoc(Associativity::Left)]).to_string(),
            "attrs([assoc(left())])",
        );
    }

    #[test]
    fn literal_text_is_escaped() {
        assert_eq!(Symbol::lit("\"").to_string(), "lit(\"\\\"\")");
        assert_eq!(Symbol::lit("\\").to_string(), "lit(\"\\\\\")");
    }

    #[test]
    fn char_range_containment() {
        assert!(CharRange::single('a').contains('a' as u32));
        assert!(!CharRange::single('a').contains('b' as u32));
        assert!(CharRange::range('a', 'z').contains('m' as u32));
        assert!(!CharRange::range('a', 'z').contains('0' as u32));
    }
}
