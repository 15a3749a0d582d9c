//! Rendering detail layers.
//!
//! A [`Layers`] value is a bit set selecting which parts of a type's
//! rendering are produced and which segments a [`Clip`](crate::Clip)
//! renders. The numeric value of each layer also defines the order in which
//! segment groups appear in rendered text:
//!
//! ```text
//! TYPE < MEMBERS < TYPE_END < INHERITANCE < RELATIONSHIPS < NOTES < INNER_OBJECTS
//! ```
//!
//! Layers parse from and display as `|`-separated names, e.g.
//! `"type-end|relationships"`.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::ParseError;

bitflags! {
    /// Set of rendering layers.
    ///
    /// `TYPE_END` includes the type header and both member visibilities, so
    /// rendering at `TYPE_END` yields the complete node declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Layers: u16 {
        /// Type header (node opener).
        const TYPE = 1 << 0;
        /// Private, protected and internal members.
        const NON_PUBLIC = 1 << 1;
        /// Public members.
        const PUBLIC = 1 << 2;
        /// Members of any visibility.
        const MEMBERS = Self::NON_PUBLIC.bits() | Self::PUBLIC.bits();
        /// Node closer, implying header and members.
        const TYPE_END = Self::TYPE.bits() | Self::MEMBERS.bits() | 1 << 3;
        /// Extends/implements edges.
        const INHERITANCE = 1 << 4;
        /// Aggregation and use edges.
        const RELATIONSHIPS = 1 << 5;
        /// Notes attached to the node.
        const NOTES = 1 << 6;
        /// Nested types rendered inside the declaring type's clip.
        const INNER_OBJECTS = 1 << 7;
        /// Every layer.
        const ALL = 0xFF;
    }
}

/// Layer set used to render relational pairs in a combined document.
///
/// Notes are left out even when they were requested.
pub const RELATIONAL: Layers = Layers::RELATIONSHIPS.union(Layers::INHERITANCE);

/// Names accepted by [`Layers::from_str`], in display order.
const NAMES: &[(&str, Layers)] = &[
    ("all", Layers::ALL),
    ("type-end", Layers::TYPE_END),
    ("type", Layers::TYPE),
    ("members", Layers::MEMBERS),
    ("non-public", Layers::NON_PUBLIC),
    ("public", Layers::PUBLIC),
    ("inheritance", Layers::INHERITANCE),
    ("relationships", Layers::RELATIONSHIPS),
    ("notes", Layers::NOTES),
    ("inner-objects", Layers::INNER_OBJECTS),
];

impl Layers {
    /// Check whether this set shows `target`.
    ///
    /// `ALL` shows everything; any other set shows `target` when every bit
    /// of `target` is present.
    #[must_use]
    pub fn shows(self, target: Layers) -> bool {
        self == Layers::ALL || self.contains(target)
    }

    /// True when the set only selects structural layers (header, members,
    /// footer).
    #[must_use]
    pub fn is_structural(self) -> bool {
        Layers::TYPE_END.contains(self)
    }

    /// True when the set selects anything beyond `TYPE_END`.
    #[must_use]
    pub fn exceeds_structure(self) -> bool {
        !self.difference(Layers::TYPE_END).is_empty()
    }

    /// Structural part of the set (intersection with `TYPE_END`).
    #[must_use]
    pub fn structural(self) -> Layers {
        self.intersection(Layers::TYPE_END)
    }
}

impl FromStr for Layers {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut layers = Layers::empty();
        for part in s.split('|').map(str::trim) {
            if part.eq_ignore_ascii_case("none") {
                continue;
            }
            let (_, layer) = NAMES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(part))
                .ok_or_else(|| ParseError::UnknownLayer(part.to_owned()))?;
            layers |= *layer;
        }
        Ok(layers)
    }
}

impl fmt::Display for Layers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut remaining = *self;
        let mut parts = Vec::new();
        for (name, layer) in NAMES {
            if !layer.is_empty() && remaining.contains(*layer) {
                parts.push(*name);
                remaining.remove(*layer);
            }
        }
        f.write_str(&parts.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_order() {
        assert!(Layers::TYPE < Layers::MEMBERS);
        assert!(Layers::MEMBERS < Layers::TYPE_END);
        assert!(Layers::TYPE_END < Layers::INHERITANCE);
        assert!(Layers::INHERITANCE < Layers::INNER_OBJECTS);
        assert!(Layers::RELATIONSHIPS < Layers::INNER_OBJECTS);
        assert!(Layers::NOTES < Layers::INNER_OBJECTS);
    }

    #[test]
    fn test_shows_requires_every_bit() {
        let set = Layers::TYPE | Layers::PUBLIC;
        assert!(set.shows(Layers::TYPE));
        assert!(set.shows(Layers::PUBLIC));
        assert!(!set.shows(Layers::MEMBERS));
        assert!(!set.shows(Layers::RELATIONSHIPS));
    }

    #[test]
    fn test_all_shows_everything() {
        for (_, layer) in NAMES {
            assert!(Layers::ALL.shows(*layer));
        }
    }

    #[test]
    fn test_type_end_contains_structure() {
        assert!(Layers::TYPE_END.shows(Layers::TYPE));
        assert!(Layers::TYPE_END.shows(Layers::MEMBERS));
        assert!(!Layers::TYPE_END.shows(Layers::INHERITANCE));
    }

    #[test]
    fn test_structural_classification() {
        assert!(Layers::TYPE_END.is_structural());
        assert!((Layers::TYPE | Layers::PUBLIC).is_structural());
        assert!(!Layers::ALL.is_structural());
        assert!(Layers::ALL.exceeds_structure());
        assert!((Layers::TYPE | Layers::NOTES).exceeds_structure());
        assert!(!Layers::TYPE_END.exceeds_structure());
        assert_eq!(Layers::ALL.structural(), Layers::TYPE_END);
        assert_eq!(RELATIONAL.structural(), Layers::empty());
    }

    #[test]
    fn test_parse_layer_expression() {
        assert_eq!("all".parse::<Layers>().unwrap(), Layers::ALL);
        assert_eq!(
            "type-end | relationships".parse::<Layers>().unwrap(),
            Layers::TYPE_END | Layers::RELATIONSHIPS
        );
        assert_eq!("none".parse::<Layers>().unwrap(), Layers::empty());
        assert_eq!("Public".parse::<Layers>().unwrap(), Layers::PUBLIC);
    }

    #[test]
    fn test_parse_unknown_layer() {
        let err = "type|bogus".parse::<Layers>().unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn test_display_layers() {
        assert_eq!(Layers::ALL.to_string(), "all");
        assert_eq!(
            (Layers::TYPE_END | Layers::RELATIONSHIPS).to_string(),
            "type-end|relationships"
        );
        assert_eq!((Layers::TYPE | Layers::PUBLIC).to_string(), "type|public");
        assert_eq!(Layers::empty().to_string(), "none");
    }
}
