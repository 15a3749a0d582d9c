//! Rendered fragments of a type.

use crate::layer::Layers;

/// Kind of metadata element a segment was rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Headers, footers, dividers and edges.
    None,
    Field,
    Property,
    Method,
    Ctor,
    Event,
    Extends,
    Implements,
    InnerType,
    Attribute,
}

impl MemberKind {
    /// Plural label used by member dividers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MemberKind::Field => "fields",
            MemberKind::Property => "properties",
            MemberKind::Method => "methods",
            MemberKind::Ctor => "constructors",
            MemberKind::Event => "events",
            MemberKind::Attribute => "attributes",
            MemberKind::None
            | MemberKind::Extends
            | MemberKind::Implements
            | MemberKind::InnerType => "",
        }
    }
}

/// One rendered fragment of a type.
///
/// Segments are immutable once created. `origin` names the metadata element
/// the text came from and is only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    layer: Layers,
    text: String,
    kind: MemberKind,
    origin: String,
}

impl Segment {
    /// Create a segment.
    #[must_use]
    pub fn new(
        layer: Layers,
        text: impl Into<String>,
        kind: MemberKind,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            layer,
            text: text.into(),
            kind,
            origin: origin.into(),
        }
    }

    /// Layer the segment belongs to.
    #[must_use]
    pub fn layer(&self) -> Layers {
        self.layer
    }

    /// Raw segment text (may be empty).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Name of the originating metadata element.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// True when the text is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
