//! Formatting strategy contract.
//!
//! A [`DiagramSyntax`] binds a [`FormattingStrategy`] to one type. The
//! strategy owns every literal token of the target syntax; the shared rules
//! (exclusions, marker interfaces, relationship inference, visibility
//! precedence) live here so every syntax applies them the same way.

use crate::metadata::{
    Access, AttributeInfo, ConstructorInfo, EventInfo, FieldInfo, MethodInfo, ParameterInfo,
    PropertyInfo, TypeDescriptor, TypeKind, TypeRef,
};
use crate::names::{as_slug, normalize_name_string, normalize_type_ref};
use crate::segment::MemberKind;

/// Default exclusion prefixes for framework noise.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["System.", "Windows.", "Microsoft."];

/// Marker interface whose implements edge is always suppressed.
const NULLABLE_MARKER: &str = "INullable";

/// Node keyword derived from a type's declared kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Class,
    AbstractClass,
    Enum,
    Interface,
    /// Value types and anything else.
    Entity,
}

impl ObjectType {
    #[must_use]
    pub fn of(ty: &TypeDescriptor) -> Self {
        match ty.kind {
            TypeKind::Class | TypeKind::Delegate if ty.is_abstract => ObjectType::AbstractClass,
            TypeKind::Class | TypeKind::Delegate => ObjectType::Class,
            TypeKind::Enum => ObjectType::Enum,
            TypeKind::Interface => ObjectType::Interface,
            TypeKind::Struct => ObjectType::Entity,
        }
    }
}

/// Resolved visibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Family,
    Private,
    Assembly,
}

impl Visibility {
    /// Resolve access flags with precedence public > family > private > assembly.
    #[must_use]
    pub fn of(access: Access) -> Option<Self> {
        if access.public {
            Some(Visibility::Public)
        } else if access.family {
            Some(Visibility::Family)
        } else if access.private {
            Some(Visibility::Private)
        } else if access.assembly {
            Some(Visibility::Assembly)
        } else {
            None
        }
    }
}

/// Kind of a relationship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// Member holds many targets (array or single-argument container).
    Aggregation,
    /// Member refers to one target.
    Use,
}

/// Relationship inferred from a member's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub kind: RelationshipKind,
    /// Type the edge points at.
    pub target: TypeRef,
}

impl Relationship {
    /// Infer the relationship for a member of type `ty`.
    ///
    /// Arrays are checked first and aggregate their element type. A generic
    /// type with exactly one argument aggregates that argument unless it
    /// normalizes to `object`. Everything else is a use of `ty` itself.
    #[must_use]
    pub fn infer(ty: &TypeRef) -> Self {
        if let Some(element) = &ty.element_type {
            return Self {
                kind: RelationshipKind::Aggregation,
                target: element.as_ref().clone(),
            };
        }
        if let Some(name) = ty.name.strip_suffix("[]") {
            return Self {
                kind: RelationshipKind::Aggregation,
                target: TypeRef::new(name, ty.namespace.as_deref()),
            };
        }
        if let [argument] = ty.generic_arguments.as_slice()
            && normalize_type_ref(argument) != "object"
        {
            return Self {
                kind: RelationshipKind::Aggregation,
                target: argument.clone(),
            };
        }
        Self {
            kind: RelationshipKind::Use,
            target: ty.clone(),
        }
    }

    /// Normalized name of the target.
    #[must_use]
    pub fn target_name(&self) -> String {
        normalize_type_ref(&self.target)
    }
}

/// Names a formatting strategy is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    display_name: String,
    full_name: String,
    local_name: String,
    slug: String,
    object_type: ObjectType,
    is_static: bool,
    exclusions: Vec<String>,
}

impl TypeBinding {
    /// Bind to `ty`, suppressing names that start with any of `exclusions`.
    #[must_use]
    pub fn new(ty: &TypeDescriptor, exclusions: &[String]) -> Self {
        let full_name = normalize_type_ref(&ty.as_type_ref());
        let local_name = ty
            .namespace
            .as_deref()
            .and_then(|ns| full_name.strip_prefix(ns))
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(&full_name)
            .to_owned();
        Self {
            display_name: normalize_name_string(&ty.name),
            slug: as_slug(&full_name),
            full_name,
            local_name,
            object_type: ObjectType::of(ty),
            is_static: ty.is_static(),
            exclusions: exclusions.to_vec(),
        }
    }

    /// Short name shown on the node.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Normalized full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Normalized full name without the namespace prefix. Keeps generic
    /// arguments, so `Box` and ``Box`1`` stay distinct.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Node identifier.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Abstract and sealed.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[must_use]
    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    /// True when `full_name` starts with an exclusion prefix.
    #[must_use]
    pub fn is_excluded(&self, full_name: &str) -> bool {
        self.exclusions
            .iter()
            .any(|prefix| full_name.starts_with(prefix.as_str()))
    }
}

/// Turns metadata of one bound type into text of one diagram syntax.
///
/// Every method is a pure function of the binding and its arguments.
/// Returned text carries no trailing newline; an empty string means "nothing
/// to draw".
pub trait FormattingStrategy: Send + Sync {
    /// Type this strategy is bound to.
    fn binding(&self) -> &TypeBinding;

    /// Node opener. `attributes` is the rendered attribute block, shown
    /// only when `show_attributes` is set.
    fn start_type(&self, show_attributes: bool, attributes: &str) -> String;

    /// Node closer.
    fn end_type(&self) -> String;

    /// Attribute block, or empty text when `show_attributes` is unset or
    /// there is nothing to list.
    fn attributes(&self, attributes: &[AttributeInfo], show_attributes: bool) -> String;

    /// Inheritance edge to an already normalized base name.
    fn extends_edge(&self, base_name: &str) -> String;

    /// Interface edge to an already normalized interface name.
    fn implements_edge(&self, interface_name: &str) -> String;

    /// Aggregation or use edge for `member`.
    fn relationship(&self, member: &str, relationship: &Relationship) -> String;

    fn field(&self, field: &FieldInfo, attributes: &str) -> String;

    fn property(&self, property: &PropertyInfo, attributes: &str) -> String;

    /// `name` is the display name, generic parameters included.
    fn method(&self, method: &MethodInfo, name: &str, attributes: &str) -> String;

    fn ctor(&self, ctor: &ConstructorInfo, attributes: &str) -> String;

    fn event(&self, event: &EventInfo, attributes: &str) -> String;

    /// Section separator placed before the first member of `kind`.
    fn divider(&self, kind: MemberKind) -> String;

    fn parameter_list(&self, parameters: &[ParameterInfo]) -> String;

    /// Edge to the base type, or empty text when the base is unset, the
    /// root object type, or excluded.
    fn extends(&self, base: Option<&TypeRef>) -> String {
        let Some(base) = base else {
            return String::new();
        };
        if base.name == "Object" || self.binding().is_excluded(&base.full_name()) {
            return String::new();
        }
        self.extends_edge(&normalize_type_ref(base))
    }

    /// Edge to an implemented interface, or empty text for the nullable
    /// marker.
    fn implements(&self, interface: &TypeRef) -> String {
        if interface.name == NULLABLE_MARKER {
            return String::new();
        }
        self.implements_edge(&normalize_type_ref(interface))
    }
}

/// A target diagram syntax.
pub trait DiagramSyntax: Send + Sync {
    /// Bind a formatting strategy to one type.
    fn bind(&self, binding: TypeBinding) -> Box<dyn FormattingStrategy>;

    /// Default document file extension, without the dot.
    fn extension(&self) -> &'static str;
}
