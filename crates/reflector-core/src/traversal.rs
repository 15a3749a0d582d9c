//! Type traversal.
//!
//! [`TypeHolder`] walks one type's metadata through a bound
//! [`FormattingStrategy`] and collects the produced segments into a
//! [`Clip`]. Generation runs in two phases over the requested layers:
//!
//! 1. Structure, clamped to `TYPE_END`: header, members grouped by kind,
//!    footer, then nested types.
//! 2. Relations, only when the request reaches past `TYPE_END`:
//!    inheritance edges, relationship edges and notes.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use crate::clip::{AssemblyId, Clip};
use crate::generator::{DiagramSyntax, FormattingStrategy, Relationship, TypeBinding};
use crate::layer::Layers;
use crate::metadata::{FieldInfo, PropertyInfo, TypeDescriptor, TypeRef};
use crate::names::{is_aliased, normalize_type_ref};
use crate::segment::{MemberKind, Segment};

/// Suffix of compiler-generated property backing fields.
const BACKING_FIELD_SUFFIX: &str = "_BackingField";

/// Suffix of event handler delegate types.
const EVENT_HANDLER_SUFFIX: &str = "EventHandler";

/// Accessor method prefixes, matched case-insensitively.
const PROPERTY_ACCESSORS: &[&str] = &["get_", "set_", "init_"];

/// Event accessor method prefixes.
const EVENT_ACCESSORS: &[&str] = &["add_", "remove_"];

/// Drives one type through a formatting strategy.
pub struct TypeHolder<'a> {
    ty: &'a TypeDescriptor,
    syntax: &'a dyn DiagramSyntax,
    exclusions: &'a [String],
    generator: Box<dyn FormattingStrategy>,
    members: Vec<Arc<Segment>>,
}

impl<'a> TypeHolder<'a> {
    /// Bind `syntax` to `ty`.
    #[must_use]
    pub fn new(
        ty: &'a TypeDescriptor,
        syntax: &'a dyn DiagramSyntax,
        exclusions: &'a [String],
    ) -> Self {
        let generator = syntax.bind(TypeBinding::new(ty, exclusions));
        Self {
            ty,
            syntax,
            exclusions,
            generator,
            members: Vec::new(),
        }
    }

    /// The bound formatting strategy.
    #[must_use]
    pub fn generator(&self) -> &dyn FormattingStrategy {
        self.generator.as_ref()
    }

    /// Every segment created so far, across all `generate` calls.
    #[must_use]
    pub fn members(&self) -> &[Arc<Segment>] {
        &self.members
    }

    /// Build a fresh clip for `layers`.
    ///
    /// Never fails: missing optional metadata renders as empty text, and a
    /// phase with nothing to show contributes no segments.
    pub fn generate(&mut self, layers: Layers, show_attributes: bool) -> Clip {
        let ty = self.ty;
        let mut clip = Clip::new(
            self.generator.binding().local_name(),
            ty.namespace.clone(),
            AssemblyId::new(ty.assembly.as_str()),
        );

        self.structure(&mut clip, layers, show_attributes);

        if layers.exceeds_structure() {
            if layers.intersects(Layers::INHERITANCE) {
                self.inheritance(&mut clip);
            }
            if layers.intersects(Layers::RELATIONSHIPS) && !ty.is_enum() {
                self.relationships(&mut clip);
            }
            // Notes produce no segments.
        }

        tracing::debug!(
            type_name = %self.generator.binding().full_name(),
            layers = %layers,
            segments = clip.segments().len(),
            "Generated clip"
        );
        clip
    }

    fn push(
        &mut self,
        clip: &mut Clip,
        layer: Layers,
        text: String,
        kind: MemberKind,
        origin: &str,
    ) {
        let segment = Arc::new(Segment::new(layer, text, kind, origin));
        self.members.push(Arc::clone(&segment));
        clip.append(segment);
    }

    fn structure(&mut self, clip: &mut Clip, layers: Layers, show_attributes: bool) {
        let ty = self.ty;
        let structural = layers.structural();
        let with_type = structural.intersects(Layers::TYPE);

        if with_type {
            let attributes = self.generator.attributes(&ty.attributes, show_attributes);
            let header = self.generator.start_type(show_attributes, &attributes);
            self.push(clip, Layers::TYPE, header, MemberKind::None, &ty.name);
        }

        self.emit_members(clip, structural, show_attributes);

        if !with_type {
            return;
        }

        let footer = self.generator.end_type();
        self.push(clip, Layers::TYPE_END, footer, MemberKind::None, &ty.name);

        for nested in &ty.nested_types {
            let nested = with_declaring_type(nested, ty);
            let text = TypeHolder::new(&nested, self.syntax, self.exclusions)
                .generate(layers, show_attributes)
                .render(layers);
            self.push(clip, Layers::INNER_OBJECTS, text, MemberKind::InnerType, &nested.name);
        }
    }

    fn emit_members(&mut self, clip: &mut Clip, layers: Layers, show: bool) {
        let ty = self.ty;

        let fields: Vec<_> = ty
            .fields
            .iter()
            .filter(|f| is_declared_field(f) && !f.field_type.name.ends_with(EVENT_HANDLER_SUFFIX))
            .collect();
        self.member_group(
            clip,
            layers,
            MemberKind::Field,
            &fields,
            |f| f.access.public,
            |g, f| (f.name.clone(), g.field(f, &g.attributes(&f.attributes, show))),
        );

        let ctors: Vec<_> = ty.constructors.iter().filter(|c| !c.is_static).collect();
        self.member_group(
            clip,
            layers,
            MemberKind::Ctor,
            &ctors,
            |c| c.access.public,
            |g, c| ("ctor".to_owned(), g.ctor(c, &g.attributes(&c.attributes, show))),
        );

        let properties: Vec<_> = ty.properties.iter().filter(|p| !p.inherited).collect();
        self.member_group(
            clip,
            layers,
            MemberKind::Property,
            &properties,
            PropertyInfo::is_public,
            |g, p| (p.name.clone(), g.property(p, &g.attributes(&p.attributes, show))),
        );

        let methods: Vec<_> = ty
            .methods
            .iter()
            .filter(|m| !m.inherited && !is_accessor_method(&m.name))
            .collect();
        self.member_group(
            clip,
            layers,
            MemberKind::Method,
            &methods,
            |m| m.access.public,
            |g, m| {
                let name = generic_method_name(&m.name, &m.generic_arguments);
                let attributes = g.attributes(&m.attributes, show);
                (m.name.clone(), g.method(m, &name, &attributes))
            },
        );

        let events: Vec<_> = ty.events.iter().filter(|e| !e.inherited).collect();
        self.member_group(
            clip,
            layers,
            MemberKind::Event,
            &events,
            |e| e.access.public,
            |g, e| (e.name.clone(), g.event(e, &g.attributes(&e.attributes, show))),
        );
    }

    /// Emit one divider and the selected members of one kind, non-public
    /// before public.
    fn member_group<T>(
        &mut self,
        clip: &mut Clip,
        layers: Layers,
        kind: MemberKind,
        items: &[&T],
        is_public: impl Fn(&T) -> bool,
        render: impl Fn(&dyn FormattingStrategy, &T) -> (String, String),
    ) {
        let (public, non_public): (Vec<&T>, Vec<&T>) =
            items.iter().copied().partition(|item| is_public(*item));

        let show_non_public = layers.intersects(Layers::NON_PUBLIC) && !non_public.is_empty();
        let show_public = layers.intersects(Layers::PUBLIC) && !public.is_empty();
        if !show_non_public && !show_public {
            return;
        }

        let divider = self.generator.divider(kind);
        self.push(clip, Layers::MEMBERS, divider, MemberKind::None, kind.label());

        let selected = non_public
            .iter()
            .filter(|_| show_non_public)
            .chain(public.iter().filter(|_| show_public));
        for item in selected {
            let (origin, text) = render(self.generator.as_ref(), *item);
            self.push(clip, Layers::MEMBERS, text, kind, &origin);
        }
    }

    fn inheritance(&mut self, clip: &mut Clip) {
        let ty = self.ty;

        let extends = self.generator.extends(ty.base_type.as_ref());
        let origin = ty.base_type.as_ref().map_or("", |b| b.name.as_str());
        self.push(clip, Layers::INHERITANCE, extends, MemberKind::Extends, origin);

        let mut interfaces: Vec<(String, &TypeRef)> =
            ty.interfaces.iter().map(|i| (i.full_name(), i)).collect();
        interfaces.sort_by(|a, b| a.0.cmp(&b.0));

        for (full_name, interface) in interfaces {
            if self.generator.binding().is_excluded(&full_name) {
                continue;
            }
            let text = self.generator.implements(interface);
            self.push(clip, Layers::INHERITANCE, text, MemberKind::Implements, &interface.name);
        }
    }

    fn relationships(&mut self, clip: &mut Clip) {
        let ty = self.ty;

        let fields = ty
            .fields
            .iter()
            .filter(|f| is_declared_field(f))
            .map(|f| (f.name.as_str(), &f.field_type));
        let properties = ty
            .properties
            .iter()
            .filter(|p| !p.inherited)
            .map(|p| (p.name.as_str(), &p.property_type));

        let mut mapped = HashSet::new();
        for (member, member_type) in fields.chain(properties) {
            if !is_drawable(member_type) {
                continue;
            }
            let relationship = Relationship::infer(member_type);
            let target = &relationship.target;
            if !is_drawable(target) || self.generator.binding().is_excluded(&target.full_name()) {
                continue;
            }
            if !mapped.insert(relationship.target_name()) {
                continue;
            }

            let text = self.generator.relationship(member, &relationship);
            self.push(clip, Layers::RELATIONSHIPS, text, MemberKind::None, member);
        }
    }
}

/// True when an edge to `ty` makes sense: not a primitive alias, not an
/// unbound generic parameter, not an event handler delegate.
fn is_drawable(ty: &TypeRef) -> bool {
    !ty.is_generic_parameter && !is_aliased(&ty.name) && !ty.name.ends_with(EVENT_HANDLER_SUFFIX)
}

/// Declared on this type and written by hand.
fn is_declared_field(field: &FieldInfo) -> bool {
    !field.inherited && !field.is_special_name && !field.name.ends_with(BACKING_FIELD_SUFFIX)
}

fn is_accessor_method(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    PROPERTY_ACCESSORS.iter().any(|p| lower.starts_with(p))
        || EVENT_ACCESSORS.iter().any(|p| name.starts_with(p))
}

/// Method name followed by its own generic parameters, e.g. `Convert<TFrom>`.
fn generic_method_name(name: &str, generic_arguments: &[TypeRef]) -> String {
    if generic_arguments.is_empty() {
        return name.to_owned();
    }
    let arguments: Vec<String> = generic_arguments.iter().map(normalize_type_ref).collect();
    format!("{name}<{}>", arguments.join(", "))
}

/// Nested descriptor with its declaring type filled in.
fn with_declaring_type<'t>(
    nested: &'t TypeDescriptor,
    parent: &TypeDescriptor,
) -> Cow<'t, TypeDescriptor> {
    if nested.declaring_type.is_some() {
        return Cow::Borrowed(nested);
    }
    let mut owned = nested.clone();
    owned.declaring_type = Some(parent.as_type_ref());
    Cow::Owned(owned)
}
