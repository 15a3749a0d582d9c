//! Shared fixtures for unit tests.

use crate::generator::{
    DEFAULT_EXCLUSIONS, DiagramSyntax, FormattingStrategy, Relationship, RelationshipKind,
    TypeBinding,
};
use crate::metadata::{
    Access, AccessorInfo, AttributeInfo, ConstructorInfo, EventInfo, FieldInfo, MethodInfo,
    ParameterInfo, PropertyInfo, TypeDescriptor, TypeKind, TypeRef,
};
use crate::names::normalize_type_ref;
use crate::segment::MemberKind;

/// Plain-text syntax with one readable token per element.
pub(crate) struct TestSyntax;

struct TestStrategy {
    binding: TypeBinding,
}

impl DiagramSyntax for TestSyntax {
    fn bind(&self, binding: TypeBinding) -> Box<dyn FormattingStrategy> {
        Box::new(TestStrategy { binding })
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

impl FormattingStrategy for TestStrategy {
    fn binding(&self) -> &TypeBinding {
        &self.binding
    }

    fn start_type(&self, show_attributes: bool, attributes: &str) -> String {
        if show_attributes && !attributes.is_empty() {
            format!("start {}\n{attributes}", self.binding.slug())
        } else {
            format!("start {}", self.binding.slug())
        }
    }

    fn end_type(&self) -> String {
        format!("end {}", self.binding.slug())
    }

    fn attributes(&self, attributes: &[AttributeInfo], show_attributes: bool) -> String {
        if !show_attributes || attributes.is_empty() {
            return String::new();
        }
        let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
        format!("[{}]", names.join(", "))
    }

    fn extends_edge(&self, base_name: &str) -> String {
        format!("extends {base_name}")
    }

    fn implements_edge(&self, interface_name: &str) -> String {
        format!("implements {interface_name}")
    }

    fn relationship(&self, member: &str, relationship: &Relationship) -> String {
        let verb = match relationship.kind {
            RelationshipKind::Aggregation => "aggregates",
            RelationshipKind::Use => "uses",
        };
        format!(
            "{} {verb} {} : {member}",
            self.binding.slug(),
            relationship.target_name()
        )
    }

    fn field(&self, field: &FieldInfo, _attributes: &str) -> String {
        format!("field {}: {}", field.name, normalize_type_ref(&field.field_type))
    }

    fn property(&self, property: &PropertyInfo, _attributes: &str) -> String {
        format!(
            "property {}: {}",
            property.name,
            normalize_type_ref(&property.property_type)
        )
    }

    fn method(&self, method: &MethodInfo, name: &str, _attributes: &str) -> String {
        format!(
            "method {name}({}): {}",
            self.parameter_list(&method.parameters),
            normalize_type_ref(&method.return_type)
        )
    }

    fn ctor(&self, ctor: &ConstructorInfo, _attributes: &str) -> String {
        format!("ctor({})", self.parameter_list(&ctor.parameters))
    }

    fn event(&self, event: &EventInfo, _attributes: &str) -> String {
        format!("event {}", event.name)
    }

    fn divider(&self, kind: MemberKind) -> String {
        format!("-- {} --", kind.label())
    }

    fn parameter_list(&self, parameters: &[ParameterInfo]) -> String {
        parameters
            .iter()
            .map(|p| {
                format!(
                    "{}: {}",
                    p.name.as_deref().unwrap_or_default(),
                    normalize_type_ref(&p.parameter_type)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub(crate) fn exclusions() -> Vec<String> {
    DEFAULT_EXCLUSIONS.iter().map(|s| (*s).to_owned()).collect()
}

fn system(name: &str) -> TypeRef {
    TypeRef::new(name, Some("System"))
}

fn model(name: &str) -> TypeRef {
    TypeRef::new(name, Some("App.Model"))
}

fn parameter(name: &str, ty: TypeRef) -> ParameterInfo {
    ParameterInfo {
        name: Some(name.to_owned()),
        parameter_type: ty,
        default_value: None,
    }
}

fn accessor(name: &str, access: Access) -> AccessorInfo {
    AccessorInfo {
        name: name.to_owned(),
        access,
        ..AccessorInfo::default()
    }
}

fn property(name: &str, ty: TypeRef, access: Access) -> PropertyInfo {
    PropertyInfo {
        name: name.to_owned(),
        property_type: ty,
        getter: Some(accessor(&format!("get_{name}"), access)),
        ..PropertyInfo::default()
    }
}

fn method(name: &str, return_type: TypeRef, access: Access) -> MethodInfo {
    MethodInfo {
        name: name.to_owned(),
        return_type,
        access,
        ..MethodInfo::default()
    }
}

/// A class exercising every member kind and filter.
pub(crate) fn widget() -> TypeDescriptor {
    TypeDescriptor {
        name: "Widget".to_owned(),
        namespace: Some("App.Model".to_owned()),
        assembly: "app".to_owned(),
        kind: TypeKind::Class,
        base_type: Some(model("Base")),
        interfaces: vec![model("IStorable"), system("IComparable"), model("IShape")],
        fields: vec![
            FieldInfo {
                name: "count".to_owned(),
                field_type: system("Int32"),
                access: Access::PRIVATE,
                ..FieldInfo::default()
            },
            FieldInfo {
                name: "Parts".to_owned(),
                field_type: TypeRef::array_of(model("Part")),
                access: Access::PUBLIC,
                ..FieldInfo::default()
            },
            FieldInfo {
                name: "<Name>k__BackingField".to_owned(),
                field_type: system("String"),
                access: Access::PRIVATE,
                is_special_name: true,
                ..FieldInfo::default()
            },
            FieldInfo {
                name: "baseId".to_owned(),
                field_type: model("Identity"),
                access: Access::PUBLIC,
                inherited: true,
                ..FieldInfo::default()
            },
        ],
        properties: vec![
            PropertyInfo {
                setter: Some(accessor("set_Name", Access::PRIVATE)),
                ..property("Name", system("String"), Access::PUBLIC)
            },
            property("Owner", model("Part"), Access::PUBLIC),
            property(
                "Cache",
                TypeRef::generic(
                    "List`1",
                    Some("System.Collections.Generic"),
                    vec![model("Part")],
                ),
                Access::PRIVATE,
            ),
            property("Tool", model("Gadget"), Access::PUBLIC),
        ],
        methods: vec![
            MethodInfo {
                parameters: vec![parameter("factor", system("Double"))],
                ..method("Resize", system("Void"), Access::PUBLIC)
            },
            method("get_Name", system("String"), Access::PUBLIC),
            method("Validate", system("Boolean"), Access::PRIVATE),
            MethodInfo {
                parameters: vec![parameter("value", TypeRef::parameter("TFrom"))],
                generic_arguments: vec![TypeRef::parameter("TFrom")],
                ..method("Convert", system("Int32"), Access::PUBLIC)
            },
            MethodInfo {
                inherited: true,
                ..method("ToString", system("String"), Access::PUBLIC)
            },
            method("add_Changed", system("Void"), Access::PUBLIC),
        ],
        constructors: vec![
            ConstructorInfo {
                parameters: vec![parameter("seed", system("Int32"))],
                access: Access::PRIVATE,
                ..ConstructorInfo::default()
            },
            ConstructorInfo {
                access: Access::PUBLIC,
                ..ConstructorInfo::default()
            },
            ConstructorInfo {
                access: Access::PRIVATE,
                is_static: true,
                ..ConstructorInfo::default()
            },
        ],
        events: vec![EventInfo {
            name: "Changed".to_owned(),
            handler_type: system("EventHandler"),
            parameters: vec![
                parameter("sender", system("Object")),
                parameter("e", system("EventArgs")),
            ],
            return_type: system("Void"),
            access: Access::PUBLIC,
            ..EventInfo::default()
        }],
        attributes: vec![AttributeInfo {
            name: "SerializableAttribute".to_owned(),
            arguments: Vec::new(),
        }],
        ..TypeDescriptor::default()
    }
}

/// A minimal class with no members.
pub(crate) fn simple(name: &str, namespace: Option<&str>, assembly: &str) -> TypeDescriptor {
    TypeDescriptor {
        name: name.to_owned(),
        namespace: namespace.map(str::to_owned),
        assembly: assembly.to_owned(),
        ..TypeDescriptor::default()
    }
}
