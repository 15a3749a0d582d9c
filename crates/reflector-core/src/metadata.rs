//! Type metadata input contract.
//!
//! These descriptors are supplied by a metadata provider (a reflection
//! dump, a parsed source tree, or hand-built values). All optional data
//! degrades to empty text during rendering; nothing here is validated.
//!
//! Every type derives [`Deserialize`] so providers can hand over JSON:
//!
//! ```json
//! {
//!   "name": "Widget",
//!   "namespace": "App.Model",
//!   "assembly": "App",
//!   "kind": "class",
//!   "fields": [{ "name": "parts", "field_type": { "name": "Part[]", "namespace": "App.Model",
//!                "element_type": { "name": "Part", "namespace": "App.Model" } },
//!                "access": { "private": true } }]
//! }
//! ```

use serde::Deserialize;

/// Declared kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Struct,
    Delegate,
}

/// Access flags of a member.
///
/// Several flags may be set; symbols resolve with precedence
/// public > family > private > assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Access {
    pub public: bool,
    pub private: bool,
    /// Protected.
    pub family: bool,
    /// Internal.
    pub assembly: bool,
}

impl Access {
    pub const PUBLIC: Access = Access {
        public: true,
        private: false,
        family: false,
        assembly: false,
    };

    pub const PRIVATE: Access = Access {
        public: false,
        private: true,
        family: false,
        assembly: false,
    };
}

/// Reference to a type used by a member, base list or generic argument.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct TypeRef {
    /// Simple name, possibly with an arity marker (``List`1``) or array
    /// suffix (`Int32[]`).
    pub name: String,
    pub namespace: Option<String>,
    pub generic_arguments: Vec<TypeRef>,
    /// Element type when this is an array.
    pub element_type: Option<Box<TypeRef>>,
    /// Declaring type when this is a nested type.
    pub declaring_type: Option<Box<TypeRef>>,
    /// True for an unbound generic parameter such as `T`.
    pub is_generic_parameter: bool,
}

impl TypeRef {
    /// Reference by simple name and namespace.
    #[must_use]
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.map(str::to_owned),
            ..Self::default()
        }
    }

    /// Generic type reference with bound arguments.
    #[must_use]
    pub fn generic(name: impl Into<String>, namespace: Option<&str>, args: Vec<TypeRef>) -> Self {
        Self {
            generic_arguments: args,
            ..Self::new(name, namespace)
        }
    }

    /// Array of `element`.
    #[must_use]
    pub fn array_of(element: TypeRef) -> Self {
        Self {
            name: format!("{}[]", element.name),
            namespace: element.namespace.clone(),
            element_type: Some(Box::new(element)),
            ..Self::default()
        }
    }

    /// Unbound generic parameter.
    #[must_use]
    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            is_generic_parameter: true,
            ..Self::new(name, None)
        }
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        self.element_type.is_some()
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    /// Full name: namespace, declaring types and simple name joined by `.`.
    #[must_use]
    pub fn full_name(&self) -> String {
        if let Some(parent) = &self.declaring_type {
            return format!("{}.{}", parent.full_name(), self.name);
        }
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}.{}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// Custom attribute applied to a type or member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AttributeInfo {
    /// Attribute type name, e.g. `ObsoleteAttribute`.
    pub name: String,
    /// Constructor arguments, already rendered.
    pub arguments: Vec<String>,
}

/// Method, constructor or indexer parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ParameterInfo {
    pub name: Option<String>,
    pub parameter_type: TypeRef,
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct FieldInfo {
    pub name: String,
    pub field_type: TypeRef,
    pub access: Access,
    pub is_static: bool,
    /// Compiler-synthesized.
    pub is_special_name: bool,
    /// Declared on a base type.
    pub inherited: bool,
    pub attributes: Vec<AttributeInfo>,
}

/// Property getter or setter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AccessorInfo {
    /// Accessor method name, e.g. `get_Name` or `init_Name`.
    pub name: String,
    pub access: Access,
    pub is_static: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PropertyInfo {
    pub name: String,
    pub property_type: TypeRef,
    pub getter: Option<AccessorInfo>,
    pub setter: Option<AccessorInfo>,
    /// Indexer parameters.
    pub index_parameters: Vec<ParameterInfo>,
    pub inherited: bool,
    pub attributes: Vec<AttributeInfo>,
}

impl PropertyInfo {
    /// Accessors in declaration order (getter first).
    pub fn accessors(&self) -> impl Iterator<Item = &AccessorInfo> {
        self.getter.iter().chain(self.setter.iter())
    }

    /// True when either accessor is public.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.accessors().any(|a| a.access.public)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct MethodInfo {
    pub name: String,
    pub return_type: TypeRef,
    pub parameters: Vec<ParameterInfo>,
    pub access: Access,
    pub is_static: bool,
    pub is_abstract: bool,
    /// Generic parameters of a generic method.
    pub generic_arguments: Vec<TypeRef>,
    pub inherited: bool,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ConstructorInfo {
    pub parameters: Vec<ParameterInfo>,
    pub access: Access,
    pub is_static: bool,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct EventInfo {
    pub name: String,
    /// Delegate type of the event.
    pub handler_type: TypeRef,
    /// Parameters of the delegate's invoke method.
    pub parameters: Vec<ParameterInfo>,
    pub return_type: TypeRef,
    /// Access of the add accessor.
    pub access: Access,
    pub is_static: bool,
    pub inherited: bool,
    pub attributes: Vec<AttributeInfo>,
}

/// Complete description of one type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct TypeDescriptor {
    /// Simple name, possibly with an arity marker.
    pub name: String,
    pub namespace: Option<String>,
    /// Declaring assembly name.
    pub assembly: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub base_type: Option<TypeRef>,
    /// Directly implemented interfaces.
    pub interfaces: Vec<TypeRef>,
    pub generic_arguments: Vec<TypeRef>,
    /// Declaring type when nested.
    pub declaring_type: Option<TypeRef>,
    pub fields: Vec<FieldInfo>,
    pub properties: Vec<PropertyInfo>,
    pub methods: Vec<MethodInfo>,
    pub constructors: Vec<ConstructorInfo>,
    pub events: Vec<EventInfo>,
    pub nested_types: Vec<TypeDescriptor>,
    pub attributes: Vec<AttributeInfo>,
}

impl TypeDescriptor {
    /// Reference to this type, as other descriptors would refer to it.
    #[must_use]
    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            generic_arguments: self.generic_arguments.clone(),
            element_type: None,
            declaring_type: self.declaring_type.clone().map(Box::new),
            is_generic_parameter: false,
        }
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Abstract and sealed at once, i.e. a static class.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_abstract && self.is_sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        assert_eq!(TypeRef::new("Widget", Some("App")).full_name(), "App.Widget");
        assert_eq!(TypeRef::new("Widget", None).full_name(), "Widget");

        let nested = TypeRef {
            declaring_type: Some(Box::new(TypeRef::new("Outer", Some("App")))),
            ..TypeRef::new("Inner", Some("App"))
        };
        assert_eq!(nested.full_name(), "App.Outer.Inner");
    }

    #[test]
    fn test_array_of() {
        let array = TypeRef::array_of(TypeRef::new("Widget", Some("App")));
        assert!(array.is_array());
        assert_eq!(array.name, "Widget[]");
        assert_eq!(array.element_type.unwrap().name, "Widget");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{
            "name": "Widget",
            "namespace": "App",
            "assembly": "app",
            "kind": "interface",
            "properties": [{
                "name": "Name",
                "property_type": { "name": "String", "namespace": "System" },
                "getter": { "name": "get_Name", "access": { "public": true } }
            }]
        }"#;
        let ty: TypeDescriptor = serde_json::from_str(json).unwrap();

        assert_eq!(ty.kind, TypeKind::Interface);
        assert!(ty.base_type.is_none());
        assert!(ty.fields.is_empty());
        assert!(ty.properties[0].is_public());
        assert!(ty.properties[0].setter.is_none());
    }

    #[test]
    fn test_static_type() {
        let ty = TypeDescriptor {
            is_abstract: true,
            is_sealed: true,
            ..TypeDescriptor::default()
        };
        assert!(ty.is_static());
    }
}
