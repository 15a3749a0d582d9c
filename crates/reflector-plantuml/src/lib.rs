//! PlantUML class-diagram syntax.
//!
//! Each type becomes a node declared by its slug, with members listed
//! inside the node and inheritance/relationship edges outside it:
//!
//! ```text
//! class "Widget" as App_Widget
//! class App_Widget {
//!     ... fields ...
//!     -count: int
//! }
//! App_Widget -u-|> App_Base : extends
//! App_Widget o- App_Part : parts << aggregation >>
//! ```

use reflector_core::{
    Access, AttributeInfo, ConstructorInfo, DiagramSyntax, EventInfo, FieldInfo,
    FormattingStrategy, MemberKind, MethodInfo, ObjectType, ParameterInfo, PropertyInfo,
    Relationship, RelationshipKind, TypeBinding, Visibility, as_slug, normalize_name_string,
    normalize_type_ref,
};

/// Attribute never listed in attribute blocks.
const TYPE_FORWARDING_MARKER: &str = "TypeForwardedFromAttribute";

/// PlantUML syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlantUml;

impl DiagramSyntax for PlantUml {
    fn bind(&self, binding: TypeBinding) -> Box<dyn FormattingStrategy> {
        Box::new(PlantUmlGenerator::new(binding))
    }

    fn extension(&self) -> &'static str {
        "puml"
    }
}

/// PlantUML formatting bound to one type.
#[derive(Debug, Clone)]
pub struct PlantUmlGenerator {
    binding: TypeBinding,
}

impl PlantUmlGenerator {
    #[must_use]
    pub fn new(binding: TypeBinding) -> Self {
        Self { binding }
    }

    fn keyword(&self) -> &'static str {
        match self.binding.object_type() {
            ObjectType::Class => "class",
            ObjectType::AbstractClass => "abstract class",
            ObjectType::Enum => "enum",
            ObjectType::Interface => "interface",
            ObjectType::Entity => "entity",
        }
    }
}

/// Visibility symbol preceded by `{static}`/`{abstract}` modifiers.
fn accessibility(access: Access, is_static: bool, is_abstract: bool) -> String {
    let mut text = String::new();
    if is_static {
        text.push_str("{static} ");
    }
    if is_abstract {
        text.push_str("{abstract} ");
    }
    text.push_str(match Visibility::of(access) {
        Some(Visibility::Public) => "+",
        Some(Visibility::Family) => "#",
        Some(Visibility::Private) => "-",
        Some(Visibility::Assembly) => "~",
        None => "",
    });
    text
}

/// Member line preceded by its attribute block, if any.
fn member_line(attributes: &str, line: String) -> String {
    if attributes.is_empty() {
        line
    } else {
        format!("{attributes}\n{line}")
    }
}

impl FormattingStrategy for PlantUmlGenerator {
    fn binding(&self) -> &TypeBinding {
        &self.binding
    }

    fn start_type(&self, show_attributes: bool, attributes: &str) -> String {
        let keyword = self.keyword();
        let slug = self.binding.slug();
        let stereotype = if self.binding.is_static() {
            "<< static >> "
        } else {
            ""
        };

        let mut text = format!(
            "{keyword} \"{}\" as {slug}\n{keyword} {slug} {stereotype}{{",
            self.binding.display_name()
        );
        if show_attributes && !attributes.is_empty() {
            text.push_str("\n\t--- attributes ---\n");
            text.push_str(attributes);
        }
        text
    }

    fn end_type(&self) -> String {
        "}".to_owned()
    }

    fn attributes(&self, attributes: &[AttributeInfo], show_attributes: bool) -> String {
        if !show_attributes {
            return String::new();
        }
        let listed: Vec<String> = attributes
            .iter()
            .filter(|a| a.name != TYPE_FORWARDING_MARKER)
            .map(|a| {
                let name = a.name.strip_suffix("Attribute").unwrap_or(&a.name);
                if a.arguments.is_empty() {
                    name.to_owned()
                } else {
                    format!("{name}({})", a.arguments.join(", "))
                }
            })
            .collect();
        if listed.is_empty() {
            return String::new();
        }
        format!("\t[{}]", listed.join(", "))
    }

    fn extends_edge(&self, base_name: &str) -> String {
        format!("{} -u-|> {} : extends", self.binding.slug(), as_slug(base_name))
    }

    fn implements_edge(&self, interface_name: &str) -> String {
        format!(
            "{} --() {} : implements",
            self.binding.slug(),
            as_slug(interface_name)
        )
    }

    fn relationship(&self, member: &str, relationship: &Relationship) -> String {
        let target = as_slug(&relationship.target_name());
        match relationship.kind {
            RelationshipKind::Aggregation => format!(
                "{} o- {target} : {member} << aggregation >>",
                self.binding.slug()
            ),
            RelationshipKind::Use => {
                format!("{} -> {target} : {member} << use >>", self.binding.slug())
            }
        }
    }

    fn field(&self, field: &FieldInfo, attributes: &str) -> String {
        member_line(
            attributes,
            format!(
                "\t{}{}: {}",
                accessibility(field.access, field.is_static, false),
                normalize_name_string(&field.name),
                normalize_type_ref(&field.field_type)
            ),
        )
    }

    fn property(&self, property: &PropertyInfo, attributes: &str) -> String {
        let parameters = self.parameter_list(&property.index_parameters);
        let indexer = if parameters.is_empty() {
            String::new()
        } else {
            format!("[{parameters}]")
        };
        let accessors: Vec<String> = property
            .accessors()
            .map(|a| {
                format!(
                    "{}{}{indexer}",
                    accessibility(a.access, a.is_static, a.is_abstract),
                    normalize_name_string(&a.name)
                )
            })
            .collect();

        let getter = property.getter.as_ref();
        let primary = getter.or(property.setter.as_ref());
        let access = Access {
            public: property.is_public(),
            family: getter.is_some_and(|g| g.access.family),
            private: getter.is_none_or(|g| g.access.private),
            assembly: getter.is_some_and(|g| g.access.assembly),
        };

        member_line(
            attributes,
            format!(
                "\t{}{} ({}) : {} << property >>",
                accessibility(
                    access,
                    primary.is_some_and(|a| a.is_static),
                    primary.is_some_and(|a| a.is_abstract)
                ),
                normalize_name_string(&property.name),
                accessors.join(" "),
                normalize_type_ref(&property.property_type)
            ),
        )
    }

    fn method(&self, method: &MethodInfo, name: &str, attributes: &str) -> String {
        member_line(
            attributes,
            format!(
                "\t{}{}({}): {}",
                accessibility(method.access, method.is_static, method.is_abstract),
                normalize_name_string(name),
                self.parameter_list(&method.parameters),
                normalize_type_ref(&method.return_type)
            ),
        )
    }

    fn ctor(&self, ctor: &ConstructorInfo, attributes: &str) -> String {
        member_line(
            attributes,
            format!(
                "\t{}ctor({})",
                accessibility(ctor.access, ctor.is_static, false),
                self.parameter_list(&ctor.parameters)
            ),
        )
    }

    fn event(&self, event: &EventInfo, attributes: &str) -> String {
        member_line(
            attributes,
            format!(
                "\t{}{}({}) : {} << event >>",
                accessibility(event.access, event.is_static, false),
                normalize_name_string(&event.name),
                self.parameter_list(&event.parameters),
                normalize_type_ref(&event.return_type)
            ),
        )
    }

    fn divider(&self, kind: MemberKind) -> String {
        format!("\t... {} ...", kind.label())
    }

    fn parameter_list(&self, parameters: &[ParameterInfo]) -> String {
        parameters
            .iter()
            .map(|p| {
                let name = p.name.as_deref().map(normalize_name_string).unwrap_or_default();
                let ty = normalize_type_ref(&p.parameter_type);
                match &p.default_value {
                    Some(default) => format!("{name}: {ty} = {default}"),
                    None => format!("{name}: {ty}"),
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
