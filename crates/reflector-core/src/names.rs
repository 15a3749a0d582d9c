//! Name normalization and slugs.
//!
//! Type names arrive in metadata form (`System.Int32`, ``List`1``,
//! `get_Name`) and are rendered in their short source-level spelling
//! (`int`, `List<T>`, `get;`). Slugs turn any name into an identifier safe
//! for file names and diagram node ids.

use std::sync::LazyLock;

use regex::Regex;

use crate::metadata::TypeRef;

/// Characters not allowed in a slug.
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9a-zA-Z_]").unwrap());

/// Arity marker followed by a bracketed argument list, as in
/// ``List`1[[System.String, mscorlib]]``. Captures the first argument.
static GENERIC_ARGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[1-9]\[\[([^,\s]*).*\]\]").unwrap());

/// Bare arity marker, as in ``Dictionary`2``.
static ARITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[1-9]").unwrap());

/// Root namespace stripped before alias lookup.
const ROOT_NAMESPACE: &str = "System.";

/// Framework names with a short alias. Fixed for output stability.
const ALIASES: &[(&str, &str)] = &[
    ("ValueType", "struct"),
    ("Void", "void"),
    ("Object", "object"),
    ("String", "string"),
    ("Int16", "short"),
    ("UInt16", "ushort"),
    ("Int32", "int"),
    ("UInt32", "uint"),
    ("Int64", "long"),
    ("UInt64", "ulong"),
    ("Single", "float"),
    ("Double", "double"),
    ("Byte", "byte"),
    ("SByte", "sbyte"),
    ("Decimal", "decimal"),
    ("Boolean", "bool"),
    ("Object[]", "object[]"),
    ("String[]", "string[]"),
    ("Int16[]", "short[]"),
    ("UInt16[]", "ushort[]"),
    ("Int32[]", "int[]"),
    ("UInt32[]", "uint[]"),
    ("Int64[]", "long[]"),
    ("UInt64[]", "ulong[]"),
    ("Single[]", "float[]"),
    ("Double[]", "double[]"),
    ("Byte[]", "byte[]"),
    ("SByte[]", "sbyte[]"),
    ("Decimal[]", "decimal[]"),
    ("Boolean[]", "bool[]"),
];

/// Property accessor prefixes rendered as `get;`, `set;` and `init;`.
const ACCESSOR_PREFIXES: &[&str] = &["get_", "set_", "init_"];

/// Replace every character outside `[0-9a-zA-Z_]` with `_`.
///
/// Total and idempotent: slugging a slug returns it unchanged.
#[must_use]
pub fn as_slug(name: &str) -> String {
    SLUG_RE.replace_all(name, "_").into_owned()
}

/// Map a framework type name to its alias.
///
/// The root namespace prefix is ignored for the lookup only; names without
/// an alias are returned unchanged, prefix included.
#[must_use]
pub fn normalize_type(name: &str) -> &str {
    let stripped = name.replace(ROOT_NAMESPACE, "");
    ALIASES
        .iter()
        .find(|(from, _)| *from == stripped)
        .map_or(name, |&(_, to)| to)
}

/// Normalize a name given as a string.
///
/// Applies the alias table, turns accessor names into `get;`/`set;`/`init;`,
/// collapses ``Name`1[[Arg, ...]]`` into `Name<Arg>` and drops bare arity
/// markers.
#[must_use]
pub fn normalize_name_string(name: &str) -> String {
    let mut name = normalize_type(name).to_owned();

    if ACCESSOR_PREFIXES.iter().any(|p| name.starts_with(p))
        && let Some(idx) = name.find('_')
    {
        name.truncate(idx);
        name.push(';');
    }

    if let Some(caps) = GENERIC_ARGS_RE.captures(&name) {
        let argument = caps.get(1).map_or("", |m| m.as_str());
        let replacement = format!("<{}>", normalize_name_string(argument));
        return GENERIC_ARGS_RE
            .replace(&name, regex::NoExpand(&replacement))
            .into_owned();
    }

    ARITY_RE.replace_all(&name, "").into_owned()
}

/// Normalized name of a type reference.
///
/// Generic types render as `Base<Arg, ...>` with every argument normalized
/// recursively. A nested type is prefixed by its normalized declaring type;
/// when the declaring type is generic, its arguments come first and the
/// nested type's own list contributes only the positions beyond them.
#[must_use]
pub fn normalize_type_ref(ty: &TypeRef) -> String {
    if ty.is_generic_parameter {
        return normalize_name_string(&ty.name);
    }
    if let Some(element) = &ty.element_type {
        return format!("{}[]", normalize_type_ref(element));
    }

    let inherited = ty
        .declaring_type
        .as_deref()
        .map_or(&[][..], |parent| parent.generic_arguments.as_slice());
    if !ty.is_generic() && inherited.is_empty() {
        return normalize_name_string(&ty.full_name());
    }

    let base = match &ty.declaring_type {
        Some(parent) => format!("{}.{}", normalize_type_ref(parent), ty.name),
        None => ty.full_name(),
    };
    let base = base.split('`').next().unwrap_or_default();

    let arguments: Vec<String> = inherited
        .iter()
        .chain(ty.generic_arguments.iter().skip(inherited.len()))
        .map(normalize_type_ref)
        .collect();
    if arguments.is_empty() {
        return normalize_name_string(base);
    }

    format!("{base}<{}>", arguments.join(", "))
}

/// True when `name` is a framework primitive with an alias.
#[must_use]
pub fn is_aliased(name: &str) -> bool {
    normalize_type(name) != name
}
