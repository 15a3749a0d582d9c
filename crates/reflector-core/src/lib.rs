//! Layered type-diagram rendering.
//!
//! This crate turns type metadata into diagram text:
//!
//! - [`Layers`]: bit set selecting how much of a type is rendered.
//! - [`Clip`]: versioned, cached collection of a type's [`Segment`]s.
//! - [`FormattingStrategy`] / [`DiagramSyntax`]: pluggable target syntax.
//! - [`TypeHolder`]: walks a [`TypeDescriptor`] and fills a clip.
//! - [`PartitionedWriter`]: groups clips into documents and writes them
//!   in parallel through a [`DocumentSink`].
//!
//! # Example
//!
//! ```ignore
//! use reflector_core::{BuildOptions, Layers, MemorySink, WriteOptions, write_all};
//!
//! let sink = MemorySink::new();
//! write_all(&types, &syntax, Layers::ALL, &BuildOptions::default(), &sink, WriteOptions::default())?;
//! ```

pub mod clip;
pub mod error;
pub mod generator;
pub mod layer;
pub mod metadata;
pub mod names;
pub mod recipe;
pub mod segment;
pub mod sink;
pub mod traversal;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use clip::{AssemblyId, Clip};
pub use error::{BatchFailure, ParseError, SinkError, WriteError};
pub use generator::{
    DEFAULT_EXCLUSIONS, DiagramSyntax, FormattingStrategy, ObjectType, Relationship,
    RelationshipKind, TypeBinding, Visibility,
};
pub use layer::{Layers, RELATIONAL};
pub use metadata::{
    Access, AccessorInfo, AttributeInfo, ConstructorInfo, EventInfo, FieldInfo, MethodInfo,
    ParameterInfo, PropertyInfo, TypeDescriptor, TypeKind, TypeRef,
};
pub use names::{as_slug, normalize_name_string, normalize_type, normalize_type_ref};
pub use recipe::{BuildOptions, build_types, write_all};
pub use segment::{MemberKind, Segment};
pub use sink::{DocumentSink, FsSink, MemorySink, WrittenDocument};
pub use traversal::TypeHolder;
pub use writer::{
    ClipPair, DEFAULT_PARALLELISM, NO_NAMESPACE, ONE_FILE_NAME, PartitionedWriter, WriteOptions,
    WriteStrategy, build_document,
};
