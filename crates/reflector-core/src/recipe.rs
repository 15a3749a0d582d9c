//! End-to-end recipes: generate clips for many types and write them.

use std::sync::Arc;

use crate::clip::Clip;
use crate::error::WriteError;
use crate::generator::{DEFAULT_EXCLUSIONS, DiagramSyntax};
use crate::layer::Layers;
use crate::metadata::TypeDescriptor;
use crate::sink::{DocumentSink, WrittenDocument};
use crate::traversal::TypeHolder;
use crate::writer::{ClipPair, PartitionedWriter, WriteOptions};

/// Generation settings shared by every type of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Render attribute blocks on headers and members.
    pub show_attributes: bool,
    /// Full-name prefixes suppressed from inheritance and relationship edges.
    pub exclusions: Vec<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            show_attributes: false,
            exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

/// Generate one clip per type and pair it with the layers to render.
///
/// Every type gets a structural pair `(clip, TYPE_END)` when the request has
/// structural bits; when the request reaches past `TYPE_END`, every type
/// then gets a relational pair `(clip, layers)`. Both pairs of a type share
/// the same clip.
#[must_use]
pub fn build_types(
    types: &[TypeDescriptor],
    syntax: &dyn DiagramSyntax,
    layers: Layers,
    options: &BuildOptions,
) -> Vec<ClipPair> {
    let clips: Vec<Arc<Clip>> = types
        .iter()
        .map(|ty| {
            let mut holder = TypeHolder::new(ty, syntax, &options.exclusions);
            Arc::new(holder.generate(layers, options.show_attributes))
        })
        .collect();

    let mut pairs = Vec::with_capacity(clips.len() * 2);
    if !layers.structural().is_empty() {
        pairs.extend(clips.iter().map(|clip| (Arc::clone(clip), Layers::TYPE_END)));
    }
    if layers.exceeds_structure() {
        pairs.extend(clips.iter().map(|clip| (Arc::clone(clip), layers)));
    }

    tracing::debug!(types = types.len(), pairs = pairs.len(), layers = %layers, "Built types");
    pairs
}

/// Build every type and write the documents to `sink`.
///
/// # Errors
///
/// Returns the writer's error; see [`PartitionedWriter::write`].
pub fn write_all(
    types: &[TypeDescriptor],
    syntax: &dyn DiagramSyntax,
    layers: Layers,
    build: &BuildOptions,
    sink: &dyn DocumentSink,
    write: WriteOptions,
) -> Result<Vec<WrittenDocument>, WriteError> {
    let pairs = build_types(types, syntax, layers, build);
    PartitionedWriter::new(sink, write).write(&pairs)
}
