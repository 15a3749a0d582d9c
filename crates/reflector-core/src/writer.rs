//! Partitioned document writer.
//!
//! Groups `(clip, layers)` pairs into documents according to a
//! [`WriteStrategy`] and writes each document through a [`DocumentSink`].
//! Grouped strategies write their documents on a fixed-width rayon pool,
//! one group per task.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Deserialize;

use crate::clip::Clip;
use crate::error::{BatchFailure, ParseError, SinkError, WriteError};
use crate::layer::{Layers, RELATIONAL};
use crate::names::as_slug;
use crate::sink::{DocumentSink, WrittenDocument};

/// A clip and the layers it should be rendered at.
pub type ClipPair = (Arc<Clip>, Layers);

/// Destination name used by [`WriteStrategy::OneFile`].
pub const ONE_FILE_NAME: &str = "AllTypes";

/// Grouping key for types without a namespace.
pub const NO_NAMESPACE: &str = "<<none>>";

/// Default worker pool width.
pub const DEFAULT_PARALLELISM: usize = 4;

/// How pairs are grouped into documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteStrategy {
    /// Everything in one document.
    OneFile,
    /// One document per type name.
    #[default]
    OneFilePerType,
    /// One document per namespace.
    OneFilePerNamespace,
    /// One document per assembly.
    OneFilePerAssembly,
}

impl WriteStrategy {
    const NAMES: [(&'static str, WriteStrategy); 4] = [
        ("one-file", WriteStrategy::OneFile),
        ("one-file-per-type", WriteStrategy::OneFilePerType),
        ("one-file-per-namespace", WriteStrategy::OneFilePerNamespace),
        ("one-file-per-assembly", WriteStrategy::OneFilePerAssembly),
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WriteStrategy::OneFile => "one-file",
            WriteStrategy::OneFilePerType => "one-file-per-type",
            WriteStrategy::OneFilePerNamespace => "one-file-per-namespace",
            WriteStrategy::OneFilePerAssembly => "one-file-per-assembly",
        }
    }
}

impl FromStr for WriteStrategy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, strategy)| *strategy)
            .ok_or_else(|| ParseError::UnknownStrategy(s.to_owned()))
    }
}

impl fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Writer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub strategy: WriteStrategy,
    /// Worker pool width for grouped strategies. Must be at least 1.
    pub parallelism: usize,
    /// Group [`WriteStrategy::OneFilePerType`] by `namespace.name` instead of
    /// the bare type name.
    pub qualify_type_names: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            strategy: WriteStrategy::default(),
            parallelism: DEFAULT_PARALLELISM,
            qualify_type_names: true,
        }
    }
}

/// Assemble the text of one document.
///
/// Pairs at or below `TYPE_END` come first, rendered at `TYPE_END`; the
/// remaining pairs follow, rendered at `RELATIONSHIPS | INHERITANCE`.
/// Notes never appear in a combined document. Each rendering is trimmed
/// and placed on its own line.
#[must_use]
pub fn build_document(pairs: &[&ClipPair]) -> String {
    let structural = pairs
        .iter()
        .filter(|(_, layers)| *layers <= Layers::TYPE_END)
        .map(|(clip, _)| (clip, Layers::TYPE_END));
    let relational = pairs
        .iter()
        .filter(|(_, layers)| *layers > Layers::TYPE_END)
        .map(|(clip, _)| (clip, RELATIONAL));

    let mut text = String::new();
    for (clip, layers) in structural.chain(relational) {
        text.push_str(clip.render(layers).trim());
        text.push('\n');
    }
    text.trim().to_owned()
}

/// A document to write: destination slug, grouping key and its pairs.
struct Group<'p> {
    slug: String,
    key: String,
    pairs: Vec<&'p ClipPair>,
}

/// Writes clip pairs to documents.
pub struct PartitionedWriter<'s> {
    sink: &'s dyn DocumentSink,
    options: WriteOptions,
}

impl<'s> PartitionedWriter<'s> {
    #[must_use]
    pub fn new(sink: &'s dyn DocumentSink, options: WriteOptions) -> Self {
        Self { sink, options }
    }

    #[must_use]
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Write `pairs` using the configured strategy.
    ///
    /// # Errors
    ///
    /// - [`WriteError::DuplicateDocument`] when distinct group keys map to
    ///   the same destination. Nothing is written.
    /// - [`WriteError::Sink`] when the single document of
    ///   [`WriteStrategy::OneFile`] fails.
    /// - [`WriteError::Batch`] when any group fails. Documents of groups
    ///   that succeeded stay written and are listed in the failure.
    pub fn write(&self, pairs: &[ClipPair]) -> Result<Vec<WrittenDocument>, WriteError> {
        let strategy = self.options.strategy;
        if strategy == WriteStrategy::OneFile {
            let all: Vec<&ClipPair> = pairs.iter().collect();
            let document = build_document(&all);
            let written = self.sink.write_document(ONE_FILE_NAME, document.as_bytes())?;
            tracing::info!(strategy = %strategy, documents = 1, "Wrote documents");
            return Ok(vec![written]);
        }

        let groups = self.group(pairs);
        check_duplicates(&groups)?;

        if self.options.parallelism == 0 {
            return Err(WriteError::Pool("parallelism must be at least 1".to_owned()));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.parallelism)
            .build()
            .map_err(|e| WriteError::Pool(e.to_string()))?;

        let results: Vec<Result<WrittenDocument, SinkError>> = pool.install(|| {
            groups
                .par_iter()
                .map(|group| self.write_group(group))
                .collect()
        });

        let written = partition_results(results)?;
        tracing::info!(
            strategy = %strategy,
            groups = groups.len(),
            documents = written.len(),
            "Wrote documents"
        );
        Ok(written)
    }

    /// Group pairs by key, keeping first-appearance order of keys and input
    /// order within a group.
    fn group<'p>(&self, pairs: &'p [ClipPair]) -> Vec<Group<'p>> {
        let mut groups: Vec<Group<'p>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for pair in pairs {
            let key = self.key(&pair.0);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(Group {
                    slug: as_slug(&key),
                    key,
                    pairs: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].pairs.push(pair);
        }
        groups
    }

    fn key(&self, clip: &Clip) -> String {
        match self.options.strategy {
            WriteStrategy::OneFile => ONE_FILE_NAME.to_owned(),
            WriteStrategy::OneFilePerType => match clip.namespace() {
                Some(ns) if self.options.qualify_type_names => {
                    format!("{ns}.{}", clip.type_name())
                }
                _ => clip.type_name().to_owned(),
            },
            WriteStrategy::OneFilePerNamespace => {
                clip.namespace().unwrap_or(NO_NAMESPACE).to_owned()
            }
            WriteStrategy::OneFilePerAssembly => clip.assembly().name().to_owned(),
        }
    }

    fn write_group(&self, group: &Group<'_>) -> Result<WrittenDocument, SinkError> {
        let document = build_document(&group.pairs);
        let result = self.sink.write_document(&group.slug, document.as_bytes());
        match &result {
            Ok(_) => tracing::debug!(key = %group.key, pairs = group.pairs.len(), "Wrote group"),
            Err(e) => tracing::warn!(key = %group.key, error = %e, "Failed to write group"),
        }
        result
    }
}

/// Reject groups whose distinct keys share a destination slug.
fn check_duplicates(groups: &[Group<'_>]) -> Result<(), WriteError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for group in groups {
        if let Some(previous) = seen.insert(&group.slug, &group.key) {
            let keys: Vec<String> = groups
                .iter()
                .filter(|g| g.slug == group.slug)
                .map(|g| g.key.clone())
                .collect();
            tracing::warn!(slug = %group.slug, first = %previous, "Duplicate document destination");
            return Err(WriteError::DuplicateDocument {
                slug: group.slug.clone(),
                keys,
            });
        }
    }
    Ok(())
}

/// Split worker results; any failure turns the batch into a
/// [`BatchFailure`] carrying the successes.
fn partition_results(
    results: Vec<Result<WrittenDocument, SinkError>>,
) -> Result<Vec<WrittenDocument>, BatchFailure> {
    let groups = results.len();
    let mut written = Vec::with_capacity(groups);
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(document) => written.push(document),
            Err(error) => errors.push(error),
        }
    }

    let failed = errors.len();
    match errors.into_iter().next() {
        None => Ok(written),
        Some(first) => Err(BatchFailure {
            first,
            written,
            failed,
            groups,
        }),
    }
}
