//! Versioned segment container for one type.
//!
//! A [`Clip`] collects the [`Segment`]s produced for a type and renders them
//! to text for a requested layer set. Every structural change bumps the
//! clip's version; rendered text is cached per layer set and is valid only
//! while the cached version equals the current one.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::layer::Layers;
use crate::segment::Segment;

/// Opaque identity of the assembly (compilation unit) that declares a type.
///
/// Used only to group clips into per-assembly documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AssemblyId(String);

impl AssemblyId {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Assembly name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Render cache guarded by the clip's lock.
#[derive(Debug)]
struct RenderCache {
    /// Version the entries were rendered at.
    version: i64,
    entries: HashMap<Layers, String>,
    /// Number of times text was derived from segments.
    derivations: usize,
}

/// Ordered, versioned collection of a type's segments.
#[derive(Debug)]
pub struct Clip {
    type_name: String,
    namespace: Option<String>,
    assembly: AssemblyId,
    segments: Vec<Arc<Segment>>,
    version: i64,
    cache: Mutex<RenderCache>,
}

impl Clip {
    /// Create an empty clip. The version starts at -1.
    #[must_use]
    pub fn new(
        type_name: impl Into<String>,
        namespace: Option<String>,
        assembly: AssemblyId,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            namespace,
            assembly,
            segments: Vec::new(),
            version: -1,
            cache: Mutex::new(RenderCache {
                version: -1,
                entries: HashMap::new(),
                derivations: 0,
            }),
        }
    }

    /// Normalized type name without the namespace, generic arguments included.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[must_use]
    pub fn assembly(&self) -> &AssemblyId {
        &self.assembly
    }

    /// Segments in insertion order.
    #[must_use]
    pub fn segments(&self) -> &[Arc<Segment>] {
        &self.segments
    }

    /// Current version; increases with every append or removal.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Append a segment at the end. Duplicates are not suppressed.
    pub fn append(&mut self, segment: Arc<Segment>) {
        self.segments.push(segment);
        self.version += 1;
    }

    /// Remove the segment at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<Arc<Segment>> {
        if index >= self.segments.len() {
            return None;
        }
        let removed = self.segments.remove(index);
        self.version += 1;
        Some(removed)
    }

    /// Number of times rendered text was derived rather than served from
    /// cache.
    #[must_use]
    pub fn derivations(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .derivations
    }

    /// Render the segments selected by `layers`.
    ///
    /// Selected segments are grouped by layer, groups ordered by ascending
    /// layer value, insertion order kept within a group. Blank segments are
    /// skipped and the result is trimmed. `ALL` selects every segment.
    ///
    /// Safe to call concurrently; the cache update is serialized.
    #[must_use]
    pub fn render(&self, layers: Layers) -> String {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if cache.version != self.version {
            cache.entries.clear();
            cache.version = self.version;
        }
        if self.version >= 0
            && let Some(text) = cache.entries.get(&layers)
        {
            return text.clone();
        }

        let mut selected: Vec<&Segment> = if layers == Layers::ALL {
            self.segments.iter().map(AsRef::as_ref).collect()
        } else {
            self.segments
                .iter()
                .map(AsRef::as_ref)
                .filter(|segment| layers.shows(segment.layer()))
                .collect()
        };
        // Stable: keeps insertion order inside each layer group.
        selected.sort_by_key(|segment| segment.layer().bits());

        let mut text = String::new();
        for segment in selected.into_iter().filter(|s| !s.is_blank()) {
            text.push_str(segment.text());
            text.push('\n');
        }
        let text = text.trim().to_owned();

        cache.derivations += 1;
        cache.entries.insert(layers, text.clone());
        text
    }
}

impl fmt::Display for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Layers::ALL))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::segment::MemberKind;

    fn segment(layer: Layers, text: &str) -> Arc<Segment> {
        Arc::new(Segment::new(layer, text, MemberKind::None, "test"))
    }

    fn sample_clip() -> Clip {
        let mut clip = Clip::new("Widget", Some("App".to_owned()), AssemblyId::new("app"));
        clip.append(segment(Layers::RELATIONSHIPS, "Widget -> Part : part << use >>"));
        clip.append(segment(Layers::TYPE, "class Widget {"));
        clip.append(segment(Layers::MEMBERS, "\t+count: int"));
        clip.append(segment(Layers::TYPE_END, "}"));
        clip
    }

    #[test]
    fn test_version_starts_negative_and_increases() {
        let mut clip = Clip::new("Widget", None, AssemblyId::default());
        assert_eq!(clip.version(), -1);

        clip.append(segment(Layers::TYPE, "class Widget {"));
        assert_eq!(clip.version(), 0);
        clip.append(segment(Layers::TYPE_END, "}"));
        assert_eq!(clip.version(), 1);

        assert!(clip.remove(0).is_some());
        assert_eq!(clip.version(), 2);
        assert!(clip.remove(5).is_none());
        assert_eq!(clip.version(), 2);
    }

    #[test]
    fn test_render_all_orders_by_layer() {
        let clip = sample_clip();
        assert_eq!(
            clip.render(Layers::ALL),
            "class Widget {\n\t+count: int\n}\nWidget -> Part : part << use >>"
        );
        assert_eq!(clip.to_string(), clip.render(Layers::ALL));
    }

    #[test]
    fn test_render_type_only() {
        let clip = sample_clip();
        assert_eq!(clip.render(Layers::TYPE), "class Widget {");
    }

    #[test]
    fn test_render_structural_and_relational() {
        let clip = sample_clip();
        assert_eq!(clip.render(Layers::TYPE_END), "class Widget {\n\t+count: int\n}");
        assert_eq!(
            clip.render(Layers::RELATIONSHIPS | Layers::INHERITANCE),
            "Widget -> Part : part << use >>"
        );
    }

    #[test]
    fn test_render_skips_blank_segments_and_keeps_group_order() {
        let mut clip = Clip::new("Widget", None, AssemblyId::default());
        clip.append(segment(Layers::MEMBERS, "\t... fields ..."));
        clip.append(segment(Layers::INHERITANCE, ""));
        clip.append(segment(Layers::MEMBERS, "\t-id: int"));
        clip.append(segment(Layers::TYPE, "class Widget {"));
        clip.append(segment(Layers::MEMBERS, "   "));
        clip.append(segment(Layers::MEMBERS, "\t+name: string"));

        assert_eq!(
            clip.render(Layers::ALL),
            "class Widget {\n\t... fields ...\n\t-id: int\n\t+name: string"
        );
    }

    #[test]
    fn test_render_is_cached() {
        let clip = sample_clip();
        let first = clip.render(Layers::ALL);
        let second = clip.render(Layers::ALL);

        assert_eq!(first, second);
        assert_eq!(clip.derivations(), 1);
    }

    #[test]
    fn test_cache_is_per_layer_set() {
        let clip = sample_clip();
        let structural = clip.render(Layers::TYPE_END);
        let relational = clip.render(Layers::RELATIONSHIPS);

        assert_ne!(structural, relational);
        assert_eq!(clip.render(Layers::TYPE_END), structural);
        assert_eq!(clip.derivations(), 2);
    }

    #[test]
    fn test_append_invalidates_cache() {
        let mut clip = sample_clip();
        let before = clip.render(Layers::ALL);

        // Blank text leaves the output unchanged but must still re-derive.
        clip.append(segment(Layers::NOTES, ""));
        let after = clip.render(Layers::ALL);

        assert_eq!(before, after);
        assert_eq!(clip.derivations(), 2);
    }

    #[test]
    fn test_empty_clip_renders_empty_text() {
        let clip = Clip::new("Empty", None, AssemblyId::default());
        assert_eq!(clip.render(Layers::ALL), "");
        // Version -1 is never served from cache.
        assert_eq!(clip.render(Layers::ALL), "");
        assert_eq!(clip.derivations(), 2);
    }

    #[test]
    fn test_concurrent_render() {
        let clip = Arc::new(sample_clip());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let clip = Arc::clone(&clip);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        clip.render(Layers::TYPE_END)
                    } else {
                        clip.render(Layers::RELATIONSHIPS | Layers::INHERITANCE)
                    }
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let text = handle.join().unwrap();
            if i % 2 == 0 {
                assert!(text.starts_with("class Widget {"));
            } else {
                assert_eq!(text, "Widget -> Part : part << use >>");
            }
        }
        assert_eq!(clip.derivations(), 2);
    }
}
